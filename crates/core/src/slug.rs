//! URL slugs for tracks and albums.

use crate::types::DbId;

/// Generate a URL-safe slug from free text.
///
/// Transliterates to ASCII first (`"Éclair"` becomes `"eclair"`), then
/// lowercases, replaces anything that is not ASCII alphanumeric with hyphens,
/// collapses consecutive hyphens, and trims leading/trailing hyphens.
pub fn slugify(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev_hyphen = false;
    for c in deunicode::deunicode(text).to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c);
            prev_hyphen = false;
        } else if !prev_hyphen {
            result.push('-');
            prev_hyphen = true;
        }
    }
    result.trim_matches('-').to_string()
}

/// Slug of a persisted entity: `{id}-{title}`, so it stays unique per owner
/// even when titles collide after slugification.
pub fn entity_slug(id: DbId, title: &str) -> String {
    slugify(&format!("{id}-{title}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_basic_title() {
        assert_eq!(slugify("Hello World"), "hello-world");
    }

    #[test]
    fn slug_special_characters() {
        assert_eq!(slugify("Live @ the Bar (2019)!"), "live-the-bar-2019");
    }

    #[test]
    fn slug_collapses_and_trims() {
        assert_eq!(slugify("  --a   b--  "), "a-b");
    }

    #[test]
    fn slug_transliterates_non_ascii() {
        assert_eq!(slugify("Éclair"), "eclair");
        assert_eq!(slugify("Straße à Göteborg"), "strasse-a-goteborg");
        assert_eq!(entity_slug(3, "Ångström"), "3-angstrom");
    }

    #[test]
    fn entity_slug_prefixes_id() {
        assert_eq!(entity_slug(42, "My Track"), "42-my-track");
        assert_eq!(entity_slug(7, ""), "7");
    }
}
