//! Licences a track can be published under.
//!
//! The `id` is what the `tracks.licence` column stores; `0` means the
//! uploader did not pick one.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Licence {
    pub id: i32,
    pub short_name: &'static str,
    pub name: &'static str,
    pub url: &'static str,
}

/// Every selectable licence, in display order.
pub const LICENCES: &[Licence] = &[
    Licence {
        id: 1,
        short_name: "CC BY",
        name: "Creative Commons Attribution 4.0",
        url: "https://creativecommons.org/licenses/by/4.0/",
    },
    Licence {
        id: 2,
        short_name: "CC BY-SA",
        name: "Creative Commons Attribution-ShareAlike 4.0",
        url: "https://creativecommons.org/licenses/by-sa/4.0/",
    },
    Licence {
        id: 3,
        short_name: "CC BY-ND",
        name: "Creative Commons Attribution-NoDerivatives 4.0",
        url: "https://creativecommons.org/licenses/by-nd/4.0/",
    },
    Licence {
        id: 4,
        short_name: "CC BY-NC",
        name: "Creative Commons Attribution-NonCommercial 4.0",
        url: "https://creativecommons.org/licenses/by-nc/4.0/",
    },
    Licence {
        id: 5,
        short_name: "CC BY-NC-SA",
        name: "Creative Commons Attribution-NonCommercial-ShareAlike 4.0",
        url: "https://creativecommons.org/licenses/by-nc-sa/4.0/",
    },
    Licence {
        id: 6,
        short_name: "CC BY-NC-ND",
        name: "Creative Commons Attribution-NonCommercial-NoDerivatives 4.0",
        url: "https://creativecommons.org/licenses/by-nc-nd/4.0/",
    },
    Licence {
        id: 7,
        short_name: "CC0",
        name: "Public Domain Dedication",
        url: "https://creativecommons.org/publicdomain/zero/1.0/",
    },
    Licence {
        id: 8,
        short_name: "All rights reserved",
        name: "Copyright, all rights reserved",
        url: "",
    },
];

/// Look up a licence by its stored id.
pub fn licence_by_id(id: i32) -> Option<&'static Licence> {
    if id <= 0 {
        return None;
    }
    LICENCES.iter().find(|lic| lic.id == id)
}

/// Whether `id` may be stored (including `0`, "not specified").
pub fn is_valid_licence_id(id: i32) -> bool {
    id == 0 || licence_by_id(id).is_some()
}
