//! Page-number pagination helpers.

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Upper bound on rows per page.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a user-provided page number; anything below 1 becomes 1.
pub fn clamp_page(page: i64) -> i64 {
    page.max(1)
}

/// Clamp a user-provided page size to `1..=MAX_PAGE_SIZE`, using the default
/// for non-positive values.
pub fn clamp_page_size(page_size: i64) -> i64 {
    if page_size <= 0 {
        DEFAULT_PAGE_SIZE
    } else {
        page_size.min(MAX_PAGE_SIZE)
    }
}

/// Row offset of the given (already clamped) page. Saturates instead of
/// overflowing for absurd page numbers.
pub fn page_offset(page: i64, page_size: i64) -> i64 {
    page.saturating_sub(1).saturating_mul(page_size)
}
