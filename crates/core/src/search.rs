//! Pagination defaults and free-text search helpers.
//!
//! This module lives in `core` (zero internal deps) so both the repository
//! layer and the HTTP layer clamp user input the same way.

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default page size for contractor listings.
pub const DEFAULT_CONTRACTOR_LIMIT: i64 = 100;

/// Maximum page size for contractor listings.
pub const MAX_CONTRACTOR_LIMIT: i64 = 500;

/// Default page size for project and issue listings.
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Maximum page size for project and issue listings.
pub const MAX_LIST_LIMIT: i64 = 500;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Clamp a user-provided limit to `[1, max]`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Build an `ILIKE` substring pattern, escaping `%`, `_` and `\`.
///
/// Returns `None` for blank input so callers can skip the filter.
pub fn contains_pattern(term: Option<&str>) -> Option<String> {
    let term = term?.trim();
    if term.is_empty() {
        return None;
    }
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    Some(escaped)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
