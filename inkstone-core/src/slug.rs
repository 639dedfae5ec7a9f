//! Slug derivation for public URL lookups

/// Derive a URL-safe slug from a title or name.
///
/// Lowercases, keeps ASCII alphanumerics, folds whitespace runs and
/// dashes into single dashes, drops everything else.
///
/// ```
/// use inkstone_core::slugify;
///
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// assert_eq!(slugify("  Rust   & Coffee "), "rust-coffee");
/// ```
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;

    for c in value.trim().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_dash = true;
        }
        // other punctuation is dropped without acting as a separator
    }

    slug
}
