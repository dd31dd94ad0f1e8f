//! URL slug normalisation.

/// Normalise a string for use as a URL path segment.
///
/// Rules:
/// - Lowercase
/// - Keep ASCII letters and digits
/// - Replace every other character with a hyphen
/// - Collapse runs of hyphens
/// - Trim leading and trailing hyphens
///
/// The result only ever contains `[a-z0-9-]`, so it is safe both in a URL
/// and as a single directory name.
///
/// # Examples
///
/// ```
/// use quire_content::normalize;
///
/// assert_eq!(normalize("Hello World"), "hello-world");
/// assert_eq!(normalize("What is Rust?"), "what-is-rust");
/// assert_eq!(normalize("Café"), "caf");
/// ```
pub fn normalize(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    for c in value.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let trimmed = slug.trim_end_matches('-').len();
    slug.truncate(trimmed);
    slug
}
