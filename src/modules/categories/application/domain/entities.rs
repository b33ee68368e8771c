/// Deepest allowed category level (root = 0).
pub const MAX_CATEGORY_LEVEL: i16 = 5;

/// Deepest descendant level served by the category tree endpoint: roots plus
/// four generations below them (levels 0 through 4).
pub const TREE_DEPTH: usize = 4;

/// Derives a URL slug from a display name: lowercase, non-alphanumerics
/// dropped, whitespace and hyphen runs collapsed to single hyphens.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true; // suppress leading hyphen

    for c in name.trim().to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            last_was_hyphen = false;
        } else if (c.is_whitespace() || c == '-' || c == '_') && !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
        // any other character is dropped
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Materialized path of a child under `parent_path`; roots use the bare slug.
pub fn child_path(parent_path: Option<&str>, slug: &str) -> String {
    match parent_path {
        Some(parent) => format!("{}/{}", parent, slug),
        None => slug.to_string(),
    }
}
