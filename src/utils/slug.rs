//! Tag slugs and tag URLs.

/// Characters forbidden in file names
const FORBIDDEN_CHARS: &[char] = &[
    '<', '>', ':', '|', '?', '*', '#', '\\', '/', '"', '(', ')', '[', ']', '\t', '\r', '\n',
];

/// Slug used when nothing of the tag survives sanitizing
const FALLBACK_SLUG: &str = "tag";

/// File-name-safe form of a tag: forbidden characters removed, whitespace
/// replaced with underscores. Case and non-ASCII letters are kept.
pub fn tag_slug(tag: &str) -> String {
    let slug: String = tag
        .trim()
        .chars()
        .filter(|c| !FORBIDDEN_CHARS.contains(c))
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();

    match slug.trim_matches('.') {
        "" => FALLBACK_SLUG.to_owned(),
        _ => slug,
    }
}

/// Output path of a tag page relative to the output dir: `tags/<slug>.html`
pub fn tag_page_relative(tag: &str) -> String {
    format!("tags/{}.html", tag_slug(tag))
}

/// Site-relative URL of a tag page.
pub fn tag_page_url(tag: &str) -> String {
    format!("/tags/{}.html", urlencoding::encode(&tag_slug(tag)))
}

/// Link into the tags page filtered by `tag` via the `t` query parameter.
pub fn tag_filter_url(tag: &str) -> String {
    format!("/tags.html?t={}", urlencoding::encode(tag))
}
