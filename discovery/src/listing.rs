//! Parsing of pandoc's newline-delimited capability listings.
//!
//! `--list-input-formats` and `--list-output-formats` print one name per
//! line. `--list-extensions` additionally prefixes each name with `+` or `-`
//! to say whether the extension is on by default; only the name is kept.

use std::collections::BTreeSet;

/// Splits a plain listing into a set of names.
///
/// # Examples
///
/// ```
/// use pandoc_schema_discovery::listing::parse_listing;
///
/// let formats = parse_listing("docx\nhtml\n\nlatex\n");
/// assert_eq!(formats.len(), 3);
/// assert!(formats.contains("html"));
/// ```
pub fn parse_listing(text: &str) -> BTreeSet<String> {
    entries(text).map(str::to_string).collect()
}

/// Splits an extension listing, dropping the `+`/`-` default marker.
///
/// # Examples
///
/// ```
/// use pandoc_schema_discovery::listing::parse_extension_listing;
///
/// let extensions = parse_extension_listing("+footnotes\n-emoji\nsmart\n");
/// assert!(extensions.contains("footnotes"));
/// assert!(extensions.contains("emoji"));
/// assert!(extensions.contains("smart"));
/// ```
pub fn parse_extension_listing(text: &str) -> BTreeSet<String> {
    entries(text)
        .map(strip_default_marker)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn entries(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty())
}

fn strip_default_marker(entry: &str) -> &str {
    entry
        .strip_prefix(['+', '-'])
        .map(str::trim_start)
        .unwrap_or(entry)
}
