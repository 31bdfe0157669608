//! Output-format identifier validation.
//!
//! Most identifiers are plain names from `--list-output-formats`. The
//! markdown family additionally takes extension toggles appended with `+`
//! (enable) or `-` (disable): `markdown+footnotes-smart`. Which extensions
//! exist depends on the pandoc version, so the suffix grammar is compiled
//! per snapshot.

use std::collections::BTreeSet;

use pandoc_schema_core::CapabilitySnapshot;
use regex::Regex;
use tracing::{debug, warn};

/// Prefix reserved for identifiers that accept extension suffixes.
pub const MARKDOWN_BASE: &str = "markdown";

/// Validates output-format identifiers against one snapshot.
///
/// The suffix grammar's base is wider than the literal `markdown`: every
/// listed output format whose name starts with `markdown` is a base too, so
/// `markdown_strict+footnotes` is accepted when `markdown_strict` is listed.
/// Unlisted variants such as `markdown_github` are still rejected.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use pandoc_schema_core::CapabilitySnapshot;
/// use pandoc_schema_discovery::formats::OutputFormatValidator;
///
/// let snapshot = CapabilitySnapshot::new(
///     "2.9",
///     Vec::new(),
///     BTreeSet::from(["footnotes".to_string(), "smart".to_string()]),
///     BTreeSet::new(),
///     BTreeSet::from(["docx".to_string(), "markdown".to_string()]),
/// );
/// let validator = OutputFormatValidator::new(&snapshot);
///
/// assert!(validator.is_valid("docx"));
/// assert!(validator.is_valid("markdown+footnotes-smart"));
/// assert!(!validator.is_valid("markdown+bogus"));
/// assert!(!validator.is_valid("docx+footnotes"));
/// ```
#[derive(Debug)]
pub struct OutputFormatValidator<'a> {
    output_formats: &'a BTreeSet<String>,
    grammar: Option<Regex>,
}

impl<'a> OutputFormatValidator<'a> {
    pub fn new(snapshot: &'a CapabilitySnapshot) -> Self {
        let grammar = match markdown_grammar(snapshot.output_formats(), snapshot.extensions()) {
            Ok(grammar) => Some(grammar),
            Err(err) => {
                warn!(error = %err, "Could not compile markdown extension grammar; markdown identifiers will be rejected");
                None
            }
        };
        Self {
            output_formats: snapshot.output_formats(),
            grammar,
        }
    }

    /// Returns `true` when `identifier` is acceptable as an output format.
    ///
    /// Never fails; an unknown or malformed identifier is simply invalid.
    pub fn is_valid(&self, identifier: &str) -> bool {
        if !identifier.starts_with(MARKDOWN_BASE) {
            return self.output_formats.contains(identifier);
        }
        let valid = self
            .grammar
            .as_ref()
            .is_some_and(|grammar| grammar.is_match(identifier));
        debug!(identifier, valid, "Checked markdown output format");
        valid
    }
}

/// One-off check without keeping the compiled grammar around.
pub fn is_valid_output_format(snapshot: &CapabilitySnapshot, identifier: &str) -> bool {
    OutputFormatValidator::new(snapshot).is_valid(identifier)
}

/// Builds `^(BASE)([+-](EXT))*$`.
///
/// BASE is `markdown` or any listed output format that starts with it
/// (`markdown_strict`, `markdown_mmd`, ...).
fn markdown_grammar(
    output_formats: &BTreeSet<String>,
    extensions: &BTreeSet<String>,
) -> Result<Regex, regex::Error> {
    let mut bases: BTreeSet<&str> = output_formats
        .iter()
        .map(String::as_str)
        .filter(|format| format.starts_with(MARKDOWN_BASE))
        .collect();
    bases.insert(MARKDOWN_BASE);

    let bases = alternation(bases.into_iter());
    let pattern = if extensions.is_empty() {
        format!("^(?:{bases})$")
    } else {
        let extensions = alternation(extensions.iter().map(String::as_str));
        format!("^(?:{bases})(?:[+-](?:{extensions}))*$")
    };
    Regex::new(&pattern)
}

fn alternation<'s>(names: impl Iterator<Item = &'s str>) -> String {
    names.map(regex::escape).collect::<Vec<_>>().join("|")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    fn snapshot(extensions: &[&str], output_formats: &[&str]) -> CapabilitySnapshot {
        CapabilitySnapshot::new(
            "2.9",
            Vec::new(),
            set(extensions),
            set(&["markdown"]),
            set(output_formats),
        )
    }

    #[test]
    fn test_plain_format_requires_membership() {
        let snapshot = snapshot(&[], &["docx", "html"]);
        assert!(is_valid_output_format(&snapshot, "docx"));
        assert!(!is_valid_output_format(&snapshot, "pdf"));
        assert!(!is_valid_output_format(&snapshot, "DOCX"));
    }

    #[test]
    fn test_non_markdown_never_takes_suffixes() {
        let snapshot = snapshot(&["foo"], &["pdf", "docx"]);
        assert!(!is_valid_output_format(&snapshot, "pdf+foo"));
    }

    #[test]
    fn test_markdown_extension_suffixes() {
        let snapshot = snapshot(&["footnotes", "smart", "raw_html"], &["markdown"]);
        let validator = OutputFormatValidator::new(&snapshot);

        assert!(validator.is_valid("markdown"));
        assert!(validator.is_valid("markdown+footnotes"));
        assert!(validator.is_valid("markdown-smart+raw_html+footnotes"));
        assert!(!validator.is_valid("markdown+bogus"));
        assert!(!validator.is_valid("markdown+"));
        assert!(!validator.is_valid("markdown+footnotesx"));
        assert!(!validator.is_valid("markdown++footnotes"));
    }

    #[test]
    fn test_markdown_is_valid_even_if_not_listed() {
        let snapshot = snapshot(&["footnotes"], &["html"]);
        assert!(is_valid_output_format(&snapshot, "markdown+footnotes"));
    }

    #[test]
    fn test_markdown_variants_accept_suffixes() {
        let snapshot = snapshot(&["footnotes"], &["markdown", "markdown_strict"]);
        assert!(is_valid_output_format(&snapshot, "markdown_strict"));
        assert!(is_valid_output_format(&snapshot, "markdown_strict+footnotes"));
        assert!(!is_valid_output_format(&snapshot, "markdown_github"));
    }

    #[test]
    fn test_no_extensions_means_bare_base_only() {
        let snapshot = snapshot(&[], &["markdown"]);
        assert!(is_valid_output_format(&snapshot, "markdown"));
        assert!(!is_valid_output_format(&snapshot, "markdown+footnotes"));
    }

    #[test]
    fn test_extension_names_are_escaped() {
        let snapshot = snapshot(&["a.b"], &["markdown"]);
        assert!(is_valid_output_format(&snapshot, "markdown+a.b"));
        assert!(!is_valid_output_format(&snapshot, "markdown+axb"));
    }
}
