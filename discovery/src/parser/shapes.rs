//! Line-shape matchers for pandoc's option listing.
//!
//! Each [`LineShape`] pairs a guard over punctuation cues (`,`, `-`, `=`,
//! `[`) with a rule for which dash tokens on the line become aliases. Shapes
//! are tried in [`LineShape::PRIORITY`] order; a shape claims a line only
//! when its guard holds and it extracts at least one alias.

use std::sync::LazyLock;

use pandoc_schema_core::{Arity, OptionDescriptor};
use regex::Regex;
use serde::Serialize;

/// The recognized layouts of a help line, highest priority first.
///
/// Dispatch is not by guard alone: when a shape's guard holds but it finds
/// no alias, the line is offered to the next shape instead of being
/// dropped. `-h,--help` fails [`LineShape::MultiAliasValue`] (no token is
/// followed by a value marker) and ends up as a
/// [`LineShape::SingleAliasBoolean`] flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineShape {
    /// `-t FORMAT, --to=FORMAT`: several aliases, short form present, takes a value.
    MultiAliasValue,
    /// `--toc, --table-of-contents`: several long aliases, no value.
    MultiAliasBoolean,
    /// `--toc-depth=NUMBER`, `--webtex[=URL]`: value marked with `=`.
    SingleAliasValue,
    /// `--standalone`: no value.
    SingleAliasBoolean,
}

impl LineShape {
    pub const PRIORITY: [LineShape; 4] = [
        LineShape::MultiAliasValue,
        LineShape::MultiAliasBoolean,
        LineShape::SingleAliasValue,
        LineShape::SingleAliasBoolean,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::MultiAliasValue => "multi-alias-value",
            Self::MultiAliasBoolean => "multi-alias-boolean",
            Self::SingleAliasValue => "single-alias-value",
            Self::SingleAliasBoolean => "single-alias-boolean",
        }
    }

    /// Applies this shape alone to a trimmed help line.
    pub fn classify(self, line: &str) -> Option<OptionDescriptor> {
        match self {
            Self::MultiAliasValue => multi_alias_value(line),
            Self::MultiAliasBoolean => multi_alias_boolean(line),
            Self::SingleAliasValue => single_alias_value(line),
            Self::SingleAliasBoolean => single_alias_boolean(line),
        }
    }
}

/// Classifies a trimmed help line with the first shape that claims it.
///
/// # Examples
///
/// ```
/// use pandoc_schema_discovery::parser::{LineShape, classify_line};
///
/// let (shape, option) = classify_line("--extract-media[=PATH]").unwrap();
/// assert_eq!(shape, LineShape::SingleAliasValue);
/// assert_eq!(option.aliases(), ["extract-media"]);
/// assert!(option.argument_optional());
///
/// assert!(classify_line("Options:").is_none());
/// ```
pub fn classify_line(line: &str) -> Option<(LineShape, OptionDescriptor)> {
    LineShape::PRIORITY
        .iter()
        .find_map(|shape| shape.classify(line).map(|option| (*shape, option)))
}

fn multi_alias_value(line: &str) -> Option<OptionDescriptor> {
    if !line.contains(',') || !has_short_option(line) {
        return None;
    }
    let aliases = dash_tokens(line)
        .filter(DashToken::opens_value)
        .map(|token| token.name);
    let arity = if line.contains('[') {
        Arity::OptionalValue
    } else {
        Arity::RequiredValue
    };
    OptionDescriptor::with_arity(aliases, arity)
}

fn multi_alias_boolean(line: &str) -> Option<OptionDescriptor> {
    if !line.contains(',') || has_short_option(line) || line.contains('[') {
        return None;
    }
    let aliases = dash_tokens(line)
        .filter(|token| token.dashes >= 2)
        .map(|token| token.name);
    OptionDescriptor::flag(aliases)
}

fn single_alias_value(line: &str) -> Option<OptionDescriptor> {
    if !line.contains('=') {
        return None;
    }
    if line.contains("[=") {
        let aliases = dash_tokens(line)
            .filter(|token| token.dashes >= 2 && token.rest.starts_with("[="))
            .map(|token| token.name);
        // `-M KEY[=VALUE]` puts the bracket inside the placeholder; the
        // value itself is still required.
        if let Some(option) = OptionDescriptor::optional_value(aliases) {
            return Some(option);
        }
    }
    let aliases = dash_tokens(line)
        .filter(DashToken::followed_by_value)
        .map(|token| token.name);
    OptionDescriptor::required_value(aliases)
}

fn single_alias_boolean(line: &str) -> Option<OptionDescriptor> {
    if line.contains('=') {
        return None;
    }
    let aliases = dash_tokens(line)
        .filter(|token| token.next_char() != Some('='))
        .map(|token| token.name);
    OptionDescriptor::flag(aliases)
}

/// A run of dashes followed by an option name, found at a token boundary.
#[derive(Debug, Clone, Copy)]
struct DashToken<'a> {
    dashes: usize,
    name: &'a str,
    /// Remainder of the line right after the name.
    rest: &'a str,
}

impl DashToken<'_> {
    fn next_char(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// `[`, `=` or any blank right after the name; the placeholder itself
    /// may be anything (`-o <file>`).
    fn opens_value(&self) -> bool {
        matches!(self.next_char(), Some('[' | '='))
            || self.next_char().is_some_and(char::is_whitespace)
    }

    /// `=VALUE` or a single blank then `VALUE`, where VALUE starts with a letter.
    ///
    /// Two or more blanks mean a column gap before description text, not a
    /// value placeholder.
    fn followed_by_value(&self) -> bool {
        let mut chars = self.rest.chars();
        let starts_value = match chars.next() {
            Some('=') => true,
            Some(ch) if ch.is_whitespace() => true,
            _ => false,
        };
        starts_value && chars.next().is_some_and(|ch| ch.is_ascii_alphabetic())
    }
}

fn dash_tokens(line: &str) -> impl Iterator<Item = DashToken<'_>> {
    // SAFETY: This regex is a compile-time constant and is validated by tests.
    static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?:^|[\s,\[(|])(-+)([A-Za-z][A-Za-z0-9-]*)").expect("static regex must compile")
    });

    TOKEN_RE.captures_iter(line).filter_map(move |cap| {
        let dashes = cap.get(1)?;
        let name = cap.get(2)?;
        Some(DashToken {
            dashes: dashes.len(),
            name: name.as_str(),
            rest: &line[name.end()..],
        })
    })
}

/// True when the line holds a single-dash option such as `-t`.
///
/// The dash must not continue a word (`ATX-style`) or a longer dash run
/// (`--to`), and must be followed by a letter.
fn has_short_option(line: &str) -> bool {
    let chars: Vec<char> = line.chars().collect();
    chars.iter().enumerate().any(|(idx, &ch)| {
        if ch != '-' {
            return false;
        }
        let prev_ok = idx == 0 || {
            let prev = chars[idx - 1];
            prev != '-' && !prev.is_alphanumeric()
        };
        let next_ok = chars
            .get(idx + 1)
            .is_some_and(|next| next.is_ascii_alphabetic());
        prev_ok && next_ok
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(line: &str) -> (LineShape, Vec<String>, Arity) {
        let (shape, option) = classify_line(line).unwrap_or_else(|| panic!("no shape for {line:?}"));
        (shape, option.aliases().to_vec(), option.arity())
    }

    #[test]
    fn test_short_and_long_with_description() {
        let (shape, aliases, arity) = classify("-t FORMAT, --to=FORMAT  convert to FORMAT");
        assert_eq!(shape, LineShape::MultiAliasValue);
        assert_eq!(aliases, vec!["t", "to"]);
        assert_eq!(arity, Arity::RequiredValue);
    }

    #[test]
    fn test_four_aliases_on_one_line() {
        let (shape, aliases, arity) = classify("-f FORMAT, -r FORMAT  --from=FORMAT, --read=FORMAT");
        assert_eq!(shape, LineShape::MultiAliasValue);
        assert_eq!(aliases, vec!["f", "r", "from", "read"]);
        assert_eq!(arity, Arity::RequiredValue);
    }

    #[test]
    fn test_multi_alias_with_angle_bracket_placeholder() {
        let (shape, aliases, arity) = classify("-o <file>, --output=<file>  write to file");
        assert_eq!(shape, LineShape::MultiAliasValue);
        assert_eq!(aliases, vec!["o", "output"]);
        assert_eq!(arity, Arity::RequiredValue);
    }

    #[test]
    fn test_multi_alias_with_bracket_is_optional() {
        let (shape, aliases, arity) = classify("-m[URL], --latexmathml[=URL]");
        assert_eq!(shape, LineShape::MultiAliasValue);
        assert_eq!(aliases, vec!["m", "latexmathml"]);
        assert_eq!(arity, Arity::OptionalValue);
    }

    #[test]
    fn test_long_aliases_without_value() {
        let (shape, aliases, arity) = classify("--toc, --table-of-contents");
        assert_eq!(shape, LineShape::MultiAliasBoolean);
        assert_eq!(aliases, vec!["toc", "table-of-contents"]);
        assert_eq!(arity, Arity::Flag);
    }

    #[test]
    fn test_optional_value_marker() {
        let (shape, aliases, arity) = classify("--extract-media[=PATH]");
        assert_eq!(shape, LineShape::SingleAliasValue);
        assert_eq!(aliases, vec!["extract-media"]);
        assert_eq!(arity, Arity::OptionalValue);
    }

    #[test]
    fn test_value_in_both_columns() {
        let (shape, aliases, arity) = classify("-o FILE               --output=FILE");
        assert_eq!(shape, LineShape::SingleAliasValue);
        assert_eq!(aliases, vec!["o", "output"]);
        assert_eq!(arity, Arity::RequiredValue);
    }

    #[test]
    fn test_bracket_inside_placeholder_is_required_value() {
        let (shape, aliases, arity) = classify("-M KEY[=VALUE]        --metadata=KEY[:VALUE]");
        assert_eq!(shape, LineShape::SingleAliasValue);
        assert_eq!(aliases, vec!["M", "metadata"]);
        assert_eq!(arity, Arity::RequiredValue);
    }

    #[test]
    fn test_numeric_value_placeholder_is_not_recognized() {
        assert!(classify_line("--dpi=96").is_none());
    }

    #[test]
    fn test_boolean_flag() {
        let (shape, aliases, arity) = classify("--atx-headers");
        assert_eq!(shape, LineShape::SingleAliasBoolean);
        assert_eq!(aliases, vec!["atx-headers"]);
        assert_eq!(arity, Arity::Flag);
    }

    #[test]
    fn test_boolean_short_and_long_columns() {
        let (_, aliases, arity) = classify("-s                    --standalone");
        assert_eq!(aliases, vec!["s", "standalone"]);
        assert_eq!(arity, Arity::Flag);
    }

    #[test]
    fn test_comma_short_and_long_takes_tokens_before_a_blank() {
        let (shape, aliases, arity) = classify("-h, --help  Show usage message");
        assert_eq!(shape, LineShape::MultiAliasValue);
        assert_eq!(aliases, vec!["help"]);
        assert_eq!(arity, Arity::RequiredValue);
    }

    #[test]
    fn test_empty_guarded_shape_falls_through() {
        assert!(LineShape::MultiAliasValue.classify("-h,--help").is_none());
        let (shape, aliases, arity) = classify("-h,--help");
        assert_eq!(shape, LineShape::SingleAliasBoolean);
        assert_eq!(aliases, vec!["h", "help"]);
        assert_eq!(arity, Arity::Flag);
    }

    #[test]
    fn test_hyphenated_description_words_are_not_aliases() {
        let (_, aliases, _) = classify("--atx-headers  Use ATX-style headers");
        assert_eq!(aliases, vec!["atx-headers"]);
    }

    #[test]
    fn test_lines_without_options_are_skipped() {
        assert!(classify_line("").is_none());
        assert!(classify_line("Options:").is_none());
        assert!(classify_line("pandoc [OPTIONS] [FILES]").is_none());
        assert!(classify_line("- - -").is_none());
    }

    #[test]
    fn test_short_option_detection() {
        assert!(has_short_option("-t FORMAT"));
        assert!(has_short_option("x, -t"));
        assert!(!has_short_option("--to=FORMAT, --write=FORMAT"));
        assert!(!has_short_option("ATX-style"));
        assert!(!has_short_option("-"));
    }

    #[test]
    fn test_each_shape_is_independent() {
        assert!(LineShape::MultiAliasBoolean.classify("--standalone").is_none());
        assert!(LineShape::SingleAliasBoolean.classify("--toc-depth=NUMBER").is_none());
        assert!(
            LineShape::SingleAliasBoolean
                .classify("--toc, --table-of-contents")
                .is_some()
        );
    }
}
