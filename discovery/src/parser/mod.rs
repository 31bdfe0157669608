//! Help output parser for pandoc's option listing.
//!
//! pandoc's `--help` is written for people: a usage line, then one option
//! (or a few aliases of one option) per line, with value placeholders and
//! optional-value brackets as the only structure. There is no grammar to
//! follow, so each line is classified by its shape (see [`LineShape`]) and
//! lines that fit no shape are skipped rather than treated as errors.
//!
//! # Architecture
//!
//! 1. Drop the usage line and trim the rest.
//! 2. Cut the listing at the [`SENTINEL`] line; the debugging and
//!    informational options from there on are not useful to callers.
//! 3. Run every remaining line through [`classify_line`], recording hits and
//!    misses in [`ParseDiagnostics`].
//!
//! Most consumers should call [`parse_options`]; [`HelpParser`] exposes the
//! per-line matches and diagnostics as well.

mod shapes;

use std::collections::BTreeMap;

use pandoc_schema_core::OptionDescriptor;
use serde::Serialize;
use tracing::debug;

pub use shapes::{LineShape, classify_line};

/// Help line at which option parsing stops.
pub const SENTINEL: &str = "--trace";

/// One help line that produced an option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineMatch {
    /// Zero-based line number in the original help text.
    pub line: usize,
    pub shape: LineShape,
    pub option: OptionDescriptor,
}

/// Diagnostics for a single parse run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseDiagnostics {
    /// Non-blank lines before the sentinel (usage line excluded).
    pub relevant_lines: usize,
    pub recognized_lines: usize,
    pub unresolved_lines: Vec<String>,
    pub sentinel_found: bool,
    /// Non-blank lines ignored because they follow the sentinel.
    pub truncated_lines: usize,
    pub shape_hits: BTreeMap<LineShape, usize>,
}

impl ParseDiagnostics {
    pub fn coverage(&self) -> f64 {
        if self.relevant_lines == 0 {
            return 0.0;
        }
        self.recognized_lines as f64 / self.relevant_lines as f64
    }
}

/// Parses pandoc `--help` output.
///
/// # Examples
///
/// ```
/// use pandoc_schema_discovery::parser::HelpParser;
///
/// let help = "\
/// pandoc [OPTIONS] [FILES]
///   -t FORMAT  --to=FORMAT
///              --standalone
///              --trace
///              --verbose
/// ";
///
/// let mut parser = HelpParser::new(help);
/// let options = parser.parse();
/// assert_eq!(options.len(), 2);
/// assert_eq!(options[0].aliases(), ["t", "to"]);
/// assert!(parser.diagnostics().sentinel_found);
/// assert_eq!(parser.diagnostics().truncated_lines, 2);
/// ```
#[derive(Debug)]
pub struct HelpParser<'a> {
    text: &'a str,
    diagnostics: ParseDiagnostics,
}

impl<'a> HelpParser<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            diagnostics: ParseDiagnostics::default(),
        }
    }

    /// Parses the help text into options, in listing order.
    pub fn parse(&mut self) -> Vec<OptionDescriptor> {
        self.parse_lines()
            .into_iter()
            .map(|matched| matched.option)
            .collect()
    }

    /// Parses the help text, keeping which line and shape produced each option.
    pub fn parse_lines(&mut self) -> Vec<LineMatch> {
        let mut diagnostics = ParseDiagnostics::default();
        let mut matches = Vec::new();

        let mut lines = self
            .text
            .lines()
            .enumerate()
            .skip(1)
            .map(|(index, line)| (index, line.trim()));

        for (index, line) in lines.by_ref() {
            if line == SENTINEL {
                diagnostics.sentinel_found = true;
                break;
            }
            if line.is_empty() {
                continue;
            }
            diagnostics.relevant_lines += 1;

            match classify_line(line) {
                Some((shape, option)) => {
                    diagnostics.recognized_lines += 1;
                    *diagnostics.shape_hits.entry(shape).or_default() += 1;
                    matches.push(LineMatch {
                        line: index,
                        shape,
                        option,
                    });
                }
                None => {
                    debug!(line = index, text = line, "Skipping unrecognized help line");
                    diagnostics.unresolved_lines.push(line.to_string());
                }
            }
        }

        if diagnostics.sentinel_found {
            // The sentinel itself is excluded along with everything after it.
            diagnostics.truncated_lines = 1 + lines.filter(|(_, line)| !line.is_empty()).count();
        } else {
            debug!(sentinel = SENTINEL, "Sentinel not found; parsed the full listing");
        }

        debug!(
            options = matches.len(),
            relevant = diagnostics.relevant_lines,
            recognized = diagnostics.recognized_lines,
            "Parsed help listing"
        );
        self.diagnostics = diagnostics;
        matches
    }

    pub fn diagnostics(&self) -> &ParseDiagnostics {
        &self.diagnostics
    }
}

/// Parses pandoc `--help` output into option descriptors.
///
/// Never fails: lines that fit no known shape are skipped.
///
/// # Examples
///
/// ```
/// use pandoc_schema_discovery::parser::parse_options;
///
/// let options = parse_options("pandoc [OPTIONS]\n--toc, --table-of-contents\n--dpi=NUMBER\n");
/// assert_eq!(options.len(), 2);
/// assert!(!options[0].takes_argument());
/// assert!(options[1].takes_argument());
/// ```
pub fn parse_options(help_text: &str) -> Vec<OptionDescriptor> {
    HelpParser::new(help_text).parse()
}
