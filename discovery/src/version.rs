//! Version extraction from the `--version` banner.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ProbeError, Result};

/// Extracts `MAJOR.MINOR` from pandoc's version banner.
///
/// Only the first two components are kept (`pandoc 2.9.2.1` → `2.9`), which
/// is the granularity the help and listing formats change at.
///
/// # Errors
///
/// Returns [`ProbeError::ToolIncompatible`] when no `pandoc X.Y` banner is
/// present. There is no fallback: without a version the output is not
/// trusted to follow the conventions the parsers rely on.
///
/// # Examples
///
/// ```
/// use pandoc_schema_discovery::version::extract_version;
///
/// let banner = "pandoc 2.9.2.1\nCompiled with pandoc-types 1.20";
/// assert_eq!(extract_version(banner).unwrap(), "2.9");
/// assert!(extract_version("Usage: tool [options]").is_err());
/// ```
pub fn extract_version(text: &str) -> Result<String> {
    // SAFETY: This regex is a compile-time constant and is validated by tests.
    static BANNER_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?m)\bpandoc(?:\.exe)?[ \t]+v?(\d+\.\d+)").expect("static regex must compile")
    });

    BANNER_RE
        .captures(text)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| {
            let first_line = text.lines().next().unwrap_or_default().trim();
            ProbeError::ToolIncompatible(format!(
                "no `pandoc X.Y` version banner in --version output (first line: {first_line:?})"
            ))
        })
}
