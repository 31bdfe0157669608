//! Error types for probing pandoc.
//!
//! Every variant is fatal to the refresh that raised it. Help-line parsing
//! and output-format validation never produce errors; they degrade to
//! "option skipped" and "identifier invalid" respectively.

use std::path::PathBuf;

use thiserror::Error;

use crate::source::InfoFlag;

/// Errors that can occur while capturing or interpreting tool output.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The tool binary could not be started (missing, not executable, ...).
    #[error("failed to run {program} {flag}: {source}")]
    Spawn {
        program: String,
        flag: InfoFlag,
        #[source]
        source: std::io::Error,
    },

    /// The tool ran but exited unsuccessfully.
    #[error("{flag} exited with {}: {stderr}", exit_label(.code))]
    NonZeroExit {
        flag: InfoFlag,
        code: Option<i32>,
        stderr: String,
    },

    /// The configured timeout elapsed before the tool exited.
    #[error("{flag} did not finish within {timeout_ms} ms")]
    Timeout { flag: InfoFlag, timeout_ms: u128 },

    /// The tool exited cleanly but printed nothing to stdout.
    #[error("{flag} produced no output")]
    EmptyOutput { flag: InfoFlag },

    /// Waiting on the child or reading its pipes failed.
    #[error("I/O error while running {flag}: {source}")]
    Io {
        flag: InfoFlag,
        #[source]
        source: std::io::Error,
    },

    /// A pre-captured output file could not be read.
    #[error("cannot read captured output {}: {source}", .path.display())]
    MissingCapture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output does not look like a pandoc this crate understands.
    #[error("incompatible tool: {0}")]
    ToolIncompatible(String),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

/// Convenience alias for results with [`ProbeError`].
pub type Result<T> = std::result::Result<T, ProbeError>;
