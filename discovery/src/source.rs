//! Capturing pandoc's informational output.
//!
//! [`TextSource`] is the seam between discovery and the outside world: it
//! answers "what does the tool print for this flag". [`PandocCommand`] runs
//! the real binary; [`ToolOutputs`] replays text captured earlier, which is
//! how offline parsing and the test suite work.
//!
//! # Example
//!
//! ```no_run
//! use pandoc_schema_discovery::source::{InfoFlag, PandocCommand, ProbeConfig, TextSource};
//!
//! let pandoc = PandocCommand::new(ProbeConfig::default());
//! let banner = pandoc.capture(InfoFlag::Version).unwrap();
//! println!("{}", banner.lines().next().unwrap_or_default());
//! ```

use std::fmt;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread::JoinHandle;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use wait_timeout::ChildExt;

use crate::error::{ProbeError, Result};

/// Program name used when no explicit path is configured.
pub const DEFAULT_PROGRAM: &str = "pandoc";

/// The five informational invocations a refresh needs, in refresh order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InfoFlag {
    Version,
    Help,
    ListExtensions,
    ListInputFormats,
    ListOutputFormats,
}

impl InfoFlag {
    pub const ALL: [InfoFlag; 5] = [
        InfoFlag::Version,
        InfoFlag::Help,
        InfoFlag::ListExtensions,
        InfoFlag::ListInputFormats,
        InfoFlag::ListOutputFormats,
    ];

    /// Command-line flag passed to the tool.
    pub fn as_arg(self) -> &'static str {
        match self {
            Self::Version => "--version",
            Self::Help => "--help",
            Self::ListExtensions => "--list-extensions",
            Self::ListInputFormats => "--list-input-formats",
            Self::ListOutputFormats => "--list-output-formats",
        }
    }

    /// File name used when captures are stored in a directory.
    pub fn capture_file_name(self) -> &'static str {
        match self {
            Self::Version => "version.txt",
            Self::Help => "help.txt",
            Self::ListExtensions => "extensions.txt",
            Self::ListInputFormats => "input-formats.txt",
            Self::ListOutputFormats => "output-formats.txt",
        }
    }
}

impl fmt::Display for InfoFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_arg())
    }
}

/// Something that can produce the tool's stdout for an informational flag.
///
/// Implementations block until the full output is available.
pub trait TextSource {
    fn capture(&self, flag: InfoFlag) -> Result<String>;
}

impl<T: TextSource + ?Sized> TextSource for &T {
    fn capture(&self, flag: InfoFlag) -> Result<String> {
        (**self).capture(flag)
    }
}

impl<T: TextSource + ?Sized> TextSource for Box<T> {
    fn capture(&self, flag: InfoFlag) -> Result<String> {
        (**self).capture(flag)
    }
}

/// How to invoke the tool.
///
/// # Examples
///
/// ```
/// use pandoc_schema_discovery::source::ProbeConfig;
///
/// let config = ProbeConfig::default();
/// assert_eq!(config.program.to_str(), Some("pandoc"));
/// assert!(config.timeout.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Binary name or path.
    pub program: PathBuf,
    /// Kill the tool and fail the refresh after this long. `None` waits forever.
    #[serde(default)]
    pub timeout: Option<Duration>,
    /// Extra environment variables for the child process.
    #[serde(default)]
    pub env: Vec<(String, String)>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_PROGRAM),
            timeout: None,
            env: Vec::new(),
        }
    }
}

impl ProbeConfig {
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }
}

/// Runs the installed pandoc binary.
#[derive(Debug, Clone, Default)]
pub struct PandocCommand {
    config: ProbeConfig,
}

impl PandocCommand {
    pub fn new(config: ProbeConfig) -> Self {
        Self { config }
    }
}

impl TextSource for PandocCommand {
    fn capture(&self, flag: InfoFlag) -> Result<String> {
        let program = &self.config.program;
        let mut command = Command::new(program);
        command
            .arg(flag.as_arg())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for (key, value) in &self.config.env {
            command.env(key, value);
        }

        debug!(program = %program.display(), %flag, "Probing pandoc");
        let mut child = command.spawn().map_err(|source| ProbeError::Spawn {
            program: program.display().to_string(),
            flag,
            source,
        })?;

        // Drain both pipes while waiting so a chatty child cannot fill the
        // pipe buffer and block forever.
        let stdout_reader = child.stdout.take().map(drain_pipe);
        let stderr_reader = child.stderr.take().map(drain_pipe);

        let status = match self.config.timeout {
            Some(timeout) => match child
                .wait_timeout(timeout)
                .map_err(|source| ProbeError::Io { flag, source })?
            {
                Some(status) => status,
                None => {
                    debug!(%flag, timeout_ms = timeout.as_millis(), "pandoc timed out, killing process");
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(ProbeError::Timeout {
                        flag,
                        timeout_ms: timeout.as_millis(),
                    });
                }
            },
            None => child
                .wait()
                .map_err(|source| ProbeError::Io { flag, source })?,
        };

        let stdout = join_pipe(stdout_reader, flag)?;
        let stderr = join_pipe(stderr_reader, flag)?;

        if !status.success() {
            return Err(ProbeError::NonZeroExit {
                flag,
                code: status.code(),
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&stdout).into_owned();
        if text.trim().is_empty() {
            return Err(ProbeError::EmptyOutput { flag });
        }
        debug!(%flag, bytes = text.len(), "Captured pandoc output");
        Ok(text)
    }
}

fn drain_pipe<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<std::io::Result<Vec<u8>>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn join_pipe(
    reader: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    flag: InfoFlag,
) -> Result<Vec<u8>> {
    let Some(reader) = reader else {
        return Ok(Vec::new());
    };
    reader
        .join()
        .unwrap_or_else(|_| Err(std::io::Error::other("pipe reader thread panicked")))
        .map_err(|source| ProbeError::Io { flag, source })
}

/// Raw text of all five informational invocations.
///
/// Acts as a [`TextSource`] itself, replaying the stored text, so a
/// snapshot can be rebuilt later without running the tool again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutputs {
    pub version: String,
    pub help: String,
    pub extensions: String,
    pub input_formats: String,
    pub output_formats: String,
}

impl ToolOutputs {
    /// Runs all five invocations in order, stopping at the first failure.
    pub fn capture_all(source: &impl TextSource) -> Result<Self> {
        Ok(Self {
            version: source.capture(InfoFlag::Version)?,
            help: source.capture(InfoFlag::Help)?,
            extensions: source.capture(InfoFlag::ListExtensions)?,
            input_formats: source.capture(InfoFlag::ListInputFormats)?,
            output_formats: source.capture(InfoFlag::ListOutputFormats)?,
        })
    }

    /// Loads captures written by [`write_to_dir`](Self::write_to_dir) (or by
    /// redirecting each pandoc invocation into the matching file).
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let read = |flag: InfoFlag| {
            let path = dir.join(flag.capture_file_name());
            fs::read_to_string(&path).map_err(|source| ProbeError::MissingCapture { path, source })
        };
        Ok(Self {
            version: read(InfoFlag::Version)?,
            help: read(InfoFlag::Help)?,
            extensions: read(InfoFlag::ListExtensions)?,
            input_formats: read(InfoFlag::ListInputFormats)?,
            output_formats: read(InfoFlag::ListOutputFormats)?,
        })
    }

    /// Writes one file per invocation into `dir`, creating it if needed.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> std::io::Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        for flag in InfoFlag::ALL {
            fs::write(dir.join(flag.capture_file_name()), self.get(flag))?;
        }
        Ok(())
    }

    pub fn get(&self, flag: InfoFlag) -> &str {
        match flag {
            InfoFlag::Version => &self.version,
            InfoFlag::Help => &self.help,
            InfoFlag::ListExtensions => &self.extensions,
            InfoFlag::ListInputFormats => &self.input_formats,
            InfoFlag::ListOutputFormats => &self.output_formats,
        }
    }
}

impl TextSource for ToolOutputs {
    fn capture(&self, flag: InfoFlag) -> Result<String> {
        Ok(self.get(flag).to_string())
    }
}
