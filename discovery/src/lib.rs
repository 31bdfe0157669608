//! pandoc capability discovery.
//!
//! This crate runs pandoc's informational invocations (`--version`,
//! `--help`, `--list-extensions`, `--list-input-formats`,
//! `--list-output-formats`), parses their human-oriented text, and turns
//! the result into a [`CapabilitySnapshot`]. From a snapshot it can validate
//! output-format identifiers (including markdown extension suffixes) and
//! derive an [`ArgumentSchema`] for pandoc's command line.
//!
//! # Main entry points
//!
//! - [`refresh`]: probe an installed pandoc and build a snapshot.
//! - [`snapshot_from_outputs`]: build a snapshot from captured text
//!   without running anything.
//! - [`SnapshotExt`]: format validation and schema derivation on a
//!   snapshot.
//! - [`parse_options`], [`parse_listing`], [`parse_extension_listing`],
//!   [`extract_version`]: the individual parsers.
//!
//! # Example
//!
//! ```
//! use pandoc_schema_discovery::source::ToolOutputs;
//! use pandoc_schema_discovery::{SnapshotExt, snapshot_from_outputs};
//!
//! let outputs = ToolOutputs {
//!     version: "pandoc 2.9.2.1\nCompiled with pandoc-types 1.20\n".to_string(),
//!     help: "\
//! pandoc [OPTIONS] [FILES]
//!   -t FORMAT  --to=FORMAT
//!   -s         --standalone
//!   -V KEY[:VALUE]  --variable=KEY[:VALUE]
//!              --trace
//! ".to_string(),
//!     extensions: "+footnotes\n-smart\n".to_string(),
//!     input_formats: "markdown\nrst\n".to_string(),
//!     output_formats: "docx\nhtml\nmarkdown\n".to_string(),
//! };
//!
//! let snapshot = snapshot_from_outputs(&outputs).unwrap();
//! assert_eq!(snapshot.version(), "2.9");
//! assert!(snapshot.is_valid_output_format("markdown-smart"));
//! assert!(!snapshot.is_valid_output_format("pdf"));
//!
//! let schema = snapshot.build_argument_schema();
//! assert!(schema.flag("-V").unwrap().repeatable);
//! ```
//!
//! # Features
//!
//! - `clap` (default): [`clap_adapter`], which turns an [`ArgumentSchema`]
//!   into a runtime `clap::Command`, and `clap::ValueEnum` on
//!   [`output::OutputFormat`].
//!
//! [`CapabilitySnapshot`]: pandoc_schema_core::CapabilitySnapshot
//! [`ArgumentSchema`]: pandoc_schema_core::ArgumentSchema

#[cfg(feature = "clap")]
pub mod clap_adapter;
pub mod error;
pub mod formats;
pub mod listing;
pub mod output;
pub mod parser;
pub mod schema;
pub mod snapshot;
pub mod source;
pub mod version;

pub use error::{ProbeError, Result};
pub use formats::{OutputFormatValidator, is_valid_output_format};
pub use listing::{parse_extension_listing, parse_listing};
pub use parser::parse_options;
pub use schema::build_schema;
pub use snapshot::{SnapshotExt, refresh, snapshot_from_outputs};
pub use version::extract_version;
