//! Building capability snapshots from tool output.

use pandoc_schema_core::{ArgumentSchema, CapabilitySnapshot};
use tracing::info;

use crate::error::Result;
use crate::formats::OutputFormatValidator;
use crate::listing::{parse_extension_listing, parse_listing};
use crate::parser::parse_options;
use crate::schema::build_schema;
use crate::source::{TextSource, ToolOutputs};
use crate::version::extract_version;

/// Queries the tool five times and builds a fresh snapshot.
///
/// Invocations run one after another and each must succeed; the first
/// failure is returned and no snapshot is produced. Callers holding an
/// older snapshot keep using it until they replace it with this result.
///
/// # Examples
///
/// ```no_run
/// use pandoc_schema_discovery::refresh;
/// use pandoc_schema_discovery::source::{PandocCommand, ProbeConfig};
///
/// let snapshot = refresh(&PandocCommand::new(ProbeConfig::default())).unwrap();
/// println!("pandoc {} knows {} output formats", snapshot.version(), snapshot.output_formats().len());
/// ```
pub fn refresh(source: &impl TextSource) -> Result<CapabilitySnapshot> {
    let outputs = ToolOutputs::capture_all(source)?;
    let snapshot = snapshot_from_outputs(&outputs)?;
    info!(
        version = snapshot.version(),
        options = snapshot.options().len(),
        extensions = snapshot.extensions().len(),
        input_formats = snapshot.input_formats().len(),
        output_formats = snapshot.output_formats().len(),
        "Refreshed pandoc capabilities"
    );
    Ok(snapshot)
}

/// Builds a snapshot from already-captured output without running anything.
///
/// # Errors
///
/// Fails with [`ProbeError::ToolIncompatible`](crate::ProbeError::ToolIncompatible)
/// when the version banner is missing. The other parsers never fail.
pub fn snapshot_from_outputs(outputs: &ToolOutputs) -> Result<CapabilitySnapshot> {
    let version = extract_version(&outputs.version)?;
    Ok(CapabilitySnapshot::new(
        version,
        parse_options(&outputs.help),
        parse_extension_listing(&outputs.extensions),
        parse_listing(&outputs.input_formats),
        parse_listing(&outputs.output_formats),
    ))
}

/// Derived queries on a [`CapabilitySnapshot`].
pub trait SnapshotExt {
    /// Whether `identifier` names an output format this pandoc accepts.
    fn is_valid_output_format(&self, identifier: &str) -> bool;

    /// Argument schema for this pandoc's command line.
    fn build_argument_schema(&self) -> ArgumentSchema;
}

impl SnapshotExt for CapabilitySnapshot {
    fn is_valid_output_format(&self, identifier: &str) -> bool {
        OutputFormatValidator::new(self).is_valid(identifier)
    }

    fn build_argument_schema(&self) -> ArgumentSchema {
        build_schema(self.options())
    }
}
