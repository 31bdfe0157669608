//! Output formatting for snapshots, parsed options, and argument schemas.

use pandoc_schema_core::{ArgumentSchema, Arity, CapabilitySnapshot, flag_token};
use serde::Serialize;

use crate::parser::{LineMatch, ParseDiagnostics};

/// Supported output formats.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
}

/// Formats a capability snapshot in the requested output format.
pub fn format_snapshot(
    snapshot: &CapabilitySnapshot,
    format: OutputFormat,
) -> Result<String, String> {
    match format {
        OutputFormat::Json => to_json(snapshot),
        OutputFormat::Yaml => to_yaml(snapshot),
        OutputFormat::Table => Ok(snapshot_to_table(snapshot)),
    }
}

/// Parsed help lines together with the diagnostics of the run.
#[derive(Debug, Serialize)]
struct OptionsReport<'a> {
    options: &'a [LineMatch],
    diagnostics: &'a ParseDiagnostics,
}

/// Formats per-line parse results and their diagnostics.
pub fn format_options(
    matches: &[LineMatch],
    diagnostics: &ParseDiagnostics,
    format: OutputFormat,
) -> Result<String, String> {
    let report = OptionsReport {
        options: matches,
        diagnostics,
    };
    match format {
        OutputFormat::Json => to_json(&report),
        OutputFormat::Yaml => to_yaml(&report),
        OutputFormat::Table => Ok(options_to_table(matches, diagnostics)),
    }
}

/// Formats an argument schema in the requested output format.
pub fn format_schema(schema: &ArgumentSchema, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => to_json(schema),
        OutputFormat::Yaml => to_yaml(schema),
        OutputFormat::Table => Ok(schema_to_table(schema)),
    }
}

fn to_json(value: &impl Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

fn to_yaml(value: &impl Serialize) -> Result<String, String> {
    serde_yaml::to_string(value).map_err(|e| format!("YAML serialization failed: {e}"))
}

fn arity_label(arity: Arity) -> &'static str {
    match arity {
        Arity::Flag => "flag",
        Arity::RequiredValue => "value",
        Arity::OptionalValue => "[value]",
    }
}

fn joined_tokens(aliases: &[String]) -> String {
    aliases
        .iter()
        .map(|alias| flag_token(alias))
        .collect::<Vec<_>>()
        .join(", ")
}

fn snapshot_to_table(snapshot: &CapabilitySnapshot) -> String {
    let mut out = String::new();

    out.push_str(&format!("pandoc {}\n", snapshot.version()));
    out.push_str(&format!(
        "  {} options, {} extensions, {} input formats, {} output formats\n",
        snapshot.options().len(),
        snapshot.extensions().len(),
        snapshot.input_formats().len(),
        snapshot.output_formats().len()
    ));

    if !snapshot.options().is_empty() {
        out.push_str("\nOptions:\n");
        let names: Vec<String> = snapshot
            .options()
            .iter()
            .map(|option| joined_tokens(option.aliases()))
            .collect();
        let max_name = names.iter().map(String::len).max().unwrap_or(0);
        for (name, option) in names.iter().zip(snapshot.options()) {
            out.push_str(&format!(
                "  {:<width$}  {}\n",
                name,
                arity_label(option.arity()),
                width = max_name
            ));
        }
    }

    for (title, items) in [
        ("Extensions", snapshot.extensions()),
        ("Input formats", snapshot.input_formats()),
        ("Output formats", snapshot.output_formats()),
    ] {
        if items.is_empty() {
            continue;
        }
        out.push_str(&format!("\n{title}:\n"));
        for item in items {
            out.push_str(&format!("  {item}\n"));
        }
    }

    out
}

fn options_to_table(matches: &[LineMatch], diagnostics: &ParseDiagnostics) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Recognized {}/{} lines ({:.0}% coverage)",
        diagnostics.recognized_lines,
        diagnostics.relevant_lines,
        diagnostics.coverage() * 100.0
    ));
    if diagnostics.sentinel_found {
        out.push_str(&format!(
            "  [{} lines after sentinel ignored]",
            diagnostics.truncated_lines
        ));
    }
    out.push('\n');

    if !matches.is_empty() {
        out.push('\n');
        let names: Vec<String> = matches
            .iter()
            .map(|matched| joined_tokens(matched.option.aliases()))
            .collect();
        let max_name = names.iter().map(String::len).max().unwrap_or(0);
        for (name, matched) in names.iter().zip(matches) {
            out.push_str(&format!(
                "  {:>4}  {:<width$}  {:<8}  {}\n",
                matched.line + 1,
                name,
                arity_label(matched.option.arity()),
                matched.shape.name(),
                width = max_name
            ));
        }
    }

    if !diagnostics.unresolved_lines.is_empty() {
        out.push_str("\nUnrecognized:\n");
        for line in &diagnostics.unresolved_lines {
            out.push_str(&format!("  {line}\n"));
        }
    }

    out
}

fn schema_to_table(schema: &ArgumentSchema) -> String {
    let mut out = String::new();

    out.push_str("Positionals:\n");
    for positional in &schema.positionals {
        let required = if positional.required {
            "required"
        } else {
            "optional"
        };
        out.push_str(&format!("  {}  ({required})\n", positional.name));
    }

    let groups = schema.groups();
    if !groups.is_empty() {
        out.push_str("\nFlags:\n");
        let names: Vec<String> = groups.iter().map(|(tokens, _)| tokens.join(", ")).collect();
        let max_name = names.iter().map(String::len).max().unwrap_or(0);
        for (name, (_, spec)) in names.iter().zip(&groups) {
            let repeat = if spec.repeatable { "  repeatable" } else { "" };
            out.push_str(&format!(
                "  {:<width$}  {}{repeat}\n",
                name,
                arity_label(spec.arity),
                width = max_name
            ));
        }
    }

    out
}
