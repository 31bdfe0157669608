use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use pandoc_schema_core::{CapabilitySnapshot, validate_argument_schema};
use pandoc_schema_discovery::clap_adapter::parse_invocation;
use pandoc_schema_discovery::output::{format_options, format_schema, format_snapshot};
use pandoc_schema_discovery::parser::HelpParser;
use pandoc_schema_discovery::source::{
    DEFAULT_PROGRAM, InfoFlag, PandocCommand, ProbeConfig, TextSource, ToolOutputs,
};
use pandoc_schema_discovery::{SnapshotExt, extract_version, refresh};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;

/// Exit status for a well-formed request whose answer is "no".
const EXIT_REJECTED: i32 = 2;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
    Table,
}

impl From<CliOutputFormat> for pandoc_schema_discovery::output::OutputFormat {
    fn from(fmt: CliOutputFormat) -> Self {
        match fmt {
            CliOutputFormat::Json => Self::Json,
            CliOutputFormat::Yaml => Self::Yaml,
            CliOutputFormat::Table => Self::Table,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "pandoc-schema")]
#[command(about = "Inspect the options, formats and extensions of an installed pandoc")]
#[command(version)]
struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace). Logs go to stderr.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the full capability snapshot.
    Snapshot(FormatArgs),
    /// Print the options parsed from `pandoc --help`, with parse diagnostics.
    Options(FormatArgs),
    /// Print the argument schema derived from the options.
    Schema(FormatArgs),
    /// Check whether an output-format identifier is accepted (exit 2 if not).
    CheckFormat(CheckFormatArgs),
    /// Parse a pandoc argument list against the derived schema (exit 2 if it is rejected).
    CheckArgs(CheckArgsArgs),
    /// Save pandoc's raw informational output for later `--from-dir` use.
    Capture(CaptureArgs),
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// pandoc executable to run.
    #[arg(long, default_value = DEFAULT_PROGRAM)]
    pandoc: PathBuf,

    /// Kill pandoc if one invocation runs longer than this many milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Read previously captured output from this directory instead of running pandoc.
    #[arg(long, conflicts_with_all = ["pandoc", "timeout_ms"])]
    from_dir: Option<PathBuf>,
}

impl SourceArgs {
    fn probe_config(&self) -> ProbeConfig {
        let config = ProbeConfig::default().with_program(&self.pandoc);
        match self.timeout_ms {
            Some(ms) => config.with_timeout(Duration::from_millis(ms)),
            None => config,
        }
    }

    fn text_source(&self) -> Result<Box<dyn TextSource>, String> {
        match &self.from_dir {
            Some(dir) => {
                let outputs = ToolOutputs::from_dir(dir).map_err(|err| err.to_string())?;
                Ok(Box::new(outputs))
            }
            None => Ok(Box::new(PandocCommand::new(self.probe_config()))),
        }
    }

    fn snapshot(&self) -> Result<CapabilitySnapshot, String> {
        let source = self.text_source()?;
        refresh(&source).map_err(|err| err.to_string())
    }
}

#[derive(Debug, Args)]
struct FormatArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct CheckFormatArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Identifier to check, e.g. `docx` or `markdown+footnotes-smart`.
    identifier: String,
}

#[derive(Debug, Args)]
struct CheckArgsArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Arguments as they would be passed to pandoc, output format first.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct CaptureArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Directory to write the captured output into (created if missing).
    #[arg(long)]
    output: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Snapshot(args) => run_snapshot(args).map(|()| true),
        Command::Options(args) => run_options(args).map(|()| true),
        Command::Schema(args) => run_schema(args).map(|()| true),
        Command::CheckFormat(args) => run_check_format(args),
        Command::CheckArgs(args) => run_check_args(args),
        Command::Capture(args) => run_capture(args).map(|()| true),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_REJECTED),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let subscriber = fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::warn!("Tracing subscriber already set; skipping re-initialization.");
    }
}

fn run_snapshot(args: FormatArgs) -> Result<(), String> {
    let snapshot = args.source.snapshot()?;
    let rendered = format_snapshot(&snapshot, args.format.into())?;
    print!("{rendered}");
    Ok(())
}

fn run_options(args: FormatArgs) -> Result<(), String> {
    let source = args.source.text_source()?;
    let help = source
        .capture(InfoFlag::Help)
        .map_err(|err| err.to_string())?;

    let mut parser = HelpParser::new(&help);
    let matches = parser.parse_lines();
    let rendered = format_options(&matches, parser.diagnostics(), args.format.into())?;
    print!("{rendered}");
    Ok(())
}

fn run_schema(args: FormatArgs) -> Result<(), String> {
    let schema = args.source.snapshot()?.build_argument_schema();

    let errors = validate_argument_schema(&schema);
    if !errors.is_empty() {
        let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
        return Err(format!(
            "Derived schema failed validation: {}",
            details.join("; ")
        ));
    }

    let rendered = format_schema(&schema, args.format.into())?;
    print!("{rendered}");
    Ok(())
}

fn run_check_format(args: CheckFormatArgs) -> Result<bool, String> {
    let snapshot = args.source.snapshot()?;
    let valid = snapshot.is_valid_output_format(&args.identifier);
    println!("{}", if valid { "valid" } else { "invalid" });
    Ok(valid)
}

fn run_check_args(args: CheckArgsArgs) -> Result<bool, String> {
    let schema = args.source.snapshot()?.build_argument_schema();

    match parse_invocation(&schema, &args.args) {
        Ok(parsed) => {
            let raw = serde_json::to_string_pretty(&parsed)
                .map_err(|err| format!("Failed to serialize parsed arguments: {err}"))?;
            println!("{raw}");
            Ok(true)
        }
        Err(err) => {
            eprint!("{err}");
            Ok(false)
        }
    }
}

fn run_capture(args: CaptureArgs) -> Result<(), String> {
    let source = args.source.text_source()?;
    let outputs = ToolOutputs::capture_all(&source).map_err(|err| err.to_string())?;
    let version = extract_version(&outputs.version).map_err(|err| err.to_string())?;

    outputs.write_to_dir(&args.output).map_err(|err| {
        format!(
            "Failed to write captures to '{}': {err}",
            args.output.display()
        )
    })?;

    println!(
        "Captured pandoc {version} output into '{}'.",
        args.output.display()
    );
    Ok(())
}
