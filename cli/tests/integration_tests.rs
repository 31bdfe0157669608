//! End-to-end tests for the `pandoc-schema` binary, run against captured
//! pandoc 2.9 output so no pandoc installation is needed.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("discovery")
        .join("tests")
        .join("fixtures")
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pandoc-schema"))
        .args(args)
        .output()
        .expect("failed to run pandoc-schema")
}

/// Runs a subcommand with `--from-dir` pointing at the fixtures.
fn run_offline(subcommand: &str, rest: &[&str]) -> Output {
    let dir = fixtures_dir();
    let mut args = vec![subcommand, "--from-dir", dir.to_str().unwrap()];
    args.extend_from_slice(rest);
    run(&args)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_snapshot_json_output() {
    let output = run_offline("snapshot", &[]);
    assert_success(&output);

    let text = stdout(&output);
    let parsed: serde_json::Value = serde_json::from_str(&text)
        .unwrap_or_else(|e| panic!("Invalid JSON output: {e}\n{text}"));
    assert_eq!(parsed["version"], "2.9");
    assert_eq!(parsed["options"].as_array().unwrap().len(), 73);
    assert!(
        parsed["output_formats"]
            .as_array()
            .unwrap()
            .iter()
            .any(|format| format == "docx")
    );
}

#[test]
fn test_snapshot_table_output() {
    let output = run_offline("snapshot", &["--format", "table"]);
    assert_success(&output);

    let text = stdout(&output);
    assert!(text.starts_with("pandoc 2.9\n"));
    assert!(text.contains("-f, -r, --from, --read"));
    assert!(text.contains("Output formats:"));
}

#[test]
fn test_options_report_diagnostics() {
    let output = run_offline("options", &[]);
    assert_success(&output);

    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed["diagnostics"]["recognized_lines"], 73);
    assert_eq!(parsed["diagnostics"]["sentinel_found"], true);
    assert_eq!(parsed["options"][0]["shape"], "multi_alias_value");
}

#[test]
fn test_schema_yaml_output() {
    let output = run_offline("schema", &["--format", "yaml"]);
    assert_success(&output);

    let text = stdout(&output);
    assert!(text.contains("output_format"));
    assert!(text.contains("--bibliography"));
    assert!(text.contains("repeatable: true"));
}

#[test]
fn test_check_format_exit_codes() {
    let valid = run_offline("check-format", &["markdown+footnotes-smart"]);
    assert_success(&valid);
    assert_eq!(stdout(&valid).trim(), "valid");

    let invalid = run_offline("check-format", &["pdf+footnotes"]);
    assert_eq!(invalid.status.code(), Some(2));
    assert_eq!(stdout(&invalid).trim(), "invalid");
}

#[test]
fn test_check_args_parses_invocation() {
    let output = run_offline(
        "check-args",
        &["--", "pdf", "-s", "--toc", "-V", "geometry=a4paper", "-V", "fontsize=12pt"],
    );
    assert_success(&output);

    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed["output_format"], "pdf");
    assert_eq!(parsed["flags"]["--standalone"], 1);
    assert_eq!(parsed["flags"]["--toc"], 1);
    assert_eq!(
        parsed["flags"]["--variable"],
        serde_json::json!(["geometry=a4paper", "fontsize=12pt"])
    );
}

#[test]
fn test_check_args_rejects_unknown_flag() {
    let output = run_offline("check-args", &["--", "pdf", "--no-such-option"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("--no-such-option"));
}

#[test]
fn test_capture_writes_replayable_directory() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("captures");

    let output = run_offline("capture", &["--output", target.to_str().unwrap()]);
    assert_success(&output);
    assert!(stdout(&output).contains("Captured pandoc 2.9"));
    assert_eq!(
        fs::read_to_string(target.join("help.txt")).unwrap(),
        fs::read_to_string(fixtures_dir().join("help.txt")).unwrap()
    );

    let replay = run(&["check-format", "--from-dir", target.to_str().unwrap(), "docx"]);
    assert_success(&replay);
}

#[test]
fn test_missing_pandoc_reports_error() {
    let output = run(&["snapshot", "--pandoc", "/nonexistent/pandoc-for-tests"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("error: failed to run"), "stderr: {stderr}");
}

#[test]
fn test_missing_capture_directory_reports_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&["snapshot", "--from-dir", dir.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("version.txt"));
}
