//! CLI integration tests for critpath.
//!
//! These tests run the compiled binary against command files and stdin.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::{NamedTempFile, TempDir};

fn critpath() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_critpath"));
    cmd.env_remove("RUST_LOG")
        .env_remove("CRITPATH_COLOR")
        .env_remove("CRITPATH_SENTINEL")
        .env("NO_COLOR", "1");
    cmd
}

fn script_file(script: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(script.as_bytes()).unwrap();
    file
}

fn run_file(path: &Path, args: &[&str]) -> Output {
    critpath().arg(path).args(args).output().unwrap()
}

fn run_stdin(script: &str, args: &[&str]) -> Output {
    let mut child = critpath()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(script.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

const TRIANGLE: &str = "\
ADD_NODE A
ADD_NODE B
ADD_NODE C
ADD_EDGE A B 3
ADD_EDGE A C 1
ADD_EDGE C B 5
ROOT A
PRINT_RPO
FIND_CRITICAL_PATH A B
END
";

#[test]
fn test_reads_commands_from_file() {
    let file = script_file(TRIANGLE);
    let output = run_file(file.path(), &[]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "A C B \nA->C->B\n");
}

#[test]
fn test_reads_commands_from_stdin() {
    let output = run_stdin(TRIANGLE, &[]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "A C B \nA->C->B\n");
}

#[test]
fn test_command_failures_keep_exit_code_zero() {
    let output = run_stdin("ROOT nowhere\nFLY\nEND\n", &[]);

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "Node \"nowhere\" does not exist\nUnknown command: FLY\n"
    );
}

#[test]
fn test_json_output() {
    let file = script_file(TRIANGLE);
    let output = run_file(file.path(), &["--json"]);

    assert!(output.status.success());
    let lines: Vec<serde_json::Value> = stdout(&output)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 9);
    assert!(lines.iter().all(|line| line["status"] == "ok"));
    assert_eq!(lines[8]["total_weight"], 6);
}

#[test]
fn test_sentinel_flag() {
    let output = run_stdin("ADD_NODE A\nEND\nSTOP\nADD_NODE A\n", &["--sentinel", "STOP"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "Unknown command: END\n");
}

#[test]
fn test_sentinel_from_environment() {
    let output = critpath()
        .env("CRITPATH_SENTINEL", "DONE")
        .arg(script_file("ADD_NODE A\nDONE\nADD_NODE A\n").path())
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout(&output), "");
}

#[test]
fn test_missing_input_file_fails() {
    let dir = TempDir::new().unwrap();
    let output = run_file(&dir.path().join("missing.txt"), &[]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to open"), "stderr: {stderr}");
}

#[test]
fn test_logs_stay_off_stdout() {
    let output = run_stdin("ADD_NODE A\nROOT A\nPRINT_RPO\nEND\n", &["-vv"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "A \n");
    assert!(!output.stderr.is_empty());
}
