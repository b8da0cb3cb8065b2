use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_numtower(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_numtower"))
        .args(args)
        .env_remove("NUMTOWER_CONFIG")
        .env_remove("NUMTOWER_TOLERANCE")
        .env_remove("NUMTOWER_ZERO_SNAP")
        .env("NUMTOWER_LOG", "off")
        .output()
        .expect("Failed to execute numtower binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[test]
fn help_lists_commands() {
    let output = run_numtower(&["--help"]);
    assert!(output.status.success());
    let text = stdout(&output);
    for command in ["op", "unary", "fn", "stat"] {
        assert!(text.contains(command), "missing {command}");
    }
}

#[test]
fn prints_canonical_result() {
    let output = run_numtower(&["op", "+", "3-2i", "1+0i+0j+0k"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "4-2i");

    let output = run_numtower(&["op", "**", "[[1,1],[1,0]]", "10"]);
    assert_eq!(stdout(&output), "[[89,55],[55,34]]");
}

#[test]
fn undefined_exits_with_two() {
    let output = run_numtower(&["op", "+", "<1,2>", "[[1,2]]"]);
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout(&output), "undefined");
}

#[test]
fn errors_exit_with_one() {
    let output = run_numtower(&["unary", "normalize", "<0,0>"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).starts_with("error: "));

    let output = run_numtower(&["stat", "median", "1+1i", "2"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn statistics_with_extra_operand() {
    let output = run_numtower(&["stat", "percentileOf", "--extra", "3", "1", "2", "3", "4"]);
    assert_eq!(stdout(&output), "62.5");
}

#[test]
fn config_file_tolerance_applies() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("loose.toml");
    fs::write(&path, "[engine]\nequality_tolerance = 0.1\n").unwrap();

    let strict = run_numtower(&["op", "==", "1", "1.05"]);
    assert_eq!(stdout(&strict), "0");

    let loose = run_numtower(&["--config", path.to_str().unwrap(), "op", "==", "1", "1.05"]);
    assert_eq!(stdout(&loose), "1");
}

#[test]
fn missing_config_file_fails() {
    let output = run_numtower(&["--config", "/nonexistent/numtower.toml", "fn", "exp", "0"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to"));
}

#[test]
fn config_discovery_is_logged_at_flag_level() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("quiet.yaml");
    fs::write(&path, "logging:\n  level: error\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_numtower"))
        .args(["--log-level", "info", "op", "+", "1", "2"])
        .env("NUMTOWER_CONFIG", &path)
        .env_remove("NUMTOWER_LOG")
        .env_remove("RUST_LOG")
        .env_remove("NUMTOWER_LOG_LEVEL")
        .env_remove("NUMTOWER_DEBUG")
        .output()
        .expect("Failed to execute numtower binary");

    assert_eq!(stdout(&output), "3");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Loading configuration from"), "stderr: {stderr}");
}
