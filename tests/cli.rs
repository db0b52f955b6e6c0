use std::fs;
use std::path::Path;
use std::process::{Command, Output, Stdio};

/// Runs the built binary inside `dir` with an empty PATH, so no real
/// compiler is ever picked up.
fn hexscript(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_hexscript"))
        .arg("--no-pause")
        .args(args)
        .current_dir(dir)
        .env("PATH", dir)
        .env_remove("RUST_LOG")
        .stdin(Stdio::null())
        .output()
        .expect("failed to launch hexscript")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn no_source_exits_with_status_1() {
    let dir = tempfile::tempdir().unwrap();
    let output = hexscript(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("::Error: drop a .c/.cpp/.cxx file onto this program to build it"));
}

#[test]
fn missing_source_still_exits_0() {
    let dir = tempfile::tempdir().unwrap();
    let output = hexscript(dir.path(), &["missing.cpp"]);

    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert!(out.contains("Error: source file not found"));
    assert!(out.contains("::Done"));
}

#[test]
fn negative_run_flag_reaches_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("x.c"), "int main(void) { return 0; }\n").unwrap();
    let output = hexscript(dir.path(), &["x.c", "-1"]);

    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert!(out.contains("got '-1'; using '0'"));
    assert!(out.contains("Run flag: do not run"));
}

#[test]
fn extra_arguments_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("x.c"), "int main(void) { return 0; }\n").unwrap();
    let output = hexscript(dir.path(), &["x.c", "1", "extra", "-z"]);

    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert!(out.contains("Run flag: run"));
    // empty PATH, so the build stops at discovery
    assert!(out.contains("no usable C/C++ compiler found on PATH"));
}

#[test]
fn json_summary_follows_the_log() {
    let dir = tempfile::tempdir().unwrap();
    let output = hexscript(dir.path(), &["--json", "missing.c"]);

    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    let json_start = out.find("\n{").expect("no JSON on stdout") + 1;
    let summary: serde_json::Value = serde_json::from_str(&out[json_start..]).unwrap();
    assert_eq!(summary["final_stage"], "Compiling");
    assert_eq!(summary["run_flag"], "Skip");
}
