//! Tests for the `findclass` binary.
//!
//! Argument errors never reach the VM, so those run everywhere. The lookups
//! need a JDK and are skipped when none is found.

use std::process::{Command, Output};

fn findclass(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_findclass"))
        .args(args)
        .env("JNIBRIDGE_LOG", "info")
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to run findclass")
}

/// Whether a JDK can be located through `JAVA_HOME` or `java` on `PATH`
fn java_available() -> bool {
    let found = std::env::var_os("JAVA_HOME").is_some_and(|home| !home.is_empty())
        || Command::new("java")
            .arg("-version")
            .output()
            .is_ok_and(|output| output.status.success());
    if !found {
        eprintln!("skipping: no JDK found (set JAVA_HOME or put java on PATH)");
    }
    found
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ────────────────────────────────────────────────────────────────────────────
// Argument errors
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_no_arguments_prints_usage() {
    let output = findclass(&[]);
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Usage"), "stderr: {}", stderr(&output));
    assert!(stdout(&output).is_empty());
    assert!(!stderr(&output).contains("starting Java VM"));
}

#[test]
fn test_two_arguments_prints_usage() {
    let output = findclass(&["java/lang/String", "java/lang/Object"]);
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Usage"), "stderr: {}", stderr(&output));
    assert!(stdout(&output).is_empty());
    assert!(!stderr(&output).contains("starting Java VM"));
}

#[test]
fn test_unknown_color_rejected() {
    let output = findclass(&["--color", "sometimes", "java/lang/String"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).is_empty());
}

// ────────────────────────────────────────────────────────────────────────────
// Lookups
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_existing_class_prints_reference() {
    if !java_available() {
        return;
    }

    let output = findclass(&["java/lang/String"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let token = stdout(&output);
    let token = token.trim();
    assert!(token.starts_with("0x"), "token: {}", token);
    assert_ne!(token, "0x0");
    assert!(stderr(&output).contains("found: java/lang/String"));
}

#[test]
fn test_missing_class_prints_null_token() {
    if !java_available() {
        return;
    }

    let output = findclass(&["does/not/Exist"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "0x0");
    assert!(stderr(&output).contains("not found: does/not/Exist"));
}

#[test]
fn test_print_writes_class_through_vm() {
    if !java_available() {
        return;
    }

    let output = findclass(&["--print", "java/lang/String"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let text = stdout(&output);
    let mut lines = text.lines();
    let token = lines.next().unwrap_or_default();
    assert!(token.starts_with("0x") && token != "0x0", "token: {}", token);
    assert_eq!(lines.next(), Some("class java.lang.String"));
}
