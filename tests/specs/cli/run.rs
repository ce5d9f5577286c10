// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Black-box specs for `oxbow run` and `oxbow check`.

use crate::prelude::{outline_file, oxbow, stderr_of, stdout_of};

const COUNTER: &str = "\
# Pipelines
## main
set input.count 0
label loop
inc input.count
lt input.count 3
je loop
get input

## greet
set input.greeting \"hello there\"
get input.greeting
";

#[test]
fn run_executes_main_by_default() {
    let file = outline_file(COUNTER);
    let output = oxbow().arg("run").arg(file.path()).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(stdout_of(&output).contains("\"count\": 3"));
}

#[test]
fn run_selects_a_pipeline_by_name() {
    let file = outline_file(COUNTER);
    let output = oxbow()
        .arg("run")
        .arg(file.path())
        .arg("--pipeline")
        .arg("greet")
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(stdout_of(&output).contains("hello there"));
}

#[test]
fn run_accepts_json_input() {
    let file = outline_file(
        "\
## main
inc input.v 2
get input
",
    );
    let output = oxbow()
        .arg("run")
        .arg(file.path())
        .arg("--input")
        .arg("{\"v\": 40}")
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(stdout_of(&output).contains("\"v\": 42"));
}

#[test]
fn run_fails_for_a_missing_pipeline() {
    let file = outline_file(COUNTER);
    let output = oxbow()
        .arg("run")
        .arg(file.path())
        .arg("--pipeline")
        .arg("ghost")
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("pipeline not found: ghost"));
}

#[test]
fn run_rejects_invalid_input_json() {
    let file = outline_file(COUNTER);
    let output = oxbow()
        .arg("run")
        .arg(file.path())
        .arg("--input")
        .arg("not json")
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("invalid --input JSON"));
}

#[test]
fn run_fails_for_a_missing_file() {
    let output = oxbow()
        .arg("run")
        .arg("/definitely/not/here.md")
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("failed to read"));
}

#[test]
fn check_lists_pipelines_with_instruction_counts() {
    let file = outline_file(
        "\
# Pipelines
## main
set input.a 1
get input

# helper-bot
## assist
get input
",
    );
    let output = oxbow().arg("check").arg(file.path()).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    let stdout = stdout_of(&output);
    assert!(stdout.contains("main: 2 instructions (default)"));
    assert!(stdout.contains("assist (deferred to helper-bot)"));
}
