// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test helpers for behavioral specifications.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use oxbow_core::Value;
use oxbow_engine::{Container, RuntimeError};
use std::io::Write;
use std::sync::Arc;

/// Split a source snippet into pipeline lines.
pub fn body(src: &str) -> Vec<String> {
    src.lines().map(str::to_string).collect()
}

/// Register `src` as a pipeline on a fresh container and run it.
pub async fn run_pipeline(src: &str, input: serde_json::Value) -> Result<Value, RuntimeError> {
    let container = Container::new();
    container.register_pipeline("spec", &body(src), true);
    container
        .run_pipeline("spec", Value::from_json(input), Value::Null)
        .await
}

/// Run `src` on an existing container under the `spec` tag.
pub async fn run_on(
    container: &Arc<Container>,
    src: &str,
    input: serde_json::Value,
) -> Result<Value, RuntimeError> {
    container.register_pipeline("spec", &body(src), true);
    container
        .run_pipeline("spec", Value::from_json(input), Value::Null)
        .await
}

/// Write an outline document to a temp file for cli specs.
pub fn outline_file(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// The `oxbow` binary under test.
pub fn oxbow() -> assert_cmd::Command {
    if std::env::var_os("CARGO_BIN_EXE_oxbow").is_none() {
        if let Ok(exe) = std::env::current_exe() {
            if let Some(debug_dir) = exe.parent().and_then(|deps| deps.parent()) {
                let bin = debug_dir.join("oxbow");
                if bin.is_file() {
                    std::env::set_var("CARGO_BIN_EXE_oxbow", bin);
                }
            }
        }
    }
    assert_cmd::Command::cargo_bin("oxbow").unwrap()
}

pub fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
