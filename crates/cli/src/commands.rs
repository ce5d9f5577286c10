// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI subcommands

use anyhow::{Context, Result};
use clap::Args;
use oxbow_core::Value;
use oxbow_dsl::parse_outline;
use oxbow_engine::Container;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct RunArgs {
    /// Outline file with `##` pipeline definitions
    pub file: PathBuf,

    /// Pipeline to run
    #[arg(long, default_value = "main")]
    pub pipeline: String,

    /// JSON input handed to the pipeline
    #[arg(long, default_value = "{}")]
    pub input: String,
}

pub async fn run(args: RunArgs) -> Result<()> {
    let text = read(&args.file)?;
    let input: serde_json::Value =
        serde_json::from_str(&args.input).context("invalid --input JSON")?;

    let container = Container::new();
    container.load_pipelines_from_string(&text);

    let out = container
        .run_pipeline(&args.pipeline, Value::from_json(input), Value::Null)
        .await?;
    println!("{}", serde_json::to_string_pretty(&out.to_json())?);
    Ok(())
}

#[derive(Args)]
pub struct CheckArgs {
    /// Outline file to compile
    pub file: PathBuf,
}

pub fn check(args: CheckArgs) -> Result<()> {
    let text = read(&args.file)?;
    let outline = parse_outline(&text);

    let container = Container::new();
    container.load_pipelines_from_string(&text);

    for section in &outline.sections {
        for pipeline in &section.pipelines {
            if section.is_own() {
                match container.get_pipeline(&pipeline.tag) {
                    Some(compiled) => println!(
                        "{}: {} instructions ({})",
                        compiled.tag,
                        compiled.compiled.len(),
                        compiled.compiler
                    ),
                    None => println!("{}: not registered", pipeline.tag),
                }
            } else {
                println!("{} (deferred to {})", pipeline.tag, section.name);
            }
        }
    }
    Ok(())
}

fn read(file: &Path) -> Result<String> {
    std::fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))
}
