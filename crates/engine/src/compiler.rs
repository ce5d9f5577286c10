// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compiler plug-in contract

use crate::container::Container;
use crate::error::RuntimeError;
use async_trait::async_trait;
use oxbow_core::Value;
use oxbow_dsl::Instruction;
use std::sync::Arc;

/// A pipeline compiler: builds instruction vectors from source lines and
/// executes them against a container.
///
/// Compilers are registered by name and selected per pipeline through a
/// leading `// compiler=NAME` comment. Every container carries the
/// `default` compiler.
#[async_trait]
pub trait PipelineCompiler: Send + Sync {
    /// Name pipelines select this compiler by.
    fn name(&self) -> &str;

    /// Compile source lines into instructions.
    fn compile(&self, lines: &[String]) -> Vec<Instruction>;

    /// Execute a compiled program. `this` is the object bound to the
    /// `this` path root; `depth` counts nested pipeline calls.
    async fn execute(
        &self,
        container: &Arc<Container>,
        compiled: &[Instruction],
        input: Value,
        this: Value,
        depth: usize,
    ) -> Result<Value, RuntimeError>;
}
