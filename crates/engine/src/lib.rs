// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! oxbow-engine: registry, path resolution and pipeline execution

pub mod compiler;
pub mod container;
pub mod error;
pub mod interpreter;
pub mod path;
pub mod pipeline;
pub mod registry;

pub use compiler::PipelineCompiler;
pub use container::{Container, Plugin, MAX_PIPELINE_DEPTH};
pub use error::RuntimeError;
pub use interpreter::{DefaultCompiler, DEFAULT_COMPILER};
pub use path::{
    build_literal, dec_value, delete_value, eq_value, ge_value, get_value, gt_value, inc_value,
    le_value, lt_value, neq_value, resolve_path, resolve_path_with_type, set_value, Scope,
};
pub use pipeline::Pipeline;
pub use registry::{Constructor, FactoryItem, FactorySlot};
