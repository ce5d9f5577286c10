// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for pipeline execution

use oxbow_core::ComponentError;
use thiserror::Error;

/// Errors that can unwind out of a pipeline run.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("pipeline depth exceeded at {0}")]
    PipelineDepthExceeded(usize),
    #[error("pipeline not found: {0}")]
    PipelineNotFound(String),
    #[error("path not found: {0}")]
    PathNotFound(String),
    #[error("method not found: {0}")]
    MethodNotFound(String),
    #[error("compiler not found: {0}")]
    CompilerNotFound(String),
    #[error("invalid instruction: {0}")]
    InvalidInstruction(String),
    #[error("component error: {0}")]
    Component(#[from] ComponentError),
}
