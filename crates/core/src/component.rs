// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Component seam: the trait registered items implement, and the native
//! callable type stored in values.

use crate::resolved::Resolved;
use crate::value::Value;
use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by components and native callables.
#[derive(Debug, Error)]
pub enum ComponentError {
    #[error("component {0} is not runnable")]
    NotRunnable(String),
    #[error("{0}")]
    Failed(String),
}

/// Shared handle to a registered component.
pub type ComponentHandle = Arc<dyn Component>;

/// Boxed future returned by native callables.
pub type NativeFuture = Pin<Box<dyn Future<Output = Result<Value, ComponentError>> + Send>>;

/// A reusable component living in the container.
///
/// Components are shared behind `Arc`, so every mutating hook takes `&self`;
/// interior mutability is the component's concern.
#[async_trait]
pub trait Component: Send + Sync {
    /// Name the component registers under when none is given explicitly.
    fn name(&self) -> &str;

    /// Class name recorded by the JSON bridge. Defaults to the name.
    fn class_name(&self) -> &str {
        self.name()
    }

    /// Look up a field or bound method. Methods come back as
    /// `Value::Function` closures already bound to this component.
    fn member(&self, _name: &str) -> Option<Value> {
        None
    }

    /// Whether this component exposes a `run` entry point.
    fn runnable(&self) -> bool {
        false
    }

    /// Entry point used when the component is referenced directly in a
    /// pipeline line. The return value becomes the pipeline's new input.
    async fn run(&self, _input: Value, _args: Vec<Resolved>) -> Result<Value, ComponentError> {
        Err(ComponentError::NotRunnable(self.name().to_string()))
    }

    /// Merge settings into the component. Invoked on every singleton fetch
    /// that carries a settings argument.
    fn apply_settings(&self, _settings: &Value) {}

    /// Snapshot of the current settings.
    fn settings(&self) -> Value {
        Value::Null
    }

    /// Startup hook awaited by the container in registration order.
    async fn start(&self) -> Result<(), ComponentError> {
        Ok(())
    }

    /// Field snapshot for the JSON bridge.
    fn to_json(&self) -> Value {
        Value::object()
    }

    /// Restore fields from a JSON bridge object (`className` already
    /// removed).
    fn from_json(&self, _fields: &Value) {}
}

/// A native callable stored in a [`Value`]. Cloning shares the closure.
#[derive(Clone)]
pub struct NativeFn(Arc<dyn Fn(Value, Vec<Resolved>) -> NativeFuture + Send + Sync>);

impl NativeFn {
    /// Wrap an async closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Value, Vec<Resolved>) -> NativeFuture + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Wrap a synchronous closure.
    pub fn from_sync<F>(f: F) -> Self
    where
        F: Fn(Value, Vec<Resolved>) -> Result<Value, ComponentError> + Send + Sync + 'static,
    {
        Self(Arc::new(move |input, args| {
            let out = f(input, args);
            Box::pin(std::future::ready(out))
        }))
    }

    /// Invoke with the current pipeline input and resolved arguments.
    pub async fn call(&self, input: Value, args: Vec<Resolved>) -> Result<Value, ComponentError> {
        (self.0)(input, args).await
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NativeFn")
    }
}

#[cfg(test)]
#[path = "component_tests.rs"]
mod tests;
