// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end pipeline execution: loops, literals, jumps, calls,
//! component references.

use crate::prelude::{body, run_on, run_pipeline};
use async_trait::async_trait;
use oxbow_core::{Component, NativeFn, Value};
use oxbow_engine::{Container, RuntimeError};
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn counter_loop_counts_to_three() {
    let src = "\
set input.count 0
label loop
inc input.count
lt input.count 3
je loop
get input";
    let out = run_pipeline(src, json!({})).await.unwrap();
    assert_eq!(out.to_json(), json!({"count": 3}));
}

#[tokio::test]
async fn quoted_literals_keep_internal_spaces() {
    let src = "\
set input.name \"Ada Lovelace\"
get input.name";
    let out = run_pipeline(src, json!({})).await.unwrap();
    assert_eq!(out.to_json(), json!("Ada Lovelace"));
}

#[tokio::test]
async fn conditional_jump_skips_or_hits() {
    let src = "\
set input.x 5
eq input.x 5
jne skip
set input.hit true
label skip
get input";
    let out = run_pipeline(src, json!({})).await.unwrap();
    assert_eq!(out.to_json(), json!({"x": 5, "hit": true}));

    let src = src.replace("eq input.x 5", "eq input.x 6");
    let out = run_pipeline(&src, json!({})).await.unwrap();
    assert_eq!(out.to_json(), json!({"x": 5}));
}

struct Greeter;

#[async_trait]
impl Component for Greeter {
    fn name(&self) -> &str {
        "greeter"
    }

    fn member(&self, name: &str) -> Option<Value> {
        match name {
            "hello" => Some(Value::Function(NativeFn::from_sync(|_input, args| {
                let who = args
                    .first()
                    .map(|arg| arg.value.to_string())
                    .unwrap_or_default();
                Ok(Value::String(format!("hi {who}")))
            }))),
            _ => None,
        }
    }
}

#[tokio::test]
async fn component_method_reference_passes_literal_args() {
    let container = Container::new();
    container.register("greeter", Arc::new(Greeter));
    let out = run_on(&container, "greeter.hello \"world\"", json!({}))
        .await
        .unwrap();
    assert_eq!(out.to_json(), json!("hi world"));
}

#[tokio::test]
async fn nested_calls_thread_the_input_through() {
    let container = Container::new();
    container.register_pipeline("child", &body("inc input.v"), true);
    let src = "\
$child
$child
get input";
    let out = run_on(&container, src, json!({"v": 0})).await.unwrap();
    assert_eq!(out.to_json(), json!({"v": 2}));
}

#[tokio::test]
async fn unbounded_recursion_stops_at_eleven_levels() {
    let container = Container::new();
    container.register_pipeline("loopy", &body("inc input.depth\n$loopy"), true);
    let err = container
        .run_pipeline("loopy", Value::from_json(json!({"depth": 0})), Value::Null)
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::PipelineDepthExceeded(11)));
}

#[tokio::test]
async fn missing_pipelines_are_reported_by_tag() {
    let container = Container::new();
    let err = container
        .run_pipeline("ghost", Value::object(), Value::Null)
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::PipelineNotFound(tag) if tag == "ghost"));
}

#[tokio::test]
async fn errors_unwind_without_further_execution() {
    struct Failing;

    #[async_trait]
    impl Component for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn runnable(&self) -> bool {
            true
        }

        async fn run(
            &self,
            _input: Value,
            _args: Vec<oxbow_core::Resolved>,
        ) -> Result<Value, oxbow_core::ComponentError> {
            Err(oxbow_core::ComponentError::Failed("boom".to_string()))
        }
    }

    let container = Container::new();
    container.register("failing", Arc::new(Failing));
    let witness = Arc::new(Greeter);
    container.register("greeter", witness);

    let src = "\
failing
greeter.hello \"never\"";
    let err = run_on(&container, src, json!({})).await.unwrap_err();
    assert!(matches!(err, RuntimeError::Component(_)));
}
