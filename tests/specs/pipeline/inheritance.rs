// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `$super` inheritance and the `->` top-level-only prefix.

use crate::prelude::body;
use oxbow_core::Value;
use oxbow_engine::Container;
use serde_json::json;

#[tokio::test]
async fn super_inherits_the_previous_body_without_arrow_lines() {
    let container = Container::new();
    container.register_pipeline(
        "greet",
        &body("-> set input.debug true\nset input.base 1"),
        true,
    );
    container.register_pipeline("greet", &body("$super\nset input.extra 2\nget input"), true);

    let pipeline = container.get_pipeline("greet").unwrap();
    assert_eq!(
        pipeline.lines,
        vec!["set input.base 1", "set input.extra 2", "get input"]
    );

    let out = container
        .run_pipeline("greet", Value::object(), Value::Null)
        .await
        .unwrap();
    assert_eq!(out.to_json(), json!({"base": 1, "extra": 2}));
}

#[tokio::test]
async fn arrow_lines_run_at_top_level_but_not_in_callees() {
    let container = Container::new();
    container.register_pipeline(
        "traced",
        &body("-> set input.debug true\ninc input.v\nget input"),
        true,
    );
    container.register_pipeline("caller", &body("$traced\nget input"), true);

    let direct = container
        .run_pipeline("traced", Value::from_json(json!({"v": 0})), Value::Null)
        .await
        .unwrap();
    assert_eq!(direct.to_json(), json!({"v": 1, "debug": true}));

    let nested = container
        .run_pipeline("caller", Value::from_json(json!({"v": 0})), Value::Null)
        .await
        .unwrap();
    assert_eq!(nested.to_json(), json!({"v": 1}));
}

#[tokio::test]
async fn overwrite_false_keeps_the_registered_version() {
    let container = Container::new();
    container.register_pipeline("keep", &body("set input.v 1\nget input.v"), true);
    container.register_pipeline("keep", &body("set input.v 2\nget input.v"), false);

    let out = container
        .run_pipeline("keep", Value::object(), Value::Null)
        .await
        .unwrap();
    assert_eq!(out.to_json(), json!(1));
}
