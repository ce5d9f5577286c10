// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Container registry behavior: identity, settings, wildcards, the JSON
//! bridge and the outline loader.

use async_trait::async_trait;
use oxbow_core::{Component, ComponentHandle, Value};
use oxbow_engine::Container;
use parking_lot::RwLock;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct Probe {
    name: String,
}

#[async_trait]
impl Component for Probe {
    fn name(&self) -> &str {
        &self.name
    }
}

fn probe(name: &str) -> ComponentHandle {
    Arc::new(Probe {
        name: name.to_string(),
    })
}

#[test]
fn wildcard_lookups_return_the_same_object_as_strict_ones() {
    let container = Container::new();
    container.register("token-xx", probe("token-xx"));

    let strict = container.get("token-xx", None).unwrap();
    let miss_then_memoized = container.get("token-*", None).unwrap();
    let cache_hit = container.get("token-*", None).unwrap();

    assert!(Arc::ptr_eq(&strict, &miss_then_memoized));
    assert!(Arc::ptr_eq(&strict, &cache_hit));

    // A later registration invalidates the cache; the lookup still wins
    // by registration order.
    container.register("token-abc", probe("token-abc"));
    let after = container.get("token-*", None).unwrap();
    assert!(Arc::ptr_eq(&strict, &after));
}

#[test]
fn settings_are_applied_on_every_singleton_fetch() {
    #[derive(Default)]
    struct Configurable {
        applied: AtomicUsize,
    }

    #[async_trait]
    impl Component for Configurable {
        fn name(&self) -> &str {
            "configurable"
        }

        fn apply_settings(&self, _settings: &Value) {
            self.applied.fetch_add(1, Ordering::SeqCst);
        }
    }

    let container = Container::new();
    let component = Arc::new(Configurable::default());
    container.register("configurable", component.clone());

    let cfg1 = Value::from_json(json!({"a": 1}));
    let cfg2 = Value::from_json(json!({"a": 2}));
    let first = container.get("configurable", Some(&cfg1)).unwrap();
    let second = container.get("configurable", Some(&cfg2)).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(component.applied.load(Ordering::SeqCst), 2);
}

#[test]
fn registration_is_idempotent_for_lookups() {
    let container = Container::new();
    container.register("item", probe("item"));
    let first = container.get("item", None).unwrap();
    let second = container.get("item", None).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[derive(Default)]
struct Profile {
    fields: RwLock<Value>,
}

#[async_trait]
impl Component for Profile {
    fn name(&self) -> &str {
        "profile"
    }

    fn class_name(&self) -> &str {
        "Profile"
    }

    fn member(&self, name: &str) -> Option<Value> {
        self.fields.read().member(name)
    }

    fn to_json(&self) -> Value {
        self.fields.read().clone()
    }

    fn from_json(&self, fields: &Value) {
        *self.fields.write() = fields.clone();
    }
}

#[test]
fn json_round_trip_preserves_fields_and_drops_class_name() {
    let container = Container::new();
    container.add_class(
        "Profile",
        Arc::new(|_, _| Arc::new(Profile::default()) as ComponentHandle),
    );

    let original = Arc::new(Profile::default());
    original.from_json(&Value::from_json(json!({"user": "ada"})));
    let handle: ComponentHandle = original;

    let snapshot = container.to_json(&handle);
    assert_eq!(snapshot.member("className"), Some(Value::from("Profile")));

    let rebuilt = container.from_json(&snapshot, None);
    let Value::Handle(component) = rebuilt else {
        panic!("expected a component handle");
    };
    assert_eq!(component.member("user"), Some(Value::from("ada")));
    assert_eq!(component.member("className"), None);
}

#[tokio::test]
async fn loader_registers_own_sections_and_defers_children() {
    let container = Container::new();
    container.load_pipelines_from_string(
        "\
# Default
## main
set input.ok true
get input

# assistant
## greet
get input.name
",
    );

    let out = container.start().await.unwrap();
    assert_eq!(out.to_json(), json!({"ok": true}));

    assert!(container.get_pipeline("greet").is_none());
    let deferred = container.child_pipelines("assistant");
    assert_eq!(deferred.len(), 1);
    assert_eq!(deferred[0].tag, "greet");
}

#[test]
fn child_containers_fall_back_to_their_parent() {
    let parent = Container::new();
    parent.register("shared", probe("shared"));
    parent.register_configuration("cfg", Value::from_json(json!({"a": 1})), true);

    let child = Container::with_parent(&parent);
    assert!(child.get("shared", None).is_some());
    assert_eq!(
        child.get_configuration("cfg").unwrap().to_json(),
        json!({"a": 1})
    );
}
