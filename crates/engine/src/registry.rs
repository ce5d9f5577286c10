// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Component registry: classes, factory items, configurations

use crate::container::Container;
use indexmap::IndexMap;
use oxbow_core::{compare_wildcards, ComponentHandle, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Constructor invoked to build a component instance from settings.
pub type Constructor = Arc<dyn Fn(Value, &Arc<Container>) -> ComponentHandle + Send + Sync>;

/// How a factory item produces instances.
#[derive(Clone)]
pub enum FactorySlot {
    /// One live instance shared by every `get`.
    Singleton(ComponentHandle),
    /// A constructor invoked on each `get`.
    PerGet(Constructor),
}

/// A registered factory entry.
#[derive(Clone)]
pub struct FactoryItem {
    pub name: String,
    pub slot: FactorySlot,
}

impl FactoryItem {
    pub fn is_singleton(&self) -> bool {
        matches!(self.slot, FactorySlot::Singleton(_))
    }
}

/// Container-scoped registry with the memoized wildcard fallback.
///
/// The factory preserves insertion order: wildcard lookup returns the
/// first registered key that matches, so order is semantic.
#[derive(Default)]
pub struct Registry {
    classes: IndexMap<String, Constructor>,
    factory: IndexMap<String, FactoryItem>,
    configurations: IndexMap<String, Value>,
    best_keys: HashMap<String, String>,
}

impl Registry {
    pub fn add_class(&mut self, name: &str, ctor: Constructor) {
        self.classes.insert(name.to_string(), ctor);
        self.best_keys.clear();
    }

    pub fn class(&self, name: &str) -> Option<Constructor> {
        self.classes.get(name).cloned()
    }

    /// Install a factory item under `name`, clearing the wildcard cache.
    pub fn insert_item(&mut self, name: &str, slot: FactorySlot) {
        self.factory.insert(
            name.to_string(),
            FactoryItem {
                name: name.to_string(),
                slot,
            },
        );
        self.best_keys.clear();
    }

    /// Strict lookup.
    pub fn item(&self, name: &str) -> Option<FactoryItem> {
        self.factory.get(name).cloned()
    }

    pub fn contains_item(&self, name: &str) -> bool {
        self.factory.contains_key(name)
    }

    /// Wildcard fallback: the first registered key matching `name` as a
    /// glob, in registration order. Either side may carry the wildcards:
    /// keys register patterns like `ner-??-process`, and lookups may probe
    /// with patterns like `token-*`. Hits are memoized until the next
    /// registration.
    pub fn best_item(&mut self, name: &str) -> Option<FactoryItem> {
        if let Some(key) = self.best_keys.get(name) {
            return self.factory.get(key).cloned();
        }
        let key = self
            .factory
            .keys()
            .find(|key| compare_wildcards(key, name) || compare_wildcards(name, key))?
            .clone();
        self.best_keys.insert(name.to_string(), key.clone());
        self.factory.get(&key).cloned()
    }

    /// Store a configuration; with `overwrite` false an existing entry is
    /// kept and the call is a silent no-op.
    pub fn set_configuration(&mut self, tag: &str, configuration: Value, overwrite: bool) {
        if !overwrite && self.configurations.contains_key(tag) {
            return;
        }
        self.configurations.insert(tag.to_string(), configuration);
        self.best_keys.clear();
    }

    /// Strict configuration lookup.
    pub fn configuration(&self, tag: &str) -> Option<Value> {
        self.configurations.get(tag).cloned()
    }

    /// Wildcard configuration lookup (uncached).
    pub fn best_configuration(&self, tag: &str) -> Option<Value> {
        self.configurations
            .iter()
            .find(|(key, _)| compare_wildcards(key, tag) || compare_wildcards(tag, key))
            .map(|(_, cfg)| cfg.clone())
    }

    /// Singleton instances in registration order, for startup.
    pub fn singletons(&self) -> Vec<ComponentHandle> {
        self.factory
            .values()
            .filter_map(|item| match &item.slot {
                FactorySlot::Singleton(handle) => Some(Arc::clone(handle)),
                FactorySlot::PerGet(_) => None,
            })
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn cached_best_key(&self, name: &str) -> Option<&str> {
        self.best_keys.get(name).map(String::as_str)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
