// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compiled pipelines and the tag-keyed store

use indexmap::IndexMap;
use oxbow_core::compare_wildcards;
use oxbow_dsl::{Instruction, PipelineSource};
use std::collections::HashMap;

/// A compiled pipeline stored under a tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    pub tag: String,
    /// Source lines after `$super` expansion; kept for inheritance.
    pub lines: Vec<String>,
    /// Name of the compiler that built this pipeline and will execute it.
    pub compiler: String,
    pub compiled: Vec<Instruction>,
}

/// Tag-keyed pipeline store with the memoized wildcard fallback and the
/// deferred child buckets.
#[derive(Default)]
pub(crate) struct PipelineStore {
    pipelines: IndexMap<String, Pipeline>,
    child: IndexMap<String, IndexMap<String, Vec<String>>>,
    best_tags: HashMap<String, String>,
}

impl PipelineStore {
    /// Store a pipeline, clearing the wildcard cache. With `overwrite`
    /// false an existing tag is kept and the call is a silent no-op.
    pub fn insert(&mut self, pipeline: Pipeline, overwrite: bool) {
        if !overwrite && self.pipelines.contains_key(&pipeline.tag) {
            return;
        }
        self.pipelines.insert(pipeline.tag.clone(), pipeline);
        self.best_tags.clear();
    }

    pub fn get(&self, tag: &str) -> Option<Pipeline> {
        self.pipelines.get(tag).cloned()
    }

    /// Source lines of the stored pipeline, for `$super` expansion.
    pub fn lines(&self, tag: &str) -> Option<Vec<String>> {
        self.pipelines.get(tag).map(|p| p.lines.clone())
    }

    /// Wildcard fallback over tags, memoized until the next registration.
    /// Either side may carry the wildcards.
    pub fn best(&mut self, tag: &str) -> Option<Pipeline> {
        if let Some(key) = self.best_tags.get(tag) {
            return self.pipelines.get(key).cloned();
        }
        let key = self
            .pipelines
            .keys()
            .find(|key| compare_wildcards(key, tag) || compare_wildcards(tag, key))?
            .clone();
        self.best_tags.insert(tag.to_string(), key.clone());
        self.pipelines.get(&key).cloned()
    }

    /// Defer a pipeline body to a named child container.
    pub fn insert_child(&mut self, child: &str, tag: &str, lines: Vec<String>, overwrite: bool) {
        let bucket = self.child.entry(child.to_string()).or_default();
        if !overwrite && bucket.contains_key(tag) {
            return;
        }
        bucket.insert(tag.to_string(), lines);
    }

    /// Pipelines deferred to `child`, in registration order.
    pub fn child_pipelines(&self, child: &str) -> Vec<PipelineSource> {
        self.child
            .get(child)
            .map(|bucket| {
                bucket
                    .iter()
                    .map(|(tag, lines)| PipelineSource {
                        tag: tag.clone(),
                        lines: lines.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub(crate) fn cached_best_tag(&self, tag: &str) -> Option<&str> {
        self.best_tags.get(tag).map(String::as_str)
    }
}
