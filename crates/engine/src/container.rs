// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Container façade
//!
//! Ties the registry, the compiler table and the pipeline store together,
//! loads outline documents, and dispatches pipeline runs. Containers are
//! shared behind `Arc`; children hold a non-owning handle to their parent
//! and fall back to it on lookups.

use crate::compiler::PipelineCompiler;
use crate::error::RuntimeError;
use crate::interpreter::{DefaultCompiler, DEFAULT_COMPILER};
use crate::pipeline::{Pipeline, PipelineStore};
use crate::registry::{Constructor, FactorySlot, Registry};
use indexmap::IndexMap;
use oxbow_core::{Component, ComponentHandle, Value};
use oxbow_dsl::{compiler_directive, expand_super, parse_outline, PipelineSource};
use parking_lot::RwLock;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Weak};
use tracing::Instrument;

/// Maximum nesting of pipeline calls before a run is aborted.
pub const MAX_PIPELINE_DEPTH: usize = 10;

/// What [`Container::install`] can put into a container.
pub enum Plugin {
    /// A ready component instance.
    Component(ComponentHandle),
    /// A constructor, instantiated on install with null settings.
    Constructor(Constructor),
    /// A pipeline compiler.
    Compiler(Arc<dyn PipelineCompiler>),
}

/// A scoped registry of components, configurations, compilers and
/// pipelines.
pub struct Container {
    registry: RwLock<Registry>,
    pipelines: RwLock<PipelineStore>,
    compilers: RwLock<IndexMap<String, Arc<dyn PipelineCompiler>>>,
    parent: RwLock<Option<Weak<Container>>>,
}

impl Container {
    /// Create an empty container with the default compiler installed.
    pub fn new() -> Arc<Self> {
        let container = Arc::new(Self {
            registry: RwLock::new(Registry::default()),
            pipelines: RwLock::new(PipelineStore::default()),
            compilers: RwLock::new(IndexMap::new()),
            parent: RwLock::new(None),
        });
        container.register_compiler(Arc::new(DefaultCompiler));
        container
    }

    /// Create a child container that falls back to `parent` on lookups.
    pub fn with_parent(parent: &Arc<Self>) -> Arc<Self> {
        let child = Self::new();
        *child.parent.write() = Some(Arc::downgrade(parent));
        child
    }

    fn parent(&self) -> Option<Arc<Self>> {
        self.parent.read().as_ref().and_then(Weak::upgrade)
    }

    // === Registry ===

    /// Index a constructor under a class name for the JSON bridge.
    pub fn add_class(&self, name: &str, ctor: Constructor) {
        self.registry.write().add_class(name, ctor);
    }

    /// Install a singleton instance.
    pub fn register(&self, name: &str, component: ComponentHandle) {
        self.registry
            .write()
            .insert_item(name, FactorySlot::Singleton(component));
    }

    /// Install a constructor. Singletons are built immediately with null
    /// settings; otherwise the constructor runs on each `get`.
    pub fn register_factory(self: &Arc<Self>, name: &str, ctor: Constructor, is_singleton: bool) {
        let slot = if is_singleton {
            FactorySlot::Singleton(ctor(Value::Null, self))
        } else {
            FactorySlot::PerGet(ctor)
        };
        self.registry.write().insert_item(name, slot);
    }

    /// Fetch a component: strict lookup, then the parent chain, then the
    /// first wildcard match in registration order. Singletons receive
    /// `apply_settings` whenever settings are supplied and stay
    /// identity-stable; per-get items are constructed fresh.
    pub fn get(self: &Arc<Self>, name: &str, settings: Option<&Value>) -> Option<ComponentHandle> {
        let item = self.registry.read().item(name);
        let item = match item {
            Some(item) => Some(item),
            None => {
                if let Some(parent) = self.parent() {
                    if let Some(handle) = parent.get(name, settings) {
                        return Some(handle);
                    }
                }
                None
            }
        };
        let item = match item {
            Some(item) => item,
            None => self.registry.write().best_item(name)?,
        };
        match item.slot {
            FactorySlot::Singleton(handle) => {
                if let Some(settings) = settings {
                    handle.apply_settings(settings);
                }
                Some(handle)
            }
            FactorySlot::PerGet(ctor) => {
                let settings = settings.cloned().unwrap_or_default();
                Some(ctor(settings, self))
            }
        }
    }

    /// Store a configuration under a tag. With `overwrite` false an
    /// existing entry is kept.
    pub fn register_configuration(&self, tag: &str, configuration: Value, overwrite: bool) {
        self.registry
            .write()
            .set_configuration(tag, configuration, overwrite);
    }

    /// Fetch a configuration: strict, then parent chain, then wildcard.
    pub fn get_configuration(self: &Arc<Self>, tag: &str) -> Option<Value> {
        if let Some(configuration) = self.registry.read().configuration(tag) {
            return Some(configuration);
        }
        if let Some(parent) = self.parent() {
            if let Some(configuration) = parent.get_configuration(tag) {
                return Some(configuration);
            }
        }
        self.registry.read().best_configuration(tag)
    }

    /// Install a plug-in and return the name it registered under.
    pub fn install(
        self: &Arc<Self>,
        plugin: Plugin,
        name: Option<&str>,
        is_singleton: bool,
        only_if_not_exists: bool,
    ) -> String {
        match plugin {
            Plugin::Compiler(compiler) => {
                let chosen = match name {
                    Some(name) => name.to_string(),
                    None => compiler.name().to_string(),
                };
                self.compilers.write().insert(chosen.clone(), compiler);
                chosen
            }
            Plugin::Component(component) => {
                let chosen = match name {
                    Some(name) => name.to_string(),
                    None => component.name().to_string(),
                };
                if only_if_not_exists && self.registry.read().contains_item(&chosen) {
                    return chosen;
                }
                self.register(&chosen, component);
                chosen
            }
            Plugin::Constructor(ctor) => {
                let instance = ctor(Value::Null, self);
                let chosen = match name {
                    Some(name) => name.to_string(),
                    None => instance.name().to_string(),
                };
                if only_if_not_exists && self.registry.read().contains_item(&chosen) {
                    return chosen;
                }
                if is_singleton {
                    self.register(&chosen, instance);
                } else {
                    self.register_factory(&chosen, ctor, false);
                }
                chosen
            }
        }
    }

    // === JSON bridge ===

    /// Snapshot a component with its class name recorded.
    pub fn to_json(&self, component: &ComponentHandle) -> Value {
        let mut fields = match component.to_json() {
            Value::Object(map) => map,
            _ => IndexMap::new(),
        };
        fields.insert(
            "className".to_string(),
            Value::String(component.class_name().to_string()),
        );
        Value::Object(fields)
    }

    /// Rebuild from a snapshot: look up `className` in the registered
    /// classes, construct, and let the instance restore its fields. When
    /// the class is unknown the object comes back plain, class name
    /// removed either way.
    pub fn from_json(self: &Arc<Self>, snapshot: &Value, settings: Option<&Value>) -> Value {
        let Value::Object(map) = snapshot else {
            return snapshot.clone();
        };
        let mut fields = map.clone();
        let class_name = match fields.shift_remove("className") {
            Some(Value::String(name)) => Some(name),
            _ => None,
        };
        let ctor = class_name
            .as_deref()
            .and_then(|name| self.registry.read().class(name));
        match ctor {
            Some(ctor) => {
                let instance = ctor(settings.cloned().unwrap_or_default(), self);
                instance.from_json(&Value::Object(fields));
                Value::Handle(instance)
            }
            None => Value::Object(fields),
        }
    }

    // === Compilers ===

    /// Register a compiler under its own name.
    pub fn register_compiler(&self, compiler: Arc<dyn PipelineCompiler>) {
        let name = compiler.name().to_string();
        self.compilers.write().insert(name, compiler);
    }

    pub fn compiler(&self, name: &str) -> Option<Arc<dyn PipelineCompiler>> {
        self.compilers.read().get(name).cloned()
    }

    // === Pipelines ===

    /// Expand `$super` against the previous body, pick the compiler from a
    /// leading `// compiler=NAME` directive, and compile. Unknown
    /// directives fall back to the default compiler.
    pub fn build_pipeline(&self, lines: &[String], prev: Option<&[String]>) -> Pipeline {
        let lines = expand_super(lines, prev.unwrap_or(&[]));
        let directive = compiler_directive(&lines).map(str::to_string);
        let compiler_name = match directive {
            Some(name) if self.compilers.read().contains_key(&name) => name,
            Some(name) => {
                tracing::warn!(compiler = %name, "compiler not registered, falling back to default");
                DEFAULT_COMPILER.to_string()
            }
            None => DEFAULT_COMPILER.to_string(),
        };
        // A directive line selects the compiler; only the lines after it
        // are handed over.
        let body = if compiler_directive(&lines).is_some() {
            lines.get(1..).unwrap_or(&[])
        } else {
            &lines[..]
        };
        let compiled = match self.compiler(&compiler_name) {
            Some(compiler) => compiler.compile(body),
            None => Vec::new(),
        };
        Pipeline {
            tag: String::new(),
            lines,
            compiler: compiler_name,
            compiled,
        }
    }

    /// Compile and store a pipeline. With `overwrite` false an existing
    /// tag is kept and the call is a silent no-op. On overwrite the
    /// previous body feeds `$super` expansion.
    pub fn register_pipeline(&self, tag: &str, lines: &[String], overwrite: bool) {
        let prev = self.pipelines.read().lines(tag);
        if prev.is_some() && !overwrite {
            return;
        }
        let mut pipeline = self.build_pipeline(lines, prev.as_deref());
        pipeline.tag = tag.to_string();
        self.pipelines.write().insert(pipeline, true);
    }

    /// Defer a pipeline body to a named child container. Nothing in the
    /// engine replays these; collaborators that assemble child containers
    /// read them back through [`Container::child_pipelines`].
    pub fn register_pipeline_for_child(
        &self,
        child: &str,
        tag: &str,
        lines: &[String],
        overwrite: bool,
    ) {
        self.pipelines
            .write()
            .insert_child(child, tag, lines.to_vec(), overwrite);
    }

    /// Pipelines deferred to `child`, in registration order.
    pub fn child_pipelines(&self, child: &str) -> Vec<PipelineSource> {
        self.pipelines.read().child_pipelines(child)
    }

    /// Fetch a pipeline: strict, then the parent chain, then memoized
    /// wildcard lookup.
    pub fn get_pipeline(&self, tag: &str) -> Option<Pipeline> {
        if let Some(pipeline) = self.pipelines.read().get(tag) {
            return Some(pipeline);
        }
        if let Some(parent) = self.parent() {
            if let Some(pipeline) = parent.get_pipeline(tag) {
                return Some(pipeline);
            }
        }
        self.pipelines.write().best(tag)
    }

    /// Load pipelines from an outline document. Sections named `default`
    /// or `pipelines` (case-insensitive) register into this container;
    /// any other section defers its pipelines to the named child.
    pub fn load_pipelines_from_string(&self, text: &str) {
        let outline = parse_outline(text);
        for section in &outline.sections {
            for pipeline in &section.pipelines {
                if section.is_own() {
                    self.register_pipeline(&pipeline.tag, &pipeline.lines, true);
                } else {
                    self.register_pipeline_for_child(
                        &section.name,
                        &pipeline.tag,
                        &pipeline.lines,
                        true,
                    );
                }
            }
        }
    }

    /// Run a registered pipeline with the given input.
    pub async fn run_pipeline(
        self: &Arc<Self>,
        tag: &str,
        input: Value,
        this: Value,
    ) -> Result<Value, RuntimeError> {
        self.run_pipeline_at_depth(tag, input, this, 0).await
    }

    /// Run an unregistered body. It is registered under a synthetic tag
    /// derived from its lines so repeated runs reuse the compiled form.
    pub async fn run_pipeline_lines(
        self: &Arc<Self>,
        lines: &[String],
        input: Value,
        this: Value,
    ) -> Result<Value, RuntimeError> {
        let tag = serde_json::to_string(lines).unwrap_or_default();
        let registered = self.pipelines.read().get(&tag).is_some();
        if !registered {
            self.register_pipeline(&tag, lines, true);
        }
        self.run_pipeline(&tag, input, this).await
    }

    /// Recursive dispatch used by `$call` tokens. Boxed so nested calls
    /// can reuse it from inside the interpreter.
    pub fn run_pipeline_at_depth(
        self: &Arc<Self>,
        tag: &str,
        input: Value,
        this: Value,
        depth: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Value, RuntimeError>> + Send + 'static>> {
        let container = Arc::clone(self);
        let tag = tag.to_string();
        Box::pin(async move {
            if depth > MAX_PIPELINE_DEPTH {
                return Err(RuntimeError::PipelineDepthExceeded(depth));
            }
            let pipeline = container
                .get_pipeline(&tag)
                .ok_or_else(|| RuntimeError::PipelineNotFound(tag.clone()))?;
            container.execute_pipeline(&pipeline, input, this, depth).await
        })
    }

    async fn execute_pipeline(
        self: &Arc<Self>,
        pipeline: &Pipeline,
        input: Value,
        this: Value,
        depth: usize,
    ) -> Result<Value, RuntimeError> {
        let compiler = self
            .compiler(&pipeline.compiler)
            .ok_or_else(|| RuntimeError::CompilerNotFound(pipeline.compiler.clone()))?;

        let span = tracing::info_span!("pipeline", tag = %pipeline.tag, depth);

        let start = std::time::Instant::now();
        let result = compiler
            .execute(self, &pipeline.compiled, input, this, depth)
            .instrument(span)
            .await;
        let elapsed = start.elapsed();

        match &result {
            Ok(_) => tracing::debug!(
                tag = %pipeline.tag,
                elapsed_ms = elapsed.as_millis() as u64,
                "pipeline completed"
            ),
            Err(e) => tracing::error!(
                tag = %pipeline.tag,
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "pipeline failed"
            ),
        }

        result
    }

    // === Lifecycle ===

    /// Await each singleton's `start` hook in registration order, then run
    /// the `main` pipeline when one is registered.
    pub async fn start(self: &Arc<Self>) -> Result<Value, RuntimeError> {
        self.start_with("main").await
    }

    /// `start` with an explicit entry pipeline name.
    pub async fn start_with(self: &Arc<Self>, pipeline_name: &str) -> Result<Value, RuntimeError> {
        let singletons = self.registry.read().singletons();
        for component in singletons {
            component.start().await?;
        }
        if self.get_pipeline(pipeline_name).is_some() {
            return self
                .run_pipeline(pipeline_name, Value::object(), Value::Null)
                .await;
        }
        Ok(Value::Null)
    }
}

#[cfg(test)]
#[path = "container_tests.rs"]
mod tests;
