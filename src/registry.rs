//! Component registry for tools and prompts.
//!
//! The [`ComponentRegistry`] is a thread-safe, cloneable handle storing the
//! immutable artifacts produced at build time: each registered component
//! carries its compiled schema (normalized tree, emitted JSON-Schema
//! document, validator). Registration is the only write; request handling
//! only ever reads.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::prompt::Prompt;
use crate::tool::Tool;

struct RegistryInner {
    tools: RwLock<HashMap<String, Arc<Tool>>>,
    prompts: RwLock<HashMap<String, Arc<Prompt>>>,
}

/// A thread-safe, cloneable registry of tools and prompts.
#[derive(Clone)]
pub struct ComponentRegistry {
    inner: Arc<RegistryInner>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                tools: RwLock::new(HashMap::new()),
                prompts: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Register a tool, replacing any existing tool with the same name.
    pub fn register_tool(&self, tool: Tool) {
        tracing::debug!(tool = %tool.name, "registering tool");
        let mut tools = self.inner.tools.write().unwrap();
        tools.insert(tool.name.clone(), Arc::new(tool));
    }

    /// Unregister a tool by name. Returns `true` if it existed.
    pub fn unregister_tool(&self, name: &str) -> bool {
        let mut tools = self.inner.tools.write().unwrap();
        tools.remove(name).is_some()
    }

    /// Look up a tool by name.
    pub fn tool(&self, name: &str) -> Option<Arc<Tool>> {
        let tools = self.inner.tools.read().unwrap();
        tools.get(name).cloned()
    }

    /// Snapshot of all registered tools, sorted by name for stable listings.
    pub fn tools(&self) -> Vec<Arc<Tool>> {
        let tools = self.inner.tools.read().unwrap();
        let mut all: Vec<_> = tools.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    pub fn contains_tool(&self, name: &str) -> bool {
        let tools = self.inner.tools.read().unwrap();
        tools.contains_key(name)
    }

    /// Register a prompt, replacing any existing prompt with the same name.
    pub fn register_prompt(&self, prompt: Prompt) {
        tracing::debug!(prompt = %prompt.name, "registering prompt");
        let mut prompts = self.inner.prompts.write().unwrap();
        prompts.insert(prompt.name.clone(), Arc::new(prompt));
    }

    /// Unregister a prompt by name. Returns `true` if it existed.
    pub fn unregister_prompt(&self, name: &str) -> bool {
        let mut prompts = self.inner.prompts.write().unwrap();
        prompts.remove(name).is_some()
    }

    /// Look up a prompt by name.
    pub fn prompt(&self, name: &str) -> Option<Arc<Prompt>> {
        let prompts = self.inner.prompts.read().unwrap();
        prompts.get(name).cloned()
    }

    /// Snapshot of all registered prompts, sorted by name.
    pub fn prompts(&self) -> Vec<Arc<Prompt>> {
        let prompts = self.inner.prompts.read().unwrap();
        let mut all: Vec<_> = prompts.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
