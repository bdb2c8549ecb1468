//! Tool registry and interface surfaces
//!
//! An interface is an ordered, immutable list of tools exposed as one
//! capability surface; the harness selects one per episode. The registry's
//! only jobs are guaranteeing name uniqueness and giving the harness a
//! single-hash-lookup dispatch map plus ordered iteration for schema export.

use bench_core::{Result, ToolError};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::tool::Tool;

/// Registry mapping tool names to invokers, preserving declaration order
#[derive(Default)]
pub struct ToolRegistry {
    ordered: Vec<Arc<dyn Tool>>,
    by_name: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool; duplicate names are rejected
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let name = tool.name().to_string();
        if self.by_name.contains_key(&name) {
            return Err(ToolError::validation(format!(
                "duplicate tool name '{name}'"
            )));
        }
        self.by_name.insert(name, Arc::clone(&tool));
        self.ordered.push(tool);
        Ok(())
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.by_name.get(name).cloned()
    }

    /// List all registered tools in declaration order
    ///
    /// This is what the harness iterates to build the schema list it sends
    /// to the LLM.
    pub fn list_tools(&self) -> &[Arc<dyn Tool>] {
        &self.ordered
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

/// A named, ordered collection of tools exposed as one capability surface
pub struct Interface {
    name: String,
    registry: ToolRegistry,
}

impl Interface {
    /// Build an interface from an ordered tool list
    ///
    /// Fails if two tools share a name; interfaces are immutable once built.
    pub fn new(name: impl Into<String>, tools: Vec<Arc<dyn Tool>>) -> Result<Self> {
        let name = name.into();
        let mut registry = ToolRegistry::new();
        for tool in tools {
            registry.register(tool).map_err(|err| {
                ToolError::validation(format!("interface {name}: {err}"))
            })?;
        }
        Ok(Self { name, registry })
    }

    /// The interface's name, e.g. `fund_finance/interface_1`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.registry.get(name)
    }

    /// The tools in declaration order
    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        self.registry.list_tools()
    }

    /// All tool schemas in declaration order
    pub fn schemas(&self) -> Vec<Value> {
        self.registry
            .list_tools()
            .iter()
            .map(|tool| tool.describe())
            .collect()
    }
}
