//! A single benchmark episode: one store, one interface, many calls

use bench_core::Store;
use bench_tools::Interface;
use bench_tools::tool::error_result;
use serde_json::Value;
use tracing::{debug, info};

/// A running episode over one fixture store and one tool interface
///
/// Every call goes through [`Episode::call`], which mirrors exactly what a
/// function-calling model sees: a tool name, a JSON argument object, and a
/// JSON string back. Failed calls never mutate the store, so an episode can
/// absorb any number of bad calls without drifting from the fixture.
pub struct Episode {
    store: Store,
    interface: Interface,
    escalated: bool,
}

impl Episode {
    /// Start an episode from a fixture store and an interface
    pub fn new(store: Store, interface: Interface) -> Self {
        info!(interface = interface.name(), "starting episode");
        Self {
            store,
            interface,
            escalated: false,
        }
    }

    /// The interface name this episode runs against
    pub fn interface_name(&self) -> &str {
        self.interface.name()
    }

    /// Function-calling schemas for every tool, in declaration order
    pub fn schemas(&self) -> Vec<Value> {
        self.interface.schemas()
    }

    /// Dispatch one tool call and return its JSON string result
    ///
    /// Unknown tool names come back as a structured error payload rather
    /// than an `Err`; from the model's side a typo'd tool name is just
    /// another failed call.
    pub fn call(&mut self, name: &str, args: Value) -> String {
        let Some(tool) = self.interface.get(name) else {
            debug!(tool = name, "unknown tool");
            return error_result(&format!("unknown tool: {name}"));
        };
        let output = tool.invoke(&mut self.store, args);
        if is_escalation(&output) {
            info!(tool = name, "episode escalated to a human");
            self.escalated = true;
        }
        output
    }

    /// Whether a transfer-to-human tool has been invoked
    pub fn escalated(&self) -> bool {
        self.escalated
    }

    /// The store in its current state
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Consume the episode, yielding the final store for grading
    pub fn into_store(self) -> Store {
        self.store
    }
}

/// An escalation payload is any successful result carrying `"escalated": true`
fn is_escalation(output: &str) -> bool {
    serde_json::from_str::<Value>(output)
        .map(|value| value["escalated"] == Value::Bool(true))
        .unwrap_or(false)
}
