//! Tool trait definition

use bench_core::{Result, Store};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::args::Args;
use crate::schema::Parameters;

/// Trait for tools the harness can expose to an agent
///
/// Tools are stateless units: one named business operation over the shared
/// fixture store. Each tool provides a name, a one-line description, and a
/// parameter schema; the harness advertises the schema to the model and
/// routes the model's calls to [`invoke`](Tool::invoke).
pub trait Tool: Send + Sync {
    /// Get the tool's name
    ///
    /// Must be unique within an interface.
    fn name(&self) -> &str;

    /// Get the tool's one-line description
    ///
    /// This description helps the LLM decide when to use this tool.
    fn description(&self) -> &str;

    /// Get the tool's parameter schema
    fn parameters(&self) -> Parameters;

    /// Execute the operation against the store
    ///
    /// All validation runs before any write: when this returns `Err`, the
    /// store is unchanged. Tools that dispatch on an `action` argument parse
    /// it into a typed operation first and branch on that.
    fn run(&self, store: &mut Store, args: &Args) -> Result<Value>;

    /// Build the wire-shape schema: `{name, description, parameters}`
    fn describe(&self) -> Value {
        json!({
            "name": self.name(),
            "description": self.description(),
            "parameters": self.parameters().to_value(),
        })
    }

    /// The harness boundary: validate, run, encode
    ///
    /// Never panics and never returns a Rust error; recognized failure is
    /// encoded as `{"success": false, "error": "<reason>"}`.
    fn invoke(&self, store: &mut Store, args: Value) -> String {
        debug!(tool = self.name(), "invoking tool");
        let args = match Args::from_value(args) {
            Ok(args) => args,
            Err(err) => return error_result(&err.to_string()),
        };
        match self.run(store, &args) {
            Ok(payload) => payload.to_string(),
            Err(err) => {
                warn!(tool = self.name(), error = %err, "tool call rejected");
                error_result(&err.to_string())
            }
        }
    }
}

/// Encode a structured failure result
pub fn error_result(reason: &str) -> String {
    json!({ "success": false, "error": reason }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bench_core::ToolError;

    struct Echo;

    impl Tool for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo a message back"
        }

        fn parameters(&self) -> Parameters {
            Parameters::new()
                .string("message", "Text to echo")
                .required(&["message"])
        }

        fn run(&self, _store: &mut Store, args: &Args) -> Result<Value> {
            let message = args.require_str("message")?;
            Ok(json!({ "success": true, "message": message }))
        }
    }

    #[test]
    fn test_describe_shape() {
        let schema = Echo.describe();
        assert_eq!(schema["name"], "echo");
        assert_eq!(schema["description"], "Echo a message back");
        assert_eq!(schema["parameters"]["type"], "object");
        assert_eq!(schema["parameters"]["required"][0], "message");
    }

    #[test]
    fn test_invoke_success_is_json_string() {
        let mut store = Store::new();
        let out = Echo.invoke(&mut store, json!({ "message": "hi" }));
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, json!({ "success": true, "message": "hi" }));
    }

    #[test]
    fn test_invoke_missing_argument() {
        let mut store = Store::new();
        let out = Echo.invoke(&mut store, json!({}));
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["success"], false);
        assert_eq!(parsed["error"], "Missing required field: message");
    }

    #[test]
    fn test_invoke_non_object_args() {
        let mut store = Store::new();
        let out = Echo.invoke(&mut store, json!([1, 2]));
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["success"], false);
    }

    #[test]
    fn test_error_result_encoding() {
        let out = error_result(&ToolError::UnknownAction("drop".to_string()).to_string());
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["error"], "Invalid action: drop");
    }
}
