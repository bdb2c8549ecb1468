//! Tool parameter schemas
//!
//! Schemas follow the common function-calling convention: a `parameters`
//! object with typed, described properties, optional `enum` lists, and a
//! top-level `required` array. Property order is insertion order so the
//! surface is deterministic.

use serde_json::{Map, Value, json};

/// Builder for a tool's `parameters` object
#[derive(Debug, Clone, Default)]
pub struct Parameters {
    properties: Map<String, Value>,
    required: Vec<String>,
}

impl Parameters {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    fn property(mut self, name: &str, type_name: &str, description: &str) -> Self {
        self.properties.insert(
            name.to_string(),
            json!({ "type": type_name, "description": description }),
        );
        self
    }

    /// Add a string argument
    pub fn string(self, name: &str, description: &str) -> Self {
        self.property(name, "string", description)
    }

    /// Add a string argument with a closed value set
    pub fn string_enum(mut self, name: &str, description: &str, allowed: &[&str]) -> Self {
        self.properties.insert(
            name.to_string(),
            json!({ "type": "string", "description": description, "enum": allowed }),
        );
        self
    }

    /// Add a number argument
    pub fn number(self, name: &str, description: &str) -> Self {
        self.property(name, "number", description)
    }

    /// Add an integer argument
    pub fn integer(self, name: &str, description: &str) -> Self {
        self.property(name, "integer", description)
    }

    /// Add a boolean argument
    pub fn boolean(self, name: &str, description: &str) -> Self {
        self.property(name, "boolean", description)
    }

    /// Add an object argument (nested field bags like `invoice_data`)
    pub fn object(self, name: &str, description: &str) -> Self {
        self.property(name, "object", description)
    }

    /// Add an array argument
    pub fn array(self, name: &str, description: &str) -> Self {
        self.property(name, "array", description)
    }

    /// Add an argument of unconstrained type
    pub fn any(self, name: &str, description: &str) -> Self {
        self.property(name, "any", description)
    }

    /// Declare which arguments must be present
    pub fn required(mut self, names: &[&str]) -> Self {
        self.required = names.iter().map(|n| (*n).to_string()).collect();
        self
    }

    /// Serialize to the wire `parameters` object
    pub fn to_value(&self) -> Value {
        json!({
            "type": "object",
            "properties": self.properties,
            "required": self.required,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_shape() {
        let params = Parameters::new()
            .string("fund_id", "Target fund id")
            .string_enum("side", "Trade direction", &["buy", "sell"])
            .number("quantity", "Units to trade")
            .boolean("fund_manager_approval", "Fund manager sign-off")
            .required(&["fund_id", "side", "quantity", "fund_manager_approval"]);

        let value = params.to_value();
        assert_eq!(value["type"], "object");
        assert_eq!(value["properties"]["side"]["enum"], json!(["buy", "sell"]));
        assert_eq!(value["properties"]["quantity"]["type"], "number");
        assert_eq!(
            value["required"],
            json!(["fund_id", "side", "quantity", "fund_manager_approval"])
        );
    }

    #[test]
    fn test_property_order_is_declaration_order() {
        let value = Parameters::new()
            .string("b", "second declared first")
            .string("a", "first declared second")
            .to_value();
        let keys: Vec<_> = value["properties"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec!["b", "a"]);
    }
}
