//! Named-argument access with built-in validation
//!
//! `Args` wraps the JSON object a tool call carries and exposes accessors
//! that yield the contract's error taxonomy directly: missing or blank
//! required fields, enum-closure violations, non-positive amounts, and
//! missing approval flags all map to the right [`ToolError`] variant. Ids
//! are coerced to their canonical string form at this boundary, so tool
//! bodies only ever see string ids.

use bench_core::{Result, ToolError};
use serde_json::{Map, Value};

/// The named arguments of one tool call
#[derive(Debug, Clone, Default)]
pub struct Args(Map<String, Value>);

impl Args {
    /// Create an empty argument set
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap the argument value of an incoming call
    ///
    /// Accepts a JSON object (or `null`, treated as no arguments).
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            _ => Err(ToolError::validation("tool arguments must be a JSON object")),
        }
    }

    /// Wrap an already-parsed argument map
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Raw access to one argument
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|v| !v.is_null())
    }

    /// Whether an argument is present and non-null
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate the supplied argument names (for allowed-field checks)
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Optional string argument; blank counts as absent
    pub fn opt_str(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// Required string argument; missing, non-string, or blank fails
    pub fn require_str(&self, name: &str) -> Result<&str> {
        self.opt_str(name)
            .ok_or_else(|| ToolError::MissingArgument(name.to_string()))
    }

    /// Optional id argument, coerced to canonical string form
    ///
    /// Fixture callers pass ids as strings or bare numbers; either is
    /// accepted, and tool bodies only see strings.
    pub fn opt_id(&self, name: &str) -> Option<String> {
        match self.get(name)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Required id argument, coerced to canonical string form
    pub fn require_id(&self, name: &str) -> Result<String> {
        self.opt_id(name)
            .ok_or_else(|| ToolError::MissingArgument(name.to_string()))
    }

    /// Optional number argument
    pub fn opt_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    /// Required number argument
    pub fn require_f64(&self, name: &str) -> Result<f64> {
        self.opt_f64(name)
            .ok_or_else(|| ToolError::MissingArgument(name.to_string()))
    }

    /// Required strictly positive number argument
    pub fn require_positive(&self, name: &str) -> Result<f64> {
        let value = self.require_f64(name)?;
        if value > 0.0 {
            Ok(value)
        } else {
            Err(ToolError::NotPositive(name.to_string()))
        }
    }

    /// Optional boolean argument
    pub fn opt_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// Required enum argument: present and within the closed set
    pub fn require_enum<'a>(&'a self, name: &str, allowed: &[&str]) -> Result<&'a str> {
        let value = self.require_str(name)?;
        check_enum(name, value, allowed)?;
        Ok(value)
    }

    /// Optional enum argument: absent is fine, out-of-set fails
    pub fn opt_enum<'a>(&'a self, name: &str, allowed: &[&str]) -> Result<Option<&'a str>> {
        match self.opt_str(name) {
            None => Ok(None),
            Some(value) => {
                check_enum(name, value, allowed)?;
                Ok(Some(value))
            }
        }
    }

    /// Mandatory approval flag: must be present and `true`
    ///
    /// `role` is the human-readable authority named in the error, e.g.
    /// "Fund Manager" → "Fund Manager approval is required".
    pub fn require_approval(&self, name: &str, role: &str) -> Result<()> {
        if self.opt_bool(name) == Some(true) {
            Ok(())
        } else {
            Err(ToolError::ApprovalRequired(role.to_string()))
        }
    }

    /// Required nested object argument (field bags like `invoice_data`),
    /// rewrapped so the same accessors apply
    pub fn require_object(&self, name: &str) -> Result<Args> {
        match self.get(name) {
            Some(Value::Object(map)) => Ok(Args(map.clone())),
            _ => Err(ToolError::MissingArgument(name.to_string())),
        }
    }

    /// Optional nested object argument
    pub fn opt_object(&self, name: &str) -> Result<Option<Args>> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(Args(map.clone()))),
            Some(_) => Err(ToolError::validation(format!(
                "{name} must be a JSON object"
            ))),
        }
    }

    /// The underlying argument map
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Closed-set membership check shared by the enum accessors
pub fn check_enum(field: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(ToolError::InvalidEnum {
            field: field.to_string(),
            value: value.to_string(),
            allowed: allowed.join(", "),
        })
    }
}
