//! Error types shared by every tool

use thiserror::Error;

/// Result type alias for tool operations
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type for tool invocations
///
/// Every variant's display string is the one-line reason surfaced to the
/// caller as `{"success": false, "error": "<reason>"}`. Tools never let an
/// error cross the invoke boundary any other way.
#[derive(Error, Debug)]
pub enum ToolError {
    /// `action` argument outside the tool's dispatch set
    #[error("Invalid action: {0}")]
    UnknownAction(String),

    /// `entity_type` argument outside a query tool's table set
    #[error("Invalid entity type: {0}")]
    UnknownEntity(String),

    /// Required argument absent or blank
    #[error("Missing required field: {0}")]
    MissingArgument(String),

    /// Field supplied on an update that is not in the allowed-update set
    #[error("Field '{0}' cannot be updated")]
    UnexpectedArgument(String),

    /// Enum-typed argument outside its closed value set
    #[error("Invalid value '{value}' for {field}; must be one of [{allowed}]")]
    InvalidEnum {
        field: String,
        value: String,
        allowed: String,
    },

    /// Amount, quantity, or price that must be strictly positive
    #[error("{0} must be a positive number")]
    NotPositive(String),

    /// Foreign key or single-row lookup that resolved to nothing
    #[error("{entity} {id} not found")]
    NotFound { entity: String, id: String },

    /// Referenced row exists but is not in the state the write requires
    #[error("{entity} {id} is not {required}")]
    InvalidReference {
        entity: String,
        id: String,
        required: String,
    },

    /// Missing or false approval flag
    #[error("{0} approval is required")]
    ApprovalRequired(String),

    /// Unparseable date or datetime argument
    #[error("Invalid date '{0}'; expected ISO 8601")]
    InvalidDate(String),

    /// Domain invariant violation (uniqueness, ordering, illegal transition)
    /// carrying its one-line reason verbatim
    #[error("{0}")]
    Validation(String),
}

impl ToolError {
    /// Shorthand for a domain invariant violation
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }

    /// Shorthand for a missing-row error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_wire_text() {
        let err = ToolError::ApprovalRequired("Fund Manager".to_string());
        assert_eq!(err.to_string(), "Fund Manager approval is required");

        let err = ToolError::not_found("fund", "7");
        assert_eq!(err.to_string(), "fund 7 not found");

        let err = ToolError::InvalidEnum {
            field: "side".to_string(),
            value: "hold".to_string(),
            allowed: "buy, sell".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value 'hold' for side; must be one of [buy, sell]"
        );
    }

    #[test]
    fn test_validation_passthrough() {
        let err = ToolError::validation("due date cannot be before invoice date");
        assert_eq!(err.to_string(), "due date cannot be before invoice date");
    }
}
