//! Error handling module
//!
//! Provides unified error types for the blue-green splitting engine.
//! Every failure mode gets its own variant so callers can distinguish
//! "cannot split, use a standard migration" from "fix your models" from
//! "bad invocation".

use thiserror::Error;

/// Engine-wide error type
#[derive(Error, Debug)]
pub enum BlueGreenError {
    /// One or more operations mutate an object in place and cannot be
    /// decomposed into additive/destructive phases.
    #[error(
        "Cannot create blue-green migrations. Detected impossible operations: {}. \
         These operations cannot be split into blue/green phases. \
         Please modify your migration or run a standard migration.",
        .operations.join(", ")
    )]
    ImpossibleOperation { operations: Vec<String> },

    /// Source and target schemas are not compatible for a data copy.
    #[error("Schema validation failed: {0}")]
    SchemaValidation(String),

    /// A rename operation references a model that cannot be resolved.
    #[error("Model '{model}' not found in app '{app}'")]
    ModelNotFound { app: String, model: String },

    /// A rename operation references a field that cannot be resolved.
    #[error("Field '{field}' not found in model '{model}'")]
    FieldNotFound { model: String, field: String },

    /// A rename operation references an index that cannot be resolved.
    #[error("Index '{index}' not found in model '{model}'")]
    IndexNotFound { model: String, index: String },

    /// An SQL identifier failed validation (empty, null byte, too long).
    #[error("Invalid SQL identifier: {0}")]
    InvalidIdentifier(String),

    /// Bad invocation, e.g. requesting blue and green modes together.
    #[error("Usage error: {0}")]
    Usage(String),

    /// Configuration error (bad environment variable, unparseable value)
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (migration file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, BlueGreenError>;

/// Helper function to create a schema validation error
pub fn schema_validation_error(msg: impl Into<String>) -> BlueGreenError {
    BlueGreenError::SchemaValidation(msg.into())
}

/// Helper function to create a usage error
pub fn usage_error(msg: impl Into<String>) -> BlueGreenError {
    BlueGreenError::Usage(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impossible_operation_message_lists_offenders() {
        let err = BlueGreenError::ImpossibleOperation {
            operations: vec!["AlterField: order.number".to_string(), "AlterModelTable: order".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("AlterField: order.number"));
        assert!(msg.contains("AlterModelTable: order"));
        assert!(msg.contains("standard migration"));
    }

    #[test]
    fn test_not_found_messages() {
        let err = BlueGreenError::ModelNotFound {
            app: "shop".to_string(),
            model: "Order".to_string(),
        };
        assert_eq!(err.to_string(), "Model 'Order' not found in app 'shop'");

        let err = BlueGreenError::FieldNotFound {
            model: "Order".to_string(),
            field: "number".to_string(),
        };
        assert_eq!(err.to_string(), "Field 'number' not found in model 'Order'");
    }
}
