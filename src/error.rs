//! Error types for the GraphQL ORM core

use thiserror::Error;

/// Comprehensive error type for ORM operations
#[derive(Error, Debug)]
pub enum OrmError {
    /// A type was asked for metadata but carries no entity registration
    #[error("Type '{type_name}' is not registered as a GraphQL entity")]
    NotAnEntity { type_name: String },

    /// More than one field was flagged as identifier during metadata construction
    #[error("Entity '{type_name}' declares more than one identifier field")]
    TooManyIdentifiers { type_name: String },

    /// The transport returned a value with an unexpected shape
    #[error("Invalid GraphQL response: expected {expected}, got {actual}")]
    InvalidResponseShape { expected: String, actual: String },

    /// A scalar value could not be coerced to its declared field kind
    #[error("Cannot cast value '{value}' to {target}")]
    Cast { value: String, target: String },

    /// A query argument value has no GraphQL literal representation
    #[error("Unsupported GraphQL argument value for '{argument}': {reason}")]
    UnsupportedArgumentValue { argument: String, reason: String },

    /// A field name passed to an entity's `apply_field` that it does not map
    #[error("Field '{field}' is not mapped on entity '{type_name}'")]
    UnknownField { type_name: String, field: String },

    /// Entity metadata does not conform to the remote GraphQL schema
    #[error("GraphQL schema validation failed:\n  - {}", violations.join("\n  - "))]
    SchemaValidation { violations: Vec<String> },

    /// Transport-level failure, forwarded from the client collaborator
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Serialization failure (trace snapshots, response decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Internal invariant violation
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl OrmError {
    /// Create a NotAnEntity error
    pub fn not_an_entity(type_name: impl Into<String>) -> Self {
        Self::NotAnEntity {
            type_name: type_name.into(),
        }
    }

    /// Create a TooManyIdentifiers error
    pub fn too_many_identifiers(type_name: impl Into<String>) -> Self {
        Self::TooManyIdentifiers {
            type_name: type_name.into(),
        }
    }

    /// Create an InvalidResponseShape error describing the actual JSON value
    pub fn invalid_response_shape(expected: impl Into<String>, actual: &serde_json::Value) -> Self {
        Self::InvalidResponseShape {
            expected: expected.into(),
            actual: json_type_name(actual).to_string(),
        }
    }

    /// Create a Cast error naming the offending value and target kind
    pub fn cast(value: &serde_json::Value, target: impl Into<String>) -> Self {
        let rendered = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Self::Cast {
            value: rendered,
            target: target.into(),
        }
    }

    /// Create an UnsupportedArgumentValue error
    pub fn unsupported_argument(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedArgumentValue {
            argument: argument.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownField error
    pub fn unknown_field(type_name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            type_name: type_name.into(),
            field: field.into(),
        }
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for OrmError {
    fn from(error: anyhow::Error) -> Self {
        OrmError::Transport {
            message: format!("{error:#}"),
        }
    }
}

impl From<serde_json::Error> for OrmError {
    fn from(error: serde_json::Error) -> Self {
        OrmError::Serialization {
            message: error.to_string(),
        }
    }
}

/// Result type alias for ORM operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Human-readable name of a JSON value's kind, for error messages
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
