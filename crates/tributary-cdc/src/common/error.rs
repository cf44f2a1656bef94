//! Error types for change-record deserialization
//!
//! Includes error classification for metrics and alerting. Nothing raised here
//! is transient: a failure means the connector and the pipeline disagree on
//! the record shape, so callers should surface it instead of retrying.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error categories for metrics and alerting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Record routing errors (topic naming)
    Routing,
    /// Envelope shape errors (operation codes, missing parts)
    Envelope,
    /// Schema-related errors (field schemas, logical types)
    Schema,
    /// Configuration errors (invalid settings)
    Configuration,
    /// Serialization errors (JSON, YAML, value conversion)
    Serialization,
}

/// CDC deserialization errors
#[derive(Error, Debug)]
pub enum CdcError {
    /// Topic does not follow `<server>.<namespace>.<table>`
    #[error("Malformed topic '{topic}': expected <server>.<namespace>.<table>")]
    MalformedTopic {
        /// The offending topic name
        topic: String,
    },

    /// Envelope operation code that has no data-change counterpart
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Schema error
    #[error("Schema error: {0}")]
    Schema(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Value conversion error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// JSON parse error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parse error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid state
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl CdcError {
    /// Create a malformed topic error
    pub fn malformed_topic(topic: impl Into<String>) -> Self {
        Self::MalformedTopic {
            topic: topic.into(),
        }
    }

    /// Create an unsupported operation error
    pub fn unsupported_operation(msg: impl Into<String>) -> Self {
        Self::UnsupportedOperation(msg.into())
    }

    /// Create a new schema error
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    /// Create a new config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new serialization error
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Create an invalid state error
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Check if this error is retriable.
    ///
    /// Deserialization is deterministic, so replaying the same record fails
    /// the same way.
    pub fn is_retriable(&self) -> bool {
        false
    }

    /// Get the error category for metrics and alerting.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MalformedTopic { .. } => ErrorCategory::Routing,
            Self::UnsupportedOperation(_) => ErrorCategory::Envelope,
            Self::InvalidState(_) => ErrorCategory::Envelope,
            Self::Schema(_) => ErrorCategory::Schema,
            Self::Config(_) => ErrorCategory::Configuration,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::Json(_) => ErrorCategory::Serialization,
            Self::Yaml(_) => ErrorCategory::Configuration,
        }
    }

    /// Get a metric-safe error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedTopic { .. } => "malformed_topic",
            Self::UnsupportedOperation(_) => "unsupported_operation",
            Self::Schema(_) => "schema_error",
            Self::Config(_) => "config_error",
            Self::Serialization(_) => "serialization_error",
            Self::Json(_) => "json_error",
            Self::Yaml(_) => "yaml_error",
            Self::InvalidState(_) => "invalid_state",
        }
    }
}

/// Result type for CDC operations
pub type Result<T> = std::result::Result<T, CdcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_topic_display() {
        let err = CdcError::malformed_topic("mysql_server.inventory");
        assert!(err.to_string().contains("Malformed topic"));
        assert!(err.to_string().contains("mysql_server.inventory"));
        assert!(matches!(
            err,
            CdcError::MalformedTopic { ref topic } if topic == "mysql_server.inventory"
        ));
    }

    #[test]
    fn test_error_constructors() {
        let _ = CdcError::schema("Invalid type");
        let _ = CdcError::config("Missing option");
        let _ = CdcError::unsupported_operation("t");
    }

    #[test]
    fn test_errors_are_not_retriable() {
        assert!(!CdcError::malformed_topic("a").is_retriable());
        assert!(!CdcError::config("bad config").is_retriable());
        assert!(!CdcError::unsupported_operation("m").is_retriable());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            CdcError::malformed_topic("x").category(),
            ErrorCategory::Routing
        );
        assert_eq!(
            CdcError::unsupported_operation("x").category(),
            ErrorCategory::Envelope
        );
        assert_eq!(CdcError::schema("x").category(), ErrorCategory::Schema);
        assert_eq!(
            CdcError::config("x").category(),
            ErrorCategory::Configuration
        );
        assert_eq!(
            CdcError::invalid_state("x").category(),
            ErrorCategory::Envelope
        );
    }

    #[test]
    fn test_error_code() {
        assert_eq!(CdcError::malformed_topic("x").error_code(), "malformed_topic");
        assert_eq!(CdcError::config("x").error_code(), "config_error");

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(CdcError::from(json_err).error_code(), "json_error");
    }
}
