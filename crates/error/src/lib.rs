//! # cqlbridge-error
//!
//! Unified error types for the cqlbridge statement pipeline.
//!
//! All errors carry:
//! - Numeric error codes (CQLB-XXXX)
//! - Structured JSON context
//! - Optional hints for the caller

mod code;
mod context;
mod convert;

pub use code::{ErrorCategory, ErrorCode};
pub use context::ErrorContext;

use serde::{Deserialize, Serialize};
use std::fmt;

/// The unified error type for all cqlbridge operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CqlBridgeError {
    /// Numeric error code (e.g., "CQLB-2002")
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Structured context for programmatic handling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,

    /// Suggestion for the caller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl CqlBridgeError {
    /// Create a new error with code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            hint: None,
        }
    }

    /// Wraps a failure raised while computing a cached statement.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unexpected, message)
    }

    /// Add structured context
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Add a hint
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn category(&self) -> ErrorCategory {
        self.code.category()
    }

    /// Serialize to JSON for machine-readable output
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            tracing::warn!("Failed to serialize CqlBridgeError: {}", e);
            format!(
                r#"{{"code":"{}","message":"Serialization failed"}}"#,
                self.code
            )
        })
    }

    /// Serialize to pretty JSON for logging
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_json())
    }
}

impl fmt::Display for CqlBridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " (Hint: {})", hint)?;
        }
        Ok(())
    }
}

impl std::error::Error for CqlBridgeError {}

/// Result type alias for cqlbridge operations
pub type Result<T> = std::result::Result<T, CqlBridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_builder() {
        let err = CqlBridgeError::new(ErrorCode::InvalidOption, "bad fetch_size")
            .with_hint("fetch_size must be a positive integer")
            .with_context(ErrorContext::Option {
                key: "fetch_size".to_string(),
                value: "abc".to_string(),
            });

        assert_eq!(err.code, ErrorCode::InvalidOption);
        assert_eq!(err.message, "bad fetch_size");
        assert_eq!(
            err.hint,
            Some("fetch_size must be a positive integer".to_string())
        );
        assert!(err.context.is_some());
        assert_eq!(err.category(), ErrorCategory::Config);
    }

    #[test]
    fn test_display_implementation() {
        let err = CqlBridgeError::new(ErrorCode::NoConverter, "no converter for uuid")
            .with_hint("register a converter");

        assert_eq!(
            err.to_string(),
            "[CQLB-2002] no converter for uuid (Hint: register a converter)"
        );

        let err_no_hint = CqlBridgeError::unexpected("compute failed");
        assert_eq!(err_no_hint.to_string(), "[CQLB-5001] compute failed");
    }

    #[test]
    fn test_json_output() {
        let err = CqlBridgeError::new(ErrorCode::ConversionFailed, "not a number");
        let json = err.to_json();

        assert!(json.contains("\"code\":\"CQLB-2001\""));
        assert!(json.contains("\"message\":\"not a number\""));
        assert!(!json.contains("hint"));
    }
}
