//! # Error Contexts
//!
//! Structured metadata attached to errors so callers can react programmatically.

use serde::{Deserialize, Serialize};

/// Structured context for an error.
///
/// Each variant provides the fields relevant to that error family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ErrorContext {
    /// Context for CQLB-2001/2002/2003 (conversion errors)
    Conversion {
        /// Rendered source value
        value: String,
        /// Host type of the source value
        source_type: String,
        /// Requested host type
        target: String,
    },

    /// Context for CQLB-3001 (InvalidOption)
    Option { key: String, value: String },

    /// Context for CQLB-3002/3003 (config errors)
    Config {
        file_path: Option<String>,
        field: Option<String>,
    },

    /// Context for CQLB-1001 (UnsupportedSyntax)
    Translation { construct: String },

    /// Generic key-value context for extensibility
    Generic {
        #[serde(flatten)]
        data: std::collections::HashMap<String, serde_json::Value>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_context_serde_roundtrip() {
        let ctx = ErrorContext::Conversion {
            value: "'abc'".to_string(),
            source_type: "text".to_string(),
            target: "int".to_string(),
        };

        let json = serde_json::to_string(&ctx).unwrap();
        assert!(json.contains("\"type\":\"conversion\""));

        let de: ErrorContext = serde_json::from_str(&json).unwrap();
        assert_eq!(de, ctx);
    }
}
