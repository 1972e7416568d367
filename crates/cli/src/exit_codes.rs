//! Structured exit codes for machine-readable error handling.

/// Success (standard convention)
#[allow(dead_code)]
pub const SUCCESS: i32 = 0;

/// General error (fallback for unknown errors)
pub const GENERAL_ERROR: i32 = 1;

/// CLI usage error (invalid arguments, unknown type names)
pub const USAGE_ERROR: i32 = 2;

/// Configuration error (unreadable file, failed validation)
pub const CONFIG_ERROR: i32 = 3;

/// Translation error (statement rejected by the translator)
pub const TRANSLATION_ERROR: i32 = 4;

/// Conversion error (no converter, value out of range)
pub const CONVERSION_ERROR: i32 = 5;
