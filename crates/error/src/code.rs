use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric error codes following CQLB-XXXX format.
///
/// ## Code Ranges
/// - **1000-1999**: Translation errors
/// - **2000-2999**: Value conversion errors
/// - **3000-3999**: Configuration errors
/// - **5000-5999**: Internal/System errors
///
/// Codes are stable across versions (semver contract).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
#[non_exhaustive]
pub enum ErrorCode {
    // === Translation Errors (1000-1999) ===
    /// CQLB-1001: Statement uses relational syntax the native dialect lacks
    UnsupportedSyntax = 1001,
    /// CQLB-1002: Statement text could not be parsed
    SyntaxError = 1002,

    // === Conversion Errors (2000-2999) ===
    /// CQLB-2001: A converter exists but rejected the value
    ConversionFailed = 2001,
    /// CQLB-2002: No converter anywhere in the delegation chain
    NoConverter = 2002,
    /// CQLB-2003: Value out of range for the target type
    ValueOutOfRange = 2003,

    // === Configuration Errors (3000-3999) ===
    /// CQLB-3001: Invalid per-statement directive value
    InvalidOption = 3001,
    /// CQLB-3002: Connection configuration failed validation
    InvalidConfig = 3002,
    /// CQLB-3003: Invalid YAML syntax
    InvalidYaml = 3003,

    // === Internal Errors (5000-5999) ===
    /// CQLB-5001: Statement computation failed unexpectedly
    Unexpected = 5001,
    /// CQLB-5002: Serialization/deserialization failed
    SerializationFailed = 5002,
    /// CQLB-5003: I/O failure
    Io = 5003,

    /// CQLB-9999: Unknown/unclassified error
    Unknown = 9999,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Get the formatted code string (e.g., "CQLB-2002")
    pub fn as_str(&self) -> String {
        format!("CQLB-{:04}", self.as_u16())
    }

    /// Get the error category
    pub fn category(&self) -> ErrorCategory {
        match self.as_u16() {
            1000..=1999 => ErrorCategory::Translation,
            2000..=2999 => ErrorCategory::Conversion,
            3000..=3999 => ErrorCategory::Config,
            _ => ErrorCategory::Internal,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> String {
        code.as_str()
    }
}

impl TryFrom<String> for ErrorCode {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        let num: u16 = s
            .strip_prefix("CQLB-")
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| "Invalid format".to_string())?;
        Self::try_from(num).map_err(|_| "Unknown code".to_string())
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = String;

    fn try_from(n: u16) -> std::result::Result<Self, Self::Error> {
        match n {
            1001 => Ok(Self::UnsupportedSyntax),
            1002 => Ok(Self::SyntaxError),
            2001 => Ok(Self::ConversionFailed),
            2002 => Ok(Self::NoConverter),
            2003 => Ok(Self::ValueOutOfRange),
            3001 => Ok(Self::InvalidOption),
            3002 => Ok(Self::InvalidConfig),
            3003 => Ok(Self::InvalidYaml),
            5001 => Ok(Self::Unexpected),
            5002 => Ok(Self::SerializationFailed),
            5003 => Ok(Self::Io),
            9999 => Ok(Self::Unknown),
            _ => Err(format!("Unknown error code: {}", n)),
        }
    }
}

/// High-level error category, used for CLI exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ErrorCategory {
    Translation,
    Conversion,
    Config,
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_formatting() {
        assert_eq!(ErrorCode::UnsupportedSyntax.as_str(), "CQLB-1001");
        assert_eq!(ErrorCode::NoConverter.as_str(), "CQLB-2002");
        assert_eq!(ErrorCode::Unknown.as_str(), "CQLB-9999");
    }

    #[test]
    fn test_error_code_parsing() {
        assert_eq!(
            ErrorCode::try_from("CQLB-2001".to_string()).unwrap(),
            ErrorCode::ConversionFailed
        );
        assert_eq!(
            ErrorCode::try_from("CQLB-5001".to_string()).unwrap(),
            ErrorCode::Unexpected
        );
    }

    #[test]
    fn test_error_code_parsing_errors() {
        assert!(ErrorCode::try_from("INVALID".to_string()).is_err());
        assert!(ErrorCode::try_from("CQLB-0000".to_string()).is_err());
        assert!(ErrorCode::try_from("CQLB-ABC".to_string()).is_err());
        assert!(ErrorCode::try_from("STRAKE-1001".to_string()).is_err());
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(
            ErrorCode::UnsupportedSyntax.category(),
            ErrorCategory::Translation
        );
        assert_eq!(ErrorCode::NoConverter.category(), ErrorCategory::Conversion);
        assert_eq!(ErrorCode::InvalidYaml.category(), ErrorCategory::Config);
        assert_eq!(ErrorCode::Unexpected.category(), ErrorCategory::Internal);
        assert_eq!(ErrorCode::Unknown.category(), ErrorCategory::Internal);
    }
}
