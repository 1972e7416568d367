use crate::value::{CqlValue, HostType};
use cqlbridge_error::{CqlBridgeError, ErrorCode, ErrorContext};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("cannot convert {value} ({source_type}) to {target}: {reason}")]
    Invalid {
        value: String,
        source_type: &'static str,
        target: HostType,
        reason: String,
    },

    #[error("value {value} ({source_type}) is out of range for {target}")]
    OutOfRange {
        value: String,
        source_type: &'static str,
        target: HostType,
    },

    #[error("no conversion from {source_type} to {target}")]
    Unsupported {
        value: String,
        source_type: &'static str,
        target: HostType,
    },
}

impl ConversionError {
    pub fn invalid(value: &CqlValue, target: HostType, reason: impl ToString) -> Self {
        ConversionError::Invalid {
            value: value.to_string(),
            source_type: value.type_name(),
            target,
            reason: reason.to_string(),
        }
    }

    pub fn out_of_range(value: &CqlValue, target: HostType) -> Self {
        ConversionError::OutOfRange {
            value: value.to_string(),
            source_type: value.type_name(),
            target,
        }
    }

    pub fn unsupported(value: &CqlValue, target: HostType) -> Self {
        ConversionError::Unsupported {
            value: value.to_string(),
            source_type: value.type_name(),
            target,
        }
    }

    pub fn target(&self) -> HostType {
        match self {
            ConversionError::Invalid { target, .. }
            | ConversionError::OutOfRange { target, .. }
            | ConversionError::Unsupported { target, .. } => *target,
        }
    }
}

impl From<ConversionError> for CqlBridgeError {
    fn from(err: ConversionError) -> Self {
        let (code, value, source_type, target) = match &err {
            ConversionError::Invalid {
                value,
                source_type,
                target,
                ..
            } => (ErrorCode::ConversionFailed, value, source_type, target),
            ConversionError::OutOfRange {
                value,
                source_type,
                target,
            } => (ErrorCode::ValueOutOfRange, value, source_type, target),
            ConversionError::Unsupported {
                value,
                source_type,
                target,
            } => (ErrorCode::NoConverter, value, source_type, target),
        };

        let context = ErrorContext::Conversion {
            value: value.clone(),
            source_type: source_type.to_string(),
            target: target.to_string(),
        };

        let bridge_err = CqlBridgeError::new(code, err.to_string()).with_context(context);
        if code == ErrorCode::NoConverter {
            bridge_err.with_hint("Register a converter for this target in a derived registry")
        } else {
            bridge_err
        }
    }
}
