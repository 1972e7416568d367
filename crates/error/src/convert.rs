use crate::{CqlBridgeError, ErrorCode};

impl From<std::io::Error> for CqlBridgeError {
    fn from(err: std::io::Error) -> Self {
        CqlBridgeError::new(ErrorCode::Io, err.to_string())
    }
}

impl From<serde_json::Error> for CqlBridgeError {
    fn from(err: serde_json::Error) -> Self {
        CqlBridgeError::new(ErrorCode::SerializationFailed, err.to_string())
    }
}

impl From<serde_yaml::Error> for CqlBridgeError {
    fn from(err: serde_yaml::Error) -> Self {
        CqlBridgeError::new(ErrorCode::InvalidYaml, err.to_string())
    }
}
