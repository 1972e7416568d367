use cqlbridge_error::{CqlBridgeError, ErrorCode, ErrorContext};
use serde_json::Value;

#[test]
fn test_json_serialization() {
    let error = CqlBridgeError::new(ErrorCode::ConversionFailed, "cannot convert 'abc' to int")
        .with_context(ErrorContext::Conversion {
            value: "'abc'".to_string(),
            source_type: "text".to_string(),
            target: "int".to_string(),
        })
        .with_hint("Pass a numeric literal");

    let json = error.to_json();

    let v: Value = serde_json::from_str(&json).expect("valid json");

    assert_eq!(v["code"], "CQLB-2001");
    assert_eq!(v["message"], "cannot convert 'abc' to int");
    assert_eq!(v["hint"], "Pass a numeric literal");
    assert_eq!(v["context"]["type"], "conversion");
    assert_eq!(v["context"]["target"], "int");
}

#[test]
fn test_json_roundtrip() {
    let error = CqlBridgeError::unexpected("statement computation panicked");
    let de: CqlBridgeError = serde_json::from_str(&error.to_json()).expect("roundtrip");
    assert_eq!(de, error);
}

#[test]
fn test_error_code_parsing() {
    let code: ErrorCode = "CQLB-3001".to_string().try_into().unwrap();
    assert_eq!(code, ErrorCode::InvalidOption);
}
