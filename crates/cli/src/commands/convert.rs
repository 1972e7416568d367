//! `convert`: run a text value through the global conversion registry.

use crate::output::{self, OutputFormat};
use anyhow::{anyhow, Result};
use cqlbridge_core::{ConversionRegistry, CqlValue, HostType};
use cqlbridge_error::CqlBridgeError;
use owo_colors::OwoColorize;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ConvertResult {
    input: String,
    target: HostType,
    value: CqlValue,
}

/// `NULL` (any case) stands for a null input.
fn input_value(raw: &str) -> CqlValue {
    if raw.eq_ignore_ascii_case("null") {
        CqlValue::Null
    } else {
        CqlValue::Text(raw.to_string())
    }
}

fn run(raw: &str, target: &str, replace_nulls: bool) -> Result<ConvertResult> {
    let target: HostType = target
        .parse()
        .map_err(|e: String| anyhow!("usage: {} (expected one of the host types)", e))?;

    let registry = ConversionRegistry::global_defaults();
    let value = registry
        .convert(&input_value(raw), target, replace_nulls)
        .map_err(CqlBridgeError::from)?;

    Ok(ConvertResult {
        input: raw.to_string(),
        target,
        value,
    })
}

pub fn convert(raw: &str, target: &str, replace_nulls: bool, format: OutputFormat) -> Result<()> {
    let result = run(raw, target, replace_nulls)?;

    if format.is_machine_readable() {
        return output::print_success(format, &result);
    }

    println!(
        "{} {} {} {}",
        "[Convert:".dimmed(),
        raw.yellow(),
        format!("-> {}", result.target).cyan(),
        "]".dimmed()
    );
    println!("{}", result.value.to_string().bold());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cqlbridge_error::ErrorCode;

    #[test]
    fn test_text_to_int() {
        let result = run("42", "int", false).unwrap();
        assert_eq!(result.value, CqlValue::Int(42));
    }

    #[test]
    fn test_null_replacement() {
        assert_eq!(run("NULL", "bigint", true).unwrap().value, CqlValue::BigInt(0));
        assert_eq!(run("null", "bigint", false).unwrap().value, CqlValue::Null);
    }

    #[test]
    fn test_failures_are_typed() {
        let err = run("300", "tinyint", false).unwrap_err();
        let bridge = err.downcast_ref::<CqlBridgeError>().unwrap();
        assert_eq!(bridge.code, ErrorCode::ValueOutOfRange);

        let err = run("1", "blob", false).unwrap_err();
        assert!(err.to_string().starts_with("usage:"));
    }
}
