//! Statement Configuration Resolver
//!
//! Three layers, highest priority first: statement directives, connection
//! defaults, and the built-in defaults already folded into
//! [`ConnectionDefaults`]. A directive with an unusable value is logged and
//! ignored, so resolution always succeeds.

use crate::classify::{StatementCategory, StatementType};
use crate::options::{
    StatementOptions, CONSISTENCY_LEVEL, FETCH_SIZE, NO_LIMIT, NO_WAIT, READ_TIMEOUT,
    REPLACE_NULL_VALUE, SQL_PARSER, TRACING,
};
use cqlbridge_common::{ConnectionDefaults, ConsistencyLevel};
use cqlbridge_error::{CqlBridgeError, ErrorCode, ErrorContext};
use serde::Serialize;
use std::fmt::Display;

/// Fetch size meaning "use the caller's statement-level fetch size".
pub const FETCH_SIZE_INHERIT: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StatementConfiguration {
    consistency_level: ConsistencyLevel,
    serial_consistency_level: Option<ConsistencyLevel>,
    fetch_size: i32,
    no_limit: bool,
    no_wait: bool,
    tracing: bool,
    read_timeout_ms: u64,
    replace_null_value: bool,
    sql_parser: bool,
    statement_type: StatementType,
    statement_category: StatementCategory,
}

impl StatementConfiguration {
    pub fn resolve(
        defaults: &ConnectionDefaults,
        statement_type: StatementType,
        options: &StatementOptions,
    ) -> Self {
        for key in options.unknown_keys() {
            tracing::debug!(key, "Ignoring unrecognized statement directive");
        }

        let consistency_level = directive(options, CONSISTENCY_LEVEL, str::parse::<ConsistencyLevel>)
            .unwrap_or_else(|| default_consistency(defaults, statement_type));

        let serial_consistency_level = (statement_type.is_write()
            && consistency_level.is_serial())
        .then_some(consistency_level);

        let fetch_size = directive(options, FETCH_SIZE, parse_fetch_size).unwrap_or(FETCH_SIZE_INHERIT);

        let read_timeout_ms =
            directive(options, READ_TIMEOUT, parse_timeout_secs).unwrap_or(defaults.read_timeout_ms);

        Self {
            consistency_level,
            serial_consistency_level,
            fetch_size,
            no_limit: flag(options, NO_LIMIT, false),
            no_wait: flag(options, NO_WAIT, false),
            tracing: flag(options, TRACING, defaults.tracing),
            read_timeout_ms,
            replace_null_value: flag(options, REPLACE_NULL_VALUE, defaults.replace_null_value),
            sql_parser: sql_parser_enabled(defaults, options),
            statement_type,
            statement_category: statement_type.category(),
        }
    }

    pub fn consistency_level(&self) -> ConsistencyLevel {
        self.consistency_level
    }

    /// Set only for writes resolved to `SERIAL` or `LOCAL_SERIAL`.
    pub fn serial_consistency_level(&self) -> Option<ConsistencyLevel> {
        self.serial_consistency_level
    }

    /// [`FETCH_SIZE_INHERIT`] unless a directive set it.
    pub fn fetch_size(&self) -> i32 {
        self.fetch_size
    }

    pub fn no_limit(&self) -> bool {
        self.no_limit
    }

    pub fn no_wait(&self) -> bool {
        self.no_wait
    }

    pub fn tracing(&self) -> bool {
        self.tracing
    }

    pub fn read_timeout_ms(&self) -> u64 {
        self.read_timeout_ms
    }

    pub fn replace_null_value(&self) -> bool {
        self.replace_null_value
    }

    pub fn sql_parser(&self) -> bool {
        self.sql_parser
    }

    pub fn statement_type(&self) -> StatementType {
        self.statement_type
    }

    pub fn statement_category(&self) -> StatementCategory {
        self.statement_category
    }
}

/// Whether relational parsing runs for this statement.
pub fn sql_parser_enabled(defaults: &ConnectionDefaults, options: &StatementOptions) -> bool {
    flag(options, SQL_PARSER, defaults.sql_parser)
}

fn default_consistency(defaults: &ConnectionDefaults, statement_type: StatementType) -> ConsistencyLevel {
    match statement_type {
        StatementType::Select => defaults.read_consistency,
        t if t.is_write() => defaults.write_consistency,
        _ => defaults.consistency,
    }
}

fn directive<T, E, F>(options: &StatementOptions, key: &str, parse: F) -> Option<T>
where
    E: Display,
    F: FnOnce(&str) -> Result<T, E>,
{
    let raw = options.get(key)?;
    match parse(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            let err = invalid_directive(key, raw, &e);
            tracing::warn!(code = %err.code, error = %err.to_json(), "Ignoring invalid statement directive");
            None
        }
    }
}

fn invalid_directive(key: &str, raw: &str, reason: &dyn Display) -> CqlBridgeError {
    CqlBridgeError::new(
        ErrorCode::InvalidOption,
        format!("invalid value '{}' for {}: {}", raw, key, reason),
    )
    .with_context(ErrorContext::Option {
        key: key.to_string(),
        value: raw.to_string(),
    })
    .with_hint("The directive is ignored and the next configuration layer applies")
}

fn flag(options: &StatementOptions, key: &str, fallback: bool) -> bool {
    directive(options, key, parse_bool).unwrap_or(fallback)
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err("expected true or false".to_string()),
    }
}

fn parse_fetch_size(raw: &str) -> Result<i32, String> {
    match raw.parse::<i32>() {
        Ok(size) if size > 0 => Ok(size),
        Ok(_) => Err("must be positive".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

fn parse_timeout_secs(raw: &str) -> Result<u64, String> {
    raw.parse::<u64>()
        .map_err(|e| e.to_string())?
        .checked_mul(1000)
        .ok_or_else(|| "too large".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(text: &str, statement_type: StatementType) -> StatementConfiguration {
        StatementConfiguration::resolve(
            &ConnectionDefaults::default(),
            statement_type,
            &StatementOptions::extract(text),
        )
    }

    #[test]
    fn test_consistency_by_statement_type() {
        let defaults = ConnectionDefaults::default();
        assert_eq!(
            resolve("", StatementType::Select).consistency_level(),
            defaults.read_consistency
        );
        assert_eq!(
            resolve("", StatementType::Truncate).consistency_level(),
            defaults.write_consistency
        );
        assert_eq!(
            resolve("", StatementType::Create).consistency_level(),
            defaults.consistency
        );
        assert_eq!(
            resolve("", StatementType::Unknown).consistency_level(),
            defaults.consistency
        );
    }

    #[test]
    fn test_serial_only_for_writes() {
        let write = resolve("-- set consistency_level=LOCAL_SERIAL", StatementType::Update);
        assert_eq!(
            write.serial_consistency_level(),
            Some(ConsistencyLevel::LocalSerial)
        );

        let read = resolve("-- set consistency_level=SERIAL", StatementType::Select);
        assert_eq!(read.consistency_level(), ConsistencyLevel::Serial);
        assert_eq!(read.serial_consistency_level(), None);

        let quorum = resolve("-- set consistency_level=QUORUM", StatementType::Insert);
        assert_eq!(quorum.serial_consistency_level(), None);
    }

    #[test]
    fn test_fetch_size_and_timeout() {
        let config = resolve("", StatementType::Select);
        assert_eq!(config.fetch_size(), FETCH_SIZE_INHERIT);
        assert_eq!(config.read_timeout_ms(), ConnectionDefaults::default().read_timeout_ms);

        let config = resolve("-- set fetch_size=50;read_timeout=12", StatementType::Select);
        assert_eq!(config.fetch_size(), 50);
        assert_eq!(config.read_timeout_ms(), 12_000);
    }

    #[test]
    fn test_invalid_values_fall_through() {
        let config = resolve(
            "-- set fetch_size=abc;consistency_level=SOMETIMES;tracing=maybe;fetch_size=-4",
            StatementType::Select,
        );
        assert_eq!(config.fetch_size(), FETCH_SIZE_INHERIT);
        assert_eq!(config.consistency_level(), ConsistencyLevel::LocalOne);
        assert!(!config.tracing());
    }

    #[test]
    fn test_no_wait_directive() {
        assert!(resolve("-- set no_wait=true", StatementType::Select).no_wait());
        assert!(!resolve("-- set no_wait=off", StatementType::Select).no_wait());
    }

    #[test]
    fn test_invalid_directive_is_coded() {
        let err = invalid_directive(FETCH_SIZE, "abc", &"invalid digit");
        assert_eq!(err.code, ErrorCode::InvalidOption);
        assert_eq!(
            err.context,
            Some(ErrorContext::Option {
                key: "fetch_size".to_string(),
                value: "abc".to_string(),
            })
        );
        assert!(err.message.contains("fetch_size"));
    }

    #[test]
    fn test_flags_default_to_connection() {
        let defaults = ConnectionDefaults {
            tracing: true,
            replace_null_value: true,
            sql_parser: false,
            ..ConnectionDefaults::default()
        };
        let config =
            StatementConfiguration::resolve(&defaults, StatementType::Select, &StatementOptions::default());
        assert!(config.tracing());
        assert!(config.replace_null_value());
        assert!(!config.sql_parser());
        assert!(!config.no_limit());
        assert!(!config.no_wait());

        let options = StatementOptions::extract("-- set tracing=false;sql_parser=true");
        let config = StatementConfiguration::resolve(&defaults, StatementType::Select, &options);
        assert!(!config.tracing());
        assert!(config.sql_parser());
    }
}
