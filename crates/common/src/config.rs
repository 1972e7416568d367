use crate::models::ConsistencyLevel;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use validator::Validate;

// Default constants
pub const DEFAULT_READ_CONSISTENCY: ConsistencyLevel = ConsistencyLevel::LocalOne;
pub const DEFAULT_WRITE_CONSISTENCY: ConsistencyLevel = ConsistencyLevel::LocalQuorum;
pub const DEFAULT_CONSISTENCY: ConsistencyLevel = ConsistencyLevel::LocalOne;
pub const DEFAULT_ROW_LIMIT: u32 = 10_000;
pub const DEFAULT_FETCH_SIZE: u32 = 100;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_TRACING: bool = false;
pub const DEFAULT_SQL_PARSER: bool = true;
pub const DEFAULT_REPLACE_NULL_VALUE: bool = false;
pub const DEFAULT_CACHE_CAPACITY: u64 = 1_000;

pub const ENV_PREFIX: &str = "CQLBRIDGE";

/// Connection-level statement defaults.
///
/// This is the middle layer of statement configuration: per-statement directives
/// override it, and the constants above fill whatever the connection leaves out.
/// The struct is `Hash + Eq` because the statement cache keys on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Validate)]
pub struct ConnectionDefaults {
    /// Consistency level for SELECT
    #[serde(default = "default_read_consistency")]
    pub read_consistency: ConsistencyLevel,

    /// Consistency level for INSERT/UPDATE/DELETE/TRUNCATE
    #[serde(default = "default_write_consistency")]
    pub write_consistency: ConsistencyLevel,

    /// Consistency level for everything else (DDL, unknown statements)
    #[serde(default = "default_consistency")]
    pub consistency: ConsistencyLevel,

    /// Row limit injected into unbounded SELECTs
    #[serde(default = "default_row_limit")]
    #[validate(range(min = 1))]
    pub row_limit: u32,

    /// Rows per page when the caller does not set one
    #[serde(default = "default_fetch_size")]
    #[validate(range(min = 1))]
    pub fetch_size: u32,

    /// Read timeout in milliseconds
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    #[serde(default = "default_tracing")]
    pub tracing: bool,

    /// Whether relational text is parsed and rewritten at all
    #[serde(default = "default_sql_parser")]
    pub sql_parser: bool,

    #[serde(default = "default_replace_null_value")]
    pub replace_null_value: bool,
}

impl Default for ConnectionDefaults {
    fn default() -> Self {
        Self {
            read_consistency: DEFAULT_READ_CONSISTENCY,
            write_consistency: DEFAULT_WRITE_CONSISTENCY,
            consistency: DEFAULT_CONSISTENCY,
            row_limit: DEFAULT_ROW_LIMIT,
            fetch_size: DEFAULT_FETCH_SIZE,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            tracing: DEFAULT_TRACING,
            sql_parser: DEFAULT_SQL_PARSER,
            replace_null_value: DEFAULT_REPLACE_NULL_VALUE,
        }
    }
}

fn default_read_consistency() -> ConsistencyLevel {
    DEFAULT_READ_CONSISTENCY
}

fn default_write_consistency() -> ConsistencyLevel {
    DEFAULT_WRITE_CONSISTENCY
}

fn default_consistency() -> ConsistencyLevel {
    DEFAULT_CONSISTENCY
}

fn default_row_limit() -> u32 {
    DEFAULT_ROW_LIMIT
}

fn default_fetch_size() -> u32 {
    DEFAULT_FETCH_SIZE
}

fn default_read_timeout_ms() -> u64 {
    DEFAULT_READ_TIMEOUT_MS
}

fn default_tracing() -> bool {
    DEFAULT_TRACING
}

fn default_sql_parser() -> bool {
    DEFAULT_SQL_PARSER
}

fn default_replace_null_value() -> bool {
    DEFAULT_REPLACE_NULL_VALUE
}

/// Sizing of the process-wide statement cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CacheSettings {
    #[serde(default = "default_cache_capacity")]
    #[validate(range(min = 1))]
    pub capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
        }
    }
}

fn default_cache_capacity() -> u64 {
    DEFAULT_CACHE_CAPACITY
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct BridgeConfig {
    #[serde(default)]
    #[validate(nested)]
    pub connection: ConnectionDefaults,

    #[serde(default)]
    #[validate(nested)]
    pub cache: CacheSettings,
}

impl BridgeConfig {
    /// Loads the file at `path` (if it exists) and overlays `CQLBRIDGE__*`
    /// environment variables, e.g. `CQLBRIDGE__CONNECTION__ROW_LIMIT=500`.
    pub fn from_file(path: &str) -> Result<Self> {
        let builder = config::Config::builder();

        let builder = if std::path::Path::new(path).exists() {
            builder.add_source(config::File::with_name(path))
        } else {
            tracing::debug!(path = %path, "Config file not found, using defaults and environment");
            builder
        };

        let builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build().context("Failed to build configuration")?;

        let bridge_config: BridgeConfig = cfg
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        bridge_config.validate().map_err(|e| {
            let err = cqlbridge_error::CqlBridgeError::new(
                cqlbridge_error::ErrorCode::InvalidConfig,
                format!("Configuration validation failed: {}", e),
            )
            .with_context(cqlbridge_error::ErrorContext::Config {
                file_path: Some(path.to_string()),
                field: e.field_errors().keys().next().map(|k| k.to_string()),
            });
            anyhow::Error::new(err)
        })?;

        Ok(bridge_config)
    }
}
