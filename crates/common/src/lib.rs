//! Common types and configuration shared across cqlbridge crates.
//!
//! - **Configuration**: connection-level statement defaults and cache sizing (`config`).
//! - **Models**: consistency levels (`models`).
//! - **Telemetry**: `tracing` subscriber setup for binaries (`telemetry`).
pub mod config;
pub mod models;
pub mod telemetry;

pub use config::{BridgeConfig, CacheSettings, ConnectionDefaults};
pub use models::ConsistencyLevel;
