//! Statement translation for cqlbridge.
//!
//! Turns relational or native query text into a [`ParsedStatement`]:
//! - **Directives**: per-statement options from leading `-- set` comments (`options`).
//! - **Classification**: statement type and DDL/DML category (`classify`).
//! - **Rewriting**: the supported SELECT subset into the native dialect, with
//!   row-limit injection (`rewrite`).
//! - **Configuration**: layered resolution of execution options (`configuration`).
//! - **Caching**: single-flight, LRU-bounded statement cache (`cache`).
pub mod cache;
pub mod classify;
pub mod configuration;
pub mod escape;
pub mod options;
pub mod parser;
pub mod rewrite;
pub mod statement;

pub use cache::StatementCache;
pub use classify::{StatementCategory, StatementType};
pub use configuration::{StatementConfiguration, FETCH_SIZE_INHERIT};
pub use options::StatementOptions;
pub use parser::{translate, Fallback, StatementParser, Translation};
pub use rewrite::RewriteError;
pub use statement::ParsedStatement;
