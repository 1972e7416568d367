//! Statement Cache
//!
//! Bounded get-or-compute cache of parsed statements. Keys are the trimmed raw
//! text together with the connection defaults it was resolved under, so the
//! same text submitted under different defaults resolves separately.
//!
//! Concurrent callers asking for the same missing key block on a single
//! computation; settled entries are read without coordination.

use crate::statement::ParsedStatement;
use cqlbridge_common::{CacheSettings, ConnectionDefaults};
use cqlbridge_error::CqlBridgeError;
use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use std::fmt::Display;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatementKey {
    text: String,
    defaults: ConnectionDefaults,
}

impl StatementKey {
    pub fn new(defaults: &ConnectionDefaults, text: &str) -> Self {
        Self {
            text: text.trim().to_string(),
            defaults: defaults.clone(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Clone)]
pub struct StatementCache {
    entries: Cache<StatementKey, Arc<ParsedStatement>>,
}

impl std::fmt::Debug for StatementCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatementCache")
            .field("capacity", &self.entries.policy().max_capacity())
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

impl StatementCache {
    pub fn new(capacity: u64) -> Self {
        tracing::info!(capacity, "Creating statement cache");
        Self {
            entries: Cache::builder()
                .name("statements")
                .max_capacity(capacity)
                .eviction_policy(EvictionPolicy::lru())
                .build(),
        }
    }

    pub fn from_settings(settings: &CacheSettings) -> Self {
        Self::new(settings.capacity)
    }

    pub fn get(&self, defaults: &ConnectionDefaults, text: &str) -> Option<Arc<ParsedStatement>> {
        self.entries.get(&StatementKey::new(defaults, text))
    }

    /// Cached statement for `text`, computing it with `init` on a miss. `init`
    /// runs at most once per key even under concurrent callers.
    pub fn get_or_insert_with<F>(
        &self,
        defaults: &ConnectionDefaults,
        text: &str,
        init: F,
    ) -> Arc<ParsedStatement>
    where
        F: FnOnce() -> ParsedStatement,
    {
        let entry = self
            .entries
            .entry(StatementKey::new(defaults, text))
            .or_insert_with(|| Arc::new(init()));
        if !entry.is_fresh() {
            tracing::debug!(text = text.trim(), "Statement cache hit");
        }
        entry.into_value()
    }

    /// Fallible variant of [`get_or_insert_with`](Self::get_or_insert_with).
    /// A failure is returned to every caller waiting on the same key and
    /// nothing is cached.
    pub fn try_get_or_insert_with<F, E>(
        &self,
        defaults: &ConnectionDefaults,
        text: &str,
        init: F,
    ) -> Result<Arc<ParsedStatement>, CqlBridgeError>
    where
        F: FnOnce() -> Result<ParsedStatement, E>,
        E: Display + Send + Sync + 'static,
    {
        let key = StatementKey::new(defaults, text);
        self.entries
            .try_get_with(key, || init().map(Arc::new))
            .map_err(|e: Arc<E>| {
                tracing::error!(error = %e, "Statement computation failed");
                CqlBridgeError::unexpected(format!("statement computation failed: {}", e))
            })
    }

    pub fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn invalidate_all(&self) {
        self.entries.invalidate_all();
        self.entries.run_pending_tasks();
    }
}

impl Default for StatementCache {
    fn default() -> Self {
        Self::from_settings(&CacheSettings::default())
    }
}
