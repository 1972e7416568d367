//! Per-statement directives carried in leading comments.
//!
//! ```text
//! -- set consistency_level = ANY;fetch_size=991
//! // set no_limit=true ; tracing=true
//! select * from t
//! ```
//!
//! Keys are lower-cased and trimmed, values trimmed. Later directives overwrite
//! earlier ones. Fragments without `=` or with an empty key are skipped.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

pub const CONSISTENCY_LEVEL: &str = "consistency_level";
pub const FETCH_SIZE: &str = "fetch_size";
pub const NO_LIMIT: &str = "no_limit";
pub const NO_WAIT: &str = "no_wait";
/// Seconds.
pub const READ_TIMEOUT: &str = "read_timeout";
pub const REPLACE_NULL_VALUE: &str = "replace_null_value";
pub const SQL_PARSER: &str = "sql_parser";
pub const TRACING: &str = "tracing";

pub const RECOGNIZED_KEYS: [&str; 8] = [
    CONSISTENCY_LEVEL,
    FETCH_SIZE,
    NO_LIMIT,
    NO_WAIT,
    READ_TIMEOUT,
    REPLACE_NULL_VALUE,
    SQL_PARSER,
    TRACING,
];

static DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:--|//)[ \t]*set[ \t]+(.*)$").expect("directive pattern is valid")
});

/// Option map extracted from statement text. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct StatementOptions {
    values: BTreeMap<String, String>,
}

impl StatementOptions {
    pub fn extract(text: &str) -> Self {
        let mut values = BTreeMap::new();

        for caps in DIRECTIVE.captures_iter(text) {
            let Some(body) = caps.get(1) else { continue };
            for fragment in body.as_str().split(';') {
                let Some((key, value)) = fragment.split_once('=') else {
                    continue;
                };
                let key = key.trim().to_ascii_lowercase();
                if key.is_empty() {
                    continue;
                }
                values.insert(key, value.trim().to_string());
            }
        }

        if !values.is_empty() {
            tracing::trace!(options = ?values, "Extracted statement directives");
        }
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keys that no resolver layer understands.
    pub fn unknown_keys(&self) -> impl Iterator<Item = &str> {
        self.values
            .keys()
            .map(String::as_str)
            .filter(|k| !RECOGNIZED_KEYS.contains(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiple_lines_and_markers() {
        let opts = StatementOptions::extract(
            "-- set consistency_level = ANY;fetch_size=991\n// SET no_limit=true ; Tracing=true\nselect * from t",
        );
        assert_eq!(opts.get(CONSISTENCY_LEVEL), Some("ANY"));
        assert_eq!(opts.get(FETCH_SIZE), Some("991"));
        assert_eq!(opts.get(NO_LIMIT), Some("true"));
        assert_eq!(opts.get(TRACING), Some("true"));
        assert_eq!(opts.len(), 4);
    }

    #[test]
    fn test_last_write_wins() {
        let opts = StatementOptions::extract("-- set fetch_size=1\n-- set fetch_size=2\nselect 1");
        assert_eq!(opts.get(FETCH_SIZE), Some("2"));
    }

    #[test]
    fn test_malformed_fragments_are_skipped() {
        let opts = StatementOptions::extract("-- set junk; =5; no_wait=true;;\nselect 1");
        assert_eq!(opts.len(), 1);
        assert_eq!(opts.get(NO_WAIT), Some("true"));
    }

    #[test]
    fn test_plain_comments_are_not_directives() {
        assert!(StatementOptions::extract("-- settings are below\nselect 1").is_empty());
        assert!(StatementOptions::extract("select '-- set a=b' from t").is_empty());
    }

    #[test]
    fn test_unknown_keys_are_kept() {
        let opts = StatementOptions::extract("-- set colour=blue;tracing=true");
        assert_eq!(opts.get("colour"), Some("blue"));
        assert_eq!(opts.unknown_keys().collect::<Vec<_>>(), vec!["colour"]);
    }
}
