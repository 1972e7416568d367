//! Statement classification.
//!
//! A successfully parsed query is a SELECT; anything else is classified by its
//! leading keyword. The same keyword match is used on raw text when the
//! parser is skipped or fails.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use sqlparser::ast::Statement;
use std::fmt;

static BLOCK_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());
static LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)(?:--|//).*$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatementType {
    Select,
    Insert,
    Update,
    Delete,
    Truncate,
    Create,
    Alter,
    Drop,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatementCategory {
    Ddl,
    Dml,
}

impl StatementType {
    /// Case-insensitive match of a leading keyword.
    pub fn from_keyword(word: &str) -> Self {
        match word.to_ascii_uppercase().as_str() {
            "SELECT" => StatementType::Select,
            "INSERT" => StatementType::Insert,
            "UPDATE" => StatementType::Update,
            "DELETE" => StatementType::Delete,
            "TRUNCATE" => StatementType::Truncate,
            "CREATE" => StatementType::Create,
            "ALTER" => StatementType::Alter,
            "DROP" => StatementType::Drop,
            _ => StatementType::Unknown,
        }
    }

    pub fn category(&self) -> StatementCategory {
        match self {
            StatementType::Create | StatementType::Alter | StatementType::Drop => {
                StatementCategory::Ddl
            }
            _ => StatementCategory::Dml,
        }
    }

    /// Statements that take the write consistency preference.
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            StatementType::Insert
                | StatementType::Update
                | StatementType::Delete
                | StatementType::Truncate
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatementType::Select => "SELECT",
            StatementType::Insert => "INSERT",
            StatementType::Update => "UPDATE",
            StatementType::Delete => "DELETE",
            StatementType::Truncate => "TRUNCATE",
            StatementType::Create => "CREATE",
            StatementType::Alter => "ALTER",
            StatementType::Drop => "DROP",
            StatementType::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for StatementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementCategory::Ddl => f.write_str("DDL"),
            StatementCategory::Dml => f.write_str("DML"),
        }
    }
}

/// Classify a parsed statement. `text` is the source it was parsed from.
pub fn classify_statement(statement: &Statement, text: &str) -> StatementType {
    match statement {
        Statement::Query(_) => StatementType::Select,
        _ => classify_text(text),
    }
}

/// Lightweight classification: first word after comments are removed.
pub fn classify_text(text: &str) -> StatementType {
    let without_blocks = BLOCK_COMMENT.replace_all(text, " ");
    let stripped = LINE_COMMENT.replace_all(&without_blocks, "");

    stripped
        .split_whitespace()
        .next()
        .map(|token| {
            let word: String = token
                .chars()
                .take_while(|c| c.is_ascii_alphabetic())
                .collect();
            StatementType::from_keyword(&word)
        })
        .unwrap_or(StatementType::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_text_skips_comments() {
        assert_eq!(
            classify_text("-- set tracing=true\n/* note */ update t set a = 1"),
            StatementType::Update
        );
        assert_eq!(classify_text("// hi\nDROP TABLE t"), StatementType::Drop);
        assert_eq!(classify_text("select*from t"), StatementType::Select);
    }

    #[test]
    fn test_unrecognized_is_unknown_dml() {
        let ty = classify_text("BEGIN BATCH INSERT INTO t (a) VALUES (1); APPLY BATCH");
        assert_eq!(ty, StatementType::Unknown);
        assert_eq!(ty.category(), StatementCategory::Dml);
        assert_eq!(classify_text("   "), StatementType::Unknown);
    }

    #[test]
    fn test_categories() {
        assert_eq!(StatementType::Create.category(), StatementCategory::Ddl);
        assert_eq!(StatementType::Truncate.category(), StatementCategory::Dml);
        assert!(StatementType::Truncate.is_write());
        assert!(!StatementType::Select.is_write());
    }
}
