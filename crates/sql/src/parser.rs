//! Translation pipeline and the cached [`StatementParser`] facade.
//!
//! ```text
//! text ─► directives ─► prepare ─► parse ─┬─ SELECT ─► rewrite ─┬─► rewritten
//!                                         │                     └─► passthrough
//!                                         ├─ other ─────────────────► passthrough
//!                                         └─ error ─► classify text ─► passthrough
//! ```

use crate::cache::StatementCache;
use crate::classify::{self, StatementType};
use crate::configuration::{self, StatementConfiguration};
use crate::escape::prepare_for_parse;
use crate::options::StatementOptions;
use crate::rewrite::{RewriteError, Rewriter};
use crate::statement::ParsedStatement;
use cqlbridge_common::{CacheSettings, ConnectionDefaults};
use cqlbridge_error::{CqlBridgeError, ErrorCode};
use serde::Serialize;
use sqlparser::ast::Statement;
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;
use std::sync::Arc;

/// Why a statement was passed through as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum Fallback {
    /// Relational parsing disabled by directive or connection setting.
    ParserDisabled,
    /// The relational grammar rejected the text.
    Syntax(String),
    /// Parsed, but uses constructs the native dialect lacks.
    Unsupported(String),
}

impl Fallback {
    pub fn to_error(&self) -> Option<CqlBridgeError> {
        match self {
            Fallback::ParserDisabled => None,
            Fallback::Syntax(message) => Some(CqlBridgeError::new(
                ErrorCode::SyntaxError,
                message.clone(),
            )),
            Fallback::Unsupported(construct) => Some(
                RewriteError::Unsupported {
                    construct: construct.clone(),
                }
                .into(),
            ),
        }
    }
}

/// Outcome of one uncached translation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Translation {
    pub statement: ParsedStatement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<Fallback>,
}

/// Translate `text` under `defaults`. Never fails: anything the rewriter or
/// the parser cannot handle is passed through with a lightweight
/// classification.
pub fn translate(defaults: &ConnectionDefaults, text: &str) -> Translation {
    let text = text.trim();
    let options = StatementOptions::extract(text);

    if !configuration::sql_parser_enabled(defaults, &options) {
        return passthrough(defaults, text, &options, Fallback::ParserDisabled);
    }

    let prepared = prepare_for_parse(text);

    let statement = match Parser::parse_sql(&GenericDialect {}, &prepared) {
        Ok(mut statements) if statements.len() == 1 => statements.remove(0),
        Ok(statements) => {
            let reason = format!("expected one statement, found {}", statements.len());
            return passthrough(defaults, text, &options, Fallback::Syntax(reason));
        }
        Err(e) => {
            tracing::debug!(error = %e, "Relational parse failed, passing through");
            return passthrough(defaults, text, &options, Fallback::Syntax(e.to_string()));
        }
    };

    let statement_type = classify::classify_statement(&statement, text);
    let config = StatementConfiguration::resolve(defaults, statement_type, &options);

    let Statement::Query(query) = statement else {
        return Translation {
            statement: ParsedStatement::new(text.to_string(), config, false),
            fallback: None,
        };
    };

    match Rewriter::new(config.no_limit(), defaults.row_limit).rewrite(*query) {
        Ok(native) => {
            tracing::debug!(original = %text, rewritten = %native, "Rewrote statement");
            Translation {
                statement: ParsedStatement::new(native, config, true),
                fallback: None,
            }
        }
        Err(e) => {
            tracing::debug!(error = %e, "Rewrite unsupported, passing through");
            Translation {
                statement: ParsedStatement::new(text.to_string(), config, false),
                fallback: Some(Fallback::Unsupported(e.construct().to_string())),
            }
        }
    }
}

fn passthrough(
    defaults: &ConnectionDefaults,
    text: &str,
    options: &StatementOptions,
    reason: Fallback,
) -> Translation {
    let statement_type: StatementType = classify::classify_text(text);
    let config = StatementConfiguration::resolve(defaults, statement_type, options);
    Translation {
        statement: ParsedStatement::new(text.to_string(), config, false),
        fallback: Some(reason),
    }
}

/// Cached entry point used by the execution layer.
#[derive(Debug, Clone)]
pub struct StatementParser {
    cache: Arc<StatementCache>,
}

impl StatementParser {
    pub fn new(cache: Arc<StatementCache>) -> Self {
        Self { cache }
    }

    pub fn from_settings(settings: &CacheSettings) -> Self {
        Self::new(Arc::new(StatementCache::from_settings(settings)))
    }

    pub fn cache(&self) -> &Arc<StatementCache> {
        &self.cache
    }

    /// Parsed statement for `text`, computed once per (text, defaults) pair.
    pub fn parse(&self, defaults: &ConnectionDefaults, text: &str) -> Arc<ParsedStatement> {
        self.cache
            .get_or_insert_with(defaults, text, || translate(defaults, text).statement)
    }

    /// Uncached translation, including the fallback reason.
    pub fn translate(&self, defaults: &ConnectionDefaults, text: &str) -> Translation {
        translate(defaults, text)
    }
}

impl Default for StatementParser {
    fn default() -> Self {
        Self::new(Arc::new(StatementCache::default()))
    }
}
