//! Token-level preparation of relational text before parsing.
//!
//! Two rewrites run in one pass over the tokens. Reserved words used as the
//! trailing segment of a dotted identifier are quoted (`t.key` becomes
//! `t."key"`), and `//` comment lines, which the relational grammar does not
//! accept, are dropped. String literals and `--` comments that happen to
//! contain either pattern are left alone. Text that does not tokenize is
//! returned unchanged and left for the parser to reject.

use sqlparser::dialect::GenericDialect;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Token, Tokenizer, Whitespace, Word};
use std::borrow::Cow;

/// Column names that collide with grammar keywords of the relational parser.
pub const RESERVED_COLUMN_NAMES: [&str; 16] = [
    "count",
    "date",
    "index",
    "key",
    "level",
    "list",
    "map",
    "set",
    "time",
    "timestamp",
    "token",
    "ttl",
    "type",
    "user",
    "value",
    "values",
];

pub fn prepare_for_parse(text: &str) -> Cow<'_, str> {
    let dialect = GenericDialect {};
    let tokens = match Tokenizer::new(&dialect, text).with_unescape(false).tokenize() {
        Ok(tokens) => tokens,
        Err(e) => {
            tracing::trace!(error = %e, "Skipping token preparation, text does not tokenize");
            return Cow::Borrowed(text);
        }
    };

    let mut out = Vec::with_capacity(tokens.len());
    let mut changed = false;
    let mut after_period = false;
    let mut line_start = true;
    let mut in_slash_comment = false;
    let mut iter = tokens.into_iter().peekable();

    while let Some(token) = iter.next() {
        if in_slash_comment {
            if matches!(token, Token::Whitespace(Whitespace::Newline)) {
                in_slash_comment = false;
                line_start = true;
                out.push(token);
            }
            continue;
        }

        match token {
            Token::Whitespace(Whitespace::Newline) => {
                line_start = true;
                out.push(token);
                continue;
            }
            Token::Whitespace(Whitespace::SingleLineComment { .. }) => {
                // the comment token owns its trailing newline
                line_start = true;
                out.push(token);
                continue;
            }
            Token::Whitespace(_) => {
                out.push(token);
                continue;
            }
            Token::DuckIntDiv if line_start => {
                in_slash_comment = true;
                changed = true;
                continue;
            }
            Token::Div if line_start && matches!(iter.peek(), Some(Token::Div)) => {
                iter.next();
                in_slash_comment = true;
                changed = true;
                continue;
            }
            _ => {}
        }

        line_start = false;
        let token = match token {
            Token::Word(word) if after_period && needs_quoting(&word) => {
                changed = true;
                Token::Word(Word {
                    value: word.value.to_ascii_lowercase(),
                    quote_style: Some('"'),
                    keyword: Keyword::NoKeyword,
                })
            }
            other => other,
        };
        after_period = matches!(token, Token::Period);
        out.push(token);
    }

    if !changed {
        return Cow::Borrowed(text);
    }
    Cow::Owned(out.iter().map(ToString::to_string).collect())
}

fn needs_quoting(word: &Word) -> bool {
    word.quote_style.is_none()
        && RESERVED_COLUMN_NAMES
            .iter()
            .any(|reserved| word.value.eq_ignore_ascii_case(reserved))
}
