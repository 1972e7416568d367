//! Rewrites a parsed relational SELECT into the native dialect.
//!
//! Only a narrow subset survives: a single table, conjunctive comparisons,
//! `IN` lists, plain-column ordering and a whitelist of native functions.
//! Anything else yields [`RewriteError::Unsupported`] and the caller falls
//! back to sending the original text untouched.

use cqlbridge_error::{CqlBridgeError, ErrorCode, ErrorContext};
use sqlparser::ast::{
    BinaryOperator, CastKind, Distinct, Expr, Function, FunctionArg, FunctionArgExpr,
    FunctionArguments, GroupByExpr, LimitClause, OrderByKind, Query, Select, SelectItem, SetExpr,
    TableFactor, UnaryOperator, Value, ValueWithSpan, WildcardAdditionalOptions,
};
use thiserror::Error;

/// Functions the native dialect evaluates itself, compared case-insensitively.
pub const NATIVE_FUNCTIONS: [&str; 20] = [
    "token",
    "ttl",
    "writetime",
    "count",
    "min",
    "max",
    "sum",
    "avg",
    "now",
    "uuid",
    "totimestamp",
    "todate",
    "tounixtimestamp",
    "mintimeuuid",
    "maxtimeuuid",
    "dateof",
    "unixtimestampof",
    "blobastext",
    "textasblob",
    "cast",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    #[error("unsupported construct: {construct}")]
    Unsupported { construct: String },
}

impl RewriteError {
    fn unsupported(construct: impl Into<String>) -> Self {
        RewriteError::Unsupported {
            construct: construct.into(),
        }
    }

    pub fn construct(&self) -> &str {
        match self {
            RewriteError::Unsupported { construct } => construct,
        }
    }
}

impl From<RewriteError> for CqlBridgeError {
    fn from(err: RewriteError) -> Self {
        let construct = err.construct().to_string();
        CqlBridgeError::new(ErrorCode::UnsupportedSyntax, err.to_string())
            .with_context(ErrorContext::Translation { construct })
            .with_hint("The statement is sent to the store as written")
    }
}

type Result<T> = std::result::Result<T, RewriteError>;

/// Rewriter for one statement.
#[derive(Debug, Clone, Copy)]
pub struct Rewriter {
    no_limit: bool,
    row_limit: u32,
}

impl Rewriter {
    /// `row_limit` is injected into unbounded queries unless `no_limit` is set.
    pub fn new(no_limit: bool, row_limit: u32) -> Self {
        Self {
            no_limit,
            row_limit,
        }
    }

    /// Rewrite `query` in place and render it in the native dialect.
    pub fn rewrite(&self, mut query: Query) -> Result<String> {
        if query.with.is_some() {
            return Err(RewriteError::unsupported("WITH"));
        }
        if query.fetch.is_some() {
            return Err(RewriteError::unsupported("FETCH"));
        }
        if !query.locks.is_empty() {
            return Err(RewriteError::unsupported("FOR UPDATE"));
        }

        match query.body.as_mut() {
            SetExpr::Select(select) => self.rewrite_select(select)?,
            SetExpr::SetOperation { op, .. } => {
                return Err(RewriteError::unsupported(op.to_string()))
            }
            SetExpr::Query(_) => return Err(RewriteError::unsupported("nested query")),
            other => return Err(RewriteError::unsupported(other.to_string())),
        }

        if let Some(order_by) = query.order_by.as_mut() {
            if order_by.interpolate.is_some() {
                return Err(RewriteError::unsupported("INTERPOLATE"));
            }
            match &mut order_by.kind {
                OrderByKind::Expressions(exprs) => {
                    for order_expr in exprs.iter_mut() {
                        if order_expr.with_fill.is_some() {
                            return Err(RewriteError::unsupported("WITH FILL"));
                        }
                        column_reference(&mut order_expr.expr)?;
                    }
                }
                OrderByKind::All(_) => return Err(RewriteError::unsupported("ORDER BY ALL")),
            }
        }

        self.apply_limit(&mut query);
        Ok(query.to_string())
    }

    fn rewrite_select(&self, select: &mut Select) -> Result<()> {
        if select.into.is_some() {
            return Err(RewriteError::unsupported("INTO"));
        }
        if select.top.is_some() {
            return Err(RewriteError::unsupported("TOP"));
        }
        if let Some(Distinct::On(_)) = select.distinct {
            return Err(RewriteError::unsupported("DISTINCT ON"));
        }
        match &select.group_by {
            GroupByExpr::Expressions(exprs, modifiers) if exprs.is_empty() && modifiers.is_empty() => {}
            _ => return Err(RewriteError::unsupported("GROUP BY")),
        }
        if select.having.is_some() {
            return Err(RewriteError::unsupported("HAVING"));
        }
        if select.prewhere.is_some()
            || select.qualify.is_some()
            || select.connect_by.is_some()
            || !select.lateral_views.is_empty()
            || !select.cluster_by.is_empty()
            || !select.distribute_by.is_empty()
            || !select.sort_by.is_empty()
            || !select.named_window.is_empty()
        {
            return Err(RewriteError::unsupported("dialect-specific SELECT clause"));
        }

        if select.from.len() != 1 {
            return Err(RewriteError::unsupported(format!(
                "{} relations in FROM",
                select.from.len()
            )));
        }
        let table = &mut select.from[0];
        if !table.joins.is_empty() {
            return Err(RewriteError::unsupported("JOIN"));
        }
        match &mut table.relation {
            TableFactor::Table { args, alias, .. } => {
                if args.is_some() {
                    return Err(RewriteError::unsupported("table function"));
                }
                *alias = None;
            }
            other => return Err(RewriteError::unsupported(other.to_string())),
        }

        for item in select.projection.iter_mut() {
            let replacement = match item {
                SelectItem::UnnamedExpr(expr) | SelectItem::ExprWithAlias { expr, .. } => {
                    check_expr(expr)?;
                    None
                }
                SelectItem::Wildcard(options) => {
                    plain_wildcard(options)?;
                    None
                }
                SelectItem::QualifiedWildcard(_, options) => {
                    plain_wildcard(options)?;
                    Some(SelectItem::Wildcard(options.clone()))
                }
            };
            if let Some(replacement) = replacement {
                *item = replacement;
            }
        }

        if let Some(selection) = select.selection.as_mut() {
            check_expr(selection)?;
        }
        Ok(())
    }

    fn apply_limit(&self, query: &mut Query) {
        if self.no_limit {
            query.limit_clause = None;
            return;
        }

        let explicit = match &query.limit_clause {
            Some(LimitClause::LimitOffset {
                limit: Some(limit),
                ..
            }) => positive_count(limit),
            Some(LimitClause::OffsetCommaLimit { limit, .. }) => positive_count(limit),
            _ => None,
        };
        let rows = explicit.unwrap_or(u64::from(self.row_limit));
        if explicit.is_none() {
            tracing::debug!(rows, "Injecting default row limit");
        }

        query.limit_clause = Some(LimitClause::LimitOffset {
            limit: Some(Expr::Value(Value::Number(rows.to_string(), false).into())),
            offset: None,
            limit_by: vec![],
        });
    }
}

fn positive_count(expr: &Expr) -> Option<u64> {
    match expr {
        Expr::Value(ValueWithSpan {
            value: Value::Number(n, _),
            ..
        }) => n.parse::<u64>().ok().filter(|rows| *rows > 0),
        _ => None,
    }
}

fn plain_wildcard(options: &WildcardAdditionalOptions) -> Result<()> {
    if options.opt_ilike.is_some()
        || options.opt_exclude.is_some()
        || options.opt_except.is_some()
        || options.opt_replace.is_some()
        || options.opt_rename.is_some()
    {
        return Err(RewriteError::unsupported("wildcard modifiers"));
    }
    Ok(())
}

/// Plain column; a qualified name keeps only its last segment.
fn column_reference(expr: &mut Expr) -> Result<()> {
    match expr {
        Expr::Identifier(_) => Ok(()),
        Expr::CompoundIdentifier(parts) => {
            let column = parts
                .pop()
                .ok_or_else(|| RewriteError::unsupported("empty identifier"))?;
            *expr = Expr::Identifier(column);
            Ok(())
        }
        other => Err(RewriteError::unsupported(other.to_string())),
    }
}

fn check_expr(expr: &mut Expr) -> Result<()> {
    match expr {
        Expr::Identifier(_) | Expr::CompoundIdentifier(_) => column_reference(expr),
        Expr::Value(_) => Ok(()),
        Expr::UnaryOp {
            op: UnaryOperator::Minus,
            expr: inner,
        } if matches!(**inner, Expr::Value(_)) => Ok(()),
        Expr::BinaryOp { left, op, right } => match op {
            BinaryOperator::And
            | BinaryOperator::Eq
            | BinaryOperator::Lt
            | BinaryOperator::LtEq
            | BinaryOperator::Gt
            | BinaryOperator::GtEq => {
                check_expr(left)?;
                check_expr(right)
            }
            other => Err(RewriteError::unsupported(format!("operator {}", other))),
        },
        Expr::InList {
            expr: target,
            list,
            negated: false,
        } => {
            check_expr(target)?;
            list.iter_mut().try_for_each(check_expr)
        }
        Expr::Nested(inner) => check_expr(inner),
        Expr::Cast {
            kind: CastKind::Cast,
            expr: inner,
            ..
        } => check_expr(inner),
        Expr::Cast { kind, .. } => Err(RewriteError::unsupported(format!("{:?} cast", kind))),
        Expr::Function(function) => check_function(function),
        other => Err(RewriteError::unsupported(other.to_string())),
    }
}

fn check_function(function: &mut Function) -> Result<()> {
    let name = function.name.to_string().to_ascii_lowercase();
    if !NATIVE_FUNCTIONS.contains(&name.as_str()) {
        return Err(RewriteError::unsupported(format!("function {}", name)));
    }
    if function.filter.is_some() || function.over.is_some() || !function.within_group.is_empty() {
        return Err(RewriteError::unsupported(format!("{} with window or filter", name)));
    }

    match &mut function.args {
        FunctionArguments::None => Ok(()),
        FunctionArguments::List(list) => {
            if list.duplicate_treatment.is_some() || !list.clauses.is_empty() {
                return Err(RewriteError::unsupported(format!("{} argument clause", name)));
            }
            for arg in list.args.iter_mut() {
                match arg {
                    FunctionArg::Unnamed(FunctionArgExpr::Expr(arg_expr)) => check_expr(arg_expr)?,
                    FunctionArg::Unnamed(FunctionArgExpr::Wildcard) => {}
                    other => return Err(RewriteError::unsupported(other.to_string())),
                }
            }
            Ok(())
        }
        FunctionArguments::Subquery(_) => Err(RewriteError::unsupported("subquery argument")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlparser::ast::Statement;
    use sqlparser::dialect::GenericDialect;
    use sqlparser::parser::Parser;

    fn rewrite(sql: &str) -> Result<String> {
        rewrite_with(sql, false)
    }

    fn rewrite_with(sql: &str, no_limit: bool) -> Result<String> {
        let mut statements = Parser::parse_sql(&GenericDialect {}, sql).unwrap();
        let Some(Statement::Query(query)) = statements.pop() else {
            panic!("not a query: {}", sql);
        };
        Rewriter::new(no_limit, 500).rewrite(*query)
    }

    #[test]
    fn test_qualifiers_and_aliases_are_stripped() {
        assert_eq!(
            rewrite("SELECT u.id, u.name FROM users AS u WHERE u.id = 1 LIMIT 5").unwrap(),
            "SELECT id, name FROM users WHERE id = 1 LIMIT 5"
        );
    }

    #[test]
    fn test_qualified_wildcard_becomes_plain() {
        assert_eq!(
            rewrite("SELECT t.* FROM t LIMIT 3").unwrap(),
            "SELECT * FROM t LIMIT 3"
        );
    }

    #[test]
    fn test_limit_injection() {
        assert_eq!(rewrite("SELECT * FROM t").unwrap(), "SELECT * FROM t LIMIT 500");
        assert_eq!(rewrite("SELECT * FROM t LIMIT 0").unwrap(), "SELECT * FROM t LIMIT 500");
        assert_eq!(
            rewrite("SELECT * FROM t LIMIT 20 OFFSET 5").unwrap(),
            "SELECT * FROM t LIMIT 20"
        );
        assert_eq!(
            rewrite_with("SELECT * FROM t LIMIT 20", true).unwrap(),
            "SELECT * FROM t"
        );
        assert_eq!(rewrite("SELECT * FROM t LIMIT ALL").unwrap(), "SELECT * FROM t LIMIT 500");
    }

    #[test]
    fn test_only_standard_cast_is_accepted() {
        assert_eq!(
            rewrite("SELECT CAST(a AS INT) FROM t LIMIT 3").unwrap(),
            "SELECT CAST(a AS INT) FROM t LIMIT 3"
        );
        assert!(rewrite("SELECT a::int FROM t LIMIT 3").is_err());
        assert!(rewrite("SELECT TRY_CAST(a AS INT) FROM t LIMIT 3").is_err());
    }

    #[test]
    fn test_native_functions_pass() {
        assert_eq!(
            rewrite("SELECT count(*), writetime(v) FROM t WHERE token(k) > token(?) LIMIT 1")
                .unwrap(),
            "SELECT count(*), writetime(v) FROM t WHERE token(k) > token(?) LIMIT 1"
        );
    }

    #[test]
    fn test_unsupported_constructs() {
        let cases = [
            ("SELECT a FROM t JOIN u ON t.id = u.id", "JOIN"),
            ("SELECT a, count(*) FROM t GROUP BY a", "GROUP BY"),
            ("SELECT a INTO x FROM t", "INTO"),
        ];
        for (sql, construct) in cases {
            let err = rewrite(sql).unwrap_err();
            assert_eq!(err.construct(), construct, "{}", sql);
        }

        assert!(rewrite("SELECT a FROM t WHERE a = 1 OR a = 2").is_err());
        assert!(rewrite("SELECT upper(a) FROM t").is_err());
        assert!(rewrite("SELECT a + 1 FROM t").is_err());
        assert!(rewrite("SELECT a FROM t UNION SELECT a FROM u").is_err());
        assert!(rewrite("SELECT a FROM (SELECT a FROM t) s").is_err());
        assert!(rewrite("SELECT CASE WHEN a = 1 THEN 2 END FROM t").is_err());
    }

    #[test]
    fn test_unsupported_maps_to_bridge_error() {
        let err: CqlBridgeError = RewriteError::unsupported("JOIN").into();
        assert_eq!(err.code, ErrorCode::UnsupportedSyntax);
        assert_eq!(
            err.context,
            Some(ErrorContext::Translation {
                construct: "JOIN".into()
            })
        );
    }
}
