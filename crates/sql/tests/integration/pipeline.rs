use crate::common::defaults_with_limit;
use cqlbridge_common::{ConnectionDefaults, ConsistencyLevel};
use cqlbridge_sql::{
    translate, Fallback, StatementCategory, StatementParser, StatementType, FETCH_SIZE_INHERIT,
};

#[test]
fn test_directives_resolve_into_configuration() {
    let text = "-- set consistency_level = ANY;fetch_size=991\n-- set no_limit=true ; tracing=true\nselect * from t";
    let parser = StatementParser::default();
    let stmt = parser.parse(&ConnectionDefaults::default(), text);
    let config = stmt.configuration();

    assert_eq!(config.consistency_level(), ConsistencyLevel::Any);
    assert_eq!(config.fetch_size(), 991);
    assert!(config.no_limit());
    assert!(config.tracing());
    assert_eq!(stmt.text(), "SELECT * FROM t");
}

#[test]
fn test_select_gains_default_row_limit() {
    let t = translate(&defaults_with_limit(250), "select id, name from users where id = 4");
    assert!(t.statement.was_rewritten());
    assert_eq!(
        t.statement.text(),
        "SELECT id, name FROM users WHERE id = 4 LIMIT 250"
    );
    assert_eq!(t.statement.configuration().fetch_size(), FETCH_SIZE_INHERIT);
}

#[test]
fn test_no_limit_removes_limit() {
    let t = translate(
        &ConnectionDefaults::default(),
        "-- set no_limit=true\nselect * from t limit 10",
    );
    assert_eq!(t.statement.text(), "SELECT * FROM t");
}

#[test]
fn test_join_falls_back_to_passthrough() {
    let text = "select a.x, b.y from a join b on a.id = b.id";
    let t = translate(&ConnectionDefaults::default(), text);

    assert_eq!(t.fallback, Some(Fallback::Unsupported("JOIN".into())));
    assert!(!t.statement.was_rewritten());
    assert_eq!(t.statement.text(), text);
    assert_eq!(t.statement.statement_type(), StatementType::Select);
}

#[test]
fn test_native_syntax_falls_back_with_keyword_classification() {
    let t = translate(
        &ConnectionDefaults::default(),
        "/* ttl */ UPDATE users USING TTL 60 SET name = 'x' WHERE id = 1 IF EXISTS",
    );
    assert!(matches!(t.fallback, Some(Fallback::Syntax(_))));
    assert_eq!(t.statement.statement_type(), StatementType::Update);
    assert_eq!(
        t.statement.configuration().consistency_level(),
        ConnectionDefaults::default().write_consistency
    );
}

#[test]
fn test_unknown_statement_gets_general_consistency() {
    let t = translate(&ConnectionDefaults::default(), "BEGIN BATCH APPLY BATCH");
    let config = t.statement.configuration();
    assert_eq!(config.statement_type(), StatementType::Unknown);
    assert_eq!(config.statement_category(), StatementCategory::Dml);
    assert_eq!(config.consistency_level(), ConnectionDefaults::default().consistency);
}

#[test]
fn test_ddl_is_classified() {
    let t = translate(
        &ConnectionDefaults::default(),
        "CREATE TABLE t (id INT PRIMARY KEY)",
    );
    assert_eq!(t.statement.statement_type(), StatementType::Create);
    assert_eq!(
        t.statement.configuration().statement_category(),
        StatementCategory::Ddl
    );
}

#[test]
fn test_parser_disabled_skips_rewrite() {
    let defaults = ConnectionDefaults {
        sql_parser: false,
        ..ConnectionDefaults::default()
    };
    let t = translate(&defaults, "select * from t");
    assert_eq!(t.fallback, Some(Fallback::ParserDisabled));
    assert_eq!(t.statement.text(), "select * from t");

    let t = translate(&defaults, "-- set sql_parser=true\nselect * from t");
    assert!(t.statement.was_rewritten());
}

#[test]
fn test_reserved_column_names_after_qualifier() {
    let t = translate(
        &defaults_with_limit(10),
        "select t.key, t.value from kv t where t.key = 'a.key'",
    );
    assert_eq!(
        t.statement.text(),
        "SELECT \"key\", \"value\" FROM kv WHERE \"key\" = 'a.key' LIMIT 10"
    );
}

#[test]
fn test_with_parameters_shares_configuration() {
    let parser = StatementParser::default();
    let stmt = parser.parse(&ConnectionDefaults::default(), "select * from t where id = ?");
    let bound = stmt.with_parameters(vec![cqlbridge_core::CqlValue::Int(3)]);

    assert_eq!(bound.text(), stmt.text());
    assert_eq!(bound.configuration(), stmt.configuration());
    assert_eq!(bound.parameters().map(|p| p.len()), Some(1));
    assert_eq!(stmt.parameters(), None);
}

#[test]
fn test_statement_serializes() {
    let t = translate(&ConnectionDefaults::default(), "select * from t limit 5");
    let json = serde_json::to_value(&t).unwrap();

    assert_eq!(json["statement"]["text"], "SELECT * FROM t LIMIT 5");
    assert_eq!(
        json["statement"]["configuration"]["consistency_level"],
        "LOCAL_ONE"
    );
    assert_eq!(json["statement"]["configuration"]["statement_type"], "SELECT");
    assert!(json.get("fallback").is_none());
}
