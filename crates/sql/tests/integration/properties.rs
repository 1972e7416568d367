use cqlbridge_common::ConnectionDefaults;
use cqlbridge_sql::{translate, StatementParser};
use proptest::prelude::*;

fn column() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["id", "name", "age", "city"]).prop_map(str::to_string)
}

fn select_text() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(column(), 1..4),
        prop::option::of(column()),
        prop::option::of(0i64..50),
        any::<bool>(),
    )
        .prop_map(|(cols, filter, limit, qualify)| {
            let prefix = if qualify { "u." } else { "" };
            let projection = cols
                .iter()
                .map(|c| format!("{}{}", prefix, c))
                .collect::<Vec<_>>()
                .join(", ");
            let mut sql = format!("select {} from users u", projection);
            if let Some(f) = filter {
                sql.push_str(&format!(" where {}{} = 7", prefix, f));
            }
            if let Some(n) = limit {
                sql.push_str(&format!(" limit {}", n));
            }
            sql
        })
}

proptest! {
    #[test]
    fn parse_is_deterministic(text in select_text()) {
        let defaults = ConnectionDefaults::default();
        let first = StatementParser::default().parse(&defaults, &text);
        let second = StatementParser::default().parse(&defaults, &text);
        prop_assert_eq!(&*first, &*second);
    }

    #[test]
    fn translating_native_output_is_a_no_op(text in select_text()) {
        let defaults = ConnectionDefaults::default();
        let once = translate(&defaults, &text).statement;
        let twice = translate(&defaults, once.text()).statement;
        prop_assert_eq!(once.text(), twice.text());
        prop_assert_eq!(once.configuration(), twice.configuration());
    }

    #[test]
    fn passthrough_text_is_unchanged(word in "[a-z]{3,8}") {
        let text = format!("{} something odd", word);
        let t = translate(&ConnectionDefaults::default(), &text);
        prop_assert!(!t.statement.was_rewritten());
        prop_assert_eq!(t.statement.text(), text.as_str());
    }
}
