use cqlbridge_common::{ConnectionDefaults, ConsistencyLevel};
use cqlbridge_error::ErrorCode;
use cqlbridge_sql::{translate, StatementCache, StatementParser};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_concurrent_misses_compute_once() {
    let cache = Arc::new(StatementCache::new(16));
    let calls = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(8));
    let defaults = ConnectionDefaults::default();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            let barrier = Arc::clone(&barrier);
            let defaults = defaults.clone();
            thread::spawn(move || {
                barrier.wait();
                cache.get_or_insert_with(&defaults, "select * from t", || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    thread::sleep(std::time::Duration::from_millis(50));
                    translate(&defaults, "select * from t").statement
                })
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    for stmt in &results[1..] {
        assert!(Arc::ptr_eq(stmt, &results[0]));
    }
}

#[test]
fn test_failures_reach_every_waiter_and_are_not_cached() {
    let cache = Arc::new(StatementCache::new(16));
    let calls = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(4));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                cache.try_get_or_insert_with(&ConnectionDefaults::default(), "boom", || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    thread::sleep(std::time::Duration::from_millis(50));
                    Err::<_, String>("exploded".to_string())
                })
            })
        })
        .collect();

    for handle in handles {
        let err = handle.join().unwrap().unwrap_err();
        assert_eq!(err.code, ErrorCode::Unexpected);
        assert!(err.message.contains("exploded"));
    }
    assert!(calls.load(Ordering::SeqCst) >= 1);
    assert!(cache.get(&ConnectionDefaults::default(), "boom").is_none());
}

#[test]
fn test_key_includes_connection_defaults() {
    let parser = StatementParser::default();
    let read_one = ConnectionDefaults::default();
    let read_all = ConnectionDefaults {
        read_consistency: ConsistencyLevel::All,
        ..ConnectionDefaults::default()
    };

    let a = parser.parse(&read_one, "select * from t");
    let b = parser.parse(&read_all, "select * from t");

    assert_eq!(a.configuration().consistency_level(), ConsistencyLevel::LocalOne);
    assert_eq!(b.configuration().consistency_level(), ConsistencyLevel::All);
    assert_eq!(parser.cache().entry_count(), 2);
}

#[test]
fn test_key_is_trimmed_but_otherwise_exact() {
    let parser = StatementParser::default();
    let defaults = ConnectionDefaults::default();

    let a = parser.parse(&defaults, "select * from t");
    let b = parser.parse(&defaults, "  select * from t\n");
    let c = parser.parse(&defaults, "SELECT * FROM t");

    assert!(Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&a, &c));
    assert_eq!(parser.cache().entry_count(), 2);

    parser.cache().invalidate_all();
    assert_eq!(parser.cache().entry_count(), 0);
}

#[test]
fn test_capacity_is_bounded() {
    let cache = StatementCache::new(4);
    let defaults = ConnectionDefaults::default();
    for i in 0..32 {
        let text = format!("select * from t{}", i);
        cache.get_or_insert_with(&defaults, &text, || translate(&defaults, &text).statement);
    }
    assert!(cache.entry_count() <= 4);
}
