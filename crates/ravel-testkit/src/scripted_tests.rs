use ravel_core::{QueryResults, Store, StoreError};

use crate::{RecordedQuery, ScriptedStore};

#[test]
fn answers_in_order_and_records_queries() {
    let store = ScriptedStore::with_answers([
        QueryResults::Boolean(true),
        QueryResults::Bindings(Vec::new()),
    ]);

    assert_eq!(store.execute("ASK {}", false).unwrap(), QueryResults::Boolean(true));
    assert_eq!(
        store.execute("SELECT * {}", true).unwrap(),
        QueryResults::Bindings(Vec::new())
    );
    assert_eq!(store.remaining(), 0);
    assert_eq!(
        store.queries(),
        vec![
            RecordedQuery {
                text: "ASK {}".to_owned(),
                inference: false,
            },
            RecordedQuery {
                text: "SELECT * {}".to_owned(),
                inference: true,
            },
        ]
    );
}

#[test]
fn running_dry_is_a_backend_failure() {
    let store = ScriptedStore::new();

    let err = store.execute("ASK {}", false).unwrap_err();

    assert!(matches!(err, StoreError::Backend(_)));
    assert_eq!(store.query_texts(), ["ASK {}"]);
}

#[test]
fn updates_are_recorded_not_answered() {
    let store = ScriptedStore::new();
    store.push(QueryResults::Boolean(false));

    store.execute_update("CLEAR GRAPH <http://example.org/g>").unwrap();

    assert_eq!(store.updates(), ["CLEAR GRAPH <http://example.org/g>"]);
    assert_eq!(store.remaining(), 1);
}
