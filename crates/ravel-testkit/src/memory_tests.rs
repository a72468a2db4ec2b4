use indoc::indoc;
use ravel_core::vocab::{rdf, rdfs};
use ravel_core::{QueryResults, Store, StoreError, Triple, Uri, Value};

use ravel_sparql::serialize::{serialize_uri, serialize_value};

use crate::MemoryStore;

const PEOPLE: &str = "http://example.org/people";
const OTHER: &str = "http://example.org/other";
const EX: &str = "http://example.org/";

fn ex(local: &str) -> Uri {
    Uri::new(format!("{EX}{local}"))
}

fn people() -> MemoryStore {
    let store = MemoryStore::new();
    store.extend(
        PEOPLE,
        [
            Triple::new(ex("alice"), rdf::TYPE, ex("Person")),
            Triple::new(ex("alice"), ex("name"), "Alice"),
            Triple::new(ex("alice"), ex("age"), 34i64),
            Triple::new(ex("bob"), rdf::TYPE, ex("Person")),
            Triple::new(ex("bob"), ex("name"), "Bob"),
            Triple::new(ex("bob"), ex("age"), 27i64),
            Triple::new(ex("bob"), ex("knows"), ex("alice")),
        ],
    );
    store.insert(OTHER, Triple::new(ex("carol"), ex("name"), "Carol"));
    store
}

fn rows(results: QueryResults) -> Vec<Vec<(String, Value)>> {
    let QueryResults::Bindings(rows) = results else {
        panic!("expected bindings, got {results:?}");
    };
    rows.into_iter()
        .map(|row| row.iter().map(|(k, v)| (k.to_owned(), v.clone())).collect())
        .collect()
}

fn render_triples(results: QueryResults) -> String {
    let QueryResults::Triples(triples) = results else {
        panic!("expected triples, got {results:?}");
    };
    triples
        .iter()
        .map(|t| {
            format!(
                "{} {} {} .",
                serialize_value(&t.subject).unwrap(),
                serialize_uri(t.predicate.as_str()),
                serialize_value(&t.object).unwrap()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn names(store: &MemoryStore, query: &str) -> Vec<String> {
    rows(store.execute(query, false).unwrap())
        .into_iter()
        .filter_map(|row| row.into_iter().find(|(k, _)| k == "name"))
        .filter_map(|(_, v)| v.as_str().map(str::to_owned))
        .collect()
}

#[test]
fn select_over_all_graphs_without_from() {
    let store = people();

    let found = names(&store, "SELECT ?name WHERE { ?s <http://example.org/name> ?name }");

    assert_eq!(found, ["Alice", "Bob", "Carol"]);
}

#[test]
fn from_restricts_the_default_graph() {
    let store = people();

    let found = names(
        &store,
        "SELECT ?name FROM <http://example.org/other> WHERE { ?s <http://example.org/name> ?name }",
    );

    assert_eq!(found, ["Carol"]);
}

#[test]
fn prefixes_semicolons_and_filters() {
    let store = people();
    let query = indoc! {r#"
        PREFIX ex: <http://example.org/>
        SELECT ?name WHERE {
          ?s a ex:Person ;
             ex:name ?name ;
             ex:age ?age .
          FILTER(?age > 30 && CONTAINS(LCASE(?name), "ali"))
        }
    "#};

    assert_eq!(names(&store, query), ["Alice"]);
}

#[test]
fn order_by_with_paging() {
    let store = people();
    let query = indoc! {"
        PREFIX ex: <http://example.org/>
        SELECT ?name WHERE { ?s ex:name ?name } ORDER BY DESC(?name) LIMIT 2 OFFSET 1
    "};

    assert_eq!(names(&store, query), ["Bob", "Alice"]);
}

#[test]
fn optional_keeps_unmatched_rows() {
    let store = people();
    let query = indoc! {"
        PREFIX ex: <http://example.org/>
        SELECT ?s ?friend FROM <http://example.org/people> WHERE {
          ?s a ex:Person .
          OPTIONAL { ?s ex:knows ?friend }
        }
    "};

    let rows = rows(store.execute(query, false).unwrap());

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].len(), 1);
    assert_eq!(rows[1][1], ("friend".to_owned(), Value::Uri(ex("alice"))));
}

#[test]
fn count_distinct() {
    let store = people();

    let rows = rows(
        store
            .execute(
                "SELECT (COUNT(DISTINCT ?s) AS ?count) WHERE { ?s ?p ?o }",
                false,
            )
            .unwrap(),
    );

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0].0, "count");
    assert_eq!(rows[0][0].1.as_i64(), Some(3));
}

#[test]
fn ask_and_describe() {
    let store = people();

    let answer = store
        .execute("ASK { <http://example.org/bob> ?p ?o }", false)
        .unwrap();
    assert_eq!(answer, QueryResults::Boolean(true));

    let QueryResults::Triples(triples) = store
        .execute("DESCRIBE <http://example.org/bob>", false)
        .unwrap()
    else {
        panic!("expected triples");
    };
    assert_eq!(triples.len(), 4);
    assert!(triples.iter().all(|t| t.subject == Value::Uri(ex("bob"))));
}

#[test]
fn describe_variable_bound_by_pattern() {
    let store = people();
    let query = "DESCRIBE ?who WHERE { ?who <http://example.org/knows> <http://example.org/alice> }";

    let QueryResults::Triples(triples) = store.execute(query, false).unwrap() else {
        panic!("expected triples");
    };

    let subjects: Vec<_> = triples.iter().map(|t| t.subject.clone()).collect();
    assert!(subjects.iter().all(|s| *s == Value::Uri(ex("bob"))));
    assert_eq!(subjects.len(), 4);
}

#[test]
fn construct_instantiates_template() {
    let store = people();
    let query = indoc! {"
        PREFIX ex: <http://example.org/>
        CONSTRUCT { ?b ex:knownBy ?a . ?a ex:age ?age }
        WHERE { ?a ex:knows ?b ; ex:age ?age }
    "};

    let result = store.execute(query, false).unwrap();

    insta::assert_snapshot!(render_triples(result), @r"
    <http://example.org/alice> <http://example.org/knownBy> <http://example.org/bob> .
    <http://example.org/bob> <http://example.org/age> '27'^^<http://www.w3.org/2001/XMLSchema#long> .
    ");
}

#[test]
fn signed_numbers_match_stored_values() {
    let store = people();
    store.insert(PEOPLE, Triple::new(ex("dave"), ex("balance"), -5i64));
    let query = "SELECT ?s WHERE { ?s <http://example.org/balance> -5 }";

    let rows = rows(store.execute(query, false).unwrap());

    assert_eq!(rows, vec![vec![("s".to_owned(), Value::Uri(ex("dave")))]]);
}

#[test]
fn inference_follows_subclass_closure() {
    let store = people();
    store.extend(
        PEOPLE,
        [
            Triple::new(ex("Person"), rdfs::SUB_CLASS_OF, ex("Agent")),
            Triple::new(ex("Agent"), rdfs::SUB_CLASS_OF, ex("Thing")),
        ],
    );
    let query = "SELECT ?s WHERE { ?s a <http://example.org/Thing> }";

    assert!(rows(store.execute(query, false).unwrap()).is_empty());
    assert_eq!(rows(store.execute(query, true).unwrap()).len(), 2);
}

#[test]
fn typed_literals_compare_by_value() {
    let store = people();
    let query = indoc! {"
        SELECT ?s WHERE {
          ?s <http://example.org/age> ?age .
          FILTER(?age = '27'^^<http://www.w3.org/2001/XMLSchema#integer>)
        }
    "};

    let rows = rows(store.execute(query, false).unwrap());

    assert_eq!(rows, vec![vec![("s".to_owned(), Value::Uri(ex("bob")))]]);
}

#[test]
fn clear_graph_drops_only_that_graph() {
    let store = people();

    store.execute_update("CLEAR GRAPH <http://example.org/people>").unwrap();

    assert!(store.triples(&Uri::new(PEOPLE)).is_empty());
    assert_eq!(store.len(), 1);
}

#[test]
fn malformed_and_unsupported_queries() {
    let store = people();

    let err = store.execute("SELECT ?s WHERE { ?s ?p }", false).unwrap_err();
    assert!(matches!(err, StoreError::Malformed(_)));

    let err = store
        .execute("SELECT ?s WHERE { { ?s ?p ?o } UNION { ?o ?p ?s } }", false)
        .unwrap_err();
    assert!(matches!(err, StoreError::Unsupported(_)));

    let err = store.execute_update("DROP GRAPH <http://example.org/people>").unwrap_err();
    assert!(matches!(err, StoreError::Unsupported(_)));
}

#[test]
fn records_every_query() {
    let store = people();

    store.execute("ASK { ?s ?p ?o }", true).unwrap();

    let log = store.queries();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].text, "ASK { ?s ?p ?o }");
    assert!(log[0].inference);
}
