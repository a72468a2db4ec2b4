use std::sync::Arc;

use ravel_core::{BindingSet, Property, QueryResults, Triple, Uri, Value};
use ravel_sparql::{QueryForm, QueryGraph, SortDirection};
use ravel_testkit::ScriptedStore;

use crate::{Error, Model, Scope, SparqlQuery};

const MODEL: &str = "http://example.org/model";
const EX: &str = "http://example.org/";

fn ex(local: &str) -> Uri {
    Uri::new(format!("{EX}{local}"))
}

fn model(store: &Arc<ScriptedStore>) -> Model {
    Model::builder(MODEL, store.clone()).build()
}

fn uri_rows(variable: &str, uris: &[&str]) -> QueryResults {
    QueryResults::Bindings(
        uris.iter()
            .map(|u| BindingSet::from_iter([(variable, Value::Uri(ex(u)))]))
            .collect(),
    )
}

fn described(uris: &[&str]) -> QueryResults {
    QueryResults::Triples(
        uris.iter()
            .map(|u| Triple::new(ex(u), ex("name"), *u))
            .collect(),
    )
}

#[test]
fn two_phase_restores_projection_order() {
    let store = Arc::new(ScriptedStore::with_answers([
        uri_rows("q0", &["a", "b", "c"]),
        described(&["c", "a", "b"]),
    ]));
    let model = model(&store);
    let mut graph = QueryGraph::new();
    let root = graph.query();
    graph
        .at(root)
        .sort_by(Property::new(ex("name")), SortDirection::Ascending, 0)
        .inference(true);

    let resources = model.execute_builder(&graph, root).unwrap().resources().unwrap();

    assert_eq!(resources.uris(), [ex("a"), ex("b"), ex("c")]);
    let queries = store.queries();
    assert_eq!(queries.len(), 2);
    assert!(queries[0].inference);
    assert!(queries[0].text.starts_with("SELECT DISTINCT ?q0 FROM <http://example.org/model>"));
    assert!(!queries[1].inference);
    insta::assert_snapshot!(queries[1].text, @"DESCRIBE <http://example.org/a> <http://example.org/b> <http://example.org/c> FROM <http://example.org/model>");
}

#[test]
fn unsorted_two_phase_keeps_describe_order() {
    let store = Arc::new(ScriptedStore::with_answers([
        uri_rows("q0", &["a", "b"]),
        described(&["b", "a"]),
    ]));
    let model = model(&store);
    let mut graph = QueryGraph::new();
    let root = graph.query();
    graph.at(root).where_any(Property::new(ex("name"))).inference(true);

    let resources = model.execute_builder(&graph, root).unwrap().resources().unwrap();

    assert_eq!(resources.uris(), [ex("b"), ex("a")]);
}

#[test]
fn empty_projection_skips_describe() {
    let store = Arc::new(ScriptedStore::with_answers([QueryResults::Bindings(Vec::new())]));
    let model = model(&store);
    let mut graph = QueryGraph::new();
    let root = graph.query();
    graph.at(root).inference(true);

    let resources = model.execute_builder(&graph, root).unwrap().resources().unwrap();

    assert!(resources.is_empty());
    assert_eq!(store.queries().len(), 1);
}

#[test]
fn without_inference_one_describe_is_issued() {
    let store = Arc::new(ScriptedStore::with_answers([described(&["a"])]));
    let model = model(&store);
    let mut graph = QueryGraph::new();
    let root = graph.named_query("thing");
    graph.at(root).where_any(Property::new(ex("name")));

    let resources = model.execute_builder(&graph, root).unwrap().resources().unwrap();

    assert_eq!(resources.uris(), [ex("a")]);
    insta::assert_snapshot!(store.query_texts()[0], @"DESCRIBE ?thing FROM <http://example.org/model> WHERE { ?thing <http://example.org/name> ?thing_o0 . }");
}

#[test]
fn paging_rewrites_limit_and_offset() {
    let store = Arc::new(ScriptedStore::with_answers([described(&["a"])]));
    let model = model(&store);
    let mut graph = QueryGraph::new();
    let root = graph.named_query("thing");
    graph.at(root).where_any(Property::new(ex("name"))).limit(5);

    let result = model.execute_builder(&graph, root).unwrap();
    result.page(20, 10).resources().unwrap();

    insta::assert_snapshot!(store.query_texts()[0], @"DESCRIBE ?thing FROM <http://example.org/model> WHERE { ?thing <http://example.org/name> ?thing_o0 . } LIMIT 10 OFFSET 20");
}

#[test]
fn builder_count_reads_count_binding() {
    let store = Arc::new(ScriptedStore::with_answers([QueryResults::Bindings(vec![
        BindingSet::from_iter([("count", Value::Long(7))]),
    ])]));
    let model = model(&store);
    let mut graph = QueryGraph::new();
    let root = graph.query();

    let count = model.execute_builder(&graph, root).unwrap().count().unwrap();

    assert_eq!(count, 7);
    assert!(store.query_texts()[0].starts_with("SELECT ( COUNT ( DISTINCT ?q0 ) AS ?count ) FROM"));
}

#[test]
fn malformed_count_answers_are_unexpected() {
    let store = Arc::new(ScriptedStore::with_answers([
        QueryResults::Bindings(vec![BindingSet::from_iter([("n", Value::Long(3))])]),
        QueryResults::Bindings(vec![BindingSet::from_iter([("count", Value::Long(-1))])]),
        QueryResults::Bindings(Vec::new()),
    ]));
    let model = model(&store);
    let mut graph = QueryGraph::new();
    let root = graph.query();
    let result = model.execute_builder(&graph, root).unwrap();

    for _ in 0..3 {
        assert!(matches!(
            result.count(),
            Err(Error::UnexpectedResult {
                expected: "count binding",
                actual: "bindings",
            })
        ));
    }
}

#[test]
fn accessor_must_match_query_form() {
    let store = Arc::new(ScriptedStore::new());
    let model = model(&store);
    let query = SparqlQuery::new("SELECT ?s WHERE { ?s ?p ?o }");

    let result = model.execute(&query).unwrap();

    assert!(matches!(
        result.ask(),
        Err(Error::QueryTypeMismatch {
            expected: QueryForm::Ask,
            actual: QueryForm::Select,
        })
    ));
    assert!(matches!(
        result.resources(),
        Err(Error::QueryShapeMismatch(QueryForm::Select))
    ));
    assert!(store.queries().is_empty());
}

#[test]
fn ask_against_bindings_is_unexpected() {
    let store = Arc::new(ScriptedStore::with_answers([QueryResults::Bindings(Vec::new())]));
    let model = model(&store);

    let err = model
        .execute(&SparqlQuery::new("ASK { ?s ?p ?o }"))
        .unwrap()
        .ask()
        .unwrap_err();

    assert!(matches!(
        err,
        Error::UnexpectedResult {
            expected: "boolean",
            actual: "bindings",
        }
    ));
}

#[test]
fn text_query_is_scoped_to_the_model() {
    let store = Arc::new(ScriptedStore::with_answers([QueryResults::Boolean(true)]));
    let model = model(&store);

    let found = model
        .execute(&SparqlQuery::new("ASK { ?s ?p ?o }"))
        .unwrap()
        .ask()
        .unwrap();

    assert!(found);
    insta::assert_snapshot!(store.query_texts()[0], @"ASK FROM <http://example.org/model> { ?s ?p ?o }");
}

#[test]
fn inferencing_text_query_uses_projection_of_primary_variable() {
    let store = Arc::new(ScriptedStore::with_answers([
        uri_rows("person", &["b", "a"]),
        described(&["a", "b"]),
    ]));
    let model = model(&store);
    let query = SparqlQuery::new(
        "DESCRIBE ?person WHERE { ?person <http://example.org/name> ?n } ORDER BY ?n",
    )
    .inference(true);

    let resources = model.execute(&query).unwrap().resources().unwrap();

    assert_eq!(resources.uris(), [ex("b"), ex("a")]);
    insta::assert_snapshot!(store.query_texts()[0], @"SELECT DISTINCT ?person FROM <http://example.org/model> WHERE { ?person <http://example.org/name> ?n } ORDER BY ?n");
}

#[test]
fn store_failures_pass_through() {
    let store = Arc::new(ScriptedStore::new());
    let model = model(&store);

    let err = model
        .execute(&SparqlQuery::new("ASK { ?s ?p ?o }"))
        .unwrap()
        .ask()
        .unwrap_err();

    assert!(matches!(err, Error::Store(_)));
}
