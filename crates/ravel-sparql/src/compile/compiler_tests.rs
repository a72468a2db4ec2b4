use ravel_core::Value;

use crate::builder::{FilterOp, QueryGraph, SortDirection};
use crate::descriptor::QueryDescriptor;

use super::QueryCompiler;

const KNOWS: &str = "http://xmlns.com/foaf/0.1/knows";
const NAME: &str = "http://xmlns.com/foaf/0.1/name";
const AGE: &str = "http://xmlns.com/foaf/0.1/age";

#[test]
fn empty_root_gets_generic_pattern() {
    let mut graph = QueryGraph::new();
    let q = graph.query();

    let compiler = QueryCompiler::new(&graph, q).unwrap();

    insta::assert_snapshot!(compiler.compile_describe().unwrap(), @"DESCRIBE ?q0 WHERE { ?q0 ?q0_p ?q0_o . }");
}

#[test]
fn equal_values_are_inlined() {
    let mut graph = QueryGraph::new();
    let person = graph.named_query("person");
    graph
        .at(person)
        .where_class("http://example.org/Person")
        .where_value(NAME, "Bob");

    let compiler = QueryCompiler::new(&graph, person).unwrap();

    insta::assert_snapshot!(compiler.compile_select().unwrap(), @r#"SELECT DISTINCT ?person WHERE { ?person <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://example.org/Person> . ?person <http://xmlns.com/foaf/0.1/name> "Bob" . }"#);
}

#[test]
fn comparisons_become_filters() {
    let mut graph = QueryGraph::new();
    let q = graph.named_query("p");
    graph
        .at(q)
        .where_filter(AGE, FilterOp::GreaterOrEqual, 18)
        .where_filter(NAME, FilterOp::Contains, "li");

    let compiler = QueryCompiler::new(&graph, q).unwrap();

    insta::assert_snapshot!(compiler.compile_select().unwrap(), @r#"SELECT DISTINCT ?p WHERE { ?p <http://xmlns.com/foaf/0.1/age> ?p_o0 . ?p <http://xmlns.com/foaf/0.1/name> ?p_o1 . FILTER(?p_o0 >= '18'^^<http://www.w3.org/2001/XMLSchema#int>) FILTER(CONTAINS(STR(?p_o1), "li")) }"#);
}

#[test]
fn pattern_variables_avoid_query_variables() {
    let mut graph = QueryGraph::new();
    let a = graph.named_query("a");
    let other = graph.named_query("a_o0");
    graph
        .at(a)
        .where_filter(AGE, FilterOp::GreaterThan, 5)
        .where_query(KNOWS, other);

    let compiler = QueryCompiler::new(&graph, a).unwrap();

    insta::assert_snapshot!(compiler.compile_select().unwrap(), @"SELECT DISTINCT ?a WHERE { ?a <http://xmlns.com/foaf/0.1/age> ?a_o0_1 . ?a <http://xmlns.com/foaf/0.1/knows> ?a_o0 . FILTER(?a_o0_1 > '5'^^<http://www.w3.org/2001/XMLSchema#int>) }");
}

#[test]
fn joins_follow_breadth_first_order() {
    let mut graph = QueryGraph::new();
    let person = graph.named_query("person");
    let friend = graph.named_query("friend");
    graph.at(person).where_query(KNOWS, friend);
    graph
        .at(friend)
        .where_value(NAME, Value::uri("http://example.org/nobody"));

    let compiler = QueryCompiler::new(&graph, person).unwrap();

    assert_eq!(compiler.order(), &[person, friend]);
    insta::assert_snapshot!(compiler.compile_describe().unwrap(), @"DESCRIBE ?person WHERE { ?person <http://xmlns.com/foaf/0.1/knows> ?friend . ?friend <http://xmlns.com/foaf/0.1/name> <http://example.org/nobody> . }");
}

#[test]
fn reverse_join() {
    let mut graph = QueryGraph::new();
    let alice = graph.named_query("alice");
    let fan = graph.named_query("fan");
    graph.at(alice).where_value(NAME, "Alice");
    graph.at(fan).where_referenced_by(alice, KNOWS);

    let compiler = QueryCompiler::new(&graph, fan).unwrap();

    insta::assert_snapshot!(compiler.compile_select().unwrap(), @r#"SELECT DISTINCT ?fan WHERE { ?alice <http://xmlns.com/foaf/0.1/knows> ?fan . ?alice <http://xmlns.com/foaf/0.1/name> "Alice" . }"#);
}

#[test]
fn sorting_and_paging() {
    let mut graph = QueryGraph::new();
    let q = graph.named_query("p");
    graph
        .at(q)
        .sort_by(AGE, SortDirection::Descending, 2)
        .sort_by(NAME, SortDirection::Ascending, 1)
        .limit(10)
        .offset(30);

    let compiler = QueryCompiler::new(&graph, q).unwrap();

    assert!(compiler.is_sorted().unwrap());
    insta::assert_snapshot!(compiler.compile_describe().unwrap(), @"DESCRIBE ?p WHERE { ?p <http://xmlns.com/foaf/0.1/age> ?p_o0 . ?p <http://xmlns.com/foaf/0.1/name> ?p_o1 . } ORDER BY ASC(?p_o1) DESC(?p_o0) LIMIT 10 OFFSET 30");
    insta::assert_snapshot!(compiler.compile_count().unwrap(), @"SELECT (COUNT(DISTINCT ?p) AS ?count) WHERE { ?p <http://xmlns.com/foaf/0.1/age> ?p_o0 . ?p <http://xmlns.com/foaf/0.1/name> ?p_o1 . }");
}

#[test]
fn compiled_text_round_trips_through_descriptor() {
    let mut graph = QueryGraph::new();
    let q = graph.named_query("p");
    graph.at(q).where_value(NAME, "Bob").limit(3);
    let compiler = QueryCompiler::new(&graph, q).unwrap();

    let describe = QueryDescriptor::parse(&compiler.compile_describe().unwrap());
    let select = QueryDescriptor::parse(&compiler.compile_select().unwrap());

    assert!(describe.provides_statements());
    assert_eq!(describe.primary_variable(), Some("p"));
    assert_eq!(describe.limit(), Some(3));
    assert_eq!(select.primary_variable(), Some("p"));
    assert!(!select.provides_statements());
}

#[test]
fn cyclic_graph_compiles_once_per_query() {
    let mut graph = QueryGraph::new();
    let a = graph.named_query("a");
    let b = graph.named_query("b");
    graph.at(a).where_query(KNOWS, b);
    graph.at(b).where_query(KNOWS, a);

    let compiler = QueryCompiler::new(&graph, a).unwrap();

    insta::assert_snapshot!(compiler.compile_select().unwrap(), @"SELECT DISTINCT ?a WHERE { ?a <http://xmlns.com/foaf/0.1/knows> ?b . ?b <http://xmlns.com/foaf/0.1/knows> ?a . }");
}
