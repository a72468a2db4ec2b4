use indoc::indoc;
use ravel_core::{Uri, Value};

use super::{DescriptorCache, QueryDescriptor, QueryForm};
use crate::builder::SortDirection;

#[test]
fn wildcard_select_provides_statements() {
    let descriptor = QueryDescriptor::parse("SELECT * WHERE { ?s ?p ?o }");

    assert_eq!(descriptor.form(), QueryForm::Select);
    assert!(descriptor.is_wildcard());
    assert!(descriptor.provides_statements());
    assert_eq!(descriptor.statement_variables(), Some(["s", "p", "o"]));
}

#[test]
fn single_column_select_does_not_provide_statements() {
    let descriptor = QueryDescriptor::parse("SELECT ?s WHERE { ?s ?p ?o }");

    assert!(!descriptor.provides_statements());
    assert_eq!(descriptor.global_variables(), ["s"]);
    assert_eq!(descriptor.primary_variable(), Some("s"));
}

#[test]
fn statement_detection_is_order_sensitive() {
    let wrong = QueryDescriptor::parse("SELECT ?a ?b ?c WHERE { ?c ?b ?a }");
    let right = QueryDescriptor::parse("SELECT ?a ?b ?c WHERE { ?a ?b ?c }");

    assert!(!wrong.provides_statements());
    assert!(wrong.statement_variables().is_none());
    assert!(right.provides_statements());
}

#[test]
fn statement_detection_settles_on_first_pattern() {
    let later = QueryDescriptor::parse("SELECT ?s ?p ?o WHERE { ?s a ?t . ?s ?p ?o }");
    let first = QueryDescriptor::parse("SELECT ?s ?p ?o WHERE { ?s ?p ?o . ?s a ?t }");
    let nested = QueryDescriptor::parse("SELECT ?s ?p ?o WHERE { { ?s ?p ?o } . ?s a ?t }");

    assert!(!later.provides_statements());
    assert!(first.provides_statements());
    assert!(nested.provides_statements());
}

#[test]
fn describe_and_construct_always_provide_statements() {
    let describe = QueryDescriptor::parse("DESCRIBE ?x WHERE { ?x a ?t }");
    let construct = QueryDescriptor::parse("CONSTRUCT { ?s ?p ?o } WHERE { ?s ?p ?o }");

    assert_eq!(describe.form(), QueryForm::Describe);
    assert!(describe.provides_statements());
    assert_eq!(describe.primary_variable(), Some("x"));
    assert_eq!(construct.form(), QueryForm::Construct);
    assert!(construct.provides_statements());
    assert_eq!(construct.primary_variable(), None);
}

#[test]
fn ask_never_provides_statements() {
    let descriptor = QueryDescriptor::parse("ASK { ?s ?p ?o }");

    assert_eq!(descriptor.form(), QueryForm::Ask);
    assert!(!descriptor.provides_statements());
}

#[test]
fn aggregate_projection_is_not_a_wildcard() {
    let descriptor =
        QueryDescriptor::parse("SELECT (COUNT(*) AS ?n) WHERE { ?s ?p ?o }");

    assert!(!descriptor.is_wildcard());
    assert_eq!(descriptor.global_variables(), ["n"]);
}

#[test]
fn unknown_form() {
    let descriptor = QueryDescriptor::parse("{ ?s ?p ?o }");

    assert_eq!(descriptor.form(), QueryForm::Unknown);
    assert!(!descriptor.provides_statements());
}

#[test]
fn limit_is_inserted_then_replaced() {
    let mut descriptor = QueryDescriptor::parse("SELECT ?s WHERE { ?s ?p ?o }");
    assert_eq!(descriptor.limit(), None);

    descriptor.set_limit(10);
    insta::assert_snapshot!(descriptor.serialize().unwrap(), @"SELECT ?s WHERE { ?s ?p ?o } LIMIT 10");

    descriptor.set_limit(20);
    descriptor.set_offset(5);
    insta::assert_snapshot!(descriptor.serialize().unwrap(), @"SELECT ?s WHERE { ?s ?p ?o } LIMIT 20 OFFSET 5");
    assert_eq!(descriptor.limit(), Some(20));
    assert_eq!(descriptor.offset(), Some(5));
}

#[test]
fn subquery_limit_is_not_the_outer_limit() {
    let descriptor =
        QueryDescriptor::parse("SELECT ?s WHERE { { SELECT ?s WHERE { ?s ?p ?o } LIMIT 3 } }");

    assert_eq!(descriptor.limit(), None);
}

#[test]
fn order_by_goes_before_paging() {
    let mut descriptor = QueryDescriptor::parse("SELECT ?s WHERE { ?s ?p ?o } LIMIT 5");
    assert!(!descriptor.has_order_by());

    descriptor.add_order_by("?s", SortDirection::Descending);
    descriptor.add_order_by("o", SortDirection::Ascending);

    assert!(descriptor.has_order_by());
    insta::assert_snapshot!(descriptor.serialize().unwrap(), @"SELECT ?s WHERE { ?s ?p ?o } ORDER BY DESC ( ?s ) ASC ( ?o ) LIMIT 5");
}

#[test]
fn query_parts() {
    let mut descriptor = QueryDescriptor::parse(indoc! {"
        PREFIX ex: <http://example.org/>
        SELECT ?person
        FROM <http://example.org/people>
        WHERE { ?person a ex:Person ; ex:name ?name }
        ORDER BY ?name
        LIMIT 10
    "});
    descriptor.add_named_graph(&Uri::new("http://example.org/extra"));

    insta::assert_snapshot!(descriptor.prologue().unwrap(), @"PREFIX ex: <http://example.org/>");
    insta::assert_snapshot!(descriptor.dataset_clauses(), @"FROM <http://example.org/people> FROM NAMED <http://example.org/extra>");
    insta::assert_snapshot!(descriptor.where_body().unwrap(), @"?person a ex:Person ; ex:name ?name");
    insta::assert_snapshot!(descriptor.solution_modifiers().unwrap(), @"ORDER BY ?name LIMIT 10");
}

#[test]
fn construct_where_body_skips_template() {
    let descriptor = QueryDescriptor::parse("CONSTRUCT { ?s ?p ?o } { ?s ?p ?o . ?s a ?t }");

    insta::assert_snapshot!(descriptor.where_body().unwrap(), @"?s ?p ?o . ?s a ?t");
}

#[test]
fn binding_through_descriptor() {
    let mut descriptor = QueryDescriptor::parse("ASK { ?s ?p @v }");

    descriptor.bind("v", &Value::Long(3)).unwrap();

    insta::assert_snapshot!(descriptor.serialize().unwrap(), @"ASK { ?s ?p '3'^^<http://www.w3.org/2001/XMLSchema#long> }");
}

#[test]
fn cache_hands_out_independent_copies() {
    let cache = DescriptorCache::new();
    let text = "ASK { ?s ?p @v }";

    let mut first = cache.get_or_parse(text);
    first.bind("v", &Value::Boolean(true)).unwrap();
    let second = cache.get_or_parse(text);

    assert_eq!(cache.len(), 1);
    assert!(cache.contains(text));
    assert!(first.rewriter().is_bound("v"));
    assert!(!second.rewriter().is_bound("v"));
}
