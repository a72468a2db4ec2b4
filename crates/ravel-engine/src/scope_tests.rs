use std::sync::Arc;

use indoc::indoc;
use ravel_core::vocab::{rdf, rdfs};
use ravel_core::{NamespaceRegistry, Property, Triple, Uri, Value};
use ravel_sparql::{FilterOp, QueryGraph};
use ravel_testkit::MemoryStore;

use crate::{Error, MappingRegistry, Model, ModelGroup, Scope, SparqlQuery, TypeName};

const MODEL: &str = "http://example.org/people";
const ARCHIVE: &str = "http://example.org/archive";
const FOAF: &str = "http://xmlns.com/foaf/0.1/";
const EX: &str = "http://example.org/";

fn ex(local: &str) -> Uri {
    Uri::new(format!("{EX}{local}"))
}

fn foaf(local: &str) -> Property {
    Property::new(format!("{FOAF}{local}"))
}

fn store() -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    store.extend(
        MODEL,
        [
            Triple::new(ex("alice"), rdf::TYPE, ex("Person")),
            Triple::new(ex("alice"), foaf("name").uri(), "Alice"),
            Triple::new(ex("bob"), rdf::TYPE, ex("Person")),
            Triple::new(ex("bob"), foaf("name").uri(), "Bob"),
            Triple::new(ex("bob"), foaf("knows").uri(), ex("alice")),
        ],
    );
    store.extend(
        ARCHIVE,
        [Triple::new(ex("carol"), foaf("name").uri(), "Carol")],
    );
    Arc::new(store)
}

fn mappings() -> Arc<MappingRegistry> {
    let mut registry = MappingRegistry::new();
    registry
        .register("Person", ex("Person"))
        .register_subtype("Employee", ex("Employee"), "Person");
    Arc::new(registry)
}

fn model(store: &Arc<MemoryStore>) -> Model {
    Model::builder(MODEL, store.clone())
        .mappings(mappings())
        .build()
}

#[test]
fn builder_query_materializes_the_matching_person() {
    let store = store();
    let model = model(&store);
    let mut graph = QueryGraph::new();
    let person = graph.named_query("person");
    graph
        .at(person)
        .where_filter(foaf("knows"), FilterOp::Equal, ex("alice"));

    let resources = model.execute_builder(&graph, person).unwrap().resources().unwrap();

    assert_eq!(resources.len(), 1);
    let bob = resources.first().unwrap();
    assert_eq!(bob.uri(), &ex("bob"));
    assert_eq!(bob.program_type(), &TypeName::new("Person"));
    assert_eq!(bob.model(), Some(&Uri::new(MODEL)));
    let friend = bob.value(&foaf("knows")).unwrap();
    assert!(resources.graph()[friend.as_resource().unwrap()].is_placeholder());
}

#[test]
fn joined_queries_and_counts() {
    let store = store();
    let model = model(&store);
    let mut graph = QueryGraph::new();
    let person = graph.named_query("person");
    let friend = graph.named_query("friend");
    graph.at(person).where_query(foaf("knows"), friend);
    graph.at(friend).where_value(foaf("name"), "Alice");

    let result = model.execute_builder(&graph, person).unwrap();

    assert_eq!(result.count().unwrap(), 1);
    assert_eq!(result.uris().unwrap(), [ex("bob")]);
}

#[test]
fn sorted_builder_results_with_paging() {
    let store = store();
    let model = model(&store);
    let mut graph = QueryGraph::new();
    let person = graph.named_query("person");
    graph
        .at(person)
        .where_class(ex("Person"))
        .sort_by(foaf("name"), ravel_sparql::SortDirection::Descending, 0);

    let result = model.execute_builder(&graph, person).unwrap();

    assert_eq!(result.uris().unwrap(), [ex("bob"), ex("alice")]);
    assert_eq!(result.page(1, 1).uris().unwrap(), [ex("alice")]);
    assert_eq!(result.count().unwrap(), 2);
}

#[test]
fn inference_resolves_subclasses_in_two_phases() {
    let store = store();
    store.extend(
        MODEL,
        [
            Triple::new(ex("dave"), rdf::TYPE, ex("Employee")),
            Triple::new(ex("Employee"), rdfs::SUB_CLASS_OF, ex("Person")),
        ],
    );
    let model = model(&store);
    let mut graph = QueryGraph::new();
    let person = graph.named_query("person");
    graph.at(person).where_class(ex("Person")).inference(true);

    let resources = model.execute_builder(&graph, person).unwrap().resources().unwrap();

    assert_eq!(resources.uris(), [ex("alice"), ex("bob"), ex("dave")]);
    let dave = resources.graph().resource(&ex("dave")).unwrap();
    assert_eq!(dave.program_type(), &TypeName::new("Employee"));

    let employees = model
        .execute_builder(&graph, person)
        .unwrap()
        .resources_as(&TypeName::new("Employee"))
        .unwrap();
    assert_eq!(employees.uris(), [ex("dave")]);
}

#[test]
fn text_queries_with_parameters_and_prefixes() {
    let store = store();
    let model = model(&store);
    let query = SparqlQuery::new(indoc! {"
        SELECT ?name WHERE {
          ?p foaf:knows @friend ;
             foaf:name ?name .
        }
    "})
    .bind("@friend", ex("alice"))
    .unwrap();

    let err = model.execute(&query).unwrap().bindings().unwrap_err();
    assert!(matches!(err, Error::Store(_)));

    NamespaceRegistry::global().write().register("foaf", FOAF);
    let query = query.declare_prefixes(NamespaceRegistry::global()).unwrap();
    let rows = model.execute(&query).unwrap().bindings().unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("name"), Some(&Value::from("Bob")));
}

#[test]
fn statement_select_hydrates_resources() {
    let store = store();
    let model = model(&store);
    let query = SparqlQuery::new("SELECT ?s ?p ?o WHERE { ?s ?p ?o }");

    let resources = model.execute(&query).unwrap().resources().unwrap();

    assert_eq!(resources.uris(), [ex("alice"), ex("bob")]);
    let alice = resources.first().unwrap();
    assert!(alice.has_property(&foaf("name")));
    assert!(!alice.is_placeholder());
}

#[test]
fn text_count_matches_distinct_subjects() {
    let store = store();
    let model = model(&store);
    let query = SparqlQuery::new("SELECT ?s WHERE { ?s ?p ?o }");

    assert_eq!(model.execute(&query).unwrap().count().unwrap(), 2);
}

#[test]
fn model_conveniences() {
    let store = store();
    let model = model(&store);

    let bob = model.get_resource(&ex("bob")).unwrap();
    assert_eq!(bob.first().map(|r| r.uri().clone()), Some(ex("bob")));
    assert!(matches!(
        model.get_resource(&ex("carol")),
        Err(Error::ResourceNotFound(_))
    ));

    assert!(model.contains_resource(&ex("alice")).unwrap());
    assert!(!model.contains_resource(&ex("carol")).unwrap());
    assert!(!model.is_empty().unwrap());

    let fresh = model.create_resource(ex("eve"));
    assert!(fresh.is_new());
    assert_eq!(fresh.model(), Some(&Uri::new(MODEL)));

    model.clear().unwrap();
    assert!(model.is_empty().unwrap());
    assert_eq!(store.len(), 1);
}

#[test]
fn model_group_queries_the_union() {
    let store = store();
    let group = ModelGroup::builder(store.clone())
        .model(MODEL)
        .model(ARCHIVE)
        .build();
    let query = SparqlQuery::new("DESCRIBE ?s WHERE { ?s <http://xmlns.com/foaf/0.1/name> ?n }");

    let resources = group.execute(&query).unwrap().resources().unwrap();

    assert_eq!(resources.uris(), [ex("alice"), ex("bob"), ex("carol")]);
    assert!(resources.iter().all(|r| r.model().is_none()));
    assert!(store.queries()[0].text.contains(
        "FROM <http://example.org/people> FROM <http://example.org/archive>"
    ));
}
