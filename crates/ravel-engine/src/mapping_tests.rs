use ravel_core::Class;

use crate::{MappingRegistry, TypeMapping, TypeName};

const AGENT: &str = "http://example.org/Agent";
const PERSON: &str = "http://example.org/Person";
const EMPLOYEE: &str = "http://example.org/Employee";
const ROBOT: &str = "http://example.org/Robot";

fn registry() -> MappingRegistry {
    let mut registry = MappingRegistry::new();
    registry
        .register("Agent", AGENT)
        .register_subtype("Person", PERSON, "Agent")
        .register_subtype("Employee", EMPLOYEE, "Person")
        .register("Robot", ROBOT);
    registry
}

fn names(types: Vec<TypeName>) -> Vec<String> {
    types.iter().map(|t| t.to_string()).collect()
}

#[test]
fn most_specific_type_first() {
    let registry = registry();
    let classes = [Class::new(PERSON), Class::new(EMPLOYEE), Class::new(AGENT)];

    let types = registry.matching_types(&classes, &TypeName::resource(), false);

    assert_eq!(names(types), ["Employee", "Person", "Agent"]);
}

#[test]
fn base_type_filters_unrelated_types() {
    let registry = registry();
    let classes = [Class::new(ROBOT), Class::new(PERSON)];

    let as_agent = registry.matching_types(&classes, &TypeName::new("Agent"), false);
    let as_robot = registry.matching_types(&classes, &TypeName::new("Robot"), false);

    assert_eq!(names(as_agent), ["Person"]);
    assert_eq!(names(as_robot), ["Robot"]);
}

#[test]
fn equal_depth_keeps_registration_order() {
    let registry = registry();
    let classes = [Class::new(ROBOT), Class::new(AGENT)];

    let types = registry.matching_types(&classes, &TypeName::resource(), false);

    assert_eq!(names(types), ["Agent", "Robot"]);
}

#[test]
fn subclass_edges_only_count_under_inference() {
    let mut registry = registry();
    registry.declare_subclass("http://example.org/Android", ROBOT);
    let classes = [Class::new("http://example.org/Android")];

    assert!(registry.matching_types(&classes, &TypeName::resource(), false).is_empty());
    assert_eq!(
        names(registry.matching_types(&classes, &TypeName::resource(), true)),
        ["Robot"]
    );
}

#[test]
fn assignability_walks_the_parent_chain() {
    let registry = registry();

    assert!(registry.is_assignable(&"Employee".into(), &"Agent".into()));
    assert!(registry.is_assignable(&"Robot".into(), &TypeName::resource()));
    assert!(!registry.is_assignable(&"Agent".into(), &"Person".into()));
    assert_eq!(registry.parent(&"Employee".into()), Some(&TypeName::new("Person")));
}

#[test]
fn parent_cycles_terminate() {
    let mut registry = MappingRegistry::new();
    registry
        .register_subtype("A", "http://example.org/A", "B")
        .register_subtype("B", "http://example.org/B", "A");

    let types = registry.matching_types(&[Class::new("http://example.org/A")], &"B".into(), false);

    assert_eq!(names(types), ["A"]);
}
