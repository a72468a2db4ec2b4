use indoc::indoc;
use ravel_sparql::QueryDescriptor;

use super::check::QuerySummary;

#[test]
fn text_summary() {
    let descriptor = QueryDescriptor::parse(indoc! {"
        PREFIX ex: <http://example.org/>
        DESCRIBE ?person FROM @graph
        WHERE { ?person foaf:name ?name ; ex:knows @friend }
        ORDER BY ?name
        LIMIT 10
    "});

    let text = QuerySummary::of(&descriptor).render_text();

    insta::assert_snapshot!(text, @r"
    form        describe
    statements  yes
    variables   -
    primary     ?person
    prefixes    ex:, foaf: (undeclared)
    parameters  @graph [from] (unbound), @friend (unbound)
    from        -
    from named  -
    limit       10
    offset      -
    order by    yes
    ");
}

#[test]
fn wildcard_select_lists_first_pattern_variables() {
    let descriptor = QueryDescriptor::parse("SELECT * WHERE { ?s ?p ?o }");

    let summary = QuerySummary::of(&descriptor);

    assert!(summary.provides_statements);
    assert!(summary.render_text().contains("variables   * ?s ?p ?o\n"));
}

#[test]
fn json_summary() {
    let descriptor = QueryDescriptor::parse("ASK FROM NAMED <http://example.org/g> { ?s ?p @o }");

    let json = serde_json::to_string_pretty(&QuerySummary::of(&descriptor)).unwrap();

    insta::assert_snapshot!(json, @r#"
    {
      "form": "ask",
      "provides_statements": false,
      "wildcard": false,
      "variables": [],
      "primary": null,
      "prefixes": [],
      "parameters": [
        {
          "name": "o",
          "bound": false
        }
      ],
      "from": [],
      "from_named": [
        "http://example.org/g"
      ],
      "limit": null,
      "offset": null,
      "ordered": false
    }
    "#);
}
