use super::{SyntaxKind, lex, token_text};

fn snapshot(input: &str) -> String {
    format_tokens(input, false)
}

fn snapshot_raw(input: &str) -> String {
    format_tokens(input, true)
}

fn format_tokens(input: &str, include_trivia: bool) -> String {
    let tokens = lex(input);
    let mut out = String::new();
    for token in tokens {
        if include_trivia || !token.kind.is_trivia() {
            out.push_str(&format!(
                "{:?} {:?}\n",
                token.kind,
                token_text(input, &token)
            ));
        }
    }
    out
}

#[test]
fn select_query() {
    insta::assert_snapshot!(snapshot("SELECT ?s WHERE { ?s a ex:Person . }"), @r#"
    Word "SELECT"
    Var "?s"
    Word "WHERE"
    BraceOpen "{"
    Var "?s"
    Word "a"
    PrefixedName "ex:Person"
    Dot "."
    BraceClose "}"
    "#);
}

#[test]
fn iris_and_comparisons() {
    insta::assert_snapshot!(snapshot("<http://example.org/a> < <= > >= != ="), @r#"
    Iri "<http://example.org/a>"
    Less "<"
    LessEquals "<="
    Greater ">"
    GreaterEquals ">="
    NotEquals "!="
    Equals "="
    "#);
}

#[test]
fn prefixed_name_variants() {
    insta::assert_snapshot!(snapshot("ex: :local foaf:knows _:b1"), @r#"
    PrefixedName "ex:"
    PrefixedName ":local"
    PrefixedName "foaf:knows"
    BlankNode "_:b1"
    "#);
}

#[test]
fn at_names() {
    insta::assert_snapshot!(snapshot(r#"@person "chat"@fr "colour"@en-GB"#), @r#"
    AtName "@person"
    StringLiteral "\"chat\""
    AtName "@fr"
    StringLiteral "\"colour\""
    AtName "@en-GB"
    "#);
}

#[test]
fn string_literals() {
    insta::assert_snapshot!(snapshot(r#"'one' "two \" quoted" """three
lines""""#), @r#"
    StringLiteral "'one'"
    StringLiteral "\"two \\\" quoted\""
    LongStringLiteral "\"\"\"three\nlines\"\"\""
    "#);
}

#[test]
fn typed_literal() {
    insta::assert_snapshot!(snapshot("'42'^^<http://www.w3.org/2001/XMLSchema#int>"), @r#"
    StringLiteral "'42'"
    DoubleCaret "^^"
    Iri "<http://www.w3.org/2001/XMLSchema#int>"
    "#);
}

#[test]
fn numbers() {
    insta::assert_snapshot!(snapshot("42 3.14 .5 1e10 2.5E-3"), @r#"
    Integer "42"
    Decimal "3.14"
    Decimal ".5"
    Double "1e10"
    Double "2.5E-3"
    "#);
}

#[test]
fn signed_numbers() {
    insta::assert_snapshot!(snapshot("-5 +2.5 -.5e2 ?a - 1"), @r#"
    Integer "-5"
    Decimal "+2.5"
    Double "-.5e2"
    Var "?a"
    Minus "-"
    Integer "1"
    "#);
}

#[test]
fn integer_before_dot_terminator() {
    insta::assert_snapshot!(snapshot("?s ?p 10 ."), @r#"
    Var "?s"
    Var "?p"
    Integer "10"
    Dot "."
    "#);
}

#[test]
fn trivia_preserved_in_raw_mode() {
    insta::assert_snapshot!(snapshot_raw("ASK # anything?\n{ }"), @r##"
    Word "ASK"
    Whitespace " "
    Comment "# anything?"
    Whitespace "\n"
    BraceOpen "{"
    Whitespace " "
    BraceClose "}"
    "##);
}

#[test]
fn garbage_is_coalesced() {
    let tokens = lex("?s ~~~ ?o");
    let garbage: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == SyntaxKind::Garbage)
        .collect();

    assert_eq!(garbage.len(), 1);
    assert_eq!(token_text("?s ~~~ ?o", garbage[0]), "~~~");
}

#[test]
fn every_byte_is_covered() {
    let source = "PREFIX ex: <http://example.org/>\nSELECT * { ?s ex:p 'x'@en }";
    let tokens = lex(source);

    let rebuilt: String = tokens.iter().map(|t| token_text(source, t)).collect();

    assert_eq!(rebuilt, source);
}
