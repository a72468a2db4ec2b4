use rowan::TextRange;

use super::*;

fn range(start: u32, end: u32) -> TextRange {
    TextRange::new(start.into(), end.into())
}

#[test]
fn severity_display() {
    insta::assert_snapshot!(format!("{}", Severity::Error), @"error");
    insta::assert_snapshot!(format!("{}", Severity::Warning), @"warning");
}

#[test]
fn kinds_carry_default_severity() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnrecognizedInput, range(0, 1))
        .emit();
    diagnostics
        .report(DiagnosticKind::UndeclaredPrefix, range(2, 5))
        .message("ex")
        .emit();

    assert_eq!(diagnostics.len(), 2);
    assert_eq!(diagnostics.error_count(), 1);
    assert_eq!(diagnostics.warning_count(), 1);
}

#[test]
fn custom_message_fills_template() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnboundParameter, range(0, 5))
        .message("name")
        .emit();

    let message = diagnostics.iter().next().unwrap();
    insta::assert_snapshot!(message.to_string(), @"warning at 0..5: parameter `@name` has no bound value (hint: bind a value before executing the query)");
}

#[test]
fn render_underlines_range() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnbalancedBrace, range(10, 11))
        .emit();

    let result = diagnostics.render("SELECT ?s }");
    insta::assert_snapshot!(result, @r"
    error: unmatched closing `}`
      |
    1 | SELECT ?s }
      |           ^ unmatched closing `}`
    ");
}

#[test]
fn render_empty_is_empty() {
    assert_eq!(Diagnostics::new().render("ASK {}"), "");
}

#[test]
fn ordered_by_position_then_kind() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UndeclaredPrefix, range(8, 10))
        .message("ex")
        .emit();
    diagnostics
        .report(DiagnosticKind::UnrecognizedInput, range(8, 9))
        .emit();
    diagnostics
        .report(DiagnosticKind::UnboundParameter, range(0, 2))
        .message("s")
        .emit();
    diagnostics
        .report(DiagnosticKind::UnboundParameter, range(0, 2))
        .message("s")
        .emit();

    let kinds: Vec<_> = diagnostics.ordered().iter().map(|m| m.kind()).collect();

    assert_eq!(
        kinds,
        [
            DiagnosticKind::UnboundParameter,
            DiagnosticKind::UnrecognizedInput,
            DiagnosticKind::UndeclaredPrefix,
        ]
    );
    assert_eq!(diagnostics.len(), 4);
}
