use chrono::{NaiveDate, TimeZone, Utc};

use crate::vocab::xsd;
use crate::{Uri, Value};

#[test]
fn from_literal_maps_known_datatypes() {
    assert_eq!(Value::from_literal("42", Some(xsd::INT), None), Value::Int(42));
    assert_eq!(Value::from_literal("42", Some(xsd::INTEGER), None), Value::Long(42));
    assert_eq!(
        Value::from_literal("true", Some(xsd::BOOLEAN), None),
        Value::Boolean(true)
    );
    assert_eq!(
        Value::from_literal("2.5", Some(xsd::DOUBLE), None),
        Value::Double(2.5)
    );
    assert_eq!(
        Value::from_literal("2024-03-01", Some(xsd::DATE), None),
        Value::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
    );
}

#[test]
fn from_literal_without_datatype_is_plain_string() {
    assert_eq!(
        Value::from_literal("hello", None, None),
        Value::String("hello".into())
    );
    assert_eq!(
        Value::from_literal("bonjour", None, Some("fr")),
        Value::lang("bonjour", "fr")
    );
}

#[test]
fn from_literal_keeps_unknown_or_invalid_as_typed() {
    assert_eq!(
        Value::from_literal("abc", Some(xsd::INT), None),
        Value::typed("abc", xsd::INT)
    );
    assert_eq!(
        Value::from_literal("POINT(1 2)", Some("http://example.org/wkt"), None),
        Value::typed("POINT(1 2)", "http://example.org/wkt")
    );
}

#[test]
fn date_time_lexical_form_is_utc_round_trip() {
    let dt = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
    let value = Value::DateTime(dt);

    let lexical = value.lexical_form().unwrap();

    assert_eq!(lexical, "2024-03-01T12:30:00Z");
    assert_eq!(Value::from_literal(&lexical, Some(xsd::DATE_TIME), None), value);
}

#[test]
fn non_finite_floats_use_xsd_spelling() {
    assert_eq!(Value::Double(f64::INFINITY).lexical_form().unwrap(), "INF");
    assert_eq!(Value::Double(f64::NEG_INFINITY).lexical_form().unwrap(), "-INF");
    assert_eq!(Value::Float(f32::NAN).lexical_form().unwrap(), "NaN");
    assert_eq!(
        Value::from_literal("-INF", Some(xsd::DOUBLE), None),
        Value::Double(f64::NEG_INFINITY)
    );
}

#[test]
fn bytes_round_trip_through_base64() {
    let value = Value::Bytes(vec![1, 2, 3, 250]);
    let lexical = value.lexical_form().unwrap();

    assert_eq!(lexical, "AQID+g==");
    assert_eq!(
        Value::from_literal(&lexical, Some(xsd::BASE64_BINARY), None),
        value
    );
}

#[test]
fn uris_have_no_datatype() {
    let value = Value::uri("http://example.org/a");

    assert!(value.datatype().is_none());
    assert!(value.lexical_form().is_none());
    assert_eq!(value.as_uri(), Some(&Uri::new("http://example.org/a")));
}

#[test]
fn local_name_splits_on_last_separator() {
    assert_eq!(Uri::new("http://xmlns.com/foaf/0.1/knows").local_name(), "knows");
    assert_eq!(Uri::new("http://example.org/onto#Person").local_name(), "Person");
    assert_eq!(Uri::new("urn:ravel:query:q0").local_name(), "q0");
    assert_eq!(Uri::new("http://example.org/").local_name(), "http://example.org/");
}

#[test]
fn serializes_as_json_scalars() {
    let json = serde_json::to_string(&vec![
        Value::uri("http://example.org/a"),
        Value::Long(7),
        Value::Boolean(false),
        Value::lang("chat", "fr"),
    ])
    .unwrap();

    assert_eq!(json, r#"["http://example.org/a",7,false,"chat"]"#);
}
