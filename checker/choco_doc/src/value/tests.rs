use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_scalars_keep_their_json_type() {
    let doc = Document::from_json_str(
        r#"{"s": "1", "i": 1, "f": 1.5, "b": true, "n": null, "big": 18446744073709551615}"#,
    )
    .unwrap();

    assert_eq!(doc.get("s"), Some(&Value::Str("1".into())));
    assert_eq!(doc.get("i"), Some(&Value::Int(1)));
    assert_eq!(doc.get("f"), Some(&Value::Float(1.5)));
    assert_eq!(doc.get("b"), Some(&Value::Bool(true)));
    assert_eq!(doc.get("n"), Some(&Value::Null));
    assert_eq!(doc.get("big"), Some(&Value::Int(18_446_744_073_709_551_615)));
}

#[test]
fn test_nested_structure() {
    let doc = Document::from_json_str(
        r#"{"kind": "Program", "body": [{"kind": "Pass"}, [1, 2]], "errors": {"errors": []}}"#,
    )
    .unwrap();

    let body = doc.get("body").and_then(Value::as_seq).unwrap();
    assert_eq!(body.len(), 2);
    assert_eq!(body[0].kind(), ValueKind::Node);
    assert_eq!(body[1].kind(), ValueKind::Seq);
    assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["body", "errors", "kind"]);
}

#[test]
fn test_top_level_must_be_object() {
    let err = Document::from_json_str("[1, 2]").unwrap_err();
    assert!(matches!(
        err,
        LoadError::NotAnObject {
            found: ValueKind::Seq
        }
    ));
}

#[test]
fn test_syntax_error_reports_position() {
    let err = Document::from_json_slice(b"{\n  \"kind\": }").unwrap_err();
    match err {
        LoadError::Syntax { line, .. } => assert_eq!(line, 2),
        other @ LoadError::NotAnObject { .. } => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_empty_output_is_malformed() {
    assert!(Document::from_json_slice(b"").is_err());
}

#[test]
fn test_diagnostic_count() {
    let with = Document::from_json_str(r#"{"errors": {"errors": ["E1", "E2"]}}"#).unwrap();
    let empty = Document::from_json_str(r#"{"errors": {"errors": []}}"#).unwrap();
    let missing = Document::from_json_str(r#"{"kind": "Program"}"#).unwrap();
    let wrong_shape = Document::from_json_str(r#"{"errors": {"errors": 3}}"#).unwrap();

    assert_eq!(with.diagnostic_count(), 2);
    assert_eq!(empty.diagnostic_count(), 0);
    assert_eq!(missing.diagnostic_count(), 0);
    assert_eq!(wrong_shape.diagnostic_count(), 0);
}

#[test]
fn test_display_is_compact_json() {
    let doc = Document::from_json_str(r#"{ "b": [true, null], "a": "x" }"#).unwrap();
    assert_eq!(doc.to_string(), r#"{"a":"x","b":[true,null]}"#);
    assert_eq!(Value::Str("q\"".into()).to_string(), r#""q\"""#);
    assert_eq!(
        Value::Int(u64::MAX.into()).to_string(),
        "18446744073709551615"
    );
}

#[test]
fn test_deeply_nested_document_loads() {
    let depth = 100;
    let text = format!("{}1{}", r#"{"e":"#.repeat(depth), "}".repeat(depth));
    let doc = Document::from_json_str(&text).unwrap();
    assert_eq!(doc.len(), 1);
}
