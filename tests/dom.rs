use std::path::PathBuf;

use chisel_forecast::dom::Parser;
use chisel_forecast::errors::{ParserErrorDetails, ParserErrorSource};
use chisel_forecast::JsonValue;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(name)
}

#[test]
fn invalid_fixtures_should_fail_with_located_errors() {
    let parser = Parser::default();
    let cases = [
        ("missing_value.json", ParserErrorSource::DomParser),
        ("trailing_comma.json", ParserErrorSource::DomParser),
        ("trailing_input.json", ParserErrorSource::DomParser),
        ("unterminated_string.json", ParserErrorSource::Lexer),
        ("invalid_escape.json", ParserErrorSource::Lexer),
        ("leading_zero.json", ParserErrorSource::Lexer),
    ];
    for (name, source) in cases {
        let err = parser
            .parse_file(fixture("fixtures/json/invalid").join(name))
            .unwrap_err();
        assert_eq!(err.source, source, "{name}");
        assert!(err.coords.is_some(), "{name} should carry a location");
    }
}

#[test]
fn trailing_documents_should_be_rejected_where_they_start() {
    let err = Parser::default()
        .parse_file(fixture("fixtures/json/invalid/trailing_input.json"))
        .unwrap_err();
    assert_eq!(err.details, ParserErrorDetails::TrailingInput);
    assert_eq!(err.offset(), Some(9));
    assert_eq!(
        err.to_string(),
        "unexpected input after root value at line 1, column 10 (offset 9)"
    );
}

#[test]
fn serialised_documents_should_decode_to_the_same_tree() {
    let parser = Parser::default();
    for name in [
        "fixtures/json/forecast.json",
        "fixtures/json/valid/simple_structure.json",
        "fixtures/json/valid/escapes.json",
        "fixtures/json/valid/scalar_root.json",
    ] {
        let doc = parser.parse_file(fixture(name)).unwrap();
        let reparsed = parser.parse_str(&doc.to_string()).unwrap();
        assert_eq!(doc, reparsed, "{name}");
    }
}

#[test]
fn numbers_should_keep_integer_and_float_forms() {
    let doc = Parser::default()
        .parse_file(fixture("fixtures/json/valid/simple_structure.json"))
        .unwrap();
    assert_eq!(doc.get("test"), Some(&JsonValue::Float(1232.0)));
    assert_eq!(doc.pointer("/an array/0"), Some(&JsonValue::Integer(1)));
    assert_eq!(doc.pointer("/an array/4"), Some(&JsonValue::Float(5.8)));
    assert_eq!(
        doc.pointer("/nested/deeper/deepest/0/x").and_then(JsonValue::as_f64),
        Some(-0.0005)
    );
    assert!(doc.get("nothing").map(JsonValue::is_null).unwrap_or(false));
}
