//! Concrete conversion scenarios

use crate::common::*;

const ID: &str = "a1b2c3d4e5f6a1b2c3d4e5f6a1b2c3d4";
const LOC: &str = "/site/articles/hello-world";

fn fixed_site() -> ReferenceConverter {
    init_tracing();
    let index =
        InMemoryLocationIndex::with_entries([(StableId::new(ID).unwrap(), loc(LOC))]).unwrap();
    ReferenceConverter::new(std::sync::Arc::new(index))
}

// ============================================================================
// Single-reference scalars
// ============================================================================

#[test]
fn location_scalar_becomes_id_and_back() {
    let converter = fixed_site();

    let stored = converter.to_symbolic(Value::from(LOC)).unwrap();
    assert!(stored.is_clean());
    assert_eq!(stored.value, Value::from(ID));

    let shown = converter.to_location(Value::from(ID)).unwrap();
    assert!(shown.is_clean());
    assert_eq!(shown.value, Value::from(LOC));
}

#[test]
fn scalar_without_references_is_unchanged() {
    let converter = fixed_site();
    for text in [
        "",
        "Hello, world",
        "ratio 1/2 and either/or",
        "a lone / slash",
        "short id a1b2c3d4",
        "unicode \u{2014} caf\u{e9} \u{1f600}",
    ] {
        for direction in [Direction::ToSymbolic, Direction::ToLocation] {
            let out = converter.convert(Value::from(text), direction).unwrap();
            assert!(out.is_clean(), "{:?}", text);
            assert_eq!(out.value, Value::from(text));
        }
    }
}

// ============================================================================
// Mappings
// ============================================================================

#[test]
fn only_the_reference_span_changes_in_a_mapping() {
    let index = std::sync::Arc::new(InMemoryLocationIndex::new());
    let id = index.register(loc("/site/x")).unwrap();
    let converter = ReferenceConverter::new(index);

    let value = Value::mapping([
        ("body", Value::from("see /site/x for details")),
        ("title", Value::from("Hello")),
    ]);
    let out = converter.to_symbolic(value).unwrap();
    assert!(out.is_clean());

    let map = out.value.as_object().unwrap();
    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["body", "title"]);
    assert_eq!(
        map["body"],
        Value::from(format!("see {} for details", id))
    );
    assert_eq!(map["title"], Value::from("Hello"));
}

#[test]
fn one_unresolved_reference_does_not_stop_the_rest() {
    let converter = fixed_site();
    let value = Value::Array(vec![
        Value::from(format!("first {}", LOC)),
        Value::from("broken /site/deleted link"),
        Value::mapping([("nested", Value::from(LOC))]),
    ]);
    let out = converter.to_symbolic(value).unwrap();

    assert_eq!(out.unresolved.len(), 1);
    assert_eq!(out.unresolved[0].path.to_string(), "[1]");
    assert_eq!(out.unresolved[0].original, "/site/deleted");
    assert_eq!(out.unresolved[0].form, ReferenceForm::Location);

    let items = out.value.as_array().unwrap();
    assert_eq!(items[0], Value::from(format!("first {}", ID)));
    assert_eq!(items[1], Value::from("broken /site/deleted link"));
    assert_eq!(items[2], Value::mapping([("nested", Value::from(ID))]));
}

// ============================================================================
// Lexical boundaries
// ============================================================================

#[test]
fn several_references_in_one_string() {
    let converter = fixed_site();
    let text = format!("{0}, ({0}) and \"{0}\"", LOC);
    let out = converter.to_symbolic(Value::from(text)).unwrap();
    assert_eq!(out.value, Value::from(format!("{0}, ({0}) and \"{0}\"", ID)));
}

#[test]
fn longest_path_run_is_one_reference() {
    let converter = fixed_site();
    // The trailing segment makes this a different (unknown) location
    let text = format!("{}/comments", LOC);
    let out = converter.to_symbolic(Value::from(text.as_str())).unwrap();
    assert_eq!(out.value, Value::from(text.as_str()));
    assert_eq!(out.unresolved.len(), 1);
    assert_eq!(out.unresolved[0].original, text);
}

#[test]
fn id_inside_a_location_is_not_a_symbolic_reference() {
    let converter = fixed_site();
    let text = format!("/files/{}/raw", ID);
    let out = converter.to_location(Value::from(text.as_str())).unwrap();
    assert!(out.is_clean());
    assert_eq!(out.value, Value::from(text.as_str()));
}

#[test]
fn glued_ids_are_not_references() {
    let converter = fixed_site();
    for text in [
        format!("x{}", ID),
        format!("{}_v2", ID),
        format!("{}.html", ID),
        format!("{}{}", ID, ID),
    ] {
        let out = converter.to_location(Value::from(text.as_str())).unwrap();
        assert!(out.is_clean(), "{}", text);
        assert_eq!(out.value, Value::from(text.as_str()));
    }
}

#[test]
fn unknown_id_is_reported_as_symbolic() {
    let converter = fixed_site();
    let stray = StableId::generate();
    let out = converter
        .to_location(Value::mapping([("ref", Value::from(stray.as_str()))]))
        .unwrap();
    assert_eq!(out.unresolved.len(), 1);
    assert_eq!(out.unresolved[0].form, ReferenceForm::Symbolic);
    assert_eq!(out.unresolved[0].path.to_string(), "ref");
    assert_eq!(out.value, Value::mapping([("ref", Value::from(stray.as_str()))]));
}

// ============================================================================
// JSON payloads
// ============================================================================

#[test]
fn json_document_round_trip() {
    let converter = fixed_site();
    let json = serde_json::json!({
        "title": "Links",
        "blocks": [
            {"type": "text", "html": format!("<a href=\"{}\">hello</a>", LOC)},
            {"type": "image", "width": 640, "ratio": 1.5, "visible": true},
            {"type": "empty", "data": null}
        ]
    });
    let original = Value::from(json.clone());

    let stored = converter.to_symbolic(original.clone()).unwrap();
    assert!(stored.is_clean());
    assert_eq!(
        stored.value.to_json()["blocks"][0]["html"],
        serde_json::json!(format!("<a href=\"{}\">hello</a>", ID))
    );
    assert!(same_shape(&original, &stored.value));

    let shown = converter.to_location(stored.into_value()).unwrap();
    assert_eq!(shown.value.to_json(), json);
}
