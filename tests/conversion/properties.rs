//! Property tests: round trip, idempotence, shape preservation
//!
//! Generated values mix plain words, known locations and unknown locations
//! inside nested sequences and mappings. Stored-side values mix words, ids
//! of known locations, stray ids and ids glued to surrounding text.

use crate::common::*;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn token() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[a-z]{1,8}",
        2 => proptest::sample::select(KNOWN_LOCATIONS).prop_map(String::from),
        1 => proptest::sample::select(UNKNOWN_LOCATIONS).prop_map(String::from),
    ]
}

fn separator() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just(" "), Just(", "), Just(": "), Just("\n")]
}

fn text() -> impl Strategy<Value = String> {
    prop::collection::vec((token(), separator()), 0..6).prop_map(|parts| {
        parts
            .into_iter()
            .map(|(token, sep)| format!("{}{}", token, sep))
            .collect()
    })
}

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        4 => text().prop_map(Value::from),
        1 => any::<i64>().prop_map(Value::Int),
        1 => any::<bool>().prop_map(Value::Bool),
        1 => Just(Value::Null),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,6}", inner), 0..5)
                .prop_map(|pairs| Value::mapping(pairs)),
        ]
    })
}

/// Text made only of words and separators
fn plain_text() -> impl Strategy<Value = String> {
    "[a-zA-Z ,.:;!?()\n-]{0,64}".prop_filter("no 32-character words", |s| {
        s.split(|c: char| !c.is_ascii_alphanumeric())
            .all(|word| word.len() != 32)
    })
}

/// One piece of stored text; ids are drawn from the site at render time
#[derive(Debug, Clone)]
enum StoredToken {
    Word(String),
    Known(usize),
    Stray(String),
    /// Known id with a word character before it, or a path after it
    Glued(usize, bool),
}

#[derive(Debug, Clone)]
enum StoredShape {
    Text(Vec<(StoredToken, &'static str)>),
    Int(i64),
    Seq(Vec<StoredShape>),
    Map(Vec<(String, StoredShape)>),
}

fn stored_token() -> impl Strategy<Value = StoredToken> {
    let known = 0..KNOWN_LOCATIONS.len();
    prop_oneof![
        3 => "[a-z]{1,8}".prop_map(StoredToken::Word),
        3 => known.clone().prop_map(StoredToken::Known),
        1 => "[a-zA-Z0-9]{32}".prop_map(StoredToken::Stray),
        1 => (known, any::<bool>()).prop_map(|(i, before)| StoredToken::Glued(i, before)),
    ]
}

fn stored_shape() -> impl Strategy<Value = StoredShape> {
    let leaf = prop_oneof![
        4 => prop::collection::vec((stored_token(), separator()), 0..6).prop_map(StoredShape::Text),
        1 => any::<i64>().prop_map(StoredShape::Int),
    ];
    leaf.prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(StoredShape::Seq),
            prop::collection::vec(("[a-z]{1,6}", inner), 0..5).prop_map(StoredShape::Map),
        ]
    })
}

impl StoredShape {
    fn render(&self, site: &Site) -> Value {
        match self {
            StoredShape::Text(parts) => {
                let mut text = String::new();
                for (token, sep) in parts {
                    match token {
                        StoredToken::Word(word) | StoredToken::Stray(word) => text.push_str(word),
                        StoredToken::Known(i) => {
                            text.push_str(site.id(KNOWN_LOCATIONS[*i]).as_str())
                        }
                        StoredToken::Glued(i, true) => {
                            text.push('x');
                            text.push_str(site.id(KNOWN_LOCATIONS[*i]).as_str());
                        }
                        StoredToken::Glued(i, false) => {
                            text.push_str(site.id(KNOWN_LOCATIONS[*i]).as_str());
                            text.push_str("/tail");
                        }
                    }
                    text.push_str(sep);
                }
                Value::from(text)
            }
            StoredShape::Int(n) => Value::Int(*n),
            StoredShape::Seq(items) => Value::Array(items.iter().map(|i| i.render(site)).collect()),
            StoredShape::Map(pairs) => {
                Value::mapping(pairs.iter().map(|(k, v)| (k.clone(), v.render(site))))
            }
        }
    }

    /// Stray ids that survive in the rendered value
    fn stray_count(&self) -> usize {
        match self {
            StoredShape::Text(parts) => parts
                .iter()
                .filter(|(token, _)| matches!(token, StoredToken::Stray(_)))
                .count(),
            StoredShape::Int(_) => 0,
            StoredShape::Seq(items) => items.iter().map(StoredShape::stray_count).sum(),
            StoredShape::Map(pairs) => {
                // Later duplicate keys replace earlier ones
                let mut last = std::collections::HashMap::new();
                for (key, shape) in pairs {
                    last.insert(key.as_str(), shape);
                }
                last.values().map(|shape| shape.stray_count()).sum()
            }
        }
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn round_trip_restores_original(original in value()) {
        let site = Site::new();
        let stored = site.converter.to_symbolic(original.clone()).unwrap();
        let shown = site.converter.to_location(stored.into_value()).unwrap();
        prop_assert_eq!(shown.value, original);
    }

    #[test]
    fn to_symbolic_is_idempotent(original in value()) {
        let site = Site::new();
        let once = site.converter.to_symbolic(original).unwrap();
        let twice = site.converter.to_symbolic(once.value.clone()).unwrap();
        prop_assert_eq!(&twice.value, &once.value);
        prop_assert_eq!(twice.unresolved.len(), once.unresolved.len());
    }

    #[test]
    fn to_location_is_idempotent(original in value()) {
        let site = Site::new();
        let stored = site.store(original);
        let once = site.show(stored);
        let twice = site.show(once.clone());
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn symbolic_round_trip_restores_stored(shape in stored_shape()) {
        let site = Site::new();
        let stored = shape.render(&site);
        let shown = site.converter.to_location(stored.clone()).unwrap();
        prop_assert_eq!(shown.unresolved.len(), shape.stray_count());
        let restored = site.store(shown.into_value());
        prop_assert_eq!(restored, stored);
    }

    #[test]
    fn conversion_preserves_shape(original in value()) {
        let site = Site::new();
        let stored = site.converter.to_symbolic(original.clone()).unwrap();
        prop_assert!(same_shape(&original, &stored.value));
    }

    #[test]
    fn unknown_locations_are_each_reported(original in value()) {
        let site = Site::new();
        let expected = count_unknown(&original);
        let stored = site.converter.to_symbolic(original).unwrap();
        prop_assert_eq!(stored.unresolved.len(), expected);
        for finding in &stored.unresolved {
            prop_assert!(UNKNOWN_LOCATIONS.contains(&finding.original.as_str()));
        }
    }

    #[test]
    fn plain_text_is_untouched(text in plain_text()) {
        let site = Site::new();
        for direction in [Direction::ToSymbolic, Direction::ToLocation] {
            let out = site.converter.convert(Value::from(text.as_str()), direction).unwrap();
            prop_assert!(out.is_clean());
            prop_assert_eq!(out.value, Value::from(text.as_str()));
        }
    }
}

fn count_unknown(value: &Value) -> usize {
    match value {
        Value::String(s) => s
            .split(|c: char| c.is_whitespace() || c == ',' || c == ':')
            .filter(|word| UNKNOWN_LOCATIONS.contains(word))
            .count(),
        Value::Array(items) => items.iter().map(count_unknown).sum(),
        Value::Object(map) => map.values().map(count_unknown).sum(),
        _ => 0,
    }
}
