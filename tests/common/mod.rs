//! Shared test utilities for the integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

use parking_lot::RwLock;
use std::sync::{Arc, Once};
pub use strata_refs::{
    CancelToken, Conversion, ConvertError, Direction, Entity, EntityHandle, InMemoryLocationIndex,
    IntrospectError, IntrospectResult, Location, LocationIndex, Mapping, PropertyDescriptor,
    ReferenceConverter, ReferenceForm, RefsConfig, ShapeFailure, StableId, Value, ValuePath,
};

// ============================================================================
// Initialization
// ============================================================================

static INIT_TRACING: Once = Once::new();

/// Route `tracing` output through the test harness's captured writer.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

// ============================================================================
// Site fixture
// ============================================================================

/// Locations registered by [`Site::new`]
pub const KNOWN_LOCATIONS: &[&str] = &[
    "/site",
    "/site/articles",
    "/site/articles/hello-world",
    "/site/about",
    "/media/logo.png",
    "/docs/v1.2/getting_started",
];

/// Location-shaped strings nothing is registered at
pub const UNKNOWN_LOCATIONS: &[&str] = &["/site/missing", "/nowhere/at-all"];

/// Index plus converter over a small site tree
pub struct Site {
    pub index: Arc<InMemoryLocationIndex>,
    pub converter: ReferenceConverter,
}

impl Site {
    /// Site with every location in [`KNOWN_LOCATIONS`] registered
    pub fn new() -> Self {
        Self::with_config(&RefsConfig::default())
    }

    pub fn with_config(config: &RefsConfig) -> Self {
        init_tracing();
        let index = Arc::new(InMemoryLocationIndex::new());
        for path in KNOWN_LOCATIONS {
            index.register(loc(path)).unwrap();
        }
        let converter = ReferenceConverter::with_config(index.clone(), config).unwrap();
        Site { index, converter }
    }

    /// Id registered at `path`
    pub fn id(&self, path: &str) -> StableId {
        self.index.id_at(&loc(path)).unwrap()
    }

    /// Convert to ids, asserting nothing went wrong
    pub fn store(&self, value: Value) -> Value {
        let conversion = self.converter.to_symbolic(value).unwrap();
        assert!(conversion.unsupported.is_empty());
        conversion.into_value()
    }

    /// Convert back to locations, asserting nothing went wrong
    pub fn show(&self, value: Value) -> Value {
        let conversion = self.converter.to_location(value).unwrap();
        assert!(conversion.unsupported.is_empty());
        conversion.into_value()
    }
}

pub fn loc(path: &str) -> Location {
    Location::new(path).unwrap()
}

// ============================================================================
// Entities
// ============================================================================

/// Content entity with a mix of rewritable and fixed properties
#[derive(Debug, Default)]
pub struct Article {
    pub title: String,
    pub body: String,
    pub links: Vec<Value>,
    /// Canonical path, never rewritten
    pub path: String,
    pub related: Option<EntityHandle>,
}

impl Article {
    pub fn shared(title: &str, body: &str) -> Arc<RwLock<Article>> {
        Arc::new(RwLock::new(Article {
            title: title.into(),
            body: body.into(),
            ..Article::default()
        }))
    }
}

impl Entity for Article {
    fn type_name(&self) -> &str {
        "Article"
    }

    fn properties(&self) -> Vec<PropertyDescriptor> {
        vec![
            PropertyDescriptor::rewritable("title"),
            PropertyDescriptor::rewritable("body"),
            PropertyDescriptor::rewritable("links"),
            PropertyDescriptor::fixed("path"),
            PropertyDescriptor::rewritable("related"),
        ]
    }

    fn get(&self, name: &str) -> IntrospectResult<Value> {
        match name {
            "title" => Ok(Value::from(self.title.as_str())),
            "body" => Ok(Value::from(self.body.as_str())),
            "links" => Ok(Value::Array(self.links.clone())),
            "path" => Ok(Value::from(self.path.as_str())),
            "related" => Ok(self
                .related
                .clone()
                .map(Value::Entity)
                .unwrap_or(Value::Null)),
            other => Err(IntrospectError::UnknownProperty {
                entity: "Article".into(),
                property: other.into(),
            }),
        }
    }

    fn set(&mut self, name: &str, value: Value) -> IntrospectResult<()> {
        match (name, value) {
            ("title", Value::String(s)) => self.title = s,
            ("body", Value::String(s)) => self.body = s,
            ("links", Value::Array(items)) => self.links = items,
            ("path", _) => return Err(IntrospectError::ReadOnly("path".into())),
            (_, other) => {
                return Err(IntrospectError::TypeMismatch {
                    property: name.into(),
                    expected: "String or Array",
                    actual: other.type_name(),
                })
            }
        }
        Ok(())
    }
}

// ============================================================================
// Value helpers
// ============================================================================

/// Same containers, lengths, keys and key order; non-string scalars equal
pub fn same_shape(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::String(_), Value::String(_)) => true,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(p, q)| same_shape(p, q))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .zip(y)
                    .all(|((kp, p), (kq, q))| kp == kq && same_shape(p, q))
        }
        (Value::Entity(x), Value::Entity(y)) => x.ptr_eq(y),
        _ => a == b,
    }
}
