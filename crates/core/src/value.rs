//! Value types for reference conversion
//!
//! This module defines:
//! - Value: the payload passed through conversion
//! - Mapping: insertion-ordered keyed container
//!
//! ## Shapes
//!
//! Every Value is one of four shapes as far as conversion is concerned:
//!
//! | Shape | Variants | Conversion |
//! |-------|----------|------------|
//! | Scalar | `String` | scanned for references |
//! | Scalar (opaque) | `Null`, `Bool`, `Int`, `Float`, `Bytes` | passed through |
//! | Sequence | `Array` | each element, in order |
//! | Mapping | `Object` | each value, in insertion order; keys untouched |
//! | Entity | `Entity` | each rewritable declared property |
//!
//! ## Equality
//!
//! - Different variants are never equal: `Int(1) != Float(1.0)`
//! - Floats use IEEE-754 equality: `NaN != NaN`, `-0.0 == 0.0`
//! - Objects compare keys *and* their order
//! - Entities compare by identity

use crate::entity::EntityHandle;
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Insertion-ordered mapping with unique keys
pub type Mapping = IndexMap<String, Value>;

/// Payload passed through reference conversion
#[derive(Debug, Clone)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point (IEEE-754)
    Float(f64),
    /// UTF-8 string; the only scalar that can carry references
    String(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Ordered sequence of values
    Array(Vec<Value>),
    /// Keyed mapping, insertion ordered
    Object(Mapping),
    /// Shared domain object
    Entity(EntityHandle),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            // IEEE-754: NaN != NaN, -0.0 == 0.0
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|((ka, va), (kb, vb))| ka == kb && va == vb)
            }
            (Value::Entity(a), Value::Entity(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl Value {
    /// Build a mapping from key/value pairs, keeping their order
    pub fn mapping<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Bytes(_) => "Bytes",
            Value::Array(_) => "Array",
            Value::Object(_) => "Object",
            Value::Entity(_) => "Entity",
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this is a string value
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Check if this value can contain other values
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_) | Value::Entity(_))
    }

    /// Get as &str if this is a String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as &[Value] if this is an Array value
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get as &Mapping if this is an Object value
    pub fn as_object(&self) -> Option<&Mapping> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Get the handle if this is an Entity value
    pub fn as_entity(&self) -> Option<&EntityHandle> {
        match self {
            Value::Entity(e) => Some(e),
            _ => None,
        }
    }

    /// Convert to a JSON document
    ///
    /// Entities become objects of their readable properties. An entity
    /// already being converted higher up the same branch becomes `null`, so
    /// cyclic graphs terminate. Bytes become arrays of numbers; non-finite
    /// floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        let mut in_progress = FxHashSet::default();
        self.to_json_inner(&mut in_progress)
    }

    fn to_json_inner(&self, in_progress: &mut FxHashSet<usize>) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Bytes(b) => {
                serde_json::Value::Array(b.iter().map(|x| serde_json::Value::from(*x)).collect())
            }
            Value::Array(arr) => {
                serde_json::Value::Array(arr.iter().map(|v| v.to_json_inner(in_progress)).collect())
            }
            Value::Object(obj) => serde_json::Value::Object(
                obj.iter()
                    .map(|(k, v)| (k.clone(), v.to_json_inner(in_progress)))
                    .collect(),
            ),
            Value::Entity(handle) => {
                let identity = handle.identity();
                if !in_progress.insert(identity) {
                    return serde_json::Value::Null;
                }
                let mut map = serde_json::Map::new();
                for (descriptor, value) in handle.properties() {
                    if let Ok(value) = value {
                        map.insert(descriptor.name, value.to_json_inner(in_progress));
                    }
                }
                in_progress.remove(&identity);
                serde_json::Value::Object(map)
            }
        }
    }
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Vec<Value>> for Value {
    fn from(a: Vec<Value>) -> Self {
        Value::Array(a)
    }
}

impl From<Mapping> for Value {
    fn from(o: Mapping) -> Self {
        Value::Object(o)
    }
}

impl From<EntityHandle> for Value {
    fn from(e: EntityHandle) -> Self {
        Value::Entity(e)
    }
}

// ============================================================================
// serde_json interop
// ============================================================================

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                // u64 beyond i64 range and non-integers
                None => Value::Float(n.as_f64().unwrap_or(0.0)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => {
                Value::Object(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}
