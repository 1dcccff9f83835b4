//! Entity capability
//!
//! Domain objects take part in conversion by describing their own
//! properties instead of being reflected over. An entity lists
//! [`PropertyDescriptor`]s and exposes a getter and setter keyed by
//! property name; the rewriter treats it as a mapping over those properties.
//!
//! Entities are shared through [`EntityHandle`], so two values (or an entity
//! and one of its own properties) may point at the same object. Identity is
//! the handle's allocation address, which is what cycle detection keys on.

use crate::error::IntrospectResult;
use crate::value::Value;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::fmt;
use std::sync::Arc;

/// One declared property of an entity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyDescriptor {
    /// Property name, used as the path segment in reports
    pub name: String,
    /// Whether the rewriter may touch this property
    pub rewritable: bool,
}

impl PropertyDescriptor {
    /// A property the rewriter may convert
    pub fn rewritable(name: impl Into<String>) -> Self {
        PropertyDescriptor {
            name: name.into(),
            rewritable: true,
        }
    }

    /// A property the rewriter must leave alone
    pub fn fixed(name: impl Into<String>) -> Self {
        PropertyDescriptor {
            name: name.into(),
            rewritable: false,
        }
    }
}

/// Introspectable domain object
///
/// Implementations must return the same descriptor set, in the same order,
/// for the lifetime of a conversion call.
pub trait Entity: fmt::Debug + Send + Sync {
    /// Name of the concrete type, for logs and errors
    fn type_name(&self) -> &str;

    /// Declared properties in declaration order
    fn properties(&self) -> Vec<PropertyDescriptor>;

    /// Read a property
    fn get(&self, name: &str) -> IntrospectResult<Value>;

    /// Write a property
    fn set(&mut self, name: &str, value: Value) -> IntrospectResult<()>;
}

/// Shared, lockable reference to an entity
#[derive(Clone)]
pub struct EntityHandle(Arc<RwLock<dyn Entity>>);

impl EntityHandle {
    /// Wrap an owned entity
    pub fn new<E: Entity + 'static>(entity: E) -> Self {
        EntityHandle(Arc::new(RwLock::new(entity)))
    }

    /// Share an entity the caller keeps a typed handle to
    pub fn from_shared<E: Entity + 'static>(shared: Arc<RwLock<E>>) -> Self {
        EntityHandle(shared)
    }

    /// Object identity (stable while any clone of the handle is alive)
    pub fn identity(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }

    /// Do both handles point at the same entity
    pub fn ptr_eq(&self, other: &EntityHandle) -> bool {
        self.identity() == other.identity()
    }

    /// Lock for reading
    pub fn read(&self) -> RwLockReadGuard<'_, dyn Entity> {
        self.0.read()
    }

    /// Lock for writing
    pub fn write(&self) -> RwLockWriteGuard<'_, dyn Entity> {
        self.0.write()
    }

    /// Read every declared property, in declaration order
    ///
    /// The read lock is released before returning, so nested entities can be
    /// inspected without holding this one.
    pub fn properties(&self) -> Vec<(PropertyDescriptor, IntrospectResult<Value>)> {
        let guard = self.0.read();
        guard
            .properties()
            .into_iter()
            .map(|d| {
                let value = guard.get(&d.name);
                (d, value)
            })
            .collect()
    }
}

impl PartialEq for EntityHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_read() {
            Some(guard) => f
                .debug_struct("EntityHandle")
                .field("type", &guard.type_name())
                .field("identity", &format_args!("{:#x}", self.identity()))
                .finish(),
            None => f
                .debug_struct("EntityHandle")
                .field("identity", &format_args!("{:#x}", self.identity()))
                .finish_non_exhaustive(),
        }
    }
}
