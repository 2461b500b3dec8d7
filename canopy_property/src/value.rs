// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Native property values.
//!
//! [`PropertyValue`] is the form a property takes once it has been read out
//! of the authoring layer: a plain tagged value that can be read from any
//! thread. Composite payloads are reference counted, so cloning a value never
//! copies its contents.

use core::any::Any;
use core::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::name::PropName;

/// Run-time type tag of a [`PropertyValue`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropType {
    /// No value.
    Undefined,
    /// Explicit absence of a value.
    Null,
    /// A double-precision number.
    Number,
    /// A string.
    String,
    /// A boolean.
    Boolean,
    /// An ordered list of values.
    Array,
    /// A name → value map.
    Object,
    /// An opaque native handle.
    Handle,
}

impl PropType {
    /// Returns the lower-case name used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Handle => "handle",
        }
    }
}

impl fmt::Display for PropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An opaque, shareable native handle.
///
/// Handles compare by identity: two handles are equal only if they point at
/// the same allocation.
#[derive(Clone)]
pub struct Handle(Arc<dyn Any + Send + Sync>);

impl Handle {
    /// Wraps `value` in a new handle.
    #[must_use]
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Wraps an existing shared allocation without copying it.
    #[must_use]
    pub fn from_arc(value: Arc<dyn Any + Send + Sync>) -> Self {
        Self(value)
    }

    /// Attempts to view the handle as a `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }

    /// Returns `true` if both handles point at the same allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle")
            .field(&Arc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

impl PartialEq for Handle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

/// Fields of an object value, sorted by name for binary search lookup.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyObject {
    fields: SmallVec<[(PropName, PropertyValue); 4]>,
}

impl PropertyObject {
    /// Creates an empty object.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, replacing any previous value under the same name.
    pub fn insert(&mut self, name: PropName, value: PropertyValue) {
        match self.fields.binary_search_by_key(&name, |(n, _)| *n) {
            Ok(idx) => self.fields[idx].1 = value,
            Err(idx) => self.fields.insert(idx, (name, value)),
        }
    }

    /// Returns the field stored under `name`.
    #[must_use]
    pub fn get(&self, name: PropName) -> Option<&PropertyValue> {
        self.fields
            .binary_search_by_key(&name, |(n, _)| *n)
            .ok()
            .map(|idx| &self.fields[idx].1)
    }

    /// Returns `true` if a field is stored under `name`.
    #[must_use]
    pub fn contains(&self, name: PropName) -> bool {
        self.get(name).is_some()
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the object has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over the fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (PropName, &PropertyValue)> + '_ {
        self.fields.iter().map(|(n, v)| (*n, v))
    }
}

impl FromIterator<(PropName, PropertyValue)> for PropertyObject {
    fn from_iter<I: IntoIterator<Item = (PropName, PropertyValue)>>(iter: I) -> Self {
        let mut object = Self::new();
        for (name, value) in iter {
            object.insert(name, value);
        }
        object
    }
}

/// A native property value.
///
/// Values are immutable once built. Updating a property produces a new
/// value; the only in-place mutation is [`swap`](Self::swap), used when a
/// store commits staged transactions.
///
/// # Example
///
/// ```rust
/// use canopy_property::{PropType, PropertyValue};
///
/// let point = PropertyValue::object([("x", 1.0.into()), ("y", 2.0.into())]);
/// assert_eq!(point.ty(), PropType::Object);
/// assert_eq!(point.field("y").and_then(PropertyValue::as_number), Some(2.0));
///
/// assert!(PropertyValue::Null.is_undefined_or_null());
/// ```
#[derive(Clone, Debug, Default)]
pub enum PropertyValue {
    /// No value.
    #[default]
    Undefined,
    /// Explicit absence of a value.
    Null,
    /// A double-precision number.
    Number(f64),
    /// A string.
    String(Arc<str>),
    /// A boolean.
    Boolean(bool),
    /// An ordered list of values.
    Array(Arc<[PropertyValue]>),
    /// A name → value map.
    Object(Arc<PropertyObject>),
    /// An opaque native handle.
    Handle(Handle),
}

impl PropertyValue {
    /// Builds an object value from `(name, value)` pairs.
    #[must_use]
    pub fn object<'a>(fields: impl IntoIterator<Item = (&'a str, Self)>) -> Self {
        Self::Object(Arc::new(
            fields
                .into_iter()
                .map(|(name, value)| (PropName::new(name), value))
                .collect(),
        ))
    }

    /// Builds an array value.
    #[must_use]
    pub fn array(items: impl IntoIterator<Item = Self>) -> Self {
        Self::Array(items.into_iter().collect())
    }

    /// Returns the run-time type of this value.
    #[must_use]
    pub fn ty(&self) -> PropType {
        match self {
            Self::Undefined => PropType::Undefined,
            Self::Null => PropType::Null,
            Self::Number(_) => PropType::Number,
            Self::String(_) => PropType::String,
            Self::Boolean(_) => PropType::Boolean,
            Self::Array(_) => PropType::Array,
            Self::Object(_) => PropType::Object,
            Self::Handle(_) => PropType::Handle,
        }
    }

    /// Returns `true` for [`Undefined`](Self::Undefined) and [`Null`](Self::Null).
    #[must_use]
    pub fn is_undefined_or_null(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }

    /// Returns the number, if this is a number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(&**s),
            _ => None,
        }
    }

    /// Returns the boolean, if this is a boolean.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the elements, if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(items) => Some(&**items),
            _ => None,
        }
    }

    /// Returns the fields, if this is an object.
    #[must_use]
    pub fn as_object(&self) -> Option<&PropertyObject> {
        match self {
            Self::Object(object) => Some(&**object),
            _ => None,
        }
    }

    /// Returns the handle, if this is a handle.
    #[must_use]
    pub fn as_handle(&self) -> Option<&Handle> {
        match self {
            Self::Handle(handle) => Some(handle),
            _ => None,
        }
    }

    /// Returns the object field `name`, if this is an object with that field.
    #[must_use]
    pub fn get(&self, name: PropName) -> Option<&Self> {
        self.as_object()?.get(name)
    }

    /// Like [`get`](Self::get), interning `name` first.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Self> {
        self.get(PropName::new(name))
    }

    /// Exchanges the contents of two values in place.
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }
}

impl PartialEq for PropertyValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => Arc::ptr_eq(a, b) || a == b,
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b) || a == b,
            (Self::Handle(a), Self::Handle(b)) => a == b,
            _ => false,
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<f32> for PropertyValue {
    fn from(value: f32) -> Self {
        Self::Number(value.into())
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<u32> for PropertyValue {
    fn from(value: u32) -> Self {
        Self::Number(value.into())
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value.into())
    }
}

impl From<Vec<Self>> for PropertyValue {
    fn from(value: Vec<Self>) -> Self {
        Self::Array(value.into())
    }
}

impl From<PropertyObject> for PropertyValue {
    fn from(value: PropertyObject) -> Self {
        Self::Object(Arc::new(value))
    }
}

impl From<Handle> for PropertyValue {
    fn from(value: Handle) -> Self {
        Self::Handle(value)
    }
}
