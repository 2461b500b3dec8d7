// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Authored property sources.
//!
//! A [`SourceValue`] is a property as the authoring layer wrote it. Besides
//! plain data it may be a live [`DynamicValue`] or a transform function,
//! which is what makes a source different from a [`PropertyValue`]: it has
//! to be classified and possibly subscribed to before it can be stored.

use core::fmt;
use std::sync::Arc;

use hashbrown::HashMap;

use crate::dynamic::{DynamicValue, SelectorFn};
use crate::name::PropName;
use crate::value::{Handle, PropertyObject, PropertyValue};

/// Field holding the transform of a selector expression.
pub(crate) const SELECTOR_FIELD: &str = "selector";
/// Field holding the dynamic value of a selector expression.
pub(crate) const VALUE_FIELD: &str = "value";

/// A property value as authored.
#[derive(Clone, Default)]
pub enum SourceValue {
    /// No value.
    #[default]
    Undefined,
    /// Explicit absence of a value.
    Null,
    /// A number.
    Number(f64),
    /// A string.
    String(Arc<str>),
    /// A boolean.
    Boolean(bool),
    /// A list of sources.
    Array(Vec<SourceValue>),
    /// A name → source map, in authoring order.
    Object(Vec<(PropName, SourceValue)>),
    /// An opaque native handle without the observable capability.
    Handle(Handle),
    /// A handle with the observable capability.
    Dynamic(Arc<dyn DynamicValue>),
    /// A function, only meaningful as the `selector` field of a selector.
    Function(SelectorFn),
}

impl SourceValue {
    /// Builds a selector expression: `selector` applied to every snapshot of `value`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use canopy_property::{PropertyValue, SharedValue, SourceValue};
    ///
    /// let progress = SharedValue::new(0.5);
    /// let doubled = SourceValue::selector(progress.into_dynamic(), |v| {
    ///     PropertyValue::Number(v.as_number().unwrap_or(0.0) * 2.0)
    /// });
    /// assert!(doubled.is_selector_candidate());
    /// ```
    pub fn selector(
        value: Arc<dyn DynamicValue>,
        selector: impl Fn(&PropertyValue) -> PropertyValue + Send + Sync + 'static,
    ) -> Self {
        Self::Object(vec![
            (PropName::new(SELECTOR_FIELD), Self::Function(Arc::new(selector))),
            (PropName::new(VALUE_FIELD), Self::Dynamic(value)),
        ])
    }

    /// Builds an object source from `(name, source)` pairs.
    pub fn object<'a>(fields: impl IntoIterator<Item = (&'a str, Self)>) -> Self {
        Self::Object(
            fields
                .into_iter()
                .map(|(name, value)| (PropName::new(name), value))
                .collect(),
        )
    }

    /// Returns the object field `name`, if this is an object with that field.
    #[must_use]
    pub fn field(&self, name: PropName) -> Option<&Self> {
        match self {
            Self::Object(fields) => fields.iter().find(|(n, _)| *n == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Returns `true` for objects carrying a `selector` field.
    ///
    /// Candidates must also carry a dynamic `value` field; resolving one that
    /// does not is a malformed selector.
    #[must_use]
    pub fn is_selector_candidate(&self) -> bool {
        self.field(PropName::new(SELECTOR_FIELD)).is_some()
    }

    /// Converts this source into a native value.
    ///
    /// Dynamic values nested inside plain data are captured as their current
    /// snapshot; nested functions become opaque handles.
    #[must_use]
    pub fn to_property_value(&self) -> PropertyValue {
        match self {
            Self::Undefined => PropertyValue::Undefined,
            Self::Null => PropertyValue::Null,
            Self::Number(n) => PropertyValue::Number(*n),
            Self::String(s) => PropertyValue::String(s.clone()),
            Self::Boolean(b) => PropertyValue::Boolean(*b),
            Self::Array(items) => PropertyValue::array(items.iter().map(Self::to_property_value)),
            Self::Object(fields) => PropertyValue::Object(Arc::new(
                fields
                    .iter()
                    .map(|(name, value)| (*name, value.to_property_value()))
                    .collect::<PropertyObject>(),
            )),
            Self::Handle(handle) => PropertyValue::Handle(handle.clone()),
            Self::Dynamic(dynamic) => dynamic.current(),
            Self::Function(function) => PropertyValue::Handle(Handle::from_arc(Arc::new(
                function.clone(),
            ))),
        }
    }
}

impl fmt::Debug for SourceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("Undefined"),
            Self::Null => f.write_str("Null"),
            Self::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Self::String(s) => f.debug_tuple("String").field(s).finish(),
            Self::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            Self::Array(items) => f.debug_tuple("Array").field(items).finish(),
            Self::Object(fields) => f.debug_tuple("Object").field(fields).finish(),
            Self::Handle(handle) => f.debug_tuple("Handle").field(handle).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl From<PropertyValue> for SourceValue {
    fn from(value: PropertyValue) -> Self {
        match value {
            PropertyValue::Undefined => Self::Undefined,
            PropertyValue::Null => Self::Null,
            PropertyValue::Number(n) => Self::Number(n),
            PropertyValue::String(s) => Self::String(s),
            PropertyValue::Boolean(b) => Self::Boolean(b),
            PropertyValue::Array(items) => {
                Self::Array(items.iter().cloned().map(Self::from).collect())
            }
            PropertyValue::Object(object) => Self::Object(
                object
                    .iter()
                    .map(|(name, value)| (name, Self::from(value.clone())))
                    .collect(),
            ),
            PropertyValue::Handle(handle) => Self::Handle(handle),
        }
    }
}

impl From<f64> for SourceValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for SourceValue {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<u32> for SourceValue {
    fn from(value: u32) -> Self {
        Self::Number(value.into())
    }
}

impl From<bool> for SourceValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for SourceValue {
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl From<Vec<Self>> for SourceValue {
    fn from(value: Vec<Self>) -> Self {
        Self::Array(value)
    }
}

impl From<Arc<dyn DynamicValue>> for SourceValue {
    fn from(value: Arc<dyn DynamicValue>) -> Self {
        Self::Dynamic(value)
    }
}

/// The authored property bag of one node.
pub trait PropertyBag: Send + Sync {
    /// Returns the source authored for `name`, or [`SourceValue::Undefined`].
    fn get(&self, name: PropName) -> SourceValue;
}

/// A ready-made [`PropertyBag`] backed by a hash map.
///
/// # Example
///
/// ```rust
/// use canopy_property::{PropName, PropertyBag, Props, SourceValue};
///
/// let props = Props::new().with("r", 10.0).with("label", "dot");
/// assert!(matches!(props.get(PropName::new("r")), SourceValue::Number(n) if n == 10.0));
/// assert!(matches!(props.get(PropName::new("missing")), SourceValue::Undefined));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Props {
    entries: HashMap<PropName, SourceValue>,
}

impl Props {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `value` under `name` and returns the bag.
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<SourceValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets `value` under `name`.
    pub fn set(&mut self, name: &str, value: impl Into<SourceValue>) {
        self.entries.insert(PropName::new(name), value.into());
    }

    /// Removes the value under `name`.
    pub fn remove(&mut self, name: &str) -> Option<SourceValue> {
        self.entries.remove(&PropName::new(name))
    }

    /// Returns the number of authored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was authored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PropertyBag for Props {
    fn get(&self, name: PropName) -> SourceValue {
        self.entries.get(&name).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic::SharedValue;

    #[test]
    fn plain_conversion() {
        let source = SourceValue::object([
            ("x", 1.0.into()),
            ("tags", SourceValue::Array(vec!["a".into(), true.into()])),
        ]);
        let value = source.to_property_value();
        assert_eq!(value.field("x"), Some(&PropertyValue::Number(1.0)));
        let tags = value.field("tags").and_then(PropertyValue::as_array).unwrap();
        assert_eq!(tags, [PropertyValue::from("a"), PropertyValue::from(true)]);
    }

    #[test]
    fn nested_dynamic_is_snapshotted() {
        let shared = SharedValue::new(3.0);
        let source = SourceValue::object([("v", shared.clone().into_dynamic().into())]);
        shared.set(4.0);
        assert_eq!(
            source.to_property_value().field("v"),
            Some(&PropertyValue::Number(4.0))
        );
    }

    #[test]
    fn selector_candidates() {
        let shared = SharedValue::new(1.0);
        let selector = SourceValue::selector(shared.into_dynamic(), |v: &PropertyValue| v.clone());
        assert!(selector.is_selector_candidate());
        assert!(!SourceValue::object([("value", 1.0.into())]).is_selector_candidate());
        assert!(!SourceValue::from(1.0).is_selector_candidate());
    }

    #[test]
    fn round_trip_from_property_value() {
        let value = PropertyValue::object([("a", PropertyValue::array([1.0.into()]))]);
        assert_eq!(SourceValue::from(value.clone()).to_property_value(), value);
    }
}
