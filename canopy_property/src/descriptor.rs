// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declarative property descriptors.

use core::fmt;

use crate::error::PropertyError;
use crate::name::PropName;
use crate::store::PropertyStore;
use crate::value::{PropType, PropertyValue};

/// A node property declaration: name, expected type and optionality.
///
/// A descriptor is a `Copy` handle and holds no value of its own. Reads go
/// through the node's [`PropertyStore`], which is passed explicitly.
///
/// # Example
///
/// ```rust
/// use canopy_property::{NodeProp, PropertyError, PropertyStore, Props};
///
/// let radius = NodeProp::number("r").require();
/// let label = NodeProp::string("label");
///
/// let mut store = PropertyStore::new(Props::new().with("r", 4.0));
/// radius.resolve(&mut store).unwrap();
/// label.resolve(&mut store).unwrap();
///
/// assert_eq!(radius.value(&store).as_number(), Some(4.0));
/// assert!(!label.is_set(&store));
/// assert!(radius.validate(&store).is_ok());
///
/// let empty = PropertyStore::new(Props::new());
/// assert!(matches!(radius.validate(&empty), Err(PropertyError::Schema { .. })));
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct NodeProp {
    name: PropName,
    ty: Option<PropType>,
    required: bool,
}

impl NodeProp {
    /// Declares an optional property accepting any type.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self::from_name(PropName::new(name), None)
    }

    /// Declares an optional property of type `ty`.
    #[must_use]
    pub fn typed(name: &str, ty: PropType) -> Self {
        Self::from_name(PropName::new(name), Some(ty))
    }

    /// Declares an optional property from an already interned name.
    #[must_use]
    #[inline]
    pub const fn from_name(name: PropName, ty: Option<PropType>) -> Self {
        Self {
            name,
            ty,
            required: false,
        }
    }

    /// Declares an optional number property.
    #[must_use]
    pub fn number(name: &str) -> Self {
        Self::typed(name, PropType::Number)
    }

    /// Declares an optional string property.
    #[must_use]
    pub fn string(name: &str) -> Self {
        Self::typed(name, PropType::String)
    }

    /// Declares an optional boolean property.
    #[must_use]
    pub fn boolean(name: &str) -> Self {
        Self::typed(name, PropType::Boolean)
    }

    /// Declares an optional array property.
    #[must_use]
    pub fn array(name: &str) -> Self {
        Self::typed(name, PropType::Array)
    }

    /// Declares an optional object property.
    #[must_use]
    pub fn object(name: &str) -> Self {
        Self::typed(name, PropType::Object)
    }

    /// Declares an optional handle property.
    #[must_use]
    pub fn handle(name: &str) -> Self {
        Self::typed(name, PropType::Handle)
    }

    /// Marks the property as required: absence fails node setup.
    #[must_use]
    #[inline]
    pub const fn require(mut self) -> Self {
        self.required = true;
        self
    }

    /// Returns the property name.
    #[must_use]
    #[inline]
    pub const fn name(&self) -> PropName {
        self.name
    }

    /// Returns the declared type, `None` for any.
    #[must_use]
    #[inline]
    pub const fn ty(&self) -> Option<PropType> {
        self.ty
    }

    /// Returns `true` if the property is required.
    #[must_use]
    #[inline]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Resolves the property into `store`.
    ///
    /// # Errors
    ///
    /// See [`PropertyStore::resolve`].
    pub fn resolve<'a>(
        &self,
        store: &'a mut PropertyStore,
    ) -> Result<&'a PropertyValue, PropertyError> {
        store.resolve(self.name, self.ty)
    }

    /// Fails with [`PropertyError::Schema`] if the property is required and
    /// has no value in `store`.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::Schema`] for a missing required property.
    pub fn validate(&self, store: &PropertyStore) -> Result<(), PropertyError> {
        if self.required && !store.has_value(self.name) {
            return Err(PropertyError::Schema { name: self.name });
        }
        Ok(())
    }

    /// Returns the current value, undefined when absent.
    #[must_use]
    pub fn value<'a>(&self, store: &'a PropertyStore) -> &'a PropertyValue {
        store.value(self.name)
    }

    /// Returns `true` if the property holds a value other than undefined or null.
    #[must_use]
    pub fn is_set(&self, store: &PropertyStore) -> bool {
        store.has_value(self.name)
    }

    /// Returns `true` if the property changed since the last reset.
    #[must_use]
    pub fn is_changed(&self, store: &PropertyStore) -> bool {
        store.has_changes_for(self.name)
    }
}

impl fmt::Debug for NodeProp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeProp")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("required", &self.required)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Props;

    #[test]
    fn require_is_sticky_and_copy() {
        let color = NodeProp::string("color");
        let required = color.require();
        assert!(!color.is_required());
        assert!(required.is_required());
        assert_eq!(required.name(), PropName::new("color"));
        assert_eq!(required.ty(), Some(PropType::String));
    }

    #[test]
    fn null_counts_as_missing() {
        let prop = NodeProp::number("n").require();
        let mut store = PropertyStore::new(Props::new().with("n", crate::SourceValue::Null));
        prop.resolve(&mut store).unwrap();
        assert!(!prop.is_set(&store));
        assert_eq!(
            prop.validate(&store),
            Err(PropertyError::Schema { name: prop.name() })
        );
    }

    #[test]
    fn changes_are_visible_per_descriptor() {
        let a = NodeProp::number("a");
        let b = NodeProp::number("b");
        let mut store = PropertyStore::new(Props::new().with("a", 1.0).with("b", 2.0));
        a.resolve(&mut store).unwrap();
        b.resolve(&mut store).unwrap();

        store.stage_transaction(a.name(), 5.0.into());
        store.commit_transactions();
        assert!(a.is_changed(&store));
        assert!(!b.is_changed(&store));
        assert_eq!(a.value(&store).as_number(), Some(5.0));
    }

    #[test]
    fn untyped_descriptor_accepts_anything() {
        let any = NodeProp::new("any");
        let mut store = PropertyStore::new(Props::new().with("any", "text"));
        assert!(any.resolve(&mut store).is_ok());
        assert_eq!(any.ty(), None);
    }
}
