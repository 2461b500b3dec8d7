// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The set of properties a node declares.

use smallvec::SmallVec;

use crate::derived::{Derive, DerivedProp};
use crate::descriptor::NodeProp;
use crate::error::PropertyError;
use crate::name::PropName;
use crate::store::PropertyStore;

/// A node's declared properties.
///
/// Descriptors are kept in declaration order. Declaring the same name twice
/// keeps the first declared type and makes the property required if either
/// declaration required it.
///
/// # Example
///
/// ```rust
/// use canopy_property::{NodeProp, PropertySchema, PropertyStore, Props};
///
/// let mut schema = PropertySchema::new();
/// schema.define(NodeProp::string("color").require());
/// schema.define(NodeProp::number("opacity"));
///
/// let mut store = PropertyStore::new(Props::new().with("color", "red"));
/// schema.resolve(&mut store).unwrap();
/// assert!(store.has_value(NodeProp::string("color").name()));
/// ```
#[derive(Clone, Debug, Default)]
pub struct PropertySchema {
    props: SmallVec<[NodeProp; 8]>,
}

impl PropertySchema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `prop` and returns the descriptor actually stored.
    pub fn define(&mut self, prop: NodeProp) -> NodeProp {
        if let Some(existing) = self.props.iter_mut().find(|p| p.name() == prop.name()) {
            if prop.is_required() && !existing.is_required() {
                *existing = existing.require();
            }
            return *existing;
        }
        self.props.push(prop);
        prop
    }

    /// Declares the dependencies of `derived`.
    pub fn define_derived<D: Derive>(&mut self, derived: &DerivedProp<D>) {
        for dep in derived.dependencies() {
            self.define(*dep);
        }
    }

    /// Returns the declared descriptors in declaration order.
    #[must_use]
    pub fn props(&self) -> &[NodeProp] {
        &self.props
    }

    /// Returns the descriptor declared for `name`.
    #[must_use]
    pub fn get(&self, name: PropName) -> Option<NodeProp> {
        self.props.iter().copied().find(|p| p.name() == name)
    }

    /// Returns the number of declared properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.props.len()
    }

    /// Returns `true` if nothing was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// Resolves every declared property into `store`, then checks required
    /// properties.
    ///
    /// # Errors
    ///
    /// The first resolve error, or [`PropertyError::Schema`] for the first
    /// missing required property.
    pub fn resolve(&self, store: &mut PropertyStore) -> Result<(), PropertyError> {
        for prop in &self.props {
            prop.resolve(store)?;
        }
        self.validate(store)
    }

    /// Checks that every required property has a value.
    ///
    /// # Errors
    ///
    /// [`PropertyError::Schema`] for the first missing required property.
    pub fn validate(&self, store: &PropertyStore) -> Result<(), PropertyError> {
        self.props.iter().try_for_each(|prop| prop.validate(store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Props;
    use crate::value::PropType;

    #[test]
    fn duplicate_definitions_merge() {
        let mut schema = PropertySchema::new();
        schema.define(NodeProp::number("x"));
        let merged = schema.define(NodeProp::number("x").require());
        assert_eq!(schema.len(), 1);
        assert!(merged.is_required());

        let kept = schema.define(NodeProp::string("x"));
        assert_eq!(kept.ty(), Some(PropType::Number));
        assert!(kept.is_required());
    }

    #[test]
    fn derived_dependencies_are_declared() {
        let start = NodeProp::object("start");
        let end = NodeProp::object("end");
        let derived = DerivedProp::from_fn([start, end], |_: &PropertyStore| Some(()));

        let mut schema = PropertySchema::new();
        schema.define(start.require());
        schema.define_derived(&derived);
        assert_eq!(schema.len(), 2);
        assert!(schema.get(start.name()).is_some_and(|p| p.is_required()));
        assert!(schema.get(end.name()).is_some_and(|p| !p.is_required()));
    }

    #[test]
    fn missing_required_fails_after_resolving() {
        let mut schema = PropertySchema::new();
        schema.define(NodeProp::number("present"));
        schema.define(NodeProp::number("absent").require());

        let mut store = PropertyStore::new(Props::new().with("present", 1.0));
        let err = schema.resolve(&mut store).unwrap_err();
        assert_eq!(err, PropertyError::Schema { name: PropName::new("absent") });
        assert!(store.is_resolved(PropName::new("present")));
    }

    #[test]
    fn type_errors_win_over_schema_errors() {
        let mut schema = PropertySchema::new();
        schema.define(NodeProp::number("absent").require());
        schema.define(NodeProp::number("wrong"));

        let mut store = PropertyStore::new(Props::new().with("wrong", "text"));
        assert!(matches!(
            schema.resolve(&mut store),
            Err(PropertyError::TypeMismatch { .. })
        ));
    }
}
