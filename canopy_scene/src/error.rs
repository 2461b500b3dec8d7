// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene setup errors.

use canopy_property::{PropName, PropertyError};
use thiserror::Error;

/// Errors raised while creating or updating scene nodes.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SceneError {
    /// A property failed to resolve or a required one is missing.
    #[error(transparent)]
    Property(#[from] PropertyError),
    /// The factory has no constructor for this type tag.
    #[error("unknown node type \"{tag}\"")]
    UnknownNodeType {
        /// The requested tag.
        tag: String,
    },
    /// A property has the right type but a value the node cannot use.
    #[error("the value \"{value}\" is not a valid {kind} for property \"{name}\"")]
    InvalidValue {
        /// The offending property.
        name: PropName,
        /// The rejected value, as text.
        value: String,
        /// What the property expects, for example "tile mode".
        kind: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_errors_pass_through() {
        let inner = PropertyError::Schema {
            name: PropName::new("color"),
        };
        let err = SceneError::from(inner.clone());
        assert_eq!(err.to_string(), inner.to_string());
    }

    #[test]
    fn invalid_value_message() {
        let err = SceneError::InvalidValue {
            name: PropName::new("mode"),
            value: "decal".into(),
            kind: "tile mode",
        };
        assert_eq!(
            err.to_string(),
            "the value \"decal\" is not a valid tile mode for property \"mode\""
        );
    }
}
