// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Setup-time property errors.

use thiserror::Error;

use crate::name::PropName;
use crate::value::PropType;

/// Errors raised while declaring or resolving a node's properties.
///
/// All of these are detected synchronously at node setup. Committing
/// transactions and reading values never fail.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PropertyError {
    /// A required property has no value.
    #[error("missing required property \"{name}\"")]
    Schema {
        /// The missing property.
        name: PropName,
    },
    /// A resolved value does not have the declared type.
    #[error("expected \"{expected}\", got \"{actual}\" for property \"{name}\"")]
    TypeMismatch {
        /// The offending property.
        name: PropName,
        /// The declared type.
        expected: PropType,
        /// The type that was found.
        actual: PropType,
    },
    /// An object looked like a selector expression but could not be used as one.
    #[error("malformed selector for property \"{name}\": {reason}")]
    MalformedSelector {
        /// The offending property.
        name: PropName,
        /// What is wrong with the selector.
        reason: &'static str,
    },
}

impl PropertyError {
    /// Returns the property the error is about.
    #[must_use]
    pub fn name(&self) -> PropName {
        match self {
            Self::Schema { name }
            | Self::TypeMismatch { name, .. }
            | Self::MalformedSelector { name, .. } => *name,
        }
    }
}
