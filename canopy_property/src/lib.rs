// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Property: property binding and change propagation for scene nodes.
//!
//! Scene nodes are authored with a bag of properties. Some are plain data,
//! some are live values that keep changing on another thread (animations,
//! gestures). This crate turns such a bag into native values a renderer can
//! read, and keeps them up to date without the renderer ever blocking on the
//! authoring side.
//!
//! ## Core Concepts
//!
//! ### Property Storage
//!
//! [`PropertyStore`] is owned by a node and holds:
//!
//! - the authoritative [`PropertyValue`] per [`PropName`], read only by the consumer
//! - a mutex-guarded queue of pending transactions, written by listeners
//! - the names changed since the last frame reset
//!
//! ### Sources
//!
//! Each authored [`SourceValue`] is classified on [`resolve`](PropertyStore::resolve):
//!
//! - **dynamic value** ([`DynamicValue`]): seeded with its snapshot; every
//!   notification stages a new snapshot
//! - **selector expression** (`{ selector, value }`): like a dynamic value,
//!   with the selector applied to every snapshot
//! - **plain value**: converted once and type checked
//!
//! ### Key Operations
//!
//! - `resolve(name, type)` - classify, convert, subscribe
//! - `stage_transaction(name, value)` - any thread, last write wins
//! - `commit_transactions()` - consumer, once per frame
//! - `has_changes()` / `reset_changes()` - per-frame change detection
//!
//! ### Descriptors
//!
//! Nodes declare properties with [`NodeProp`] and collect them in a
//! [`PropertySchema`]. Values computed from several properties are
//! [`DerivedProp`]s, which recompute only when a dependency changed.
//!
//! ## Quick Start
//!
//! ```rust
//! use canopy_property::{
//!     DerivedProp, NodeProp, PropertySchema, PropertyStore, PropertyValue, Props,
//!     SharedValue, SourceValue,
//! };
//!
//! let progress = SharedValue::new(0.25);
//! let props = Props::new()
//!     .with("width", 200.0)
//!     .with(
//!         "fill",
//!         SourceValue::selector(progress.clone().into_dynamic(), |v| {
//!             PropertyValue::Number(v.as_number().unwrap_or(0.0) * 100.0)
//!         }),
//!     );
//!
//! let width = NodeProp::number("width").require();
//! let fill = NodeProp::number("fill").require();
//! let mut filled = DerivedProp::from_fn([width, fill], move |store: &PropertyStore| {
//!     Some(width.value(store).as_number()? * fill.value(store).as_number()? / 100.0)
//! });
//!
//! let mut schema = PropertySchema::new();
//! schema.define(width);
//! schema.define(fill);
//! schema.define_derived(&filled);
//!
//! let mut store = PropertyStore::new(props);
//! schema.resolve(&mut store).unwrap();
//! assert_eq!(filled.get_derived_value(&store), Some(&50.0));
//!
//! // Producer side.
//! progress.set(0.5);
//!
//! // Consumer side, once per frame.
//! store.commit_transactions();
//! assert!(store.has_changes());
//! assert_eq!(filled.get_derived_value(&store), Some(&100.0));
//! store.reset_changes();
//! ```
//!
//! ## Threading
//!
//! Listeners reach the store only through a weak reference to its
//! transaction queue. A notification arriving after the owning store was
//! dropped does nothing.

mod derived;
mod descriptor;
mod dynamic;
mod error;
mod name;
mod options;
mod schema;
mod source;
mod store;
mod value;

pub use derived::{Derive, DeriveFn, DerivedProp};
pub use descriptor::NodeProp;
pub use dynamic::{DynamicValue, Listener, SelectorFn, SharedValue, Subscription};
pub use error::PropertyError;
pub use name::PropName;
pub use options::{StoreOptions, StoreOptionsBuilder};
pub use schema::PropertySchema;
pub use source::{PropertyBag, Props, SourceValue};
pub use store::PropertyStore;
pub use value::{Handle, PropType, PropertyObject, PropertyValue};
