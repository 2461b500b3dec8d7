// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Dirty: per-key change tracking and key interning.
//!
//! This crate provides the two small building blocks the property engine uses
//! to decide what needs recomputing:
//!
//! - **Change sets** ([`ChangeSet`]): the keys changed since the last reset,
//!   a change counter, and a monotonically increasing generation. Every key
//!   also remembers the generation at which it last changed, which survives
//!   [`ChangeSet::reset`] so that lazily evaluated consumers can ask "did this
//!   key change since I last looked?" across frame boundaries.
//! - **Interning** ([`intern::Interner`], [`InternId`]): maps owned or
//!   borrowed keys to compact `Copy` ids, so hot paths compare integers.
//!
//! ## Quick Start
//!
//! ```rust
//! use canopy_dirty::ChangeSet;
//!
//! let mut changes = ChangeSet::<u32>::new();
//!
//! // A consumer computes something at the current generation.
//! let computed_at = changes.generation();
//!
//! changes.mark(1);
//! changes.mark(2);
//! assert!(changes.has_changes());
//! assert!(changes.is_changed(1));
//!
//! // Frame boundary: per-frame state is cleared...
//! changes.reset();
//! assert!(!changes.has_changes());
//!
//! // ...but the consumer can still tell that key 1 moved on.
//! assert!(changes.changed_since(1, computed_at));
//! assert!(!changes.changed_since(3, computed_at));
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod changes;
pub mod intern;

pub use changes::ChangeSet;
pub use intern::InternId;
