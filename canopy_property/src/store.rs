// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node property storage with transactional updates.
//!
//! A [`PropertyStore`] converts a node's authored [`PropertyBag`] into native
//! [`PropertyValue`]s that the consumer (render) side can read without going
//! back to the authoring side.
//!
//! # Threading
//!
//! The store itself is owned by its node and read by the consumer. Dynamic
//! value listeners run on the producer side and never touch the store: they
//! write into a separate transaction queue, shared with the store through an
//! `Arc` and held by listeners only as a `Weak`. The consumer drains that
//! queue once per frame with [`commit_transactions`](PropertyStore::commit_transactions).
//! Once the store is dropped the queue goes away with it and late
//! notifications find nothing to upgrade.

use core::fmt;
use std::sync::{Arc, Weak};

use canopy_dirty::ChangeSet;
use hashbrown::{HashMap, HashSet};
use parking_lot::Mutex;

use crate::dynamic::{DynamicValue, SelectorFn, Subscription};
use crate::error::PropertyError;
use crate::name::PropName;
use crate::options::StoreOptions;
use crate::source::{PropertyBag, SELECTOR_FIELD, SourceValue, VALUE_FIELD};
use crate::value::{PropType, PropertyValue};

static UNDEFINED: PropertyValue = PropertyValue::Undefined;

/// Staged `(name, value)` updates awaiting the next commit.
#[derive(Default)]
struct TransactionQueue {
    inner: Mutex<Pending>,
}

#[derive(Default)]
struct Pending {
    values: HashMap<PropName, PropertyValue>,
    /// Stage calls since the last commit, including overwritten ones.
    marker: usize,
}

impl TransactionQueue {
    fn stage(&self, name: PropName, value: PropertyValue) {
        let mut pending = self.inner.lock();
        pending.values.insert(name, value);
        pending.marker += 1;
    }

    fn discard(&self, name: PropName) {
        self.inner.lock().values.remove(&name);
    }
}

/// Per-node property storage.
///
/// # Example
///
/// ```rust
/// use canopy_property::{PropName, PropType, PropertyStore, Props, SharedValue};
///
/// let radius = SharedValue::new(5.0);
/// let props = Props::new().with("r", radius.clone().into_dynamic());
/// let mut store = PropertyStore::new(props);
///
/// let r = PropName::new("r");
/// store.resolve(r, Some(PropType::Number)).unwrap();
/// assert_eq!(store.value(r).as_number(), Some(5.0));
///
/// // Notifications are staged, not applied.
/// radius.set(7.0);
/// assert_eq!(store.value(r).as_number(), Some(5.0));
/// assert!(!store.has_changes());
///
/// // The consumer applies them once per frame.
/// store.commit_transactions();
/// assert_eq!(store.value(r).as_number(), Some(7.0));
/// assert!(store.has_changes_for(r));
///
/// store.reset_changes();
/// assert!(!store.has_changes());
/// ```
pub struct PropertyStore {
    props: Arc<dyn PropertyBag>,
    options: StoreOptions,
    /// Authoritative values, read by the consumer only.
    values: HashMap<PropName, PropertyValue>,
    /// Names whose value is neither undefined nor null.
    present: HashSet<PropName>,
    changes: ChangeSet<PropName>,
    transactions: Arc<TransactionQueue>,
    subscriptions: HashMap<PropName, Subscription>,
}

impl PropertyStore {
    /// Creates a store over `props` with default options.
    pub fn new(props: impl PropertyBag + 'static) -> Self {
        Self::with_options(Arc::new(props), StoreOptions::default())
    }

    /// Creates a store over a shared bag with explicit options.
    pub fn with_options(props: Arc<dyn PropertyBag>, options: StoreOptions) -> Self {
        Self {
            props,
            options,
            values: HashMap::new(),
            present: HashSet::new(),
            changes: ChangeSet::new(),
            transactions: Arc::default(),
            subscriptions: HashMap::new(),
        }
    }

    /// Returns the store options.
    #[must_use]
    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Returns the authored property bag.
    #[must_use]
    pub fn props(&self) -> &dyn PropertyBag {
        &*self.props
    }

    /// Replaces the authored property bag.
    ///
    /// Existing values and subscriptions are kept until each name is
    /// resolved again.
    pub fn set_props(&mut self, props: Arc<dyn PropertyBag>) {
        self.props = props;
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Reads the authored source for `name`, stores its native value, and
    /// subscribes to it if it is dynamic.
    ///
    /// `expected` is the declared type, `None` accepting any type. Undefined
    /// and null always pass the type check.
    ///
    /// Resolving a name again releases its previous subscription and drops
    /// any transaction still pending for it. The first resolve of a name
    /// does not count as a change; later ones do.
    ///
    /// A failed resolve leaves the name untouched: its previous value and
    /// subscription stay in place.
    ///
    /// # Errors
    ///
    /// - [`PropertyError::TypeMismatch`] if the value has the wrong type.
    /// - [`PropertyError::MalformedSelector`] if the source looks like a
    ///   selector expression but is not a usable one.
    pub fn resolve(
        &mut self,
        name: PropName,
        expected: Option<PropType>,
    ) -> Result<&PropertyValue, PropertyError> {
        let source = self.props.get(name);
        let binding = match &source {
            SourceValue::Dynamic(dynamic) => Some((dynamic.clone(), None)),
            source if source.is_selector_candidate() => {
                let (dynamic, selector) = selector_parts(name, source)?;
                Some((dynamic, Some(selector)))
            }
            _ => None,
        };

        let value = match binding {
            Some((dynamic, selector)) => {
                if self.options.check_dynamic_seeds() {
                    check_type(name, expected, &snapshot(&*dynamic, selector.as_ref()))?;
                }
                self.release(name);
                // Listen before reading the seed so no notification falls
                // between the two.
                let subscription = self.listen(name, &dynamic, selector.clone());
                self.subscriptions.insert(name, subscription);
                snapshot(&*dynamic, selector.as_ref())
            }
            None => {
                let value = source.to_property_value();
                check_type(name, expected, &value)?;
                self.release(name);
                value
            }
        };

        self.seed(name, value);
        Ok(self.value(name))
    }

    /// Resolves `name` as a number.
    ///
    /// # Errors
    ///
    /// See [`resolve`](Self::resolve).
    pub fn resolve_number(&mut self, name: PropName) -> Result<&PropertyValue, PropertyError> {
        self.resolve(name, Some(PropType::Number))
    }

    /// Resolves `name` as a string.
    ///
    /// # Errors
    ///
    /// See [`resolve`](Self::resolve).
    pub fn resolve_string(&mut self, name: PropName) -> Result<&PropertyValue, PropertyError> {
        self.resolve(name, Some(PropType::String))
    }

    /// Resolves `name` as a boolean.
    ///
    /// # Errors
    ///
    /// See [`resolve`](Self::resolve).
    pub fn resolve_boolean(&mut self, name: PropName) -> Result<&PropertyValue, PropertyError> {
        self.resolve(name, Some(PropType::Boolean))
    }

    /// Resolves `name` as an array.
    ///
    /// # Errors
    ///
    /// See [`resolve`](Self::resolve).
    pub fn resolve_array(&mut self, name: PropName) -> Result<&PropertyValue, PropertyError> {
        self.resolve(name, Some(PropType::Array))
    }

    /// Resolves `name` as an object.
    ///
    /// # Errors
    ///
    /// See [`resolve`](Self::resolve).
    pub fn resolve_object(&mut self, name: PropName) -> Result<&PropertyValue, PropertyError> {
        self.resolve(name, Some(PropType::Object))
    }

    /// Resolves `name` as an opaque handle.
    ///
    /// # Errors
    ///
    /// See [`resolve`](Self::resolve).
    pub fn resolve_handle(&mut self, name: PropName) -> Result<&PropertyValue, PropertyError> {
        self.resolve(name, Some(PropType::Handle))
    }

    fn listen(
        &self,
        name: PropName,
        dynamic: &Arc<dyn DynamicValue>,
        selector: Option<SelectorFn>,
    ) -> Subscription {
        let queue: Weak<TransactionQueue> = Arc::downgrade(&self.transactions);
        // The value is held strongly: a bag may hand out a fresh trait object
        // on every `get`. Cancelling the subscription breaks the cycle.
        let source = dynamic.clone();
        tracing::debug!(property = %name, selector = selector.is_some(), "subscribing to dynamic value");
        dynamic.add_listener(Arc::new(move || {
            let Some(queue) = queue.upgrade() else {
                return;
            };
            queue.stage(name, snapshot(&*source, selector.as_ref()));
        }))
    }

    fn release(&mut self, name: PropName) {
        if let Some(mut subscription) = self.subscriptions.remove(&name) {
            tracing::debug!(property = %name, "releasing subscription");
            subscription.cancel();
        }
        self.transactions.discard(name);
    }

    fn seed(&mut self, name: PropName, value: PropertyValue) {
        let present = !value.is_undefined_or_null();
        if self.values.insert(name, value).is_some() {
            self.changes.mark(name);
        } else {
            self.changes.touch(name);
        }
        self.set_present(name, present);
    }

    fn set_present(&mut self, name: PropName, present: bool) {
        if present {
            self.present.insert(name);
        } else {
            self.present.remove(&name);
        }
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    /// Stages `value` for `name` until the next commit.
    ///
    /// Callable from any thread. Staging the same name twice before a commit
    /// keeps only the last value.
    pub fn stage_transaction(&self, name: PropName, value: PropertyValue) {
        self.transactions.stage(name, value);
    }

    /// Returns `true` if transactions were staged since the last commit.
    #[must_use]
    pub fn has_pending_transactions(&self) -> bool {
        self.transactions.inner.lock().marker > 0
    }

    /// Applies every staged transaction and returns how many names were
    /// committed.
    ///
    /// With [`skip_unchanged_commits`](StoreOptions::skip_unchanged_commits)
    /// a committed name equal to its current value is counted but not
    /// marked changed.
    ///
    /// Each staged value is swapped into its slot in place. The displaced
    /// values are dropped after the queue lock is released.
    pub fn commit_transactions(&mut self) -> usize {
        let mut displaced = Vec::new();
        {
            let mut pending = self.transactions.inner.lock();
            pending.marker = 0;
            displaced.reserve(pending.values.len());
            for (name, mut value) in pending.values.drain() {
                let slot = self.values.entry(name).or_default();
                let unchanged = self.options.skip_unchanged_commits() && *slot == value;
                slot.swap(&mut value);
                let present = !slot.is_undefined_or_null();
                if present {
                    self.present.insert(name);
                } else {
                    self.present.remove(&name);
                }
                if !unchanged {
                    self.changes.mark(name);
                }
                displaced.push(value);
            }
        }
        let committed = displaced.len();
        if committed > 0 {
            tracing::trace!(committed, "committed property transactions");
        }
        committed
    }

    // =========================================================================
    // Reading
    // =========================================================================

    /// Returns the current value of `name`, undefined if it was never resolved.
    #[must_use]
    pub fn value(&self, name: PropName) -> &PropertyValue {
        self.values.get(&name).unwrap_or(&UNDEFINED)
    }

    /// Returns the current value of `name`, if it was ever resolved or committed.
    #[must_use]
    pub fn get(&self, name: PropName) -> Option<&PropertyValue> {
        self.values.get(&name)
    }

    /// Returns `true` if `name` holds a value other than undefined or null.
    #[must_use]
    pub fn has_value(&self, name: PropName) -> bool {
        self.present.contains(&name)
    }

    /// Returns `true` if `name` was resolved or committed at least once.
    #[must_use]
    pub fn is_resolved(&self, name: PropName) -> bool {
        self.values.contains_key(&name)
    }

    /// Returns the number of names with a value other than undefined or null.
    #[must_use]
    pub fn len(&self) -> usize {
        self.present.len()
    }

    /// Returns `true` if no name holds a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.present.is_empty()
    }

    // =========================================================================
    // Change tracking
    // =========================================================================

    /// Returns `true` if any name changed since the last reset.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.changes.has_changes()
    }

    /// Returns `true` if `name` changed since the last reset.
    #[must_use]
    pub fn has_changes_for(&self, name: PropName) -> bool {
        self.changes.is_changed(name)
    }

    /// Returns the names changed since the last reset.
    pub fn changed_names(&self) -> impl Iterator<Item = PropName> + '_ {
        self.changes.iter()
    }

    /// Returns the number of changes since the last reset, repeated names included.
    #[must_use]
    pub fn change_count(&self) -> usize {
        self.changes.count()
    }

    /// Clears the changed names and the change counter.
    ///
    /// Call exactly once per frame, after every consumer observed the changes.
    pub fn reset_changes(&mut self) {
        self.changes.reset();
    }

    /// Returns the change generation; see [`changed_since`](Self::changed_since).
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.changes.generation()
    }

    /// Returns `true` if `name` got a new value after `generation`.
    ///
    /// Unlike [`has_changes_for`](Self::has_changes_for) this survives
    /// [`reset_changes`](Self::reset_changes), and it also sees initial seeds.
    #[must_use]
    pub fn changed_since(&self, name: PropName, generation: u64) -> bool {
        self.changes.changed_since(name, generation)
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Returns the number of live subscriptions.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Releases every subscription. Idempotent.
    pub fn unsubscribe(&mut self) {
        if self.subscriptions.is_empty() {
            return;
        }
        tracing::debug!(count = self.subscriptions.len(), "releasing all subscriptions");
        for (_, mut subscription) in self.subscriptions.drain() {
            subscription.cancel();
        }
    }
}

impl Drop for PropertyStore {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for PropertyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyStore")
            .field("values", &self.values)
            .field("changed", &self.changes.len())
            .field("subscriptions", &self.subscriptions.len())
            .finish_non_exhaustive()
    }
}

fn snapshot(dynamic: &dyn DynamicValue, selector: Option<&SelectorFn>) -> PropertyValue {
    let current = dynamic.current();
    match selector {
        Some(selector) => selector(&current),
        None => current,
    }
}

fn check_type(
    name: PropName,
    expected: Option<PropType>,
    value: &PropertyValue,
) -> Result<(), PropertyError> {
    match expected {
        Some(expected) if !value.is_undefined_or_null() && value.ty() != expected => {
            Err(PropertyError::TypeMismatch {
                name,
                expected,
                actual: value.ty(),
            })
        }
        _ => Ok(()),
    }
}

fn selector_parts(
    name: PropName,
    source: &SourceValue,
) -> Result<(Arc<dyn DynamicValue>, SelectorFn), PropertyError> {
    let selector = match source.field(PropName::new(SELECTOR_FIELD)) {
        Some(SourceValue::Function(selector)) => selector.clone(),
        _ => {
            return Err(PropertyError::MalformedSelector {
                name,
                reason: "`selector` is not a function",
            });
        }
    };
    let dynamic = match source.field(PropName::new(VALUE_FIELD)) {
        Some(SourceValue::Dynamic(dynamic)) => dynamic.clone(),
        Some(_) => {
            return Err(PropertyError::MalformedSelector {
                name,
                reason: "`value` is not a dynamic value",
            });
        }
        None => {
            return Err(PropertyError::MalformedSelector {
                name,
                reason: "missing `value` field",
            });
        }
    };
    Ok((dynamic, selector))
}
