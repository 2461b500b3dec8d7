// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dynamic values and their subscriptions.
//!
//! A dynamic value is owned by the authoring side and changes independently
//! of the scene author: an animation clock, a gesture position, a value
//! driven by a timeline. The engine only needs two capabilities from it, a
//! synchronous snapshot and change notification, captured by
//! [`DynamicValue`].

use core::fmt;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};

use crate::value::PropertyValue;

/// Callback invoked after a dynamic value changed.
///
/// Listeners receive no arguments; they read the new snapshot through
/// [`DynamicValue::current`].
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// Transform applied by a selector expression to a dynamic value's snapshot.
pub type SelectorFn = Arc<dyn Fn(&PropertyValue) -> PropertyValue + Send + Sync>;

/// The observable capability of a dynamic value.
pub trait DynamicValue: Send + Sync {
    /// Returns a snapshot of the current value.
    fn current(&self) -> PropertyValue;

    /// Registers `listener` to run after every change.
    ///
    /// The listener stays registered until the returned [`Subscription`] is
    /// cancelled or dropped.
    fn add_listener(&self, listener: Listener) -> Subscription;
}

/// Cancellation handle for a registered listener.
///
/// Cancelling is idempotent and may happen on any thread. Dropping a
/// subscription cancels it.
#[must_use = "dropping a subscription cancels it immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Creates a subscription that runs `cancel` exactly once when released.
    pub fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Creates a subscription with nothing to release.
    pub fn empty() -> Self {
        Self { cancel: None }
    }

    /// Returns `true` until the subscription has been cancelled.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    /// Releases the listener. Further calls do nothing.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

struct SharedInner {
    value: RwLock<PropertyValue>,
    listeners: Mutex<Listeners>,
}

/// A reference [`DynamicValue`]: a shared cell that notifies on every write.
///
/// Notification is synchronous on the writing thread. The listener list is
/// snapshotted before listeners run, so a listener may read the value or
/// cancel subscriptions without deadlocking.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use canopy_property::{DynamicValue, PropertyValue, SharedValue};
///
/// let value = SharedValue::new(5.0);
/// let hits = Arc::new(AtomicUsize::new(0));
/// let counter = hits.clone();
/// let subscription = value.add_listener(Arc::new(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// }));
///
/// value.set(7.0);
/// assert_eq!(value.current(), PropertyValue::Number(7.0));
/// assert_eq!(hits.load(Ordering::SeqCst), 1);
///
/// drop(subscription);
/// value.set(9.0);
/// assert_eq!(hits.load(Ordering::SeqCst), 1);
/// ```
#[derive(Clone)]
pub struct SharedValue {
    inner: Arc<SharedInner>,
}

impl SharedValue {
    /// Creates a new value.
    pub fn new(value: impl Into<PropertyValue>) -> Self {
        Self {
            inner: Arc::new(SharedInner {
                value: RwLock::new(value.into()),
                listeners: Mutex::new(Listeners::default()),
            }),
        }
    }

    /// Replaces the value and notifies every listener.
    pub fn set(&self, value: impl Into<PropertyValue>) {
        *self.inner.value.write() = value.into();
        self.notify();
    }

    /// Runs every registered listener.
    pub fn notify(&self) {
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .lock()
            .entries
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener();
        }
    }

    /// Returns the number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.lock().entries.len()
    }

    /// Returns this value as a shared trait object.
    #[must_use]
    pub fn into_dynamic(self) -> Arc<dyn DynamicValue> {
        Arc::new(self)
    }
}

impl DynamicValue for SharedValue {
    fn current(&self) -> PropertyValue {
        self.inner.value.read().clone()
    }

    fn add_listener(&self, listener: Listener) -> Subscription {
        let id = {
            let mut listeners = self.inner.listeners.lock();
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.entries.push((id, listener));
            id
        };
        let weak: Weak<SharedInner> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.listeners.lock().entries.retain(|(i, _)| *i != id);
            }
        })
    }
}

impl fmt::Debug for SharedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedValue")
            .field("value", &*self.inner.value.read())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(value: &SharedValue) -> (Arc<AtomicUsize>, Subscription) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let sub = value.add_listener(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        (hits, sub)
    }

    #[test]
    fn cancel_is_idempotent() {
        let value = SharedValue::new(1.0);
        let (hits, mut sub) = counting(&value);
        assert_eq!(value.listener_count(), 1);

        sub.cancel();
        sub.cancel();
        assert!(!sub.is_active());
        assert_eq!(value.listener_count(), 0);

        value.set(2.0);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn cancel_after_value_dropped_is_noop() {
        let value = SharedValue::new(1.0);
        let (_hits, mut sub) = counting(&value);
        drop(value);
        sub.cancel();
        assert!(!sub.is_active());
    }

    #[test]
    fn listener_may_read_value_during_notify() {
        let value = SharedValue::new(1.0);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (reader, sink) = (value.clone(), seen.clone());
        let _sub = value.add_listener(Arc::new(move || {
            sink.lock().push(reader.current());
        }));

        value.set(2.0);
        value.set(3.0);
        assert_eq!(
            *seen.lock(),
            [PropertyValue::Number(2.0), PropertyValue::Number(3.0)]
        );
    }

    #[test]
    fn independent_listeners() {
        let value = SharedValue::new(0.0);
        let (a_hits, a) = counting(&value);
        let (b_hits, _b) = counting(&value);

        value.set(1.0);
        drop(a);
        value.set(2.0);

        assert_eq!(a_hits.load(Ordering::SeqCst), 1);
        assert_eq!(b_hits.load(Ordering::SeqCst), 2);
    }
}
