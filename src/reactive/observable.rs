//! Observable value slot.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

/// Callback invoked with every published value.
pub type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A single mutable slot that notifies subscribers on every `set`.
///
/// New subscribers immediately receive the current value, if any.
/// Clones share the same slot.
pub struct Observable<T> {
    slot: Arc<Slot<T>>,
}

struct Slot<T> {
    state: Mutex<SlotState<T>>,
    next_id: AtomicU64,
}

struct SlotState<T> {
    value: Option<T>,
    subscribers: Vec<(u64, Callback<T>)>,
}

impl<T> Slot<T> {
    fn remove(&self, id: u64) {
        self.state.lock().subscribers.retain(|(sub_id, _)| *sub_id != id);
    }
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> AsRef<Observable<T>> for Observable<T> {
    fn as_ref(&self) -> &Observable<T> {
        self
    }
}

impl<T: Clone + Send + Sync + 'static> Observable<T> {
    /// Empty slot; subscribers get nothing until the first `set`.
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Slot {
                state: Mutex::new(SlotState {
                    value: None,
                    subscribers: Vec::new(),
                }),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    pub fn with_value(value: T) -> Self {
        let observable = Self::new();
        observable.slot.state.lock().value = Some(value);
        observable
    }

    pub fn get(&self) -> Option<T> {
        self.slot.state.lock().value.clone()
    }

    pub fn has_value(&self) -> bool {
        self.slot.state.lock().value.is_some()
    }

    /// Store `value` and notify every current subscriber synchronously.
    ///
    /// Callbacks run outside the slot lock, so they may read or set this
    /// observable again.
    pub fn set(&self, value: T) {
        let subscribers: Vec<Callback<T>> = {
            let mut state = self.slot.state.lock();
            state.value = Some(value.clone());
            state.subscribers.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };
        for callback in subscribers {
            callback(&value);
        }
    }

    /// `set` only when the value differs from the current one.
    ///
    /// Returns whether subscribers were notified.
    pub fn set_if_changed(&self, value: T) -> bool
    where
        T: PartialEq,
    {
        if self.slot.state.lock().value.as_ref() == Some(&value) {
            return false;
        }
        self.set(value);
        true
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.subscribe_callback(Arc::new(callback))
    }

    /// Register `callback` and replay the current value to it.
    pub fn subscribe_callback(&self, callback: Callback<T>) -> Subscription {
        let id = self.slot.next_id.fetch_add(1, Ordering::Relaxed);
        let current = {
            let mut state = self.slot.state.lock();
            state.subscribers.push((id, Arc::clone(&callback)));
            state.value.clone()
        };
        if let Some(value) = current {
            callback(&value);
        }

        let slot: Weak<Slot<T>> = Arc::downgrade(&self.slot);
        Subscription::new(move || {
            if let Some(slot) = slot.upgrade() {
                slot.remove(id);
            }
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.slot.state.lock().subscribers.len()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.slot.state.lock().value)
            .finish()
    }
}

/// Registration handle; dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub(crate) fn new(unsubscribe: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    pub fn dispose(mut self) {
        self.cancel();
    }

    fn cancel(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}
