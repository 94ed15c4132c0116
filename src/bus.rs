//! Cross-screen notification bus.
//!
//! One bus lives in the application context and is handed to every
//! screen. Records are delivered synchronously, in registration order,
//! and only to subscribers registered before the record is dispatched.
//! Nothing is replayed.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::model::ChangeRecord;
use crate::reactive::Disposable;

type BusCallback = Arc<dyn Fn(&ChangeRecord) + Send + Sync>;

/// Identity of one bus subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

#[derive(Clone)]
pub struct NotificationBus {
    inner: Arc<BusInner>,
}

struct BusInner {
    state: Mutex<BusState>,
    next_id: AtomicU64,
}

#[derive(Default)]
struct BusState {
    subscribers: Vec<(SubscriberId, BusCallback)>,
    /// Records waiting behind the one currently being delivered.
    pending: VecDeque<(Option<SubscriberId>, ChangeRecord)>,
    delivering: bool,
}

impl BusInner {
    fn remove(&self, id: SubscriberId) {
        self.state.lock().subscribers.retain(|(sub_id, _)| *sub_id != id);
    }
}

impl NotificationBus {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BusInner {
                state: Mutex::new(BusState::default()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    pub fn subscribe<F>(&self, callback: F) -> BusSubscription
    where
        F: Fn(&ChangeRecord) + Send + Sync + 'static,
    {
        let id = SubscriberId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        self.inner
            .state
            .lock()
            .subscribers
            .push((id, Arc::new(callback)));
        tracing::trace!(subscriber = id.0, "bus subscriber registered");
        BusSubscription {
            id,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver `record` to every subscriber.
    pub fn publish(&self, record: ChangeRecord) {
        self.dispatch(None, record);
    }

    /// Deliver `record` to every subscriber except `origin`.
    ///
    /// The originating screen has already applied the change to its own
    /// state.
    pub fn publish_from(&self, origin: SubscriberId, record: ChangeRecord) {
        self.dispatch(Some(origin), record);
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.state.lock().subscribers.len()
    }

    fn dispatch(&self, origin: Option<SubscriberId>, record: ChangeRecord) {
        {
            let mut state = self.inner.state.lock();
            state.pending.push_back((origin, record));
            if state.delivering {
                // Published from inside a callback: the outer loop delivers it next.
                return;
            }
            state.delivering = true;
        }

        let inner = Arc::clone(&self.inner);
        let _reset_on_panic = scopeguard::guard_on_unwind((), move |_| {
            inner.state.lock().delivering = false;
        });

        loop {
            let (origin, record, subscribers) = {
                let mut state = self.inner.state.lock();
                match state.pending.pop_front() {
                    Some((origin, record)) => (origin, record, state.subscribers.clone()),
                    None => {
                        state.delivering = false;
                        return;
                    }
                }
            };
            tracing::debug!(
                kind = record.kind(),
                subscribers = subscribers.len(),
                "bus delivering change record"
            );
            for (id, callback) in subscribers {
                if Some(id) == origin {
                    continue;
                }
                callback(&record);
            }
        }
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Bus registration; dropping it unsubscribes.
#[must_use = "dropping a BusSubscription unsubscribes immediately"]
pub struct BusSubscription {
    id: SubscriberId,
    bus: Weak<BusInner>,
}

impl BusSubscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn unsubscribe(self) {}
}

impl Drop for BusSubscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.remove(self.id);
            tracing::trace!(subscriber = self.id.0, "bus subscriber removed");
        }
    }
}

impl Disposable for BusSubscription {}
