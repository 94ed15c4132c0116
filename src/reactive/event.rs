//! One-shot event payloads.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::observable::{Observable, Subscription};

/// A payload that can be consumed at most once.
///
/// Observables replay their last value to new subscribers; wrapping
/// actions such as "navigate" or "show message" in an `Event` keeps a
/// re-attached subscriber from firing them again. Clones share the
/// consumed flag.
#[derive(Clone)]
pub struct Event<T> {
    payload: T,
    consumed: Arc<AtomicBool>,
}

impl<T> Event<T> {
    pub fn new(payload: T) -> Self {
        Self {
            payload,
            consumed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns the payload the first time only.
    pub fn consume(&self) -> Option<T>
    where
        T: Clone,
    {
        self.consumed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| self.payload.clone())
    }

    /// Look at the payload without consuming it.
    pub fn peek(&self) -> &T {
        &self.payload
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed.load(Ordering::Acquire)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Event<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event")
            .field("payload", &self.payload)
            .field("consumed", &self.is_consumed())
            .finish()
    }
}

impl<T: Clone + Send + Sync + 'static> Observable<Event<T>> {
    /// Publish a fresh, unconsumed event.
    pub fn fire(&self, payload: T) {
        self.set(Event::new(payload));
    }

    /// Subscribe and run `handler` for every event not yet consumed.
    pub fn on_event<F>(&self, handler: F) -> Subscription
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        self.subscribe(move |event: &Event<T>| {
            if let Some(payload) = event.consume() {
                handler(payload);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    #[test]
    fn consume_returns_payload_once() {
        let event = Event::new("go");
        assert_eq!(event.consume(), Some("go"));
        assert_eq!(event.consume(), None);
        assert_eq!(event.consume(), None);
        assert!(event.is_consumed());
    }

    #[test]
    fn clones_share_consumed_flag() {
        let event = Event::new(7);
        let copy = event.clone();
        assert_eq!(copy.consume(), Some(7));
        assert_eq!(event.consume(), None);
        assert_eq!(*event.peek(), 7);
    }

    #[test]
    fn replay_to_new_subscriber_does_not_refire() {
        let events: Observable<Event<u32>> = Observable::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&fired);
        let first = events.on_event(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        events.fire(1);
        drop(first);

        // Re-attach: the last value is replayed but already consumed.
        let counter = Arc::clone(&fired);
        let _second = events.on_event(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn concurrent_consumers_get_one_payload() {
        let event = Event::new(42);
        let winners = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let event = event.clone();
                let winners = Arc::clone(&winners);
                thread::spawn(move || {
                    if event.consume().is_some() {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(winners.load(Ordering::SeqCst), 1);
    }
}
