//! Bulk disposal of subscriptions and in-flight work.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use super::observable::Subscription;

/// Anything a screen must release on teardown.
///
/// Implementors release their resource when dropped.
pub trait Disposable: Send + 'static {
    /// Already finished; safe to forget early.
    fn is_spent(&self) -> bool {
        false
    }
}

impl Disposable for Subscription {}

/// Liveness flag of a [`Disposables`] container.
#[derive(Clone, Debug)]
pub struct AliveToken(Arc<AtomicBool>);

impl AliveToken {
    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Holds everything a screen owns and releases it all at once.
///
/// After `dispose`, newly added entries are released immediately and
/// every [`AliveToken`] reports dead.
pub struct Disposables {
    alive: Arc<AtomicBool>,
    entries: Mutex<Vec<Box<dyn Disposable>>>,
}

impl Disposables {
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn add(&self, entry: impl Disposable) {
        if !self.is_alive() {
            drop(entry);
            return;
        }
        let mut entries = self.entries.lock();
        entries.retain(|existing| !existing.is_spent());
        entries.push(Box::new(entry));
    }

    pub fn token(&self) -> AliveToken {
        AliveToken(Arc::clone(&self.alive))
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Release every entry. Idempotent.
    pub fn dispose(&self) {
        self.alive.store(false, Ordering::Release);
        let entries = std::mem::take(&mut *self.entries.lock());
        drop(entries);
    }
}

impl Default for Disposables {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Disposables {
    fn drop(&mut self) {
        self.dispose();
    }
}
