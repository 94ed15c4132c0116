//! Connectivity check queried before every mutating call.

use std::sync::atomic::{AtomicBool, Ordering};

pub trait NetworkStatus: Send + Sync {
    fn is_connected(&self) -> bool;
}

/// Connectivity flag set by whoever watches the platform network state.
#[derive(Debug)]
pub struct StaticNetwork {
    connected: AtomicBool,
}

impl StaticNetwork {
    pub fn new(connected: bool) -> Self {
        Self {
            connected: AtomicBool::new(connected),
        }
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }
}

impl NetworkStatus for StaticNetwork {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
