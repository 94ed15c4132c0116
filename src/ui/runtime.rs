//! UI loop and worker dispatch.
//!
//! Observable state is only touched from the thread that drives the
//! [`UiLoop`]. Repository calls run as tokio tasks; their completions are
//! queued back onto the loop through a [`UiHandle`].

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;

use crate::reactive::Disposable;

type UiTask = Box<dyn FnOnce() + Send>;

/// Receiving end of the UI queue. Owned by the UI thread.
pub struct UiLoop {
    rx: mpsc::UnboundedReceiver<UiTask>,
    handle: UiHandle,
}

/// Cloneable handle for posting work to the UI loop and spawning workers.
#[derive(Clone)]
pub struct UiHandle {
    tx: mpsc::UnboundedSender<UiTask>,
    in_flight: Arc<AtomicUsize>,
    idle: Arc<Notify>,
}

impl UiLoop {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            rx,
            handle: UiHandle {
                tx,
                in_flight: Arc::new(AtomicUsize::new(0)),
                idle: Arc::new(Notify::new()),
            },
        }
    }

    pub fn handle(&self) -> UiHandle {
        self.handle.clone()
    }

    /// Run every task already queued. Returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            task();
            ran += 1;
        }
        ran
    }

    /// Run queued tasks until no worker is in flight and the queue is empty.
    ///
    /// Completions spawned by completions are waited for as well.
    pub async fn run_until_idle(&mut self) {
        loop {
            self.run_pending();

            if self.handle.in_flight() == 0 {
                // Workers enqueue before they stop counting as in flight,
                // so this drains any straggler.
                if self.run_pending() == 0 {
                    return;
                }
                continue;
            }

            // Register for the idle notification before re-checking the
            // counter so a worker finishing in between is not missed.
            let idle = self.handle.idle.notified();
            tokio::pin!(idle);
            idle.as_mut().enable();
            if self.handle.in_flight() == 0 {
                continue;
            }

            tokio::select! {
                Some(task) = self.rx.recv() => task(),
                _ = &mut idle => {}
            }
        }
    }
}

impl Default for UiLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl UiHandle {
    /// Queue `task` to run on the UI loop.
    pub fn post(&self, task: impl FnOnce() + Send + 'static) {
        if self.tx.send(Box::new(task)).is_err() {
            tracing::trace!("UI task dropped (loop gone)");
        }
    }

    /// Run `future` on a worker and hand its output to `on_complete` on
    /// the UI loop.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F, T, C>(&self, future: F, on_complete: C) -> TaskHandle
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
        C: FnOnce(T) + Send + 'static,
    {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let ui = self.clone();
        // Counts the task as finished whether it completes, is aborted
        // mid-flight or is dropped before its first poll.
        let finished = scopeguard::guard(self.clone(), |tracker| tracker.finish_one());
        let join = tokio::spawn(async move {
            let _finished = finished;
            let output = future.await;
            ui.post(move || on_complete(output));
        });
        TaskHandle { join }
    }

    /// Workers spawned and not yet finished.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    fn finish_one(&self) {
        if self.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.idle.notify_waiters();
        }
    }
}

/// Cancellable handle of one in-flight worker. Dropping it aborts the worker.
#[derive(Debug)]
pub struct TaskHandle {
    join: JoinHandle<()>,
}

impl TaskHandle {
    pub fn abort(&self) {
        self.join.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.join.abort();
    }
}

impl Disposable for TaskHandle {
    fn is_spent(&self) -> bool {
        self.is_finished()
    }
}
