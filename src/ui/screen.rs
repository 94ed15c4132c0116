//! Plumbing every screen view-state composes.

use std::future::Future;
use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use crate::context::AppContext;
use crate::error::ActionError;
use crate::model::User;
use crate::reactive::{Disposable, Disposables, Event, Observable};
use crate::ui::UserMessage;

/// Message slot, forced-logout signal and in-flight work of one screen.
///
/// Clones share state. Teardown (explicit, or when the last clone is
/// dropped) cancels in-flight calls and drops their pending completions.
#[derive(Clone)]
pub struct ScreenCore {
    inner: Arc<CoreInner>,
}

struct CoreInner {
    name: &'static str,
    row: bool,
    context: AppContext,
    messages: Observable<Event<UserMessage>>,
    forced_logout: Observable<Event<()>>,
    disposables: Disposables,
}

impl ScreenCore {
    pub fn new(name: &'static str, context: AppContext) -> Self {
        tracing::info!(screen = name, "screen created");
        Self::build(name, false, context)
    }

    /// Core for a list row. Rows come and go with scrolling, so their
    /// lifecycle is logged at trace level.
    pub fn for_row(name: &'static str, context: AppContext) -> Self {
        tracing::trace!(screen = name, "row created");
        Self::build(name, true, context)
    }

    fn build(name: &'static str, row: bool, context: AppContext) -> Self {
        Self {
            inner: Arc::new(CoreInner {
                name,
                row,
                context,
                messages: Observable::new(),
                forced_logout: Observable::new(),
                disposables: Disposables::new(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    pub fn context(&self) -> &AppContext {
        &self.inner.context
    }

    pub fn messages(&self) -> &Observable<Event<UserMessage>> {
        &self.inner.messages
    }

    /// Fires when the server rejected the session.
    pub fn forced_logout(&self) -> &Observable<Event<()>> {
        &self.inner.forced_logout
    }

    pub fn show_message(&self, message: UserMessage) {
        self.inner.messages.fire(message);
    }

    pub fn require_user(&self) -> Result<User, ActionError> {
        self.inner
            .context
            .current_user()
            .ok_or(ActionError::NotSignedIn)
    }

    pub fn ensure_connected(&self) -> Result<(), ActionError> {
        if self.inner.context.network().is_connected() {
            Ok(())
        } else {
            Err(ActionError::NoConnectivity)
        }
    }

    /// Connectivity and sign-in check run before every mutating call.
    pub fn precheck(&self) -> Result<User, ActionError> {
        self.ensure_connected()?;
        self.require_user()
    }

    /// Surface `error` on this screen.
    ///
    /// An unauthorized error also signs the user out.
    pub fn report(&self, error: &ActionError) {
        tracing::warn!(
            screen = self.inner.name,
            error_type = error.error_type(),
            error = %error,
            "action failed"
        );
        if error.is_unauthorized() {
            self.inner.context.credentials().remove_current_user();
            self.inner.forced_logout.fire(());
        }
        self.show_message(error.user_message());
    }

    /// Keep `entry` alive until teardown.
    pub fn track(&self, entry: impl Disposable) {
        self.inner.disposables.add(entry);
    }

    pub fn is_alive(&self) -> bool {
        self.inner.disposables.is_alive()
    }

    /// Run `future` on a worker and deliver its output to `on_complete` on
    /// the UI loop, unless the screen was torn down in between.
    pub fn launch<F, T, C>(&self, operation: &'static str, future: F, on_complete: C)
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
        C: FnOnce(T) + Send + 'static,
    {
        let screen = self.inner.name;
        let request_id = Uuid::new_v4();
        let span = tracing::debug_span!("repository_call", screen, operation, %request_id);
        let alive = self.inner.disposables.token();

        let handle = self
            .inner
            .context
            .ui()
            .spawn(future.instrument(span), move |output| {
                if alive.is_alive() {
                    on_complete(output);
                } else {
                    tracing::debug!(screen, operation, %request_id, "dropping completion of torn-down screen");
                }
            });
        self.inner.disposables.add(handle);
    }

    /// Cancel everything in flight and release every subscription.
    pub fn teardown(&self) {
        if self.inner.disposables.is_alive() {
            if self.inner.row {
                tracing::trace!(screen = self.inner.name, "row torn down");
            } else {
                tracing::info!(screen = self.inner.name, "screen torn down");
            }
        }
        self.inner.disposables.dispose();
    }
}

impl std::fmt::Debug for ScreenCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenCore")
            .field("name", &self.inner.name)
            .field("alive", &self.is_alive())
            .finish()
    }
}
