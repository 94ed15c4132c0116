//! Application-lifetime context handed to every screen.

use std::sync::Arc;

use crate::bus::NotificationBus;
use crate::config::{ClientConfig, ConfigStore};
use crate::model::{AuthHeaders, DisplayMetrics, User};
use crate::services::{CredentialStore, NetworkStatus, Repository};
use crate::ui::UiHandle;

/// External collaborators.
pub struct Services {
    pub repository: Arc<dyn Repository>,
    pub network: Arc<dyn NetworkStatus>,
    pub credentials: Arc<dyn CredentialStore>,
}

/// Owns the one notification bus and the collaborators. Clones share
/// everything.
#[derive(Clone)]
pub struct AppContext {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    config: ConfigStore,
    bus: NotificationBus,
    ui: UiHandle,
    services: Services,
}

impl AppContext {
    pub fn new(config: ConfigStore, ui: UiHandle, services: Services) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                config,
                bus: NotificationBus::new(),
                ui,
                services,
            }),
        }
    }

    pub fn config(&self) -> ClientConfig {
        self.inner.config.get()
    }

    pub fn config_store(&self) -> &ConfigStore {
        &self.inner.config
    }

    pub fn bus(&self) -> &NotificationBus {
        &self.inner.bus
    }

    pub fn ui(&self) -> &UiHandle {
        &self.inner.ui
    }

    pub fn repository(&self) -> Arc<dyn Repository> {
        Arc::clone(&self.inner.services.repository)
    }

    pub fn network(&self) -> &dyn NetworkStatus {
        self.inner.services.network.as_ref()
    }

    pub fn credentials(&self) -> &dyn CredentialStore {
        self.inner.services.credentials.as_ref()
    }

    pub fn current_user(&self) -> Option<User> {
        self.credentials().current_user()
    }

    pub fn display(&self) -> DisplayMetrics {
        self.inner.config.get().display.metrics()
    }

    /// Headers every image request for `user` must carry.
    pub fn image_headers(&self, user: &User) -> AuthHeaders {
        AuthHeaders::new(&self.inner.config.get().api.api_key, user)
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("config", &self.inner.config)
            .field("bus", &self.inner.bus)
            .finish()
    }
}
