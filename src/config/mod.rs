//! Client configuration: file layout, loading and a shared store.

mod loader;
mod store;
mod types;

pub use loader::ConfigError;
pub use store::ConfigStore;
pub use types::{ApiConfig, ClientConfig, DisplayConfig, LoggingConfig};
