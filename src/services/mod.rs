//! Collaborators the core calls through narrow interfaces.

mod credentials;
mod memory;
mod network;
mod repository;

pub use credentials::{CredentialStore, InMemoryCredentialStore};
pub use memory::{InMemoryRepository, Operation};
pub use network::{NetworkStatus, StaticNetwork};
pub use repository::{Repository, RepositoryError};
