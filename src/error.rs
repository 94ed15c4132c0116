//! Failures of screen actions.

use thiserror::Error;

use crate::services::RepositoryError;
use crate::ui::UserMessage;

/// Why a screen action did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Pre-flight connectivity check failed; nothing was sent.
    #[error("No network connection")]
    NoConnectivity,

    #[error("No user is signed in")]
    NotSignedIn,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ActionError {
    /// Message shown on the screen for this error.
    pub fn user_message(&self) -> UserMessage {
        match self {
            ActionError::NoConnectivity => UserMessage::NoConnectivity,
            ActionError::NotSignedIn | ActionError::Repository(RepositoryError::Unauthorized) => {
                UserMessage::SessionExpired
            }
            ActionError::Repository(RepositoryError::Connection { .. }) => {
                UserMessage::ServerUnreachable
            }
            ActionError::Repository(RepositoryError::Server { status, message }) => {
                UserMessage::ServerError {
                    status: *status,
                    message: message.clone(),
                }
            }
        }
    }

    /// Short tag used in logs.
    pub fn error_type(&self) -> &'static str {
        match self {
            ActionError::NoConnectivity => "no_connectivity",
            ActionError::NotSignedIn => "not_signed_in",
            ActionError::Repository(error) => error.error_type(),
        }
    }

    /// The session is gone and the user must sign in again.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ActionError::Repository(RepositoryError::Unauthorized))
    }
}
