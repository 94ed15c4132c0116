//! Base trait for intents.

/// Marker trait for intent objects.
///
/// Intents represent:
/// - User actions (like, delete, refresh)
/// - Repository completions
/// - Change records received from the notification bus
pub trait Intent: Send + 'static {}
