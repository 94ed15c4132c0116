//! Base trait for view state.

/// Marker trait for state snapshots.
///
/// States should be:
/// - Immutable (Clone to create new states)
/// - Comparable (PartialEq, so unchanged results do not notify)
/// - Shareable (held in an observable read from worker callbacks)
pub trait UiState: Clone + PartialEq + Default + Send + Sync + 'static {}
