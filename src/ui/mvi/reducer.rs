//! Reducer trait and dispatch into an observable.

use super::intent::Intent;
use super::state::UiState;
use crate::reactive::Observable;

/// Reducer transforms state based on intents.
///
/// The reducer is the only place where state transitions happen.
/// It must be a pure function: (State, Intent) -> State
pub trait Reducer {
    /// The state type this reducer operates on.
    type State: UiState;

    /// The intent type this reducer handles.
    type Intent: Intent;

    /// Process an intent and return the new state.
    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}

/// Reduce the current value of `state` with `intent` and publish the
/// result if it differs. An empty slot reduces from `State::default()`.
///
/// Returns whether subscribers were notified.
pub fn dispatch<R: Reducer>(state: &Observable<R::State>, intent: R::Intent) -> bool {
    let current = state.get().unwrap_or_default();
    state.set_if_changed(R::reduce(current, intent))
}
