use crate::ui::mvi::UiState;
use crate::ui::UserMessage;

/// Fetch lifecycle of a screen.
///
/// `Idle → Loading → {Loaded, Failed}`; both end states re-enter
/// `Loading` on refresh.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed {
        message: UserMessage,
    },
}

impl UiState for LoadState {}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}
