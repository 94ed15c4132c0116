use crate::ui::load::intent::LoadIntent;
use crate::ui::load::state::LoadState;
use crate::ui::mvi::Reducer;

pub struct LoadReducer;

impl Reducer for LoadReducer {
    type State = LoadState;
    type Intent = LoadIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match (state, intent) {
            (_, LoadIntent::Start) => LoadState::Loading,
            (LoadState::Loading, LoadIntent::Succeed) => LoadState::Loaded,
            (LoadState::Loading, LoadIntent::Fail { message }) => LoadState::Failed { message },
            // Completion with nothing in flight: keep the current state.
            (state, _) => state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::UserMessage;

    #[test]
    fn happy_path() {
        let state = LoadReducer::reduce(LoadState::Idle, LoadIntent::Start);
        assert!(state.is_loading());
        let state = LoadReducer::reduce(state, LoadIntent::Succeed);
        assert_eq!(state, LoadState::Loaded);
    }

    #[test]
    fn failure_keeps_message_and_clears_loading() {
        let state = LoadReducer::reduce(
            LoadState::Loading,
            LoadIntent::Fail {
                message: UserMessage::ServerUnreachable,
            },
        );
        assert!(!state.is_loading());
        assert_eq!(
            state,
            LoadState::Failed {
                message: UserMessage::ServerUnreachable
            }
        );
    }

    #[test]
    fn end_states_reenter_loading_on_refresh() {
        let failed = LoadState::Failed {
            message: UserMessage::NoConnectivity,
        };
        assert!(LoadReducer::reduce(failed, LoadIntent::Start).is_loading());
        assert!(LoadReducer::reduce(LoadState::Loaded, LoadIntent::Start).is_loading());
    }

    #[test]
    fn stray_completion_is_ignored() {
        assert_eq!(
            LoadReducer::reduce(LoadState::Idle, LoadIntent::Succeed),
            LoadState::Idle
        );
        assert_eq!(
            LoadReducer::reduce(
                LoadState::Loaded,
                LoadIntent::Fail {
                    message: UserMessage::NoConnectivity
                }
            ),
            LoadState::Loaded
        );
    }
}
