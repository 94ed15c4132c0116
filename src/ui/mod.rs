//! Screen and row view-states.
//!
//! Every screen composes a [`ScreenCore`] for its message slot and
//! in-flight work, keeps its state in observables and reaches other
//! screens only through the notification bus in the [`AppContext`].
//!
//! [`AppContext`]: crate::context::AppContext

pub mod edit_profile;
pub mod feed;
pub mod format;
pub mod load;
mod message;
pub mod mvi;
pub mod photo;
pub mod post_item;
pub mod post_list;
pub mod profile;
pub mod runtime;
pub mod screen;
pub mod signup;

pub use edit_profile::EditProfileViewState;
pub use feed::FeedViewState;
pub use message::UserMessage;
pub use photo::PhotoViewState;
pub use post_item::{PostActions, PostItemViewState};
pub use profile::ProfileViewState;
pub use runtime::{TaskHandle, UiHandle, UiLoop};
pub use screen::ScreenCore;
pub use signup::SignupViewState;
