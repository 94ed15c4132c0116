//! Data model shared by every screen.

mod change;
mod image;
mod post;
mod user;
pub mod validation;

pub use change::ChangeRecord;
pub use image::{
    scale_to_width, AuthHeaders, DisplayMetrics, ImageDescriptor, ImageSize, HEADER_ACCESS_TOKEN,
    HEADER_API_KEY, HEADER_USER_ID,
};
pub use post::{FeedPage, Post, PostDraft, PostSummary};
pub use user::{AccessToken, Profile, ProfileUpdate, User, UserSummary};
pub use validation::{Field, FieldStatus, Validation, ValidationFailure};
