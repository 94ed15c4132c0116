//! Change records broadcast between screens.

use super::post::Post;

/// A cross-screen-relevant change.
///
/// Each variant carries enough data for a subscriber to patch its own
/// collection without fetching again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeRecord {
    /// A post was created; it is the newest post.
    NewPost(Post),
    /// A post's liker set changed; carries the updated post.
    LikeToggled(Post),
    /// A post was deleted.
    Deleted { post_id: String },
    /// A user changed their display name.
    NameChanged { user_id: String, name: String },
    /// A user changed their profile picture.
    ProfileImageChanged {
        user_id: String,
        profile_pic_url: String,
    },
}

impl ChangeRecord {
    /// Short tag used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ChangeRecord::NewPost(_) => "new_post",
            ChangeRecord::LikeToggled(_) => "like_toggled",
            ChangeRecord::Deleted { .. } => "deleted",
            ChangeRecord::NameChanged { .. } => "name_changed",
            ChangeRecord::ProfileImageChanged { .. } => "profile_image_changed",
        }
    }
}
