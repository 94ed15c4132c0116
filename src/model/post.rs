//! Post value objects.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use super::user::UserSummary;

/// A photo post.
///
/// Posts are values: every change produces a new `Post`. Several screens
/// hold independent copies, so replacing (not mutating) is what lets
/// their derived state recompute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub image_url: String,
    #[serde(default)]
    pub image_width: Option<u32>,
    #[serde(default)]
    pub image_height: Option<u32>,
    pub creator: UserSummary,
    /// Users who liked the post. Order is irrelevant, membership is by id.
    #[serde(default)]
    pub liked_by: Vec<UserSummary>,
    pub created_at: SystemTime,
}

impl Post {
    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.liked_by.iter().any(|liker| liker.id == user_id)
    }

    pub fn likes_count(&self) -> usize {
        self.liked_by.len()
    }

    /// Copy with `liker` added to the liker set (no-op if already present).
    pub fn with_liker(&self, liker: UserSummary) -> Post {
        let mut post = self.clone();
        if !post.is_liked_by(&liker.id) {
            post.liked_by.push(liker);
        }
        post
    }

    /// Copy with the liker identified by `user_id` removed.
    pub fn without_liker(&self, user_id: &str) -> Post {
        let mut post = self.clone();
        post.liked_by.retain(|liker| liker.id != user_id);
        post
    }

    pub fn with_creator_name(&self, name: &str) -> Post {
        let mut post = self.clone();
        post.creator.name = name.to_string();
        post
    }

    pub fn with_creator_profile_pic(&self, url: &str) -> Post {
        let mut post = self.clone();
        post.creator.profile_pic_url = Some(url.to_string());
        post
    }

    pub fn summary(&self) -> PostSummary {
        PostSummary {
            id: self.id.clone(),
            image_url: self.image_url.clone(),
            created_at: self.created_at,
        }
    }
}

/// Lightweight entry of the signed-in user's post list; the full post is
/// fetched per entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: String,
    pub image_url: String,
    pub created_at: SystemTime,
}

/// Data for a post about to be created from an uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    pub image_url: String,
    pub image_width: Option<u32>,
    pub image_height: Option<u32>,
}

/// Page cursor for the home feed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeedPage {
    pub first_post_id: Option<String>,
    pub last_post_id: Option<String>,
}
