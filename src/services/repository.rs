//! Remote data access, as seen by the view-state core.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{FeedPage, Post, PostDraft, PostSummary, Profile, ProfileUpdate, User};

/// Failures surfaced by a repository call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The server could not be reached.
    #[error("Connection failed: {reason}")]
    Connection { reason: String },

    /// The session is no longer valid.
    #[error("Unauthorized")]
    Unauthorized,

    /// The server answered with an error status.
    #[error("Server error: {status} - {message}")]
    Server { status: u16, message: String },
}

impl RepositoryError {
    /// Short tag used in logs.
    pub fn error_type(&self) -> &'static str {
        match self {
            RepositoryError::Connection { .. } => "connection_error",
            RepositoryError::Unauthorized => "unauthorized",
            RepositoryError::Server { .. } => "server_error",
        }
    }
}

/// Every remote operation a screen may issue.
///
/// Implementations own transport, retries and timeouts.
#[async_trait]
pub trait Repository: Send + Sync {
    async fn fetch_profile(&self, user: &User) -> Result<Profile, RepositoryError>;

    /// The signed-in user's own posts, as summaries.
    async fn fetch_post_list(&self, user: &User) -> Result<Vec<PostSummary>, RepositoryError>;

    async fn fetch_post_detail(
        &self,
        summary: &PostSummary,
        user: &User,
    ) -> Result<Post, RepositoryError>;

    /// One page of the home feed.
    async fn fetch_feed(&self, user: &User, page: &FeedPage) -> Result<Vec<Post>, RepositoryError>;

    /// Returns the post with the updated liker set.
    async fn like_post(&self, post: &Post, user: &User) -> Result<Post, RepositoryError>;

    /// Returns the post with the updated liker set.
    async fn unlike_post(&self, post: &Post, user: &User) -> Result<Post, RepositoryError>;

    async fn delete_post(&self, post: &Post, user: &User) -> Result<bool, RepositoryError>;

    async fn create_post(&self, draft: &PostDraft, user: &User) -> Result<Post, RepositoryError>;

    async fn update_profile(
        &self,
        user: &User,
        update: &ProfileUpdate,
    ) -> Result<Profile, RepositoryError>;

    async fn signup(&self, email: &str, password: &str, name: &str) -> Result<User, RepositoryError>;

    async fn logout(&self, user: &User) -> Result<bool, RepositoryError>;
}
