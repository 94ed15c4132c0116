//! In-memory repository.
//!
//! Behaves like a tiny server: it keeps posts and profiles, applies likes
//! and deletes, and can be scripted to fail or stall per operation. Used
//! by the `simulate` command and the tests.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::model::{
    AccessToken, FeedPage, Post, PostDraft, PostSummary, Profile, ProfileUpdate, User,
};
use crate::services::repository::{Repository, RepositoryError};

const DEFAULT_PAGE_SIZE: usize = 10;

/// Repository operations, for scripting and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    FetchProfile,
    FetchPostList,
    FetchPostDetail,
    FetchFeed,
    LikePost,
    UnlikePost,
    DeletePost,
    CreatePost,
    UpdateProfile,
    Signup,
    Logout,
}

pub struct InMemoryRepository {
    state: Mutex<MemoryState>,
    page_size: usize,
}

#[derive(Default)]
struct MemoryState {
    profiles: HashMap<String, Profile>,
    posts: Vec<Post>,
    failures: HashMap<Operation, RepositoryError>,
    failing_details: HashMap<String, RepositoryError>,
    delays: HashMap<Operation, VecDeque<Duration>>,
    calls: HashMap<Operation, usize>,
}

fn not_found(what: &str) -> RepositoryError {
    RepositoryError::Server {
        status: 404,
        message: format!("{} not found", what),
    }
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn insert_profile(&self, profile: Profile) {
        self.state.lock().profiles.insert(profile.id.clone(), profile);
    }

    pub fn insert_post(&self, post: Post) {
        self.state.lock().posts.push(post);
    }

    pub fn stored_post(&self, post_id: &str) -> Option<Post> {
        self.state
            .lock()
            .posts
            .iter()
            .find(|post| post.id == post_id)
            .cloned()
    }

    /// Make every call of `operation` fail with `error` until cleared.
    pub fn fail(&self, operation: Operation, error: RepositoryError) {
        self.state.lock().failures.insert(operation, error);
    }

    pub fn clear_failure(&self, operation: Operation) {
        self.state.lock().failures.remove(&operation);
    }

    /// Make detail fetches of one post fail.
    pub fn fail_post_detail(&self, post_id: &str, error: RepositoryError) {
        self.state
            .lock()
            .failing_details
            .insert(post_id.to_string(), error);
    }

    /// Delay the next call of `operation` by `delay`. Queued delays are
    /// consumed one per call.
    pub fn queue_delay(&self, operation: Operation, delay: Duration) {
        self.state
            .lock()
            .delays
            .entry(operation)
            .or_default()
            .push_back(delay);
    }

    pub fn call_count(&self, operation: Operation) -> usize {
        self.state.lock().calls.get(&operation).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.state.lock().calls.values().sum()
    }

    /// Count the call, apply any queued delay and scripted failure.
    async fn enter(&self, operation: Operation) -> Result<(), RepositoryError> {
        let (delay, failure) = {
            let mut state = self.state.lock();
            *state.calls.entry(operation).or_insert(0) += 1;
            let delay = state
                .delays
                .get_mut(&operation)
                .and_then(|queue| queue.pop_front());
            (delay, state.failures.get(&operation).cloned())
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn update_post(
        &self,
        post_id: &str,
        change: impl FnOnce(&Post) -> Post,
    ) -> Result<Post, RepositoryError> {
        let mut state = self.state.lock();
        let stored = state
            .posts
            .iter_mut()
            .find(|post| post.id == post_id)
            .ok_or_else(|| not_found("post"))?;
        *stored = change(stored);
        Ok(stored.clone())
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn fetch_profile(&self, user: &User) -> Result<Profile, RepositoryError> {
        self.enter(Operation::FetchProfile).await?;
        self.state
            .lock()
            .profiles
            .get(&user.id)
            .cloned()
            .ok_or_else(|| not_found("profile"))
    }

    async fn fetch_post_list(&self, user: &User) -> Result<Vec<PostSummary>, RepositoryError> {
        self.enter(Operation::FetchPostList).await?;
        Ok(self
            .state
            .lock()
            .posts
            .iter()
            .filter(|post| post.creator.id == user.id)
            .map(Post::summary)
            .collect())
    }

    async fn fetch_post_detail(
        &self,
        summary: &PostSummary,
        _user: &User,
    ) -> Result<Post, RepositoryError> {
        self.enter(Operation::FetchPostDetail).await?;
        let state = self.state.lock();
        if let Some(error) = state.failing_details.get(&summary.id) {
            return Err(error.clone());
        }
        state
            .posts
            .iter()
            .find(|post| post.id == summary.id)
            .cloned()
            .ok_or_else(|| not_found("post"))
    }

    async fn fetch_feed(&self, _user: &User, page: &FeedPage) -> Result<Vec<Post>, RepositoryError> {
        self.enter(Operation::FetchFeed).await?;
        let mut posts = self.state.lock().posts.clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let start = match &page.last_post_id {
            Some(last) => posts
                .iter()
                .position(|post| &post.id == last)
                .map(|index| index + 1)
                .unwrap_or(posts.len()),
            None => 0,
        };
        Ok(posts.into_iter().skip(start).take(self.page_size).collect())
    }

    async fn like_post(&self, post: &Post, user: &User) -> Result<Post, RepositoryError> {
        self.enter(Operation::LikePost).await?;
        let liker = user.summary();
        self.update_post(&post.id, |stored| stored.with_liker(liker))
    }

    async fn unlike_post(&self, post: &Post, user: &User) -> Result<Post, RepositoryError> {
        self.enter(Operation::UnlikePost).await?;
        self.update_post(&post.id, |stored| stored.without_liker(&user.id))
    }

    async fn delete_post(&self, post: &Post, _user: &User) -> Result<bool, RepositoryError> {
        self.enter(Operation::DeletePost).await?;
        let mut state = self.state.lock();
        let before = state.posts.len();
        state.posts.retain(|stored| stored.id != post.id);
        Ok(state.posts.len() < before)
    }

    async fn create_post(&self, draft: &PostDraft, user: &User) -> Result<Post, RepositoryError> {
        self.enter(Operation::CreatePost).await?;
        let post = Post {
            id: Uuid::new_v4().to_string(),
            image_url: draft.image_url.clone(),
            image_width: draft.image_width,
            image_height: draft.image_height,
            creator: user.summary(),
            liked_by: Vec::new(),
            created_at: SystemTime::now(),
        };
        self.state.lock().posts.push(post.clone());
        Ok(post)
    }

    async fn update_profile(
        &self,
        user: &User,
        update: &ProfileUpdate,
    ) -> Result<Profile, RepositoryError> {
        self.enter(Operation::UpdateProfile).await?;
        let mut state = self.state.lock();
        let profile = Profile {
            id: user.id.clone(),
            name: update.name.clone(),
            bio: update.bio.clone(),
            profile_pic_url: update.profile_pic_url.clone(),
        };
        state.profiles.insert(user.id.clone(), profile.clone());
        for post in state.posts.iter_mut().filter(|post| post.creator.id == user.id) {
            post.creator.name = profile.name.clone();
            post.creator.profile_pic_url = profile.profile_pic_url.clone();
        }
        Ok(profile)
    }

    async fn signup(&self, email: &str, _password: &str, name: &str) -> Result<User, RepositoryError> {
        self.enter(Operation::Signup).await?;
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            profile_pic_url: None,
            access_token: AccessToken::new(Uuid::new_v4().to_string()),
        };
        self.insert_profile(Profile {
            id: user.id.clone(),
            name: user.name.clone(),
            bio: None,
            profile_pic_url: None,
        });
        Ok(user)
    }

    async fn logout(&self, _user: &User) -> Result<bool, RepositoryError> {
        self.enter(Operation::Logout).await?;
        Ok(true)
    }
}
