//! New-post screen.

use crate::context::AppContext;
use crate::model::{ChangeRecord, Post, PostDraft};
use crate::reactive::{Event, Observable};
use crate::ui::screen::ScreenCore;

/// Turns an uploaded image into a post and announces it.
pub struct PhotoViewState {
    core: ScreenCore,
    loading: Observable<bool>,
    post_created: Observable<Event<Post>>,
}

impl PhotoViewState {
    pub fn new(context: AppContext) -> Self {
        Self {
            core: ScreenCore::new("photo", context),
            loading: Observable::with_value(false),
            post_created: Observable::new(),
        }
    }

    /// The image upload finished; create the post for it.
    pub fn on_image_uploaded(&self, draft: PostDraft) {
        let user = match self.core.precheck() {
            Ok(user) => user,
            Err(error) => {
                self.core.report(&error);
                return;
            }
        };

        self.loading.set(true);
        let repository = self.core.context().repository();
        let (core, loading, post_created) = (
            self.core.clone(),
            self.loading.clone(),
            self.post_created.clone(),
        );
        self.core.launch(
            "create_post",
            async move { repository.create_post(&draft, &user).await },
            move |result| {
                match result {
                    Ok(post) => {
                        tracing::info!(post_id = %post.id, "post created");
                        core.context().bus().publish(ChangeRecord::NewPost(post.clone()));
                        post_created.fire(post);
                    }
                    Err(error) => core.report(&error.into()),
                }
                loading.set(false);
            },
        );
    }

    pub fn core(&self) -> &ScreenCore {
        &self.core
    }

    pub fn loading(&self) -> &Observable<bool> {
        &self.loading
    }

    pub fn post_created(&self) -> &Observable<Event<Post>> {
        &self.post_created
    }
}

impl Drop for PhotoViewState {
    fn drop(&mut self) {
        self.core.teardown();
    }
}
