//! View-state of one post row.

use std::sync::Weak;
use std::time::SystemTime;

use crate::context::AppContext;
use crate::error::ActionError;
use crate::model::{ImageDescriptor, Post};
use crate::reactive::{map, Derived, Event, Observable};
use crate::ui::format::time_ago;
use crate::ui::screen::ScreenCore;

/// What a list controller does with the actions of its rows.
pub trait PostActions: Send + Sync {
    /// The row's post now has a new liker set.
    fn on_like_toggled(&self, post: Post);

    /// The server deleted the row's post.
    fn on_deleted(&self, post: Post);

    fn on_likes_count_clicked(&self, post: Post);
}

/// One row: the bound post, its display fields and its actions.
///
/// Actions complete as one-shot events that the owning list controller
/// consumes through [`PostItemViewState::attach`]. Dropping the row
/// cancels its in-flight calls.
pub struct PostItemViewState {
    core: ScreenCore,
    data: Observable<Post>,
    name: Derived<String>,
    post_time: Derived<String>,
    likes_count: Derived<usize>,
    is_liked: Derived<bool>,
    is_owner: Derived<bool>,
    profile_image: Derived<Option<ImageDescriptor>>,
    image_detail: Derived<ImageDescriptor>,
    post_deleted: Observable<Event<Post>>,
    like_clicked: Observable<Event<Post>>,
    likes_count_clicked: Observable<Event<Post>>,
}

impl PostItemViewState {
    /// Row for `post`, seen by the signed-in user.
    pub fn new(context: AppContext, post: Post) -> Result<Self, ActionError> {
        let core = ScreenCore::for_row("post_item", context);
        let user = core.require_user()?;
        let headers = core.context().image_headers(&user);
        let display = core.context().display();
        let data = Observable::with_value(post);

        let user_id = user.id.clone();
        let is_liked = map(&data, move |post: &Post| post.is_liked_by(&user_id));
        let user_id = user.id.clone();
        let is_owner = map(&data, move |post: &Post| post.creator.id == user_id);

        let profile_headers = headers.clone();
        let profile_image = map(&data, move |post: &Post| {
            post.creator
                .profile_pic_url
                .as_ref()
                .map(|url| ImageDescriptor::without_size(url.clone(), profile_headers.clone()))
        });
        let image_detail = map(&data, move |post: &Post| {
            ImageDescriptor::for_post(post, headers.clone(), display)
        });

        Ok(Self {
            name: map(&data, |post: &Post| post.creator.name.clone()),
            post_time: map(&data, |post: &Post| {
                time_ago(post.created_at, SystemTime::now())
            }),
            likes_count: map(&data, Post::likes_count),
            is_liked,
            is_owner,
            profile_image,
            image_detail,
            core,
            data,
            post_deleted: Observable::new(),
            like_clicked: Observable::new(),
            likes_count_clicked: Observable::new(),
        })
    }

    /// Show a different post in this row.
    pub fn bind(&self, post: Post) {
        self.data.set_if_changed(post);
    }

    /// Route this row's action events to `parent`.
    ///
    /// Holds only a weak reference; events arriving after the parent is
    /// gone are consumed and dropped.
    pub fn attach<A: PostActions + 'static>(&self, parent: Weak<A>) {
        let forward = |event: &Observable<Event<Post>>, action: fn(&A, Post)| {
            let parent = parent.clone();
            self.core.track(event.on_event(move |post| {
                if let Some(parent) = parent.upgrade() {
                    action(&parent, post);
                }
            }));
        };
        forward(&self.like_clicked, A::on_like_toggled);
        forward(&self.post_deleted, A::on_deleted);
        forward(&self.likes_count_clicked, A::on_likes_count_clicked);
    }

    /// Like or unlike, depending on whether the current user already likes
    /// the post.
    pub fn on_like_click(&self) {
        let Some(post) = self.data.get() else {
            return;
        };
        let user = match self.core.precheck() {
            Ok(user) => user,
            Err(error) => {
                self.core.report(&error);
                return;
            }
        };

        let liked = post.is_liked_by(&user.id);
        let operation = if liked { "unlike_post" } else { "like_post" };
        let repository = self.core.context().repository();
        let post_id = post.id.clone();
        let (core, data, like_clicked) = (
            self.core.clone(),
            self.data.clone(),
            self.like_clicked.clone(),
        );

        self.core.launch(
            operation,
            async move {
                if liked {
                    repository.unlike_post(&post, &user).await
                } else {
                    repository.like_post(&post, &user).await
                }
            },
            move |result| match result {
                Ok(updated) if updated.id == post_id => {
                    data.set(updated.clone());
                    like_clicked.fire(updated);
                }
                Ok(updated) => {
                    tracing::warn!(expected = %post_id, got = %updated.id, "like response for another post");
                }
                Err(error) => core.report(&error.into()),
            },
        );
    }

    pub fn on_delete_click(&self) {
        let Some(post) = self.data.get() else {
            return;
        };
        let user = match self.core.precheck() {
            Ok(user) => user,
            Err(error) => {
                self.core.report(&error);
                return;
            }
        };

        let repository = self.core.context().repository();
        let deleted = post.clone();
        let (core, post_deleted) = (self.core.clone(), self.post_deleted.clone());

        self.core.launch(
            "delete_post",
            async move { repository.delete_post(&post, &user).await },
            move |result| match result {
                Ok(true) => post_deleted.fire(deleted),
                Ok(false) => tracing::debug!(post_id = %deleted.id, "server kept post"),
                Err(error) => core.report(&error.into()),
            },
        );
    }

    pub fn on_likes_count_click(&self) {
        if let Some(post) = self.data.get() {
            self.likes_count_clicked.fire(post);
        }
    }

    pub fn core(&self) -> &ScreenCore {
        &self.core
    }

    pub fn data(&self) -> &Observable<Post> {
        &self.data
    }

    pub fn name(&self) -> &Derived<String> {
        &self.name
    }

    /// Relative creation time, e.g. "5 minutes ago".
    pub fn post_time(&self) -> &Derived<String> {
        &self.post_time
    }

    pub fn likes_count(&self) -> &Derived<usize> {
        &self.likes_count
    }

    pub fn is_liked(&self) -> &Derived<bool> {
        &self.is_liked
    }

    pub fn is_owner(&self) -> &Derived<bool> {
        &self.is_owner
    }

    /// Creator avatar; `None` when the creator has no picture.
    pub fn profile_image(&self) -> &Derived<Option<ImageDescriptor>> {
        &self.profile_image
    }

    /// Post image sized to the display width.
    pub fn image_detail(&self) -> &Derived<ImageDescriptor> {
        &self.image_detail
    }

    pub fn post_deleted(&self) -> &Observable<Event<Post>> {
        &self.post_deleted
    }

    pub fn like_clicked(&self) -> &Observable<Event<Post>> {
        &self.like_clicked
    }

    pub fn likes_count_clicked(&self) -> &Observable<Event<Post>> {
        &self.likes_count_clicked
    }
}

impl Drop for PostItemViewState {
    fn drop(&mut self) {
        self.core.teardown();
    }
}

