//! Profile screen: the signed-in user's header fields and own posts.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::bus::SubscriberId;
use crate::context::AppContext;
use crate::error::ActionError;
use crate::model::{ChangeRecord, ImageDescriptor, Post, PostSummary, Profile, User, UserSummary};
use crate::reactive::{map, map2, Derived, Event, Observable};
use crate::services::RepositoryError;
use crate::ui::load::{LoadIntent, LoadReducer, LoadState};
use crate::ui::mvi::dispatch;
use crate::ui::post_item::{PostActions, PostItemViewState};
use crate::ui::post_list::{PostList, PostListIntent, PostListReducer};
use crate::ui::screen::ScreenCore;
use crate::ui::UserMessage;

/// Profile screen view-state. Clones share state.
#[derive(Clone)]
pub struct ProfileViewState {
    inner: Arc<ProfileInner>,
}

struct ProfileInner {
    core: ScreenCore,
    user_id: String,
    bus_id: SubscriberId,
    state: Observable<LoadState>,
    refreshing: Observable<bool>,
    loading: Derived<bool>,
    logging_out: Observable<bool>,
    name: Observable<String>,
    bio: Observable<Option<String>>,
    profile_pic_url: Observable<Option<String>>,
    profile_image: Derived<Option<ImageDescriptor>>,
    posts: Observable<PostList>,
    posts_count: Derived<usize>,
    launch_logout: Observable<Event<()>>,
    launch_edit_profile: Observable<Event<User>>,
    launch_liked_by: Observable<Event<Vec<UserSummary>>>,
    details: Mutex<DetailFetch>,
}

/// Completion counting for the per-post detail fetches of one
/// `fetch_profile` round.
#[derive(Default)]
struct DetailFetch {
    generation: u64,
    expected: usize,
    completed: usize,
    failed: usize,
    fetched: Vec<Post>,
}

impl DetailFetch {
    /// Forget the previous round; its late completions are ignored.
    fn restart(&mut self) -> u64 {
        *self = DetailFetch {
            generation: self.generation + 1,
            ..DetailFetch::default()
        };
        self.generation
    }
}

impl ProfileViewState {
    pub fn new(context: AppContext) -> Result<Self, ActionError> {
        let core = ScreenCore::new("profile", context);
        let user = core.require_user()?;
        let headers = core.context().image_headers(&user);

        let inner = Arc::new_cyclic(|weak: &Weak<ProfileInner>| {
            let weak = weak.clone();
            let subscription = core.context().bus().subscribe(move |record| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_change(record);
                }
            });
            let bus_id = subscription.id();
            core.track(subscription);

            let state = Observable::with_value(LoadState::Idle);
            let refreshing = Observable::with_value(false);
            let profile_pic_url: Observable<Option<String>> = Observable::new();
            let posts = Observable::with_value(PostList::default());

            ProfileInner {
                loading: map2(&state, &refreshing, |state: &LoadState, refreshing: &bool| {
                    state.is_loading() || *refreshing
                }),
                profile_image: map(&profile_pic_url, move |url: &Option<String>| {
                    url.as_ref()
                        .map(|url| ImageDescriptor::without_size(url.clone(), headers.clone()))
                }),
                posts_count: map(&posts, PostList::len),
                core,
                user_id: user.id.clone(),
                bus_id,
                state,
                refreshing,
                logging_out: Observable::with_value(false),
                name: Observable::new(),
                bio: Observable::new(),
                profile_pic_url,
                posts,
                launch_logout: Observable::new(),
                launch_edit_profile: Observable::new(),
                launch_liked_by: Observable::new(),
                details: Mutex::new(DetailFetch::default()),
            }
        });

        Ok(Self { inner })
    }

    /// Fetch the header fields and every own post.
    ///
    /// Each post is fetched individually; loading ends once every detail
    /// fetch has completed, successful or not.
    pub fn fetch_profile(&self) {
        self.inner.fetch_profile();
    }

    /// Re-fetch the header fields only, publishing just the changed ones.
    ///
    /// Leaves the load state and any detail round alone; `refreshing` is
    /// raised meanwhile and `loading` covers both.
    pub fn refresh_profile_data(&self) {
        self.inner.refresh_profile_data();
    }

    pub fn logout(&self) {
        self.inner.logout();
    }

    pub fn on_edit_profile_clicked(&self) {
        match self.inner.core.require_user() {
            Ok(user) => self.inner.launch_edit_profile.fire(user),
            Err(error) => self.inner.core.report(&error),
        }
    }

    /// Row view-state for `post`, wired to this screen.
    pub fn bind_item(&self, post: Post) -> Result<PostItemViewState, ActionError> {
        let item = PostItemViewState::new(self.inner.core.context().clone(), post)?;
        item.attach(Arc::downgrade(&self.inner));
        Ok(item)
    }

    pub fn teardown(&self) {
        self.inner.core.teardown();
    }

    pub fn core(&self) -> &ScreenCore {
        &self.inner.core
    }

    pub fn bus_id(&self) -> SubscriberId {
        self.inner.bus_id
    }

    pub fn state(&self) -> &Observable<LoadState> {
        &self.inner.state
    }

    pub fn refreshing(&self) -> &Observable<bool> {
        &self.inner.refreshing
    }

    pub fn loading(&self) -> &Derived<bool> {
        &self.inner.loading
    }

    pub fn logging_out(&self) -> &Observable<bool> {
        &self.inner.logging_out
    }

    pub fn name(&self) -> &Observable<String> {
        &self.inner.name
    }

    pub fn bio(&self) -> &Observable<Option<String>> {
        &self.inner.bio
    }

    pub fn profile_pic_url(&self) -> &Observable<Option<String>> {
        &self.inner.profile_pic_url
    }

    pub fn profile_image(&self) -> &Derived<Option<ImageDescriptor>> {
        &self.inner.profile_image
    }

    pub fn posts(&self) -> &Observable<PostList> {
        &self.inner.posts
    }

    pub fn posts_count(&self) -> &Derived<usize> {
        &self.inner.posts_count
    }

    pub fn launch_logout(&self) -> &Observable<Event<()>> {
        &self.inner.launch_logout
    }

    pub fn launch_edit_profile(&self) -> &Observable<Event<User>> {
        &self.inner.launch_edit_profile
    }

    pub fn launch_liked_by(&self) -> &Observable<Event<Vec<UserSummary>>> {
        &self.inner.launch_liked_by
    }
}

impl ProfileInner {
    fn set_load(&self, intent: LoadIntent) {
        dispatch::<LoadReducer>(&self.state, intent);
    }

    fn fail(&self, error: &ActionError) {
        self.core.report(error);
        self.set_load(LoadIntent::Fail {
            message: error.user_message(),
        });
    }

    fn apply(&self, record: ChangeRecord) {
        dispatch::<PostListReducer>(&self.posts, PostListIntent::Apply(record));
    }

    fn apply_profile(&self, profile: Profile) {
        self.name.set_if_changed(profile.name);
        self.bio.set_if_changed(profile.bio);
        self.profile_pic_url.set_if_changed(profile.profile_pic_url);
    }

    fn is_current(&self, generation: u64) -> bool {
        self.details.lock().generation == generation
    }

    fn fetch_profile(self: &Arc<Self>) {
        self.set_load(LoadIntent::Start);
        // A new round supersedes the old one even when it fails the precheck.
        let generation = self.details.lock().restart();
        let user = match self.core.precheck() {
            Ok(user) => user,
            Err(error) => return self.fail(&error),
        };

        let repository = self.core.context().repository();
        let profile_user = user.clone();
        let weak = Arc::downgrade(self);
        self.core.launch(
            "fetch_profile",
            async move { repository.fetch_profile(&profile_user).await },
            move |result| {
                let Some(inner) = weak.upgrade() else { return };
                if !inner.is_current(generation) {
                    tracing::debug!(generation, "dropping stale profile header");
                    return;
                }
                match result {
                    Ok(profile) => inner.apply_profile(profile),
                    Err(error) => inner.core.report(&error.into()),
                }
            },
        );

        let repository = self.core.context().repository();
        let list_user = user.clone();
        let weak = Arc::downgrade(self);
        self.core.launch(
            "fetch_post_list",
            async move { repository.fetch_post_list(&list_user).await },
            move |result| {
                let Some(inner) = weak.upgrade() else { return };
                if !inner.is_current(generation) {
                    tracing::debug!(generation, "dropping stale post list");
                    return;
                }
                match result {
                    Ok(summaries) => inner.fetch_details(generation, user, summaries),
                    Err(error) => inner.fail(&error.into()),
                }
            },
        );
    }

    fn fetch_details(self: &Arc<Self>, generation: u64, user: User, summaries: Vec<PostSummary>) {
        {
            let mut details = self.details.lock();
            if details.generation != generation {
                return;
            }
            details.expected = summaries.len();
        }

        if summaries.is_empty() {
            dispatch::<PostListReducer>(&self.posts, PostListIntent::Replace(Vec::new()));
            self.set_load(LoadIntent::Succeed);
            return;
        }

        tracing::debug!(count = summaries.len(), generation, "fetching post details");
        for summary in summaries {
            let repository = self.core.context().repository();
            let user = user.clone();
            let weak = Arc::downgrade(self);
            self.core.launch(
                "fetch_post_detail",
                async move { repository.fetch_post_detail(&summary, &user).await },
                move |result| {
                    if let Some(inner) = weak.upgrade() {
                        inner.on_detail(generation, result);
                    }
                },
            );
        }
    }

    fn on_detail(&self, generation: u64, result: Result<Post, RepositoryError>) {
        let mut error = None;
        let finished = {
            let mut details = self.details.lock();
            if details.generation != generation {
                return;
            }
            details.completed += 1;
            match result {
                Ok(post) => details.fetched.push(post),
                Err(failure) => {
                    details.failed += 1;
                    error = Some(ActionError::from(failure));
                }
            }
            if details.completed == details.expected {
                Some((std::mem::take(&mut details.fetched), details.failed))
            } else {
                None
            }
        };

        // A failed detail surfaces a message but does not stop its siblings.
        if let Some(error) = &error {
            self.core.report(error);
        }

        let Some((posts, failed)) = finished else {
            return;
        };
        tracing::info!(fetched = posts.len(), failed, "post details complete");
        let nothing_fetched = posts.is_empty();
        dispatch::<PostListReducer>(&self.posts, PostListIntent::Replace(posts));
        if nothing_fetched && failed > 0 {
            let message = error
                .map(|error| error.user_message())
                .unwrap_or(UserMessage::ServerUnreachable);
            self.set_load(LoadIntent::Fail { message });
        } else {
            self.set_load(LoadIntent::Succeed);
        }
    }

    fn refresh_profile_data(self: &Arc<Self>) {
        let user = match self.core.precheck() {
            Ok(user) => user,
            Err(error) => return self.core.report(&error),
        };
        self.refreshing.set(true);

        let repository = self.core.context().repository();
        let weak = Arc::downgrade(self);
        self.core.launch(
            "fetch_profile",
            async move { repository.fetch_profile(&user).await },
            move |result| {
                let Some(inner) = weak.upgrade() else { return };
                match result {
                    Ok(profile) => inner.apply_profile(profile),
                    Err(error) => inner.core.report(&error.into()),
                }
                inner.refreshing.set(false);
            },
        );
    }

    fn logout(self: &Arc<Self>) {
        self.logging_out.set(true);
        let user = match self.core.precheck() {
            Ok(user) => user,
            Err(error) => {
                self.core.report(&error);
                self.logging_out.set(false);
                return;
            }
        };

        let repository = self.core.context().repository();
        let weak = Arc::downgrade(self);
        self.core.launch(
            "logout",
            async move { repository.logout(&user).await },
            move |result| {
                let Some(inner) = weak.upgrade() else { return };
                match result {
                    Ok(true) => {
                        inner.core.context().credentials().remove_current_user();
                        inner.launch_logout.fire(());
                    }
                    Ok(false) => tracing::warn!("server refused logout"),
                    Err(error) => inner.core.report(&error.into()),
                }
                inner.logging_out.set(false);
            },
        );
    }

    /// Record from another screen.
    fn on_change(&self, record: &ChangeRecord) {
        match record {
            // Only own posts belong on this screen.
            ChangeRecord::NewPost(post) if post.creator.id != self.user_id => return,
            ChangeRecord::NameChanged { user_id, name } if *user_id == self.user_id => {
                self.name.set_if_changed(name.clone());
            }
            ChangeRecord::ProfileImageChanged {
                user_id,
                profile_pic_url,
            } if *user_id == self.user_id => {
                self.profile_pic_url
                    .set_if_changed(Some(profile_pic_url.clone()));
            }
            _ => {}
        }
        self.apply(record.clone());
    }

    /// Apply locally, then tell every other screen.
    fn share(&self, record: ChangeRecord) {
        self.apply(record.clone());
        self.core.context().bus().publish_from(self.bus_id, record);
    }
}

impl PostActions for ProfileInner {
    fn on_like_toggled(&self, post: Post) {
        self.share(ChangeRecord::LikeToggled(post));
    }

    fn on_deleted(&self, post: Post) {
        self.share(ChangeRecord::Deleted { post_id: post.id });
        self.core.show_message(UserMessage::PostDeleted);
    }

    fn on_likes_count_clicked(&self, post: Post) {
        self.launch_liked_by.fire(post.liked_by);
    }
}
