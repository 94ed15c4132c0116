//! Home feed screen.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use crate::bus::SubscriberId;
use crate::context::AppContext;
use crate::error::ActionError;
use crate::model::{ChangeRecord, FeedPage, Post, UserSummary};
use crate::reactive::{map, Derived, Event, Observable};
use crate::ui::load::{LoadIntent, LoadReducer, LoadState};
use crate::ui::mvi::dispatch;
use crate::ui::post_item::{PostActions, PostItemViewState};
use crate::ui::post_list::{PostList, PostListIntent, PostListReducer};
use crate::ui::screen::ScreenCore;
use crate::ui::UserMessage;

/// Feed screen view-state. Clones share state.
#[derive(Clone)]
pub struct FeedViewState {
    inner: Arc<FeedInner>,
}

struct FeedInner {
    core: ScreenCore,
    bus_id: SubscriberId,
    state: Observable<LoadState>,
    loading: Derived<bool>,
    loading_more: Observable<bool>,
    posts: Observable<PostList>,
    launch_liked_by: Observable<Event<Vec<UserSummary>>>,
    /// Bumped by every `fetch_feed`; responses from older rounds are dropped.
    round: AtomicU64,
}

impl FeedViewState {
    pub fn new(context: AppContext) -> Self {
        let core = ScreenCore::new("feed", context);
        let inner = Arc::new_cyclic(|weak: &Weak<FeedInner>| {
            let weak = weak.clone();
            let subscription = core.context().bus().subscribe(move |record| {
                if let Some(inner) = weak.upgrade() {
                    inner.apply(record.clone());
                }
            });
            let bus_id = subscription.id();
            core.track(subscription);

            let state = Observable::with_value(LoadState::Idle);
            FeedInner {
                loading: map(&state, LoadState::is_loading),
                core,
                bus_id,
                state,
                loading_more: Observable::with_value(false),
                posts: Observable::with_value(PostList::default()),
                launch_liked_by: Observable::new(),
                round: AtomicU64::new(0),
            }
        });
        Self { inner }
    }

    /// Fetch the newest page, replacing whatever is shown.
    ///
    /// Only the latest call's response is applied.
    pub fn fetch_feed(&self) {
        let inner = &self.inner;
        dispatch::<LoadReducer>(&inner.state, LoadIntent::Start);
        let round = inner.next_round();
        let user = match inner.core.require_user() {
            Ok(user) => user,
            Err(error) => {
                inner.core.report(&error);
                dispatch::<LoadReducer>(
                    &inner.state,
                    LoadIntent::Fail {
                        message: error.user_message(),
                    },
                );
                return;
            }
        };

        let repository = inner.core.context().repository();
        let weak = Arc::downgrade(inner);
        inner.core.launch(
            "fetch_feed",
            async move { repository.fetch_feed(&user, &FeedPage::default()).await },
            move |result| {
                let Some(inner) = weak.upgrade() else { return };
                if !inner.is_current(round) {
                    tracing::debug!(round, "dropping stale feed response");
                    return;
                }
                match result {
                    Ok(posts) => {
                        dispatch::<PostListReducer>(&inner.posts, PostListIntent::Replace(posts));
                        dispatch::<LoadReducer>(&inner.state, LoadIntent::Succeed);
                    }
                    Err(error) => {
                        let error = ActionError::from(error);
                        inner.core.report(&error);
                        dispatch::<LoadReducer>(
                            &inner.state,
                            LoadIntent::Fail {
                                message: error.user_message(),
                            },
                        );
                    }
                }
            },
        );
    }

    /// Fetch the page after the oldest shown post and append it.
    ///
    /// Ignored while a fetch or another page is in flight.
    pub fn load_more(&self) {
        let inner = &self.inner;
        if inner.loading_more.get().unwrap_or(false) || self.loading().get().unwrap_or(false) {
            return;
        }
        let user = match inner.core.require_user() {
            Ok(user) => user,
            Err(error) => {
                inner.core.report(&error);
                return;
            }
        };
        let shown = inner.posts.get().unwrap_or_default();
        let page = FeedPage {
            first_post_id: shown.first().map(|post| post.id.clone()),
            last_post_id: shown.last().map(|post| post.id.clone()),
        };

        inner.loading_more.set(true);
        let round = inner.round.load(Ordering::Acquire);
        let repository = inner.core.context().repository();
        let weak = Arc::downgrade(inner);
        inner.core.launch(
            "fetch_feed",
            async move { repository.fetch_feed(&user, &page).await },
            move |result| {
                let Some(inner) = weak.upgrade() else { return };
                match result {
                    // A page cut from a list that has since been replaced.
                    Ok(_) if !inner.is_current(round) => {
                        tracing::debug!(round, "dropping stale feed page");
                    }
                    Ok(posts) => {
                        dispatch::<PostListReducer>(&inner.posts, PostListIntent::AppendPage(posts));
                    }
                    Err(error) => inner.core.report(&error.into()),
                }
                inner.loading_more.set(false);
            },
        );
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

    pub fn loading(&self) -> &Derived<bool> {
        &self.inner.loading
    }

    pub fn loading_more(&self) -> &Observable<bool> {
        &self.inner.loading_more
    }

    pub fn posts(&self) -> &Observable<PostList> {
        &self.inner.posts
    }

    pub fn launch_liked_by(&self) -> &Observable<Event<Vec<UserSummary>>> {
        &self.inner.launch_liked_by
    }
}

impl FeedInner {
    fn next_round(&self) -> u64 {
        self.round.fetch_add(1, Ordering::AcqRel) + 1
    }

    fn is_current(&self, round: u64) -> bool {
        self.round.load(Ordering::Acquire) == round
    }

    fn apply(&self, record: ChangeRecord) {
        dispatch::<PostListReducer>(&self.posts, PostListIntent::Apply(record));
    }

    fn share(&self, record: ChangeRecord) {
        self.apply(record.clone());
        self.core.context().bus().publish_from(self.bus_id, record);
    }
}

impl PostActions for FeedInner {
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
