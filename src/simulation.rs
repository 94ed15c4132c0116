//! Scripted session against the in-memory collaborators.
//!
//! Wires a full application context, opens the profile and feed screens
//! and drives them through fetch, like, delete and a profile edit, so the
//! cross-screen behaviour can be watched in the logs.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use parking_lot::Mutex;
use serde::Serialize;

use crate::config::ConfigStore;
use crate::context::{AppContext, Services};
use crate::error::ActionError;
use crate::model::{AccessToken, Post, Profile, User, UserSummary};
use crate::reactive::Subscription;
use crate::services::{InMemoryCredentialStore, InMemoryRepository, StaticNetwork};
use crate::ui::{EditProfileViewState, FeedViewState, ProfileViewState, ScreenCore, UiLoop};

#[derive(Debug, Clone)]
pub struct SimulationOptions {
    /// Own posts seeded for the signed-in user.
    pub posts: usize,
    /// Drop connectivity after the initial fetch.
    pub offline: bool,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            posts: 3,
            offline: false,
        }
    }
}

/// What the screens show at the end of the session.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub profile_name: Option<String>,
    pub profile_posts: Vec<String>,
    pub feed_posts: Vec<String>,
    /// Creator name of every feed post by the signed-in user.
    pub own_names_in_feed: Vec<String>,
    pub liked_in_profile: Vec<String>,
    pub messages: Vec<String>,
    pub repository_calls: usize,
}

const ME: &str = "u-me";
const FRIEND: &str = "u-friend";

fn summary(id: &str, name: &str) -> UserSummary {
    UserSummary {
        id: id.to_string(),
        name: name.to_string(),
        profile_pic_url: None,
    }
}

fn seed(repository: &InMemoryRepository, options: &SimulationOptions) -> User {
    let user = User {
        id: ME.to_string(),
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        profile_pic_url: None,
        access_token: AccessToken::new("simulated-token"),
    };
    repository.insert_profile(Profile {
        id: user.id.clone(),
        name: user.name.clone(),
        bio: Some("Takes pictures of bridges".to_string()),
        profile_pic_url: None,
    });

    let now = SystemTime::now();
    let friend_posts = 2;
    for i in 0..options.posts + friend_posts {
        let creator = if i < options.posts {
            summary(ME, &user.name)
        } else {
            summary(FRIEND, "Grace")
        };
        repository.insert_post(Post {
            id: format!("post-{}", i),
            image_url: format!("https://images.photostate.local/{}.jpg", i),
            image_width: Some(1080),
            image_height: Some(720 + 60 * i as u32),
            creator,
            liked_by: Vec::new(),
            created_at: now - Duration::from_secs(600 * (i as u64 + 1)),
        });
    }
    user
}

fn collect_messages(core: &ScreenCore, sink: &Arc<Mutex<Vec<String>>>) -> Subscription {
    let sink = Arc::clone(sink);
    let screen = core.name();
    core.messages().on_event(move |message| {
        sink.lock().push(format!("{}: {}", screen, message));
    })
}

/// Run the scripted session to completion.
pub async fn run(
    config: ConfigStore,
    options: SimulationOptions,
) -> Result<SimulationReport, ActionError> {
    let repository = Arc::new(InMemoryRepository::new());
    let user = seed(&repository, &options);
    let network = Arc::new(StaticNetwork::new(true));

    let mut ui = UiLoop::new();
    let context = AppContext::new(
        config,
        ui.handle(),
        Services {
            repository: repository.clone(),
            network: network.clone(),
            credentials: Arc::new(InMemoryCredentialStore::signed_in(user)),
        },
    );

    let profile = ProfileViewState::new(context.clone())?;
    let feed = FeedViewState::new(context.clone());
    let messages = Arc::new(Mutex::new(Vec::new()));
    let _watch_profile = collect_messages(profile.core(), &messages);
    let _watch_feed = collect_messages(feed.core(), &messages);

    profile.fetch_profile();
    feed.fetch_feed();
    ui.run_until_idle().await;
    tracing::info!(
        profile_posts = profile.posts_count().get().unwrap_or(0),
        feed_posts = feed.posts().get().unwrap_or_default().len(),
        "initial fetch done"
    );

    if options.offline {
        tracing::info!("dropping connectivity");
        network.set_connected(false);
    }

    // Like the newest own post from the feed; the profile follows via the bus.
    let feed_items = feed.posts().get().unwrap_or_default();
    if let Some(post) = feed_items.iter().find(|post| post.creator.id == ME) {
        let item = feed.bind_item(post.clone())?;
        let _watch_item = collect_messages(item.core(), &messages);
        item.on_like_click();
        ui.run_until_idle().await;
    }

    // Delete the oldest own post from the profile; the feed follows.
    let profile_items = profile.posts().get().unwrap_or_default();
    if let Some(post) = profile_items.last() {
        let item = profile.bind_item(post.clone())?;
        let _watch_item = collect_messages(item.core(), &messages);
        item.on_delete_click();
        ui.run_until_idle().await;
    }

    let edit = EditProfileViewState::new(context.clone())?;
    let _watch_edit = collect_messages(edit.core(), &messages);
    edit.on_name_change("Ada Lovelace");
    edit.on_save();
    ui.run_until_idle().await;

    let profile_posts = profile.posts().get().unwrap_or_default();
    let feed_posts = feed.posts().get().unwrap_or_default();
    let report = SimulationReport {
        profile_name: profile.name().get(),
        profile_posts: profile_posts.ids().into_iter().map(String::from).collect(),
        feed_posts: feed_posts.ids().into_iter().map(String::from).collect(),
        own_names_in_feed: feed_posts
            .iter()
            .filter(|post| post.creator.id == ME)
            .map(|post| post.creator.name.clone())
            .collect(),
        liked_in_profile: profile_posts
            .iter()
            .filter(|post| post.is_liked_by(ME))
            .map(|post| post.id.clone())
            .collect(),
        messages: messages.lock().clone(),
        repository_calls: repository.total_calls(),
    };

    profile.teardown();
    feed.teardown();
    tracing::info!(calls = report.repository_calls, "simulation finished");
    Ok(report)
}
