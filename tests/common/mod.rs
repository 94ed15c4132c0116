//! Shared fixtures: an application context wired to in-memory
//! collaborators, plus post and user builders.

#![allow(dead_code, unused_imports)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use photostate::config::{ClientConfig, ConfigStore};
use photostate::context::{AppContext, Services};
use photostate::model::{AccessToken, Post, Profile, User, UserSummary};
use photostate::reactive::Subscription;
use photostate::services::{InMemoryCredentialStore, InMemoryRepository, StaticNetwork};
use photostate::ui::{ScreenCore, UiLoop, UserMessage};

pub const ME: &str = "u-me";
pub const FRIEND: &str = "u-friend";

pub struct Harness {
    pub ui: UiLoop,
    pub context: AppContext,
    pub repository: Arc<InMemoryRepository>,
    pub network: Arc<StaticNetwork>,
    pub credentials: InMemoryCredentialStore,
}

impl Harness {
    /// Signed in as [`me`], online, with my profile stored server-side.
    pub fn new() -> Self {
        Self::with_repository(InMemoryRepository::new())
    }

    pub fn with_repository(repository: InMemoryRepository) -> Self {
        repository.insert_profile(Profile {
            id: ME.to_string(),
            name: "Ada".to_string(),
            bio: Some("bridges".to_string()),
            profile_pic_url: None,
        });
        Self::build(repository, InMemoryCredentialStore::signed_in(me()))
    }

    pub fn signed_out() -> Self {
        Self::build(InMemoryRepository::new(), InMemoryCredentialStore::new())
    }

    fn build(repository: InMemoryRepository, credentials: InMemoryCredentialStore) -> Self {
        let repository = Arc::new(repository);
        let network = Arc::new(StaticNetwork::new(true));
        let ui = UiLoop::new();
        let context = AppContext::new(
            ConfigStore::new(test_config(), PathBuf::from("unused-config.toml")),
            ui.handle(),
            Services {
                repository: repository.clone(),
                network: network.clone(),
                credentials: Arc::new(credentials.clone()),
            },
        );
        Self {
            ui,
            context,
            repository,
            network,
            credentials,
        }
    }

    /// Run the UI loop until no call is in flight.
    pub async fn settle(&mut self) {
        self.ui.run_until_idle().await;
    }

    /// Store `post` server-side and return it.
    pub fn seed(&self, post: Post) -> Post {
        self.repository.insert_post(post.clone());
        post
    }
}

pub fn test_config() -> ClientConfig {
    let mut config = ClientConfig::default();
    config.api.api_key = "test-key".to_string();
    config.display.width = 1000;
    config.display.height = 1800;
    config
}

pub fn me() -> User {
    User {
        id: ME.to_string(),
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        profile_pic_url: None,
        access_token: AccessToken::new("token-me"),
    }
}

pub fn summary(id: &str, name: &str) -> UserSummary {
    UserSummary {
        id: id.to_string(),
        name: name.to_string(),
        profile_pic_url: None,
    }
}

pub fn my_summary() -> UserSummary {
    summary(ME, "Ada")
}

pub fn friend() -> UserSummary {
    summary(FRIEND, "Grace")
}

/// Post created `secs` seconds after the epoch.
pub fn post(id: &str, creator: UserSummary, secs: u64) -> Post {
    Post {
        id: id.to_string(),
        image_url: format!("https://img/{}.jpg", id),
        image_width: Some(500),
        image_height: Some(400),
        creator,
        liked_by: Vec::new(),
        created_at: UNIX_EPOCH + Duration::from_secs(secs),
    }
}

/// Post created `secs_ago` seconds before now.
pub fn recent_post(id: &str, creator: UserSummary, secs_ago: u64) -> Post {
    Post {
        created_at: SystemTime::now() - Duration::from_secs(secs_ago),
        ..post(id, creator, 0)
    }
}

pub type Messages = Arc<Mutex<Vec<UserMessage>>>;

/// Collect every message a screen shows.
pub fn watch_messages(core: &ScreenCore) -> (Messages, Subscription) {
    let messages: Messages = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&messages);
    let subscription = core
        .messages()
        .on_event(move |message| sink.lock().push(message));
    (messages, subscription)
}

/// Record every value an observable publishes.
pub fn record<T: Clone + Send + Sync + 'static>(
    observable: &photostate::reactive::Observable<T>,
) -> (Arc<Mutex<Vec<T>>>, Subscription) {
    let values = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&values);
    let subscription = observable.subscribe(move |value: &T| sink.lock().push(value.clone()));
    (values, subscription)
}
