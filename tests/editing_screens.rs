mod common;

use std::sync::Arc;

use common::{friend, my_summary, post, watch_messages, Harness, ME};
use parking_lot::Mutex;
use photostate::model::{ChangeRecord, PostDraft};
use photostate::services::{Operation, RepositoryError};
use photostate::ui::{
    EditProfileViewState, FeedViewState, PhotoViewState, ProfileViewState, UserMessage,
};

fn draft() -> PostDraft {
    PostDraft {
        image_url: "https://img/upload.jpg".to_string(),
        image_width: Some(800),
        image_height: Some(600),
    }
}

#[tokio::test]
async fn edit_profile_loads_current_fields() {
    let mut harness = Harness::new();
    let edit = EditProfileViewState::new(harness.context.clone()).unwrap();
    assert_eq!(edit.name().get().as_deref(), Some("Ada"));

    edit.load();
    harness.settle().await;

    assert_eq!(edit.bio().get(), Some(Some("bridges".to_string())));
    assert_eq!(edit.loading().get(), Some(false));
}

#[tokio::test]
async fn saving_announces_changed_fields_to_every_screen() {
    let mut harness = Harness::new();
    harness.seed(post("p1", my_summary(), 30));
    harness.seed(post("f1", friend(), 20));
    let profile = ProfileViewState::new(harness.context.clone()).unwrap();
    let feed = FeedViewState::new(harness.context.clone());
    profile.fetch_profile();
    feed.fetch_feed();
    harness.settle().await;

    let records = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&records);
    let _spy = harness
        .context
        .bus()
        .subscribe(move |record: &ChangeRecord| sink.lock().push(record.clone()));

    let edit = EditProfileViewState::new(harness.context.clone()).unwrap();
    let (messages, _watch) = watch_messages(edit.core());
    edit.on_name_change("Ada Lovelace");
    edit.on_profile_pic_uploaded("https://img/ada.png");
    edit.on_save();
    harness.settle().await;

    assert_eq!(
        *records.lock(),
        vec![
            ChangeRecord::NameChanged {
                user_id: ME.to_string(),
                name: "Ada Lovelace".to_string(),
            },
            ChangeRecord::ProfileImageChanged {
                user_id: ME.to_string(),
                profile_pic_url: "https://img/ada.png".to_string(),
            },
        ]
    );
    assert_eq!(*messages.lock(), vec![UserMessage::ProfileSaved]);

    let stored = harness.context.current_user().unwrap();
    assert_eq!(stored.name, "Ada Lovelace");
    assert_eq!(stored.profile_pic_url.as_deref(), Some("https://img/ada.png"));

    assert_eq!(profile.name().get().as_deref(), Some("Ada Lovelace"));
    assert!(profile.profile_image().get().flatten().is_some());
    let feed_posts = feed.posts().get().unwrap();
    let mine = feed_posts.get("p1").unwrap();
    assert_eq!(mine.creator.name, "Ada Lovelace");
    assert_eq!(mine.creator.profile_pic_url.as_deref(), Some("https://img/ada.png"));
    assert_eq!(feed_posts.get("f1").unwrap().creator.name, "Grace");
}

#[tokio::test]
async fn unchanged_save_announces_nothing() {
    let mut harness = Harness::new();
    let edit = EditProfileViewState::new(harness.context.clone()).unwrap();
    let records = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&records);
    let _spy = harness
        .context
        .bus()
        .subscribe(move |_: &ChangeRecord| *counter.lock() += 1);
    let saved = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&saved);
    let _watch = edit
        .profile_saved()
        .on_event(move |user| *sink.lock() = Some(user));

    edit.on_bio_change("");
    edit.on_save();
    harness.settle().await;

    assert_eq!(*records.lock(), 0);
    let saved = saved.lock().clone().expect("save completes");
    assert_eq!(saved.name, "Ada");
    assert_eq!(harness.repository.call_count(Operation::UpdateProfile), 1);
    assert_eq!(edit.saving().get(), Some(false));
}

#[tokio::test]
async fn failed_save_keeps_stored_user() {
    let mut harness = Harness::new();
    harness.repository.fail(
        Operation::UpdateProfile,
        RepositoryError::Connection {
            reason: "reset".to_string(),
        },
    );
    let edit = EditProfileViewState::new(harness.context.clone()).unwrap();
    let (messages, _watch) = watch_messages(edit.core());

    edit.on_name_change("Someone Else");
    edit.on_save();
    harness.settle().await;

    assert_eq!(harness.context.current_user().unwrap().name, "Ada");
    assert_eq!(*messages.lock(), vec![UserMessage::ServerUnreachable]);
}

#[tokio::test]
async fn new_post_reaches_profile_and_feed() {
    let mut harness = Harness::new();
    harness.seed(post("p1", my_summary(), 30));
    let profile = ProfileViewState::new(harness.context.clone()).unwrap();
    let feed = FeedViewState::new(harness.context.clone());
    profile.fetch_profile();
    feed.fetch_feed();
    harness.settle().await;

    let photo = PhotoViewState::new(harness.context.clone());
    let (created, _watch) = common::record(photo.post_created());
    photo.on_image_uploaded(draft());
    harness.settle().await;

    let created = created.lock();
    assert_eq!(created.len(), 1);
    let new_post = created[0].peek().clone();
    assert_eq!(new_post.creator.id, ME);

    for list in [profile.posts().get().unwrap(), feed.posts().get().unwrap()] {
        assert_eq!(list.ids(), vec![new_post.id.as_str(), "p1"]);
    }
    assert_eq!(profile.posts_count().get(), Some(2));
    assert_eq!(photo.loading().get(), Some(false));
}

#[tokio::test]
async fn offline_upload_creates_nothing() {
    let mut harness = Harness::new();
    harness.network.set_connected(false);
    let photo = PhotoViewState::new(harness.context.clone());
    let (messages, _watch) = watch_messages(photo.core());

    photo.on_image_uploaded(draft());
    harness.settle().await;

    assert_eq!(harness.repository.total_calls(), 0);
    assert_eq!(*messages.lock(), vec![UserMessage::NoConnectivity]);
    assert_eq!(photo.loading().get(), Some(false));
}
