mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{friend, my_summary, post, record, watch_messages, Harness, ME};
use parking_lot::Mutex;
use photostate::model::ChangeRecord;
use photostate::services::{Operation, RepositoryError};
use photostate::ui::load::LoadState;
use photostate::ui::{ProfileViewState, UserMessage};

fn server_error() -> RepositoryError {
    RepositoryError::Server {
        status: 500,
        message: "detail unavailable".to_string(),
    }
}

#[tokio::test(start_paused = true)]
async fn loading_clears_only_after_every_detail_fetch() {
    let mut harness = Harness::new();
    harness.seed(post("p1", my_summary(), 30));
    harness.seed(post("p2", my_summary(), 20));
    harness.seed(post("p3", my_summary(), 10));
    harness.repository.fail_post_detail("p2", server_error());
    for millis in [10, 50, 200] {
        harness
            .repository
            .queue_delay(Operation::FetchPostDetail, Duration::from_millis(millis));
    }

    let profile = ProfileViewState::new(harness.context.clone()).unwrap();
    let (messages, _watch) = watch_messages(profile.core());

    // Remember the clock and the list at the moment loading clears.
    let started = tokio::time::Instant::now();
    let cleared_at = Arc::new(Mutex::new(None));
    let _loading = {
        let (cleared_at, posts) = (Arc::clone(&cleared_at), profile.posts().clone());
        profile.loading().subscribe(move |loading| {
            if !*loading {
                *cleared_at.lock() = Some((
                    tokio::time::Instant::now(),
                    posts.get().unwrap_or_default().len(),
                ));
            }
        })
    };
    *cleared_at.lock() = None;

    profile.fetch_profile();
    assert_eq!(profile.loading().get(), Some(true));
    harness.settle().await;

    let cleared = *cleared_at.lock();
    let (when, posts_then) = cleared.expect("loading never cleared");
    assert!(when - started >= Duration::from_millis(200));
    assert_eq!(posts_then, 2);

    let posts = profile.posts().get().unwrap();
    assert_eq!(posts.ids(), vec!["p1", "p3"]);
    assert_eq!(profile.posts_count().get(), Some(2));
    assert_eq!(profile.state().get(), Some(LoadState::Loaded));
    assert_eq!(harness.repository.call_count(Operation::FetchPostDetail), 3);
    assert_eq!(
        *messages.lock(),
        vec![UserMessage::ServerError {
            status: 500,
            message: "detail unavailable".to_string()
        }]
    );
}

#[tokio::test]
async fn header_fields_come_from_profile() {
    let mut harness = Harness::new();
    let profile = ProfileViewState::new(harness.context.clone()).unwrap();

    profile.fetch_profile();
    harness.settle().await;

    assert_eq!(profile.name().get().as_deref(), Some("Ada"));
    assert_eq!(profile.bio().get(), Some(Some("bridges".to_string())));
    assert_eq!(profile.profile_image().get(), Some(None));
    // No posts: loading ends as soon as the list arrives.
    assert_eq!(profile.state().get(), Some(LoadState::Loaded));
    assert_eq!(profile.posts_count().get(), Some(0));
}

#[tokio::test]
async fn every_detail_failing_ends_in_failed_state() {
    let mut harness = Harness::new();
    harness.seed(post("p1", my_summary(), 30));
    harness.repository.fail(Operation::FetchPostDetail, server_error());

    let profile = ProfileViewState::new(harness.context.clone()).unwrap();
    profile.fetch_profile();
    harness.settle().await;

    assert!(profile.posts().get().unwrap().is_empty());
    assert!(matches!(profile.state().get(), Some(LoadState::Failed { .. })));
    assert_eq!(profile.loading().get(), Some(false));
}

#[tokio::test]
async fn mutating_actions_short_circuit_offline() {
    let mut harness = Harness::new();
    let profile = ProfileViewState::new(harness.context.clone()).unwrap();
    let item = profile.bind_item(post("p1", my_summary(), 30)).unwrap();
    let (profile_messages, _watch_profile) = watch_messages(profile.core());
    let (item_messages, _watch_item) = watch_messages(item.core());

    harness.network.set_connected(false);
    item.on_like_click();
    item.on_delete_click();
    profile.logout();
    harness.settle().await;

    assert_eq!(harness.repository.total_calls(), 0);
    assert_eq!(
        *item_messages.lock(),
        vec![UserMessage::NoConnectivity, UserMessage::NoConnectivity]
    );
    assert_eq!(*profile_messages.lock(), vec![UserMessage::NoConnectivity]);
    assert_eq!(profile.logging_out().get(), Some(false));
    assert!(harness.context.current_user().is_some());
}

#[tokio::test]
async fn logout_clears_user_and_fires_once() {
    let mut harness = Harness::new();
    let profile = ProfileViewState::new(harness.context.clone()).unwrap();
    let (logging_out, _watch) = record(profile.logging_out());

    profile.logout();
    harness.settle().await;

    assert!(harness.context.current_user().is_none());
    assert_eq!(*logging_out.lock(), vec![false, true, false]);

    let fired = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&fired);
    let first = profile.launch_logout().on_event(move |()| *counter.lock() += 1);
    drop(first);
    // A re-attached observer sees the replayed event already consumed.
    let counter = Arc::clone(&fired);
    let _second = profile.launch_logout().on_event(move |()| *counter.lock() += 1);
    assert_eq!(*fired.lock(), 1);
}

#[tokio::test]
async fn unauthorized_forces_logout() {
    let mut harness = Harness::new();
    harness
        .repository
        .fail(Operation::FetchPostList, RepositoryError::Unauthorized);
    let profile = ProfileViewState::new(harness.context.clone()).unwrap();
    let forced = Arc::new(Mutex::new(false));
    let flag = Arc::clone(&forced);
    let _watch = profile
        .core()
        .forced_logout()
        .on_event(move |()| *flag.lock() = true);

    profile.fetch_profile();
    harness.settle().await;

    assert!(*forced.lock());
    assert!(harness.context.current_user().is_none());
    assert_eq!(
        profile.state().get(),
        Some(LoadState::Failed {
            message: UserMessage::SessionExpired
        })
    );
}

#[tokio::test]
async fn records_from_other_screens_patch_list_and_header() {
    let mut harness = Harness::new();
    harness.seed(post("p1", my_summary(), 30));
    harness.seed(post("p2", my_summary(), 20));
    let profile = ProfileViewState::new(harness.context.clone()).unwrap();
    profile.fetch_profile();
    harness.settle().await;

    let bus = harness.context.bus();
    bus.publish(ChangeRecord::NameChanged {
        user_id: ME.to_string(),
        name: "Ada Lovelace".to_string(),
    });
    bus.publish(ChangeRecord::Deleted {
        post_id: "p2".to_string(),
    });
    // Someone else's new post does not belong on my profile.
    bus.publish(ChangeRecord::NewPost(post("f1", friend(), 99)));

    let posts = profile.posts().get().unwrap();
    assert_eq!(posts.ids(), vec!["p1"]);
    assert_eq!(posts.get("p1").unwrap().creator.name, "Ada Lovelace");
    assert_eq!(profile.name().get().as_deref(), Some("Ada Lovelace"));
}

#[tokio::test]
async fn torn_down_screen_ignores_late_completions() {
    let mut harness = Harness::new();
    harness.seed(post("p1", my_summary(), 30));
    harness
        .repository
        .queue_delay(Operation::FetchPostList, Duration::from_millis(20));
    let profile = ProfileViewState::new(harness.context.clone()).unwrap();

    profile.fetch_profile();
    profile.teardown();
    harness.settle().await;

    assert!(profile.posts().get().unwrap().is_empty());
    assert!(profile.name().get().is_none());
    assert_eq!(harness.context.bus().subscriber_count(), 0);
    assert_eq!(harness.context.ui().in_flight(), 0);
}

#[tokio::test]
async fn likes_count_click_opens_liker_list() {
    let mut harness = Harness::new();
    let liked = harness.seed(post("p1", my_summary(), 30).with_liker(friend()));
    let profile = ProfileViewState::new(harness.context.clone()).unwrap();
    let item = profile.bind_item(liked).unwrap();
    let (likers, _watch) = record(profile.launch_liked_by());

    item.on_likes_count_click();
    harness.settle().await;

    let likers = likers.lock();
    assert_eq!(likers.len(), 1);
    assert_eq!(likers[0].peek(), &vec![friend()]);
}

#[tokio::test(start_paused = true)]
async fn failure_from_superseded_round_is_dropped() {
    let mut harness = Harness::new();
    harness.seed(post("p1", my_summary(), 30));
    let profile = ProfileViewState::new(harness.context.clone()).unwrap();
    let (messages, _watch) = watch_messages(profile.core());

    // First round: the list call fails, and only after 100 ms.
    harness
        .repository
        .queue_delay(Operation::FetchPostList, Duration::from_millis(100));
    harness.repository.fail(
        Operation::FetchPostList,
        RepositoryError::Server {
            status: 500,
            message: "x".to_string(),
        },
    );
    profile.fetch_profile();
    // Let the first round's calls reach the repository before lifting the failure.
    tokio::time::sleep(Duration::from_millis(1)).await;
    harness.repository.clear_failure(Operation::FetchPostList);

    // Second round: the list answers at once, its detail after 300 ms.
    harness
        .repository
        .queue_delay(Operation::FetchPostDetail, Duration::from_millis(300));
    profile.fetch_profile();
    harness.settle().await;

    assert_eq!(harness.repository.call_count(Operation::FetchPostList), 2);
    assert_eq!(profile.state().get(), Some(LoadState::Loaded));
    assert_eq!(profile.posts().get().unwrap().ids(), vec!["p1"]);
    assert_eq!(profile.loading().get(), Some(false));
    assert!(messages.lock().is_empty());
}

#[tokio::test(start_paused = true)]
async fn refresh_does_not_end_loading_before_details() {
    let mut harness = Harness::new();
    harness.seed(post("p1", my_summary(), 30));
    harness
        .repository
        .queue_delay(Operation::FetchPostDetail, Duration::from_millis(500));
    let profile = ProfileViewState::new(harness.context.clone()).unwrap();

    let log = Arc::new(Mutex::new(Vec::new()));
    let _loading = {
        let (log, posts) = (Arc::clone(&log), profile.posts().clone());
        profile.loading().subscribe(move |loading| {
            log.lock()
                .push((*loading, posts.get().unwrap_or_default().len()));
        })
    };

    profile.fetch_profile();
    profile.refresh_profile_data();
    assert_eq!(profile.refreshing().get(), Some(true));
    harness.settle().await;

    let log = log.lock();
    // Once raised, loading only drops with the post list in place.
    assert!(log
        .iter()
        .skip_while(|(loading, _)| !loading)
        .all(|&(loading, posts)| loading || posts == 1));
    assert_eq!(log.last(), Some(&(false, 1)));
    assert_eq!(profile.refreshing().get(), Some(false));
    assert_eq!(profile.state().get(), Some(LoadState::Loaded));
    assert_eq!(harness.repository.call_count(Operation::FetchProfile), 2);
}

#[tokio::test]
async fn refresh_failure_leaves_load_state_alone() {
    let mut harness = Harness::new();
    let profile = ProfileViewState::new(harness.context.clone()).unwrap();
    profile.fetch_profile();
    harness.settle().await;
    let (messages, _watch) = watch_messages(profile.core());

    harness
        .repository
        .fail(Operation::FetchProfile, server_error());
    profile.refresh_profile_data();
    harness.settle().await;

    assert_eq!(profile.state().get(), Some(LoadState::Loaded));
    assert_eq!(profile.refreshing().get(), Some(false));
    assert_eq!(profile.name().get().as_deref(), Some("Ada"));
    assert_eq!(messages.lock().len(), 1);
}
