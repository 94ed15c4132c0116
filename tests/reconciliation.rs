mod common;

use std::collections::HashSet;

use common::{friend, my_summary, post, summary, ME};
use photostate::model::{ChangeRecord, Post};
use photostate::ui::mvi::Reducer;
use photostate::ui::post_list::{reconcile, PostList, PostListIntent, PostListReducer};

fn assert_invariants(list: &PostList) {
    let ids: HashSet<&str> = list.iter().map(|post| post.id.as_str()).collect();
    assert_eq!(ids.len(), list.len(), "duplicate ids in {:?}", list.ids());
}

fn assert_sorted_newest_first(list: &PostList) {
    let times: Vec<_> = list.iter().map(|post| post.created_at).collect();
    let mut sorted = times.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(times, sorted, "not newest first: {:?}", list.ids());
}

fn three_posts() -> PostList {
    PostList::new(vec![
        post("p1", my_summary(), 30),
        post("p2", friend(), 20),
        post("p3", my_summary(), 10),
    ])
}

#[test]
fn deleted_and_like_toggled_are_idempotent() {
    let liked = post("p2", friend(), 20).with_liker(my_summary());
    let records = [
        ChangeRecord::Deleted {
            post_id: "p1".to_string(),
        },
        ChangeRecord::LikeToggled(liked),
    ];

    for record in &records {
        let once = reconcile(&three_posts(), record);
        let twice = reconcile(&once, record);
        assert_eq!(once, twice, "{} applied twice differs", record.kind());
    }
}

#[test]
fn order_invariant_holds_across_mixed_sequence() {
    let sequence = vec![
        ChangeRecord::NewPost(post("n1", friend(), 25)),
        ChangeRecord::NewPost(post("n2", my_summary(), 5)),
        ChangeRecord::NewPost(post("n1", friend(), 25)),
        ChangeRecord::Deleted {
            post_id: "p2".to_string(),
        },
        ChangeRecord::LikeToggled(post("p3", my_summary(), 10).with_liker(friend())),
        ChangeRecord::NewPost(post("n3", friend(), 40)),
        ChangeRecord::NameChanged {
            user_id: ME.to_string(),
            name: "Ada L.".to_string(),
        },
        ChangeRecord::NewPost(post("n4", friend(), 15)),
    ];

    let mut list = three_posts();
    for record in sequence {
        let is_new_post = matches!(record, ChangeRecord::NewPost(_));
        list = reconcile(&list, &record);
        assert_invariants(&list);
        if is_new_post {
            assert_sorted_newest_first(&list);
        }
    }
    assert_eq!(list.ids(), vec!["n3", "p1", "n1", "n4", "p3", "n2"]);
}

#[test]
fn name_change_repairs_exactly_the_creators_posts() {
    let before = three_posts();
    let after = reconcile(
        &before,
        &ChangeRecord::NameChanged {
            user_id: ME.to_string(),
            name: "new".to_string(),
        },
    );

    let renamed: Vec<&Post> = after.iter().filter(|post| post.creator.name == "new").collect();
    assert_eq!(renamed.len(), 2);
    assert!(renamed.iter().all(|post| post.creator.id == ME));

    for (old, new) in before.iter().zip(after.iter()) {
        assert_eq!(old.id, new.id);
        assert_eq!(old.image_url, new.image_url);
        assert_eq!(old.liked_by, new.liked_by);
        assert_eq!(old.created_at, new.created_at);
        assert_eq!(old.creator.id, new.creator.id);
        assert_eq!(old.creator.profile_pic_url, new.creator.profile_pic_url);
    }
    assert_eq!(after.get("p2"), before.get("p2"));
}

#[test]
fn unrelated_records_keep_the_same_snapshot() {
    let list = three_posts();
    let records = [
        ChangeRecord::Deleted {
            post_id: "nope".to_string(),
        },
        ChangeRecord::LikeToggled(post("nope", friend(), 1)),
        ChangeRecord::NameChanged {
            user_id: "someone-else".to_string(),
            name: "X".to_string(),
        },
        ChangeRecord::ProfileImageChanged {
            user_id: "someone-else".to_string(),
            profile_pic_url: "https://img/x.png".to_string(),
        },
    ];
    for record in &records {
        assert!(reconcile(&list, record).ptr_eq(&list), "{}", record.kind());
    }
}

#[test]
fn reducer_routes_apply_through_reconcile() {
    let list = PostListReducer::reduce(
        three_posts(),
        PostListIntent::Apply(ChangeRecord::NewPost(post(
            "p0",
            summary("u-3", "Linus"),
            99,
        ))),
    );
    assert_eq!(list.ids(), vec!["p0", "p1", "p2", "p3"]);
}
