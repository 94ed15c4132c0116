use crate::model::{ChangeRecord, Post};
use crate::ui::mvi::Reducer;
use crate::ui::post_list::intent::PostListIntent;
use crate::ui::post_list::state::PostList;

pub struct PostListReducer;

impl Reducer for PostListReducer {
    type State = PostList;
    type Intent = PostListIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            PostListIntent::Apply(record) => reconcile(&state, &record),
            PostListIntent::Replace(posts) => PostList::new(posts),
            PostListIntent::AppendPage(page) => {
                let mut posts = state.as_slice().to_vec();
                let before = posts.len();
                for post in page {
                    if !posts.iter().any(|known| known.id == post.id) {
                        posts.push(post);
                    }
                }
                if posts.len() == before {
                    return state;
                }
                PostList::from_ordered(posts)
            }
        }
    }
}

/// Apply one change record to `list`.
///
/// Never mutates `list`. When the record does not touch any entry the
/// same snapshot is returned, so applying a record twice is the same as
/// applying it once.
pub fn reconcile(list: &PostList, record: &ChangeRecord) -> PostList {
    let patched = match record {
        ChangeRecord::NewPost(post) => insert_newest(list, post),
        ChangeRecord::LikeToggled(post) => replace_by_id(list, post),
        ChangeRecord::Deleted { post_id } => remove_by_id(list, post_id),
        ChangeRecord::NameChanged { user_id, name } => {
            repair_creator(list, user_id, |post| post.creator.name != *name, |post| {
                post.with_creator_name(name)
            })
        }
        ChangeRecord::ProfileImageChanged {
            user_id,
            profile_pic_url,
        } => repair_creator(
            list,
            user_id,
            |post| post.creator.profile_pic_url.as_deref() != Some(profile_pic_url.as_str()),
            |post| post.with_creator_profile_pic(profile_pic_url),
        ),
    };

    match patched {
        Some(posts) => {
            tracing::debug!(kind = record.kind(), len = posts.len(), "post list reconciled");
            PostList::from_ordered(posts)
        }
        None => list.clone(),
    }
}

fn insert_newest(list: &PostList, post: &Post) -> Option<Vec<Post>> {
    if list.contains(&post.id) {
        return None;
    }
    let mut posts = Vec::with_capacity(list.len() + 1);
    posts.push(post.clone());
    posts.extend(list.iter().cloned());
    // Stable: equal timestamps keep the new post in front.
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Some(posts)
}

fn replace_by_id(list: &PostList, post: &Post) -> Option<Vec<Post>> {
    let index = list.iter().position(|existing| existing.id == post.id)?;
    if list.as_slice()[index] == *post {
        return None;
    }
    let mut posts = list.as_slice().to_vec();
    posts[index] = post.clone();
    Some(posts)
}

fn remove_by_id(list: &PostList, post_id: &str) -> Option<Vec<Post>> {
    if !list.contains(post_id) {
        return None;
    }
    Some(
        list.iter()
            .filter(|post| post.id != post_id)
            .cloned()
            .collect(),
    )
}

/// Rewrite the creator field of every post by `user_id` that is stale.
fn repair_creator(
    list: &PostList,
    user_id: &str,
    is_stale: impl Fn(&Post) -> bool,
    repair: impl Fn(&Post) -> Post,
) -> Option<Vec<Post>> {
    let needs_repair = |post: &Post| post.creator.id == user_id && is_stale(post);
    if !list.iter().any(|post| needs_repair(post)) {
        return None;
    }
    Some(
        list.iter()
            .map(|post| {
                if needs_repair(post) {
                    repair(post)
                } else {
                    post.clone()
                }
            })
            .collect(),
    )
}
