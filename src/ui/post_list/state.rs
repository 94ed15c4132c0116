use std::sync::Arc;

use crate::model::Post;
use crate::ui::mvi::UiState;

/// Immutable snapshot of an ordered post collection.
///
/// Newest first by creation time; no two entries share an id. Every
/// change produces a new snapshot; clones share the same storage.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PostList(Arc<Vec<Post>>);

impl UiState for PostList {}

impl PostList {
    /// Build a snapshot from posts in any order.
    ///
    /// Later duplicates of an id are dropped.
    pub fn new(posts: Vec<Post>) -> Self {
        let mut unique: Vec<Post> = Vec::with_capacity(posts.len());
        for post in posts {
            if !unique.iter().any(|kept| kept.id == post.id) {
                unique.push(post);
            }
        }
        unique.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self(Arc::new(unique))
    }

    /// Wrap posts already in display order. Caller guarantees unique ids.
    pub(crate) fn from_ordered(posts: Vec<Post>) -> Self {
        Self(Arc::new(posts))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Post> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Post] {
        &self.0
    }

    pub fn get(&self, post_id: &str) -> Option<&Post> {
        self.0.iter().find(|post| post.id == post_id)
    }

    pub fn contains(&self, post_id: &str) -> bool {
        self.get(post_id).is_some()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.0.iter().map(|post| post.id.as_str()).collect()
    }

    pub fn first(&self) -> Option<&Post> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&Post> {
        self.0.last()
    }

    /// Same storage, not just equal contents.
    pub fn ptr_eq(&self, other: &PostList) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<'a> IntoIterator for &'a PostList {
    type Item = &'a Post;
    type IntoIter = std::slice::Iter<'a, Post>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
