use crate::model::{ChangeRecord, Post};
use crate::ui::mvi::Intent;

#[derive(Debug, Clone)]
pub enum PostListIntent {
    /// Patch the collection with a change record.
    Apply(ChangeRecord),
    /// Replace everything with a freshly fetched set.
    Replace(Vec<Post>),
    /// Append an older page, skipping ids already present.
    AppendPage(Vec<Post>),
}

impl Intent for PostListIntent {}
