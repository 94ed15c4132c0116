//! Ordered post collections and their reconciliation.

mod intent;
mod reducer;
mod state;

pub use intent::PostListIntent;
pub use reducer::{reconcile, PostListReducer};
pub use state::PostList;
