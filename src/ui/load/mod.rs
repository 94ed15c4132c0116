mod intent;
mod reducer;
mod state;

pub use intent::LoadIntent;
pub use reducer::LoadReducer;
pub use state::LoadState;
