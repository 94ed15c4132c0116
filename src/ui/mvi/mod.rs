//! Model-View-Intent primitives shared by the screens.
//!
//! # Architecture
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ Observable ──→ View
//!    ↑                                            │
//!    └──── repository completions, bus records ───┘
//! ```
//!
//! - **State**: immutable snapshot held in an [`Observable`](crate::reactive::Observable)
//! - **Intent**: user action, repository completion or bus record
//! - **Reducer**: pure `(State, Intent) -> State`

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::{dispatch, Reducer};
pub use state::UiState;
