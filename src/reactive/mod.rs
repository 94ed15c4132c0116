//! Observable state primitives.
//!
//! ```text
//! Observable ──map──→ Derived ──subscribe──→ view
//!      │
//!      └── Observable<Event<T>> ──on_event──→ handled once
//! ```
//!
//! Everything here is generic and composed by the screens; there is no
//! base view-model type.

mod derived;
mod disposables;
mod event;
mod observable;

pub use derived::{map, map2, map_all, Derived};
pub use disposables::{AliveToken, Disposable, Disposables};
pub use event::Event;
pub use observable::{Callback, Observable, Subscription};
