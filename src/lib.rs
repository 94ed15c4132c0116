//! Reactive view-state core of a photo-sharing client.
//!
//! ```text
//!   worker tasks ──completions──→ UiLoop
//!                                   │
//!   Observable / Derived / Event ←──┤ screens ──publish──→ NotificationBus
//!                                   │                          │
//!                     PostList reconcile ←──── records ────────┘
//! ```

pub mod bus;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod model;
pub mod reactive;
pub mod services;
pub mod simulation;
pub mod ui;
