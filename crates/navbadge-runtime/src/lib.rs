#![forbid(unsafe_code)]

//! Badge state store for a bottom navigation bar.
//!
//! Two badges are tracked: a dot on the first destination and a counter on
//! the third. [`BadgeStore`] is the single-threaded store a UI session owns;
//! [`SharedBadgeStore`] serializes the same operations for multi-threaded
//! callers. Both publish an immutable [`BadgeState`] after every operation.

pub mod reactive;
pub mod shared;
pub mod state;
pub mod store;

pub use reactive::{Computed, Observable, Subscription};
pub use shared::{SharedBadgeStore, SharedSubscription};
pub use state::{BadgeAction, BadgeState};
pub use store::BadgeStore;
