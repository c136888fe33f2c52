#![forbid(unsafe_code)]

//! navbadge public facade crate.
//!
//! Re-exports the badge store and the navigation widgets under one roof.

pub mod prelude {
    pub use navbadge_runtime as runtime;
    pub use navbadge_widgets as widgets;

    pub use navbadge_runtime::{
        BadgeAction, BadgeState, BadgeStore, SharedBadgeStore, Subscription,
    };
    pub use navbadge_widgets::{BadgeRenderer, Destination, NavigationState, TextRenderer};
}
