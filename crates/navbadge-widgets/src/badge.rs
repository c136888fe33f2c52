#![forbid(unsafe_code)]

//! Badge widget.
//!
//! A badge is either a presence dot or a count attached to a navigation
//! destination. Counts above the badge's `max_count` render as `"{max}+"`;
//! the cap is a display concern only and never feeds back into the store.
//!
//! Design goals:
//! - Deterministic output (stable formatting + truncation)
//! - Hidden badges render nothing and have zero width

use std::borrow::Cow;

use navbadge_runtime::BadgeState;

use crate::{Line, Widget, display_width};

/// Largest count rendered verbatim by default.
pub const DEFAULT_MAX_COUNT: u32 = 99;

/// What a single badge slot currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BadgeSlot {
    #[default]
    Hidden,
    Dot,
    Count(u32),
}

impl BadgeSlot {
    /// Slot for the dot badge on the first destination.
    #[must_use]
    pub const fn small(state: &BadgeState) -> Self {
        if state.small_badge_visible() {
            Self::Dot
        } else {
            Self::Hidden
        }
    }

    /// Slot for the numeric badge on the third destination. Hidden at zero.
    #[must_use]
    pub const fn large(state: &BadgeState) -> Self {
        if state.large_badge_visible() {
            Self::Count(state.large_badge_number())
        } else {
            Self::Hidden
        }
    }

    #[must_use]
    pub const fn is_visible(self) -> bool {
        !matches!(self, Self::Hidden | Self::Count(0))
    }
}

/// Renders a [`BadgeSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Badge<'a> {
    slot: BadgeSlot,
    max_count: u32,
    dot: &'a str,
}

impl<'a> Badge<'a> {
    #[must_use]
    pub const fn new(slot: BadgeSlot) -> Self {
        Self {
            slot,
            max_count: DEFAULT_MAX_COUNT,
            dot: "•",
        }
    }

    /// Set the largest count shown verbatim. Values above it render as
    /// `"{max_count}+"`.
    #[must_use]
    pub const fn with_max_count(mut self, max_count: u32) -> Self {
        self.max_count = max_count;
        self
    }

    /// Set the glyph used for the presence dot.
    #[must_use]
    pub const fn with_dot(mut self, dot: &'a str) -> Self {
        self.dot = dot;
        self
    }

    /// Text this badge renders, empty when hidden.
    #[must_use]
    pub fn label(&self) -> Cow<'a, str> {
        match self.slot {
            BadgeSlot::Hidden | BadgeSlot::Count(0) => Cow::Borrowed(""),
            BadgeSlot::Dot => Cow::Borrowed(self.dot),
            BadgeSlot::Count(n) if n > self.max_count => {
                Cow::Owned(format!("{}+", self.max_count))
            }
            BadgeSlot::Count(n) => Cow::Owned(n.to_string()),
        }
    }
}

impl Widget for Badge<'_> {
    fn render(&self, line: &mut Line) {
        line.push_str(&self.label());
    }

    fn width(&self) -> u16 {
        display_width(&self.label())
    }
}
