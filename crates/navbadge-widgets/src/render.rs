#![forbid(unsafe_code)]

//! Badge renderers.
//!
//! A renderer is the store's consumer: it receives every published
//! [`BadgeState`] and updates two fixed slots, the dot on
//! [`Destination::First`] and the count on [`Destination::Third`].

use navbadge_runtime::BadgeState;

use crate::badge::{BadgeSlot, DEFAULT_MAX_COUNT};
use crate::nav::{Destination, NavigationBar, NavigationState};
use crate::{Line, Widget};

/// Receives badge snapshots from a store subscription.
pub trait BadgeRenderer {
    /// Show `slot` on `destination`.
    fn set_badge(&mut self, destination: Destination, slot: BadgeSlot);

    /// Apply a full snapshot to the two badge slots.
    fn paint(&mut self, state: &BadgeState) {
        self.set_badge(Destination::First, BadgeSlot::small(state));
        self.set_badge(Destination::Third, BadgeSlot::large(state));
    }
}

/// One slot per destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BadgeSlots {
    slots: [BadgeSlot; 4],
}

impl BadgeSlots {
    #[must_use]
    pub const fn get(&self, destination: Destination) -> BadgeSlot {
        self.slots[destination.index()]
    }
}

impl BadgeRenderer for BadgeSlots {
    fn set_badge(&mut self, destination: Destination, slot: BadgeSlot) {
        self.slots[destination.index()] = slot;
    }
}

/// Paints the navigation bar as a line of text.
#[derive(Debug, Clone)]
pub struct TextRenderer {
    slots: BadgeSlots,
    max_count: u32,
    max_width: u16,
    frames: u64,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRenderer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: BadgeSlots {
                slots: [BadgeSlot::Hidden; 4],
            },
            max_count: DEFAULT_MAX_COUNT,
            max_width: u16::MAX,
            frames: 0,
        }
    }

    /// Largest count shown verbatim.
    #[must_use]
    pub const fn with_max_count(mut self, max_count: u32) -> Self {
        self.max_count = max_count;
        self
    }

    /// Truncate rendered lines to `max_width` cells.
    #[must_use]
    pub const fn with_max_width(mut self, max_width: u16) -> Self {
        self.max_width = max_width;
        self
    }

    #[must_use]
    pub const fn slots(&self) -> &BadgeSlots {
        &self.slots
    }

    /// Snapshots painted so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Render the bar with `navigation`'s active destination.
    #[must_use]
    pub fn render_line(&self, navigation: NavigationState) -> String {
        let mut line = Line::new(self.max_width);
        NavigationBar::new(navigation, &self.slots)
            .max_count(self.max_count)
            .render(&mut line);
        line.into_string()
    }
}

impl BadgeRenderer for TextRenderer {
    fn set_badge(&mut self, destination: Destination, slot: BadgeSlot) {
        self.slots.set_badge(destination, slot);
    }

    fn paint(&mut self, state: &BadgeState) {
        self.slots.paint(state);
        self.frames += 1;
    }
}
