#![forbid(unsafe_code)]

//! Bottom navigation bar.
//!
//! Four fixed destinations. [`NavigationState`] tracks the active one and
//! reports a destination-changed event whenever selection actually moves;
//! [`NavigationBar`] renders titles with their badges.

use crate::badge::{Badge, DEFAULT_MAX_COUNT};
use crate::render::BadgeSlots;
use crate::{Line, Widget};

/// A navigable screen in the bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Destination {
    #[default]
    First,
    Second,
    Third,
    Fourth,
}

impl Destination {
    pub const ALL: [Self; 4] = [Self::First, Self::Second, Self::Third, Self::Fourth];

    /// Position in the bar, from 0.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::First),
            1 => Some(Self::Second),
            2 => Some(Self::Third),
            3 => Some(Self::Fourth),
            _ => None,
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::First => "First",
            Self::Second => "Second",
            Self::Third => "Third",
            Self::Fourth => "Fourth",
        }
    }

    /// Case-insensitive lookup by title.
    #[must_use]
    pub fn from_title(title: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|destination| destination.title().eq_ignore_ascii_case(title))
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// Active destination of the bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationState {
    active: Destination,
}

impl NavigationState {
    #[must_use]
    pub const fn new(active: Destination) -> Self {
        Self { active }
    }

    #[must_use]
    pub const fn active(&self) -> Destination {
        self.active
    }

    /// Select `destination`. Returns it if the selection moved, `None` on
    /// reselection.
    pub fn select(&mut self, destination: Destination) -> Option<Destination> {
        if self.active == destination {
            return None;
        }
        #[cfg(feature = "tracing")]
        Self::log_switch("select", self.active, destination);
        self.active = destination;
        Some(destination)
    }

    /// Move right by one; stays put at the last destination.
    pub fn next(&mut self) -> Option<Destination> {
        let next = Destination::from_index(self.active.index() + 1)?;
        self.select(next)
    }

    /// Move left by one; stays put at the first destination.
    pub fn previous(&mut self) -> Option<Destination> {
        let previous = Destination::from_index(self.active.index().checked_sub(1)?)?;
        self.select(previous)
    }

    #[cfg(feature = "tracing")]
    fn log_switch(reason: &str, from: Destination, to: Destination) {
        tracing::debug!(
            message = "navigation.switch",
            reason,
            from = from.title(),
            to = to.title()
        );
    }
}

/// Renders all destinations with their badges.
///
/// The active destination is bracketed: `[First •] Second  Third 3  Fourth`.
#[derive(Debug, Clone, Copy)]
pub struct NavigationBar<'a> {
    state: NavigationState,
    slots: &'a BadgeSlots,
    max_count: u32,
    separator: &'a str,
}

impl<'a> NavigationBar<'a> {
    #[must_use]
    pub const fn new(state: NavigationState, slots: &'a BadgeSlots) -> Self {
        Self {
            state,
            slots,
            max_count: DEFAULT_MAX_COUNT,
            separator: " ",
        }
    }

    /// Cap passed to every [`Badge`].
    #[must_use]
    pub const fn max_count(mut self, max_count: u32) -> Self {
        self.max_count = max_count;
        self
    }

    #[must_use]
    pub const fn separator(mut self, separator: &'a str) -> Self {
        self.separator = separator;
        self
    }

    fn item_label(&self, destination: Destination) -> String {
        let active = destination == self.state.active();
        let badge = Badge::new(self.slots.get(destination)).with_max_count(self.max_count);
        let mut out = String::new();
        out.push(if active { '[' } else { ' ' });
        out.push_str(destination.title());
        let label = badge.label();
        if !label.is_empty() {
            out.push(' ');
            out.push_str(&label);
        }
        out.push(if active { ']' } else { ' ' });
        out
    }
}

impl Widget for NavigationBar<'_> {
    fn render(&self, line: &mut Line) {
        for (i, destination) in Destination::ALL.into_iter().enumerate() {
            if i > 0 {
                line.push_str(self.separator);
            }
            line.push_str(&self.item_label(destination));
        }
    }

    fn width(&self) -> u16 {
        let mut line = Line::unbounded();
        self.render(&mut line);
        line.width()
    }
}
