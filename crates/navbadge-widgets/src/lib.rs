#![forbid(unsafe_code)]

//! Navigation bar and badge widgets for navbadge.
//!
//! Widgets render into a width-bounded [`Line`] of text. The
//! [`render::TextRenderer`] subscribes to a badge store and repaints the two
//! badge slots on every published state.

pub mod badge;
pub mod nav;
pub mod render;

pub use badge::{Badge, BadgeSlot, DEFAULT_MAX_COUNT};
pub use nav::{Destination, NavigationBar, NavigationState};
pub use render::{BadgeRenderer, BadgeSlots, TextRenderer};

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// A `Widget` renders itself onto a [`Line`].
pub trait Widget {
    /// Append this widget to `line`, truncating at the line's width.
    fn render(&self, line: &mut Line);

    /// Display width in terminal cells when rendered untruncated.
    fn width(&self) -> u16;
}

/// A single line of text with a maximum display width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    text: String,
    width: u16,
    max_width: u16,
}

impl Line {
    #[must_use]
    pub fn new(max_width: u16) -> Self {
        Self {
            text: String::new(),
            width: 0,
            max_width,
        }
    }

    #[must_use]
    pub fn unbounded() -> Self {
        Self::new(u16::MAX)
    }

    /// Append `content` grapheme by grapheme. Stops before the first
    /// grapheme that would overflow; a wide grapheme is never split.
    ///
    /// Returns the number of cells written.
    pub fn push_str(&mut self, content: &str) -> u16 {
        let start = self.width;
        for grapheme in content.graphemes(true) {
            let w = grapheme_width(grapheme);
            if self.width.saturating_add(w) > self.max_width {
                break;
            }
            self.text.push_str(grapheme);
            self.width += w;
        }
        self.width - start
    }

    /// Append `n` spaces, clipped to the remaining width.
    pub fn push_spaces(&mut self, n: u16) -> u16 {
        let n = n.min(self.remaining());
        self.text.extend(std::iter::repeat_n(' ', usize::from(n)));
        self.width += n;
        n
    }

    /// Cells used so far.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub const fn remaining(&self) -> u16 {
        self.max_width.saturating_sub(self.width)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

fn grapheme_width(grapheme: &str) -> u16 {
    u16::try_from(UnicodeWidthStr::width(grapheme)).unwrap_or(u16::MAX)
}

/// Display width of `text` in cells.
#[must_use]
pub fn display_width(text: &str) -> u16 {
    text.graphemes(true)
        .map(grapheme_width)
        .fold(0u16, u16::saturating_add)
}
