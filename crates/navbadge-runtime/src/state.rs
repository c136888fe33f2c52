#![forbid(unsafe_code)]

//! Badge state snapshots and the actions that transform them.
//!
//! [`BadgeState`] is an immutable `Copy` value. Stores never edit it in
//! place: every [`BadgeAction`] maps the current snapshot to a new one via
//! [`BadgeAction::apply`], and the store publishes the result.
//!
//! The two badges are independent state machines packed into one record:
//!
//! - small badge: `hidden | visible`, starts hidden;
//! - large badge: a `u32` counter, starts at 0. Its visibility is derived
//!   (`number > 0`) and never stored.

/// Immutable snapshot of both badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "state-persistence",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct BadgeState {
    small_badge_visible: bool,
    large_badge_number: u32,
}

impl BadgeState {
    /// Both badges hidden.
    pub const INITIAL: Self = Self::new(false, 0);

    #[must_use]
    pub const fn new(small_badge_visible: bool, large_badge_number: u32) -> Self {
        Self {
            small_badge_visible,
            large_badge_number,
        }
    }

    /// Whether the dot badge is shown.
    #[must_use]
    pub const fn small_badge_visible(&self) -> bool {
        self.small_badge_visible
    }

    /// Count on the numeric badge.
    #[must_use]
    pub const fn large_badge_number(&self) -> u32 {
        self.large_badge_number
    }

    /// The numeric badge is shown iff its count is positive.
    #[must_use]
    pub const fn large_badge_visible(&self) -> bool {
        self.large_badge_number > 0
    }

    #[must_use]
    const fn with_small_badge(self, visible: bool) -> Self {
        Self::new(visible, self.large_badge_number)
    }

    #[must_use]
    const fn with_large_badge(self, number: u32) -> Self {
        Self::new(self.small_badge_visible, number)
    }
}

/// One of the four operations a store accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeAction {
    ShowSmallBadge,
    HideSmallBadge,
    /// Saturates at `u32::MAX`.
    IncreaseLargeBadge,
    ClearLargeBadge,
}

impl BadgeAction {
    pub const ALL: [Self; 4] = [
        Self::ShowSmallBadge,
        Self::HideSmallBadge,
        Self::IncreaseLargeBadge,
        Self::ClearLargeBadge,
    ];

    /// The snapshot that follows `state`.
    #[must_use]
    pub const fn apply(self, state: BadgeState) -> BadgeState {
        match self {
            Self::ShowSmallBadge => state.with_small_badge(true),
            Self::HideSmallBadge => state.with_small_badge(false),
            Self::IncreaseLargeBadge => {
                state.with_large_badge(state.large_badge_number.saturating_add(1))
            }
            Self::ClearLargeBadge => state.with_large_badge(0),
        }
    }

    /// Stable name used in log events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ShowSmallBadge => "show_small_badge",
            Self::HideSmallBadge => "hide_small_badge",
            Self::IncreaseLargeBadge => "increase_large_badge",
            Self::ClearLargeBadge => "clear_large_badge",
        }
    }
}

impl std::fmt::Display for BadgeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_is_default() {
        assert_eq!(BadgeState::default(), BadgeState::INITIAL);
        assert!(!BadgeState::INITIAL.small_badge_visible());
        assert_eq!(BadgeState::INITIAL.large_badge_number(), 0);
        assert!(!BadgeState::INITIAL.large_badge_visible());
    }

    #[test]
    fn small_badge_transitions() {
        let shown = BadgeAction::ShowSmallBadge.apply(BadgeState::INITIAL);
        assert!(shown.small_badge_visible());
        assert_eq!(BadgeAction::ShowSmallBadge.apply(shown), shown);

        let hidden = BadgeAction::HideSmallBadge.apply(shown);
        assert_eq!(hidden, BadgeState::INITIAL);
        assert_eq!(BadgeAction::HideSmallBadge.apply(hidden), hidden);
    }

    #[test]
    fn large_badge_transitions() {
        let state = BadgeState::new(true, 4);
        let bumped = BadgeAction::IncreaseLargeBadge.apply(state);
        assert_eq!(bumped, BadgeState::new(true, 5));
        assert!(bumped.large_badge_visible());

        let cleared = BadgeAction::ClearLargeBadge.apply(bumped);
        assert_eq!(cleared, BadgeState::new(true, 0));
        assert!(!cleared.large_badge_visible());
    }

    #[test]
    fn increase_saturates() {
        let full = BadgeState::new(false, u32::MAX);
        assert_eq!(BadgeAction::IncreaseLargeBadge.apply(full), full);
    }

    #[test]
    fn actions_leave_the_other_badge_alone() {
        let state = BadgeState::new(true, 7);
        assert!(BadgeAction::ClearLargeBadge.apply(state).small_badge_visible());
        assert_eq!(
            BadgeAction::HideSmallBadge
                .apply(state)
                .large_badge_number(),
            7
        );
    }

    #[test]
    fn action_names() {
        let names: Vec<_> = BadgeAction::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(
            names,
            [
                "show_small_badge",
                "hide_small_badge",
                "increase_large_badge",
                "clear_large_badge"
            ]
        );
    }

    #[cfg(feature = "state-persistence")]
    #[test]
    fn serde_field_names() {
        let json = serde_json::to_string(&BadgeState::new(true, 3)).unwrap();
        assert_eq!(json, r#"{"small_badge_visible":true,"large_badge_number":3}"#);
        let back: BadgeState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, BadgeState::new(true, 3));
    }
}
