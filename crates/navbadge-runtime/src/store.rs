#![forbid(unsafe_code)]

//! Single-threaded badge store.
//!
//! [`BadgeStore`] holds the current [`BadgeState`] in an [`Observable`] and
//! publishes a fresh snapshot after every operation. Handles are cheap to
//! clone and share the same state, so the UI layer can hand one to its
//! navigation listener and another to its action handlers.
//!
//! # Publication
//!
//! Every operation publishes, including redundant ones such as showing an
//! already-visible badge. Nothing is coalesced: each subscriber sees every
//! snapshot in the order it was produced.
//!
//! # Subscribing
//!
//! [`BadgeStore::subscribe`] delivers the current snapshot synchronously and
//! then every later one. A late subscriber never sees snapshots published
//! before it subscribed.
//!
//! ```
//! use navbadge_runtime::{BadgeState, BadgeStore};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let store = BadgeStore::new();
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&seen);
//! let _sub = store.subscribe(move |state| sink.borrow_mut().push(*state));
//!
//! store.increase_large_badge();
//! store.clear_large_badge();
//!
//! assert_eq!(
//!     *seen.borrow(),
//!     vec![BadgeState::new(false, 0), BadgeState::new(false, 1), BadgeState::new(false, 0)]
//! );
//! ```

use crate::reactive::{Computed, Observable, Subscription};
use crate::state::{BadgeAction, BadgeState};

/// Owner of the badge state for one UI session.
#[derive(Clone, Debug, Default)]
pub struct BadgeStore {
    state: Observable<BadgeState>,
}

impl BadgeStore {
    /// Store starting from [`BadgeState::INITIAL`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_state(BadgeState::INITIAL)
    }

    /// Store starting from a previously saved snapshot.
    #[must_use]
    pub fn with_state(state: BadgeState) -> Self {
        Self {
            state: Observable::new(state),
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn state(&self) -> BadgeState {
        self.state.get()
    }

    /// Number of snapshots published since construction.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.state.version()
    }

    /// Live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state.subscriber_count()
    }

    /// Call `observer` with the current snapshot now and with every later
    /// one until the returned [`Subscription`] is dropped.
    ///
    /// The observer is registered before its first call, so anything it
    /// dispatches from there also reaches it. Subscribing from inside another
    /// observer while snapshots are queued delivers those queued snapshots
    /// instead, ending at the current one.
    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn subscribe(&self, observer: impl Fn(&BadgeState) + 'static) -> Subscription {
        let sub = self.state.subscribe_with_current(observer);
        tracing::debug!(
            subscribers = self.subscriber_count(),
            version = self.version(),
            "badge store subscribed"
        );
        sub
    }

    /// Apply `action` to the current snapshot and publish the result.
    pub fn dispatch(&self, action: BadgeAction) {
        let previous = self.state();
        let next = action.apply(previous);
        tracing::trace!(
            action = action.as_str(),
            small_badge_visible = next.small_badge_visible(),
            large_badge_number = next.large_badge_number(),
            changed = previous != next,
            "badge store dispatch"
        );
        self.state.publish(next);
    }

    pub fn show_small_badge(&self) {
        self.dispatch(BadgeAction::ShowSmallBadge);
    }

    pub fn hide_small_badge(&self) {
        self.dispatch(BadgeAction::HideSmallBadge);
    }

    pub fn increase_large_badge(&self) {
        self.dispatch(BadgeAction::IncreaseLargeBadge);
    }

    pub fn clear_large_badge(&self) {
        self.dispatch(BadgeAction::ClearLargeBadge);
    }

    /// Memoized visibility of the numeric badge.
    #[must_use]
    pub fn large_badge_visible(&self) -> Computed<bool> {
        Computed::from_observable(&self.state, BadgeState::large_badge_visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(store: &BadgeStore) -> (Rc<RefCell<Vec<BadgeState>>>, Subscription) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let sub = store.subscribe(move |state| sink.borrow_mut().push(*state));
        (seen, sub)
    }

    #[test]
    fn starts_hidden() {
        let store = BadgeStore::new();
        assert_eq!(store.state(), BadgeState::new(false, 0));
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn increase_then_clear() {
        let store = BadgeStore::new();
        for _ in 0..3 {
            store.increase_large_badge();
        }
        assert_eq!(store.state().large_badge_number(), 3);
        store.clear_large_badge();
        assert_eq!(store.state(), BadgeState::new(false, 0));
    }

    #[test]
    fn show_hide_increase() {
        let store = BadgeStore::new();
        store.show_small_badge();
        store.hide_small_badge();
        store.increase_large_badge();
        assert_eq!(store.state(), BadgeState::new(false, 1));
    }

    #[test]
    fn repeated_show_stays_visible_and_publishes() {
        let store = BadgeStore::new();
        let (seen, _sub) = recorder(&store);
        store.show_small_badge();
        store.show_small_badge();
        store.show_small_badge();

        assert!(store.state().small_badge_visible());
        assert_eq!(seen.borrow().len(), 4);
        assert_eq!(store.version(), 3);
    }

    #[test]
    fn subscriber_gets_current_state_first() {
        let store = BadgeStore::new();
        store.increase_large_badge();
        store.show_small_badge();
        store.increase_large_badge();

        let (seen, _sub) = recorder(&store);
        assert_eq!(*seen.borrow(), vec![BadgeState::new(true, 2)]);

        store.hide_small_badge();
        assert_eq!(
            *seen.borrow(),
            vec![BadgeState::new(true, 2), BadgeState::new(false, 2)]
        );
    }

    #[test]
    fn subscribers_see_the_same_sequence() {
        let store = BadgeStore::new();
        let (a, _sub_a) = recorder(&store);
        let (b, _sub_b) = recorder(&store);

        store.increase_large_badge();
        store.show_small_badge();
        store.clear_large_badge();

        assert_eq!(*a.borrow(), *b.borrow());
        assert_eq!(a.borrow().len(), 4);
    }

    #[test]
    fn dropped_subscription_stops_delivery() {
        let store = BadgeStore::new();
        let (seen, sub) = recorder(&store);
        assert_eq!(store.subscriber_count(), 1);

        drop(sub);
        assert_eq!(store.subscriber_count(), 0);
        store.increase_large_badge();
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn clones_share_state() {
        let store = BadgeStore::new();
        let handle = store.clone();
        handle.increase_large_badge();
        assert_eq!(store.state().large_badge_number(), 1);
    }

    #[test]
    fn restore_from_snapshot() {
        let store = BadgeStore::with_state(BadgeState::new(true, 12));
        store.increase_large_badge();
        assert_eq!(store.state(), BadgeState::new(true, 13));
    }

    #[test]
    fn derived_visibility_follows_count() {
        let store = BadgeStore::new();
        let visible = store.large_badge_visible();
        assert!(!visible.get());

        store.increase_large_badge();
        assert!(visible.get());

        store.clear_large_badge();
        assert!(!visible.get());
    }

    #[test]
    fn observer_may_dispatch() {
        let store = BadgeStore::new();
        let writer = store.clone();
        let _auto_hide = store.subscribe(move |state| {
            if state.small_badge_visible() && state.large_badge_number() > 0 {
                writer.hide_small_badge();
            }
        });
        let (seen, _sub) = recorder(&store);

        store.show_small_badge();
        store.increase_large_badge();

        assert_eq!(
            *seen.borrow(),
            vec![
                BadgeState::new(false, 0),
                BadgeState::new(true, 0),
                BadgeState::new(true, 1),
                BadgeState::new(false, 1),
            ]
        );
    }

    #[test]
    fn observer_dispatching_on_first_state_sees_the_result() {
        let store = BadgeStore::new();
        let (first, _first_sub) = recorder(&store);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let writer = store.clone();
        let _bumper = store.subscribe(move |state| {
            sink.borrow_mut().push(*state);
            if state.large_badge_number() == 0 {
                writer.increase_large_badge();
            }
        });

        let expected = vec![BadgeState::new(false, 0), BadgeState::new(false, 1)];
        assert_eq!(*first.borrow(), expected);
        assert_eq!(*seen.borrow(), expected);
        assert_eq!(seen.borrow().last().copied(), Some(store.state()));
    }

    #[test]
    fn subscribing_while_snapshots_are_queued_delivers_each_once() {
        let store = BadgeStore::with_state(BadgeState::new(true, 0));
        let writer = store.clone();
        let _bump = store.subscribe(move |state| {
            if *state == BadgeState::new(true, 0) && writer.version() == 1 {
                writer.increase_large_badge();
            }
        });

        let late = Rc::new(RefCell::new(Vec::new()));
        let keep = Rc::new(RefCell::new(Vec::new()));
        let joiner = store.clone();
        let late_sink = Rc::clone(&late);
        let keep_sink = Rc::clone(&keep);
        let _join = store.subscribe(move |_| {
            if joiner.version() == 2 && keep_sink.borrow().is_empty() {
                let sink = Rc::clone(&late_sink);
                let sub = joiner.subscribe(move |state| sink.borrow_mut().push(*state));
                keep_sink.borrow_mut().push(sub);
            }
        });

        store.show_small_badge();
        assert_eq!(*late.borrow(), vec![BadgeState::new(true, 1)]);
        assert_eq!(store.state(), BadgeState::new(true, 1));

        store.hide_small_badge();
        assert_eq!(
            *late.borrow(),
            vec![BadgeState::new(true, 1), BadgeState::new(false, 1)]
        );
    }
}
