#![forbid(unsafe_code)]

//! Thread-safe badge store.
//!
//! [`SharedBadgeStore`] offers the same contract as
//! [`BadgeStore`](crate::BadgeStore) for callers that mutate from several
//! threads.
//!
//! # Design
//!
//! - Reads load an `ArcSwap` snapshot and never block.
//! - Writers take the `writer` mutex for the whole read-modify-publish
//!   sequence, so concurrent increments cannot lose updates and observers
//!   see snapshots in production order.
//! - The observer list has its own mutex, held only to copy the list or to
//!   add/remove an entry. Dropping a [`SharedSubscription`] from inside an
//!   observer is therefore safe.
//!
//! # Failure Modes
//!
//! - **Re-entrant mutation**: an observer that dispatches to or subscribes
//!   on the same store deadlocks on the writer mutex.
//! - **Observer panics**: the panic propagates to the dispatching thread.
//!   The snapshot is already stored; poisoned mutexes are recovered.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use arc_swap::ArcSwap;

use crate::state::{BadgeAction, BadgeState};

type SharedObserver = Arc<dyn Fn(&BadgeState) + Send + Sync>;

/// A published snapshot paired with its version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Versioned {
    state: BadgeState,
    version: u64,
}

struct Shared {
    snapshot: ArcSwap<Versioned>,
    writer: Mutex<()>,
    observers: Mutex<Vec<(u64, SharedObserver)>>,
    next_observer_id: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Badge store safe to share across threads.
///
/// Cloning creates a new handle to the **same** store.
#[derive(Clone)]
pub struct SharedBadgeStore {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for SharedBadgeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.shared.snapshot.load();
        f.debug_struct("SharedBadgeStore")
            .field("state", &snapshot.state)
            .field("version", &snapshot.version)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl Default for SharedBadgeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedBadgeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_state(BadgeState::INITIAL)
    }

    #[must_use]
    pub fn with_state(state: BadgeState) -> Self {
        Self {
            shared: Arc::new(Shared {
                snapshot: ArcSwap::from_pointee(Versioned { state, version: 0 }),
                writer: Mutex::new(()),
                observers: Mutex::new(Vec::new()),
                next_observer_id: AtomicU64::new(0),
            }),
        }
    }

    /// Current snapshot. Never blocks.
    #[must_use]
    pub fn state(&self) -> BadgeState {
        self.shared.snapshot.load().state
    }

    /// Number of snapshots published since construction.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.shared.snapshot.load().version
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        lock(&self.shared.observers).len()
    }

    /// Call `observer` with the current snapshot now and with every later
    /// one until the returned guard is dropped.
    ///
    /// No snapshot can be published between the initial delivery and the
    /// registration, so the observer neither misses nor repeats a state.
    #[must_use = "dropping the SharedSubscription unsubscribes immediately"]
    pub fn subscribe(
        &self,
        observer: impl Fn(&BadgeState) + Send + Sync + 'static,
    ) -> SharedSubscription {
        let _writer = lock(&self.shared.writer);
        observer(&self.state());

        let id = self.shared.next_observer_id.fetch_add(1, Ordering::Relaxed);
        let observer: SharedObserver = Arc::new(observer);
        let mut observers = lock(&self.shared.observers);
        observers.push((id, observer));
        tracing::debug!(id, subscribers = observers.len(), "shared badge store subscribed");

        SharedSubscription {
            id,
            store: Arc::downgrade(&self.shared),
        }
    }

    /// Apply `action` and publish the result to every observer.
    pub fn dispatch(&self, action: BadgeAction) {
        let _writer = lock(&self.shared.writer);
        let current = **self.shared.snapshot.load();
        let next = Versioned {
            state: action.apply(current.state),
            version: current.version.wrapping_add(1),
        };
        self.shared.snapshot.store(Arc::new(next));
        tracing::trace!(
            action = action.as_str(),
            version = next.version,
            small_badge_visible = next.state.small_badge_visible(),
            large_badge_number = next.state.large_badge_number(),
            "shared badge store dispatch"
        );

        let observers: Vec<SharedObserver> = lock(&self.shared.observers)
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        for observer in observers {
            observer(&next.state);
        }
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
}

/// RAII guard for a [`SharedBadgeStore`] observer. `Send + Sync`.
#[derive(Debug)]
pub struct SharedSubscription {
    id: u64,
    store: Weak<Shared>,
}

impl SharedSubscription {
    /// Unsubscribe now.
    pub fn cancel(self) {}
}

impl Drop for SharedSubscription {
    fn drop(&mut self) {
        let Some(shared) = self.store.upgrade() else {
            return;
        };
        let mut observers = lock(&shared.observers);
        observers.retain(|(id, _)| *id != self.id);
        tracing::debug!(id = self.id, subscribers = observers.len(), "shared badge store unsubscribed");
    }
}
