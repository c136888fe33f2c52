#![forbid(unsafe_code)]

//! Lazy derived values that track an [`Observable`] source.
//!
//! A [`Computed<T>`] caches the result of its compute function and marks the
//! cache dirty whenever its source publishes. The next read recomputes.
//!
//! # Invariants
//!
//! 1. A read after a source publish never returns the pre-publish value.
//! 2. The compute function runs at most once per dirty period.
//! 3. `version` increments by exactly 1 per recomputation.
//!
//! # Failure Modes
//!
//! - **Compute function panics**: the dirty flag stays set, so the next read
//!   retries.
//! - **Source dropped**: the subscription goes inert and the last cached
//!   value is kept.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::observable::{Observable, Subscription};

struct ComputedInner<T> {
    compute: Box<dyn Fn() -> T>,
    cached: Option<T>,
    version: u64,
    /// Kept alive so sources keep marking us dirty.
    _subscriptions: Vec<Subscription>,
}

/// A memoized value derived from an [`Observable`].
///
/// Cloning a `Computed` creates a new handle to the **same** cache.
pub struct Computed<T> {
    inner: Rc<RefCell<ComputedInner<T>>>,
    /// Shared with source callbacks; lives outside the `RefCell` so a source
    /// notification never needs to borrow the cache.
    dirty: Rc<Cell<bool>>,
}

impl<T> Clone for Computed<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            dirty: Rc::clone(&self.dirty),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Computed<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Computed")
            .field("cached", &inner.cached)
            .field("dirty", &self.dirty.get())
            .field("version", &inner.version)
            .finish()
    }
}

fn mark_dirty_on_change<S: Clone + PartialEq + 'static>(
    source: &Observable<S>,
    dirty: &Rc<Cell<bool>>,
) -> Subscription {
    let dirty = Rc::clone(dirty);
    source.subscribe(move |_| dirty.set(true))
}

impl<T: Clone + 'static> Computed<T> {
    /// Derive a value from a single observable.
    pub fn from_observable<S: Clone + PartialEq + 'static>(
        source: &Observable<S>,
        map: impl Fn(&S) -> T + 'static,
    ) -> Self {
        let reader = source.clone();
        let dirty = Rc::new(Cell::new(true));
        let sub = mark_dirty_on_change(source, &dirty);
        Self {
            inner: Rc::new(RefCell::new(ComputedInner {
                compute: Box::new(move || reader.with(|v| map(v))),
                cached: None,
                version: 0,
                _subscriptions: vec![sub],
            })),
            dirty,
        }
    }

    /// Current value, recomputed first if stale.
    #[must_use]
    pub fn get(&self) -> T {
        self.with(T::clone)
    }

    /// Borrow the current value, recomputing first if stale.
    ///
    /// # Panics
    ///
    /// Panics if `f` reads this same `Computed` (re-entrant borrow).
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        if self.dirty.get() {
            inner.cached = None;
        }
        let dirty = &self.dirty;
        let value = inner.cached.get_or_insert_with(|| {
            let fresh = (inner.compute)();
            inner.version += 1;
            dirty.set(false);
            fresh
        });
        f(value)
    }

    /// Whether the next read will recompute.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Number of recomputations so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }
}
