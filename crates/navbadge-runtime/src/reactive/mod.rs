#![forbid(unsafe_code)]

//! Change-tracking primitives the badge store is built on.
//!
//! - [`Observable`]: a shared, version-tracked value with subscriber
//!   callbacks.
//! - [`Subscription`]: RAII guard that unsubscribes on drop.
//! - [`Computed`]: a lazily evaluated, memoized value derived from an
//!   `Observable`.
//!
//! # Architecture
//!
//! `Observable<T>` uses `Rc<RefCell<..>>` for single-threaded shared
//! ownership. Callbacks are owned by their `Subscription` and referenced
//! weakly by the observable, so dead entries are pruned lazily during
//! notification.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per delivered change.
//! 2. Subscribers are notified in registration order.
//! 3. `set` with a value equal to the current one is a no-op; `publish`
//!    always notifies.
//! 4. Dropping a [`Subscription`] removes the callback before the next
//!    notification cycle.
//! 5. Values published from inside a callback are delivered after the
//!    current cycle, in publish order.
//! 6. `Computed::get()` never returns a stale value.
//! 7. `Observable::subscribe_with_current` hands a new subscriber each value
//!    at most once, ending at the current one.

pub mod computed;
pub mod observable;

pub use computed::Computed;
pub use observable::{Observable, Subscription};
