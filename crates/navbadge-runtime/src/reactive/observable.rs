#![forbid(unsafe_code)]

//! Version-tracked shared values with subscriber callbacks.
//!
//! # Design
//!
//! [`Observable<T>`] keeps its value, version and subscriber list behind a
//! single `Rc<RefCell<..>>`. Each subscriber callback is owned by the
//! [`Subscription`] returned from [`Observable::subscribe`]; the observable
//! only keeps a `Weak` pointer to it. Dropping the guard therefore disables
//! the callback immediately, and the dead entry is pruned on the next
//! notification cycle.
//!
//! # Delivery order
//!
//! Subscribers run in registration order. A value published from inside a
//! callback is stored right away but its notification is queued and
//! delivered after the in-flight cycle completes, so every subscriber sees
//! values in the order they were produced.
//!
//! # Failure Modes
//!
//! - **Callback panics**: the panic propagates to the publisher. The
//!   notification flag is reset on unwind so later publishes still deliver.
//! - **Borrow inside `with`**: calling `set`/`publish` from inside a
//!   [`with`](Observable::with) closure panics (re-entrant `RefCell` borrow).

use std::any::Any;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

type Callback<T> = dyn Fn(&T);

struct ObservableInner<T> {
    value: T,
    /// Bumped once per delivered change.
    version: u64,
    subscribers: Vec<Weak<Callback<T>>>,
    /// True while a notification cycle is running.
    notifying: bool,
    /// Values published re-entrantly, waiting for the current cycle to end.
    pending: VecDeque<T>,
}

/// A shared, version-tracked value that notifies subscribers on change.
///
/// Cloning an `Observable` creates a new handle to the **same** value.
pub struct Observable<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Default + Clone + PartialEq + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Wrap `value`. The version starts at 0.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObservableInner {
                value,
                version: 0,
                subscribers: Vec::new(),
                notifying: false,
                pending: VecDeque::new(),
            })),
        }
    }

    /// Clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Borrow the current value without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Number of delivered changes so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Replace the value. Equal values are ignored (no version bump, no
    /// notification).
    pub fn set(&self, value: T) {
        if self.with(|current| *current == value) {
            return;
        }
        self.publish(value);
    }

    /// Mutate the value in place, notifying only if it changed.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut next = self.get();
        f(&mut next);
        self.set(next);
    }

    /// Replace the value and notify every subscriber, even if the new value
    /// equals the old one.
    pub fn publish(&self, value: T) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.value = value.clone();
            inner.version += 1;
            if inner.notifying {
                inner.pending.push_back(value);
                return;
            }
            inner.notifying = true;
        }
        let _cycle = NotifyCycle { inner: &*self.inner };
        self.deliver_from(Some(value));
    }

    /// Register `callback` for future changes. The current value is not
    /// delivered.
    ///
    /// The callback stays registered for as long as the returned
    /// [`Subscription`] is alive.
    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let callback: Rc<Callback<T>> = Rc::new(callback);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&callback));
        Subscription {
            _callback: Box::new(callback),
        }
    }

    /// Register `callback` and hand it the current value before any later
    /// one.
    ///
    /// Outside a notification cycle the current value is delivered right
    /// away, and anything the callback publishes in response reaches every
    /// subscriber, this one included, once that first call returns. Inside a
    /// cycle with queued values the callback instead joins the queue: it
    /// receives the pending values in order, the last of which is the current
    /// value, and never the same value twice.
    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn subscribe_with_current(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let callback: Rc<Callback<T>> = Rc::new(callback);
        let (current, in_cycle) = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.push(Rc::downgrade(&callback));
            if inner.notifying && !inner.pending.is_empty() {
                (None, true)
            } else {
                (Some(inner.value.clone()), inner.notifying)
            }
        };

        if let Some(value) = current {
            if in_cycle {
                callback(&value);
            } else {
                self.inner.borrow_mut().notifying = true;
                let _cycle = NotifyCycle { inner: &*self.inner };
                callback(&value);
                let queued = self.inner.borrow_mut().pending.pop_front();
                self.deliver_from(queued);
            }
        }

        Subscription {
            _callback: Box::new(callback),
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    /// Deliver `first` and then every queued value to all live subscribers.
    /// The caller must hold the cycle.
    fn deliver_from(&self, first: Option<T>) {
        let mut next = first;
        while let Some(value) = next {
            let callbacks = self.live_callbacks();
            for callback in &callbacks {
                callback(&value);
            }
            next = self.inner.borrow_mut().pending.pop_front();
        }
    }

    fn live_callbacks(&self) -> Vec<Rc<Callback<T>>> {
        let mut inner = self.inner.borrow_mut();
        inner.subscribers.retain(|weak| weak.strong_count() > 0);
        inner.subscribers.iter().filter_map(Weak::upgrade).collect()
    }
}

/// Clears the `notifying` flag when a cycle ends, including on unwind.
struct NotifyCycle<'a, T> {
    inner: &'a RefCell<ObservableInner<T>>,
}

impl<T> Drop for NotifyCycle<'_, T> {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.notifying = false;
            inner.pending.clear();
        }
    }
}

/// RAII guard for a subscriber callback.
///
/// Dropping the guard unsubscribes. Use [`cancel`](Subscription::cancel) to
/// make the intent explicit at the call site.
pub struct Subscription {
    _callback: Box<dyn Any>,
}

impl Subscription {
    /// Unsubscribe now.
    pub fn cancel(self) {}
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn get_and_set() {
        let value = Observable::new(1);
        assert_eq!(value.get(), 1);
        value.set(2);
        assert_eq!(value.get(), 2);
        assert_eq!(value.version(), 1);
    }

    #[test]
    fn set_equal_value_is_noop() {
        let value = Observable::new(7);
        let calls = Rc::new(Cell::new(0));
        let calls_clone = Rc::clone(&calls);
        let _sub = value.subscribe(move |_| calls_clone.set(calls_clone.get() + 1));

        value.set(7);
        assert_eq!(value.version(), 0);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn publish_always_notifies() {
        let value = Observable::new(7);
        let calls = Rc::new(Cell::new(0));
        let calls_clone = Rc::clone(&calls);
        let _sub = value.subscribe(move |_| calls_clone.set(calls_clone.get() + 1));

        value.publish(7);
        value.publish(7);
        assert_eq!(value.version(), 2);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn update_in_place() {
        let value = Observable::new(vec![1, 2]);
        value.update(|v| v.push(3));
        assert_eq!(value.get(), vec![1, 2, 3]);
        assert_eq!(value.version(), 1);

        value.update(|_| {});
        assert_eq!(value.version(), 1);
    }

    #[test]
    fn subscribers_notified_in_registration_order() {
        let value = Observable::new(0);
        let log = Rc::new(RefCell::new(Vec::new()));

        let log_a = Rc::clone(&log);
        let _a = value.subscribe(move |v| log_a.borrow_mut().push(("a", *v)));
        let log_b = Rc::clone(&log);
        let _b = value.subscribe(move |v| log_b.borrow_mut().push(("b", *v)));

        value.set(1);
        value.set(2);
        assert_eq!(
            *log.borrow(),
            vec![("a", 1), ("b", 1), ("a", 2), ("b", 2)]
        );
    }

    #[test]
    fn dropping_subscription_stops_delivery() {
        let value = Observable::new(0);
        let seen = Rc::new(Cell::new(0));
        let seen_clone = Rc::clone(&seen);
        let sub = value.subscribe(move |v| seen_clone.set(*v));

        value.set(1);
        assert_eq!(seen.get(), 1);
        assert_eq!(value.subscriber_count(), 1);

        drop(sub);
        assert_eq!(value.subscriber_count(), 0);
        value.set(2);
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn cancel_is_drop() {
        let value = Observable::new(0);
        let sub = value.subscribe(|_| {});
        sub.cancel();
        assert_eq!(value.subscriber_count(), 0);
    }

    #[test]
    fn reentrant_publish_is_delivered_in_order() {
        let value = Observable::new(0);
        let log = Rc::new(RefCell::new(Vec::new()));

        let writer = value.clone();
        let _bump = value.subscribe(move |v| {
            if *v == 1 {
                writer.set(2);
            }
        });
        let log_clone = Rc::clone(&log);
        let _record = value.subscribe(move |v| log_clone.borrow_mut().push(*v));

        value.set(1);
        assert_eq!(*log.borrow(), vec![1, 2]);
        assert_eq!(value.get(), 2);
        assert_eq!(value.version(), 2);
    }

    #[test]
    fn subscription_created_during_cycle_sees_next_cycle_only() {
        let value = Observable::new(0);
        let late = Rc::new(RefCell::new(Vec::new()));
        let keep = Rc::new(RefCell::new(Vec::new()));

        let source = value.clone();
        let late_clone = Rc::clone(&late);
        let keep_clone = Rc::clone(&keep);
        let _sub = value.subscribe(move |_| {
            if keep_clone.borrow().is_empty() {
                let late_inner = Rc::clone(&late_clone);
                let sub = source.subscribe(move |v| late_inner.borrow_mut().push(*v));
                keep_clone.borrow_mut().push(sub);
            }
        });

        value.set(1);
        assert!(late.borrow().is_empty());
        value.set(2);
        assert_eq!(*late.borrow(), vec![2]);
    }

    #[test]
    fn subscribe_with_current_delivers_current_value() {
        let value = Observable::new(3);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = value.subscribe_with_current(move |v| sink.borrow_mut().push(*v));

        value.set(4);
        assert_eq!(*seen.borrow(), vec![3, 4]);
        assert_eq!(value.version(), 1);
    }

    #[test]
    fn publish_from_first_delivery_reaches_everyone() {
        let value = Observable::new(0);
        let early = Rc::new(RefCell::new(Vec::new()));
        let late = Rc::new(RefCell::new(Vec::new()));

        let early_sink = Rc::clone(&early);
        let _early = value.subscribe_with_current(move |v| early_sink.borrow_mut().push(*v));

        let writer = value.clone();
        let late_sink = Rc::clone(&late);
        let _late = value.subscribe_with_current(move |v| {
            late_sink.borrow_mut().push(*v);
            if *v == 0 {
                writer.publish(1);
            }
        });

        assert_eq!(*early.borrow(), vec![0, 1]);
        assert_eq!(*late.borrow(), vec![0, 1]);
        assert_eq!(value.get(), 1);
    }

    #[test]
    fn subscribe_with_current_during_queued_cycle_joins_queue() {
        let value = Observable::new(0);
        let late = Rc::new(RefCell::new(Vec::new()));
        let keep = Rc::new(RefCell::new(Vec::new()));

        let writer = value.clone();
        let _bump = value.subscribe(move |v| {
            if *v == 1 {
                writer.publish(2);
            }
        });

        let source = value.clone();
        let late_sink = Rc::clone(&late);
        let keep_sink = Rc::clone(&keep);
        let _join = value.subscribe(move |_| {
            if keep_sink.borrow().is_empty() {
                let sink = Rc::clone(&late_sink);
                let sub = source.subscribe_with_current(move |v| sink.borrow_mut().push(*v));
                keep_sink.borrow_mut().push(sub);
            }
        });

        value.publish(1);
        assert_eq!(*late.borrow(), vec![2]);

        value.publish(3);
        assert_eq!(*late.borrow(), vec![2, 3]);
    }

    #[test]
    fn clone_shares_state() {
        let a = Observable::new(String::from("x"));
        let b = a.clone();
        b.set(String::from("y"));
        assert_eq!(a.get(), "y");
        assert_eq!(a.version(), 1);
    }

    #[test]
    fn debug_format() {
        let value = Observable::new(42);
        let dbg = format!("{value:?}");
        assert!(dbg.contains("Observable"));
        assert!(dbg.contains("42"));
    }
}
