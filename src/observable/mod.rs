//! The `observable` module provides [`Observable`] and the constructors that build
//! one from a production strategy.
//!
//! `empty`, `just` and `from_values` run entirely inside `subscribe` on the
//! caller's thread. `start` and `interval` produce concurrently and funnel every
//! event through one queue into a delivery loop that also runs on the caller's
//! thread, so subscriber handlers are never invoked from two threads at once.

mod interval;
mod runtime;
mod start;

pub use start::{directive, Directive};

use std::fmt;

use crate::errors::label_of;
use crate::observer::Observer;
use crate::subscription::subscribe::{Subscribeable, Subscriber, Subscription};

type SubscribeFn<T> = Box<dyn FnMut(&mut Subscriber<T>) + Send + Sync>;

/// A stream of values wrapping exactly one production strategy.
///
/// Observables are cold: nothing is produced until `subscribe` is called, and
/// every call re-runs the strategy from scratch for that subscriber alone.
///
/// # Example: synchronous `Observable`
///
/// ```
/// use std::sync::{Arc, Mutex};
///
/// use grx::{subscribe::Subscriber, Observable, Subscribeable};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let seen_c = Arc::clone(&seen);
///
/// let mut numbers = Observable::from_values(vec![1, 2, 3]);
/// numbers.subscribe(Subscriber::on_next(move |v| seen_c.lock().unwrap().push(v)));
///
/// assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
/// ```
///
/// # Example: custom strategy
///
/// ```
/// use grx::{subscribe::Subscriber, Event, Observable, ObservableError, Observer, Subscribeable};
///
/// let mut checked = Observable::new(|o: &mut Subscriber<u32>| {
///     for v in [10, 20, 300] {
///         if v > 100 {
///             o.emit(Event::error_from(ObservableError::Message(format!("{v} too large"))));
///             return;
///         }
///         o.next(v);
///     }
///     o.complete();
/// });
///
/// let mut subscriber = Subscriber::on_next(|v: u32| println!("{v}"));
/// subscriber.on_error(|e| eprintln!("{e}"));
/// checked.subscribe(subscriber);
/// ```
pub struct Observable<T> {
    subscribe_fn: SubscribeFn<T>,
    name: Option<String>,
}

impl<T: 'static> Observable<T> {
    /// Creates an `Observable` from a custom production strategy.
    ///
    /// `sf` is invoked once per `subscribe` with that subscription's `Subscriber`.
    /// It should deliver values with `next` (or `emit`) and finish with one
    /// `complete` or `error`. The subscriber ignores anything sent after a
    /// terminal call or after cancellation.
    pub fn new(sf: impl FnMut(&mut Subscriber<T>) + Send + Sync + 'static) -> Self {
        Observable {
            subscribe_fn: Box::new(sf),
            name: None,
        }
    }

    /// Creates a named observable with an empty strategy: it completes right away.
    pub fn named(name: impl Into<String>) -> Self {
        Self::empty().with_name(name)
    }

    /// Attaches an informational name. It shows up in logs and in the returned
    /// `Subscription` and has no effect on behavior.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Emits nothing and completes immediately.
    pub fn empty() -> Self {
        Observable::new(|o| o.complete())
    }
}

impl<T: Clone + Send + Sync + 'static> Observable<T> {
    /// Emits `v` once, then completes, before `subscribe` returns.
    pub fn just(v: T) -> Self {
        Observable::new(move |o| {
            o.next(v.clone());
            o.complete();
        })
    }

    /// Emits every element of `values` in order, then completes, before
    /// `subscribe` returns.
    pub fn from_values(values: impl IntoIterator<Item = T>) -> Self {
        let values: Vec<T> = values.into_iter().collect();
        Observable::new(move |o| {
            for v in &values {
                if !o.is_open() {
                    return;
                }
                o.next(v.clone());
            }
            o.complete();
        })
    }
}

impl<T: Clone + Send + Sync + 'static> From<Vec<T>> for Observable<T> {
    fn from(values: Vec<T>) -> Self {
        Observable::from_values(values)
    }
}

impl<T: Clone + Send + Sync + 'static> FromIterator<T> for Observable<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Observable::from_values(iter)
    }
}

impl<T> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable").field("name", &self.name).finish_non_exhaustive()
    }
}

impl<T: 'static> Subscribeable for Observable<T> {
    type ObsType = T;

    fn subscribe(&mut self, mut v: Subscriber<Self::ObsType>) -> Subscription {
        let name = self.name.as_deref().unwrap_or("anonymous");
        tracing::trace!(observable = name, "subscribing");

        v.start();
        (self.subscribe_fn)(&mut v);

        tracing::debug!(
            observable = name,
            state = ?v.state(),
            cancelled = v.is_cancelled(),
            error = v.failure().map(label_of),
            "subscription finished"
        );
        Subscription::finish(&v, self.name.clone())
    }
}

#[cfg(test)]
mod tests;
