//! Concurrent multi-producer constructor.
//!
//! Each directive runs on its own OS thread as soon as `subscribe` is called.
//! Finished directives push their index, the instant they finished and their
//! event into one unbounded queue, and the delivery loop on the subscribing
//! thread hands events to the subscriber in completion order. Results the
//! loop finds queued together are ordered by finish instant, and by ascending
//! directive index when two directives finished at the same instant.
//!
//! The first error event ends the subscription. Directives still running at that
//! point are left to finish on their own; their results are discarded.

use std::{
    panic::{catch_unwind, AssertUnwindSafe},
    sync::Arc,
    thread,
    time::Instant,
};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::{runtime, Observable};
use crate::{
    config::Config, observer::Observer, subscribe::Subscriber, Event, ObservableError,
};

/// A zero-argument unit of work producing one event when it finishes.
pub type Directive<T> = Box<dyn Fn() -> Event<T> + Send + Sync>;

type SharedDirective<T> = Arc<dyn Fn() -> Event<T> + Send + Sync>;

/// Boxes a closure into a [`Directive`], so directives of different closure
/// types can be collected together.
pub fn directive<T>(f: impl Fn() -> Event<T> + Send + Sync + 'static) -> Directive<T> {
    Box::new(f)
}

impl<T: Send + 'static> Observable<T> {
    /// Runs every directive concurrently and emits each result as soon as it is
    /// ready, then completes once all of them were delivered.
    ///
    /// `subscribe` blocks until that point, until the first error event, or
    /// until the subscriber's cancellation token is cancelled. A directive that
    /// panics is reported as [`ObservableError::DirectivePanicked`].
    ///
    /// Subscribing from inside a multi-thread tokio runtime is allowed and
    /// blocks the calling worker in place. Inside a current-thread runtime,
    /// subscribe from `tokio::task::spawn_blocking`: tokio forbids blocking the
    /// runtime's own thread and panics.
    ///
    /// ```
    /// use std::{thread, time::Duration};
    ///
    /// use grx::{directive, subscribe::Subscriber, Event, Observable, Subscribeable};
    ///
    /// let mut calls = Observable::start(vec![
    ///     directive(|| {
    ///         thread::sleep(Duration::from_millis(20));
    ///         Event::Value("slow")
    ///     }),
    ///     directive(|| Event::Value("fast")),
    /// ]);
    ///
    /// calls.subscribe(Subscriber::on_next(|v: &str| println!("{v}")));
    /// ```
    pub fn start(directives: impl IntoIterator<Item = Directive<T>>) -> Self {
        Self::start_with(Config::default(), directives)
    }

    /// Same as [`Observable::start`] with explicit settings.
    pub fn start_with(config: Config, directives: impl IntoIterator<Item = Directive<T>>) -> Self {
        let directives: Vec<SharedDirective<T>> = directives
            .into_iter()
            .map(SharedDirective::<T>::from)
            .collect();
        Observable::new(move |o| run_directives(&config, &directives, o))
    }
}

/// One finished directive as it travels through the result queue.
struct Finished<T> {
    index: usize,
    at: Instant,
    event: Event<T>,
}

fn run_directives<T: Send + 'static>(
    config: &Config,
    directives: &[SharedDirective<T>],
    o: &mut Subscriber<T>,
) {
    if !o.is_open() {
        return;
    }
    if directives.is_empty() {
        o.complete();
        return;
    }

    let rt = runtime::subscription_runtime();

    let (tx, rx) = mpsc::unbounded_channel::<Finished<T>>();
    for (index, d) in directives.iter().enumerate() {
        let d = Arc::clone(d);
        let tx = tx.clone();
        let spawned = thread::Builder::new()
            .name(config.thread_name(index))
            .spawn(move || {
                let event = catch_unwind(AssertUnwindSafe(|| d())).unwrap_or_else(|payload| {
                    Event::Error(
                        ObservableError::DirectivePanicked {
                            index,
                            message: runtime::panic_message(&*payload),
                        }
                        .shared(),
                    )
                });
                let finished = Finished {
                    index,
                    at: Instant::now(),
                    event,
                };
                // Fails only when the subscription already ended.
                let _ = tx.send(finished);
            });
        if let Err(e) = spawned {
            o.error(ObservableError::Runtime(e).shared());
            return;
        }
    }
    drop(tx);

    let token = o.cancellation_token();
    if let Err(e) = rt.block_on(deliver(rx, directives.len(), o, token)) {
        o.error(e.shared());
    }
}

/// Delivery loop: the only place handlers are called from.
///
/// Completes the subscriber once `expected` results were delivered.
async fn deliver<T>(
    mut rx: mpsc::UnboundedReceiver<Finished<T>>,
    expected: usize,
    o: &mut Subscriber<T>,
    token: CancellationToken,
) {
    let mut remaining = expected;
    while remaining > 0 {
        let first = tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::debug!(remaining, "start subscription cancelled");
                return;
            }
            r = rx.recv() => r,
        };
        let Some(first) = first else {
            break;
        };

        let mut ready = vec![first];
        while let Ok(r) = rx.try_recv() {
            ready.push(r);
        }
        // Threads stamp `at` before sending, so two sends may race past each other.
        ready.sort_by_key(|f| (f.at, f.index));

        for Finished { index, event, .. } in ready {
            remaining -= 1;
            tracing::trace!(index, error = event.is_error(), "directive delivered");
            o.emit(event);
            if !o.is_open() {
                tracing::debug!(remaining, "start subscription ended early");
                return;
            }
        }
    }
    o.complete();
}
