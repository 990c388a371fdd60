use std::fmt;

use tokio_util::sync::CancellationToken;

use crate::{observer::Observer, Event, ObservableError, SharedError};

/// A trait for types that can be subscribed to, allowing consumers to receive
/// values emitted by an observable stream.
pub trait Subscribeable {
    /// The type of items emitted by the observable stream.
    type ObsType;

    /// Runs the production strategy and delivers its events to `s`.
    ///
    /// Every call is an independent run: nothing emitted by a previous
    /// subscription is cached or replayed.
    ///
    /// The observable is borrowed rather than returned, so the caller keeps its
    /// handle and can subscribe again. What comes back is a [`Subscription`]
    /// describing the run: its final state, the error that ended it and the
    /// cancellation token it shared with `s`.
    fn subscribe(&mut self, s: Subscriber<Self::ObsType>) -> Subscription;
}

/// A trait for types that can be unsubscribed, signalling the producer to stop
/// emitting and release its resources.
pub trait Unsubscribeable {
    /// Cancels the subscription. The instance is consumed.
    fn unsubscribe(self);
}

/// Lifecycle of a single subscription.
///
/// `Completed` and `Failed` are absorbing: once reached no callback fires again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    Idle,
    Running,
    Completed,
    Failed,
}

impl SubscriptionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

type NextFn<T> = Box<dyn FnMut(T) + Send>;
type CompleteFn = Box<dyn FnMut() + Send>;
type ErrorFn = Box<dyn FnMut(SharedError) + Send>;

/// A type that acts as an observer, allowing users to handle emitted values, errors,
/// and completion when subscribing to an `Observable`.
///
/// All three handlers are optional; an unset handler is skipped without fault.
/// The subscriber enforces the terminal protocol on its own: after `complete` or
/// `error` has been called once, any further call is ignored, and once its
/// cancellation token is cancelled nothing is delivered at all.
pub struct Subscriber<NextFnType> {
    next_fn: Option<NextFn<NextFnType>>,
    complete_fn: Option<CompleteFn>,
    error_fn: Option<ErrorFn>,
    state: SubscriptionState,
    token: CancellationToken,
    failure: Option<SharedError>,
}

impl<NextFnType> Subscriber<NextFnType> {
    /// Creates a new `Subscriber` with handlers for emitted values, errors and
    /// completion.
    pub fn new(
        next_fn: impl FnMut(NextFnType) + 'static + Send,
        error_fn: impl FnMut(SharedError) + 'static + Send,
        complete_fn: impl FnMut() + 'static + Send,
    ) -> Self {
        Subscriber {
            next_fn: Some(Box::new(next_fn)),
            complete_fn: Some(Box::new(complete_fn)),
            error_fn: Some(Box::new(error_fn)),
            ..Self::default()
        }
    }

    /// Create a new Subscriber with only the `next` handler set.
    pub fn on_next(next_fn: impl FnMut(NextFnType) + 'static + Send) -> Self {
        Subscriber {
            next_fn: Some(Box::new(next_fn)),
            ..Self::default()
        }
    }

    /// Set the completion handler.
    pub fn on_complete(&mut self, complete_fn: impl FnMut() + 'static + Send) {
        self.complete_fn = Some(Box::new(complete_fn));
    }

    /// Set the error handler.
    pub fn on_error(&mut self, error_fn: impl FnMut(SharedError) + 'static + Send) {
        self.error_fn = Some(Box::new(error_fn));
    }

    /// Replaces the subscriber's cancellation token with `token`.
    ///
    /// Use this to tie the subscription to a token owned elsewhere, e.g. a child
    /// of an application-wide shutdown token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Returns a handle to the token that cancels this subscription.
    ///
    /// Take it before calling `subscribe`, since blocking observables only return
    /// once they are finished or cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn state(&self) -> SubscriptionState {
        self.state
    }

    /// Routes `event` to `next` or `error` depending on its variant.
    pub fn emit(&mut self, event: Event<NextFnType>) {
        match event {
            Event::Value(v) => self.next(v),
            Event::Error(e) => self.error(e),
        }
    }

    /// Whether the subscriber still accepts deliveries.
    pub fn is_open(&self) -> bool {
        !self.state.is_terminal() && !self.token.is_cancelled()
    }

    pub(crate) fn failure(&self) -> Option<&SharedError> {
        self.failure.as_ref()
    }

    pub(crate) fn start(&mut self) {
        if self.state == SubscriptionState::Idle {
            self.state = SubscriptionState::Running;
        }
    }
}

impl<T> Default for Subscriber<T> {
    /// A subscriber with no handlers and a fresh cancellation token.
    fn default() -> Self {
        Subscriber {
            next_fn: None,
            complete_fn: None,
            error_fn: None,
            state: SubscriptionState::Idle,
            token: CancellationToken::new(),
            failure: None,
        }
    }
}

impl<T> fmt::Debug for Subscriber<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("state", &self.state)
            .field("cancelled", &self.token.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl<T> Observer for Subscriber<T> {
    type NextFnType = T;

    fn next(&mut self, v: Self::NextFnType) {
        if !self.is_open() {
            return;
        }
        self.start();
        if let Some(nfn) = &mut self.next_fn {
            (nfn)(v);
        }
    }

    fn complete(&mut self) {
        if !self.is_open() {
            return;
        }
        self.state = SubscriptionState::Completed;
        if let Some(cfn) = &mut self.complete_fn {
            (cfn)();
        }
    }

    fn error(&mut self, observable_error: SharedError) {
        if !self.is_open() {
            return;
        }
        self.state = SubscriptionState::Failed;
        self.failure = Some(observable_error.clone());
        if let Some(efn) = &mut self.error_fn {
            (efn)(observable_error);
        }
    }
}

/// Outcome of one `subscribe` call.
///
/// Holds the final state of the run, the error that ended it, and the
/// cancellation token it was driven with. Unsubscribing cancels that token,
/// which also stops every other subscription sharing it.
#[derive(Debug, Clone)]
pub struct Subscription {
    state: SubscriptionState,
    token: CancellationToken,
    name: Option<String>,
    error: Option<SharedError>,
}

impl Subscription {
    pub(crate) fn finish<T>(subscriber: &Subscriber<T>, name: Option<String>) -> Self {
        let error = subscriber.failure.clone().map(|source| match &name {
            Some(name) => ObservableError::Named {
                name: name.clone(),
                source,
            }
            .shared(),
            None => source,
        });
        Subscription {
            state: subscriber.state,
            token: subscriber.token.clone(),
            name,
            error,
        }
    }

    /// The error delivered to `on_error`, if the run failed. For a named
    /// observable it is wrapped in [`ObservableError::Named`] so the source of
    /// the failure can be told apart.
    pub fn error(&self) -> Option<&SharedError> {
        self.error.as_ref()
    }

    /// State the subscription ended in. A run halted by cancellation stays `Running`.
    pub fn state(&self) -> SubscriptionState {
        self.state
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Name of the observable this subscription ran against.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl Unsubscribeable for Subscription {
    fn unsubscribe(self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::ObservableError;

    fn recording() -> (Subscriber<i32>, Arc<Mutex<Vec<String>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (l1, l2, l3) = (Arc::clone(&log), Arc::clone(&log), Arc::clone(&log));
        let s = Subscriber::new(
            move |v| l1.lock().unwrap().push(format!("next {v}")),
            move |e| l2.lock().unwrap().push(format!("error {e}")),
            move || l3.lock().unwrap().push("complete".to_string()),
        );
        (s, log)
    }

    #[test]
    fn terminal_states_are_absorbing() {
        let (mut s, log) = recording();
        s.next(1);
        s.complete();
        s.next(2);
        s.error(ObservableError::Message("late".into()).shared());
        s.complete();

        assert_eq!(s.state(), SubscriptionState::Completed);
        assert_eq!(*log.lock().unwrap(), vec!["next 1", "complete"]);
    }

    #[test]
    fn error_blocks_completion() {
        let (mut s, log) = recording();
        s.emit(Event::Error(ObservableError::Message("bad".into()).shared()));
        s.complete();

        assert_eq!(s.state(), SubscriptionState::Failed);
        assert_eq!(*log.lock().unwrap(), vec!["error bad"]);
    }

    #[test]
    fn cancelled_subscriber_receives_nothing() {
        let (mut s, log) = recording();
        s.cancellation_token().cancel();
        s.next(1);
        s.complete();

        assert!(log.lock().unwrap().is_empty());
        assert_eq!(s.state(), SubscriptionState::Idle);
    }

    #[test]
    fn subscription_labels_failure_with_observable_name() {
        let (mut s, _) = recording();
        s.error(ObservableError::Message("timeout".into()).shared());

        let anonymous = Subscription::finish(&s, None);
        assert_eq!(anonymous.error().map(|e| e.to_string()).as_deref(), Some("timeout"));

        let named = Subscription::finish(&s, Some("users".to_string()));
        let e = named.error().unwrap();
        assert_eq!(e.to_string(), "users observable emitted an error");
        assert_eq!(e.source().map(|s| s.to_string()).as_deref(), Some("timeout"));
    }

    #[test]
    fn completed_subscription_has_no_error() {
        let (mut s, _) = recording();
        s.complete();
        assert!(Subscription::finish(&s, Some("users".to_string())).error().is_none());
    }

    #[test]
    fn unset_handlers_are_skipped() {
        let mut s = Subscriber::<i32>::default();
        s.next(1);
        s.error(ObservableError::ZeroPeriod.shared());
        assert_eq!(s.state(), SubscriptionState::Failed);
    }
}
