use super::*;

use std::error::Error;
use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;

use crate::{subscribe::SubscriptionState, Event, ObservableError};

pub fn make_counting_observable(end: u32) -> Observable<u32> {
    Observable::new(move |o| {
        for i in 0..=end {
            o.next(i);
        }
        o.complete();
    })
}

fn collect<T: Send + 'static>() -> (Subscriber<T>, Arc<Mutex<Vec<T>>>, Arc<Mutex<u32>>) {
    let values = Arc::new(Mutex::new(Vec::new()));
    let completes = Arc::new(Mutex::new(0));
    let values_c = Arc::clone(&values);
    let completes_c = Arc::clone(&completes);

    let mut s = Subscriber::on_next(move |v| values_c.lock().unwrap().push(v));
    s.on_complete(move || *completes_c.lock().unwrap() += 1);
    (s, values, completes)
}

#[test]
fn named_observable_is_empty() {
    let mut stream = Observable::<i32>::named("myStream");
    assert_eq!(stream.name(), Some("myStream"));

    let (s, values, completes) = collect();
    let subscription = stream.subscribe(s);

    assert!(values.lock().unwrap().is_empty());
    assert_eq!(*completes.lock().unwrap(), 1);
    assert_eq!(subscription.name(), Some("myStream"));
    assert_eq!(subscription.state(), SubscriptionState::Completed);
}

#[test]
fn custom_strategy_reruns_per_subscription() {
    let mut observable = make_counting_observable(3);

    let (s, first, _) = collect();
    observable.subscribe(s);
    let (s, second, completes) = collect();
    observable.subscribe(s);

    assert_eq!(*first.lock().unwrap(), vec![0, 1, 2, 3]);
    assert_eq!(*second.lock().unwrap(), vec![0, 1, 2, 3]);
    assert_eq!(*completes.lock().unwrap(), 1);
}

#[test]
fn custom_strategy_cannot_emit_after_error() {
    let mut observable = Observable::new(|o: &mut Subscriber<i32>| {
        o.next(1);
        o.emit(Event::error_from(ObservableError::Message("broken".into())));
        o.next(2);
        o.complete();
    });

    let errors = Arc::new(Mutex::new(Vec::new()));
    let errors_c = Arc::clone(&errors);
    let (mut s, values, completes) = collect();
    s.on_error(move |e| errors_c.lock().unwrap().push(e.to_string()));

    let subscription = observable.subscribe(s);

    assert_eq!(*values.lock().unwrap(), vec![1]);
    assert_eq!(*errors.lock().unwrap(), vec!["broken"]);
    assert_eq!(*completes.lock().unwrap(), 0);
    assert_eq!(subscription.state(), SubscriptionState::Failed);
}

#[test]
fn from_values_stops_when_cancelled_mid_stream() {
    let mut observable = Observable::from_values(1..=5);

    let token = CancellationToken::new();
    let cancel = token.clone();
    let values = Arc::new(Mutex::new(Vec::new()));
    let values_c = Arc::clone(&values);

    let mut subscriber = Subscriber::on_next(move |v| {
        values_c.lock().unwrap().push(v);
        if v == 2 {
            cancel.cancel();
        }
    })
    .with_cancellation(token);
    subscriber.on_complete(|| panic!("cancelled stream must not complete"));

    let subscription = observable.subscribe(subscriber);

    assert_eq!(*values.lock().unwrap(), vec![1, 2]);
    assert!(subscription.is_cancelled());
    assert_eq!(subscription.state(), SubscriptionState::Running);
}

#[test]
fn collected_iterator_builds_observable() {
    let mut observable: Observable<char> = "abc".chars().collect();
    let (s, values, _) = collect();
    observable.subscribe(s);
    assert_eq!(*values.lock().unwrap(), vec!['a', 'b', 'c']);
}

#[test]
fn named_failure_is_reported_on_the_subscription() {
    let mut observable = Observable::new(|o: &mut Subscriber<u8>| {
        o.emit(Event::error_from(ObservableError::Message("disk full".into())));
    })
    .with_name("writer");

    let (mut s, _, _) = collect();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_c = Arc::clone(&seen);
    s.on_error(move |e| seen_c.lock().unwrap().push(e.to_string()));

    let subscription = observable.subscribe(s);

    // Handlers get the producer's error untouched.
    assert_eq!(*seen.lock().unwrap(), vec!["disk full"]);
    let e = subscription.error().unwrap();
    assert_eq!(e.to_string(), "writer observable emitted an error");
    assert_eq!(e.source().map(|s| s.to_string()).as_deref(), Some("disk full"));
}
