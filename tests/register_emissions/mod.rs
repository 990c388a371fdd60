#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};

use grx::subscribe::Subscriber;

/// One handler call observed by a recording subscriber.
#[derive(Debug, Clone, PartialEq)]
pub enum Emission<T> {
    Next(T),
    Error(String),
    Complete,
}

pub type Emissions<T> = Arc<Mutex<Vec<(Instant, Emission<T>)>>>;

/// Builds a subscriber that records every handler call, in order, with the
/// instant it happened.
pub fn register_emissions_subscriber<T: Send + 'static>() -> (Subscriber<T>, Emissions<T>) {
    let emissions: Emissions<T> = Arc::new(Mutex::new(Vec::with_capacity(16)));
    let nexts_c = Arc::clone(&emissions);
    let errors_c = Arc::clone(&emissions);
    let completes_c = Arc::clone(&emissions);

    let subscriber = Subscriber::new(
        move |v| {
            // Track next() calls.
            nexts_c.lock().unwrap().push((Instant::now(), Emission::Next(v)));
        },
        move |e| {
            // Track error() calls.
            errors_c
                .lock()
                .unwrap()
                .push((Instant::now(), Emission::Error(e.to_string())));
        },
        move || {
            // Track complete() calls.
            completes_c
                .lock()
                .unwrap()
                .push((Instant::now(), Emission::Complete));
        },
    );
    (subscriber, emissions)
}

/// The recorded calls without their timestamps.
pub fn kinds<T: Clone>(emissions: &Emissions<T>) -> Vec<Emission<T>> {
    emissions
        .lock()
        .unwrap()
        .iter()
        .map(|(_, e)| e.clone())
        .collect()
}

pub fn nexts<T: Clone>(emissions: &Emissions<T>) -> Vec<T> {
    kinds(emissions)
        .into_iter()
        .filter_map(|e| match e {
            Emission::Next(v) => Some(v),
            _ => None,
        })
        .collect()
}

pub fn count_terminals<T: Clone>(emissions: &Emissions<T>) -> (usize, usize) {
    kinds(emissions).iter().fold((0, 0), |(errors, completes), e| match e {
        Emission::Error(_) => (errors + 1, completes),
        Emission::Complete => (errors, completes + 1),
        Emission::Next(_) => (errors, completes),
    })
}

/// Panics unless the calls form `Next* (Error | Complete)?` with at most one terminal.
pub fn assert_terminal_protocol<T: Clone + std::fmt::Debug>(emissions: &Emissions<T>) {
    let kinds = kinds(emissions);
    if let Some(pos) = kinds.iter().position(|e| !matches!(e, Emission::Next(_))) {
        assert_eq!(
            pos,
            kinds.len() - 1,
            "handler called after a terminal call: {:?}",
            kinds
        );
    }
}
