//! Runs three fake requests concurrently and prints each response as soon as it
//! arrives, followed by a completion marker.

use std::{thread, time::Duration};

use grx::{directive, subscribe::Subscriber, Directive, Event, Observable, Subscribeable};

fn fake_request(status_code: u16, latency_ms: u64) -> Directive<u16> {
    directive(move || {
        thread::sleep(Duration::from_millis(latency_ms));
        Event::Value(status_code)
    })
}

fn main() {
    let mut responses = Observable::start(vec![
        fake_request(404, 20),
        fake_request(200, 10),
        fake_request(500, 30),
    ])
    .with_name("fake-requests");

    let observer = Subscriber::new(
        |code: u16| println!("response {code}"),
        |e| eprintln!("request failed: {e}"),
        || println!("all requests finished"),
    );

    // Prints 200, 404 and 500 in that order: responses arrive by latency.
    responses.subscribe(observer);
}
