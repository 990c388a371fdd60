//! Prints a tick every 100ms and stops the timer after half a second.

use std::{thread, time::Duration};

use grx::{subscribe::Subscriber, Observable, Subscribeable};

fn main() {
    let observer = Subscriber::on_next(|n: u64| println!("tick {n}"));
    let token = observer.cancellation_token();

    thread::spawn(move || {
        thread::sleep(Duration::from_millis(550));
        token.cancel();
    });

    let subscription = Observable::interval(Duration::from_millis(100)).subscribe(observer);
    println!("stopped, cancelled = {}", subscription.is_cancelled());
}
