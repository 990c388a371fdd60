//! A minimal reactive-stream engine.
//!
//! An [`Observable`] wraps one production strategy. Subscribing with a
//! [`Subscriber`](subscribe::Subscriber) runs that strategy and delivers zero or
//! more values followed by exactly one terminal call, either `complete` or
//! `error`, never both.
//!
//! Constructors:
//!
//! - [`Observable::empty`], [`Observable::just`], [`Observable::from_values`]:
//!   synchronous, all callbacks fire before `subscribe` returns.
//! - [`Observable::start`]: runs several [`Directive`]s concurrently and delivers
//!   their results in completion order.
//! - [`Observable::interval`]: emits increasing counters on a timer until the
//!   subscription is cancelled.
//!
//! Handlers are always invoked from the thread that called `subscribe`, one at a
//! time, even when production is concurrent. A panic inside a handler unwinds out
//! of `subscribe`.
//!
//! ```
//! use std::sync::{Arc, Mutex};
//!
//! use grx::{subscribe::Subscriber, Observable, Subscribeable};
//!
//! let log = Arc::new(Mutex::new(Vec::new()));
//! let (next_log, done_log) = (Arc::clone(&log), Arc::clone(&log));
//!
//! let mut subscriber = Subscriber::on_next(move |v: i32| next_log.lock().unwrap().push(v + 1));
//! subscriber.on_complete(move || done_log.lock().unwrap().push(0));
//!
//! Observable::just(1).subscribe(subscriber);
//! assert_eq!(*log.lock().unwrap(), vec![2, 0]);
//! ```

mod config;
mod errors;
mod event;
mod observable;
mod subscription;

pub mod observer;

pub use config::*;
pub use errors::*;
pub use event::*;
pub use observable::*;
pub use observer::Observer;
pub use subscription::subscribe;
pub use subscription::subscribe::{Subscribeable, Unsubscribeable};

pub use tokio_util::sync::CancellationToken;
