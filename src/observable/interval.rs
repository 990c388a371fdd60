//! Periodic constructor.
//!
//! A ticker task owns a `tokio::time::Interval` and pushes successive counters
//! into a queue; the delivery loop forwards them to the subscriber until the
//! subscription is cancelled. The stream never completes on its own.
//!
//! Under [`MissedTick::Delay`] the delivery loop also holds a tick back until a
//! full period has passed since the previous handler call returned, so a late
//! tick never lands right behind the one before it.

use std::time::Duration;

use tokio::{
    sync::mpsc,
    time::{self, Instant},
};

use super::{runtime, Observable};
use crate::{
    config::{Config, MissedTick},
    observer::Observer,
    subscribe::Subscriber,
    ObservableError,
};

impl Observable<u64> {
    /// Emits `0, 1, 2, …`, one value per `period`, the first one after a full
    /// period has elapsed.
    ///
    /// `subscribe` blocks for as long as the stream runs, which is until the
    /// subscriber's cancellation token is cancelled. A zero `period` is reported
    /// as [`ObservableError::ZeroPeriod`] and a period too long to schedule as
    /// [`ObservableError::PeriodTooLong`], both without emitting anything.
    ///
    /// Like [`Observable::start`], it may be subscribed from a multi-thread tokio
    /// worker; on a current-thread runtime go through `spawn_blocking`.
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use grx::{subscribe::Subscriber, Observable, Subscribeable};
    ///
    /// let subscriber = Subscriber::on_next(|n: u64| println!("tick {n}"));
    /// let token = subscriber.cancellation_token();
    ///
    /// std::thread::spawn(move || {
    ///     std::thread::sleep(Duration::from_millis(25));
    ///     token.cancel();
    /// });
    ///
    /// let subscription = Observable::interval(Duration::from_millis(5)).subscribe(subscriber);
    /// assert!(subscription.is_cancelled());
    /// ```
    pub fn interval(period: Duration) -> Self {
        Self::interval_with(Config::default(), period)
    }

    /// Same as [`Observable::interval`] with explicit settings.
    pub fn interval_with(config: Config, period: Duration) -> Self {
        Observable::new(move |o| run_interval(&config, period, o))
    }
}

fn run_interval(config: &Config, period: Duration, o: &mut Subscriber<u64>) {
    if period.is_zero() {
        o.error(ObservableError::ZeroPeriod.shared());
        return;
    }
    if !o.is_open() {
        return;
    }

    let rt = runtime::subscription_runtime();

    let missed_tick = config.missed_tick;
    let token = o.cancellation_token();
    let outcome = rt.block_on(async {
        let Some(first) = Instant::now().checked_add(period) else {
            return Err(ObservableError::PeriodTooLong);
        };
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut ticker = tokio::spawn(async move {
            let mut ticks = time::interval_at(first, period);
            ticks.set_missed_tick_behavior(missed_tick.into());
            for n in 0u64.. {
                ticks.tick().await;
                if tx.send(n).is_err() {
                    break;
                }
            }
        });

        let pace = matches!(missed_tick, MissedTick::Delay);
        let mut last_delivery: Option<Instant> = None;
        let outcome = loop {
            let tick = tokio::select! {
                biased;
                _ = token.cancelled() => break Ok(()),
                n = rx.recv() => n,
            };
            let Some(n) = tick else {
                // The ticker never drops its sender while it is healthy.
                break match (&mut ticker).await {
                    Err(e) if e.is_panic() => Err(ObservableError::TickerFailed {
                        message: runtime::panic_message(&*e.into_panic()),
                    }),
                    Err(e) => Err(ObservableError::TickerFailed {
                        message: e.to_string(),
                    }),
                    Ok(()) => Err(ObservableError::TickerFailed {
                        message: "tick counter exhausted".to_string(),
                    }),
                };
            };

            let due = last_delivery.filter(|_| pace).and_then(|at| at.checked_add(period));
            if let Some(due) = due {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break Ok(()),
                    _ = time::sleep_until(due) => {}
                }
            }
            o.next(n);
            last_delivery = Some(Instant::now());
        };

        ticker.abort();
        tracing::debug!(?period, "interval stopped");
        outcome
    });

    match outcome {
        Ok(Ok(())) => {}
        Ok(Err(e)) | Err(e) => o.error(e.shared()),
    }
}
