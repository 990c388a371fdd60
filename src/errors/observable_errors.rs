use std::error::Error as StdError;
use std::sync::Arc;

use thiserror::Error;

/// Shared error handle delivered to `Observer::error`.
pub type SharedError = Arc<dyn StdError + Send + Sync>;

/// Errors raised by the engine itself while driving a production strategy.
///
/// Producer errors supplied by callers travel as any `Error` type; these variants
/// cover the failures the engine detects on its own.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ObservableError {
    /// `Interval` was built with a zero-length period.
    #[error("interval period must be greater than zero")]
    ZeroPeriod,

    /// `Interval` was built with a period too long to schedule its first tick.
    #[error("interval period is too long to schedule")]
    PeriodTooLong,

    /// The task producing `Interval` ticks stopped unexpectedly.
    #[error("interval ticker failed: {message}")]
    TickerFailed { message: String },

    /// A `Start` directive panicked instead of returning an event.
    #[error("directive {index} panicked: {message}")]
    DirectivePanicked { index: usize, message: String },

    /// The private runtime driving an asynchronous subscription could not be built.
    #[error("failed to build subscription runtime")]
    Runtime(#[from] std::io::Error),

    /// An error re-labelled with the name of the observable that emitted it.
    #[error("{name} observable emitted an error")]
    Named {
        name: String,
        #[source]
        source: SharedError,
    },

    /// Ad-hoc producer failure carrying only a message.
    #[error("{0}")]
    Message(String),
}

impl ObservableError {
    /// Wraps `source` so that it reports the emitting observable's `name`.
    pub fn named(name: impl Into<String>, source: impl StdError + Send + Sync + 'static) -> Self {
        Self::Named {
            name: name.into(),
            source: Arc::new(source),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::ZeroPeriod => "zero_period",
            Self::PeriodTooLong => "period_too_long",
            Self::TickerFailed { .. } => "ticker_failed",
            Self::DirectivePanicked { .. } => "directive_panicked",
            Self::Runtime(_) => "runtime_build_failed",
            Self::Named { .. } => "named",
            Self::Message(_) => "message",
        }
    }

    pub(crate) fn shared(self) -> SharedError {
        Arc::new(self)
    }
}

/// Log label for any error delivered to a subscriber. Errors that did not come
/// from the engine are labelled `producer`.
pub(crate) fn label_of(e: &SharedError) -> &'static str {
    e.downcast_ref::<ObservableError>()
        .map_or("producer", ObservableError::as_label)
}
