//! # Engine configuration.
//!
//! [`Config`] carries the tunables of the concurrent constructors. It is passed to
//! [`Observable::start_with`](crate::Observable::start_with) and
//! [`Observable::interval_with`](crate::Observable::interval_with); the plain
//! `start` / `interval` constructors use [`Config::default`].

use tokio::time::MissedTickBehavior;

/// What an `Interval` does when a tick is late, e.g. because a callback ran
/// longer than one period.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissedTick {
    /// Shift the schedule so consecutive ticks stay at least one period apart.
    #[default]
    Delay,
    /// Drop the missed ticks and resume on the next aligned boundary.
    Skip,
    /// Fire the missed ticks back to back until the schedule has caught up.
    Burst,
}

impl From<MissedTick> for MissedTickBehavior {
    fn from(m: MissedTick) -> Self {
        match m {
            MissedTick::Delay => MissedTickBehavior::Delay,
            MissedTick::Skip => MissedTickBehavior::Skip,
            MissedTick::Burst => MissedTickBehavior::Burst,
        }
    }
}

/// Settings for `Start` and `Interval` subscriptions.
///
/// ## Field semantics
/// - `thread_name_prefix`: directive threads are named `{prefix}-{index}`
/// - `missed_tick`: late-tick policy for `Interval`; `Burst` gives up the
///   guarantee that deliveries are spaced by at least one period
#[derive(Clone, Debug)]
pub struct Config {
    pub thread_name_prefix: String,
    pub missed_tick: MissedTick,
}

impl Config {
    pub(crate) fn thread_name(&self, index: usize) -> String {
        format!("{}-{index}", self.thread_name_prefix)
    }
}

impl Default for Config {
    /// - `thread_name_prefix = "grx-directive"`
    /// - `missed_tick = MissedTick::Delay`
    fn default() -> Self {
        Self {
            thread_name_prefix: "grx-directive".to_string(),
            missed_tick: MissedTick::Delay,
        }
    }
}
