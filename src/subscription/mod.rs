//! Provides structures and traits related to subscription management.
//!
//! This module includes `Subscriber` for handling observed values, errors and
//! completion, and `Subscription` for inspecting and cancelling a run.
pub mod subscribe;
