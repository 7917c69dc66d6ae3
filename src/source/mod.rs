//! Data source abstraction for receiving dashboard updates.
//!
//! The dashboard never reads sensors or files itself. Two independent pollers
//! (see [`poller`]) do that on a timer and publish their latest results on
//! watch channels; a [`DataSource`] hands those results to the UI one
//! [`Update`] at a time.

mod channel;
mod log;
pub mod poller;
pub mod sampler;

pub use channel::{ChannelSource, PollResult, Publishers};
pub use log::{append_sample, LogReader};
pub use poller::Pollers;
pub use sampler::Sampler;

use std::fmt::Debug;

use crate::data::{LoggingStatus, Reading};

/// A single result from one of the pollers.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// A fresh live reading.
    Reading(Reading),
    /// A fresh view of the install state and log.
    Logging(LoggingStatus),
}

/// Trait for receiving dashboard updates.
///
/// # Example
///
/// ```
/// use thermwatch::{ChannelSource, DataSource};
///
/// let (_publishers, mut source) = ChannelSource::create("local");
/// while let Some(update) = source.poll() {
///     println!("{:?}", update);
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Take the next pending update, if any.
    ///
    /// This method must not block; call it until it returns `None` to drain
    /// everything that arrived since the last call.
    fn poll(&mut self) -> Option<Update>;

    /// Ask the pollers to run now instead of waiting for the next tick.
    fn refresh(&self) {}

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;

    /// Error text from the most recent failed poll, if the poller has not
    /// succeeded since.
    fn error(&self) -> Option<&str>;
}
