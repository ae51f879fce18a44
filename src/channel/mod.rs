//! Command Channel - the transport seam between a trial and its tuner
//!
//! A channel does two things: hand out the next parameter record and carry
//! metric envelopes back. The session never looks past this trait, so the
//! same trial code runs against a real transport, the standalone channel, or
//! the in-memory channel used in tests.
//!
//! # Example
//!
//! ```rust
//! use trial_runtime::channel::{CommandChannel, MemoryChannel};
//! use trial_runtime::session::{Metric, MetricEnvelope, ParameterRecord};
//!
//! # fn example() -> trial_runtime::Result<()> {
//! let mut channel = MemoryChannel::new();
//! channel.push_parameter(ParameterRecord::new(0, serde_json::Map::new()));
//!
//! assert!(channel.receive_parameter()?.is_some());
//! assert!(channel.receive_parameter()?.is_none());
//!
//! channel.send_metric(MetricEnvelope::final_result(None, None, Metric::from(0.9)))?;
//! assert_eq!(channel.sent().len(), 1);
//! # Ok(())
//! # }
//! ```

mod memory;
mod standalone;

pub use memory::{MemoryChannel, SentMetric};
pub use standalone::StandaloneChannel;

use crate::session::{MetricEnvelope, ParameterRecord};
use crate::Result;

/// Transport used by a trial session.
///
/// Timeouts, retries and framing all belong to the implementation; the
/// session propagates whatever error a channel returns.
pub trait CommandChannel {
    /// Receive the next parameter record.
    ///
    /// May block until the tuner answers. Returns `None` when no parameters
    /// are available, e.g. when no tuner is present.
    fn receive_parameter(&mut self) -> Result<Option<ParameterRecord>>;

    /// Send one metric envelope to the tuner.
    fn send_metric(&mut self, envelope: MetricEnvelope) -> Result<()>;
}

impl<C: CommandChannel + ?Sized> CommandChannel for Box<C> {
    fn receive_parameter(&mut self) -> Result<Option<ParameterRecord>> {
        (**self).receive_parameter()
    }

    fn send_metric(&mut self, envelope: MetricEnvelope) -> Result<()> {
        (**self).send_metric(envelope)
    }
}

impl<C: CommandChannel + ?Sized> CommandChannel for &mut C {
    fn receive_parameter(&mut self) -> Result<Option<ParameterRecord>> {
        (**self).receive_parameter()
    }

    fn send_metric(&mut self, envelope: MetricEnvelope) -> Result<()> {
        (**self).send_metric(envelope)
    }
}
