//! In-memory command channel.
//!
//! Serves parameter records from a queue and keeps every envelope it is
//! handed. Nothing leaves the process.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use super::CommandChannel;
use crate::session::{MetricEnvelope, ParameterRecord};
use crate::{Error, Result};

/// An envelope as received by a [`MemoryChannel`].
#[derive(Debug, Clone, PartialEq)]
pub struct SentMetric {
    envelope: MetricEnvelope,
    received_at: DateTime<Utc>,
}

impl SentMetric {
    /// Get the envelope.
    #[must_use]
    pub const fn envelope(&self) -> &MetricEnvelope {
        &self.envelope
    }

    /// Get the wall-clock time the channel accepted the envelope.
    #[must_use]
    pub const fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }
}

/// Command channel backed by process memory.
///
/// # Example
///
/// ```rust
/// use trial_runtime::channel::MemoryChannel;
/// use trial_runtime::session::{ParameterRecord, TrialEnv};
/// use trial_runtime::Trial;
///
/// # fn example() -> trial_runtime::Result<()> {
/// let mut params = serde_json::Map::new();
/// params.insert("lr".to_string(), serde_json::json!(0.01));
///
/// let channel = MemoryChannel::with_parameters([ParameterRecord::new("pid-1", params)]);
/// let mut trial = Trial::new(TrialEnv::default(), channel)?;
///
/// trial.get_next_parameter()?;
/// trial.report_final_result(0.95)?;
/// assert_eq!(trial.channel().sent().len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryChannel {
    pending: VecDeque<ParameterRecord>,
    sent: Vec<SentMetric>,
    fail_receives: bool,
    fail_sends: bool,
}

impl MemoryChannel {
    /// Create a channel with no queued parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a channel that hands out the given records in order.
    #[must_use]
    pub fn with_parameters(records: impl IntoIterator<Item = ParameterRecord>) -> Self {
        Self {
            pending: records.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Queue another parameter record.
    pub fn push_parameter(&mut self, record: ParameterRecord) {
        self.pending.push_back(record);
    }

    /// Make subsequent receives fail (or succeed again).
    ///
    /// A failing receive leaves the queue untouched.
    pub fn set_fail_receives(&mut self, fail: bool) {
        self.fail_receives = fail;
    }

    /// Make subsequent sends fail (or succeed again).
    pub fn set_fail_sends(&mut self, fail: bool) {
        self.fail_sends = fail;
    }

    /// Number of records still queued.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Everything sent so far, in send order.
    #[must_use]
    pub fn sent(&self) -> &[SentMetric] {
        &self.sent
    }

    /// The sent envelopes without timestamps.
    #[must_use]
    pub fn envelopes(&self) -> Vec<&MetricEnvelope> {
        self.sent.iter().map(SentMetric::envelope).collect()
    }

    /// Drop all recorded envelopes.
    pub fn clear_sent(&mut self) {
        self.sent.clear();
    }
}

impl CommandChannel for MemoryChannel {
    fn receive_parameter(&mut self) -> Result<Option<ParameterRecord>> {
        if self.fail_receives {
            return Err(Error::Channel("memory channel rejected receive".to_string()));
        }
        Ok(self.pending.pop_front())
    }

    fn send_metric(&mut self, envelope: MetricEnvelope) -> Result<()> {
        if self.fail_sends {
            return Err(Error::Channel("memory channel rejected send".to_string()));
        }
        self.sent.push(SentMetric {
            envelope,
            received_at: Utc::now(),
        });
        Ok(())
    }
}
