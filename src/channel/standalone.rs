//! Channel for trials run without a tuner.
//!
//! Never yields parameters; metrics only go to the log.

use super::CommandChannel;
use crate::session::{MetricEnvelope, MetricType, ParameterRecord};
use crate::Result;

/// Command channel used when no orchestrating platform is present.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandaloneChannel;

impl StandaloneChannel {
    /// Create a standalone channel.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CommandChannel for StandaloneChannel {
    fn receive_parameter(&mut self) -> Result<Option<ParameterRecord>> {
        tracing::warn!(
            "Running trial code without a tuner; no hyperparameters are available. \
             Launch the trial through an experiment to receive sampled parameters."
        );
        Ok(None)
    }

    fn send_metric(&mut self, envelope: MetricEnvelope) -> Result<()> {
        let value = serde_json::to_string(envelope.value())?;
        match envelope.metric_type() {
            MetricType::Periodical => {
                tracing::info!(sequence = envelope.sequence(), "Intermediate result: {value}");
            }
            MetricType::Final => tracing::info!("Final result: {value}"),
        }
        Ok(())
    }
}
