//! Trial session - parameter retrieval and metric reporting

use serde_json::Value;

use super::{Identity, Metric, MetricEnvelope, ParameterId, ParameterRecord, Parameters, TrialEnv};
use crate::channel::{CommandChannel, StandaloneChannel};
use crate::{Error, Result};

/// State of one trial process and the channel it reports through.
///
/// A session owns the current [`ParameterRecord`], the trial [`Identity`]
/// and the intermediate sequence counter. It is meant to be driven by a
/// single thread; every mutating operation takes `&mut self`.
///
/// ## Protocol
///
/// 1. [`get_next_parameter`](Self::get_next_parameter) fetches the parameter
///    set once.
/// 2. [`report_intermediate_result`](Self::report_intermediate_result) sends
///    `PERIODICAL` metrics numbered `0, 1, 2, ...`.
/// 3. [`report_final_result`](Self::report_final_result) sends one `FINAL`
///    metric with sequence `0`.
///
/// Every envelope is tagged with the parameter id of the stored record.
/// Outside a platform, reporting without parameters is allowed and tagged
/// with no id.
#[derive(Debug)]
pub struct Trial<C> {
    channel: C,
    env: TrialEnv,
    identity: Identity,
    params: Option<ParameterRecord>,
    intermediate_seq: i64,
}

impl Trial<StandaloneChannel> {
    /// Session for a trial run without any platform or tuner.
    #[must_use]
    pub fn standalone() -> Self {
        Self {
            channel: StandaloneChannel::new(),
            env: TrialEnv::default(),
            identity: Identity::standalone(),
            params: None,
            intermediate_seq: 0,
        }
    }
}

impl<C: CommandChannel> Trial<C> {
    /// Create a session from environment signals and a channel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSequenceId`] if the sequence id signal is
    /// present but not an integer.
    pub fn new(env: TrialEnv, channel: C) -> Result<Self> {
        let identity = Identity::from_env(&env)?;
        tracing::debug!(
            experiment_id = identity.experiment_id(),
            trial_id = identity.trial_id(),
            sequence_id = identity.sequence_id(),
            standalone = env.is_standalone(),
            "trial session initialized"
        );
        Ok(Self {
            channel,
            env,
            identity,
            params: None,
            intermediate_seq: 0,
        })
    }

    /// Create a session from the process environment.
    ///
    /// # Errors
    ///
    /// See [`Trial::new`].
    pub fn from_env(channel: C) -> Result<Self> {
        Self::new(TrialEnv::from_env(), channel)
    }

    /// Fetch the hyperparameters sampled by the tuner.
    ///
    /// Returns `None` when the channel has nothing to offer, e.g. when no
    /// tuner is present. Each trial should call this once; a repeated call
    /// replaces the stored record and later metrics carry the new id.
    ///
    /// # Errors
    ///
    /// Propagates channel errors unchanged.
    pub fn get_next_parameter(&mut self) -> Result<Option<Parameters>> {
        let record = self.channel.receive_parameter()?;
        if let Some(previous) = &self.params {
            tracing::warn!(
                previous = ?previous.parameter_id(),
                "parameters fetched more than once in this trial; replacing the stored record"
            );
        }
        self.params = record;
        Ok(self.params.as_ref().map(|record| record.parameters().clone()))
    }

    /// Alias of [`get_next_parameter`](Self::get_next_parameter).
    ///
    /// # Errors
    ///
    /// Propagates channel errors unchanged.
    pub fn get_next_parameters(&mut self) -> Result<Option<Parameters>> {
        self.get_next_parameter()
    }

    /// The stored parameters, if any were received.
    #[must_use]
    pub fn current_parameters(&self) -> Option<&Parameters> {
        self.params.as_ref().map(ParameterRecord::parameters)
    }

    /// Look up one stored parameter by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParameterNotFound`] if parameters are stored but the
    /// tag is not among them.
    pub fn current_parameter(&self, tag: &str) -> Result<Option<&Value>> {
        match self.current_parameters() {
            None => Ok(None),
            Some(params) => params
                .get(tag)
                .map(Some)
                .ok_or_else(|| Error::ParameterNotFound(tag.to_string())),
        }
    }

    /// Get the whole stored mapping (no tag) or a single entry (with tag).
    ///
    /// # Errors
    ///
    /// See [`Trial::current_parameter`].
    pub fn get_current_parameter(&self, tag: Option<&str>) -> Result<Option<Value>> {
        match tag {
            None => Ok(self.current_parameters().cloned().map(Value::Object)),
            Some(tag) => Ok(self.current_parameter(tag)?.cloned()),
        }
    }

    /// Parameter id of the stored record.
    #[must_use]
    pub fn parameter_id(&self) -> Option<&ParameterId> {
        self.params.as_ref().and_then(ParameterRecord::parameter_id)
    }

    /// Report an intermediate result, e.g. per-epoch accuracy.
    ///
    /// The sequence counter advances only after the channel accepted the
    /// envelope.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UsageViolation`] if called before parameters were
    /// fetched in an orchestrated run; propagates channel errors unchanged.
    pub fn report_intermediate_result(&mut self, metric: impl Into<Metric>) -> Result<()> {
        self.ensure_reportable("report_intermediate_result")?;
        let envelope = MetricEnvelope::periodical(
            self.parameter_id().cloned(),
            self.env.trial_job_id().map(str::to_string),
            self.intermediate_seq,
            metric.into(),
        );
        tracing::debug!(sequence = envelope.sequence(), "sending intermediate result");
        self.channel.send_metric(envelope)?;
        self.intermediate_seq += 1;
        Ok(())
    }

    /// Report the final result of the trial.
    ///
    /// Sent with sequence `0`; the intermediate counter is left untouched.
    ///
    /// # Errors
    ///
    /// Same as [`Trial::report_intermediate_result`].
    pub fn report_final_result(&mut self, metric: impl Into<Metric>) -> Result<()> {
        self.ensure_reportable("report_final_result")?;
        let envelope = MetricEnvelope::final_result(
            self.parameter_id().cloned(),
            self.env.trial_job_id().map(str::to_string),
            metric.into(),
        );
        tracing::debug!("sending final result");
        self.channel.send_metric(envelope)
    }

    fn ensure_reportable(&self, operation: &str) -> Result<()> {
        if self.params.is_some() || self.env.is_standalone() {
            return Ok(());
        }
        Err(Error::UsageViolation(format!(
            "get_next_parameter() needs to be called before {operation}"
        )))
    }
}

impl<C> Trial<C> {
    /// Overwrite the intermediate sequence counter, e.g. to resume a trial.
    ///
    /// The value is taken as-is; the next intermediate result carries it.
    pub fn overwrite_intermediate_seq(&mut self, value: i64) {
        self.intermediate_seq = value;
    }

    /// Sequence number the next intermediate result will carry.
    #[must_use]
    pub const fn intermediate_sequence(&self) -> i64 {
        self.intermediate_seq
    }

    /// Get the trial identity.
    #[must_use]
    pub const fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Get the experiment ID.
    #[must_use]
    pub fn experiment_id(&self) -> &str {
        self.identity.experiment_id()
    }

    /// Get the ID of the running trial.
    #[must_use]
    pub fn trial_id(&self) -> &str {
        self.identity.trial_id()
    }

    /// Get the sequence number of the running trial.
    #[must_use]
    pub const fn sequence_id(&self) -> i64 {
        self.identity.sequence_id()
    }

    /// Whether the trial runs outside any platform.
    #[must_use]
    pub const fn is_standalone(&self) -> bool {
        self.env.is_standalone()
    }

    /// Get the command channel.
    #[must_use]
    pub const fn channel(&self) -> &C {
        &self.channel
    }

    /// Get the command channel mutably.
    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Consume the session, returning its channel.
    pub fn into_channel(self) -> C {
        self.channel
    }
}
