//! Trial identity - environment-derived signals read once per process

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Placeholder id used when no orchestrating platform supplies one.
pub const STANDALONE_ID: &str = "STANDALONE";

/// Environment variable naming the orchestrating platform.
pub const ENV_PLATFORM: &str = "NNI_PLATFORM";
/// Environment variable carrying the experiment id.
pub const ENV_EXPERIMENT_ID: &str = "NNI_EXP_ID";
/// Environment variable carrying the trial job id.
pub const ENV_TRIAL_JOB_ID: &str = "NNI_TRIAL_JOB_ID";
/// Environment variable carrying the trial sequence number.
pub const ENV_TRIAL_SEQ_ID: &str = "NNI_TRIAL_SEQ_ID";

/// Raw environment signals of a trial process.
///
/// Values are kept exactly as found; defaults are applied when an
/// [`Identity`] is derived from them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialEnv {
    platform: Option<String>,
    experiment_id: Option<String>,
    trial_job_id: Option<String>,
    trial_seq_id: Option<String>,
}

impl TrialEnv {
    /// Read the signals from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the signals through an arbitrary lookup function.
    ///
    /// ```rust
    /// use trial_runtime::session::TrialEnv;
    ///
    /// let env = TrialEnv::from_lookup(|key| (key == "NNI_EXP_ID").then(|| "exp-7".to_string()));
    /// assert_eq!(env.experiment_id(), Some("exp-7"));
    /// assert!(env.platform().is_none());
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            platform: lookup(ENV_PLATFORM),
            experiment_id: lookup(ENV_EXPERIMENT_ID),
            trial_job_id: lookup(ENV_TRIAL_JOB_ID),
            trial_seq_id: lookup(ENV_TRIAL_SEQ_ID),
        }
    }

    /// Set the platform signal.
    #[must_use]
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Set the experiment id signal.
    #[must_use]
    pub fn with_experiment_id(mut self, experiment_id: impl Into<String>) -> Self {
        self.experiment_id = Some(experiment_id.into());
        self
    }

    /// Set the trial job id signal.
    #[must_use]
    pub fn with_trial_job_id(mut self, trial_job_id: impl Into<String>) -> Self {
        self.trial_job_id = Some(trial_job_id.into());
        self
    }

    /// Set the raw trial sequence id signal.
    #[must_use]
    pub fn with_trial_seq_id(mut self, trial_seq_id: impl Into<String>) -> Self {
        self.trial_seq_id = Some(trial_seq_id.into());
        self
    }

    /// Get the platform signal, if set.
    #[must_use]
    pub fn platform(&self) -> Option<&str> {
        self.platform.as_deref()
    }

    /// Get the experiment id signal, if set.
    #[must_use]
    pub fn experiment_id(&self) -> Option<&str> {
        self.experiment_id.as_deref()
    }

    /// Get the raw trial job id signal, if set.
    #[must_use]
    pub fn trial_job_id(&self) -> Option<&str> {
        self.trial_job_id.as_deref()
    }

    /// Get the raw trial sequence id signal, if set.
    #[must_use]
    pub fn trial_seq_id(&self) -> Option<&str> {
        self.trial_seq_id.as_deref()
    }

    /// Whether the process runs outside any orchestrating platform.
    ///
    /// Only absence counts: an empty `NNI_PLATFORM` is still a platform.
    #[must_use]
    pub const fn is_standalone(&self) -> bool {
        self.platform.is_none()
    }
}

/// Immutable identity of the running trial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    experiment_id: String,
    trial_id: String,
    sequence_id: i64,
}

impl Identity {
    /// Derive the identity from environment signals.
    ///
    /// Empty or missing ids fall back to [`STANDALONE_ID`], a missing
    /// sequence id falls back to `0`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSequenceId`] if the sequence id is present but
    /// not an integer.
    pub fn from_env(env: &TrialEnv) -> Result<Self> {
        let sequence_id = match env.trial_seq_id() {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .map_err(|source| Error::InvalidSequenceId {
                    value: raw.to_string(),
                    source,
                })?,
            None => 0,
        };

        Ok(Self {
            experiment_id: or_standalone(env.experiment_id()),
            trial_id: or_standalone(env.trial_job_id()),
            sequence_id,
        })
    }

    /// Identity of a trial run without a platform.
    #[must_use]
    pub fn standalone() -> Self {
        Self {
            experiment_id: STANDALONE_ID.to_string(),
            trial_id: STANDALONE_ID.to_string(),
            sequence_id: 0,
        }
    }

    /// Get the experiment ID.
    #[must_use]
    pub fn experiment_id(&self) -> &str {
        &self.experiment_id
    }

    /// Get the trial ID.
    ///
    /// Shown as "ID" in the experiment's trial table.
    #[must_use]
    pub fn trial_id(&self) -> &str {
        &self.trial_id
    }

    /// Get the trial sequence number ("Trial No.").
    #[must_use]
    pub const fn sequence_id(&self) -> i64 {
        self.sequence_id
    }
}

fn or_standalone(value: Option<&str>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or(STANDALONE_ID)
        .to_string()
}
