//! Metric values and the envelope sent to the tuner

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ParameterId;
use crate::Error;

/// A reported metric.
///
/// Either a bare number or a mapping whose `default` entry is the number the
/// tuner optimizes; other entries are carried along for visualization.
///
/// ```rust
/// use trial_runtime::session::Metric;
///
/// let metric = Metric::try_from(serde_json::json!({"default": 0.93, "loss": 0.21}))?;
/// assert!((metric.default_value() - 0.93).abs() < f64::EPSILON);
/// # Ok::<(), trial_runtime::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Metric {
    /// Bare numeric value
    Scalar(f64),
    /// Mapping with a required `default` value
    Detailed {
        /// Value used by the tuner
        default: f64,
        /// Additional named values
        #[serde(flatten)]
        extra: serde_json::Map<String, Value>,
    },
}

impl Metric {
    /// Build a detailed metric with no extra values.
    #[must_use]
    pub fn detailed(default: f64) -> Self {
        Self::Detailed {
            default,
            extra: serde_json::Map::new(),
        }
    }

    /// Attach an extra named value, promoting a scalar to a detailed metric.
    #[must_use]
    pub fn with_extra(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let (default, mut extra) = match self {
            Self::Scalar(default) => (default, serde_json::Map::new()),
            Self::Detailed { default, extra } => (default, extra),
        };
        extra.insert(key.into(), value.into());
        Self::Detailed { default, extra }
    }

    /// The value the tuner consumes.
    #[must_use]
    pub const fn default_value(&self) -> f64 {
        match self {
            Self::Scalar(value) | Self::Detailed { default: value, .. } => *value,
        }
    }
}

impl From<f64> for Metric {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<f32> for Metric {
    fn from(value: f32) -> Self {
        Self::Scalar(f64::from(value))
    }
}

impl From<i32> for Metric {
    fn from(value: i32) -> Self {
        Self::Scalar(f64::from(value))
    }
}

impl From<u32> for Metric {
    fn from(value: u32) -> Self {
        Self::Scalar(f64::from(value))
    }
}

impl From<i64> for Metric {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        Self::Scalar(value as f64)
    }
}

impl TryFrom<Value> for Metric {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Number(number) => number
                .as_f64()
                .map(Self::Scalar)
                .ok_or_else(|| Error::InvalidMetric(format!("{number} is not representable as f64"))),
            Value::Object(mut extra) => {
                let default = extra
                    .remove("default")
                    .ok_or_else(|| Error::InvalidMetric("mapping has no \"default\" entry".to_string()))?;
                let default = default.as_f64().ok_or_else(|| {
                    Error::InvalidMetric(format!("\"default\" must be numeric, got {default}"))
                })?;
                Ok(Self::Detailed { default, extra })
            }
            other => Err(Error::InvalidMetric(format!(
                "expected a number or a mapping, got {other}"
            ))),
        }
    }
}

/// Kind of a reported metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricType {
    /// Intermediate result, one per reporting period
    Periodical,
    /// Final result of the trial
    Final,
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Periodical => f.write_str("PERIODICAL"),
            Self::Final => f.write_str("FINAL"),
        }
    }
}

/// Message carrying one metric to the tuner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricEnvelope {
    parameter_id: Option<ParameterId>,
    trial_job_id: Option<String>,
    #[serde(rename = "type")]
    metric_type: MetricType,
    sequence: i64,
    value: Metric,
}

impl MetricEnvelope {
    /// Envelope for an intermediate result at the given sequence number.
    #[must_use]
    pub const fn periodical(
        parameter_id: Option<ParameterId>,
        trial_job_id: Option<String>,
        sequence: i64,
        value: Metric,
    ) -> Self {
        Self {
            parameter_id,
            trial_job_id,
            metric_type: MetricType::Periodical,
            sequence,
            value,
        }
    }

    /// Envelope for the final result. The sequence is always `0`.
    #[must_use]
    pub const fn final_result(
        parameter_id: Option<ParameterId>,
        trial_job_id: Option<String>,
        value: Metric,
    ) -> Self {
        Self {
            parameter_id,
            trial_job_id,
            metric_type: MetricType::Final,
            sequence: 0,
            value,
        }
    }

    /// Get the parameter ID, `None` in standalone mode.
    #[must_use]
    pub const fn parameter_id(&self) -> Option<&ParameterId> {
        self.parameter_id.as_ref()
    }

    /// Get the raw trial job ID signal.
    #[must_use]
    pub fn trial_job_id(&self) -> Option<&str> {
        self.trial_job_id.as_deref()
    }

    /// Get the metric type.
    #[must_use]
    pub const fn metric_type(&self) -> MetricType {
        self.metric_type
    }

    /// Get the sequence number.
    #[must_use]
    pub const fn sequence(&self) -> i64 {
        self.sequence
    }

    /// Get the metric.
    #[must_use]
    pub const fn value(&self) -> &Metric {
        &self.value
    }
}
