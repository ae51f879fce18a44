//! Parameter Record - a hyperparameter set handed out by the tuner

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Result;

/// Hyperparameter name to sampled value.
pub type Parameters = serde_json::Map<String, Value>;

/// Opaque identifier the tuner attaches to a parameter set.
///
/// Tuners emit either integers or strings; both round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterId {
    /// Numeric id
    Int(i64),
    /// Textual id
    Str(String),
}

impl fmt::Display for ParameterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Str(id) => f.write_str(id),
        }
    }
}

impl From<i64> for ParameterId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<&str> for ParameterId {
    fn from(id: &str) -> Self {
        Self::Str(id.to_string())
    }
}

impl From<String> for ParameterId {
    fn from(id: String) -> Self {
        Self::Str(id)
    }
}

/// A parameter set together with its identity.
///
/// Never mutated in place: a new fetch replaces the whole record. The id
/// may be absent (`null`), in which case metrics are tagged with no id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRecord {
    #[serde(default)]
    parameter_id: Option<ParameterId>,
    parameters: Parameters,
}

impl ParameterRecord {
    /// Create a new parameter record.
    #[must_use]
    pub fn new(parameter_id: impl Into<ParameterId>, parameters: Parameters) -> Self {
        Self {
            parameter_id: Some(parameter_id.into()),
            parameters,
        }
    }

    /// Create a parameter record that carries no id.
    #[must_use]
    pub const fn anonymous(parameters: Parameters) -> Self {
        Self {
            parameter_id: None,
            parameters,
        }
    }

    /// Parse a record from its JSON form.
    ///
    /// ```rust
    /// use trial_runtime::session::{ParameterId, ParameterRecord};
    ///
    /// let record = ParameterRecord::from_json(
    ///     r#"{"parameter_id": 3, "parameters": {"lr": 0.01}}"#,
    /// )?;
    /// assert_eq!(record.parameter_id(), Some(&ParameterId::Int(3)));
    /// # Ok::<(), trial_runtime::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Json`] if the text is not a valid record.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Get the parameter ID, if the tuner assigned one.
    #[must_use]
    pub const fn parameter_id(&self) -> Option<&ParameterId> {
        self.parameter_id.as_ref()
    }

    /// Get the sampled parameters.
    #[must_use]
    pub const fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Consume the record, keeping only the parameters.
    #[must_use]
    pub fn into_parameters(self) -> Parameters {
        self.parameters
    }
}
