//! Trial Session - state and reporting API of one trial process
//!
//! ## Overview
//!
//! ```text
//! TrialEnv ──> Identity (immutable)
//!                 │
//! Trial ──────────┼── ParameterRecord (0..1, replaced on fetch)
//!   │             └── intermediate sequence counter
//!   └── CommandChannel ──> MetricEnvelope (PERIODICAL | FINAL)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use trial_runtime::channel::MemoryChannel;
//! use trial_runtime::session::{ParameterRecord, TrialEnv};
//! use trial_runtime::Trial;
//!
//! # fn example() -> trial_runtime::Result<()> {
//! let mut params = serde_json::Map::new();
//! params.insert("learning_rate".to_string(), serde_json::json!(0.02));
//! let channel = MemoryChannel::with_parameters([ParameterRecord::new(0, params)]);
//!
//! let mut trial = Trial::new(TrialEnv::default(), channel)?;
//! let params = trial.get_next_parameter()?.unwrap_or_default();
//!
//! for epoch in 0..3 {
//!     let accuracy = 0.5 + f64::from(epoch) * 0.1;
//!     trial.report_intermediate_result(accuracy)?;
//! }
//! trial.report_final_result(0.8)?;
//! # let _ = params;
//! # Ok(())
//! # }
//! ```

mod identity;
mod metric;
mod parameter_record;
mod trial;

pub use identity::{
    Identity, TrialEnv, ENV_EXPERIMENT_ID, ENV_PLATFORM, ENV_TRIAL_JOB_ID, ENV_TRIAL_SEQ_ID,
    STANDALONE_ID,
};
pub use metric::{Metric, MetricEnvelope, MetricType};
pub use parameter_record::{ParameterId, ParameterRecord, Parameters};
pub use trial::Trial;
