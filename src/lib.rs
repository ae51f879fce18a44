//! # Trial Runtime: trial-side API for hyperparameter optimization
//!
//! A training script uses this crate to fetch the hyperparameters a tuner
//! sampled for it, report intermediate and final metrics, and learn which
//! experiment and trial it belongs to.
//!
//! ## Design Principles
//!
//! - **Explicit session**: all trial state lives in a [`Trial`] value, not in
//!   process globals
//! - **Injected transport**: the tuner is reached through a
//!   [`channel::CommandChannel`]; tests use [`channel::MemoryChannel`]
//! - **Graceful standalone mode**: without a platform, parameters are absent
//!   and metrics are logged instead of failing
//!
//! ## Example Usage
//!
//! ```rust
//! use trial_runtime::Trial;
//!
//! let mut trial = Trial::standalone();
//! assert_eq!(trial.trial_id(), "STANDALONE");
//!
//! let params = trial.get_next_parameter()?;
//! assert!(params.is_none());
//!
//! trial.report_intermediate_result(0.42)?;
//! trial.report_final_result(0.91)?;
//! # Ok::<(), trial_runtime::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod channel;
pub mod error;
pub mod session;

pub use error::{Error, Result};
pub use session::Trial;
