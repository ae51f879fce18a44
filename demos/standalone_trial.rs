//! Standalone Trial Example
//!
//! A toy training loop that runs the same way with or without a tuner.
//! Outside an experiment no parameters arrive, so defaults are used and
//! metrics go to the log.
//!
//! Run with: RUST_LOG=info cargo run --example standalone_trial

use anyhow::Context;
use serde_json::json;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use trial_runtime::session::Metric;
use trial_runtime::Trial;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    let mut trial = Trial::standalone();
    println!("=== Trial {} of experiment {} ===\n", trial.trial_id(), trial.experiment_id());

    let mut params = trial
        .get_next_parameter()
        .context("failed to fetch parameters")?
        .unwrap_or_default();
    params.entry("learning_rate").or_insert(json!(0.1));
    params.entry("epochs").or_insert(json!(5));

    let learning_rate = params["learning_rate"].as_f64().unwrap_or(0.1);
    let epochs = params["epochs"].as_u64().unwrap_or(5);
    println!("Parameters: {}", serde_json::to_string(&params)?);

    let mut accuracy = 0.0;
    for epoch in 0..epochs {
        accuracy += (1.0 - accuracy) * learning_rate * 3.0;
        trial
            .report_intermediate_result(accuracy)
            .with_context(|| format!("failed to report epoch {epoch}"))?;
        println!("   epoch {epoch}: accuracy {accuracy:.4}");
    }

    let loss = 1.0 - accuracy;
    trial.report_final_result(Metric::detailed(accuracy).with_extra("loss", loss))?;
    println!("\nFinal accuracy {accuracy:.4} after {} reports", trial.intermediate_sequence());

    Ok(())
}
