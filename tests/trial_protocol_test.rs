//! Trial reporting protocol tests
//!
//! Each test builds a fresh session from explicit environment signals, so no
//! test touches the process environment.

use serde_json::{json, Value};
use trial_runtime::channel::MemoryChannel;
use trial_runtime::session::{
    Metric, MetricType, ParameterId, ParameterRecord, Parameters, TrialEnv,
};
use trial_runtime::{Error, Trial};

fn params(value: Value) -> Parameters {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

fn sequences(channel: &MemoryChannel) -> Vec<i64> {
    channel.envelopes().iter().map(|e| e.sequence()).collect()
}

// =============================================================================
// Identity
// =============================================================================

#[test]
fn test_identity_defaults_without_platform() {
    let trial = Trial::new(TrialEnv::from_lookup(|_| None), MemoryChannel::new()).unwrap();

    assert_eq!(trial.experiment_id(), "STANDALONE");
    assert_eq!(trial.trial_id(), "STANDALONE");
    assert_eq!(trial.sequence_id(), 0);
    assert!(trial.is_standalone());
}

#[test]
fn test_identity_from_platform_signals() {
    let env = TrialEnv::from_lookup(|key| {
        let value = match key {
            "NNI_PLATFORM" => Some("local"),
            "NNI_EXP_ID" => Some("GPInK3Wx"),
            "NNI_TRIAL_JOB_ID" => Some("aZ3kq"),
            "NNI_TRIAL_SEQ_ID" => Some("42"),
            _ => None,
        };
        value.map(str::to_string)
    });
    let trial = Trial::new(env, MemoryChannel::new()).unwrap();

    assert_eq!(trial.experiment_id(), "GPInK3Wx");
    assert_eq!(trial.trial_id(), "aZ3kq");
    assert_eq!(trial.sequence_id(), 42);
    assert!(!trial.is_standalone());
}

#[test]
fn test_malformed_sequence_id_fails_construction() {
    let env = TrialEnv::default().with_trial_seq_id("4.5");
    let err = Trial::new(env, MemoryChannel::new()).unwrap_err();
    assert!(matches!(err, Error::InvalidSequenceId { .. }));
}

// =============================================================================
// Sequencing
// =============================================================================

#[test]
fn test_intermediate_sequence_is_monotonic() {
    let mut trial = Trial::new(TrialEnv::default(), MemoryChannel::new()).unwrap();

    for step in 0..5 {
        trial.report_intermediate_result(f64::from(step) / 10.0).unwrap();
    }

    let channel = trial.into_channel();
    assert_eq!(sequences(&channel), vec![0, 1, 2, 3, 4]);
    assert!(channel
        .envelopes()
        .iter()
        .all(|e| e.metric_type() == MetricType::Periodical));
}

#[test]
fn test_final_result_sequence_is_fixed() {
    let mut trial = Trial::new(TrialEnv::default(), MemoryChannel::new()).unwrap();

    for _ in 0..3 {
        trial.report_intermediate_result(0.5).unwrap();
    }
    trial.report_final_result(0.9).unwrap();

    assert_eq!(trial.intermediate_sequence(), 3);
    let channel = trial.into_channel();
    let last = channel.envelopes()[3];
    assert_eq!(last.metric_type(), MetricType::Final);
    assert_eq!(last.sequence(), 0);
}

#[test]
fn test_overwrite_sequence_counter() {
    let mut trial = Trial::new(TrialEnv::default(), MemoryChannel::new()).unwrap();

    trial.report_intermediate_result(0.1).unwrap();
    trial.overwrite_intermediate_seq(5);
    trial.report_intermediate_result(0.2).unwrap();
    trial.report_intermediate_result(0.3).unwrap();

    assert_eq!(sequences(trial.channel()), vec![0, 5, 6]);
}

#[test]
fn test_overwrite_with_negative_value_is_taken_as_is() {
    let mut trial = Trial::new(TrialEnv::default(), MemoryChannel::new()).unwrap();

    trial.report_intermediate_result(0.1).unwrap();
    trial.overwrite_intermediate_seq(-3);
    assert_eq!(trial.intermediate_sequence(), -3);
    trial.report_intermediate_result(0.2).unwrap();

    assert_eq!(sequences(trial.channel()), vec![0, -3]);
    assert_eq!(trial.intermediate_sequence(), -2);
}

// =============================================================================
// Parameter identity
// =============================================================================

#[test]
fn test_parameter_id_propagates_to_final_result() {
    let record = ParameterRecord::new("pid-1", params(json!({"a": 1, "b": "x"})));
    let mut trial = Trial::new(
        TrialEnv::default().with_platform("local"),
        MemoryChannel::with_parameters([record]),
    )
    .unwrap();

    let received = trial.get_next_parameter().unwrap();
    assert_eq!(received, Some(params(json!({"a": 1, "b": "x"}))));

    trial.report_final_result(0.95).unwrap();

    let envelope = trial.channel().envelopes()[0].clone();
    assert_eq!(envelope.parameter_id(), Some(&ParameterId::from("pid-1")));
    assert_eq!(envelope.value(), &Metric::Scalar(0.95));
}

#[test]
fn test_standalone_fallback_sends_null_parameter_id() {
    let mut trial = Trial::new(TrialEnv::default(), MemoryChannel::new()).unwrap();

    trial.report_intermediate_result(0.1).unwrap();

    let channel = trial.into_channel();
    let envelope = channel.envelopes()[0];
    assert!(envelope.parameter_id().is_none());
    assert!(envelope.trial_job_id().is_none());
    assert_eq!(
        serde_json::to_value(envelope).unwrap()["parameter_id"],
        Value::Null
    );
}

#[test]
fn test_reporting_before_fetch_in_orchestrated_run() {
    let mut trial = Trial::new(
        TrialEnv::default().with_platform("remote"),
        MemoryChannel::new(),
    )
    .unwrap();

    let err = trial.report_intermediate_result(0.1).unwrap_err();
    assert!(err.is_usage_violation());
    assert_eq!(trial.intermediate_sequence(), 0);
    assert!(trial.channel().sent().is_empty());
}

#[test]
fn test_receive_failure_propagates_and_keeps_record() {
    let record = ParameterRecord::new("pid-1", params(json!({"lr": 0.01})));
    let mut trial = Trial::new(
        TrialEnv::default().with_platform("local"),
        MemoryChannel::with_parameters([record]),
    )
    .unwrap();
    trial.get_next_parameter().unwrap();

    trial.channel_mut().set_fail_receives(true);
    let err = trial.get_next_parameter().unwrap_err();
    assert!(matches!(err, Error::Channel(_)));
    assert!(!err.is_usage_violation());

    assert_eq!(trial.parameter_id(), Some(&ParameterId::from("pid-1")));
    assert_eq!(
        trial.get_current_parameter(None).unwrap(),
        Some(json!({"lr": 0.01}))
    );

    trial.report_final_result(0.9).unwrap();
    assert_eq!(
        trial.channel().envelopes()[0].parameter_id(),
        Some(&ParameterId::from("pid-1"))
    );
}

#[test]
fn test_record_with_null_id_reports_null() {
    let record =
        ParameterRecord::from_json(r#"{"parameter_id": null, "parameters": {"lr": 0.01}}"#).unwrap();
    let mut trial = Trial::new(
        TrialEnv::default().with_platform("local"),
        MemoryChannel::with_parameters([record]),
    )
    .unwrap();

    trial.get_next_parameter().unwrap();
    trial.report_intermediate_result(0.5).unwrap();

    assert!(trial.channel().envelopes()[0].parameter_id().is_none());
}

// =============================================================================
// Tag lookup
// =============================================================================

#[test]
fn test_tag_lookup() {
    let record = ParameterRecord::new(0, params(json!({"lr": 0.01})));
    let mut trial =
        Trial::new(TrialEnv::default(), MemoryChannel::with_parameters([record])).unwrap();

    assert_eq!(trial.get_current_parameter(None).unwrap(), None);

    trial.get_next_parameter().unwrap();

    assert_eq!(trial.get_current_parameter(Some("lr")).unwrap(), Some(json!(0.01)));
    assert_eq!(
        trial.get_current_parameter(None).unwrap(),
        Some(json!({"lr": 0.01}))
    );
    assert!(matches!(
        trial.get_current_parameter(Some("missing")),
        Err(Error::ParameterNotFound(tag)) if tag == "missing"
    ));
}

#[test]
fn test_integer_metric_is_accepted() {
    let mut trial = Trial::new(TrialEnv::default(), MemoryChannel::new()).unwrap();

    trial.report_intermediate_result(3).unwrap();
    trial.report_final_result(1).unwrap();

    let values: Vec<Metric> = trial
        .channel()
        .envelopes()
        .iter()
        .map(|e| e.value().clone())
        .collect();
    assert_eq!(values, vec![Metric::Scalar(3.0), Metric::Scalar(1.0)]);
}

#[test]
fn test_detailed_metric_round_trips_through_channel() {
    let mut trial = Trial::new(TrialEnv::default(), MemoryChannel::new()).unwrap();
    let metric = Metric::try_from(json!({"default": 0.91, "top5": 0.99})).unwrap();

    trial.report_final_result(metric.clone()).unwrap();

    assert_eq!(trial.channel().envelopes()[0].value(), &metric);
}
