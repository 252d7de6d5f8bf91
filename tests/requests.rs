//! End-to-end checks of the JSON request/response contract.

use rt_fractions::app::pipeline::evaluate;
use rt_fractions::data::ReferenceData;
use rt_fractions::domain::{EngineConfig, EngineResponse, ErrorResponse, TissueResponseModel};
use rt_fractions::io::parse_request;
use rt_fractions::models::probability;
use serde_json::{json, Value};

fn run(text: &str) -> Value {
    let request = parse_request(text).unwrap();
    let response = evaluate(&request, &ReferenceData::builtin(), &EngineConfig::default()).unwrap();
    serde_json::to_value(&response).unwrap()
}

fn close(v: &Value, expected: f64) -> bool {
    v.as_f64().is_some_and(|x| (x - expected).abs() < 1e-9)
}

#[test]
fn single_scheme_worked_example() {
    let out = run(r#"{"operation": "single", "dose_per_fraction": 2.0, "number_of_fractions": 30,
                      "treatment_time": 40, "alpha_beta": 10}"#);
    assert_eq!(out["operation"], "single");
    assert!(close(&out["total_dose"], 60.0));
    assert!(close(&out["bed"], 72.0));
    assert!(close(&out["eqd2"], 60.0));
    assert!(close(&out["time_corrected_bed"], 72.0 - 0.9 * 12.0));
    assert!(close(&out["survival_fraction"], (-0.3f64 * 72.0).exp()));
}

#[test]
fn gap_with_no_missed_days_costs_nothing() {
    let out = run(r#"{"operation": "gap", "dose_per_fraction": 2, "num_fractions": 30,
                      "alpha_beta": 10, "missed_days": 0}"#);
    assert_eq!(
        out,
        json!({
            "operation": "gap",
            "bed_lost": 0.0,
            "eqd2_lost": 0.0,
            "extra_physical_dose": 0.0,
            "extra_fractions": 0
        })
    );
}

#[test]
fn gap_rounds_extra_fractions_up() {
    let out = run(r#"{"operation": "gap", "dose_per_fraction": 2, "num_fractions": 30,
                      "alpha_beta": 10, "missed_days": 5}"#);
    assert!(close(&out["bed_lost"], 4.5));
    assert!(close(&out["eqd2_lost"], 3.75));
    assert!(close(&out["extra_physical_dose"], 3.75));
    assert_eq!(out["extra_fractions"], 2);
}

#[test]
fn organ_without_limit_leaves_assessment_unclassified() {
    let out = run(r#"{"operation": "multi_organ", "dose_per_fraction": 2, "number_of_fractions": 25,
                      "alpha_beta": 10, "oars": [{"label": "Unknown", "alpha_beta": 3}]}"#);
    let organ = &out["assessment"]["organs"][0];
    assert_eq!(organ["label"], "Unknown");
    assert!(organ["classification"].is_null());
    assert!(organ["ratio"].is_null());
    assert!(out["assessment"]["worst"].is_null());
    assert!(out["oars"][0]["ntcp"].is_null());
}

#[test]
fn catalogued_organs_are_classified_and_worst_is_reported() {
    // 48 Gy in 2 Gy fractions: cord EQD2 48 / 50 (warn), parotid EQD2 48 / 26 (fail).
    let out = run(r#"{"operation": "multi_organ", "dose_per_fraction": 2, "number_of_fractions": 24,
                      "alpha_beta": 10, "tumour_model": "Head & Neck SCC",
                      "oars": [{"label": "Spinal cord"}, {"label": "Parotid"}]}"#);
    let organs = &out["assessment"]["organs"];
    assert_eq!(organs[0]["classification"], "warn");
    assert_eq!(organs[1]["classification"], "fail");
    assert_eq!(out["assessment"]["worst"]["label"], "Parotid");
    assert!(out["tcp"].as_f64().is_some_and(|p| p > 0.0 && p < 1.0));
    assert!(out["oars"][0]["ntcp"].as_f64().is_some());
}

#[test]
fn risk_limit_round_trips_through_the_response_model() {
    let request = parse_request(
        r#"{"operation": "risk_limit", "label": "Spinal cord", "D50": 66.5, "gamma50": 2.28,
            "prob": 0.05, "alpha_beta": 2, "dose_per_fraction": 2}"#,
    )
    .unwrap();
    let response = evaluate(&request, &ReferenceData::builtin(), &EngineConfig::default()).unwrap();
    let EngineResponse::RiskLimit(limit) = response else {
        panic!("expected risk_limit response, got {response:?}");
    };

    let model = TissueResponseModel::new("Spinal cord", 66.5, 2.28);
    assert!((probability(&model, limit.dose_limit).unwrap() - 0.05).abs() < 1e-9);
    // At 2 Gy per fraction the EQD2 limit is the physical limit.
    assert!((limit.eqd2_limit - limit.dose_limit).abs() < 1e-9);
    assert!((limit.equivalent_fractions - limit.dose_limit / 2.0).abs() < 1e-9);
}

#[test]
fn validation_failures_become_error_documents() {
    let request = parse_request(
        r#"{"operation": "risk_limit", "D50": 50, "gamma50": 2, "prob": 1.0,
            "alpha_beta": 3, "dose_per_fraction": 2}"#,
    )
    .unwrap();
    let err = evaluate(&request, &ReferenceData::builtin(), &EngineConfig::default()).unwrap_err();
    let doc = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
    assert_eq!(doc["error"], "InvalidRisk");
    assert!(doc["message"].as_str().is_some_and(|m| !m.is_empty()));
}

#[test]
fn unknown_operation_is_rejected_at_parse_time() {
    let err = parse_request(r#"{"operation": "teleport"}"#).unwrap_err();
    assert_eq!(err.exit_code(), 2);
}
