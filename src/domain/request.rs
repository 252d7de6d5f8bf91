//! Request and response shapes of the engine.
//!
//! Each operation has its own fully typed input and output. Both enums are
//! tagged by an `"operation"` field in JSON:
//!
//! ```text
//! {"operation": "gap", "dose_per_fraction": 2, "num_fractions": 30,
//!  "alpha_beta": 10, "missed_days": 3}
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::{
    DoseMetrics, FractionationScheme, GapCompensationResult, OrganResult, RiskAssessment,
    RiskLimitResult, TissueResponseModel,
};
use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum EngineRequest {
    /// Convert one scheme.
    Single(FractionationScheme),
    /// Tumour plus one organ at risk with its own α/β.
    Dual(DualRequest),
    /// Tumour plus any number of organs at risk, classified against dose limits.
    MultiOrgan(MultiOrganRequest),
    /// Compensation for missed treatment days.
    Gap(GapRequest),
    /// EQD2 limit for a target complication/control probability.
    RiskLimit(RiskLimitRequest),
}

impl EngineRequest {
    pub fn operation(&self) -> &'static str {
        match self {
            EngineRequest::Single(_) => "single",
            EngineRequest::Dual(_) => "dual",
            EngineRequest::MultiOrgan(_) => "multi_organ",
            EngineRequest::Gap(_) => "gap",
            EngineRequest::RiskLimit(_) => "risk_limit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DualRequest {
    #[serde(flatten)]
    pub scheme: FractionationScheme,
    pub oar_ab: f64,
}

/// One organ at risk in a multi-organ request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OarInput {
    pub label: String,
    /// Falls back to the organ catalog's α/β when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha_beta: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiOrganRequest {
    #[serde(flatten)]
    pub scheme: FractionationScheme,
    /// Tumour α/β; defaults to the scheme's `alpha_beta`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tumour_ab: Option<f64>,
    /// Tumour catalog label used to report TCP at the tumour EQD2.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tumour_model: Option<String>,
    #[serde(default)]
    pub oars: Vec<OarInput>,
}

impl MultiOrganRequest {
    pub fn tumour_scheme(&self) -> FractionationScheme {
        match self.tumour_ab {
            Some(ab) => self.scheme.with_alpha_beta(ab),
            None => self.scheme.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapRequest {
    #[serde(flatten)]
    pub scheme: FractionationScheme,
    pub missed_days: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskLimitRequest {
    #[serde(default = "default_limit_label")]
    pub label: String,
    #[serde(rename = "D50", alias = "d50")]
    pub d50: f64,
    pub gamma50: f64,
    /// Target response probability in (0, 1).
    #[serde(rename = "prob", alias = "target_probability")]
    pub target_probability: f64,
    pub alpha_beta: f64,
    pub dose_per_fraction: f64,
}

fn default_limit_label() -> String {
    "custom".to_string()
}

impl RiskLimitRequest {
    pub fn model(&self) -> TissueResponseModel {
        TissueResponseModel::new(self.label.clone(), self.d50, self.gamma50)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum EngineResponse {
    Single(DoseMetrics),
    Dual(DualResponse),
    MultiOrgan(MultiOrganResponse),
    Gap(GapCompensationResult),
    RiskLimit(RiskLimitResult),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DualResponse {
    pub tumour: DoseMetrics,
    pub oar: DoseMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiOrganResponse {
    pub tumour: DoseMetrics,
    /// Tumour control probability at the tumour EQD2, when a tumour model is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp: Option<f64>,
    pub oars: Vec<OrganResult>,
    pub assessment: RiskAssessment,
}

/// JSON body written by `rtf eval` when validation fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl From<&EngineError> for ErrorResponse {
    fn from(err: &EngineError) -> Self {
        Self {
            error: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_request_uses_field_contract_names() {
        let json = r#"{
            "operation": "gap",
            "dose_per_fraction": 2.0,
            "num_fractions": 30,
            "alpha_beta": 10.0,
            "missed_days": 3
        }"#;
        let req: EngineRequest = serde_json::from_str(json).unwrap();
        match req {
            EngineRequest::Gap(gap) => {
                assert_eq!(gap.scheme.number_of_fractions, 30);
                assert_eq!(gap.missed_days, 3);
            }
            other => panic!("expected gap request, got {other:?}"),
        }
    }

    #[test]
    fn risk_limit_request_reads_d50_and_prob() {
        let json = r#"{
            "operation": "risk_limit",
            "D50": 66.5,
            "gamma50": 2.3,
            "prob": 0.05,
            "alpha_beta": 2.0,
            "dose_per_fraction": 2.0
        }"#;
        let req: EngineRequest = serde_json::from_str(json).unwrap();
        let EngineRequest::RiskLimit(limit) = req else {
            panic!("expected risk_limit request");
        };
        assert_eq!(limit.d50, 66.5);
        assert_eq!(limit.target_probability, 0.05);
        assert_eq!(limit.label, "custom");
    }

    #[test]
    fn multi_organ_tumour_ab_overrides_scheme() {
        let json = r#"{
            "operation": "multi_organ",
            "dose_per_fraction": 2.0,
            "number_of_fractions": 35,
            "treatment_time": 46,
            "alpha_beta": 3.0,
            "tumour_ab": 10.0,
            "oars": [{"label": "Spinal cord", "alpha_beta": 2.0}, {"label": "Parotid"}]
        }"#;
        let req: EngineRequest = serde_json::from_str(json).unwrap();
        let EngineRequest::MultiOrgan(multi) = req else {
            panic!("expected multi_organ request");
        };
        assert_eq!(multi.tumour_scheme().alpha_beta, 10.0);
        assert_eq!(multi.oars.len(), 2);
        assert_eq!(multi.oars[1].alpha_beta, None);
    }

    #[test]
    fn unknown_operation_is_rejected() {
        let json = r#"{"operation": "teleport", "dose_per_fraction": 2.0}"#;
        assert!(serde_json::from_str::<EngineRequest>(json).is_err());
    }
}
