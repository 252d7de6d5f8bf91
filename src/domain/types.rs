//! Shared domain types.
//!
//! Every record here is an immutable value: engine functions take inputs by
//! reference and return freshly built results. All of them are serializable so
//! they can be:
//!
//! - returned from `rtf eval` as JSON
//! - exported to JSON/CSV
//! - loaded from reference-data files

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Published dose ceilings (EQD2, Gy) keyed by organ label.
pub type DoseLimits = BTreeMap<String, f64>;

/// A fractionation scheme for one tissue (tumour or organ).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FractionationScheme {
    /// Physical dose per fraction (Gy).
    pub dose_per_fraction: f64,
    /// Number of fractions delivered.
    #[serde(alias = "num_fractions")]
    pub number_of_fractions: u32,
    /// Overall treatment time (days).
    #[serde(default)]
    pub treatment_time: f64,
    /// Tissue α/β ratio (Gy).
    pub alpha_beta: f64,
}

impl FractionationScheme {
    pub fn new(dose_per_fraction: f64, number_of_fractions: u32, treatment_time: f64, alpha_beta: f64) -> Self {
        Self {
            dose_per_fraction,
            number_of_fractions,
            treatment_time,
            alpha_beta,
        }
    }

    /// Same physical schedule seen by a tissue with a different α/β.
    pub fn with_alpha_beta(&self, alpha_beta: f64) -> Self {
        Self {
            alpha_beta,
            ..self.clone()
        }
    }

    pub fn total_dose(&self) -> f64 {
        self.dose_per_fraction * f64::from(self.number_of_fractions)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.dose_per_fraction.is_finite() && self.dose_per_fraction > 0.0) {
            return Err(EngineError::InvalidScheme(format!(
                "dose_per_fraction must be > 0 (got {})",
                self.dose_per_fraction
            )));
        }
        if self.number_of_fractions == 0 {
            return Err(EngineError::InvalidScheme(
                "number_of_fractions must be > 0".to_string(),
            ));
        }
        if !(self.treatment_time.is_finite() && self.treatment_time >= 0.0) {
            return Err(EngineError::InvalidScheme(format!(
                "treatment_time must be >= 0 (got {})",
                self.treatment_time
            )));
        }
        validate_alpha_beta(self.alpha_beta)
    }
}

pub(crate) fn validate_alpha_beta(alpha_beta: f64) -> Result<(), EngineError> {
    if alpha_beta.is_finite() && alpha_beta > 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidScheme(format!(
            "alpha_beta must be > 0 (got {alpha_beta})"
        )))
    }
}

/// Logistic dose-response parameters for one tissue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TissueResponseModel {
    pub label: String,
    /// Dose giving a 50% response probability (Gy).
    #[serde(rename = "D50", alias = "d50")]
    pub d50: f64,
    /// Normalized slope of the curve at `D50`.
    pub gamma50: f64,
}

impl TissueResponseModel {
    pub fn new(label: impl Into<String>, d50: f64, gamma50: f64) -> Self {
        Self {
            label: label.into(),
            d50,
            gamma50,
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.d50.is_finite() && self.d50 > 0.0) {
            return Err(EngineError::InvalidModel(format!(
                "{}: D50 must be > 0 (got {})",
                self.label, self.d50
            )));
        }
        if !(self.gamma50.is_finite() && self.gamma50 > 0.0) {
            return Err(EngineError::InvalidModel(format!(
                "{}: gamma50 must be > 0 (got {})",
                self.label, self.gamma50
            )));
        }
        Ok(())
    }
}

/// LQ-model metrics derived from a scheme.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoseMetrics {
    pub total_dose: f64,
    pub bed: f64,
    pub eqd2: f64,
    pub time_corrected_bed: f64,
    pub survival_fraction: f64,
}

/// Metrics for one organ at risk in a multi-organ evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganResult {
    pub label: String,
    pub alpha_beta: f64,
    #[serde(flatten)]
    pub metrics: DoseMetrics,
    /// Complication probability at this organ's EQD2, when a model is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ntcp: Option<f64>,
}

impl OrganResult {
    pub fn eqd2(&self) -> f64 {
        self.metrics.eqd2
    }
}

/// Three-level safety classification against a dose limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskClassification {
    Ok,
    Warn,
    Fail,
}

impl RiskClassification {
    pub fn display_name(self) -> &'static str {
        match self {
            RiskClassification::Ok => "OK",
            RiskClassification::Warn => "WARN",
            RiskClassification::Fail => "FAIL",
        }
    }
}

/// Ratio-to-limit outcome for one organ.
///
/// `limit`, `ratio` and `classification` are all `None` when the organ has no
/// known limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganAssessment {
    pub label: String,
    pub eqd2: f64,
    pub limit: Option<f64>,
    pub ratio: Option<f64>,
    pub classification: Option<RiskClassification>,
}

/// Per-organ classifications plus the worst-case organ.
///
/// `worst == None` is the normal "no classification" outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub organs: Vec<OrganAssessment>,
    pub worst: Option<OrganAssessment>,
}

impl RiskAssessment {
    pub fn is_classified(&self) -> bool {
        self.worst.is_some()
    }
}

/// Cost of a treatment interruption and what restores it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapCompensationResult {
    pub bed_lost: f64,
    pub eqd2_lost: f64,
    pub extra_physical_dose: f64,
    pub extra_fractions: u32,
}

impl GapCompensationResult {
    pub fn zero() -> Self {
        Self {
            bed_lost: 0.0,
            eqd2_lost: 0.0,
            extra_physical_dose: 0.0,
            extra_fractions: 0,
        }
    }
}

/// Dose limit matching a target response probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskLimitResult {
    /// Dose at which the response model reaches the target probability (Gy).
    pub dose_limit: f64,
    /// `dose_limit / dose_per_fraction` (not rounded).
    pub equivalent_fractions: f64,
    /// `dose_limit` expressed as EQD2 for the given α/β and dose per fraction.
    pub eqd2_limit: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_validation_rejects_non_positive_inputs() {
        let ok = FractionationScheme::new(2.0, 30, 40.0, 10.0);
        assert!(ok.validate().is_ok());

        let bad_dose = FractionationScheme::new(0.0, 30, 40.0, 10.0);
        assert!(matches!(bad_dose.validate(), Err(EngineError::InvalidScheme(_))));

        let bad_n = FractionationScheme::new(2.0, 0, 40.0, 10.0);
        assert!(matches!(bad_n.validate(), Err(EngineError::InvalidScheme(_))));

        let bad_ab = FractionationScheme::new(2.0, 30, 40.0, -3.0);
        assert!(matches!(bad_ab.validate(), Err(EngineError::InvalidScheme(_))));

        let bad_time = FractionationScheme::new(2.0, 30, -1.0, 10.0);
        assert!(matches!(bad_time.validate(), Err(EngineError::InvalidScheme(_))));
    }

    #[test]
    fn model_validation_rejects_non_positive_parameters() {
        assert!(TissueResponseModel::new("cord", 66.5, 2.3).validate().is_ok());
        assert!(matches!(
            TissueResponseModel::new("cord", 0.0, 2.3).validate(),
            Err(EngineError::InvalidModel(_))
        ));
        assert!(matches!(
            TissueResponseModel::new("cord", 66.5, 0.0).validate(),
            Err(EngineError::InvalidModel(_))
        ));
    }

    #[test]
    fn scheme_accepts_num_fractions_alias_and_default_time() {
        let json = r#"{"dose_per_fraction": 3, "num_fractions": 20, "alpha_beta": 3}"#;
        let scheme: FractionationScheme = serde_json::from_str(json).unwrap();
        assert_eq!(scheme.number_of_fractions, 20);
        assert_eq!(scheme.treatment_time, 0.0);
        assert!((scheme.total_dose() - 60.0).abs() < 1e-12);
    }

    #[test]
    fn classification_serializes_lowercase() {
        let json = serde_json::to_string(&RiskClassification::Warn).unwrap();
        assert_eq!(json, "\"warn\"");
    }
}
