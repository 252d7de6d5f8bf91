//! Sampled dose-response curves for plotting and export.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::math::DoseAxis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TissueRole {
    /// Tumour control probability curve.
    Tumour,
    /// Normal-tissue complication probability curve.
    Organ,
}

/// One tissue's curve plus the plan's EQD2 marker for that tissue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveSeries {
    pub label: String,
    pub role: TissueRole,
    pub plan_eqd2: Option<f64>,
    pub dose: Vec<f64>,
    pub probability: Vec<f64>,
}

impl CurveSeries {
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.dose.iter().copied().zip(self.probability.iter().copied())
    }
}

/// A saved overlay file (JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub axis: DoseAxis,
    pub series: Vec<CurveSeries>,
}
