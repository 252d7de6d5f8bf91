//! Engine configuration: the clinical constants the LQ formulas need but the
//! request contract does not carry.
//!
//! The defaults are common textbook values for rapidly proliferating tumours
//! (head & neck squamous cell carcinoma). They are placeholders to be checked
//! against institutional protocols before clinical use.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::math::DoseAxis;

/// Accelerated repopulation correction applied to BED.
///
/// `time_corrected_bed = max(0, bed - daily_loss * max(0, T - kickoff_days))`.
/// Setting `daily_loss = 0` disables the correction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepopulationParams {
    /// Day on which accelerated repopulation starts (`T_k`).
    pub kickoff_days: f64,
    /// BED lost per day beyond `kickoff_days` (Gy/day, `D_prolif`).
    pub daily_loss: f64,
}

impl Default for RepopulationParams {
    fn default() -> Self {
        Self {
            kickoff_days: 28.0,
            daily_loss: 0.9,
        }
    }
}

impl RepopulationParams {
    /// A correction that leaves BED unchanged.
    pub fn disabled() -> Self {
        Self {
            kickoff_days: 0.0,
            daily_loss: 0.0,
        }
    }

    pub fn corrected_bed(&self, bed: f64, treatment_time: f64) -> f64 {
        let protracted_days = (treatment_time - self.kickoff_days).max(0.0);
        (bed - self.daily_loss * protracted_days).max(0.0)
    }
}

/// All tunable constants of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub repopulation: RepopulationParams,
    /// Reference α (Gy⁻¹) for `survival_fraction = exp(-α · BED)`.
    pub survival_alpha: f64,
    /// BED lost per missed treatment day (Gy/day).
    pub gap_daily_loss: f64,
    /// Dose axis used for response curves.
    pub dose_axis: DoseAxis,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            repopulation: RepopulationParams::default(),
            survival_alpha: 0.3,
            gap_daily_loss: 0.9,
            dose_axis: DoseAxis::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        let rep = &self.repopulation;
        check_non_negative("repopulation kickoff (days)", rep.kickoff_days)?;
        check_non_negative("repopulation daily loss (Gy/day)", rep.daily_loss)?;
        check_non_negative("gap daily loss (Gy/day)", self.gap_daily_loss)?;
        if !(self.survival_alpha.is_finite() && self.survival_alpha > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "survival alpha must be > 0 (got {})",
                self.survival_alpha
            )));
        }
        self.dose_axis.validate()
    }
}

fn check_non_negative(name: &str, value: f64) -> Result<(), EngineError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidConfig(format!("{name} must be >= 0 (got {value})")))
    }
}
