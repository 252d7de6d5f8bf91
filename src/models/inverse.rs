//! Risk-to-dose-limit inversion.
//!
//! Closed-form inverse of the logistic response model:
//!
//! ```text
//! D = D50 · (1 - ln(1/p - 1) / (4 · γ50))
//! ```
//!
//! `D` is then treated as a physical dose delivered at `dose_per_fraction` and
//! converted to EQD2 so it can be compared with a plan's EQD2 for the organ.

use crate::domain::{RiskLimitResult, TissueResponseModel};
use crate::error::EngineError;
use crate::models::lq::eqd2_of_physical;

/// Dose at which `model` reaches `target_probability`.
pub fn dose_for_probability(model: &TissueResponseModel, target_probability: f64) -> Result<f64, EngineError> {
    model.validate()?;
    if !(target_probability > 0.0 && target_probability < 1.0) {
        return Err(EngineError::InvalidRisk(format!(
            "target probability must lie in (0, 1) (got {target_probability})"
        )));
    }
    let logit = (1.0 / target_probability - 1.0).ln();
    Ok(model.d50 * (1.0 - logit / (4.0 * model.gamma50)))
}

/// EQD2 limit matching `target_probability` for `model`.
pub fn invert(
    model: &TissueResponseModel,
    target_probability: f64,
    alpha_beta: f64,
    dose_per_fraction: f64,
) -> Result<RiskLimitResult, EngineError> {
    let dose_limit = dose_for_probability(model, target_probability)?;
    let eqd2_limit = eqd2_of_physical(dose_limit, dose_per_fraction, alpha_beta)?;

    Ok(RiskLimitResult {
        dose_limit,
        equivalent_fractions: dose_limit / dose_per_fraction,
        eqd2_limit,
    })
}
