//! Linear-quadratic dose conversion.
//!
//! ```text
//! total_dose = d · n
//! BED        = total_dose · (1 + d / (α/β))
//! EQD2       = BED / (1 + 2 / (α/β))
//! ```
//!
//! The time correction and survival fraction need constants that are not part
//! of a scheme; they come from `EngineConfig`.

use crate::domain::types::validate_alpha_beta;
use crate::domain::{DoseMetrics, EngineConfig, FractionationScheme};
use crate::error::EngineError;

/// Convert a scheme into LQ metrics.
pub fn convert(scheme: &FractionationScheme, config: &EngineConfig) -> Result<DoseMetrics, EngineError> {
    scheme.validate()?;

    let total_dose = scheme.total_dose();
    let bed = bed(total_dose, scheme.dose_per_fraction, scheme.alpha_beta);
    let eqd2 = eqd2_from_bed(bed, scheme.alpha_beta);
    let time_corrected_bed = config.repopulation.corrected_bed(bed, scheme.treatment_time);
    let survival_fraction = (-config.survival_alpha * bed).exp();

    Ok(DoseMetrics {
        total_dose,
        bed,
        eqd2,
        time_corrected_bed,
        survival_fraction,
    })
}

/// Biologically effective dose of `total_dose` delivered in fractions of `dose_per_fraction`.
pub fn bed(total_dose: f64, dose_per_fraction: f64, alpha_beta: f64) -> f64 {
    total_dose * relative_effectiveness(dose_per_fraction, alpha_beta)
}

/// BED re-expressed as an equivalent dose in 2 Gy fractions.
pub fn eqd2_from_bed(bed: f64, alpha_beta: f64) -> f64 {
    bed / relative_effectiveness(2.0, alpha_beta)
}

/// `1 + d / (α/β)`: BED per Gy of physical dose at `d` Gy per fraction.
pub fn relative_effectiveness(dose_per_fraction: f64, alpha_beta: f64) -> f64 {
    1.0 + dose_per_fraction / alpha_beta
}

/// EQD2 of a physical dose delivered in fractions of `dose_per_fraction`.
pub fn eqd2_of_physical(dose: f64, dose_per_fraction: f64, alpha_beta: f64) -> Result<f64, EngineError> {
    validate_alpha_beta(alpha_beta)?;
    if !(dose_per_fraction.is_finite() && dose_per_fraction > 0.0) {
        return Err(EngineError::InvalidScheme(format!(
            "dose_per_fraction must be > 0 (got {dose_per_fraction})"
        )));
    }
    Ok(eqd2_from_bed(bed(dose, dose_per_fraction, alpha_beta), alpha_beta))
}
