//! Treatment-gap compensation.
//!
//! Every missed day lets the tumour repopulate, costing `gap_daily_loss` Gy of
//! BED. The lost BED is restored with extra fractions at the original dose per
//! fraction:
//!
//! ```text
//! bed_lost            = missed_days · gap_daily_loss
//! eqd2_lost           = bed_lost / (1 + 2/(α/β))
//! extra_physical_dose = bed_lost / (1 + d/(α/β))
//! extra_fractions     = ceil(extra_physical_dose / d)
//! ```

use crate::domain::{EngineConfig, FractionationScheme, GapCompensationResult};
use crate::error::EngineError;
use crate::models::lq::{eqd2_from_bed, relative_effectiveness};

/// Slack for float noise when rounding fraction counts up.
const FRACTION_EPS: f64 = 1e-9;

/// Compensation needed after `missed_days` of interruption.
pub fn compensate(
    scheme: &FractionationScheme,
    missed_days: i64,
    config: &EngineConfig,
) -> Result<GapCompensationResult, EngineError> {
    if missed_days < 0 {
        return Err(EngineError::InvalidGap(format!(
            "missed_days must be >= 0 (got {missed_days})"
        )));
    }
    scheme.validate()?;
    if !(config.gap_daily_loss.is_finite() && config.gap_daily_loss >= 0.0) {
        return Err(EngineError::InvalidConfig(format!(
            "gap daily loss must be >= 0 Gy/day (got {})",
            config.gap_daily_loss
        )));
    }
    if missed_days == 0 {
        return Ok(GapCompensationResult::zero());
    }

    let d = scheme.dose_per_fraction;
    let ab = scheme.alpha_beta;

    let bed_lost = missed_days as f64 * config.gap_daily_loss;
    let eqd2_lost = eqd2_from_bed(bed_lost, ab);
    let extra_physical_dose = bed_lost / relative_effectiveness(d, ab);
    let fractions = (extra_physical_dose / d - FRACTION_EPS).ceil().max(0.0);
    if fractions > f64::from(u32::MAX) {
        return Err(EngineError::InvalidGap(format!(
            "{missed_days} missed days at {d} Gy per fraction needs {fractions:.0} extra fractions (more than {})",
            u32::MAX
        )));
    }
    let extra_fractions = fractions as u32;

    Ok(GapCompensationResult {
        bed_lost,
        eqd2_lost,
        extra_physical_dose,
        extra_fractions,
    })
}
