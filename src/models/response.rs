//! Logistic dose-response model (TCP / NTCP).
//!
//! ```text
//! P(D) = 1 / (1 + exp(-4 · γ50 · (D - D50) / D50))
//! ```
//!
//! `P(D50) = 0.5` exactly and the normalized slope at `D50` is `γ50`.

use crate::domain::TissueResponseModel;
use crate::error::EngineError;
use crate::math::{DoseAxis, DosePoints};

/// Response probability of `model` at `dose` (Gy).
pub fn probability(model: &TissueResponseModel, dose: f64) -> Result<f64, EngineError> {
    model.validate()?;
    Ok(logistic(model.d50, model.gamma50, dose))
}

fn logistic(d50: f64, gamma50: f64, dose: f64) -> f64 {
    1.0 / (1.0 + (-4.0 * gamma50 * (dose - d50) / d50).exp())
}

/// Lazy `(dose, probability)` sequence over a dose axis.
///
/// Cloning the curve restarts it from the first dose.
#[derive(Debug, Clone)]
pub struct ResponseCurve<'a> {
    model: &'a TissueResponseModel,
    doses: DosePoints,
}

impl Iterator for ResponseCurve<'_> {
    type Item = (f64, f64);

    fn next(&mut self) -> Option<(f64, f64)> {
        let dose = self.doses.next()?;
        Some((dose, logistic(self.model.d50, self.model.gamma50, dose)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.doses.size_hint()
    }
}

impl ExactSizeIterator for ResponseCurve<'_> {}

/// Build a response curve for plotting.
pub fn response_curve<'a>(model: &'a TissueResponseModel, axis: &DoseAxis) -> Result<ResponseCurve<'a>, EngineError> {
    model.validate()?;
    axis.validate()?;
    Ok(ResponseCurve {
        model,
        doses: axis.points(),
    })
}
