//! Dose axis generation.
//!
//! Response curves are sampled on a fixed, evenly spaced dose axis (0–100 Gy in
//! 1 Gy steps by default). Points are computed from an integer index rather
//! than by repeated addition so the last point lands exactly on `end` and a
//! restarted iteration yields identical values.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Upper bound on the number of sampled doses per curve.
pub const MAX_AXIS_POINTS: usize = 100_000;

/// Evenly spaced dose axis `start, start + step, ..., <= end` (Gy).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoseAxis {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

impl Default for DoseAxis {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 100.0,
            step: 1.0,
        }
    }
}

impl DoseAxis {
    pub fn new(start: f64, end: f64, step: f64) -> Result<Self, EngineError> {
        let axis = Self { start, end, step };
        axis.validate()?;
        Ok(axis)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.start.is_finite() && self.end.is_finite() && self.step.is_finite()) {
            return Err(EngineError::InvalidConfig(format!(
                "Invalid dose axis: start={}, end={}, step={} (must be finite).",
                self.start, self.end, self.step
            )));
        }
        if self.start < 0.0 || self.end <= self.start || self.step <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "Invalid dose axis: start={}, end={}, step={} (need 0 <= start < end, step > 0).",
                self.start, self.end, self.step
            )));
        }
        // Compare in f64 so huge spans/tiny steps cannot overflow the count.
        let intervals = (self.end - self.start) / self.step;
        if intervals >= MAX_AXIS_POINTS as f64 {
            return Err(EngineError::InvalidConfig(format!(
                "Invalid dose axis: start={}, end={}, step={} gives more than {MAX_AXIS_POINTS} points.",
                self.start, self.end, self.step
            )));
        }
        Ok(())
    }

    /// Number of points on the axis (both endpoints included when `step` divides the span).
    pub fn len(&self) -> usize {
        // Tolerate float noise so 0..100 by 0.1 still reaches 100.
        ((self.end - self.start) / self.step + 1e-9).floor() as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn points(&self) -> DosePoints {
        DosePoints {
            start: self.start,
            step: self.step,
            next: 0,
            len: self.len(),
        }
    }
}

/// Lazy iterator over the doses of a `DoseAxis`.
#[derive(Debug, Clone)]
pub struct DosePoints {
    start: f64,
    step: f64,
    next: usize,
    len: usize,
}

impl Iterator for DosePoints {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.next >= self.len {
            return None;
        }
        let dose = self.start + self.step * self.next as f64;
        self.next += 1;
        Some(dose)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DosePoints {}
