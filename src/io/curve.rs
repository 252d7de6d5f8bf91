//! Read/write response-curve JSON files.
//!
//! Curve JSON is the "portable" representation of a TCP/NTCP overlay:
//! - the dose axis it was sampled on
//! - one series per tissue (label, role, plan EQD2 marker, sampled grid)
//!
//! The schema is defined by `domain::CurveFile`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::domain::{CurveFile, CurveSeries};
use crate::error::AppError;
use crate::math::DoseAxis;

/// Write a curve JSON file.
pub fn write_curve_json(path: &Path, series: &[CurveSeries], axis: &DoseAxis) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create curve JSON '{}': {e}", path.display())))?;

    let curve = CurveFile {
        tool: "rtf".to_string(),
        generated_at: Utc::now(),
        axis: *axis,
        series: series.to_vec(),
    };

    serde_json::to_writer_pretty(file, &curve)
        .map_err(|e| AppError::new(2, format!("Failed to write curve JSON: {e}")))?;

    Ok(())
}

/// Read a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<CurveFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open curve JSON '{}': {e}", path.display())))?;
    let curve: CurveFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid curve JSON: {e}")))?;
    Ok(curve)
}
