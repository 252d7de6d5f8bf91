//! Export per-organ assessments to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.
//! Organs without a limit have empty `limit`/`ratio`/`classification` cells.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{OrganResult, RiskAssessment};
use crate::error::AppError;

/// Write per-organ results to a CSV file.
pub fn write_assessment_csv(path: &Path, organs: &[OrganResult], assessment: &RiskAssessment) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_assessment(&mut file, organs, assessment)
}

fn write_assessment<W: Write>(out: &mut W, organs: &[OrganResult], assessment: &RiskAssessment) -> Result<(), AppError> {
    writeln!(
        out,
        "label,alpha_beta,total_dose,bed,eqd2,ntcp,limit,ratio,classification,worst"
    )
    .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    let worst_idx = worst_index(assessment);

    for (idx, (organ, a)) in organs.iter().zip(assessment.organs.iter()).enumerate() {
        writeln!(
            out,
            "{},{:.4},{:.4},{:.4},{:.4},{},{},{},{},{}",
            csv_field(&organ.label),
            organ.alpha_beta,
            organ.metrics.total_dose,
            organ.metrics.bed,
            organ.metrics.eqd2,
            organ.ntcp.map(|v| format!("{v:.6}")).unwrap_or_default(),
            a.limit.map(|v| format!("{v:.4}")).unwrap_or_default(),
            a.ratio.map(|v| format!("{v:.4}")).unwrap_or_default(),
            a.classification
                .map(|c| c.display_name().to_lowercase())
                .unwrap_or_default(),
            worst_idx == Some(idx),
        )
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

/// Row of the worst-case organ: the first organ with the maximal ratio,
/// matching how the evaluator breaks ties.
fn worst_index(assessment: &RiskAssessment) -> Option<usize> {
    let worst = assessment.worst.as_ref()?;
    assessment
        .organs
        .iter()
        .position(|a| a.ratio.is_some() && a.ratio == worst.ratio)
}

/// Quote labels that contain separators.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
