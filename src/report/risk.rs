//! Organ-at-risk classification against dose limits.
//!
//! For every organ with a known limit:
//!
//! ```text
//! ratio = eqd2 / limit
//! fail  if ratio >= 1.0
//! warn  if ratio >= 0.9
//! ok    otherwise
//! ```
//!
//! The worst-case organ is the one with the largest ratio; ties go to the
//! organ that appears first in the input.

use tracing::warn;

use crate::domain::{DoseLimits, OrganAssessment, OrganResult, RiskAssessment, RiskClassification};

pub const FAIL_RATIO: f64 = 1.0;
pub const WARN_RATIO: f64 = 0.9;

/// Classify a ratio-to-limit.
pub fn classify(ratio: f64) -> RiskClassification {
    if ratio >= FAIL_RATIO {
        RiskClassification::Fail
    } else if ratio >= WARN_RATIO {
        RiskClassification::Warn
    } else {
        RiskClassification::Ok
    }
}

/// Classify each organ and pick the worst case.
///
/// Organs without a usable limit are reported unclassified. When no organ can
/// be classified (including an empty input) `worst` is `None`.
pub fn evaluate(organs: &[OrganResult], limits: &DoseLimits) -> RiskAssessment {
    let assessments: Vec<OrganAssessment> = organs.iter().map(|o| assess(o, limits)).collect();

    let mut worst: Option<&OrganAssessment> = None;
    for a in &assessments {
        let Some(ratio) = a.ratio else {
            continue;
        };
        // Strict comparison keeps the first organ on ties.
        if worst.and_then(|w| w.ratio).is_none_or(|best| ratio > best) {
            worst = Some(a);
        }
    }
    let worst = worst.cloned();

    RiskAssessment {
        organs: assessments,
        worst,
    }
}

fn assess(organ: &OrganResult, limits: &DoseLimits) -> OrganAssessment {
    let eqd2 = organ.eqd2();
    let limit = match limits.get(&organ.label) {
        Some(&limit) if limit.is_finite() && limit > 0.0 => Some(limit),
        Some(&limit) => {
            warn!(organ = %organ.label, limit, "ignoring non-positive dose limit");
            None
        }
        None => None,
    };
    let ratio = limit.map(|limit| eqd2 / limit);

    OrganAssessment {
        label: organ.label.clone(),
        eqd2,
        limit,
        ratio,
        classification: ratio.map(classify),
    }
}
