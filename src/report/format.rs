//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the model code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::data::ReferenceData;
use crate::domain::{
    DoseMetrics, DualResponse, EngineRequest, EngineResponse, FractionationScheme,
    GapCompensationResult, GapRequest, MultiOrganRequest, MultiOrganResponse, RiskLimitRequest,
    RiskLimitResult,
};

/// Format the response to `request` for the terminal.
pub fn format_response(request: &EngineRequest, response: &EngineResponse) -> String {
    match (request, response) {
        (EngineRequest::Single(scheme), EngineResponse::Single(metrics)) => format_single(scheme, metrics),
        (EngineRequest::Dual(req), EngineResponse::Dual(out)) => format_dual(&req.scheme, req.oar_ab, out),
        (EngineRequest::MultiOrgan(req), EngineResponse::MultiOrgan(out)) => format_multi(req, out),
        (EngineRequest::Gap(req), EngineResponse::Gap(out)) => format_gap(req, out),
        (EngineRequest::RiskLimit(req), EngineResponse::RiskLimit(out)) => format_limit(req, out),
        // The pipeline always answers with the matching variant.
        _ => format!("{response:?}\n"),
    }
}

fn scheme_line(scheme: &FractionationScheme) -> String {
    format!(
        "Scheme: {:.2} Gy x {} fx = {:.2} Gy over {:.0} days\n",
        scheme.dose_per_fraction,
        scheme.number_of_fractions,
        scheme.total_dose(),
        scheme.treatment_time
    )
}

fn metrics_block(label: &str, alpha_beta: f64, m: &DoseMetrics) -> String {
    let mut out = String::new();
    out.push_str(&format!("{label} (α/β = {alpha_beta:.1} Gy):\n"));
    out.push_str(&format!("  Total dose:          {:>8.2} Gy\n", m.total_dose));
    out.push_str(&format!("  BED:                 {:>8.2} Gy\n", m.bed));
    out.push_str(&format!("  EQD2:                {:>8.2} Gy\n", m.eqd2));
    out.push_str(&format!("  Time-corrected BED:  {:>8.2} Gy\n", m.time_corrected_bed));
    out.push_str(&format!("  Survival fraction:   {:>12.4e}\n", m.survival_fraction));
    out
}

pub fn format_single(scheme: &FractionationScheme, m: &DoseMetrics) -> String {
    let mut out = String::new();
    out.push_str("=== rtf - LQ dose conversion ===\n");
    out.push_str(&scheme_line(scheme));
    out.push('\n');
    out.push_str(&metrics_block("Tissue", scheme.alpha_beta, m));
    out.push_str(&format!(
        "\nSurvival line: (0.00 Gy, 1.0000) -> ({:.2} Gy, {:.4e})\n",
        m.total_dose, m.survival_fraction
    ));
    out
}

pub fn format_dual(scheme: &FractionationScheme, oar_ab: f64, out_dual: &DualResponse) -> String {
    let mut out = String::new();
    out.push_str("=== rtf - Tumour / OAR conversion ===\n");
    out.push_str(&scheme_line(scheme));
    out.push('\n');
    out.push_str(&metrics_block("Tumour", scheme.alpha_beta, &out_dual.tumour));
    out.push('\n');
    out.push_str(&metrics_block("OAR", oar_ab, &out_dual.oar));
    out
}

pub fn format_multi(req: &MultiOrganRequest, res: &MultiOrganResponse) -> String {
    let tumour_scheme = req.tumour_scheme();
    let mut out = String::new();
    out.push_str("=== rtf - Multi-organ evaluation ===\n");
    out.push_str(&scheme_line(&req.scheme));
    out.push('\n');
    let tumour_label = req.tumour_model.as_deref().unwrap_or("Tumour");
    out.push_str(&metrics_block(tumour_label, tumour_scheme.alpha_beta, &res.tumour));
    if let Some(tcp) = res.tcp {
        out.push_str(&format!("  TCP at plan EQD2:    {:>8.2} %\n", tcp * 100.0));
    }

    out.push_str("\nOrgans at risk:\n");
    out.push_str(&format!(
        "{:<18} {:>6} {:>9} {:>9} {:>8} {:>9}  {}\n",
        "Organ", "α/β", "EQD2", "Limit", "Ratio", "NTCP", "Status"
    ));
    for (organ, a) in res.oars.iter().zip(res.assessment.organs.iter()) {
        out.push_str(&format!(
            "{:<18} {:>6.1} {:>9.2} {:>9} {:>8} {:>9}  {}\n",
            truncate(&organ.label, 18),
            organ.alpha_beta,
            organ.eqd2(),
            a.limit.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".to_string()),
            a.ratio.map(|v| format!("{v:.3}")).unwrap_or_else(|| "-".to_string()),
            organ
                .ntcp
                .map(|v| format!("{:.2}%", v * 100.0))
                .unwrap_or_else(|| "-".to_string()),
            a.classification
                .map(|c| c.display_name())
                .unwrap_or("no limit"),
        ));
    }

    out.push('\n');
    match &res.assessment.worst {
        Some(w) => out.push_str(&format!(
            "Worst case: {} (ratio {:.3}, {})\n",
            w.label,
            w.ratio.unwrap_or_default(),
            w.classification.map(|c| c.display_name()).unwrap_or("-"),
        )),
        None => out.push_str("Worst case: no classification (no organ has a known dose limit)\n"),
    }
    out
}

pub fn format_gap(req: &GapRequest, res: &GapCompensationResult) -> String {
    let mut out = String::new();
    out.push_str("=== rtf - Gap compensation ===\n");
    out.push_str(&scheme_line(&req.scheme));
    out.push_str(&format!("Missed days: {}\n\n", req.missed_days));
    out.push_str(&format!("  BED lost:            {:>8.2} Gy\n", res.bed_lost));
    out.push_str(&format!("  EQD2 lost:           {:>8.2} Gy\n", res.eqd2_lost));
    out.push_str(&format!("  Extra physical dose: {:>8.2} Gy\n", res.extra_physical_dose));
    out.push_str(&format!(
        "  Extra fractions:     {:>8} x {:.2} Gy\n",
        res.extra_fractions, req.scheme.dose_per_fraction
    ));
    out
}

pub fn format_limit(req: &RiskLimitRequest, res: &RiskLimitResult) -> String {
    let mut out = String::new();
    out.push_str("=== rtf - Risk-based dose limit ===\n");
    out.push_str(&format!(
        "Model: {} (D50 = {:.2} Gy, γ50 = {:.2}) | target P = {:.2} %\n",
        req.label,
        req.d50,
        req.gamma50,
        req.target_probability * 100.0
    ));
    out.push_str(&format!(
        "Delivery: {:.2} Gy per fraction, α/β = {:.1} Gy\n\n",
        req.dose_per_fraction, req.alpha_beta
    ));
    out.push_str(&format!("  Dose limit:          {:>8.2} Gy\n", res.dose_limit));
    out.push_str(&format!("  Equivalent fractions:{:>8.2}\n", res.equivalent_fractions));
    out.push_str(&format!("  EQD2 limit:          {:>8.2} Gy\n", res.eqd2_limit));
    out
}

/// List reference presets and dose limits.
pub fn format_catalog(reference: &ReferenceData) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== rtf - Reference data ({}) ===\n", reference.version));

    out.push_str("\nTumour models:\n");
    out.push_str(&format!("{:<18} {:>8} {:>8} {:>6}\n", "Label", "D50", "γ50", "α/β"));
    for p in &reference.tumours {
        out.push_str(&format!(
            "{:<18} {:>8.2} {:>8.2} {:>6.1}\n",
            truncate(&p.label, 18),
            p.d50,
            p.gamma50,
            p.alpha_beta
        ));
    }

    out.push_str("\nOrgan models:\n");
    out.push_str(&format!(
        "{:<18} {:>8} {:>8} {:>6} {:>8}\n",
        "Label", "D50", "γ50", "α/β", "Limit"
    ));
    for p in &reference.organs {
        out.push_str(&format!(
            "{:<18} {:>8.2} {:>8.2} {:>6.1} {:>8}\n",
            truncate(&p.label, 18),
            p.d50,
            p.gamma50,
            p.alpha_beta,
            reference
                .limit(&p.label)
                .map(|v| format!("{v:.1}"))
                .unwrap_or_else(|| "-".to_string())
        ));
    }

    let orphans: Vec<_> = reference
        .limits
        .iter()
        .filter(|(label, _)| reference.organ(label).is_none())
        .collect();
    if !orphans.is_empty() {
        out.push_str("\nLimits without an organ model:\n");
        for (label, limit) in orphans {
            out.push_str(&format!("{:<18} {:>8.1}\n", truncate(label, 18), limit));
        }
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
