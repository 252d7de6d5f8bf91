//! Shared request pipeline used by every front-end (`rtf` subcommands and `rtf eval`).
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! validate -> convert per tissue -> response probabilities -> limits / classification
//!
//! The CLI can then focus on presentation (formatted text vs JSON).

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::data::ReferenceData;
use crate::domain::{
    CurveSeries, DualRequest, DualResponse, EngineConfig, EngineRequest, EngineResponse, FractionationScheme,
    GapCompensationResult, GapRequest, MultiOrganRequest, MultiOrganResponse, OarInput,
    OrganResult, RiskLimitRequest, RiskLimitResult, TissueResponseModel, TissueRole,
};
use crate::error::EngineError;
use crate::math::DoseAxis;
use crate::models::{compensate, convert, invert, probability, response_curve};
use crate::report::risk;

/// Evaluate one request against the reference data.
pub fn evaluate(
    request: &EngineRequest,
    reference: &ReferenceData,
    config: &EngineConfig,
) -> Result<EngineResponse, EngineError> {
    debug!(operation = request.operation(), "evaluating request");
    config.validate()?;
    match request {
        EngineRequest::Single(scheme) => Ok(EngineResponse::Single(convert(scheme, config)?)),
        EngineRequest::Dual(req) => evaluate_dual(req, config).map(EngineResponse::Dual),
        EngineRequest::MultiOrgan(req) => {
            evaluate_multi(req, reference, config).map(EngineResponse::MultiOrgan)
        }
        EngineRequest::Gap(req) => evaluate_gap(req, config).map(EngineResponse::Gap),
        EngineRequest::RiskLimit(req) => evaluate_limit(req).map(EngineResponse::RiskLimit),
    }
}

fn evaluate_dual(req: &DualRequest, config: &EngineConfig) -> Result<DualResponse, EngineError> {
    let tumour = convert(&req.scheme, config)?;
    let oar = convert(&req.scheme.with_alpha_beta(req.oar_ab), config)?;
    Ok(DualResponse { tumour, oar })
}

/// Tumour plus every organ at risk, then classification against the limit table.
fn evaluate_multi(
    req: &MultiOrganRequest,
    reference: &ReferenceData,
    config: &EngineConfig,
) -> Result<MultiOrganResponse, EngineError> {
    let tumour = convert(&req.tumour_scheme(), config)?;

    let tcp = match &req.tumour_model {
        Some(label) => match reference.tumour(label) {
            Some(preset) => Some(probability(&preset.response_model(), tumour.eqd2)?),
            None => {
                warn!(tumour_model = %label, "tumour model not in catalog; TCP not reported");
                None
            }
        },
        None => None,
    };

    // Organs are independent; collect in input order so the tie-break stays stable.
    let oars: Vec<OrganResult> = req
        .oars
        .par_iter()
        .map(|oar| evaluate_organ(&req.scheme, oar, reference, config))
        .collect::<Result<Vec<_>, EngineError>>()?;

    let assessment = risk::evaluate(&oars, &reference.limits);
    for a in assessment.organs.iter().filter(|a| a.classification.is_none()) {
        debug!(organ = %a.label, "no dose limit; organ left unclassified");
    }

    Ok(MultiOrganResponse {
        tumour,
        tcp,
        oars,
        assessment,
    })
}

fn evaluate_organ(
    scheme: &FractionationScheme,
    oar: &OarInput,
    reference: &ReferenceData,
    config: &EngineConfig,
) -> Result<OrganResult, EngineError> {
    let preset = reference.organ(&oar.label);
    let alpha_beta = oar
        .alpha_beta
        .or_else(|| preset.map(|p| p.alpha_beta))
        .ok_or_else(|| {
            EngineError::InvalidScheme(format!(
                "{}: alpha_beta missing and organ not in catalog",
                oar.label
            ))
        })?;

    let metrics = convert(&scheme.with_alpha_beta(alpha_beta), config)?;
    let ntcp = match preset {
        Some(p) => Some(probability(&p.response_model(), metrics.eqd2)?),
        None => None,
    };

    Ok(OrganResult {
        label: oar.label.clone(),
        alpha_beta,
        metrics,
        ntcp,
    })
}

fn evaluate_gap(
    req: &GapRequest,
    config: &EngineConfig,
) -> Result<GapCompensationResult, EngineError> {
    compensate(&req.scheme, req.missed_days, config)
}

fn evaluate_limit(req: &RiskLimitRequest) -> Result<RiskLimitResult, EngineError> {
    invert(
        &req.model(),
        req.target_probability,
        req.alpha_beta,
        req.dose_per_fraction,
    )
}

/// TCP/NTCP curves for the tumour model and every catalogued organ, each with
/// the plan's EQD2 for that tissue as a marker.
///
/// Tissues without a catalog entry have no curve and are skipped.
pub fn response_overlay(
    req: &MultiOrganRequest,
    response: &MultiOrganResponse,
    reference: &ReferenceData,
    config: &EngineConfig,
) -> Result<Vec<CurveSeries>, EngineError> {
    config.validate()?;
    let mut series = Vec::with_capacity(response.oars.len() + 1);

    if let Some(preset) = req.tumour_model.as_deref().and_then(|l| reference.tumour(l)) {
        series.push(sample_series(
            &preset.response_model(),
            TissueRole::Tumour,
            Some(response.tumour.eqd2),
            &config.dose_axis,
        )?);
    }
    for organ in &response.oars {
        if let Some(preset) = reference.organ(&organ.label) {
            series.push(sample_series(
                &preset.response_model(),
                TissueRole::Organ,
                Some(organ.eqd2()),
                &config.dose_axis,
            )?);
        }
    }

    Ok(series)
}

fn sample_series(
    model: &TissueResponseModel,
    role: TissueRole,
    plan_eqd2: Option<f64>,
    axis: &DoseAxis,
) -> Result<CurveSeries, EngineError> {
    let (dose, probability): (Vec<f64>, Vec<f64>) = response_curve(model, axis)?.unzip();
    Ok(CurveSeries {
        label: model.label.clone(),
        role,
        plan_eqd2,
        dose,
        probability,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RiskClassification;

    fn head_and_neck() -> FractionationScheme {
        FractionationScheme::new(2.0, 35, 46.0, 10.0)
    }

    fn multi(oars: Vec<OarInput>) -> MultiOrganRequest {
        MultiOrganRequest {
            scheme: head_and_neck(),
            tumour_ab: None,
            tumour_model: Some("Head & Neck SCC".to_string()),
            oars,
        }
    }

    fn oar(label: &str, alpha_beta: Option<f64>) -> OarInput {
        OarInput {
            label: label.to_string(),
            alpha_beta,
        }
    }

    #[test]
    fn single_request_matches_direct_conversion() {
        let config = EngineConfig::default();
        let scheme = FractionationScheme::new(2.0, 30, 40.0, 10.0);
        let response = evaluate(
            &EngineRequest::Single(scheme.clone()),
            &ReferenceData::builtin(),
            &config,
        )
        .unwrap();
        assert_eq!(response, EngineResponse::Single(convert(&scheme, &config).unwrap()));
    }

    #[test]
    fn dual_request_converts_oar_with_its_own_ab() {
        let req = DualRequest {
            scheme: FractionationScheme::new(3.0, 20, 28.0, 10.0),
            oar_ab: 3.0,
        };
        let out = evaluate_dual(&req, &EngineConfig::default()).unwrap();
        assert!((out.tumour.eqd2 - 65.0).abs() < 1e-9);
        assert!((out.oar.eqd2 - 72.0).abs() < 1e-9);
        assert_eq!(out.tumour.total_dose, out.oar.total_dose);
    }

    #[test]
    fn multi_organ_reports_probabilities_and_worst_case() {
        let req = multi(vec![
            oar("Spinal cord", None),
            oar("Parotid", None),
            oar("Custom PTV ring", Some(3.0)),
        ]);
        let out = evaluate_multi(&req, &ReferenceData::builtin(), &EngineConfig::default()).unwrap();

        // 70 Gy in 2 Gy fractions is 70 Gy EQD2 for every α/β.
        assert!((out.tumour.eqd2 - 70.0).abs() < 1e-9);
        assert!(out.tcp.unwrap() > 0.5);
        assert_eq!(out.oars.len(), 3);
        assert_eq!(out.oars[0].alpha_beta, 2.0);
        assert!(out.oars[0].ntcp.is_some());
        assert!(out.oars[2].ntcp.is_none());

        // Parotid 70/26 is the largest ratio.
        let worst = out.assessment.worst.unwrap();
        assert_eq!(worst.label, "Parotid");
        assert_eq!(worst.classification, Some(RiskClassification::Fail));
        assert_eq!(out.assessment.organs[2].classification, None);
    }

    #[test]
    fn multi_organ_preserves_input_order() {
        let labels = ["Heart", "Lung", "Spinal cord", "Brainstem", "Rectum", "Bladder"];
        let req = multi(labels.iter().map(|l| oar(l, None)).collect());
        let out = evaluate_multi(&req, &ReferenceData::builtin(), &EngineConfig::default()).unwrap();
        let got: Vec<&str> = out.oars.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(got, labels);
    }

    #[test]
    fn unknown_organ_without_ab_is_invalid_scheme() {
        let req = multi(vec![oar("Mystery gland", None)]);
        let err = evaluate_multi(&req, &ReferenceData::builtin(), &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidScheme(_)));
    }

    #[test]
    fn unknown_tumour_model_skips_tcp() {
        let mut req = multi(vec![]);
        req.tumour_model = Some("Not a tumour".to_string());
        let out = evaluate_multi(&req, &ReferenceData::builtin(), &EngineConfig::default()).unwrap();
        assert!(out.tcp.is_none());
        assert!(out.assessment.worst.is_none());
    }

    #[test]
    fn gap_and_limit_requests_route_to_their_components() {
        let reference = ReferenceData::builtin();
        let config = EngineConfig::default();

        let gap = EngineRequest::Gap(GapRequest {
            scheme: FractionationScheme::new(2.0, 30, 0.0, 10.0),
            missed_days: 0,
        });
        let EngineResponse::Gap(result) = evaluate(&gap, &reference, &config).unwrap() else {
            panic!("expected gap response");
        };
        assert_eq!(result.extra_fractions, 0);

        let limit = EngineRequest::RiskLimit(RiskLimitRequest {
            label: "cord".to_string(),
            d50: 66.5,
            gamma50: 2.28,
            target_probability: 1.2,
            alpha_beta: 2.0,
            dose_per_fraction: 2.0,
        });
        assert!(matches!(
            evaluate(&limit, &reference, &config),
            Err(EngineError::InvalidRisk(_))
        ));
    }

    #[test]
    fn invalid_config_is_rejected_before_any_component_runs() {
        let reference = ReferenceData::builtin();
        let scheme = FractionationScheme::new(2.0, 30, 40.0, 10.0);
        let config = EngineConfig {
            survival_alpha: -0.3,
            ..EngineConfig::default()
        };
        assert!(matches!(
            evaluate(&EngineRequest::Single(scheme), &reference, &config),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn overlay_rejects_oversized_dose_axis() {
        let reference = ReferenceData::builtin();
        let req = multi(vec![oar("Spinal cord", None)]);
        let response = evaluate_multi(&req, &reference, &EngineConfig::default()).unwrap();

        let config = EngineConfig {
            dose_axis: DoseAxis {
                start: 0.0,
                end: 100.0,
                step: 1e-17,
            },
            ..EngineConfig::default()
        };
        assert!(matches!(
            response_overlay(&req, &response, &reference, &config),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn overlay_has_one_series_per_catalogued_tissue() {
        let reference = ReferenceData::builtin();
        let config = EngineConfig::default();
        let req = multi(vec![oar("Spinal cord", None), oar("Custom PTV ring", Some(3.0))]);
        let response = evaluate_multi(&req, &reference, &config).unwrap();

        let overlay = response_overlay(&req, &response, &reference, &config).unwrap();
        assert_eq!(overlay.len(), 2);
        assert_eq!(overlay[0].role, TissueRole::Tumour);
        assert_eq!(overlay[0].label, "Head & Neck SCC");
        assert_eq!(overlay[1].label, "Spinal cord");
        assert_eq!(overlay[1].dose.len(), 101);
        assert_eq!(overlay[1].plan_eqd2, Some(response.oars[0].eqd2()));
    }
}
