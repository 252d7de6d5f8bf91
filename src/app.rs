//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the reference data (presets + dose limits)
//! - builds an engine request per subcommand and evaluates it
//! - prints reports/plots or JSON
//! - writes optional exports

use clap::Parser;
use serde::Serialize;
use tracing::info;

use crate::cli::{
    Cli, Command, CurveArgs, EngineArgs, EvalArgs, LimitArgs, MultiArgs, OrganArgs, PlotArgs,
};
use crate::data::ReferenceData;
use crate::domain::{
    DualRequest, EngineConfig, EngineRequest, EngineResponse, ErrorResponse, GapRequest,
    MultiOrganRequest, RepopulationParams, RiskLimitRequest,
};
use crate::error::AppError;
use crate::math::DoseAxis;

pub mod pipeline;

/// Entry point for the `rtf` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = engine_config_from_args(&cli.engine)?;
    let reference = ReferenceData::load(cli.reference.as_deref())?;

    match cli.command {
        Command::Convert(args) => {
            info!(command = "convert", "evaluating scheme");
            let request = EngineRequest::Single(args.scheme.scheme());
            handle_request(&request, &reference, &config, args.json).map(|_| ())
        }
        Command::Dual(args) => {
            info!(command = "dual", oar_ab = args.oar_ab, "evaluating tumour and organ");
            let request = EngineRequest::Dual(DualRequest {
                scheme: args.scheme.scheme(),
                oar_ab: args.oar_ab,
            });
            handle_request(&request, &reference, &config, args.json).map(|_| ())
        }
        Command::Multi(args) => handle_multi(args, &reference, &config),
        Command::Gap(args) => {
            info!(command = "gap", missed_days = args.missed_days, "compensating gap");
            let request = EngineRequest::Gap(GapRequest {
                scheme: args.scheme.scheme(),
                missed_days: args.missed_days,
            });
            handle_request(&request, &reference, &config, args.json).map(|_| ())
        }
        Command::Limit(args) => handle_limit(args, &reference, &config),
        Command::Curve(args) => handle_curve(args, &reference, &config),
        Command::Plot(args) => handle_plot(args),
        Command::Eval(args) => handle_eval(args, &reference, &config),
        Command::Catalog => {
            info!(command = "catalog", version = %reference.version, "listing reference data");
            print!("{}", crate::report::format_catalog(&reference));
            Ok(())
        }
    }
}

fn handle_request(
    request: &EngineRequest,
    reference: &ReferenceData,
    config: &EngineConfig,
    json: bool,
) -> Result<EngineResponse, AppError> {
    let response = pipeline::evaluate(request, reference, config)?;
    if json {
        println!("{}", to_json(&response)?);
    } else {
        print!("{}", crate::report::format_response(request, &response));
    }
    Ok(response)
}

fn handle_multi(args: MultiArgs, reference: &ReferenceData, config: &EngineConfig) -> Result<(), AppError> {
    info!(command = "multi", organs = args.organs.oars.len(), "evaluating organs at risk");
    let req = multi_request(&args.organs);
    let request = EngineRequest::MultiOrgan(req.clone());
    let response = handle_request(&request, reference, config, args.json)?;
    let EngineResponse::MultiOrgan(out) = response else {
        return Err(AppError::new(1, "multi-organ request answered with another operation"));
    };

    if args.plot && !args.json {
        let series = pipeline::response_overlay(&req, &out, reference, config)?;
        println!();
        print!("{}", crate::plot::render_overlay(&series, args.width, args.height));
    }

    if let Some(path) = &args.export {
        crate::io::export::write_assessment_csv(path, &out.oars, &out.assessment)?;
        info!(path = %path.display(), "exported assessment");
    }

    Ok(())
}

fn handle_limit(args: LimitArgs, reference: &ReferenceData, config: &EngineConfig) -> Result<(), AppError> {
    info!(command = "limit", label = %args.label, prob = args.target_probability, "inverting response model");
    let request = EngineRequest::RiskLimit(RiskLimitRequest {
        label: args.label,
        d50: args.d50,
        gamma50: args.gamma50,
        target_probability: args.target_probability,
        alpha_beta: args.alpha_beta,
        dose_per_fraction: args.dose_per_fraction,
    });
    handle_request(&request, reference, config, args.json).map(|_| ())
}

fn handle_curve(args: CurveArgs, reference: &ReferenceData, config: &EngineConfig) -> Result<(), AppError> {
    info!(command = "curve", organs = args.organs.oars.len(), "sampling response curves");
    let req = multi_request(&args.organs);
    let request = EngineRequest::MultiOrgan(req.clone());
    let EngineResponse::MultiOrgan(out) = pipeline::evaluate(&request, reference, config)? else {
        return Err(AppError::new(1, "multi-organ request answered with another operation"));
    };
    let series = pipeline::response_overlay(&req, &out, reference, config)?;

    if series.is_empty() {
        println!("No catalogued tissue to plot (use --tumour-model or catalog organ labels).");
    } else {
        print!("{}", crate::plot::render_overlay(&series, args.width, args.height));
    }

    if let Some(path) = &args.export_curve {
        crate::io::curve::write_curve_json(path, &series, &config.dose_axis)?;
        info!(path = %path.display(), curves = series.len(), "exported curves");
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let curve = crate::io::curve::read_curve_json(&args.curve)?;
    info!(
        command = "plot",
        path = %args.curve.display(),
        tool = %curve.tool,
        generated_at = %curve.generated_at,
        "plotting saved curves"
    );
    print!("{}", crate::plot::render_overlay(&curve.series, args.width, args.height));
    Ok(())
}

/// Evaluate a JSON request; failures are reported as a JSON error document
/// on stdout as well as through the exit code.
fn handle_eval(args: EvalArgs, reference: &ReferenceData, config: &EngineConfig) -> Result<(), AppError> {
    let request = crate::io::request::read_request(&args.request)?;
    info!(command = "eval", operation = request.operation(), "evaluating request document");

    match pipeline::evaluate(&request, reference, config) {
        Ok(response) => {
            println!("{}", to_json(&response)?);
            Ok(())
        }
        Err(err) => {
            println!("{}", to_json(&ErrorResponse::from(&err))?);
            Err(err.into())
        }
    }
}

fn multi_request(args: &OrganArgs) -> MultiOrganRequest {
    MultiOrganRequest {
        scheme: args.scheme.scheme(),
        tumour_ab: args.tumour_ab,
        tumour_model: args.tumour_model.clone(),
        oars: args.oars.clone(),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| AppError::new(1, format!("Failed to serialize response: {e}")))
}

pub fn engine_config_from_args(args: &EngineArgs) -> Result<EngineConfig, AppError> {
    let config = EngineConfig {
        repopulation: RepopulationParams {
            kickoff_days: args.kickoff_days,
            daily_loss: args.daily_loss,
        },
        survival_alpha: args.survival_alpha,
        gap_daily_loss: args.gap_daily_loss,
        dose_axis: DoseAxis::new(args.axis_start, args.axis_end, args.axis_step)?,
    };
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flags_match_default_config() {
        let cli = Cli::try_parse_from(["rtf", "catalog"]).unwrap();
        let config = engine_config_from_args(&cli.engine).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn bad_axis_is_rejected_with_input_exit_code() {
        let cli = Cli::try_parse_from(["rtf", "catalog", "--axis-step", "0"]).unwrap();
        let err = engine_config_from_args(&cli.engine).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn multi_request_uses_scheme_and_organs() {
        let cli = Cli::try_parse_from([
            "rtf", "curve", "-d", "2", "-n", "35", "--tumour-model", "Head & Neck SCC", "--oar", "Parotid",
        ])
        .unwrap();
        let Command::Curve(args) = cli.command else {
            panic!("expected curve");
        };
        let req = multi_request(&args.organs);
        assert_eq!(req.scheme.total_dose(), 70.0);
        assert_eq!(req.tumour_model.as_deref(), Some("Head & Neck SCC"));
        assert_eq!(req.oars.len(), 1);
    }

    #[test]
    fn exported_curves_can_be_plotted_again() {
        let reference = ReferenceData::builtin();
        let config = EngineConfig::default();
        let req = MultiOrganRequest {
            scheme: crate::domain::FractionationScheme::new(2.0, 35, 46.0, 10.0),
            tumour_ab: None,
            tumour_model: Some("Head & Neck SCC".to_string()),
            oars: vec![crate::domain::OarInput {
                label: "Parotid".to_string(),
                alpha_beta: None,
            }],
        };
        let EngineResponse::MultiOrgan(out) =
            pipeline::evaluate(&EngineRequest::MultiOrgan(req.clone()), &reference, &config).unwrap()
        else {
            panic!("expected multi_organ response");
        };
        let series = pipeline::response_overlay(&req, &out, &reference, &config).unwrap();

        let path = std::env::temp_dir().join(format!("rtf_plot_{}.json", std::process::id()));
        crate::io::curve::write_curve_json(&path, &series, &config.dose_axis).unwrap();
        let result = handle_plot(PlotArgs {
            curve: path.clone(),
            width: 40,
            height: 10,
        });
        let saved = crate::io::curve::read_curve_json(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(result.is_ok());
        let labels: Vec<&str> = saved.series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["Head & Neck SCC", "Parotid"]);
        assert_eq!(saved.series[1].dose.len(), series[1].dose.len());
    }

    #[test]
    fn plotting_a_missing_curve_file_fails() {
        let err = handle_plot(PlotArgs {
            curve: "/nonexistent/curves.json".into(),
            width: 40,
            height: 10,
        })
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
