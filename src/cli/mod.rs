//! Command-line parsing for the `rtf` fractionation calculator.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the radiobiology code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{FractionationScheme, OarInput};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "rtf",
    version,
    about = "Radiotherapy fractionation calculator (BED / EQD2 / TCP / NTCP)",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub engine: EngineArgs,

    /// Reference data JSON (tumour/organ presets and dose limits).
    ///
    /// Falls back to `RTF_REFERENCE_DATA`, then to the built-in tables.
    #[arg(long, global = true, value_name = "JSON")]
    pub reference: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert one scheme to BED, EQD2, time-corrected BED and survival fraction.
    Convert(ConvertArgs),
    /// Convert one scheme for a tumour and a single organ at risk.
    Dual(DualArgs),
    /// Evaluate a tumour and several organs at risk against the dose-limit table.
    Multi(MultiArgs),
    /// Extra dose needed to compensate missed treatment days.
    Gap(GapArgs),
    /// Dose limit for a target complication or control probability.
    Limit(LimitArgs),
    /// Plot TCP/NTCP curves with the plan's EQD2 per tissue.
    Curve(CurveArgs),
    /// Plot a previously exported curve JSON.
    Plot(PlotArgs),
    /// Evaluate a JSON request document and print the JSON response.
    Eval(EvalArgs),
    /// List reference presets and dose limits.
    Catalog,
}

/// Engine constants shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct EngineArgs {
    /// Day on which accelerated repopulation starts.
    #[arg(long, global = true, default_value_t = 28.0)]
    pub kickoff_days: f64,

    /// BED lost per day of treatment beyond the kickoff (Gy/day, 0 disables).
    #[arg(long, global = true, default_value_t = 0.9)]
    pub daily_loss: f64,

    /// BED lost per missed treatment day (Gy/day).
    #[arg(long, global = true, default_value_t = 0.9)]
    pub gap_daily_loss: f64,

    /// Reference α (1/Gy) for the survival fraction exp(-α·BED).
    #[arg(long, global = true, default_value_t = 0.3)]
    pub survival_alpha: f64,

    /// Response-curve dose axis start (Gy).
    #[arg(long, global = true, default_value_t = 0.0)]
    pub axis_start: f64,

    /// Response-curve dose axis end (Gy).
    #[arg(long, global = true, default_value_t = 100.0)]
    pub axis_end: f64,

    /// Response-curve dose axis step (Gy).
    #[arg(long, global = true, default_value_t = 1.0)]
    pub axis_step: f64,
}

/// A fractionation scheme.
#[derive(Debug, Args, Clone)]
pub struct SchemeArgs {
    /// Dose per fraction (Gy).
    #[arg(short = 'd', long = "dose")]
    pub dose_per_fraction: f64,

    /// Number of fractions.
    #[arg(short = 'n', long = "fractions")]
    pub fractions: u32,

    /// Overall treatment time (days).
    #[arg(short = 't', long = "time", default_value_t = 0.0)]
    pub treatment_time: f64,

    /// α/β of the tissue (Gy). For tumour/OAR commands this is the tumour α/β.
    #[arg(long = "ab", default_value_t = 10.0)]
    pub alpha_beta: f64,
}

impl SchemeArgs {
    pub fn scheme(&self) -> FractionationScheme {
        FractionationScheme::new(
            self.dose_per_fraction,
            self.fractions,
            self.treatment_time,
            self.alpha_beta,
        )
    }
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub scheme: SchemeArgs,

    /// Print the JSON response instead of the report.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct DualArgs {
    #[command(flatten)]
    pub scheme: SchemeArgs,

    /// α/β of the organ at risk (Gy).
    #[arg(long, default_value_t = 3.0)]
    pub oar_ab: f64,

    /// Print the JSON response instead of the report.
    #[arg(long)]
    pub json: bool,
}

/// Tumour plus organs at risk.
#[derive(Debug, Args, Clone)]
pub struct OrganArgs {
    #[command(flatten)]
    pub scheme: SchemeArgs,

    /// Tumour α/β (Gy); defaults to `--ab`.
    #[arg(long)]
    pub tumour_ab: Option<f64>,

    /// Tumour preset for TCP (see `rtf catalog`).
    #[arg(long, value_name = "LABEL")]
    pub tumour_model: Option<String>,

    /// Organ at risk as `LABEL` or `LABEL:AB` (repeatable).
    ///
    /// Without an α/β the catalog value is used.
    #[arg(long = "oar", value_name = "LABEL[:AB]", value_parser = parse_oar)]
    pub oars: Vec<OarInput>,
}

#[derive(Debug, Args)]
pub struct MultiArgs {
    #[command(flatten)]
    pub organs: OrganArgs,

    /// Print the JSON response instead of the report.
    #[arg(long)]
    pub json: bool,

    /// Export per-organ assessments to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Append the TCP/NTCP overlay plot to the report.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[derive(Debug, Args)]
pub struct GapArgs {
    #[command(flatten)]
    pub scheme: SchemeArgs,

    /// Number of missed treatment days.
    #[arg(long, allow_negative_numbers = true)]
    pub missed_days: i64,

    /// Print the JSON response instead of the report.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct LimitArgs {
    /// Dose for 50 % response (Gy).
    #[arg(long = "d50")]
    pub d50: f64,

    /// Normalised slope at D50.
    #[arg(long)]
    pub gamma50: f64,

    /// Target probability, strictly between 0 and 1.
    #[arg(long = "prob")]
    pub target_probability: f64,

    /// α/β of the tissue (Gy).
    #[arg(long = "ab", default_value_t = 3.0)]
    pub alpha_beta: f64,

    /// Dose per fraction of the delivery (Gy).
    #[arg(short = 'd', long = "dose", default_value_t = 2.0)]
    pub dose_per_fraction: f64,

    /// Model label used in the report.
    #[arg(long, default_value = "custom")]
    pub label: String,

    /// Print the JSON response instead of the report.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct CurveArgs {
    #[command(flatten)]
    pub organs: OrganArgs,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export the sampled curves to JSON.
    #[arg(long = "export-curve", value_name = "JSON")]
    pub export_curve: Option<PathBuf>,
}

/// Options for plotting a saved curve file.
#[derive(Debug, Args)]
pub struct PlotArgs {
    /// Curve JSON file produced by `rtf curve --export-curve`.
    #[arg(long, value_name = "JSON")]
    pub curve: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[derive(Debug, Args)]
pub struct EvalArgs {
    /// Request JSON file, or `-` for stdin.
    #[arg(long, default_value = "-", value_name = "JSON")]
    pub request: PathBuf,
}

/// Parse `LABEL` or `LABEL:AB`.
///
/// The α/β is split at the last `:` so labels may contain colons.
pub fn parse_oar(s: &str) -> Result<OarInput, String> {
    let s = s.trim();
    let (label, alpha_beta) = match s.rsplit_once(':') {
        Some((label, ab)) => {
            let ab: f64 = ab
                .trim()
                .parse()
                .map_err(|_| format!("invalid α/β '{ab}' in '{s}' (expected LABEL:AB)"))?;
            (label.trim(), Some(ab))
        }
        None => (s, None),
    };
    if label.is_empty() {
        return Err(format!("missing organ label in '{s}'"));
    }
    Ok(OarInput {
        label: label.to_string(),
        alpha_beta,
    })
}
