//! Static reference data: tissue presets and published dose limits.
//!
//! The tables are loaded once at startup and then only borrowed. Sources, in
//! order of precedence:
//!
//! 1. an explicit `--reference <JSON>` path
//! 2. `RTF_REFERENCE_DATA` (environment or `.env`)
//! 3. the built-in tables below
//!
//! The built-in values are illustrative literature figures (Emami/Burman TD50
//! and Lyman `m` converted via `γ50 = 1 / (m·√(2π))`, QUANTEC-style limits).
//! Replace them with institutional data before relying on any output.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::types::validate_alpha_beta;
use crate::domain::{DoseLimits, TissueResponseModel};
use crate::error::AppError;

pub const REFERENCE_ENV: &str = "RTF_REFERENCE_DATA";

/// A catalog entry: response model plus the tissue's default α/β.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TissuePreset {
    pub label: String,
    #[serde(rename = "D50", alias = "d50")]
    pub d50: f64,
    pub gamma50: f64,
    #[serde(rename = "ab", alias = "alpha_beta")]
    pub alpha_beta: f64,
}

impl TissuePreset {
    fn new(label: &str, d50: f64, gamma50: f64, alpha_beta: f64) -> Self {
        Self {
            label: label.to_string(),
            d50,
            gamma50,
            alpha_beta,
        }
    }

    pub fn response_model(&self) -> TissueResponseModel {
        TissueResponseModel::new(self.label.clone(), self.d50, self.gamma50)
    }
}

/// Tumour catalog, organ catalog and the label -> limit table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub tumours: Vec<TissuePreset>,
    #[serde(default)]
    pub organs: Vec<TissuePreset>,
    /// EQD2 dose ceilings (Gy) keyed by organ label.
    #[serde(default)]
    pub limits: DoseLimits,
}

fn default_version() -> String {
    "unversioned".to_string()
}

impl ReferenceData {
    /// Built-in tables.
    pub fn builtin() -> Self {
        let tumours = vec![
            TissuePreset::new("Head & Neck SCC", 51.0, 1.8, 10.0),
            TissuePreset::new("Glioblastoma", 60.0, 1.5, 10.0),
            TissuePreset::new("NSCLC", 84.5, 1.5, 10.0),
            TissuePreset::new("Breast", 38.0, 1.3, 4.0),
            TissuePreset::new("Prostate", 67.5, 2.2, 1.5),
        ];
        let organs = vec![
            TissuePreset::new("Spinal cord", 66.5, 2.28, 2.0),
            TissuePreset::new("Brainstem", 65.0, 2.85, 2.0),
            TissuePreset::new("Optic chiasm", 65.0, 2.85, 2.0),
            TissuePreset::new("Parotid", 46.0, 2.22, 3.0),
            TissuePreset::new("Lung", 24.5, 2.22, 3.0),
            TissuePreset::new("Heart", 48.0, 3.99, 3.0),
            TissuePreset::new("Rectum", 80.0, 2.66, 3.0),
            TissuePreset::new("Bladder", 80.0, 3.63, 5.0),
        ];
        let limits = [
            ("Spinal cord", 50.0),
            ("Brainstem", 54.0),
            ("Optic chiasm", 55.0),
            ("Parotid", 26.0),
            ("Lung", 20.0),
            ("Heart", 26.0),
            ("Rectum", 75.0),
            ("Bladder", 65.0),
        ]
        .into_iter()
        .map(|(label, limit)| (label.to_string(), limit))
        .collect();

        Self {
            version: "builtin-1".to_string(),
            tumours,
            organs,
            limits,
        }
    }

    /// Resolve the reference data source and load it.
    pub fn load(explicit: Option<&Path>) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(REFERENCE_ENV).map(PathBuf::from));

        match path {
            Some(path) => {
                let data = Self::from_json_file(&path)?;
                info!(path = %path.display(), version = %data.version, "loaded reference data");
                Ok(data)
            }
            None => {
                debug!("using built-in reference data");
                Ok(Self::builtin())
            }
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path).map_err(|e| {
            AppError::new(2, format!("Failed to open reference data '{}': {e}", path.display()))
        })?;
        let data: ReferenceData = serde_json::from_reader(file).map_err(|e| {
            AppError::new(2, format!("Invalid reference data '{}': {e}", path.display()))
        })?;
        data.validate()?;
        Ok(data)
    }

    /// Reject presets and limits the engine would refuse at request time.
    pub fn validate(&self) -> Result<(), AppError> {
        for preset in self.tumours.iter().chain(self.organs.iter()) {
            preset
                .response_model()
                .validate()
                .and_then(|()| validate_alpha_beta(preset.alpha_beta))
                .map_err(|e| AppError::new(2, format!("Invalid reference preset '{}': {e}", preset.label)))?;
        }
        for (label, &limit) in &self.limits {
            if !(limit.is_finite() && limit > 0.0) {
                return Err(AppError::new(
                    2,
                    format!("Invalid dose limit for '{label}': {limit} (must be > 0)."),
                ));
            }
        }
        Ok(())
    }

    pub fn tumour(&self, label: &str) -> Option<&TissuePreset> {
        self.tumours.iter().find(|p| p.label == label)
    }

    pub fn organ(&self, label: &str) -> Option<&TissuePreset> {
        self.organs.iter().find(|p| p.label == label)
    }

    pub fn limit(&self, label: &str) -> Option<f64> {
        self.limits.get(label).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_are_valid() {
        let data = ReferenceData::builtin();
        data.validate().unwrap();
        for organ in &data.organs {
            assert!(data.limit(&organ.label).is_some(), "no limit for {}", organ.label);
        }
    }

    #[test]
    fn lookups_are_exact_label_matches() {
        let data = ReferenceData::builtin();
        assert_eq!(data.organ("Spinal cord").unwrap().alpha_beta, 2.0);
        assert!(data.organ("spinal cord").is_none());
        assert_eq!(data.tumour("Prostate").unwrap().alpha_beta, 1.5);
        assert_eq!(data.limit("Parotid"), Some(26.0));
        assert_eq!(data.limit("Unknown"), None);
    }

    #[test]
    fn json_uses_catalog_field_names() {
        let json = r#"{
            "version": "site-2026",
            "tumours": [{"label": "T", "D50": 60, "gamma50": 2.5, "ab": 10}],
            "organs": [],
            "limits": {"Spinal cord": 45}
        }"#;
        let data: ReferenceData = serde_json::from_str(json).unwrap();
        data.validate().unwrap();
        assert_eq!(data.tumour("T").unwrap().d50, 60.0);
        assert_eq!(data.limit("Spinal cord"), Some(45.0));
    }

    #[test]
    fn non_positive_limit_fails_validation() {
        let mut data = ReferenceData::builtin();
        data.limits.insert("Lens".to_string(), 0.0);
        assert!(data.validate().is_err());
    }

    #[test]
    fn explicit_path_must_exist() {
        let err = ReferenceData::load(Some(Path::new("/nonexistent/reference.json"))).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
