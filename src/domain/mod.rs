//! Domain types used throughout the engine.
//!
//! This module defines:
//!
//! - engine inputs (`FractionationScheme`, `TissueResponseModel`)
//! - engine outputs (`DoseMetrics`, `OrganResult`, `RiskAssessment`, ...)
//! - tunable clinical constants (`EngineConfig`)
//! - sampled response curves (`CurveSeries`, `CurveFile`)
//! - the tagged request/response contract (`EngineRequest`, `EngineResponse`)

pub mod config;
pub mod curve;
pub mod request;
pub mod types;

pub use config::*;
pub use curve::*;
pub use request::*;
pub use types::*;
