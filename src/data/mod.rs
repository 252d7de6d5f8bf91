//! Reference data consumed (never produced) by the engine.

pub mod catalog;

pub use catalog::{ReferenceData, TissuePreset, REFERENCE_ENV};
