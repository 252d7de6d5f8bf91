//! `rt-fractions` library crate.
//!
//! The binary (`rtf`) is a thin wrapper around this library so that:
//!
//! - the radiobiology engine is testable without spawning processes
//! - the JSON request contract can be served by other front-ends
//! - code stays easy to navigate as the project grows
//!
//! Engine entry point: [`app::pipeline::evaluate`].

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
