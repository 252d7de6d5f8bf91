//! Numeric helpers shared by the models: dose axes for curve sampling.

pub mod axis;

pub use axis::*;
