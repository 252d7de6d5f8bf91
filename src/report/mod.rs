//! Reporting utilities: organ risk classification and formatted terminal output.

pub mod format;
pub mod risk;

pub use format::*;
pub use risk::{classify, evaluate as evaluate_risk};
