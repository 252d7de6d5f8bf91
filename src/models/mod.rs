//! Radiobiology models.
//!
//! Models are implemented as small, pure functions over immutable inputs so
//! that the pipeline can call them in any order (or in parallel) and combine
//! the results deterministically.
//!
//! - `lq`: linear-quadratic dose conversion (BED, EQD2, time correction, survival)
//! - `response`: logistic TCP/NTCP curves
//! - `inverse`: target probability -> EQD2 dose limit
//! - `gap`: compensation for missed treatment days

pub mod gap;
pub mod inverse;
pub mod lq;
pub mod response;

pub use gap::compensate;
pub use inverse::{dose_for_probability, invert};
pub use lq::convert;
pub use response::{probability, response_curve, ResponseCurve};
