//! Input/output helpers.
//!
//! - request JSON parsing (`request`)
//! - assessment exports (CSV) (`export`)
//! - curve JSON read/write (`curve`)

pub mod curve;
pub mod export;
pub mod request;

pub use curve::*;
pub use export::*;
pub use request::*;
