//! Foundation layer: math types and time utilities
//!
//! Everything in here is dependency-free with respect to the rest of the
//! engine; higher layers (assets, gameplay) build on top of it.

pub mod math;
pub mod time;
