//! Summary output.

pub mod generator;

pub use generator::*;
