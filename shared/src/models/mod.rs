//! Domain models for the Pesticide Dose Calculator

mod calculation;
mod catalog;

pub use calculation::*;
pub use catalog::*;
