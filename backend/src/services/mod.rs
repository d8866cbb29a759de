//! Business logic services for the Pesticide Dose Calculator

pub mod dose;
pub mod query;

pub use dose::DoseCalculator;
pub use query::QueryService;
