//! HTTP handlers for the Pesticide Dose Calculator

pub mod calculate;
pub mod catalog;
pub mod health;

pub use calculate::calculate;
pub use catalog::{get_crops, get_pests_diseases, get_units};
pub use health::health_check;
