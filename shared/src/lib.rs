//! Shared types and models for the Pesticide Dose Calculator
//!
//! This crate contains the pure parts of the system: the catalog and
//! calculation models, the unit converter and the bilingual message table.
//! It is used by the backend server and by the WASM bindings.

pub mod i18n;
pub mod models;
pub mod types;
pub mod units;
pub mod validation;

pub use models::*;
pub use types::*;
pub use units::*;
pub use validation::*;
