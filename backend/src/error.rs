//! Error handling for the Pesticide Dose Calculator
//!
//! Two layers of errors:
//! - [`AppError`]: startup failures (configuration, catalog loading). These are fatal.
//! - [`CalculationError`]: per-request failures. These are never fatal and are
//!   rendered in English or Hindi into `CalculationResult.error`.

use shared::i18n::{self, MessageKey};
use shared::Language;
use thiserror::Error;

/// Application (startup) error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Failed to read catalog file {path}: {source}")]
    CatalogIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    CatalogParse(#[from] serde_json::Error),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Result type alias for startup operations
pub type AppResult<T> = Result<T, AppError>;

/// The three error kinds reported by the calculate operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    UnsupportedUnit,
}

/// Per-request calculation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalculationError {
    // Validation errors
    #[error("Malformed request body")]
    MalformedRequest,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid value for {0}")]
    InvalidField(&'static str),

    #[error("Invalid area: {0:?}")]
    InvalidArea(MessageKey),

    #[error("Calculated dose is out of range")]
    DoseOutOfRange,

    // Lookup errors
    #[error("No recommendation found for {crop} and {pest_disease}")]
    NotFound { crop: String, pest_disease: String },

    // Unit errors
    #[error("Unsupported unit for {field}: {value}")]
    UnknownUnit { field: &'static str, value: String },

    #[error("Unsupported unit conversion from {from} to {to}")]
    UnsupportedUnit { from: String, to: String },
}

impl CalculationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CalculationError::MalformedRequest
            | CalculationError::MissingField(_)
            | CalculationError::InvalidField(_)
            | CalculationError::InvalidArea(_)
            | CalculationError::DoseOutOfRange => ErrorKind::Validation,
            CalculationError::NotFound { .. } => ErrorKind::NotFound,
            CalculationError::UnknownUnit { .. } | CalculationError::UnsupportedUnit { .. } => {
                ErrorKind::UnsupportedUnit
            }
        }
    }

    /// Human-readable message in the requested language
    pub fn message(&self, language: Language) -> String {
        match self {
            CalculationError::MalformedRequest => {
                i18n::render(MessageKey::MalformedRequest, language, &[])
            }
            CalculationError::MissingField(field) => {
                i18n::render(MessageKey::MissingField, language, &[("field", *field)])
            }
            CalculationError::InvalidField(field) => {
                i18n::render(MessageKey::InvalidField, language, &[("field", *field)])
            }
            CalculationError::InvalidArea(key) => i18n::render(*key, language, &[]),
            CalculationError::DoseOutOfRange => {
                i18n::render(MessageKey::DoseOutOfRange, language, &[])
            }
            CalculationError::NotFound { crop, pest_disease } => i18n::render(
                MessageKey::NoRecommendation,
                language,
                &[("crop", crop.as_str()), ("pest_disease", pest_disease.as_str())],
            ),
            CalculationError::UnknownUnit { field, value } => i18n::render(
                MessageKey::UnknownUnit,
                language,
                &[("field", *field), ("value", value.as_str())],
            ),
            CalculationError::UnsupportedUnit { from, to } => i18n::render(
                MessageKey::UnsupportedConversion,
                language,
                &[("from", from.as_str()), ("to", to.as_str())],
            ),
        }
    }
}

impl From<shared::UnitError> for CalculationError {
    fn from(err: shared::UnitError) -> Self {
        match err {
            shared::UnitError::Unknown(value) => CalculationError::UnknownUnit {
                field: "unit",
                value,
            },
            shared::UnitError::Unsupported { from, to } => {
                CalculationError::UnsupportedUnit { from, to }
            }
            shared::UnitError::Overflow => CalculationError::DoseOutOfRange,
        }
    }
}
