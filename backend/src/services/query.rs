//! Query service consumed by the HTTP handlers
//!
//! Exposes the catalog listings and the calculate operation, and turns raw
//! request bodies into typed requests. Malformed input becomes an
//! error-bearing [`CalculationResult`], never a transport fault.

use std::sync::Arc;

use serde_json::{Map, Value};
use shared::i18n::MessageKey;
use shared::models::{CalculationRequest, CalculationResult, CatalogEntry, SupportedUnits};
use shared::{validation, Language};

use crate::catalog::{CatalogSummary, RecommendationStore};
use crate::error::CalculationError;
use crate::services::dose::DoseCalculator;

/// Query service for crops, pests/diseases and dose calculations
#[derive(Clone)]
pub struct QueryService {
    store: Arc<RecommendationStore>,
    calculator: DoseCalculator,
}

impl QueryService {
    /// Create a new QueryService instance
    pub fn new(store: Arc<RecommendationStore>, display_precision: u32) -> Self {
        let calculator = DoseCalculator::new(store.clone(), display_precision);
        Self { store, calculator }
    }

    /// Get all crops
    pub fn get_crops(&self) -> Vec<CatalogEntry> {
        self.store.list_crops().iter().map(CatalogEntry::from).collect()
    }

    /// Get the pests/diseases of a crop; empty for an unknown crop
    pub fn get_pests_diseases(&self, crop_en: &str) -> Vec<CatalogEntry> {
        self.store
            .list_pests_diseases(crop_en)
            .into_iter()
            .map(CatalogEntry::from)
            .collect()
    }

    /// Get the supported area and output units with their labels
    pub fn get_units(&self) -> SupportedUnits {
        SupportedUnits::all()
    }

    /// Calculate a dose from a raw JSON request body
    pub fn calculate(&self, body: &[u8]) -> CalculationResult {
        let payload: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("Rejected malformed calculate body: {}", err);
                return failure(CalculationError::MalformedRequest, Language::English);
            }
        };

        let Some(fields) = payload.as_object() else {
            tracing::warn!("Rejected non-object calculate body");
            return failure(CalculationError::MalformedRequest, Language::English);
        };

        let language = language_of(fields);
        match parse_request(fields, language) {
            Ok(request) => self.calculate_request(&request),
            Err(err) => {
                tracing::warn!(kind = ?err.kind(), "Rejected calculate request: {}", err);
                failure(err, language)
            }
        }
    }

    /// Calculate a dose from an already-typed request
    pub fn calculate_request(&self, request: &CalculationRequest) -> CalculationResult {
        self.calculator.compute(request)
    }

    pub fn catalog_summary(&self) -> CatalogSummary {
        self.store.summary()
    }
}

fn failure(err: CalculationError, language: Language) -> CalculationResult {
    CalculationResult::failure(err.message(language))
}

/// Missing or non-string `language` means English
fn language_of(fields: &Map<String, Value>) -> Language {
    fields
        .get("language")
        .and_then(Value::as_str)
        .map(Language::from_code)
        .unwrap_or_default()
}

fn parse_request(fields: &Map<String, Value>, language: Language) -> Result<CalculationRequest, CalculationError> {
    Ok(CalculationRequest {
        crop_en: required_string(fields, "crop_en")?,
        pest_disease_en: required_string(fields, "pest_disease_en")?,
        area: required_area(fields)?,
        area_unit: required_string(fields, "area_unit")?,
        desired_output_unit: required_string(fields, "desired_output_unit")?,
        language,
    })
}

fn required_string(fields: &Map<String, Value>, name: &'static str) -> Result<String, CalculationError> {
    match fields.get(name) {
        None | Some(Value::Null) => Err(CalculationError::MissingField(name)),
        Some(Value::String(s)) if s.trim().is_empty() => Err(CalculationError::MissingField(name)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(CalculationError::InvalidField(name)),
    }
}

/// Accepts a JSON number or a numeric string
fn required_area(fields: &Map<String, Value>) -> Result<f64, CalculationError> {
    match fields.get("area") {
        None | Some(Value::Null) => Err(CalculationError::MissingField("area")),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or(CalculationError::InvalidArea(MessageKey::AreaNotNumeric)),
        Some(Value::String(s)) if s.trim().is_empty() => Err(CalculationError::MissingField("area")),
        Some(Value::String(s)) => validation::parse_area_text(s)
            .ok_or(CalculationError::InvalidArea(MessageKey::AreaNotNumeric)),
        Some(_) => Err(CalculationError::InvalidArea(MessageKey::AreaNotNumeric)),
    }
}
