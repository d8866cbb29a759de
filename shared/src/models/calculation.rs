//! Dose calculation request and result models

use serde::{Deserialize, Serialize};

use crate::types::Language;
use crate::units::{AreaUnit, DoseUnit, RateKind};

/// A validated-shape calculation request.
///
/// Units are kept as the caller sent them; recognizing them is part of the
/// calculation so that unknown units surface as a calculation error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalculationRequest {
    pub crop_en: String,
    pub pest_disease_en: String,
    pub area: f64,
    pub area_unit: String,
    pub desired_output_unit: String,
    #[serde(default)]
    pub language: Language,
}

/// Response of the calculate operation.
///
/// On failure only `error` is set; on success `error` is `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CalculationResult {
    pub chemical: Option<String>,
    pub calculated_dose: Option<f64>,
    pub unit: Option<String>,
    pub source: Option<String>,
    pub error: Option<String>,
}

impl CalculationResult {
    pub fn success(chemical: String, calculated_dose: f64, unit: String, source: Option<String>) -> Self {
        Self {
            chemical: Some(chemical),
            calculated_dose: Some(calculated_dose),
            unit: Some(unit),
            source,
            error: None,
        }
    }

    pub fn failure(message: String) -> Self {
        Self {
            error: Some(message),
            ..Self::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// A unit option offered to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnitOption {
    pub value: String,
    pub name_en: String,
    pub name_hi: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<RateKind>,
}

/// Supported area and output units
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SupportedUnits {
    pub area_units: Vec<UnitOption>,
    pub output_units: Vec<UnitOption>,
}

impl SupportedUnits {
    /// Every area unit and every dose unit, labelled in both languages
    pub fn all() -> Self {
        let area_units = AreaUnit::ALL
            .iter()
            .map(|unit| UnitOption {
                value: unit.as_str().to_string(),
                name_en: unit.label().en.to_string(),
                name_hi: unit.label().hi.to_string(),
                kind: None,
            })
            .collect();

        let output_units = DoseUnit::all()
            .into_iter()
            .map(|unit| UnitOption {
                value: unit.to_string(),
                name_en: unit.display_name(Language::English),
                name_hi: unit.display_name(Language::Hindi),
                kind: Some(unit.kind()),
            })
            .collect();

        Self {
            area_units,
            output_units,
        }
    }
}
