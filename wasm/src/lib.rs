//! WebAssembly module for the Pesticide Dose Calculator
//!
//! Provides client-side computation for:
//! - Area conversion between acres and hectares
//! - Re-expressing a dose rate in another unit
//! - Previewing a scaled dose before submitting a request
//! - Offline validation of the area field

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::{SupportedUnits, UnitOption};
pub use shared::types::*;
pub use shared::units::{AreaUnit, DoseUnit, RateKind};
pub use shared::validation::*;

use shared::units;

/// Decimal places of every preview value
const PREVIEW_PRECISION: u32 = 4;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {}

/// Convert a field area, e.g. `convert_area(2, "hectares", "acres")`
#[wasm_bindgen]
pub fn convert_area(value: f64, from: &str, to: &str) -> Result<f64, JsValue> {
    area_in(value, from, to).map_err(|e| JsValue::from_str(&e))
}

/// Re-express a dose rate, e.g. 10 gram-per-acre as gram-per-hectare
#[wasm_bindgen]
pub fn convert_dose_basis(rate: f64, from: &str, to: &str) -> Result<f64, JsValue> {
    rate_in(rate, from, to).map_err(|e| JsValue::from_str(&e))
}

/// Scale a reference rate to a field area in the desired output unit
#[wasm_bindgen]
pub fn scale_dose(
    reference_rate: f64,
    reference_unit: &str,
    area: f64,
    area_unit: &str,
    desired_unit: &str,
) -> Result<f64, JsValue> {
    dose_for(reference_rate, reference_unit, area, area_unit, desired_unit)
        .map_err(|e| JsValue::from_str(&e))
}

/// Supported area and output units as JSON, for building unit pickers offline
#[wasm_bindgen]
pub fn supported_units() -> Result<String, JsValue> {
    serde_json::to_string(&SupportedUnits::all())
        .map_err(|e| JsValue::from_str(&format!("Failed to encode units: {}", e)))
}

/// Check a typed area value; returns the English validation message or an empty string
#[wasm_bindgen]
pub fn validate_area_input(text: &str) -> String {
    let checked = parse_area_text(text)
        .ok_or(shared::i18n::MessageKey::AreaNotNumeric)
        .and_then(|area| validate_area(area).map(|_| area));
    match checked {
        Ok(_) => String::new(),
        Err(key) => shared::i18n::render(key, Language::English, &[]),
    }
}

fn area_in(value: f64, from: &str, to: &str) -> Result<f64, String> {
    let from = AreaUnit::from_str(from).map_err(|e| e.to_string())?;
    let to = AreaUnit::from_str(to).map_err(|e| e.to_string())?;
    to_preview(units::convert_area(decimal(value)?, from, to))
}

fn rate_in(rate: f64, from: &str, to: &str) -> Result<f64, String> {
    let from = DoseUnit::from_str(from).map_err(|e| e.to_string())?;
    let to = DoseUnit::from_str(to).map_err(|e| e.to_string())?;
    let converted = units::convert_dose_basis(decimal(rate)?, from, to).map_err(|e| e.to_string())?;
    to_preview(converted)
}

fn dose_for(
    reference_rate: f64,
    reference_unit: &str,
    area: f64,
    area_unit: &str,
    desired_unit: &str,
) -> Result<f64, String> {
    let reference_unit = DoseUnit::from_str(reference_unit).map_err(|e| e.to_string())?;
    let area_unit = AreaUnit::from_str(area_unit).map_err(|e| e.to_string())?;
    let desired_unit = DoseUnit::from_str(desired_unit).map_err(|e| e.to_string())?;
    let area = area_to_decimal(area).map_err(|key| shared::i18n::render(key, Language::English, &[]))?;
    let dose = units::scale_dose(decimal(reference_rate)?, reference_unit, area, area_unit, desired_unit)
        .map_err(|e| e.to_string())?;
    to_preview(dose)
}

fn decimal(value: f64) -> Result<Decimal, String> {
    Decimal::from_str(&value.to_string())
        .or_else(|_| Decimal::try_from(value))
        .map_err(|_| format!("value out of range: {}", value))
}

fn to_preview(value: Decimal) -> Result<f64, String> {
    let rounded = value.round_dp_with_strategy(PREVIEW_PRECISION, RoundingStrategy::MidpointAwayFromZero);
    // Tiny non-zero values stay at full precision
    let shown = if rounded.is_zero() { value.normalize() } else { rounded };
    shown.to_f64().ok_or_else(|| "value out of range".to_string())
}
