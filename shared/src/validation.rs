//! Validation utilities for calculation requests
//!
//! Validators return the [`MessageKey`] describing the violation so callers
//! can render it in the request language.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::i18n::MessageKey;

/// Largest accepted field area, in any unit.
pub const MAX_AREA: f64 = 1.0e12;

// ============================================================================
// Area Validations
// ============================================================================

/// Validate a field area: finite, strictly positive and not absurdly large
pub fn validate_area(area: f64) -> Result<(), MessageKey> {
    if !area.is_finite() {
        return Err(MessageKey::AreaNotNumeric);
    }
    if area <= 0.0 {
        return Err(MessageKey::AreaNotPositive);
    }
    if area > MAX_AREA {
        return Err(MessageKey::AreaOutOfRange);
    }
    Ok(())
}

/// Validate an area and convert it to a decimal for exact arithmetic
pub fn area_to_decimal(area: f64) -> Result<Decimal, MessageKey> {
    validate_area(area)?;
    // Shortest round-trip text keeps typed values such as 2.4710538 exact
    let value = Decimal::from_str(&area.to_string())
        .or_else(|_| Decimal::try_from(area))
        .map_err(|_| {
            if area < 1.0 {
                MessageKey::AreaTooSmall
            } else {
                MessageKey::AreaOutOfRange
            }
        })?;
    // Positive but below what a decimal can hold
    if value.is_zero() {
        return Err(MessageKey::AreaTooSmall);
    }
    Ok(value)
}

/// Parse an area typed as text (e.g. "2.5"); anything non-numeric is `None`
pub fn parse_area_text(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

// ============================================================================
// Key Validations
// ============================================================================

/// Validate that a catalog key (crop or pest/disease name) is present
pub fn validate_key(key: &str) -> Result<(), MessageKey> {
    if key.trim().is_empty() {
        return Err(MessageKey::MissingField);
    }
    Ok(())
}
