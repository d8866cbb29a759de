//! Unit conversion for field areas and dose rates
//!
//! All arithmetic is done in [`Decimal`] so that conversions are exact to the
//! precision of the stored constants. Rounding for display happens only at
//! the service boundary.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::types::{Language, LocalizedText};

/// 1 hectare = 2.4710538 acres. Every area conversion goes through this value.
pub const ACRES_PER_HECTARE: Decimal = Decimal::from_parts(24_710_538, 0, 0, false, 7);

const THOUSAND: Decimal = Decimal::from_parts(1_000, 0, 0, false, 0);

/// Unit conversion errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    #[error("unknown unit: {0}")]
    Unknown(String),

    #[error("unsupported unit conversion from {from} to {to}")]
    Unsupported { from: String, to: String },

    #[error("value out of range during unit conversion")]
    Overflow,
}

// ============================================================================
// Area units
// ============================================================================

/// Units a field area can be given in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AreaUnit {
    #[serde(alias = "acre")]
    Acres,
    #[serde(alias = "hectare")]
    Hectares,
}

impl AreaUnit {
    pub const ALL: [AreaUnit; 2] = [AreaUnit::Acres, AreaUnit::Hectares];

    /// Wire value, as accepted in requests
    pub fn as_str(&self) -> &'static str {
        match self {
            AreaUnit::Acres => "acres",
            AreaUnit::Hectares => "hectares",
        }
    }

    /// Singular form used inside compound dose units
    fn singular(&self) -> &'static str {
        match self {
            AreaUnit::Acres => "acre",
            AreaUnit::Hectares => "hectare",
        }
    }

    pub fn label(&self) -> LocalizedText {
        match self {
            AreaUnit::Acres => LocalizedText::new("Acres", "एकड़"),
            AreaUnit::Hectares => LocalizedText::new("Hectares", "हेक्टेयर"),
        }
    }

    fn per_label(&self) -> LocalizedText {
        match self {
            AreaUnit::Acres => LocalizedText::new("acre", "एकड़"),
            AreaUnit::Hectares => LocalizedText::new("hectare", "हेक्टेयर"),
        }
    }
}

impl fmt::Display for AreaUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AreaUnit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "acres" | "acre" | "ac" => Ok(AreaUnit::Acres),
            "hectares" | "hectare" | "ha" => Ok(AreaUnit::Hectares),
            _ => Err(UnitError::Unknown(s.to_string())),
        }
    }
}

// ============================================================================
// Amount units
// ============================================================================

/// Physical family of an amount; conversions never cross families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountFamily {
    Mass,
    Volume,
}

/// Unit of the numerator of a dose rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmountUnit {
    Gram,
    Kilogram,
    Milliliter,
    Liter,
}

impl AmountUnit {
    pub const ALL: [AmountUnit; 4] = [
        AmountUnit::Gram,
        AmountUnit::Kilogram,
        AmountUnit::Milliliter,
        AmountUnit::Liter,
    ];

    pub fn family(&self) -> AmountFamily {
        match self {
            AmountUnit::Gram | AmountUnit::Kilogram => AmountFamily::Mass,
            AmountUnit::Milliliter | AmountUnit::Liter => AmountFamily::Volume,
        }
    }

    /// Size of one unit in grams (mass) or milliliters (volume)
    fn base_factor(&self) -> Decimal {
        match self {
            AmountUnit::Gram | AmountUnit::Milliliter => Decimal::ONE,
            AmountUnit::Kilogram | AmountUnit::Liter => THOUSAND,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AmountUnit::Gram => "gram",
            AmountUnit::Kilogram => "kilogram",
            AmountUnit::Milliliter => "milliliter",
            AmountUnit::Liter => "liter",
        }
    }

    pub fn label(&self) -> LocalizedText {
        match self {
            AmountUnit::Gram => LocalizedText::new("grams", "ग्राम"),
            AmountUnit::Kilogram => LocalizedText::new("kilograms", "किलोग्राम"),
            AmountUnit::Milliliter => LocalizedText::new("milliliters", "मिलीलीटर"),
            AmountUnit::Liter => LocalizedText::new("liters", "लीटर"),
        }
    }

    fn parse_token(token: &str) -> Option<Self> {
        match token {
            "gram" | "grams" | "g" | "gm" => Some(AmountUnit::Gram),
            "kilogram" | "kilograms" | "kg" => Some(AmountUnit::Kilogram),
            "milliliter" | "milliliters" | "millilitre" | "ml" => Some(AmountUnit::Milliliter),
            "liter" | "liters" | "litre" | "litres" | "l" => Some(AmountUnit::Liter),
            _ => None,
        }
    }
}

impl fmt::Display for AmountUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Dose units
// ============================================================================

/// Denominator of a dose rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoseBasis {
    /// Amount per unit of field area
    PerArea(AreaUnit),
    /// Amount per liter of spray water
    PerLiter,
}

/// Semantic kind of a rate: scaled by field area, or a fixed concentration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RateKind {
    PerArea,
    Concentration,
}

/// Compound dose unit such as `gram-per-acre` or `milliliter-per-liter`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DoseUnit {
    pub amount: AmountUnit,
    pub basis: DoseBasis,
}

impl DoseUnit {
    pub const fn new(amount: AmountUnit, basis: DoseBasis) -> Self {
        Self { amount, basis }
    }

    pub const fn per_area(amount: AmountUnit, area: AreaUnit) -> Self {
        Self::new(amount, DoseBasis::PerArea(area))
    }

    pub const fn per_liter(amount: AmountUnit) -> Self {
        Self::new(amount, DoseBasis::PerLiter)
    }

    /// Every recognized dose unit, per-area units first
    pub fn all() -> Vec<DoseUnit> {
        let bases = [
            DoseBasis::PerArea(AreaUnit::Acres),
            DoseBasis::PerArea(AreaUnit::Hectares),
            DoseBasis::PerLiter,
        ];
        bases
            .iter()
            .flat_map(|basis| AmountUnit::ALL.iter().map(|amount| DoseUnit::new(*amount, *basis)))
            .collect()
    }

    pub fn kind(&self) -> RateKind {
        match self.basis {
            DoseBasis::PerArea(_) => RateKind::PerArea,
            DoseBasis::PerLiter => RateKind::Concentration,
        }
    }

    pub fn area_unit(&self) -> Option<AreaUnit> {
        match self.basis {
            DoseBasis::PerArea(area) => Some(area),
            DoseBasis::PerLiter => None,
        }
    }

    /// Human-readable name, e.g. "grams per acre" / "ग्राम प्रति एकड़"
    pub fn display_name(&self, language: Language) -> String {
        let basis = match self.basis {
            DoseBasis::PerArea(area) => area.per_label(),
            DoseBasis::PerLiter => LocalizedText::new("liter", "लीटर"),
        };
        match language {
            Language::English => format!("{} per {}", self.amount.label().en, basis.en),
            Language::Hindi => format!("{} प्रति {}", self.amount.label().hi, basis.hi),
        }
    }
}

impl fmt::Display for DoseUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let basis = match self.basis {
            DoseBasis::PerArea(area) => area.singular(),
            DoseBasis::PerLiter => "liter",
        };
        write!(f, "{}-per-{}", self.amount, basis)
    }
}

impl FromStr for DoseUnit {
    type Err = UnitError;

    /// Accepts the canonical `gram-per-acre` form as well as the legacy
    /// `grams/acre`, `kg/acre`, `ml/liter` spellings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let (amount, basis) = normalized
            .split_once("-per-")
            .or_else(|| normalized.split_once(" per "))
            .or_else(|| normalized.split_once('/'))
            .ok_or_else(|| UnitError::Unknown(s.to_string()))?;

        let amount = AmountUnit::parse_token(amount.trim())
            .ok_or_else(|| UnitError::Unknown(s.to_string()))?;

        let basis = match basis.trim() {
            "liter" | "liters" | "litre" | "l" => DoseBasis::PerLiter,
            other => DoseBasis::PerArea(
                other
                    .parse::<AreaUnit>()
                    .map_err(|_| UnitError::Unknown(s.to_string()))?,
            ),
        };

        Ok(DoseUnit::new(amount, basis))
    }
}

impl Serialize for DoseUnit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DoseUnit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Conversions
// ============================================================================

/// Convert an area between units.
///
/// Saturates at `Decimal::MAX` instead of overflowing; callers bound their
/// inputs well below that.
pub fn convert_area(value: Decimal, from: AreaUnit, to: AreaUnit) -> Decimal {
    match (from, to) {
        (AreaUnit::Hectares, AreaUnit::Acres) => value.saturating_mul(ACRES_PER_HECTARE),
        (AreaUnit::Acres, AreaUnit::Hectares) => value / ACRES_PER_HECTARE,
        _ => value,
    }
}

/// Convert a plain amount (grams, liters, ...) within its family
pub fn convert_amount(value: Decimal, from: AmountUnit, to: AmountUnit) -> Result<Decimal, UnitError> {
    if from.family() != to.family() {
        return Err(UnitError::Unsupported {
            from: from.to_string(),
            to: to.to_string(),
        });
    }
    value
        .checked_mul(from.base_factor())
        .and_then(|base| base.checked_div(to.base_factor()))
        .ok_or(UnitError::Overflow)
}

/// Re-express a dose rate in another dose unit of the same kind.
///
/// Both the numerator and the area denominator are rescaled, so
/// 10 gram-per-acre becomes 24.710538 gram-per-hectare.
pub fn convert_dose_basis(rate: Decimal, from: DoseUnit, to: DoseUnit) -> Result<Decimal, UnitError> {
    let unsupported = || UnitError::Unsupported {
        from: from.to_string(),
        to: to.to_string(),
    };

    if from.kind() != to.kind() || from.amount.family() != to.amount.family() {
        return Err(unsupported());
    }

    let amount = convert_amount(rate, from.amount, to.amount)?;

    match (from.basis, to.basis) {
        (DoseBasis::PerArea(from_area), DoseBasis::PerArea(to_area)) => {
            // One target area unit expressed in the source area unit
            let scale = convert_area(Decimal::ONE, to_area, from_area);
            amount.checked_mul(scale).ok_or(UnitError::Overflow)
        }
        (DoseBasis::PerLiter, DoseBasis::PerLiter) => Ok(amount),
        _ => Err(unsupported()),
    }
}

/// Scale a reference rate to a field and express it in `desired`.
///
/// Per-area rates are multiplied by the field area, normalized into the
/// rate's own area basis, so the result is the total amount for the field.
/// Concentration rates ignore the area and are only re-expressed.
pub fn scale_dose(
    rate: Decimal,
    reference: DoseUnit,
    area: Decimal,
    area_unit: AreaUnit,
    desired: DoseUnit,
) -> Result<Decimal, UnitError> {
    let unsupported = || UnitError::Unsupported {
        from: reference.to_string(),
        to: desired.to_string(),
    };

    if reference.kind() != desired.kind() {
        return Err(unsupported());
    }

    match reference.basis {
        DoseBasis::PerArea(reference_area) => {
            let normalized = convert_area(area, area_unit, reference_area);
            let amount = rate.checked_mul(normalized).ok_or(UnitError::Overflow)?;
            convert_amount(amount, reference.amount, desired.amount).map_err(|err| match err {
                UnitError::Unsupported { .. } => unsupported(),
                other => other,
            })
        }
        DoseBasis::PerLiter => convert_dose_basis(rate, reference, desired),
    }
}
