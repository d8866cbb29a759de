//! Dose calculation service
//!
//! Resolves a crop / pest-disease pair to its recommendation and scales the
//! reference rate to the requested field area and output unit.

use std::sync::Arc;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use shared::i18n::MessageKey;
use shared::models::{CalculationRequest, CalculationResult};
use shared::units::{self, AreaUnit, DoseUnit};
use shared::validation;

use crate::catalog::RecommendationStore;
use crate::error::CalculationError;

/// A successful calculation before rounding for display
#[derive(Debug, Clone, PartialEq)]
pub struct DoseOutcome {
    pub chemical: String,
    pub dose: Decimal,
    pub unit: DoseUnit,
    pub source: Option<String>,
}

/// Dose calculator over a shared, immutable catalog
#[derive(Clone)]
pub struct DoseCalculator {
    store: Arc<RecommendationStore>,
    display_precision: u32,
}

impl DoseCalculator {
    /// Create a new DoseCalculator instance
    pub fn new(store: Arc<RecommendationStore>, display_precision: u32) -> Self {
        Self {
            store,
            display_precision,
        }
    }

    /// Compute a dose. Failures are reported in the result, never raised.
    pub fn compute(&self, request: &CalculationRequest) -> CalculationResult {
        match self.try_compute(request) {
            Ok(outcome) => match display_dose(outcome.dose, self.display_precision) {
                Some(dose) => {
                    tracing::debug!(
                        crop = %request.crop_en,
                        pest_disease = %request.pest_disease_en,
                        "Calculated {} {}",
                        dose,
                        outcome.unit
                    );
                    CalculationResult::success(
                        outcome.chemical,
                        dose,
                        outcome.unit.to_string(),
                        outcome.source,
                    )
                }
                None => self.fail(request, CalculationError::DoseOutOfRange),
            },
            Err(err) => self.fail(request, err),
        }
    }

    fn fail(&self, request: &CalculationRequest, err: CalculationError) -> CalculationResult {
        tracing::warn!(
            crop = %request.crop_en,
            pest_disease = %request.pest_disease_en,
            kind = ?err.kind(),
            "Calculation failed: {}",
            err
        );
        CalculationResult::failure(err.message(request.language))
    }

    /// Compute a dose at full precision
    pub fn try_compute(&self, request: &CalculationRequest) -> Result<DoseOutcome, CalculationError> {
        // 1. Validate
        validation::validate_key(&request.crop_en)
            .map_err(|_| CalculationError::MissingField("crop_en"))?;
        validation::validate_key(&request.pest_disease_en)
            .map_err(|_| CalculationError::MissingField("pest_disease_en"))?;
        let area = validation::area_to_decimal(request.area).map_err(CalculationError::InvalidArea)?;

        let area_unit: AreaUnit =
            request
                .area_unit
                .parse()
                .map_err(|_| CalculationError::UnknownUnit {
                    field: "area_unit",
                    value: request.area_unit.clone(),
                })?;
        let desired_unit: DoseUnit =
            request
                .desired_output_unit
                .parse()
                .map_err(|_| CalculationError::UnknownUnit {
                    field: "desired_output_unit",
                    value: request.desired_output_unit.clone(),
                })?;

        // 2. Lookup
        let resolved = self
            .store
            .lookup(&request.crop_en, &request.pest_disease_en)
            .ok_or_else(|| CalculationError::NotFound {
                crop: request.crop_en.clone(),
                pest_disease: request.pest_disease_en.clone(),
            })?;
        let recommendation = resolved.recommendation;
        let reference_unit = recommendation.reference_rate_unit;

        // 3-5. Normalize, scale and convert
        let dose = units::scale_dose(
            recommendation.reference_rate,
            reference_unit,
            area,
            area_unit,
            desired_unit,
        )?;
        // The field is so small that the dose vanished in decimal arithmetic
        if dose.is_zero() {
            return Err(CalculationError::InvalidArea(MessageKey::AreaTooSmall));
        }

        Ok(DoseOutcome {
            chemical: resolved.chemical.display_name(request.language).to_string(),
            dose,
            unit: desired_unit,
            source: recommendation.source.clone(),
        })
    }
}

/// Round a dose for display.
///
/// A positive dose too small to survive rounding is kept at full precision
/// so that it never reads as zero.
pub fn display_dose(dose: Decimal, precision: u32) -> Option<f64> {
    let rounded = dose.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    let shown = if rounded.is_zero() { dose.normalize() } else { rounded };
    shown.to_f64()
}
