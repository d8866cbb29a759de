//! Dose calculation integration tests
//!
//! Tests for the calculate operation including:
//! - Property: every catalog pair yields a finite positive dose
//! - Property: absent pairs yield an error and nothing else
//! - Property: calculate is idempotent
//! - Property: non-positive areas are rejected before lookup
//! - Per-area scaling vs. area-independent concentration rates

use std::sync::Arc;

use pesticide_dose_backend::catalog::{loader, RecommendationStore};
use pesticide_dose_backend::services::QueryService;
use proptest::prelude::*;
use shared::models::{CalculationRequest, CalculationResult, CatalogDataset};
use shared::units::{AmountFamily, AmountUnit, DoseUnit};
use shared::Language;

fn dataset() -> CatalogDataset {
    loader::parse_dataset(include_bytes!("../data/catalog.json")).unwrap()
}

fn service() -> QueryService {
    let store = RecommendationStore::from_dataset(dataset()).unwrap();
    QueryService::new(Arc::new(store), 4)
}

fn request(crop: &str, pest: &str, area: f64, area_unit: &str, output: &str) -> CalculationRequest {
    CalculationRequest {
        crop_en: crop.to_string(),
        pest_disease_en: pest.to_string(),
        area,
        area_unit: area_unit.to_string(),
        desired_output_unit: output.to_string(),
        language: Language::English,
    }
}

fn assert_only_error(result: &CalculationResult) {
    assert!(result.error.is_some());
    assert_eq!(result.chemical, None);
    assert_eq!(result.calculated_dose, None);
    assert_eq!(result.unit, None);
    assert_eq!(result.source, None);
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Rice / Stem Borer at 10 g/acre over 2 hectares
    #[test]
    fn test_rice_stem_borer_in_hectares() {
        let result = service().calculate_request(&request(
            "Rice",
            "Stem Borer",
            2.0,
            "hectares",
            "gram-per-acre",
        ));

        assert_eq!(result.error, None);
        assert_eq!(result.chemical.as_deref(), Some("Chlorantraniliprole"));
        assert_eq!(result.unit.as_deref(), Some("gram-per-acre"));
        assert!(result.source.is_some());
        let dose = result.calculated_dose.unwrap();
        assert!((dose - 49.42).abs() < 0.01, "dose was {}", dose);
        assert!((dose - 49.4211).abs() < 1e-9);
    }

    #[test]
    fn test_per_area_rate_in_acres() {
        let result = service().calculate_request(&request("Wheat", "Rust", 2.0, "acres", "gram-per-acre"));
        assert_eq!(result.calculated_dose, Some(1500.0));
        assert_eq!(result.chemical.as_deref(), Some("Mancozeb"));
    }

    #[test]
    fn test_output_in_kilograms() {
        let svc = service();
        let grams = svc.calculate_request(&request("Wheat", "Rust", 3.0, "acres", "gram-per-acre"));
        let kilos = svc.calculate_request(&request("Wheat", "Rust", 3.0, "acres", "kilogram-per-acre"));
        assert_eq!(grams.calculated_dose, Some(2250.0));
        assert_eq!(kilos.calculated_dose, Some(2.25));
        assert_eq!(kilos.unit.as_deref(), Some("kilogram-per-acre"));
    }

    /// Legacy "liter/acre" rate with no source
    #[test]
    fn test_liter_rate_to_milliliters() {
        let result = service().calculate_request(&request(
            "Cotton",
            "Pink Bollworm",
            4.0,
            "acres",
            "milliliter-per-acre",
        ));
        assert_eq!(result.error, None);
        assert_eq!(result.calculated_dose, Some(2000.0));
        assert_eq!(result.source, None);
    }

    /// 250 ml/hectare over exactly one hectare given in acres
    #[test]
    fn test_hectare_rate_with_area_in_acres() {
        let result = service().calculate_request(&request(
            "Cotton",
            "Whitefly",
            2.4710538,
            "acres",
            "milliliter-per-hectare",
        ));
        assert_eq!(result.calculated_dose, Some(250.0));
    }

    #[test]
    fn test_legacy_output_unit_spelling() {
        let result = service().calculate_request(&request("Wheat", "Rust", 1.0, "acres", "kg/acre"));
        assert_eq!(result.calculated_dose, Some(0.75));
        assert_eq!(result.unit.as_deref(), Some("kilogram-per-acre"));
    }

    /// 2 ml per liter regardless of field size
    #[test]
    fn test_concentration_is_area_independent() {
        let svc = service();
        for (area, unit) in [(0.25, "acres"), (1.0, "hectares"), (500.0, "acres"), (12.5, "hectares")] {
            let result = svc.calculate_request(&request("Chilli", "Thrips", area, unit, "milliliter-per-liter"));
            assert_eq!(result.error, None);
            assert_eq!(result.calculated_dose, Some(2.0));
            assert_eq!(result.chemical.as_deref(), Some("Fipronil"));
        }
    }

    #[test]
    fn test_concentration_unit_conversion() {
        let result = service().calculate_request(&request(
            "Tomato",
            "Early Blight",
            3.0,
            "acres",
            "kilogram-per-liter",
        ));
        assert_eq!(result.calculated_dose, Some(0.0025));
    }

    #[test]
    fn test_concentration_to_per_area_is_unsupported() {
        let result = service().calculate_request(&request(
            "Tomato",
            "Early Blight",
            3.0,
            "acres",
            "gram-per-acre",
        ));
        assert_only_error(&result);
        assert_eq!(
            result.error.as_deref(),
            Some("Unsupported unit conversion from gram-per-liter to gram-per-acre")
        );
    }

    #[test]
    fn test_mass_to_volume_is_unsupported() {
        let result = service().calculate_request(&request("Wheat", "Rust", 1.0, "acres", "milliliter-per-acre"));
        assert_only_error(&result);
        assert_eq!(
            result.error.as_deref(),
            Some("Unsupported unit conversion from gram-per-acre to milliliter-per-acre")
        );
    }

    #[test]
    fn test_not_found() {
        let result = service().calculate_request(&request("Rice", "Rust", 1.0, "acres", "gram-per-acre"));
        assert_only_error(&result);
        assert_eq!(
            result.error.as_deref(),
            Some("No recommendation found for Rice and Rust")
        );
    }

    /// English keys are case-sensitive
    #[test]
    fn test_lookup_is_case_sensitive() {
        let result = service().calculate_request(&request("rice", "stem borer", 1.0, "acres", "gram-per-acre"));
        assert_only_error(&result);
    }

    /// Hindi names are display-only and never match as keys
    #[test]
    fn test_hindi_name_is_not_a_key() {
        let result = service().calculate_request(&request("चावल", "तना छेदक", 1.0, "acres", "gram-per-acre"));
        assert_only_error(&result);
    }

    #[test]
    fn test_hindi_language_localizes_output() {
        let svc = service();
        let mut req = request("Rice", "Stem Borer", 1.0, "acres", "gram-per-acre");
        req.language = Language::Hindi;
        let result = svc.calculate_request(&req);
        assert_eq!(result.chemical.as_deref(), Some("क्लोरेंट्रानिलिप्रोल"));
        assert_eq!(result.calculated_dose, Some(10.0));

        req.pest_disease_en = "Rust".to_string();
        let result = svc.calculate_request(&req);
        assert_eq!(
            result.error.as_deref(),
            Some("Rice और Rust के लिए कोई सिफारिश नहीं मिली")
        );
    }

    #[test]
    fn test_invalid_areas() {
        let svc = service();
        for area in [0.0, -2.0, f64::NAN, f64::INFINITY, 1.0e15] {
            let result = svc.calculate_request(&request("Rice", "Stem Borer", area, "acres", "gram-per-acre"));
            assert_only_error(&result);
        }
        let result = svc.calculate_request(&request("Rice", "Stem Borer", 0.0, "acres", "gram-per-acre"));
        assert_eq!(result.error.as_deref(), Some("Area must be a positive number"));
    }

    #[test]
    fn test_unknown_units() {
        let svc = service();
        let result = svc.calculate_request(&request("Rice", "Stem Borer", 1.0, "bigha", "gram-per-acre"));
        assert_eq!(result.error.as_deref(), Some("Unsupported unit for area_unit: bigha"));

        let result = svc.calculate_request(&request("Rice", "Stem Borer", 1.0, "acres", "ppm"));
        assert_eq!(
            result.error.as_deref(),
            Some("Unsupported unit for desired_output_unit: ppm")
        );
    }

    #[test]
    fn test_empty_keys_are_missing() {
        let result = service().calculate_request(&request("", "Stem Borer", 1.0, "acres", "gram-per-acre"));
        assert_eq!(result.error.as_deref(), Some("Missing required field: crop_en"));
    }

    // ------------------------------------------------------------------------
    // Raw request bodies
    // ------------------------------------------------------------------------

    #[test]
    fn test_raw_body_success() {
        let body = br#"{"crop_en":"Rice","pest_disease_en":"Stem Borer","area":2,
            "area_unit":"hectares","desired_output_unit":"gram-per-acre","language":"en"}"#;
        let result = service().calculate(body);
        assert_eq!(result.error, None);
        assert!((result.calculated_dose.unwrap() - 49.42).abs() < 0.01);
    }

    #[test]
    fn test_raw_body_area_as_numeric_string() {
        let body = br#"{"crop_en":"Wheat","pest_disease_en":"Rust","area":"2",
            "area_unit":"acres","desired_output_unit":"gram-per-acre"}"#;
        assert_eq!(service().calculate(body).calculated_dose, Some(1500.0));
    }

    #[test]
    fn test_raw_body_malformed() {
        let svc = service();
        for body in [&b"not json"[..], &b"[1,2,3]"[..], &b""[..], &b"\"text\""[..]] {
            let result = svc.calculate(body);
            assert_only_error(&result);
            assert_eq!(
                result.error.as_deref(),
                Some("Malformed request: expected a JSON object")
            );
        }
    }

    #[test]
    fn test_raw_body_bad_fields() {
        let svc = service();

        let result = svc.calculate(br#"{"crop_en":"Rice","pest_disease_en":"Stem Borer",
            "area":"lots","area_unit":"acres","desired_output_unit":"gram-per-acre"}"#);
        assert_eq!(result.error.as_deref(), Some("Area must be a number"));

        let result = svc.calculate(br#"{"crop_en":"Rice","pest_disease_en":"Stem Borer",
            "area":1,"desired_output_unit":"gram-per-acre"}"#);
        assert_eq!(result.error.as_deref(), Some("Missing required field: area_unit"));

        let result = svc.calculate(br#"{"crop_en":["Rice"],"pest_disease_en":"Stem Borer",
            "area":1,"area_unit":"acres","desired_output_unit":"gram-per-acre"}"#);
        assert_eq!(result.error.as_deref(), Some("Invalid value for crop_en"));
    }

    #[test]
    fn test_raw_body_errors_follow_language() {
        let result = service().calculate(br#"{"crop_en":"Rice","pest_disease_en":"Stem Borer",
            "area":-1,"area_unit":"acres","desired_output_unit":"gram-per-acre","language":"hi"}"#);
        assert_eq!(
            result.error.as_deref(),
            Some("क्षेत्रफल एक धनात्मक संख्या होनी चाहिए")
        );
    }

    // ------------------------------------------------------------------------
    // Listings
    // ------------------------------------------------------------------------

    #[test]
    fn test_get_crops_in_dataset_order() {
        let crops: Vec<String> = service().get_crops().into_iter().map(|c| c.name_en).collect();
        assert_eq!(crops, vec!["Rice", "Wheat", "Cotton", "Tomato", "Chilli"]);
    }

    #[test]
    fn test_get_pests_diseases_filtered_by_crop() {
        let svc = service();
        let pests: Vec<String> = svc
            .get_pests_diseases("Rice")
            .into_iter()
            .map(|p| p.name_en)
            .collect();
        assert_eq!(pests, vec!["Stem Borer", "Blast"]);
        assert!(svc.get_pests_diseases("Unknown Crop").is_empty());
    }

    #[test]
    fn test_get_units() {
        let units = service().get_units();
        assert_eq!(units.area_units.len(), 2);
        assert_eq!(units.area_units[0].value, "acres");
        assert_eq!(units.area_units[1].name_hi, "हेक्टेयर");
        assert_eq!(units.output_units.len(), 12);
        assert!(units.output_units.iter().any(|u| u.value == "milliliter-per-liter"));
    }

    #[test]
    fn test_tiny_field_dose_is_not_rounded_to_zero() {
        // 10 g/acre over a millionth of an acre is 1e-8 kg
        let result = service().calculate_request(&request(
            "Rice",
            "Stem Borer",
            0.000001,
            "acres",
            "kilogram-per-acre",
        ));
        assert_eq!(result.error, None);
        let dose = result.calculated_dose.unwrap();
        assert!(dose > 0.0);
        assert!((dose - 1.0e-8).abs() < 1.0e-20);
    }

    #[test]
    fn test_vanishing_area_is_rejected() {
        let result = service().calculate_request(&request(
            "Rice",
            "Stem Borer",
            1.0e-40,
            "acres",
            "kilogram-per-acre",
        ));
        assert_only_error(&result);
        assert_eq!(result.error.as_deref(), Some("Area is too small to calculate a dose"));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

fn catalog_pairs() -> Vec<(String, String, String)> {
    dataset()
        .recommendations
        .into_iter()
        .map(|r| (r.crop_en, r.pest_disease_en, r.reference_rate_unit.to_string()))
        .collect()
}

/// Same basis, with the largest amount unit of the rate's family
fn coarsest_unit(unit: &str) -> String {
    let unit: DoseUnit = unit.parse().unwrap();
    let amount = match unit.amount.family() {
        AmountFamily::Mass => AmountUnit::Kilogram,
        AmountFamily::Volume => AmountUnit::Liter,
    };
    DoseUnit::new(amount, unit.basis).to_string()
}

fn area_unit() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("acres"), Just("hectares")]
}

proptest! {
    /// Every recommendation in the catalog yields a finite, positive dose
    #[test]
    fn prop_catalog_pairs_succeed(
        (crop, pest, unit) in prop::sample::select(catalog_pairs()),
        hundredths in 1u32..10_000_000u32,
        area_unit in area_unit(),
    ) {
        let area = f64::from(hundredths) / 100.0;
        let result = service().calculate_request(&request(&crop, &pest, area, area_unit, &unit));
        prop_assert_eq!(&result.error, &None);
        let dose = result.calculated_dose.unwrap();
        prop_assert!(dose.is_finite());
        prop_assert!(dose > 0.0);
    }

    /// Small fields in kilograms or liters still get a positive dose
    #[test]
    fn prop_small_fields_in_coarse_units_succeed(
        (crop, pest, unit) in prop::sample::select(catalog_pairs()),
        millionths in 1u32..10_000u32,
        area_unit in area_unit(),
    ) {
        let area = f64::from(millionths) / 1_000_000.0;
        let output = coarsest_unit(&unit);
        let result = service().calculate_request(&request(&crop, &pest, area, area_unit, &output));
        prop_assert_eq!(&result.error, &None);
        let dose = result.calculated_dose.unwrap();
        prop_assert!(dose.is_finite());
        prop_assert!(dose > 0.0);
    }

    /// Pairs absent from the catalog report only an error
    #[test]
    fn prop_absent_pairs_fail(crop in "[A-Z][a-z]{2,12}", pest in "[A-Z][a-z ]{2,16}") {
        let pairs = catalog_pairs();
        prop_assume!(!pairs.iter().any(|(c, p, _)| c == &crop && p == &pest));
        let result = service().calculate_request(&request(&crop, &pest, 1.0, "acres", "gram-per-acre"));
        assert_only_error(&result);
    }

    /// Identical requests give identical results
    #[test]
    fn prop_calculate_is_idempotent(
        (crop, pest, unit) in prop::sample::select(catalog_pairs()),
        hundredths in 1u32..1_000_000u32,
        area_unit in area_unit(),
    ) {
        let svc = service();
        let req = request(&crop, &pest, f64::from(hundredths) / 100.0, area_unit, &unit);
        prop_assert_eq!(svc.calculate_request(&req), svc.calculate_request(&req));
    }

    /// Non-positive areas fail validation even for valid pairs
    #[test]
    fn prop_non_positive_area_rejected(
        (crop, pest, unit) in prop::sample::select(catalog_pairs()),
        area in -1.0e9f64..=0.0f64,
    ) {
        let result = service().calculate_request(&request(&crop, &pest, area, "acres", &unit));
        assert_only_error(&result);
        prop_assert_eq!(result.error.as_deref(), Some("Area must be a positive number"));
    }
}
