//! Reference catalog models
//!
//! English names are the keys for every join. Hindi names are display-only.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Language;
use crate::units::DoseUnit;

/// A cultivated crop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Crop {
    pub name_en: String,
    pub name_hi: String,
}

/// A pest or disease, scoped to one crop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PestDisease {
    pub name_en: String,
    pub name_hi: String,
    pub crop_en: String,
}

/// A recommended chemical
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chemical {
    pub name_en: String,
    pub name_hi: String,
}

impl Chemical {
    pub fn display_name(&self, language: Language) -> &str {
        match language {
            Language::English => &self.name_en,
            Language::Hindi => &self.name_hi,
        }
    }
}

/// Chemical and reference dosage rate for a crop / pest-disease pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub crop_en: String,
    pub pest_disease_en: String,
    pub chemical_en: String,
    /// Rate as authored, in `reference_rate_unit`
    pub reference_rate: Decimal,
    pub reference_rate_unit: DoseUnit,
    #[serde(default)]
    pub source: Option<String>,
}

/// The full reference dataset as supplied by the external data source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDataset {
    pub crops: Vec<Crop>,
    pub pests_diseases: Vec<PestDisease>,
    pub chemicals: Vec<Chemical>,
    pub recommendations: Vec<Recommendation>,
}

/// Bilingual name pair as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name_en: String,
    pub name_hi: String,
}

impl From<&Crop> for CatalogEntry {
    fn from(crop: &Crop) -> Self {
        Self {
            name_en: crop.name_en.clone(),
            name_hi: crop.name_hi.clone(),
        }
    }
}

impl From<&PestDisease> for CatalogEntry {
    fn from(pest: &PestDisease) -> Self {
        Self {
            name_en: pest.name_en.clone(),
            name_hi: pest.name_hi.clone(),
        }
    }
}
