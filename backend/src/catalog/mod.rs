//! Read-only recommendation catalog
//!
//! Built once at startup from a [`CatalogDataset`] and shared across requests
//! behind an `Arc`. Lookups are exact, case-sensitive matches on English names.

pub mod loader;

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::{CatalogDataset, Chemical, Crop, PestDisease, Recommendation};

use crate::error::{AppError, AppResult};

/// A recommendation joined with its chemical
#[derive(Debug, Clone, Copy)]
pub struct ResolvedRecommendation<'a> {
    pub recommendation: &'a Recommendation,
    pub chemical: &'a Chemical,
}

/// Catalog size, for logs and the health endpoint
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct CatalogSummary {
    pub crops: usize,
    pub pests_diseases: usize,
    pub chemicals: usize,
    pub recommendations: usize,
}

/// Immutable bilingual catalog of crops, pests/diseases and recommendations
#[derive(Debug)]
pub struct RecommendationStore {
    crops: Vec<Crop>,
    pests_diseases: Vec<PestDisease>,
    chemicals: HashMap<String, Chemical>,
    recommendations: HashMap<(String, String), Recommendation>,
}

impl RecommendationStore {
    /// Build the store, enforcing referential integrity of the dataset
    pub fn from_dataset(dataset: CatalogDataset) -> AppResult<Self> {
        let CatalogDataset {
            crops,
            pests_diseases,
            chemicals,
            recommendations,
        } = dataset;

        if crops.is_empty() {
            return Err(invalid("catalog has no crops".to_string()));
        }
        if recommendations.is_empty() {
            return Err(invalid("catalog has no recommendations".to_string()));
        }

        let mut crop_names = HashSet::new();
        for crop in &crops {
            if crop.name_en.trim().is_empty() {
                return Err(invalid("crop with an empty English name".to_string()));
            }
            if !crop_names.insert(crop.name_en.as_str()) {
                return Err(invalid(format!("duplicate crop '{}'", crop.name_en)));
            }
        }

        let mut pest_keys = HashSet::new();
        for pest in &pests_diseases {
            if !crop_names.contains(pest.crop_en.as_str()) {
                return Err(invalid(format!(
                    "pest/disease '{}' references unknown crop '{}'",
                    pest.name_en, pest.crop_en
                )));
            }
            if !pest_keys.insert((pest.crop_en.as_str(), pest.name_en.as_str())) {
                return Err(invalid(format!(
                    "duplicate pest/disease '{}' for crop '{}'",
                    pest.name_en, pest.crop_en
                )));
            }
        }

        let mut chemical_map = HashMap::with_capacity(chemicals.len());
        for chemical in chemicals {
            if chemical_map.contains_key(&chemical.name_en) {
                return Err(invalid(format!("duplicate chemical '{}'", chemical.name_en)));
            }
            chemical_map.insert(chemical.name_en.clone(), chemical);
        }

        let mut recommendation_map = HashMap::with_capacity(recommendations.len());
        for rec in recommendations {
            if !pest_keys.contains(&(rec.crop_en.as_str(), rec.pest_disease_en.as_str())) {
                return Err(invalid(format!(
                    "recommendation references unknown pair ('{}', '{}')",
                    rec.crop_en, rec.pest_disease_en
                )));
            }
            if !chemical_map.contains_key(&rec.chemical_en) {
                return Err(invalid(format!(
                    "recommendation for ('{}', '{}') references unknown chemical '{}'",
                    rec.crop_en, rec.pest_disease_en, rec.chemical_en
                )));
            }
            if rec.reference_rate <= Decimal::ZERO {
                return Err(invalid(format!(
                    "recommendation for ('{}', '{}') has non-positive rate {}",
                    rec.crop_en, rec.pest_disease_en, rec.reference_rate
                )));
            }
            let key = (rec.crop_en.clone(), rec.pest_disease_en.clone());
            if recommendation_map.contains_key(&key) {
                return Err(invalid(format!(
                    "more than one recommendation for ('{}', '{}')",
                    rec.crop_en, rec.pest_disease_en
                )));
            }
            recommendation_map.insert(key, rec);
        }

        Ok(Self {
            crops,
            pests_diseases,
            chemicals: chemical_map,
            recommendations: recommendation_map,
        })
    }

    /// All crops in dataset order
    pub fn list_crops(&self) -> &[Crop] {
        &self.crops
    }

    /// Pests/diseases of one crop in dataset order; empty for an unknown crop
    pub fn list_pests_diseases(&self, crop_en: &str) -> Vec<&PestDisease> {
        self.pests_diseases
            .iter()
            .filter(|pest| pest.crop_en == crop_en)
            .collect()
    }

    pub fn lookup(&self, crop_en: &str, pest_disease_en: &str) -> Option<ResolvedRecommendation<'_>> {
        let recommendation = self
            .recommendations
            .get(&(crop_en.to_string(), pest_disease_en.to_string()))?;
        let chemical = self.chemicals.get(&recommendation.chemical_en)?;
        Some(ResolvedRecommendation {
            recommendation,
            chemical,
        })
    }

    pub fn summary(&self) -> CatalogSummary {
        CatalogSummary {
            crops: self.crops.len(),
            pests_diseases: self.pests_diseases.len(),
            chemicals: self.chemicals.len(),
            recommendations: self.recommendations.len(),
        }
    }
}

fn invalid(message: String) -> AppError {
    AppError::InvalidCatalog(message)
}
