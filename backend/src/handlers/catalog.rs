//! HTTP handlers for catalog listings

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use shared::models::{CatalogEntry, SupportedUnits};

use crate::AppState;

/// List all crops
pub async fn get_crops(State(state): State<AppState>) -> Json<Vec<CatalogEntry>> {
    Json(state.query.get_crops())
}

/// Query parameters for pests/diseases
#[derive(Debug, Deserialize)]
pub struct PestsDiseasesQuery {
    pub crop_en: Option<String>,
}

/// List the pests/diseases of a crop; an unknown or missing crop yields `[]`
pub async fn get_pests_diseases(
    State(state): State<AppState>,
    Query(query): Query<PestsDiseasesQuery>,
) -> Json<Vec<CatalogEntry>> {
    let pests = query
        .crop_en
        .as_deref()
        .map(|crop| state.query.get_pests_diseases(crop))
        .unwrap_or_default();
    Json(pests)
}

/// List supported area and output units
pub async fn get_units(State(state): State<AppState>) -> Json<SupportedUnits> {
    Json(state.query.get_units())
}
