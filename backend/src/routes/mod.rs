//! Route definitions for the Pesticide Dose Calculator

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes.
///
/// Paths are served at the root because the presentation client calls them
/// directly (`/get_crops`, `/get_pests_diseases`, `/calculate`).
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Catalog listings
        .route("/get_crops", get(handlers::get_crops))
        .route("/get_pests_diseases", get(handlers::get_pests_diseases))
        .route("/get_units", get(handlers::get_units))
        // Calculation
        .route("/calculate", post(handlers::calculate))
}
