//! Pesticide Dose Calculator - Backend
//!
//! Recommends an agrochemical for a crop and pest/disease and computes the
//! dose for a field, with messages in English and Hindi.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod catalog;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;

use catalog::RecommendationStore;
use services::QueryService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub query: Arc<QueryService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: RecommendationStore, config: Config) -> Self {
        let query = QueryService::new(Arc::new(store), config.calculation.display_precision);
        Self {
            query: Arc::new(query),
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Pesticide Dose Calculator API v1.0"
}
