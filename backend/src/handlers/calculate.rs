//! HTTP handler for dose calculation

use axum::{body::Bytes, extract::State, Json};
use shared::models::CalculationResult;

use crate::AppState;

/// Calculate a dose.
///
/// The body is taken as raw bytes so that malformed JSON still produces a
/// `CalculationResult` with `error` set instead of an extractor rejection.
pub async fn calculate(State(state): State<AppState>, body: Bytes) -> Json<CalculationResult> {
    Json(state.query.calculate(&body))
}
