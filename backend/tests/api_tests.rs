//! HTTP API tests
//!
//! Exercises the router end to end with `tower::ServiceExt::oneshot`:
//! - JSON field names of every endpoint
//! - Unknown crop returns an empty list with 200
//! - Calculate always answers 200 with a result object

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use pesticide_dose_backend::catalog::{loader, RecommendationStore};
use pesticide_dose_backend::{create_app, AppState, Config};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let dataset = loader::parse_dataset(include_bytes!("../data/catalog.json")).unwrap();
    let store = RecommendationStore::from_dataset(dataset).unwrap();
    create_app(AppState::new(store, Config::default()))
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn get(uri: &str) -> (StatusCode, Value) {
    send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn post_calculate(body: impl Into<Body>) -> (StatusCode, Value) {
    send(
        Request::builder()
            .method(Method::POST)
            .uri("/calculate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap(),
    )
    .await
}

#[tokio::test]
async fn test_get_crops() {
    let (status, body) = get("/get_crops").await;
    assert_eq!(status, StatusCode::OK);
    let crops = body.as_array().unwrap();
    assert_eq!(crops.len(), 5);
    assert_eq!(crops[0], json!({ "name_en": "Rice", "name_hi": "चावल" }));
}

#[tokio::test]
async fn test_get_pests_diseases_for_crop() {
    let (status, body) = get("/get_pests_diseases?crop_en=Rice").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "name_en": "Stem Borer", "name_hi": "तना छेदक" },
            { "name_en": "Blast", "name_hi": "झोंका रोग" }
        ])
    );
}

#[tokio::test]
async fn test_get_pests_diseases_unknown_crop_is_empty() {
    let (status, body) = get("/get_pests_diseases?crop_en=Unknown%20Crop").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = get("/get_pests_diseases").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_calculate_success() {
    let (status, body) = post_calculate(
        json!({
            "crop_en": "Rice",
            "pest_disease_en": "Stem Borer",
            "area": 2,
            "area_unit": "hectares",
            "desired_output_unit": "gram-per-acre",
            "language": "en"
        })
        .to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["chemical"], "Chlorantraniliprole");
    assert_eq!(body["unit"], "gram-per-acre");
    assert_eq!(body["error"], Value::Null);
    let dose = body["calculated_dose"].as_f64().unwrap();
    assert!((dose - 49.42).abs() < 0.01);
}

#[tokio::test]
async fn test_calculate_not_found_shape() {
    let (status, body) = post_calculate(
        json!({
            "crop_en": "Wheat",
            "pest_disease_en": "Stem Borer",
            "area": 1,
            "area_unit": "acres",
            "desired_output_unit": "gram-per-acre",
            "language": "en"
        })
        .to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "chemical": null,
            "calculated_dose": null,
            "unit": null,
            "source": null,
            "error": "No recommendation found for Wheat and Stem Borer"
        })
    );
}

#[tokio::test]
async fn test_calculate_malformed_body_is_not_a_transport_fault() {
    let (status, body) = post_calculate("{ this is not json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], "Malformed request: expected a JSON object");
    assert_eq!(body["calculated_dose"], Value::Null);
}

#[tokio::test]
async fn test_calculate_without_content_type() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/calculate")
        .body(Body::from(
            r#"{"crop_en":"Chilli","pest_disease_en":"Thrips","area":7,
                "area_unit":"acres","desired_output_unit":"milliliter-per-liter"}"#,
        ))
        .unwrap();
    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["calculated_dose"], 2.0);
}

#[tokio::test]
async fn test_get_units() {
    let (status, body) = get("/get_units").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["area_units"][0], json!({ "value": "acres", "name_en": "Acres", "name_hi": "एकड़" }));
    let output = body["output_units"].as_array().unwrap();
    assert_eq!(output.len(), 12);
    assert_eq!(output[0]["value"], "gram-per-acre");
    assert_eq!(output[0]["kind"], "per_area");
    assert!(output
        .iter()
        .any(|u| u["value"] == "milliliter-per-liter" && u["kind"] == "concentration"));
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["environment"], "development");
    assert_eq!(body["crops"], 5);
    assert_eq!(body["pests_diseases"], 8);
    assert_eq!(body["chemicals"], 6);
    assert_eq!(body["recommendations"], 8);
    assert_eq!(body.get("catalog"), None);
}

#[tokio::test]
async fn test_root_banner() {
    let response = app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
