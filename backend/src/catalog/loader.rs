//! One-shot catalog loading from a JSON file or a PostgreSQL database

use std::path::Path;
use std::time::Duration;

use rust_decimal::Decimal;
use shared::models::{CatalogDataset, Chemical, Crop, PestDisease, Recommendation};
use shared::DoseUnit;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::RecommendationStore;
use crate::config::{CatalogSource, Config, DatabaseConfig};
use crate::error::{AppError, AppResult};

/// Load and validate the catalog selected by the configuration
pub async fn load_catalog(config: &Config) -> AppResult<RecommendationStore> {
    let dataset = match config.catalog.source {
        CatalogSource::File => {
            tracing::info!("Loading catalog from {}", config.catalog.path.display());
            load_from_file(&config.catalog.path).await?
        }
        CatalogSource::Database => {
            let database = config.database.as_ref().ok_or_else(|| {
                AppError::Configuration(
                    "catalog.source is 'database' but no [database] section is configured".into(),
                )
            })?;
            tracing::info!("Loading catalog from database");
            load_from_database(database).await?
        }
    };

    RecommendationStore::from_dataset(dataset)
}

/// Read a JSON dataset from disk
pub async fn load_from_file(path: &Path) -> AppResult<CatalogDataset> {
    let bytes = tokio::fs::read(path).await.map_err(|source| AppError::CatalogIo {
        path: path.display().to_string(),
        source,
    })?;
    parse_dataset(&bytes)
}

/// Parse a JSON dataset
pub fn parse_dataset(bytes: &[u8]) -> AppResult<CatalogDataset> {
    Ok(serde_json::from_slice(bytes)?)
}

#[derive(Debug, sqlx::FromRow)]
struct NameRow {
    name_en: String,
    name_hi: String,
}

#[derive(Debug, sqlx::FromRow)]
struct RecommendationRow {
    crop_en: String,
    pest_disease_en: String,
    pest_disease_hi: String,
    chemical_en: String,
    recommended_dose: Decimal,
    unit: String,
    source: Option<String>,
}

/// Read the relational catalog (crops, pests_diseases, chemicals, recommendations)
pub async fn load_from_database(database: &DatabaseConfig) -> AppResult<CatalogDataset> {
    let pool = PgPoolOptions::new()
        .max_connections(database.max_connections)
        .min_connections(database.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&database.url)
        .await?;

    let dataset = fetch_dataset(&pool).await;
    pool.close().await;
    dataset
}

async fn fetch_dataset(pool: &PgPool) -> AppResult<CatalogDataset> {
    let crops = sqlx::query_as::<_, NameRow>(
        r#"
        SELECT crop_name_en AS name_en, crop_name_hi AS name_hi
        FROM crops
        ORDER BY crop_id
        "#,
    )
    .fetch_all(pool)
    .await?;

    let chemicals = sqlx::query_as::<_, NameRow>(
        r#"
        SELECT chemical_name_en AS name_en, chemical_name_hi AS name_hi
        FROM chemicals
        ORDER BY chemical_id
        "#,
    )
    .fetch_all(pool)
    .await?;

    let rows = sqlx::query_as::<_, RecommendationRow>(
        r#"
        SELECT
            c.crop_name_en AS crop_en,
            pd.pest_disease_name_en AS pest_disease_en,
            pd.pest_disease_name_hi AS pest_disease_hi,
            ch.chemical_name_en AS chemical_en,
            r.recommended_dose,
            r.unit,
            r.source
        FROM recommendations r
        JOIN crops c ON r.crop_id = c.crop_id
        JOIN pests_diseases pd ON r.pest_disease_id = pd.pest_disease_id
        JOIN chemicals ch ON r.chemical_id = ch.chemical_id
        ORDER BY r.recommendation_id
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut dataset = CatalogDataset {
        crops: crops
            .into_iter()
            .map(|row| Crop {
                name_en: row.name_en,
                name_hi: row.name_hi,
            })
            .collect(),
        chemicals: chemicals
            .into_iter()
            .map(|row| Chemical {
                name_en: row.name_en,
                name_hi: row.name_hi,
            })
            .collect(),
        ..CatalogDataset::default()
    };

    for row in rows {
        let unit: DoseUnit = row.unit.parse().map_err(|e| {
            AppError::InvalidCatalog(format!(
                "recommendation for ('{}', '{}'): {}",
                row.crop_en, row.pest_disease_en, e
            ))
        })?;

        // Pests are scoped to a crop by the recommendations that mention them
        let already_listed = dataset
            .pests_diseases
            .iter()
            .any(|p| p.crop_en == row.crop_en && p.name_en == row.pest_disease_en);
        if !already_listed {
            dataset.pests_diseases.push(PestDisease {
                name_en: row.pest_disease_en.clone(),
                name_hi: row.pest_disease_hi,
                crop_en: row.crop_en.clone(),
            });
        }

        dataset.recommendations.push(Recommendation {
            crop_en: row.crop_en,
            pest_disease_en: row.pest_disease_en,
            chemical_en: row.chemical_en,
            reference_rate: row.recommended_dose,
            reference_rate_unit: unit,
            source: row.source,
        });
    }

    tracing::debug!(
        "Fetched {} crops, {} chemicals, {} recommendations",
        dataset.crops.len(),
        dataset.chemicals.len(),
        dataset.recommendations.len()
    );

    Ok(dataset)
}
