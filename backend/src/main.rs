//! Pesticide Dose Calculator - Backend Server

use std::net::SocketAddr;

use pesticide_dose_backend::{catalog::loader, create_app, AppState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "dose_server=debug,pesticide_dose_backend=debug,tower_http=debug,sqlx=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Pesticide Dose Calculator Server");
    tracing::info!("Environment: {}", config.environment);

    // The catalog must load before any request is accepted
    let store = loader::load_catalog(&config).await?;
    let summary = store.summary();
    tracing::info!(
        "Catalog loaded: {} crops, {} pests/diseases, {} chemicals, {} recommendations",
        summary.crops,
        summary.pests_diseases,
        summary.chemicals,
        summary.recommendations
    );

    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::from((host, config.server.port));

    // Create application state
    let state = AppState::new(store, config);

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
