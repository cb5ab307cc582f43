// Bookstore API server

use anyhow::{Context, Result};
use bookstore_api::{auth::AuthConfig, build_router, ServerConfig};
use bookstore_core::telemetry::{init_telemetry, TelemetryConfig};
use bookstore_core::Catalog;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    // RUST_LOG overrides the default filter, LOG_FORMAT=json switches to JSON lines
    let mut telemetry_config = TelemetryConfig::from_env();
    if telemetry_config.log_filter.is_none() {
        telemetry_config.log_filter =
            Some("bookstore_api=debug,bookstore_core=info,tower_http=debug".to_string());
    }
    telemetry_config.service_version = Some(env!("CARGO_PKG_VERSION").to_string());
    init_telemetry(telemetry_config);

    tracing::info!("bookstore-api starting...");

    let server_config = ServerConfig::from_env().context("Invalid server configuration")?;

    let catalog = match &server_config.catalog_path {
        Some(path) => Catalog::from_json_file(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
        None => Catalog::seed(),
    };
    tracing::info!(books = catalog.len(), "Catalog loaded");

    let auth_config = AuthConfig::from_env();
    tracing::info!(
        session_cookie = %auth_config.session_cookie,
        credential_lifetime_secs = auth_config.jwt.credential_lifetime.as_secs(),
        "Authentication configured"
    );

    let app = build_router(
        catalog,
        auth_config,
        server_config.cors_allowed_origins.clone(),
    );

    let listener = tokio::net::TcpListener::bind(server_config.bind_addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("HTTP server listening on {}", server_config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
