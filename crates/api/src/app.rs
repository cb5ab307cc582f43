// Router assembly
// Decision: Every store is created here and shared through per-module states

use axum::http::{header, HeaderValue, Method};
use axum::{routing::get, Json, Router};
use bookstore_core::{AccountStore, Catalog, ReviewStore};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api;
use crate::auth::{self, AuthConfig, AuthState};
use crate::openapi::ApiDoc;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the full application router over a catalog
pub fn build_router(
    catalog: Catalog,
    auth_config: AuthConfig,
    cors_origins: Vec<HeaderValue>,
) -> Router {
    let accounts = Arc::new(AccountStore::new());
    let reviews = Arc::new(ReviewStore::new(Arc::new(catalog)));
    let auth_state = AuthState::new(auth_config, accounts);

    let books_state = api::books::AppState::new(reviews.clone());
    let reviews_state = api::reviews::AppState::new(reviews, auth_state.clone());

    let app = Router::new()
        .route("/health", get(health))
        .merge(api::books::routes(books_state))
        .merge(api::reviews::routes(reviews_state))
        .merge(auth::routes(auth_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    let app = if cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
        app
    } else {
        tracing::info!(origins = ?cors_origins, "CORS origins configured");
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN])
                .allow_credentials(true),
        )
    };

    app.layer(TraceLayer::new_for_http())
}
