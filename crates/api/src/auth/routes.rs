// Registration and login routes
// Decision: Login answers with a session cookie only; the credential is never sent to the client
// Decision: /customer/login kept as an alias for existing clients

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use bookstore_core::BookstoreError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::middleware::AuthState;
use crate::api::common::{ApiError, ErrorResponse};

/// Register request
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// At least 3 characters: letters, digits and underscores only.
    #[serde(default)]
    #[schema(example = "jane_doe")]
    pub username: String,
    #[serde(default)]
    #[schema(example = "secret")]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[schema(example = "jane_doe")]
    pub username: String,
    #[serde(default)]
    #[schema(example = "secret")]
    pub password: String,
}

/// Response to a successful registration or login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    pub message: String,
    pub username: String,
}

/// Create auth routes
pub fn routes(state: AuthState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/customer/login", post(login))
        .with_state(state)
}

fn require_credentials(username: &str, password: &str) -> Result<(), ApiError> {
    if username.is_empty() || password.is_empty() {
        return Err(BookstoreError::MissingCredentials.into());
    }
    Ok(())
}

/// POST /register - Create an account
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AccountResponse),
        (status = 400, description = "Missing fields or invalid username", body = ErrorResponse),
        (status = 409, description = "Username already exists", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AuthState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AccountResponse>), ApiError> {
    let Json(req) = body?;
    require_credentials(&req.username, &req.password)?;

    state.gate.register(&req.username, &req.password)?;

    Ok((
        StatusCode::CREATED,
        Json(AccountResponse {
            message: "User registered successfully. You can now login.".to_string(),
            username: req.username,
        }),
    ))
}

/// POST /login - Log in and bind a credential to the session cookie
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, session cookie set", body = AccountResponse),
        (status = 400, description = "Missing fields", body = ErrorResponse),
        (status = 401, description = "Invalid username or password", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AuthState>,
    jar: CookieJar,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<AccountResponse>), ApiError> {
    let Json(req) = body?;
    require_credentials(&req.username, &req.password)?;

    let presented = state.session_id(&jar);
    let login = state
        .gate
        .login(presented.as_deref(), &req.username, &req.password)?;

    let session_cookie = Cookie::build((state.config.session_cookie.clone(), login.session_id))
        .path("/")
        .http_only(true)
        .secure(state.config.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(
            state.gate.jwt_service().credential_lifetime_secs(),
        ))
        .build();

    Ok((
        jar.add(session_cookie),
        Json(AccountResponse {
            message: "Login successful".to_string(),
            username: req.username,
        }),
    ))
}
