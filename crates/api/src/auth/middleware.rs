// Authentication extractor
// Decision: The session id travels in a cookie; the credential never leaves the server
// Decision: Routes opt in by taking an AuthUser argument

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::CookieJar;
use bookstore_core::{AccountStore, Identity};
use std::sync::Arc;

use super::{config::AuthConfig, gate::IdentityGate, jwt::JwtService};
use crate::api::common::ApiError;

/// Auth state shared across routes
#[derive(Clone)]
pub struct AuthState {
    pub config: AuthConfig,
    pub gate: Arc<IdentityGate>,
}

impl AuthState {
    pub fn new(config: AuthConfig, accounts: Arc<AccountStore>) -> Self {
        let jwt_service = JwtService::new(config.jwt.clone());
        Self {
            gate: Arc::new(IdentityGate::new(accounts, jwt_service)),
            config,
        }
    }

    /// Session id presented by the client, if any
    pub fn session_id(&self, jar: &CookieJar) -> Option<String> {
        jar.get(&self.config.session_cookie)
            .map(|cookie| cookie.value().to_string())
            .filter(|id| !id.is_empty())
    }
}

/// Authenticated user extracted from the request's session
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl AuthUser {
    pub fn identity(&self) -> &Identity {
        &self.0
    }

    pub fn username(&self) -> &str {
        self.0.username()
    }
}

/// Extractor for authenticated user
/// Returns 401 when the session has no valid credential
#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);
        let session_id = auth_state.session_id(&jar);

        let identity = auth_state.gate.authorize(session_id.as_deref()).map_err(|e| {
            tracing::debug!(path = %parts.uri.path(), error = %e, "Request not authorized");
            ApiError(e)
        })?;

        Ok(AuthUser(identity))
    }
}
