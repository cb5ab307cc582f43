// Identity gate: registration, login and authorization of sessions
//
// Session lifecycle: Anonymous -> (login) -> Authenticated(credential)
// -> (credential expiry | restart) -> Anonymous. There is no logout.

use bookstore_core::{AccountStore, BookstoreError, Identity, Result};
use chrono::Duration;
use std::sync::Arc;

use super::jwt::{CredentialRejection, JwtService, SessionCredential};
use super::session::{generate_session_id, SessionStore};

/// Outcome of a successful login
#[derive(Debug, Clone)]
pub struct LoginSession {
    /// Session the credential is bound to (new or reused)
    pub session_id: String,
    /// The credential that was issued
    pub credential: SessionCredential,
}

pub struct IdentityGate {
    accounts: Arc<AccountStore>,
    sessions: SessionStore,
    jwt_service: JwtService,
}

impl IdentityGate {
    pub fn new(accounts: Arc<AccountStore>, jwt_service: JwtService) -> Self {
        Self {
            accounts,
            sessions: SessionStore::new(),
            jwt_service,
        }
    }

    pub fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    /// Create an account.
    pub fn register(&self, username: &str, password: &str) -> Result<()> {
        self.accounts.register(username, password)?;
        tracing::info!(username = %username, "User registered");
        Ok(())
    }

    /// Check credentials, issue a credential and bind it to a session.
    ///
    /// `session_id` is the id the client presented, if any. It is reused only
    /// when the server already knows it; otherwise a fresh id is minted.
    pub fn login(
        &self,
        session_id: Option<&str>,
        username: &str,
        password: &str,
    ) -> Result<LoginSession> {
        let identity = self.accounts.authenticate(username, password).map_err(|e| {
            tracing::debug!(username = %username, "Login rejected");
            e
        })?;

        let credential = self.jwt_service.issue_credential(&identity)?;

        let pruned = self
            .sessions
            .prune_idle(Duration::seconds(self.jwt_service.credential_lifetime_secs()));
        if pruned > 0 {
            tracing::debug!(pruned, "Pruned idle sessions");
        }

        let session_id = match session_id {
            Some(id) if self.sessions.contains(id) => id.to_string(),
            _ => generate_session_id(),
        };

        self.sessions
            .bind(&session_id, credential.token.clone(), identity.username());

        tracing::info!(username = %identity, "User logged in");

        Ok(LoginSession {
            session_id,
            credential,
        })
    }

    /// Resolve the identity bound to a session.
    pub fn authorize(&self, session_id: Option<&str>) -> Result<Identity> {
        let session_id = session_id.ok_or(BookstoreError::Unauthenticated)?;
        let entry = self
            .sessions
            .touch(session_id)
            .ok_or(BookstoreError::Unauthenticated)?;

        match self.jwt_service.validate_credential(&entry.access_token) {
            Ok(claims) => Ok(Identity::new(claims.sub)),
            Err(CredentialRejection::Expired) => {
                // A concurrent re-login may already have bound a fresh credential
                self.sessions
                    .remove_if(session_id, |current| current.access_token == entry.access_token);
                tracing::debug!(username = %entry.username, "Session credential expired");
                Err(BookstoreError::InvalidOrExpiredCredential)
            }
            Err(CredentialRejection::Invalid(reason)) => {
                tracing::debug!(username = %entry.username, %reason, "Session credential rejected");
                Err(BookstoreError::InvalidOrExpiredCredential)
            }
        }
    }
}
