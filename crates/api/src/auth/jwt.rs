// JWT credential service
// Decision: HS256 (shared secret known only to this process)
// Decision: Zero leeway on expiry so a credential is valid for exactly its lifetime

use anyhow::{Context, Result};
use bookstore_core::Identity;
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use super::config::{JwtConfig, MAX_CREDENTIAL_LIFETIME};

/// Claims carried by a session credential
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CredentialClaims {
    /// Subject (username)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl CredentialClaims {
    pub fn username(&self) -> &str {
        &self.sub
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.iat, 0).single()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

/// A signed credential and the claims it carries
#[derive(Debug, Clone)]
pub struct SessionCredential {
    pub token: String,
    pub claims: CredentialClaims,
}

/// Why a credential was refused
#[derive(Debug, thiserror::Error)]
pub enum CredentialRejection {
    #[error("credential expired")]
    Expired,
    #[error("credential invalid: {0}")]
    Invalid(String),
}

/// JWT service for credential issuance and validation
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    pub fn new(mut config: JwtConfig) -> Self {
        if config.credential_lifetime > MAX_CREDENTIAL_LIFETIME {
            tracing::warn!(
                requested_secs = config.credential_lifetime.as_secs(),
                max_secs = MAX_CREDENTIAL_LIFETIME.as_secs(),
                "Credential lifetime capped"
            );
            config.credential_lifetime = MAX_CREDENTIAL_LIFETIME;
        }

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Issue a credential for an identity, valid from now
    pub fn issue_credential(&self, identity: &Identity) -> Result<SessionCredential> {
        self.issue_credential_at(identity, Utc::now())
    }

    /// Issue a credential as if it had been issued at `issued_at`
    pub fn issue_credential_at(
        &self,
        identity: &Identity,
        issued_at: DateTime<Utc>,
    ) -> Result<SessionCredential> {
        let lifetime = Duration::from_std(self.config.credential_lifetime)
            .context("Credential lifetime out of range")?;
        let exp = issued_at
            .checked_add_signed(lifetime)
            .context("Credential expiry out of range")?;

        let claims = CredentialClaims {
            sub: identity.username().to_string(),
            iat: issued_at.timestamp(),
            exp: exp.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .context("Failed to encode session credential")?;

        Ok(SessionCredential { token, claims })
    }

    /// Verify signature and expiry of a credential
    pub fn validate_credential(
        &self,
        token: &str,
    ) -> std::result::Result<CredentialClaims, CredentialRejection> {
        decode::<CredentialClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => CredentialRejection::Expired,
                _ => CredentialRejection::Invalid(e.to_string()),
            })
    }

    /// Credential lifetime in seconds
    pub fn credential_lifetime_secs(&self) -> i64 {
        i64::try_from(self.config.credential_lifetime.as_secs()).unwrap_or(i64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration as StdDuration;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-for-testing".to_string(),
            credential_lifetime: StdDuration::from_secs(3600),
        }
    }

    #[test]
    fn test_issue_and_validate() {
        let service = JwtService::new(test_config());
        let credential = service.issue_credential(&Identity::new("alice")).unwrap();

        assert!(!credential.token.is_empty());

        let claims = service.validate_credential(&credential.token).unwrap();
        assert_eq!(claims.username(), "alice");
        assert_eq!(claims, credential.claims);
    }

    #[test]
    fn test_validity_window_is_exactly_lifetime() {
        let service = JwtService::new(test_config());
        let credential = service.issue_credential(&Identity::new("alice")).unwrap();
        let claims = credential.claims;

        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(service.credential_lifetime_secs(), 3600);
        assert_eq!(
            claims.expires_at().unwrap() - claims.issued_at().unwrap(),
            Duration::hours(1)
        );
    }

    #[test]
    fn test_expired_credential() {
        let service = JwtService::new(test_config());
        let issued_at = Utc::now() - Duration::hours(1) - Duration::seconds(5);
        let credential = service
            .issue_credential_at(&Identity::new("alice"), issued_at)
            .unwrap();

        let result = service.validate_credential(&credential.token);
        assert!(matches!(result, Err(CredentialRejection::Expired)));
    }

    #[test]
    fn test_credential_just_inside_window() {
        let service = JwtService::new(test_config());
        let issued_at = Utc::now() - Duration::minutes(59);
        let credential = service
            .issue_credential_at(&Identity::new("alice"), issued_at)
            .unwrap();

        assert!(service.validate_credential(&credential.token).is_ok());
    }

    #[test]
    fn test_oversized_lifetime_is_capped() {
        let service = JwtService::new(JwtConfig {
            credential_lifetime: StdDuration::from_secs(9_000_000_000_000),
            ..test_config()
        });
        let max = MAX_CREDENTIAL_LIFETIME.as_secs() as i64;
        assert_eq!(service.credential_lifetime_secs(), max);

        let credential = service.issue_credential(&Identity::new("alice")).unwrap();
        assert_eq!(credential.claims.exp - credential.claims.iat, max);
        assert!(service.validate_credential(&credential.token).is_ok());
    }

    #[test]
    fn test_expiry_overflow_is_an_error() {
        let service = JwtService::new(test_config());
        let result = service.issue_credential_at(&Identity::new("alice"), DateTime::<Utc>::MAX_UTC);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_token() {
        let service = JwtService::new(test_config());
        let result = service.validate_credential("invalid-token");
        assert!(matches!(result, Err(CredentialRejection::Invalid(_))));
    }

    #[test]
    fn test_wrong_secret() {
        let service = JwtService::new(test_config());
        let other = JwtService::new(JwtConfig {
            secret: "a-different-secret".to_string(),
            ..test_config()
        });

        let credential = other.issue_credential(&Identity::new("alice")).unwrap();
        let result = service.validate_credential(&credential.token);
        assert!(matches!(result, Err(CredentialRejection::Invalid(_))));
    }

    #[test]
    fn test_tampered_payload() {
        let service = JwtService::new(test_config());
        let alice = service.issue_credential(&Identity::new("alice")).unwrap();
        let mallory = service.issue_credential(&Identity::new("mallory")).unwrap();

        // Splice mallory's claims under alice's signature
        let alice_parts: Vec<&str> = alice.token.split('.').collect();
        let mallory_parts: Vec<&str> = mallory.token.split('.').collect();
        let forged = format!("{}.{}.{}", alice_parts[0], mallory_parts[1], alice_parts[2]);

        let result = service.validate_credential(&forged);
        assert!(matches!(result, Err(CredentialRejection::Invalid(_))));
    }
}
