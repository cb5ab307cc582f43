// Authentication configuration loaded from environment variables.
// Decision: AUTH_ prefix for all auth config
// Decision: Without AUTH_JWT_SECRET a random per-process secret is used, so
// credentials do not survive a restart (neither does any other state)

use std::time::Duration;

/// Default credential lifetime: one hour.
pub const DEFAULT_CREDENTIAL_LIFETIME: Duration = Duration::from_secs(60 * 60);

/// Longest accepted credential lifetime: one year.
pub const MAX_CREDENTIAL_LIFETIME: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Default name of the session cookie.
pub const DEFAULT_SESSION_COOKIE: &str = "session_id";

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing credentials
    pub secret: String,
    /// How long a credential stays valid after login
    pub credential_lifetime: Duration,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: generate_secret(),
            credential_lifetime: DEFAULT_CREDENTIAL_LIFETIME,
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,
    /// Name of the cookie carrying the session identifier
    pub session_cookie: String,
    /// Whether the session cookie is marked `Secure` (HTTPS only)
    pub cookie_secure: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
            cookie_secure: false,
        }
    }
}

impl AuthConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let secret = std::env::var("AUTH_JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| {
                tracing::warn!(
                    "AUTH_JWT_SECRET not set, using a random secret for this process"
                );
                generate_secret()
            });

        let credential_lifetime = match std::env::var("AUTH_CREDENTIAL_LIFETIME") {
            Ok(value) => parse_credential_lifetime(&value).unwrap_or_else(|| {
                tracing::warn!(
                    value = %value,
                    max_secs = MAX_CREDENTIAL_LIFETIME.as_secs(),
                    "AUTH_CREDENTIAL_LIFETIME invalid or out of range, using default"
                );
                DEFAULT_CREDENTIAL_LIFETIME
            }),
            Err(_) => DEFAULT_CREDENTIAL_LIFETIME,
        };

        let session_cookie = std::env::var("AUTH_SESSION_COOKIE")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SESSION_COOKIE.to_string());

        let cookie_secure = std::env::var("AUTH_COOKIE_SECURE")
            .map(|s| s.to_lowercase() == "true" || s == "1")
            .unwrap_or(false);

        Self {
            jwt: JwtConfig {
                secret,
                credential_lifetime,
            },
            session_cookie,
            cookie_secure,
        }
    }

    /// Configuration with a fixed secret, for tests and embedding.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt: JwtConfig {
                secret: secret.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

/// Parse a lifetime in seconds, accepting at most [`MAX_CREDENTIAL_LIFETIME`]
pub fn parse_credential_lifetime(value: &str) -> Option<Duration> {
    value
        .trim()
        .parse()
        .ok()
        .map(Duration::from_secs)
        .filter(|lifetime| *lifetime <= MAX_CREDENTIAL_LIFETIME)
}

/// Generate a random 256-bit secret (64 hex characters)
fn generate_secret() -> String {
    use rand::Rng;
    let bytes: [u8; 32] = rand::thread_rng().gen();
    hex::encode(bytes)
}
