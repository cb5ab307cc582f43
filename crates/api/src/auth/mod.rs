// Authentication module
// Decision: Server-side sessions keyed by a cookie, each holding a signed JWT credential
// Decision: Credential verification is local (HMAC + expiry), no lookup beyond the session

pub mod config;
pub mod gate;
pub mod jwt;
pub mod middleware;
pub mod routes;
pub mod session;

pub use config::AuthConfig;
pub use gate::IdentityGate;
pub use middleware::{AuthState, AuthUser};
pub use routes::routes;
