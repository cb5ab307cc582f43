// Bookstore API library
// Decision: Router construction lives in the library so integration tests drive it in-process

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod openapi;

pub use app::build_router;
pub use config::ServerConfig;
