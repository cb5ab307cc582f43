// HTTP API routes
//
// Each submodule handles one resource with its own AppState.

pub mod books;
pub mod common;
pub mod reviews;

pub use common::{ApiError, ErrorResponse};
