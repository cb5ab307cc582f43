// OpenAPI specification
//
// Served by the API server at /api-doc/openapi.json with Swagger UI at /swagger-ui.

use crate::api;
use crate::auth;
use bookstore_core::{BookEntry, BookRecord};
use utoipa::OpenApi;

/// OpenAPI documentation for the Bookstore API
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::routes::register,
        auth::routes::login,
        api::books::list_books,
        api::books::get_book,
        api::books::books_by_author,
        api::books::books_by_title,
        api::reviews::list_reviews,
        api::reviews::upsert_review,
        api::reviews::delete_review,
    ),
    components(
        schemas(
            BookEntry, BookRecord,
            api::ErrorResponse,
            api::books::BooksByAuthorResponse, api::books::BooksByTitleResponse,
            api::reviews::ReviewRequest, api::reviews::BookReviewsResponse,
            api::reviews::ReviewUpsertResponse, api::reviews::ReviewDeleteResponse,
            auth::routes::RegisterRequest, auth::routes::LoginRequest,
            auth::routes::AccountResponse,
        )
    ),
    tags(
        (name = "auth", description = "Account registration and session login"),
        (name = "books", description = "Catalog lookup endpoints"),
        (name = "reviews", description = "Book review endpoints")
    ),
    info(
        title = "Bookstore API",
        version = "0.1.0",
        description = "Online bookstore catalog with per-user reviews",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;
