// Review routes
// Decision: Reading reviews is public; writing requires a logged-in session
// Decision: /customer/auth/review/{isbn} kept as an alias for existing clients

use axum::{
    extract::{rejection::JsonRejection, FromRef, Path, State},
    routing::{get, put},
    Json, Router,
};
use bookstore_core::{Reviews, ReviewStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::common::{ApiError, ErrorResponse};
use crate::auth::{AuthState, AuthUser};

/// Request to add or replace the caller's review
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewRequest {
    #[serde(default)]
    #[schema(example = "A timeless classic.")]
    pub review: String,
}

/// Reviews of a single book
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookReviewsResponse {
    pub isbn: String,
    pub title: String,
    /// Review text keyed by username
    #[schema(value_type = std::collections::BTreeMap<String, String>)]
    pub reviews: Reviews,
}

/// Response to an added or updated review
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReviewUpsertResponse {
    #[schema(example = "Review added successfully")]
    pub message: String,
    pub isbn: String,
    pub title: String,
    /// The review text as submitted
    pub review: String,
    #[schema(value_type = std::collections::BTreeMap<String, String>)]
    pub reviews: Reviews,
}

/// Response to a deleted review
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReviewDeleteResponse {
    #[schema(example = "Review deleted successfully")]
    pub message: String,
    pub isbn: String,
    pub title: String,
    #[schema(value_type = std::collections::BTreeMap<String, String>)]
    pub reviews: Reviews,
}

/// App state for review routes
#[derive(Clone)]
pub struct AppState {
    pub reviews: Arc<ReviewStore>,
    pub auth: AuthState,
}

impl AppState {
    pub fn new(reviews: Arc<ReviewStore>, auth: AuthState) -> Self {
        Self { reviews, auth }
    }

    fn title_of(&self, isbn: &str) -> Result<String, ApiError> {
        Ok(self.reviews.catalog().find_by_isbn(isbn)?.title.clone())
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

/// Create review routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/review/:isbn",
            get(list_reviews).put(upsert_review).delete(delete_review),
        )
        .route(
            "/customer/auth/review/:isbn",
            put(upsert_review).delete(delete_review),
        )
        .with_state(state)
}

/// GET /review/{isbn} - Reviews of a book
#[utoipa::path(
    get,
    path = "/review/{isbn}",
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    responses(
        (status = 200, description = "Reviews keyed by username", body = BookReviewsResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    ),
    tag = "reviews"
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> Result<Json<BookReviewsResponse>, ApiError> {
    let title = state.title_of(&isbn)?;
    let reviews = state.reviews.list_reviews(&isbn)?;
    Ok(Json(BookReviewsResponse {
        isbn,
        title,
        reviews,
    }))
}

/// PUT /review/{isbn} - Add or replace the caller's review
#[utoipa::path(
    put,
    path = "/review/{isbn}",
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Review added or updated", body = ReviewUpsertResponse),
        (status = 400, description = "Review text is required", body = ErrorResponse),
        (status = 401, description = "Not logged in or credential expired", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    ),
    tag = "reviews"
)]
pub async fn upsert_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(isbn): Path<String>,
    body: Result<Json<ReviewRequest>, JsonRejection>,
) -> Result<Json<ReviewUpsertResponse>, ApiError> {
    let Json(req) = body?;
    let change = state
        .reviews
        .upsert_review(&isbn, user.identity(), &req.review)?;
    let title = state.title_of(&isbn)?;

    tracing::info!(
        isbn = %isbn,
        username = %user.username(),
        outcome = %change.outcome,
        "Review saved"
    );

    Ok(Json(ReviewUpsertResponse {
        message: format!("Review {} successfully", change.outcome),
        isbn,
        title,
        review: req.review,
        reviews: change.reviews,
    }))
}

/// DELETE /review/{isbn} - Remove the caller's review
#[utoipa::path(
    delete,
    path = "/review/{isbn}",
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    responses(
        (status = 200, description = "Review deleted", body = ReviewDeleteResponse),
        (status = 401, description = "Not logged in or credential expired", body = ErrorResponse),
        (status = 404, description = "Book or review not found", body = ErrorResponse)
    ),
    tag = "reviews"
)]
pub async fn delete_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(isbn): Path<String>,
) -> Result<Json<ReviewDeleteResponse>, ApiError> {
    let reviews = state.reviews.delete_review(&isbn, user.identity())?;
    let title = state.title_of(&isbn)?;

    tracing::info!(isbn = %isbn, username = %user.username(), "Review deleted");

    Ok(Json(ReviewDeleteResponse {
        message: "Review deleted successfully".to_string(),
        isbn,
        title,
        reviews,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthConfig;
    use bookstore_core::{AccountStore, BookstoreError, Catalog, Identity};

    fn state() -> AppState {
        let auth = AuthState::new(
            AuthConfig::with_secret("reviews-test"),
            Arc::new(AccountStore::new()),
        );
        AppState::new(Arc::new(ReviewStore::new(Arc::new(Catalog::seed()))), auth)
    }

    fn alice() -> AuthUser {
        AuthUser(Identity::new("alice"))
    }

    fn review(text: &str) -> Result<Json<ReviewRequest>, JsonRejection> {
        Ok(Json(ReviewRequest {
            review: text.to_string(),
        }))
    }

    #[tokio::test]
    async fn test_upsert_then_update() {
        let state = state();

        let Json(added) = upsert_review(
            State(state.clone()),
            alice(),
            Path("1".to_string()),
            review("  Great read  "),
        )
        .await
        .unwrap();
        assert_eq!(added.message, "Review added successfully");
        assert_eq!(added.title, "Things Fall Apart");
        assert_eq!(added.review, "  Great read  ");
        assert_eq!(added.reviews["alice"], "Great read");

        let Json(updated) = upsert_review(
            State(state),
            alice(),
            Path("1".to_string()),
            review("Even better the second time"),
        )
        .await
        .unwrap();
        assert_eq!(updated.message, "Review updated successfully");
        assert_eq!(updated.reviews.len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_blank_review() {
        let err = upsert_review(State(state()), alice(), Path("1".to_string()), review("   "))
            .await
            .unwrap_err();
        assert!(matches!(err.0, BookstoreError::EmptyReview));
    }

    #[tokio::test]
    async fn test_upsert_unknown_book() {
        let err = upsert_review(State(state()), alice(), Path("999".to_string()), review("x"))
            .await
            .unwrap_err();
        assert!(matches!(err.0, BookstoreError::BookNotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_without_review() {
        let err = delete_review(State(state()), alice(), Path("2".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err.0, BookstoreError::ReviewNotFound));
    }

    #[tokio::test]
    async fn test_delete_leaves_other_reviews() {
        let state = state();
        state
            .reviews
            .upsert_review("2", &Identity::new("bob"), "Charming")
            .unwrap();
        state
            .reviews
            .upsert_review("2", alice().identity(), "Lovely")
            .unwrap();

        let Json(resp) = delete_review(State(state.clone()), alice(), Path("2".to_string()))
            .await
            .unwrap();
        assert_eq!(resp.message, "Review deleted successfully");
        assert_eq!(resp.reviews.keys().collect::<Vec<_>>(), vec!["bob"]);

        let Json(listed) = list_reviews(State(state), Path("2".to_string()))
            .await
            .unwrap();
        assert_eq!(listed.title, "Fairy tales");
        assert_eq!(listed.reviews.len(), 1);
    }
}
