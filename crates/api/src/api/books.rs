// Catalog lookup routes

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use bookstore_core::{Book, BookMap, BookRecord, ReviewStore};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use super::common::{ApiError, ErrorResponse};

/// Books matching an author search, keyed by ISBN
#[derive(Debug, Serialize, ToSchema)]
pub struct BooksByAuthorResponse {
    #[schema(value_type = Object)]
    pub booksbyauthor: BookMap,
}

/// Books matching a title search, keyed by ISBN
#[derive(Debug, Serialize, ToSchema)]
pub struct BooksByTitleResponse {
    #[schema(value_type = Object)]
    pub booksbytitle: BookMap,
}

/// App state for catalog routes
#[derive(Clone)]
pub struct AppState {
    pub reviews: Arc<ReviewStore>,
}

impl AppState {
    pub fn new(reviews: Arc<ReviewStore>) -> Self {
        Self { reviews }
    }

    fn records<'a>(&self, books: impl IntoIterator<Item = &'a Book>) -> BookMap {
        books
            .into_iter()
            .map(|book| self.reviews.record(book))
            .collect()
    }
}

/// Create catalog routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_books))
        .route("/isbn/:isbn", get(get_book))
        .route("/author/*author", get(books_by_author))
        .route("/title/*title", get(books_by_title))
        .with_state(state)
}

/// GET / - Full catalog keyed by ISBN
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Full catalog keyed by ISBN", body = std::collections::HashMap<String, bookstore_core::BookEntry>),
        (status = 500, description = "No books available", body = ErrorResponse)
    ),
    tag = "books"
)]
pub async fn list_books(State(state): State<AppState>) -> Result<Json<BookMap>, ApiError> {
    let books = state.reviews.catalog().all()?;
    Ok(Json(state.records(books)))
}

/// GET /isbn/{isbn} - Book by ISBN
#[utoipa::path(
    get,
    path = "/isbn/{isbn}",
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    responses(
        (status = 200, description = "Book found", body = BookRecord),
        (status = 404, description = "Book not found", body = ErrorResponse)
    ),
    tag = "books"
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> Result<Json<BookRecord>, ApiError> {
    let book = state.reviews.catalog().find_by_isbn(&isbn)?;
    Ok(Json(state.reviews.record(book)))
}

/// GET /author/{author} - Case-insensitive author search
#[utoipa::path(
    get,
    path = "/author/{author}",
    params(
        ("author" = String, Path, description = "Author name or fragment")
    ),
    responses(
        (status = 200, description = "Matching books", body = BooksByAuthorResponse),
        (status = 404, description = "No books found", body = ErrorResponse)
    ),
    tag = "books"
)]
pub async fn books_by_author(
    State(state): State<AppState>,
    Path(author): Path<String>,
) -> Result<Json<BooksByAuthorResponse>, ApiError> {
    let books = state.reviews.catalog().find_by_author(&author)?;
    Ok(Json(BooksByAuthorResponse {
        booksbyauthor: state.records(books),
    }))
}

/// GET /title/{title} - Case-insensitive title search
#[utoipa::path(
    get,
    path = "/title/{title}",
    params(
        ("title" = String, Path, description = "Title or fragment")
    ),
    responses(
        (status = 200, description = "Matching books", body = BooksByTitleResponse),
        (status = 404, description = "No books found", body = ErrorResponse)
    ),
    tag = "books"
)]
pub async fn books_by_title(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> Result<Json<BooksByTitleResponse>, ApiError> {
    let books = state.reviews.catalog().find_by_title(&title)?;
    Ok(Json(BooksByTitleResponse {
        booksbytitle: state.records(books),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookstore_core::{BookstoreError, Catalog, Identity};

    fn state() -> AppState {
        AppState::new(Arc::new(ReviewStore::new(Arc::new(Catalog::seed()))))
    }

    #[tokio::test]
    async fn test_list_books_includes_reviews() {
        let state = state();
        state
            .reviews
            .upsert_review("1", &Identity::new("alice"), "Classic")
            .unwrap();

        let Json(map) = list_books(State(state)).await.unwrap();
        assert_eq!(map.len(), 10);
        assert_eq!(map.get("1").unwrap().reviews["alice"], "Classic");
    }

    #[tokio::test]
    async fn test_list_books_empty_catalog() {
        let state = AppState::new(Arc::new(ReviewStore::new(Arc::new(Catalog::default()))));
        let err = list_books(State(state)).await.unwrap_err();
        assert!(matches!(err.0, BookstoreError::CatalogEmpty));
    }

    #[tokio::test]
    async fn test_get_book() {
        let Json(record) = get_book(State(state()), Path("3".to_string()))
            .await
            .unwrap();
        assert_eq!(record.title, "The Divine Comedy");
        assert!(record.reviews.is_empty());
    }

    #[tokio::test]
    async fn test_author_search_no_matches() {
        let err = books_by_author(State(state()), Path("Tolkien".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err.0, BookstoreError::NoMatches(_)));
    }

    #[tokio::test]
    async fn test_title_search() {
        let Json(resp) = books_by_title(State(state()), Path("pride".to_string()))
            .await
            .unwrap();
        assert_eq!(resp.booksbytitle.isbns().collect::<Vec<_>>(), vec!["8"]);
    }
}
