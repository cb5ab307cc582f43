// Error types for bookstore operations

use thiserror::Error;

/// Result type alias for bookstore operations
pub type Result<T> = std::result::Result<T, BookstoreError>;

/// Broad classification of a failure, used by callers to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or unacceptable input
    Validation,
    /// Missing, invalid or expired credential
    Authentication,
    /// Unknown resource
    NotFound,
    /// Resource already exists
    Conflict,
    /// Anything the caller could not have caused
    Internal,
}

/// Errors that can occur in the bookstore domain
#[derive(Debug, Error)]
pub enum BookstoreError {
    /// Username is empty, too short, or has characters outside `[A-Za-z0-9_]`
    #[error("Username must be at least 3 characters long and contain only letters, numbers, and underscores")]
    InvalidUsername,

    /// Username or password absent from the request
    #[error("Username and password are required")]
    MissingCredentials,

    /// Request body could not be understood
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// An account with this username already exists
    #[error("Username already exists")]
    DuplicateUsername,

    /// No account matches the username/password pair
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// No credential is bound to the session
    #[error("Authentication required. Please log in.")]
    Unauthenticated,

    /// Credential signature did not verify or its expiry has passed
    #[error("Access token is invalid or expired. Please log in again.")]
    InvalidOrExpiredCredential,

    /// No catalog entry for the ISBN
    #[error("Book with ISBN {0} not found")]
    BookNotFound(String),

    /// The user has no review for the book
    #[error("Review not found for this user")]
    ReviewNotFound,

    /// Review text is blank after trimming
    #[error("Review text is required")]
    EmptyReview,

    /// Author or title search matched nothing
    #[error("No books found {0}")]
    NoMatches(String),

    /// The catalog has no books at all
    #[error("No books available")]
    CatalogEmpty,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl BookstoreError {
    /// Create a book not found error
    pub fn book_not_found(isbn: impl Into<String>) -> Self {
        BookstoreError::BookNotFound(isbn.into())
    }

    /// Create an empty search result error for an author query
    pub fn no_author_matches(author: &str) -> Self {
        BookstoreError::NoMatches(format!("by author: {}", author))
    }

    /// Create an empty search result error for a title query
    pub fn no_title_matches(title: &str) -> Self {
        BookstoreError::NoMatches(format!("with title: {}", title))
    }

    /// Create an invalid body error
    pub fn invalid_body(msg: impl Into<String>) -> Self {
        BookstoreError::InvalidBody(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            BookstoreError::InvalidUsername
            | BookstoreError::MissingCredentials
            | BookstoreError::InvalidBody(_)
            | BookstoreError::EmptyReview => ErrorKind::Validation,
            BookstoreError::InvalidCredentials
            | BookstoreError::Unauthenticated
            | BookstoreError::InvalidOrExpiredCredential => ErrorKind::Authentication,
            BookstoreError::BookNotFound(_)
            | BookstoreError::ReviewNotFound
            | BookstoreError::NoMatches(_) => ErrorKind::NotFound,
            BookstoreError::DuplicateUsername => ErrorKind::Conflict,
            BookstoreError::CatalogEmpty | BookstoreError::Internal(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(BookstoreError::InvalidUsername.kind(), ErrorKind::Validation);
        assert_eq!(BookstoreError::EmptyReview.kind(), ErrorKind::Validation);
        assert_eq!(BookstoreError::DuplicateUsername.kind(), ErrorKind::Conflict);
        assert_eq!(
            BookstoreError::InvalidOrExpiredCredential.kind(),
            ErrorKind::Authentication
        );
        assert_eq!(BookstoreError::ReviewNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(
            BookstoreError::no_author_matches("nobody").kind(),
            ErrorKind::NotFound
        );
        assert_eq!(BookstoreError::CatalogEmpty.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            BookstoreError::book_not_found("42").to_string(),
            "Book with ISBN 42 not found"
        );
        assert_eq!(
            BookstoreError::no_author_matches("Nobody").to_string(),
            "No books found by author: Nobody"
        );
        assert_eq!(
            BookstoreError::no_title_matches("Nothing").to_string(),
            "No books found with title: Nothing"
        );
    }
}
