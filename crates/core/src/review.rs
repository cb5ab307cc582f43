// Review store
//
// One review per (isbn, username). Writing again replaces the previous text.
// Every mutation takes the write guard for its whole read-modify-write, so
// concurrent edits by different users to the same book are all kept.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::account::Identity;
use crate::book::{Book, BookRecord, Reviews};
use crate::catalog::Catalog;
use crate::error::{BookstoreError, Result};

/// Whether an upsert created a review or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    Added,
    Updated,
}

impl ReviewOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewOutcome::Added => "added",
            ReviewOutcome::Updated => "updated",
        }
    }
}

impl std::fmt::Display for ReviewOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a successful upsert.
#[derive(Debug, Clone)]
pub struct ReviewChange {
    pub outcome: ReviewOutcome,
    /// All reviews of the book right after the change.
    pub reviews: Reviews,
}

/// Reviews for every book in a catalog.
pub struct ReviewStore {
    catalog: Arc<Catalog>,
    reviews: RwLock<HashMap<String, Reviews>>,
}

impl ReviewStore {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            reviews: RwLock::new(HashMap::new()),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Add or replace the caller's review of a book.
    pub fn upsert_review(&self, isbn: &str, identity: &Identity, text: &str) -> Result<ReviewChange> {
        self.catalog.find_by_isbn(isbn)?;

        let text = text.trim();
        if text.is_empty() {
            return Err(BookstoreError::EmptyReview);
        }

        let mut all = self.reviews.write();
        let reviews = all.entry(isbn.to_string()).or_default();
        let previous = reviews.insert(identity.username().to_string(), text.to_string());
        let outcome = if previous.is_some() {
            ReviewOutcome::Updated
        } else {
            ReviewOutcome::Added
        };

        tracing::debug!(isbn = %isbn, username = %identity, outcome = %outcome, "Review stored");

        Ok(ReviewChange {
            outcome,
            reviews: reviews.clone(),
        })
    }

    /// Remove the caller's review of a book. Returns the remaining reviews.
    pub fn delete_review(&self, isbn: &str, identity: &Identity) -> Result<Reviews> {
        self.catalog.find_by_isbn(isbn)?;

        let mut all = self.reviews.write();
        let reviews = all
            .get_mut(isbn)
            .ok_or(BookstoreError::ReviewNotFound)?;
        reviews
            .remove(identity.username())
            .ok_or(BookstoreError::ReviewNotFound)?;

        tracing::debug!(isbn = %isbn, username = %identity, "Review deleted");

        Ok(reviews.clone())
    }

    /// All reviews of a book; empty if nobody has reviewed it.
    pub fn list_reviews(&self, isbn: &str) -> Result<Reviews> {
        self.catalog.find_by_isbn(isbn)?;
        Ok(self.snapshot(isbn))
    }

    /// Join a catalog book with its current reviews.
    pub fn record(&self, book: &Book) -> BookRecord {
        book.with_reviews(self.snapshot(&book.isbn))
    }

    fn snapshot(&self, isbn: &str) -> Reviews {
        self.reviews.read().get(isbn).cloned().unwrap_or_default()
    }
}
