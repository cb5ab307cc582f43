// Book domain types
//
// A Book is an immutable catalog record; its reviews live in the ReviewStore
// and are joined in when a record is presented.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Reviews of a single book, keyed by the reviewing username.
pub type Reviews = BTreeMap<String, String>;

/// Catalog record for a book.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Book {
    /// ISBN, the catalog key.
    #[cfg_attr(feature = "openapi", schema(example = "1"))]
    pub isbn: String,
    /// Author as printed on the cover.
    #[cfg_attr(feature = "openapi", schema(example = "Chinua Achebe"))]
    pub author: String,
    /// Title of the book.
    #[cfg_attr(feature = "openapi", schema(example = "Things Fall Apart"))]
    pub title: String,
}

impl Book {
    pub fn new(
        isbn: impl Into<String>,
        author: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            isbn: isbn.into(),
            author: author.into(),
            title: title.into(),
        }
    }

    /// Attach a snapshot of reviews to this book.
    pub fn with_reviews(&self, reviews: Reviews) -> BookRecord {
        BookRecord {
            isbn: self.isbn.clone(),
            author: self.author.clone(),
            title: self.title.clone(),
            reviews,
        }
    }
}

/// A book together with its current reviews.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookRecord {
    /// ISBN, the catalog key.
    pub isbn: String,
    /// Author as printed on the cover.
    pub author: String,
    /// Title of the book.
    pub title: String,
    /// Reviews keyed by username.
    #[cfg_attr(
        feature = "openapi",
        schema(value_type = std::collections::BTreeMap<String, String>)
    )]
    pub reviews: Reviews,
}

/// A book as it appears in listings keyed by ISBN.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookEntry {
    pub author: String,
    pub title: String,
    #[serde(default)]
    #[cfg_attr(
        feature = "openapi",
        schema(value_type = std::collections::BTreeMap<String, String>)
    )]
    pub reviews: Reviews,
}

impl From<BookRecord> for BookEntry {
    fn from(record: BookRecord) -> Self {
        Self {
            author: record.author,
            title: record.title,
            reviews: record.reviews,
        }
    }
}

/// Books keyed by ISBN, serialized as a JSON object in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookMap(Vec<(String, BookEntry)>);

impl BookMap {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, isbn: &str) -> Option<&BookEntry> {
        self.0.iter().find(|(key, _)| key == isbn).map(|(_, e)| e)
    }

    pub fn isbns(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }
}

impl FromIterator<BookRecord> for BookMap {
    fn from_iter<I: IntoIterator<Item = BookRecord>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|record| (record.isbn.clone(), BookEntry::from(record)))
                .collect(),
        )
    }
}

impl Serialize for BookMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (isbn, entry) in &self.0 {
            map.serialize_entry(isbn, entry)?;
        }
        map.end()
    }
}
