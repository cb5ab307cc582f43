// Catalog lookup
//
// The catalog is a fixed set of books loaded at startup. Lookups are by exact
// ISBN, or case-insensitive substring over author or title. An author/title
// search with no matches is an error rather than an empty success; existing
// clients rely on the 404.

use anyhow::Context;
use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::book::Book;
use crate::error::{BookstoreError, Result};

/// The built-in catalog.
const SEED_BOOKS: &[(&str, &str, &str)] = &[
    ("1", "Chinua Achebe", "Things Fall Apart"),
    ("2", "Hans Christian Andersen", "Fairy tales"),
    ("3", "Dante Alighieri", "The Divine Comedy"),
    ("4", "Unknown", "The Epic Of Gilgamesh"),
    ("5", "Unknown", "The Book Of Job"),
    ("6", "Unknown", "One Thousand and One Nights"),
    ("7", "Unknown", "Nj\u{e1}l's Saga"),
    ("8", "Jane Austen", "Pride and Prejudice"),
    ("9", "Honor\u{e9} de Balzac", "Le P\u{e8}re Goriot"),
    (
        "10",
        "Samuel Beckett",
        "Molloy, Malone Dies, The Unnamable, the trilogy",
    ),
];

/// Catalog file entry. Any `reviews` present in the file are ignored.
#[derive(Debug, Deserialize)]
struct CatalogFileEntry {
    author: String,
    title: String,
}

/// Immutable, ordered set of books addressable by ISBN.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    books: Vec<Book>,
}

impl Catalog {
    /// Build a catalog from books. Later duplicates of an ISBN are dropped.
    pub fn new(books: impl IntoIterator<Item = Book>) -> Self {
        let mut seen = HashSet::new();
        let mut unique = Vec::new();
        for book in books {
            if seen.insert(book.isbn.clone()) {
                unique.push(book);
            } else {
                tracing::warn!(isbn = %book.isbn, "Duplicate ISBN in catalog, keeping first entry");
            }
        }
        Self { books: unique }
    }

    /// The built-in seed catalog.
    pub fn seed() -> Self {
        Self::new(
            SEED_BOOKS
                .iter()
                .map(|(isbn, author, title)| Book::new(*isbn, *author, *title)),
        )
    }

    /// Parse a catalog from a JSON object keyed by ISBN:
    /// `{ "1": { "author": "...", "title": "..." }, ... }`
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let entries: BTreeMap<String, CatalogFileEntry> =
            serde_json::from_str(json).context("Failed to parse catalog JSON")?;

        let mut books: Vec<Book> = entries
            .into_iter()
            .map(|(isbn, entry)| Book::new(isbn, entry.author, entry.title))
            .collect();
        books.sort_by(|a, b| isbn_order(&a.isbn, &b.isbn));

        Ok(Self::new(books))
    }

    /// Load a catalog from a JSON file (see [`Catalog::from_json_str`]).
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
        Self::from_json_str(&json)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn get(&self, isbn: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.isbn == isbn)
    }

    pub fn contains(&self, isbn: &str) -> bool {
        self.get(isbn).is_some()
    }

    /// All books in catalog order. An empty catalog is an error.
    pub fn all(&self) -> Result<&[Book]> {
        if self.books.is_empty() {
            return Err(BookstoreError::CatalogEmpty);
        }
        Ok(&self.books)
    }

    /// Exact ISBN lookup.
    pub fn find_by_isbn(&self, isbn: &str) -> Result<&Book> {
        self.get(isbn)
            .ok_or_else(|| BookstoreError::book_not_found(isbn))
    }

    /// Case-insensitive substring search over author.
    pub fn find_by_author(&self, author: &str) -> Result<Vec<&Book>> {
        let matches = self.filter(author, |b| b.author.as_str());
        if matches.is_empty() {
            return Err(BookstoreError::no_author_matches(author));
        }
        Ok(matches)
    }

    /// Case-insensitive substring search over title.
    pub fn find_by_title(&self, title: &str) -> Result<Vec<&Book>> {
        let matches = self.filter(title, |b| b.title.as_str());
        if matches.is_empty() {
            return Err(BookstoreError::no_title_matches(title));
        }
        Ok(matches)
    }

    fn filter(&self, query: &str, field: fn(&Book) -> &str) -> Vec<&Book> {
        let pattern = query.to_lowercase();
        self.books
            .iter()
            .filter(|b| field(b).to_lowercase().contains(&pattern))
            .collect()
    }
}

/// All-digit keys first, ordered as numbers ("2" before "10"); other keys
/// after them in lexicographic order.
fn isbn_order(a: &str, b: &str) -> Ordering {
    let numeric = |s: &str| !s.is_empty() && s.bytes().all(|c| c.is_ascii_digit());
    match (numeric(a), numeric(b)) {
        (true, true) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tolkien_catalog() -> Catalog {
        Catalog::new(vec![
            Book::new("100", "J.R.R. Tolkien", "The Hobbit"),
            Book::new("101", "J.R.R. Tolkien", "The Lord of the Rings"),
            Book::new("102", "Ursula K. Le Guin", "A Wizard of Earthsea"),
        ])
    }

    #[test]
    fn test_seed_catalog() {
        let catalog = Catalog::seed();
        assert_eq!(catalog.len(), 10);
        assert_eq!(catalog.find_by_isbn("1").unwrap().author, "Chinua Achebe");
        assert_eq!(catalog.all().unwrap().last().unwrap().isbn, "10");
    }

    #[test]
    fn test_find_by_isbn_not_found() {
        let catalog = Catalog::seed();
        let err = catalog.find_by_isbn("999").unwrap_err();
        assert!(matches!(err, BookstoreError::BookNotFound(ref isbn) if isbn == "999"));
    }

    #[test]
    fn test_author_search_is_case_insensitive_substring() {
        let catalog = tolkien_catalog();
        let matches = catalog.find_by_author("tolkien").unwrap();
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|b| b.author == "J.R.R. Tolkien"));

        let matches = catalog.find_by_author("LE GUIN").unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].isbn, "102");
    }

    #[test]
    fn test_title_search() {
        let catalog = tolkien_catalog();
        let matches = catalog.find_by_title("the").unwrap();
        assert_eq!(
            matches.iter().map(|b| b.isbn.as_str()).collect::<Vec<_>>(),
            vec!["100", "101"]
        );
    }

    #[test]
    fn test_search_without_matches_is_not_found() {
        let catalog = tolkien_catalog();

        let err = catalog.find_by_author("pratchett").unwrap_err();
        assert!(matches!(err, BookstoreError::NoMatches(_)));
        assert_eq!(err.to_string(), "No books found by author: pratchett");

        let err = catalog.find_by_title("discworld").unwrap_err();
        assert!(matches!(err, BookstoreError::NoMatches(_)));
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::default();
        assert!(catalog.is_empty());
        assert!(matches!(catalog.all(), Err(BookstoreError::CatalogEmpty)));
    }

    #[test]
    fn test_duplicate_isbn_keeps_first() {
        let catalog = Catalog::new(vec![
            Book::new("1", "First", "A"),
            Book::new("1", "Second", "B"),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("1").unwrap().author, "First");
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"{
            "10": {"author": "Samuel Beckett", "title": "Molloy", "reviews": {}},
            "2": {"author": "Hans Christian Andersen", "title": "Fairy tales", "reviews": {}},
            "1": {"author": "Chinua Achebe", "title": "Things Fall Apart"}
        }"#;
        let catalog = Catalog::from_json_str(json).unwrap();
        let isbns: Vec<_> = catalog
            .all()
            .unwrap()
            .iter()
            .map(|b| b.isbn.as_str())
            .collect();
        assert_eq!(isbns, vec!["1", "2", "10"]);
    }

    #[test]
    fn test_from_json_str_mixed_keys() {
        let json = r#"{
            "9-3": {"author": "A", "title": "Short hyphenated"},
            "10": {"author": "B", "title": "Ten"},
            "1-85326-000-2": {"author": "C", "title": "Long hyphenated"},
            "2": {"author": "D", "title": "Two"}
        }"#;
        let catalog = Catalog::from_json_str(json).unwrap();
        let isbns: Vec<_> = catalog
            .all()
            .unwrap()
            .iter()
            .map(|b| b.isbn.as_str())
            .collect();
        assert_eq!(isbns, vec!["2", "10", "1-85326-000-2", "9-3"]);
    }

    #[test]
    fn test_from_json_str_invalid() {
        assert!(Catalog::from_json_str("[1, 2, 3]").is_err());
        assert!(Catalog::from_json_str(r#"{"1": {"title": "No author"}}"#).is_err());
    }
}
