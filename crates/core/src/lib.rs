// Bookstore domain
//
// DB-agnostic, HTTP-agnostic core of the bookstore:
// - Catalog: fixed set of books with ISBN / author / title lookup
// - AccountStore: registered users (username + password)
// - ReviewStore: one review per user per book, last write wins
// - BookstoreError: every domain failure, classified by ErrorKind
//
// All stores are synchronous and guard their state with parking_lot locks;
// nothing here performs I/O except loading a catalog file.

pub mod account;
pub mod book;
pub mod catalog;
pub mod error;
pub mod review;

// Logging setup shared by binaries
pub mod telemetry;

pub use account::{is_valid_username, AccountStore, Identity, UserAccount, MIN_USERNAME_LEN};
pub use book::{Book, BookEntry, BookMap, BookRecord, Reviews};
pub use catalog::Catalog;
pub use error::{BookstoreError, ErrorKind, Result};
pub use review::{ReviewChange, ReviewOutcome, ReviewStore};
