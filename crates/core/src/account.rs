// User accounts
//
// Accounts are created on registration and never change afterwards.
// Passwords are compared verbatim; there is no hashing.

use parking_lot::RwLock;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use crate::error::{BookstoreError, Result};

/// Minimum username length in characters.
pub const MIN_USERNAME_LEN: usize = 3;

fn username_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("valid username pattern"))
}

/// Check a username against the registration rules: at least three
/// characters, all of them ASCII letters, digits or underscores.
pub fn is_valid_username(username: &str) -> bool {
    username.chars().count() >= MIN_USERNAME_LEN && username_pattern().is_match(username)
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub username: String,
    pub password: String,
}

/// An authenticated username, as established by a verified credential.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    pub fn new(username: impl Into<String>) -> Self {
        Self(username.into())
    }

    pub fn username(&self) -> &str {
        &self.0
    }

    pub fn into_username(self) -> String {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// In-memory account list, keyed by exact (case-sensitive) username.
#[derive(Default)]
pub struct AccountStore {
    accounts: RwLock<HashMap<String, UserAccount>>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an account.
    ///
    /// The uniqueness check and the insert happen under one write guard, so
    /// concurrent registrations of the same name produce exactly one account.
    pub fn register(&self, username: &str, password: &str) -> Result<()> {
        if !is_valid_username(username) {
            return Err(BookstoreError::InvalidUsername);
        }
        if password.is_empty() {
            return Err(BookstoreError::MissingCredentials);
        }

        let mut accounts = self.accounts.write();
        if accounts.contains_key(username) {
            return Err(BookstoreError::DuplicateUsername);
        }
        accounts.insert(
            username.to_string(),
            UserAccount {
                username: username.to_string(),
                password: password.to_string(),
            },
        );
        Ok(())
    }

    /// Check a username/password pair.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Identity> {
        let accounts = self.accounts.read();
        match accounts.get(username) {
            Some(account) if account.password == password => Ok(Identity::new(username)),
            _ => Err(BookstoreError::InvalidCredentials),
        }
    }

    pub fn contains(&self, username: &str) -> bool {
        self.accounts.read().contains_key(username)
    }

    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }
}
