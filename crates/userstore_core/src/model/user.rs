//! User domain model.
//!
//! # Responsibility
//! - Define the single entity persisted by the repository layer.
//!
//! # Invariants
//! - `id` is `None` until the storage backend assigns a generated key.
//! - Once assigned, `id` is stable and never rewritten by callers.

use serde::{Deserialize, Serialize};

/// Primary key type assigned by the storage backend at insert time.
pub type UserId = i64;

/// Canonical user record.
///
/// A `User` is a plain value transport: it carries no connection handle,
/// no dirty-tracking and no cache. The store is the sole source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend-generated key. `None` for a not-yet-persisted record.
    pub id: Option<UserId>,
    pub username: String,
    pub email: String,
    /// Optional; the `users.age` column is nullable.
    pub age: Option<i32>,
}

impl User {
    /// Creates a not-yet-persisted user without an id.
    pub fn new(username: impl Into<String>, email: impl Into<String>, age: Option<i32>) -> Self {
        Self {
            id: None,
            username: username.into(),
            email: email.into(),
            age,
        }
    }

    /// Creates a user carrying a known backend id.
    ///
    /// Used by read paths and tests where identity already exists in the
    /// store.
    pub fn with_id(
        id: UserId,
        username: impl Into<String>,
        email: impl Into<String>,
        age: Option<i32>,
    ) -> Self {
        Self {
            id: Some(id),
            username: username.into(),
            email: email.into(),
            age,
        }
    }

    /// Returns whether the backend has assigned this record an id.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}
