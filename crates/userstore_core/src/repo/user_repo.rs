//! User repository contract shared by every storage strategy.
//!
//! # Responsibility
//! - Define the CRUD + bulk-insert contract all implementations satisfy.
//! - Own the verbatim SQL surface and the row-to-entity mapper.
//!
//! # Invariants
//! - Absence is never an error: missing rows map to `None`/`false`/zero
//!   rows affected.
//! - Every backend failure is wrapped with an operation-specific message.

use crate::db::pool::ConnectionError;
use crate::model::user::{User, UserId};
use rusqlite::Row;
use std::error::Error;
use std::fmt::{Display, Formatter};

// SQL surface, kept verbatim for compatibility with the existing schema.
pub(crate) const SELECT_ALL_SQL: &str = "SELECT id, username, email, age FROM users";
pub(crate) const SELECT_BY_ID_SQL: &str = "SELECT id, username, email, age FROM users WHERE id = ?";
pub(crate) const INSERT_SQL: &str = "INSERT INTO users (username, email, age) VALUES (?, ?, ?)";
pub(crate) const UPDATE_SQL: &str =
    "UPDATE users SET username = ?, email = ?, age = ? WHERE id = ?";
pub(crate) const DELETE_SQL: &str = "DELETE FROM users WHERE id = ?";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for user persistence operations.
#[derive(Debug)]
pub enum RepoError {
    /// Could not obtain a usable connection from the provider.
    Connection(ConnectionError),
    /// A backend statement failed; carries the operation context and cause.
    Persistence {
        context: String,
        source: rusqlite::Error,
    },
    /// An insert completed without the backend producing a generated key.
    NoGeneratedKey { context: String },
    /// A persisted row could not be mapped into a `User`.
    InvalidData(String),
}

impl RepoError {
    pub(crate) fn persistence(context: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::Persistence {
            context: context.into(),
            source,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connection(err) => write!(f, "{err}"),
            Self::Persistence { context, source } => write!(f, "{context}: {source}"),
            Self::NoGeneratedKey { context } => {
                write!(f, "{context}: backend returned no generated key")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted user data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connection(err) => Some(err),
            Self::Persistence { source, .. } => Some(source),
            Self::NoGeneratedKey { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<ConnectionError> for RepoError {
    fn from(value: ConnectionError) -> Self {
        Self::Connection(value)
    }
}

/// Repository contract for user CRUD and bulk insert.
///
/// Three interchangeable implementations exist, each demonstrating one
/// statement-execution strategy. Callers pick one at composition time and
/// program against this trait.
pub trait UserRepository {
    /// Returns all rows; an empty store yields an empty vec.
    fn find_all(&self) -> RepoResult<Vec<User>>;
    /// Returns zero or one user; a missing id is `None`, not an error.
    fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Inserts one row and returns the input with `id` populated.
    fn save(&self, user: User) -> RepoResult<User>;
    /// Inserts all entities as one logical batch.
    ///
    /// Atomicity is implementation-specific; see each implementation's
    /// batch contract. Generated ids correspond to inputs by insertion
    /// order.
    fn save_all(&self, users: Vec<User>) -> RepoResult<Vec<User>>;
    /// Updates all non-id fields of the matching row.
    ///
    /// Zero rows affected is success: the input is returned unchanged.
    fn update(&self, user: User) -> RepoResult<User>;
    /// Deletes the matching row, reporting whether one existed.
    fn delete_by_id(&self, id: UserId) -> RepoResult<bool>;
}

/// Renders an optional id for operation context messages.
pub(crate) fn id_text(id: Option<UserId>) -> String {
    id.map_or_else(|| "unsaved".to_string(), |value| value.to_string())
}

/// Maps one result row to a `User`.
///
/// Shared by every implementation; columns follow the verbatim SELECT
/// list.
pub fn map_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        username: row.get("username")?,
        email: row.get("email")?,
        age: row.get("age")?,
    })
}
