//! Parameterized-statement repository.
//!
//! # Responsibility
//! - Execute one parameterized statement per operation through the
//!   fluent `prepare`/`query_map`/`query_row` binding API.
//!
//! # Invariants
//! - One connection checkout per repository call.
//! - Every statement auto-commits; no explicit transaction scope exists.
//! - `save_all` is a sequential per-entity loop with no batch atomicity:
//!   a mid-batch failure leaves the earlier rows committed. Known
//!   limitation of this strategy, not a bug.

use crate::db::pool::ConnectionProvider;
use crate::model::user::{User, UserId};
use crate::repo::user_repo::{
    id_text, map_user_row, RepoError, RepoResult, UserRepository, DELETE_SQL, INSERT_SQL,
    SELECT_ALL_SQL, SELECT_BY_ID_SQL, UPDATE_SQL,
};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Arc;

/// Repository built on per-call prepared statements with fluent binding.
pub struct StatementUserRepository {
    provider: Arc<ConnectionProvider>,
}

impl StatementUserRepository {
    pub fn new(provider: Arc<ConnectionProvider>) -> Self {
        Self { provider }
    }

    fn insert_one(&self, conn: &Connection, mut user: User) -> RepoResult<User> {
        conn.execute(INSERT_SQL, params![user.username, user.email, user.age])
            .map_err(|err| RepoError::persistence("failed to save user", err))?;

        let id = conn.last_insert_rowid();
        if id <= 0 {
            return Err(RepoError::NoGeneratedKey {
                context: "failed to save user".to_string(),
            });
        }
        user.id = Some(id);
        Ok(user)
    }
}

impl UserRepository for StatementUserRepository {
    fn find_all(&self) -> RepoResult<Vec<User>> {
        let conn = self.provider.acquire()?;
        let mut stmt = conn
            .prepare(SELECT_ALL_SQL)
            .map_err(|err| RepoError::persistence("failed to find all users", err))?;

        let users = stmt
            .query_map([], map_user_row)
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<User>>>())
            .map_err(|err| RepoError::persistence("failed to find all users", err))?;

        Ok(users)
    }

    fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        let conn = self.provider.acquire()?;
        let mut stmt = conn
            .prepare(SELECT_BY_ID_SQL)
            .map_err(|err| RepoError::persistence(format!("failed to find user with id: {id}"), err))?;

        stmt.query_row([id], map_user_row)
            .optional()
            .map_err(|err| RepoError::persistence(format!("failed to find user with id: {id}"), err))
    }

    fn save(&self, user: User) -> RepoResult<User> {
        let conn = self.provider.acquire()?;
        self.insert_one(&conn, user)
    }

    /// Saves every entity with one insert each, in input order.
    ///
    /// Not atomic: each insert auto-commits, so a failure part way
    /// through leaves the already-inserted prefix in the store.
    fn save_all(&self, users: Vec<User>) -> RepoResult<Vec<User>> {
        let conn = self.provider.acquire()?;
        let mut saved = Vec::with_capacity(users.len());
        for user in users {
            saved.push(self.insert_one(&conn, user)?);
        }
        Ok(saved)
    }

    fn update(&self, user: User) -> RepoResult<User> {
        let conn = self.provider.acquire()?;
        conn.execute(
            UPDATE_SQL,
            params![user.username, user.email, user.age, user.id],
        )
        .map_err(|err| {
            RepoError::persistence(
                format!("failed to update user with id: {}", id_text(user.id)),
                err,
            )
        })?;

        // Zero affected rows is not an error at this layer.
        Ok(user)
    }

    fn delete_by_id(&self, id: UserId) -> RepoResult<bool> {
        let conn = self.provider.acquire()?;
        let removed = conn
            .execute(DELETE_SQL, params![id])
            .map_err(|err| {
                RepoError::persistence(format!("failed to delete user with id: {id}"), err)
            })?;
        Ok(removed > 0)
    }
}
