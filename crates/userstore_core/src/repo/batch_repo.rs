//! Batch-template repository.
//!
//! # Responsibility
//! - Route every repeated execution through one bulk helper built on a
//!   cached prepared statement and a caller-supplied row binder.
//! - Demonstrate key-holder style key extraction and named-parameter
//!   binding as alternatives to the positional strategies.
//!
//! # Invariants
//! - The bulk helper delegates commit to the connection's autocommit, so
//!   a batch is not atomic: a mid-batch failure leaves the inserted
//!   prefix committed.
//! - Generated keys are returned in execution order and correlated to
//!   input entities by index. SQLite yields one key per insert so the
//!   correlation is exact here; backends that batch key results only by
//!   convention would make this an ordering assumption.

use crate::db::pool::ConnectionProvider;
use crate::model::user::{User, UserId};
use crate::repo::user_repo::{
    id_text, map_user_row, RepoError, RepoResult, UserRepository, DELETE_SQL, INSERT_SQL,
    SELECT_ALL_SQL, SELECT_BY_ID_SQL, UPDATE_SQL,
};
use rusqlite::types::Value;
use rusqlite::{named_params, params, params_from_iter, Connection, OptionalExtension};
use std::sync::Arc;

const NAMED_UPDATE_SQL: &str =
    "UPDATE users SET username = :name, email = :email, age = :age WHERE id = :id";

/// Repository delegating repetition to a bulk statement helper.
pub struct BatchUserRepository {
    provider: Arc<ConnectionProvider>,
}

impl BatchUserRepository {
    pub fn new(provider: Arc<ConnectionProvider>) -> Self {
        Self { provider }
    }

    /// Updates a user through named rather than positional parameters.
    ///
    /// Effect-equivalent to [`UserRepository::update`]; kept as the one
    /// canonical named-binding variant. Zero affected rows is success.
    pub fn named_update(&self, user: User) -> RepoResult<User> {
        let conn = self.provider.acquire()?;
        conn.execute(
            NAMED_UPDATE_SQL,
            named_params! {
                ":name": user.username,
                ":email": user.email,
                ":age": user.age,
                ":id": user.id,
            },
        )
        .map_err(|err| {
            RepoError::persistence(
                format!("failed to update user with id: {}", id_text(user.id)),
                err,
            )
        })?;

        Ok(user)
    }
}

impl UserRepository for BatchUserRepository {
    fn find_all(&self) -> RepoResult<Vec<User>> {
        let conn = self.provider.acquire()?;
        let mut stmt = conn
            .prepare_cached(SELECT_ALL_SQL)
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
            .prepare_cached(SELECT_BY_ID_SQL)
            .map_err(|err| RepoError::persistence(format!("failed to find user with id: {id}"), err))?;

        stmt.query_row([id], map_user_row)
            .optional()
            .map_err(|err| RepoError::persistence(format!("failed to find user with id: {id}"), err))
    }

    /// Inserts one row and extracts the generated key from the
    /// statement's key result, failing when no key is produced.
    fn save(&self, mut user: User) -> RepoResult<User> {
        let conn = self.provider.acquire()?;
        let mut stmt = conn
            .prepare_cached(INSERT_SQL)
            .map_err(|err| RepoError::persistence("failed to save user", err))?;

        let id = stmt
            .insert(params![user.username, user.email, user.age])
            .map_err(|err| RepoError::persistence("failed to save user", err))?;
        if id <= 0 {
            return Err(RepoError::NoGeneratedKey {
                context: "failed to save user".to_string(),
            });
        }

        user.id = Some(id);
        Ok(user)
    }

    /// Saves the batch through the bulk helper.
    ///
    /// Keys come back in execution order and are assigned to entities by
    /// index. Commit is per row (autocommit); the batch is not atomic.
    fn save_all(&self, mut users: Vec<User>) -> RepoResult<Vec<User>> {
        let conn = self.provider.acquire()?;
        let keys = batch_insert(&conn, INSERT_SQL, &users, |user| {
            vec![
                Value::from(user.username.clone()),
                Value::from(user.email.clone()),
                Value::from(user.age),
            ]
        })
        .map_err(|err| RepoError::persistence("failed to save user batch", err))?;

        for (user, id) in users.iter_mut().zip(keys) {
            user.id = Some(id);
        }
        Ok(users)
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

/// Bulk insert helper: one cached statement, one binder callback per row.
///
/// Returns the generated key of each row in execution order. Each insert
/// auto-commits; the caller owns any atomicity requirement.
fn batch_insert<T>(
    conn: &Connection,
    sql: &str,
    rows: &[T],
    bind: impl Fn(&T) -> Vec<Value>,
) -> rusqlite::Result<Vec<i64>> {
    let mut stmt = conn.prepare_cached(sql)?;
    let mut keys = Vec::with_capacity(rows.len());
    for row in rows {
        keys.push(stmt.insert(params_from_iter(bind(row)))?);
    }
    Ok(keys)
}
