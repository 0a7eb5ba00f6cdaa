//! Manual-resource repository.
//!
//! # Responsibility
//! - Manage statement and row-cursor lifetimes explicitly, with release
//!   guaranteed on every exit path by scope-bound guards.
//! - Provide the only truly atomic `save_all`: one transaction covering
//!   every insert and the capture of every generated key.
//!
//! # Invariants
//! - The batch transaction commits only after all rows inserted and all
//!   keys captured; any failure rolls the whole batch back.
//! - Generated keys are captured per statement inside the transaction,
//!   so key-to-entity correlation never relies on result-set ordering.

use crate::db::pool::ConnectionProvider;
use crate::model::user::{User, UserId};
use crate::repo::user_repo::{
    id_text, map_user_row, RepoError, RepoResult, UserRepository, DELETE_SQL, INSERT_SQL,
    SELECT_ALL_SQL, SELECT_BY_ID_SQL, UPDATE_SQL,
};
use log::info;
use rusqlite::{params, TransactionBehavior};
use std::sync::Arc;

/// Repository with explicit resource scopes and transactional batching.
pub struct ManualUserRepository {
    provider: Arc<ConnectionProvider>,
}

impl ManualUserRepository {
    pub fn new(provider: Arc<ConnectionProvider>) -> Self {
        Self { provider }
    }
}

impl UserRepository for ManualUserRepository {
    fn find_all(&self) -> RepoResult<Vec<User>> {
        let conn = self.provider.acquire()?;
        let mut stmt = conn
            .prepare(SELECT_ALL_SQL)
            .map_err(|err| RepoError::persistence("failed to find all users", err))?;

        let mut rows = stmt
            .query([])
            .map_err(|err| RepoError::persistence("failed to find all users", err))?;

        let mut users = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(|err| RepoError::persistence("failed to find all users", err))?
        {
            let user =
                map_user_row(row).map_err(|err| RepoError::InvalidData(err.to_string()))?;
            users.push(user);
        }

        Ok(users)
    }

    fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        let context = || format!("failed to find user with id: {id}");

        let conn = self.provider.acquire()?;
        let mut stmt = conn
            .prepare(SELECT_BY_ID_SQL)
            .map_err(|err| RepoError::persistence(context(), err))?;

        let mut rows = stmt
            .query(params![id])
            .map_err(|err| RepoError::persistence(context(), err))?;

        if let Some(row) = rows
            .next()
            .map_err(|err| RepoError::persistence(context(), err))?
        {
            let user =
                map_user_row(row).map_err(|err| RepoError::InvalidData(err.to_string()))?;
            return Ok(Some(user));
        }

        Ok(None)
    }

    fn save(&self, mut user: User) -> RepoResult<User> {
        let conn = self.provider.acquire()?;
        let mut stmt = conn
            .prepare(INSERT_SQL)
            .map_err(|err| RepoError::persistence("failed to save user", err))?;

        stmt.execute(params![user.username, user.email, user.age])
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

    /// Saves the whole batch atomically.
    ///
    /// One immediate transaction covers every insert; the generated key
    /// is captured right after each statement, assigning ids to entities
    /// in insertion order. On any failure the transaction guard rolls
    /// everything back before the error reaches the caller.
    fn save_all(&self, users: Vec<User>) -> RepoResult<Vec<User>> {
        let mut conn = self.provider.acquire()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|err| RepoError::persistence("failed to save user batch", err))?;

        let mut saved = Vec::with_capacity(users.len());
        {
            let mut stmt = tx
                .prepare(INSERT_SQL)
                .map_err(|err| RepoError::persistence("failed to save user batch", err))?;

            for mut user in users {
                stmt.execute(params![user.username, user.email, user.age])
                    .map_err(|err| RepoError::persistence("failed to save user batch", err))?;

                let id = tx.last_insert_rowid();
                if id <= 0 {
                    return Err(RepoError::NoGeneratedKey {
                        context: "failed to save user batch".to_string(),
                    });
                }
                user.id = Some(id);
                saved.push(user);
            }
        }

        tx.commit()
            .map_err(|err| RepoError::persistence("failed to save user batch", err))?;

        info!(
            "event=batch_save module=repo status=ok backend=manual rows={}",
            saved.len()
        );
        Ok(saved)
    }

    fn update(&self, user: User) -> RepoResult<User> {
        let conn = self.provider.acquire()?;
        let mut stmt = conn.prepare(UPDATE_SQL).map_err(|err| {
            RepoError::persistence(
                format!("failed to update user with id: {}", id_text(user.id)),
                err,
            )
        })?;

        // Zero affected rows is success at this layer; the input comes
        // back unchanged either way.
        stmt.execute(params![user.username, user.email, user.age, user.id])
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
        let mut stmt = conn.prepare(DELETE_SQL).map_err(|err| {
            RepoError::persistence(format!("failed to delete user with id: {id}"), err)
        })?;

        let removed = stmt.execute(params![id]).map_err(|err| {
            RepoError::persistence(format!("failed to delete user with id: {id}"), err)
        })?;

        Ok(removed > 0)
    }
}
