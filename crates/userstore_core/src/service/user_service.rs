//! User use-case service.
//!
//! # Responsibility
//! - Provide CRUD entry points for core callers.
//! - Delegate persistence to the repository chosen at composition time.

use crate::model::user::{User, UserId};
use crate::repo::user_repo::{RepoResult, UserRepository};

/// Use-case wrapper around one repository strategy.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new user and returns it with its generated id.
    pub fn register(
        &self,
        username: impl Into<String>,
        email: impl Into<String>,
        age: Option<i32>,
    ) -> RepoResult<User> {
        self.repo.save(User::new(username, email, age))
    }

    /// Imports a batch of users; batch semantics follow the repository.
    pub fn import(&self, users: Vec<User>) -> RepoResult<Vec<User>> {
        self.repo.save_all(users)
    }

    /// Lists every stored user.
    pub fn list(&self) -> RepoResult<Vec<User>> {
        self.repo.find_all()
    }

    /// Gets one user by id; a missing id is `None`.
    pub fn get(&self, id: UserId) -> RepoResult<Option<User>> {
        self.repo.find_by_id(id)
    }

    /// Updates all non-id fields of an existing user.
    pub fn update(&self, user: User) -> RepoResult<User> {
        self.repo.update(user)
    }

    /// Removes one user, reporting whether a row existed.
    pub fn remove(&self, id: UserId) -> RepoResult<bool> {
        self.repo.delete_by_id(id)
    }
}
