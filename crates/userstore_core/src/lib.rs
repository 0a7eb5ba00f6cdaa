//! User persistence core.
//!
//! One repository contract, three interchangeable SQLite execution
//! strategies; the backing store is the sole source of truth.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{
    open_db, open_db_in_memory, open_db_shared_memory, ConnectionError, ConnectionProvider,
    PooledConnection,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::user::{User, UserId};
pub use repo::{
    map_user_row, BatchUserRepository, ManualUserRepository, RepoError, RepoResult,
    StatementUserRepository, UserRepository,
};
pub use service::user_service::UserService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
