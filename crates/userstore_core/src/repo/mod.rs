//! Repository layer: one contract, three statement-execution strategies.
//!
//! # Responsibility
//! - Define the user CRUD contract and its row mapper.
//! - Isolate SQL execution details behind interchangeable
//!   implementations picked at composition time.
//!
//! # Invariants
//! - Every implementation reproduces the same verbatim SQL surface.
//! - Repository APIs wrap backend errors with operation context; they
//!   never swallow a failure.

pub mod batch_repo;
pub mod manual_repo;
pub mod statement_repo;
pub mod user_repo;

pub use batch_repo::BatchUserRepository;
pub use manual_repo::ManualUserRepository;
pub use statement_repo::StatementUserRepository;
pub use user_repo::{map_user_row, RepoError, RepoResult, UserRepository};
