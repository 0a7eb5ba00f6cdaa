//! Use-case services over the repository contract.
//!
//! # Responsibility
//! - Provide stable entry points for callers without exposing SQL
//!   details.
//!
//! # Invariants
//! - Services stay storage-agnostic: they depend on `UserRepository`
//!   only, never on a concrete backend.

pub mod user_service;
