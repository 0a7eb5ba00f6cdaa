//! Domain models shared across the persistence core.
//!
//! # Responsibility
//! - Define the canonical `User` record moved between callers and storage.
//!
//! # Invariants
//! - Models stay plain value transports with no storage back-references.

pub mod user;
