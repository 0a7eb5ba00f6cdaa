//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `userstore_core` wiring.
//! - Exercise one backend, selected by argv, against an in-memory store.

use std::sync::Arc;
use userstore_core::{
    BatchUserRepository, ConnectionProvider, ManualUserRepository, StatementUserRepository, User,
    UserRepository, UserService,
};

fn main() {
    let backend = std::env::args().nth(1).unwrap_or_else(|| "manual".to_string());

    let provider =
        Arc::new(ConnectionProvider::open_in_memory(2).expect("in-memory provider should open"));

    println!("userstore_core version={}", userstore_core::core_version());
    println!("backend={backend}");

    match backend.as_str() {
        "statement" => run_demo(StatementUserRepository::new(provider)),
        "batch" => run_demo(BatchUserRepository::new(provider)),
        _ => run_demo(ManualUserRepository::new(provider)),
    }
}

fn run_demo(repo: impl UserRepository) {
    let service = UserService::new(repo);

    let alice = service
        .register("alice", "a@x.com", Some(30))
        .expect("register should succeed");
    println!("registered id={:?} username={}", alice.id, alice.username);

    let imported = service
        .import(vec![
            User::new("bob", "b@x.com", Some(25)),
            User::new("carol", "c@x.com", None),
        ])
        .expect("import should succeed");
    println!("imported rows={}", imported.len());

    for user in service.list().expect("list should succeed") {
        println!(
            "user id={:?} username={} email={} age={:?}",
            user.id, user.username, user.email, user.age
        );
    }
}
