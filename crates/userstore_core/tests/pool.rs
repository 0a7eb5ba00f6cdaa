use std::sync::Arc;
use userstore_core::{
    ConnectionError, ConnectionProvider, ManualUserRepository, RepoError,
    StatementUserRepository, User, UserRepository,
};

#[test]
fn acquire_returns_connection_to_pool_on_drop() {
    let provider = ConnectionProvider::open_in_memory(1).unwrap();
    assert_eq!(provider.capacity(), 1);
    assert_eq!(provider.idle_count(), 1);

    let guard = provider.acquire().unwrap();
    assert_eq!(provider.idle_count(), 0);
    drop(guard);
    assert_eq!(provider.idle_count(), 1);

    // The recycled connection is usable again.
    let guard = provider.acquire().unwrap();
    let count: i64 = guard
        .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn exhausted_pool_fails_without_blocking() {
    let provider = ConnectionProvider::open_in_memory(1).unwrap();
    let _held = provider.acquire().unwrap();

    let err = provider.acquire().unwrap_err();
    assert!(matches!(err, ConnectionError::Exhausted { capacity: 1 }));
}

#[test]
fn repository_surfaces_pool_exhaustion_as_connection_error() {
    let provider = Arc::new(ConnectionProvider::open_in_memory(1).unwrap());
    let repo = StatementUserRepository::new(provider.clone());

    let _held = provider.acquire().unwrap();
    let err = repo.find_all().unwrap_err();
    assert!(matches!(err, RepoError::Connection(_)));
}

#[test]
fn zero_capacity_is_clamped_to_one() {
    let provider = ConnectionProvider::open_in_memory(0).unwrap();
    assert_eq!(provider.capacity(), 1);
}

#[test]
fn pooled_connections_share_one_in_memory_store() {
    let provider = Arc::new(ConnectionProvider::open_in_memory(2).unwrap());
    let writer = ManualUserRepository::new(provider.clone());
    let reader = StatementUserRepository::new(provider);

    let saved = writer.save(User::new("alice", "a@x.com", Some(30))).unwrap();
    let loaded = reader.find_by_id(saved.id.unwrap()).unwrap().unwrap();
    assert_eq!(loaded, saved);
}

#[test]
fn file_backed_store_persists_across_provider_lifetimes() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("users.db");

    let saved = {
        let provider = Arc::new(ConnectionProvider::open(&db_path, 1).unwrap());
        let repo = ManualUserRepository::new(provider);
        repo.save(User::new("durable", "d@x.com", Some(50))).unwrap()
    };

    let provider = Arc::new(ConnectionProvider::open(&db_path, 1).unwrap());
    let repo = StatementUserRepository::new(provider);
    let loaded = repo.find_by_id(saved.id.unwrap()).unwrap().unwrap();
    assert_eq!(loaded, saved);
}
