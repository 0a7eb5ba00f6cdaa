use std::sync::Arc;
use userstore_core::{
    BatchUserRepository, ConnectionProvider, ManualUserRepository, RepoError,
    StatementUserRepository, User, UserRepository,
};

fn fresh_provider() -> Arc<ConnectionProvider> {
    Arc::new(ConnectionProvider::open_in_memory(2).expect("in-memory provider should open"))
}

/// Makes duplicate emails fail, so a batch can be broken mid-way at a
/// chosen position.
fn inject_unique_email_constraint(provider: &ConnectionProvider) {
    let conn = provider.acquire().expect("pool should have a connection");
    conn.execute("CREATE UNIQUE INDEX users_email_unique ON users(email)", [])
        .expect("unique index should be created");
}

fn batch_of_three() -> Vec<User> {
    vec![
        User::new("alice", "a@x.com", Some(30)),
        User::new("bob", "b@x.com", Some(25)),
        User::new("carol", "c@x.com", None),
    ]
}

#[test]
fn manual_batch_assigns_distinct_ids_in_insertion_order() {
    let repo = ManualUserRepository::new(fresh_provider());

    let saved = repo.save_all(batch_of_three()).unwrap();
    assert_eq!(saved.len(), 3);

    let names: Vec<&str> = saved.iter().map(|user| user.username.as_str()).collect();
    assert_eq!(names, ["alice", "bob", "carol"]);

    let ids: Vec<i64> = saved.iter().map(|user| user.id.unwrap()).collect();
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));

    assert_eq!(repo.find_all().unwrap().len(), 3);
}

#[test]
fn manual_batch_rolls_back_completely_on_mid_batch_failure() {
    let provider = fresh_provider();
    inject_unique_email_constraint(&provider);
    let repo = ManualUserRepository::new(provider);

    let seed = repo.save(User::new("seed", "taken@x.com", None)).unwrap();

    let doomed = vec![
        User::new("ok-before-failure", "fresh@x.com", Some(20)),
        User::new("collides", "taken@x.com", Some(21)),
        User::new("never-reached", "later@x.com", Some(22)),
    ];
    let err = repo.save_all(doomed).unwrap_err();
    assert!(matches!(err, RepoError::Persistence { .. }));

    // The store is exactly as before the call: only the seed row.
    let all = repo.find_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, seed.id);
    assert_eq!(all[0].username, "seed");
}

#[test]
fn manual_batch_of_zero_rows_is_ok() {
    let repo = ManualUserRepository::new(fresh_provider());
    assert!(repo.save_all(Vec::new()).unwrap().is_empty());
    assert!(repo.find_all().unwrap().is_empty());
}

#[test]
fn statement_batch_leaves_committed_prefix_on_failure() {
    let provider = fresh_provider();
    inject_unique_email_constraint(&provider);
    let repo = StatementUserRepository::new(provider);

    repo.save(User::new("seed", "taken@x.com", None)).unwrap();

    let doomed = vec![
        User::new("committed-anyway", "fresh@x.com", Some(20)),
        User::new("collides", "taken@x.com", Some(21)),
    ];
    let err = repo.save_all(doomed).unwrap_err();
    assert!(matches!(err, RepoError::Persistence { .. }));

    // Documented non-atomic behavior: the first batch row stays.
    let mut names: Vec<String> = repo
        .find_all()
        .unwrap()
        .into_iter()
        .map(|user| user.username)
        .collect();
    names.sort();
    assert_eq!(names, ["committed-anyway", "seed"]);
}

#[test]
fn batch_template_correlates_keys_to_entities_by_index() {
    let repo = BatchUserRepository::new(fresh_provider());

    let saved = repo.save_all(batch_of_three()).unwrap();
    assert_eq!(saved.len(), 3);

    for user in &saved {
        let loaded = repo.find_by_id(user.id.unwrap()).unwrap().unwrap();
        assert_eq!(&loaded, user, "key must belong to the entity at its index");
    }
}

#[test]
fn batch_template_is_not_atomic() {
    let provider = fresh_provider();
    inject_unique_email_constraint(&provider);
    let repo = BatchUserRepository::new(provider);

    let doomed = vec![
        User::new("committed-anyway", "fresh@x.com", Some(20)),
        User::new("collides", "fresh@x.com", Some(21)),
    ];
    let err = repo.save_all(doomed).unwrap_err();
    assert!(matches!(err, RepoError::Persistence { .. }));

    assert_eq!(repo.find_all().unwrap().len(), 1);
}

#[test]
fn named_update_is_effect_equivalent_to_update() {
    let repo = BatchUserRepository::new(fresh_provider());

    let saved = repo.save(User::new("erin", "e@x.com", Some(33))).unwrap();
    let id = saved.id.unwrap();

    let mut changed = saved;
    changed.username = "erin-renamed".to_string();
    changed.email = "erin2@x.com".to_string();
    changed.age = Some(34);
    let returned = repo.named_update(changed.clone()).unwrap();
    assert_eq!(returned, changed);

    let loaded = repo.find_by_id(id).unwrap().unwrap();
    assert_eq!(loaded, changed);
}

#[test]
fn named_update_of_missing_row_is_a_noop() {
    let repo = BatchUserRepository::new(fresh_provider());

    let ghost = User::with_id(777, "ghost", "g@x.com", None);
    let returned = repo.named_update(ghost.clone()).unwrap();
    assert_eq!(returned, ghost);
    assert!(repo.find_all().unwrap().is_empty());
}
