use userstore_core::User;

#[test]
fn new_user_starts_unpersisted() {
    let user = User::new("alice", "a@x.com", Some(30));
    assert_eq!(user.id, None);
    assert!(!user.is_persisted());
}

#[test]
fn with_id_marks_user_persisted() {
    let user = User::with_id(7, "bob", "b@x.com", None);
    assert_eq!(user.id, Some(7));
    assert!(user.is_persisted());
}

#[test]
fn serde_round_trip_preserves_all_fields() {
    let user = User::with_id(1, "alice", "a@x.com", Some(30));

    let json = serde_json::to_string(&user).unwrap();
    let back: User = serde_json::from_str(&json).unwrap();
    assert_eq!(back, user);
}

#[test]
fn null_fields_serialize_as_json_null() {
    let user = User::new("bob", "b@x.com", None);
    let value = serde_json::to_value(&user).unwrap();
    assert!(value["id"].is_null());
    assert!(value["age"].is_null());
}
