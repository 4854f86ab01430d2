use hr_chat_client::services::session_store::{
    FileStore, KeyValueStore, MemoryStore, SESSION_KEY, get_or_create_session_id,
};

#[test]
fn session_id_is_stable_within_a_scope() {
    let store = MemoryStore::new();
    let first = get_or_create_session_id(&store).unwrap();
    let second = get_or_create_session_id(&store).unwrap();
    assert!(!first.is_empty());
    assert_eq!(first, second);
    assert_eq!(store.get(SESSION_KEY).unwrap(), Some(first));
}

#[test]
fn fresh_scopes_get_different_ids() {
    let a = get_or_create_session_id(&MemoryStore::new()).unwrap();
    let b = get_or_create_session_id(&MemoryStore::new()).unwrap();
    assert_ne!(a, b);
}

#[test]
fn clearing_storage_rotates_the_id() {
    let store = MemoryStore::new();
    let before = get_or_create_session_id(&store).unwrap();
    store.clear();
    let after = get_or_create_session_id(&store).unwrap();
    assert_ne!(before, after);
}

#[test]
fn existing_id_is_reused_verbatim() {
    let store = MemoryStore::new();
    store.set(SESSION_KEY, "k3x9q2").unwrap();
    assert_eq!(get_or_create_session_id(&store).unwrap(), "k3x9q2");
}

#[test]
fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("storage.json");

    let sid = get_or_create_session_id(&FileStore::new(&path)).unwrap();
    let reopened = FileStore::new(&path);
    assert_eq!(get_or_create_session_id(&reopened).unwrap(), sid);
    assert_eq!(reopened.get(SESSION_KEY).unwrap(), Some(sid));
}

#[test]
fn file_store_keeps_other_keys() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("storage.json"));
    store.set("theme", "dark").unwrap();
    let sid = get_or_create_session_id(&store).unwrap();

    assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
    assert_eq!(store.get(SESSION_KEY).unwrap(), Some(sid));
    assert_eq!(store.get("missing").unwrap(), None);
}

#[test]
fn corrupt_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "{not json").unwrap();

    assert!(get_or_create_session_id(&FileStore::new(&path)).is_err());
}
