use super::*;

#[test]
fn file_storage_round_trips_and_removes() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().join("nested"));

    assert_eq!(storage.get_item("access_token").unwrap(), None);
    storage.set_item("access_token", "tok-1").unwrap();
    assert_eq!(storage.get_item("access_token").unwrap().as_deref(), Some("tok-1"));

    storage.set_item("access_token", "tok-2").unwrap();
    assert_eq!(storage.get_item("access_token").unwrap().as_deref(), Some("tok-2"));

    storage.remove_item("access_token").unwrap();
    assert_eq!(storage.get_item("access_token").unwrap(), None);
    // Removing again is fine.
    storage.remove_item("access_token").unwrap();
}

#[cfg(unix)]
#[test]
fn file_storage_writes_owner_only_files() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());
    storage.set_item("access_token", "secret").unwrap();
    let mode = std::fs::metadata(dir.path().join("access_token")).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn file_storage_rejects_path_like_keys() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());
    assert!(matches!(storage.set_item("../escape", "x"), Err(ApiError::Storage(_))));
    assert!(matches!(storage.get_item(""), Err(ApiError::Storage(_))));
}

#[test]
fn memory_storage_clones_share_items() {
    let storage = MemoryStorage::new();
    let handle = storage.clone();
    storage.set_item("user", "{}").unwrap();
    assert_eq!(handle.get_item("user").unwrap().as_deref(), Some("{}"));
    assert_eq!(handle.len(), 1);
    handle.remove_item("user").unwrap();
    assert!(storage.is_empty());
}

#[test]
fn load_json_treats_garbage_as_missing() {
    let storage = MemoryStorage::new();
    storage.set_item("user", "{not json").unwrap();
    let loaded: Option<serde_json::Value> = load_json(&storage, "user");
    assert!(loaded.is_none());
}

#[test]
fn save_then_load_json() {
    let storage = MemoryStorage::new();
    save_json(&storage, "prefs", &serde_json::json!({ "mode": "kanban" })).unwrap();
    let loaded: serde_json::Value = load_json(&storage, "prefs").unwrap();
    assert_eq!(loaded["mode"], "kanban");
}
