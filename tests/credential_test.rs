use serde_json::Value;
use setlistify::{management::CredentialStore, types::Credential};
use tempfile::TempDir;

fn credential(access: &str, issued_at: i64) -> Credential {
    Credential {
        access_token: access.to_string(),
        refresh_token: "refresh".to_string(),
        expires_in: 3600,
        token_type: "Bearer".to_string(),
        issued_at,
    }
}

#[tokio::test]
async fn test_save_and_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cache/token.json");
    let stored = credential("access", 1_700_000_000_000);

    let store = CredentialStore::with_credential(&path, stored.clone());
    assert!(store.save().await);

    let mut reloaded = CredentialStore::new(&path);
    assert!(reloaded.load().await);
    assert_eq!(reloaded.current(), Some(&stored));
}

#[tokio::test]
async fn test_saved_file_layout() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("token.json");

    let store = CredentialStore::with_credential(&path, credential("access", 42));
    assert!(store.save().await);

    let json: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["access_token"], "access");
    assert_eq!(json["refresh_token"], "refresh");
    assert_eq!(json["expires_in"], 3600);
    assert_eq!(json["token_type"], "Bearer");
    assert_eq!(json["timestamp_ms"], 42);

    // temp file is renamed away
    assert!(!dir.path().join("token.json.tmp").exists());
}

#[tokio::test]
async fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let mut store = CredentialStore::new(dir.path().join("token.json"));

    assert!(!store.load().await);
    assert!(store.current().is_none());
    assert!(store.is_expired());
}

#[tokio::test]
async fn test_load_invalid_file_keeps_current() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("token.json");
    let mut store = CredentialStore::with_credential(&path, credential("kept", 1));

    std::fs::write(&path, "{ not json").unwrap();
    assert!(!store.load().await);

    // a field is missing
    std::fs::write(
        &path,
        r#"{"access_token":"a","refresh_token":"r","expires_in":3600,"token_type":"Bearer"}"#,
    )
    .unwrap();
    assert!(!store.load().await);

    assert_eq!(store.current().unwrap().access_token, "kept");
}

#[tokio::test]
async fn test_save_without_credential() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("token.json");

    let store = CredentialStore::new(&path);
    assert!(!store.save().await);
    assert!(!path.exists());
}

#[tokio::test]
async fn test_update_replaces_and_persists() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("token.json");
    let mut store = CredentialStore::with_credential(&path, credential("old", 1));
    assert!(store.save().await);

    assert!(store.update(credential("new", 2)).await);
    assert_eq!(store.current().unwrap().access_token, "new");

    let mut reloaded = CredentialStore::new(&path);
    assert!(reloaded.load().await);
    assert_eq!(reloaded.current().unwrap().access_token, "new");
}

#[tokio::test]
async fn test_update_keeps_memory_when_save_fails() {
    let dir = TempDir::new().unwrap();
    // parent is a regular file, so the directory cannot be created
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();
    let mut store = CredentialStore::new(blocker.join("token.json"));

    assert!(!store.update(credential("new", 2)).await);
    assert_eq!(store.current().unwrap().access_token, "new");
}

#[test]
fn test_store_expiry() {
    let issued_at = 1_000_000;
    let boundary = issued_at + (3600 - 300) * 1000;
    let store = CredentialStore::with_credential("token.json", credential("a", issued_at));

    assert!(!store.is_expired_at(boundary - 1));
    assert!(store.is_expired_at(boundary));

    // no credential at all
    let empty = CredentialStore::new("token.json");
    assert!(empty.is_expired_at(0));
}
