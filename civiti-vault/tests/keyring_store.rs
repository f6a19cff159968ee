use civiti_vault::{ChunkedStorage, KeyringStore, SecureStore, SessionStorage};

fn service() -> String {
    format!("civiti-vault-test-{}", std::process::id())
}

#[tokio::test]
#[ignore = "needs an OS credential store"]
async fn test_keyring_value_persists_across_entries() {
    let store = KeyringStore::new(service());

    store.set_item("sb-auth-token", "session").await.unwrap();
    assert_eq!(
        store.get_item("sb-auth-token").await.unwrap().as_deref(),
        Some("session")
    );

    store.delete_item("sb-auth-token").await.unwrap();
    assert_eq!(store.get_item("sb-auth-token").await.unwrap(), None);
    // deleting an absent entry is a no-op
    store.delete_item("sb-auth-token").await.unwrap();
}

#[tokio::test]
#[ignore = "needs an OS credential store"]
async fn test_chunked_session_round_trip_in_keyring() {
    let storage = ChunkedStorage::new(KeyringStore::new(service()));
    let session = format!("{{\"access_token\":\"{}\"}}", "t".repeat(5000));

    storage.set_item("sb-chunked", &session).await.unwrap();
    assert_eq!(storage.get_item("sb-chunked").await.unwrap(), Some(session));

    storage.remove_item("sb-chunked").await.unwrap();
    assert_eq!(storage.get_item("sb-chunked").await.unwrap(), None);
}

