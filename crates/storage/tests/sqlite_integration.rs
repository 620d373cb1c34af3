use quiz_core::time::fixed_now;
use storage::repository::{CredentialRecord, CredentialRepository};
use storage::sqlite::SqliteStore;

fn build_record(token: &str) -> CredentialRecord {
    CredentialRecord {
        token: token.into(),
        user_name: "Ada".into(),
        user_email: "ada@example.com".into(),
        saved_at: fixed_now(),
    }
}

#[tokio::test]
async fn sqlite_roundtrip_persists_credentials() {
    let store = SqliteStore::connect("sqlite:file:memdb_creds?mode=memory&cache=shared")
        .await
        .expect("connect");
    store.migrate().await.expect("migrate");

    assert_eq!(store.load().await.unwrap(), None);

    store.save(&build_record("first")).await.unwrap();
    let loaded = store.load().await.unwrap().expect("record");
    assert_eq!(loaded.token, "first");
    assert_eq!(loaded.user_email, "ada@example.com");
    assert_eq!(loaded.saved_at, fixed_now());
}

#[tokio::test]
async fn sqlite_save_overwrites_and_clear_empties() {
    let store = SqliteStore::connect("sqlite:file:memdb_creds_overwrite?mode=memory&cache=shared")
        .await
        .expect("connect");
    store.migrate().await.expect("migrate");

    store.save(&build_record("first")).await.unwrap();
    store.save(&build_record("second")).await.unwrap();
    let loaded = store.load().await.unwrap().expect("record");
    assert_eq!(loaded.token, "second");

    store.clear().await.unwrap();
    assert_eq!(store.load().await.unwrap(), None);

    // Clearing an already-empty store stays a no-op.
    store.clear().await.unwrap();
}
