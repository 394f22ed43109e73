use std::sync::Arc;

use super::*;

#[test]
fn memory_store_round_trips_and_clears() {
    let store = MemoryTokenStore::new();
    assert_eq!(store.get(), None);

    store.set("jwt-1").expect("set");
    assert_eq!(store.get().as_deref(), Some("jwt-1"));

    store.clear().expect("clear");
    assert_eq!(store.get(), None);
}

#[test]
fn file_store_creates_parent_dir_and_trims_content() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("token");
    let store = FileTokenStore::new(&path);

    assert_eq!(store.get(), None);
    store.set("abc.def.ghi").expect("set");
    assert!(path.exists());

    std::fs::write(&path, "abc.def.ghi\n").expect("rewrite");
    assert_eq!(store.get().as_deref(), Some("abc.def.ghi"));
}

#[test]
fn file_store_clear_is_idempotent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileTokenStore::new(dir.path().join("token"));

    store.clear().expect("clear missing file");
    store.set("t").expect("set");
    store.clear().expect("clear");
    store.clear().expect("clear again");
    assert_eq!(store.get(), None);
}

#[test]
fn empty_token_counts_as_signed_out() {
    let session = SessionContext::new(Arc::new(MemoryTokenStore::with_token("")));
    assert!(!session.is_authenticated());
    assert!(matches!(
        session.require_token(),
        Err(ClientError::Unauthenticated)
    ));
}

#[test]
fn sign_in_and_sign_out_go_through_the_store() {
    let store = Arc::new(MemoryTokenStore::new());
    let session = SessionContext::new(store.clone());

    session.sign_in("jwt").expect("sign in");
    assert_eq!(store.get().as_deref(), Some("jwt"));
    assert_eq!(session.require_token().expect("token"), "jwt");

    session.sign_out().expect("sign out");
    assert!(!session.is_authenticated());
}

#[cfg(unix)]
#[test]
fn file_store_keeps_token_private_to_owner() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().expect("tempdir");
    let fresh = dir.path().join("token");
    FileTokenStore::new(&fresh).set("jwt").expect("set");
    let mode = std::fs::metadata(&fresh).expect("metadata").permissions().mode();
    assert_eq!(mode & 0o777, 0o600);

    let existing = dir.path().join("old-token");
    std::fs::write(&existing, "stale-token-value").expect("write");
    std::fs::set_permissions(&existing, std::fs::Permissions::from_mode(0o644)).expect("chmod");
    let store = FileTokenStore::new(&existing);
    store.set("jwt").expect("set");
    let mode = std::fs::metadata(&existing).expect("metadata").permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
    assert_eq!(store.get().as_deref(), Some("jwt"));
}
