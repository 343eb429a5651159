mod common;

use common::{fp, open_as_master, open_store, store_path, FixedIdentity};
use hwgate_fingerprint::Fingerprint;
use hwgate_store::{access_granted, AuthStore, StoreConfig, StoreError};
use pretty_assertions::assert_eq;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn first_open_creates_allow_list_with_headers_and_master() {
    let dir = TempDir::new().unwrap();
    let master = fp("master");
    let store = open_as_master(&dir, &master);

    let contents = fs::read_to_string(store.path()).unwrap();
    let mut lines = contents.lines();
    assert_eq!(lines.next(), Some("# Authorized Hardware IDs"));
    assert!(lines.next().unwrap().starts_with("# Generated on: "));
    assert_eq!(
        lines.next(),
        Some(format!("# Master HWID: {master}").as_str())
    );
    assert_eq!(lines.next(), Some(master.as_str()));
    assert_eq!(lines.next(), None);
}

#[test]
fn reopen_does_not_recreate_existing_file() {
    let dir = TempDir::new().unwrap();
    let master = fp("master");
    let store = open_as_master(&dir, &master);
    store.add(fp("guest").as_str()).unwrap();
    let before = fs::read(store.path()).unwrap();

    let reopened = open_as_master(&dir, &master);
    assert_eq!(fs::read(reopened.path()).unwrap(), before);
}

#[test]
fn master_machine_is_authorized_after_bootstrap() {
    let dir = TempDir::new().unwrap();
    let master = fp("master");
    let store = open_as_master(&dir, &master);
    assert!(store.is_authorized());
    assert!(store.is_master());
}

#[test]
fn listed_machine_is_authorized_unlisted_is_not() {
    let dir = TempDir::new().unwrap();
    let master = fp("master");
    let f1 = fp("machine-1");
    let f2 = fp("machine-2");
    let f3 = fp("machine-3");

    let store = open_as_master(&dir, &master);
    store.add(f1.as_str()).unwrap();
    store.add(f2.as_str()).unwrap();

    assert!(open_store(&dir, Some(master.clone()), f1).is_authorized());
    assert!(open_store(&dir, Some(master.clone()), f2).is_authorized());
    assert!(!open_store(&dir, Some(master), f3).is_authorized());
}

#[test]
fn non_master_is_not_master() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir, Some(fp("master")), fp("guest"));
    assert!(!store.is_master());
}

#[test]
fn master_can_add_and_grant_access() {
    let dir = TempDir::new().unwrap();
    let master = fp("master");
    let store = open_as_master(&dir, &master);

    let guest = fp("guest");
    store.add(guest.as_str()).unwrap();

    let as_guest = open_store(&dir, Some(master), guest);
    assert!(as_guest.is_authorized());
}

#[test]
fn non_master_mutations_are_denied_and_file_untouched() {
    let dir = TempDir::new().unwrap();
    let master = fp("master");
    open_as_master(&dir, &master);
    let before = fs::read(store_path(&dir)).unwrap();

    let store = open_store(&dir, Some(master), fp("guest"));
    assert!(matches!(
        store.add(fp("other").as_str()),
        Err(StoreError::PermissionDenied)
    ));
    assert!(matches!(
        store.remove(fp("other").as_str()),
        Err(StoreError::PermissionDenied)
    ));
    assert!(matches!(store.list(), Err(StoreError::PermissionDenied)));

    assert_eq!(fs::read(store_path(&dir)).unwrap(), before);
}

#[test]
fn master_fingerprint_cannot_be_removed() {
    let dir = TempDir::new().unwrap();
    let master = fp("master");
    let store = open_as_master(&dir, &master);
    let before = fs::read(store.path()).unwrap();

    assert!(matches!(
        store.remove(master.as_str()),
        Err(StoreError::ProtectedEntry)
    ));
    assert_eq!(fs::read(store.path()).unwrap(), before);
}

#[test]
fn master_removal_is_protected_for_any_caller() {
    let dir = TempDir::new().unwrap();
    let master = fp("master");
    open_as_master(&dir, &master);
    let before = fs::read(store_path(&dir)).unwrap();

    let store = open_store(&dir, Some(master.clone()), fp("guest"));
    assert!(matches!(
        store.remove(master.as_str()),
        Err(StoreError::ProtectedEntry)
    ));
    assert_eq!(fs::read(store_path(&dir)).unwrap(), before);
}

#[test]
fn add_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let master = fp("master");
    let store = open_as_master(&dir, &master);

    let guest = fp("guest");
    store.add(guest.as_str()).unwrap();
    let after_first = fs::read(store.path()).unwrap();
    store.add(guest.as_str()).unwrap();
    assert_eq!(fs::read(store.path()).unwrap(), after_first);

    let occurrences = store
        .list()
        .unwrap()
        .into_iter()
        .filter(|e| *e == guest)
        .count();
    assert_eq!(occurrences, 1);
}

#[test]
fn remove_preserves_relative_order_of_remaining_entries() {
    let dir = TempDir::new().unwrap();
    let master = fp("master");
    let store = open_as_master(&dir, &master);

    let (a, b, c) = (fp("a"), fp("b"), fp("c"));
    store.add(a.as_str()).unwrap();
    store.add(b.as_str()).unwrap();
    store.add(c.as_str()).unwrap();

    store.remove(b.as_str()).unwrap();

    let entries = store.list().unwrap();
    assert_eq!(entries, vec![master.clone(), a, c]);
    assert!(!entries.contains(&b));
}

#[test]
fn remove_missing_entry_reports_not_found() {
    let dir = TempDir::new().unwrap();
    let store = open_as_master(&dir, &fp("master"));
    assert!(matches!(
        store.remove(fp("ghost").as_str()),
        Err(StoreError::NotFound(_))
    ));
}

#[test]
fn remove_rewrites_headers() {
    let dir = TempDir::new().unwrap();
    let master = fp("master");
    let store = open_as_master(&dir, &master);
    store.add(fp("guest").as_str()).unwrap();
    store.remove(fp("guest").as_str()).unwrap();

    let contents = fs::read_to_string(store.path()).unwrap();
    assert!(contents.starts_with("# Authorized Hardware IDs\n"));
    assert!(contents.contains(&format!("# Master HWID: {master}\n")));
}

#[test]
fn entries_match_case_insensitively() {
    let dir = TempDir::new().unwrap();
    let master = fp("master");
    let store = open_as_master(&dir, &master);

    let guest = fp("guest");
    store.add(&guest.as_str().to_ascii_lowercase()).unwrap();

    let as_guest = open_store(&dir, Some(master), guest);
    assert!(as_guest.is_authorized());
}

#[test]
fn load_skips_comments_and_blank_lines() {
    let dir = TempDir::new().unwrap();
    let master = fp("master");
    let guest = fp("guest");
    fs::write(
        store_path(&dir),
        format!("# header\n\n{guest}\n\n# trailing comment\n"),
    )
    .unwrap();

    let store = open_as_master(&dir, &master);
    assert_eq!(store.list().unwrap(), vec![guest]);
}

#[test]
fn missing_file_reads_as_empty_not_an_error() {
    let dir = TempDir::new().unwrap();
    let store = open_as_master(&dir, &fp("master"));
    fs::remove_file(store.path()).unwrap();
    assert!(!store.is_authorized());
    assert_eq!(store.list().unwrap(), vec![]);
}

#[test]
fn malformed_input_is_rejected() {
    let dir = TempDir::new().unwrap();
    let store = open_as_master(&dir, &fp("master"));
    assert!(matches!(
        store.add("not-a-fingerprint"),
        Err(StoreError::InvalidFingerprint(_))
    ));
    assert!(matches!(
        store.remove("short"),
        Err(StoreError::InvalidFingerprint(_))
    ));
}

#[test]
fn unset_master_denies_all_mutations() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir, None, fp("anyone"));
    assert!(!store.is_master());
    assert!(matches!(
        store.add(fp("x").as_str()),
        Err(StoreError::PermissionDenied)
    ));
    assert!(matches!(
        store.remove(fp("x").as_str()),
        Err(StoreError::PermissionDenied)
    ));
    assert!(matches!(store.list(), Err(StoreError::PermissionDenied)));
}

#[test]
fn unset_master_bootstrap_writes_headers_only() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir, None, fp("anyone"));
    let contents = fs::read_to_string(store.path()).unwrap();
    assert!(contents.contains("# Master HWID: unset\n"));
    assert!(contents.lines().all(|l| l.starts_with('#')));
}

#[test]
fn custom_identity_is_respected() {
    let dir = TempDir::new().unwrap();
    let master = fp("master");
    let config = StoreConfig::new(Some(master.clone())).with_path(store_path(&dir));
    let store = AuthStore::with_identity(config, Arc::new(FixedIdentity(master))).unwrap();
    assert!(store.is_master());
}

#[test]
fn access_granted_for_bootstrapped_master_machine() {
    let dir = TempDir::new().unwrap();
    let config =
        StoreConfig::new(Some(Fingerprint::current())).with_path(store_path(&dir));
    assert!(access_granted(Some(config)));
}

#[test]
fn access_denied_when_not_listed() {
    let dir = TempDir::new().unwrap();
    let config = StoreConfig::new(None).with_path(store_path(&dir));
    assert!(!access_granted(Some(config)));
}
