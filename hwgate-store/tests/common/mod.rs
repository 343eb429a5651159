//! Shared helpers for store tests.

#![allow(dead_code)]

use hwgate_fingerprint::{Fingerprint, MachineIdentity};
use hwgate_store::{AuthStore, StoreConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Identity that always reports a fixed fingerprint.
pub struct FixedIdentity(pub Fingerprint);

impl MachineIdentity for FixedIdentity {
    fn current(&self) -> Fingerprint {
        self.0.clone()
    }
}

/// Deterministic fingerprint fixture derived from a seed string.
pub fn fp(seed: &str) -> Fingerprint {
    Fingerprint::from_components(&[seed])
}

/// Allow-list path inside a test directory.
pub fn store_path(dir: &TempDir) -> PathBuf {
    dir.path().join("authorized_hwids.txt")
}

/// Opens a store in `dir` with the given master and caller fingerprints.
pub fn open_store(dir: &TempDir, master: Option<Fingerprint>, caller: Fingerprint) -> AuthStore {
    let config = StoreConfig::new(master).with_path(store_path(dir));
    AuthStore::with_identity(config, Arc::new(FixedIdentity(caller))).unwrap()
}

/// Opens a store where the caller is the master.
pub fn open_as_master(dir: &TempDir, master: &Fingerprint) -> AuthStore {
    open_store(dir, Some(master.clone()), master.clone())
}
