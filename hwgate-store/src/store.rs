//! The persisted allow-list and its master-gated operations.
//!
//! The store owns a line-delimited text file of fingerprints. Every
//! operation reloads the file; there is no in-memory state between calls.
//! Concurrent mutation from multiple processes is unsynchronized
//! (last-writer-wins on rewrite).

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use hwgate_fingerprint::{DeviceInfo, Fingerprint, HostIdentity, MachineIdentity};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Comment marker for allow-list lines.
const COMMENT: char = '#';

/// A persisted allow-list of machine fingerprints with one master
/// fingerprint privileged to edit it.
pub struct AuthStore {
    config: StoreConfig,
    identity: Arc<dyn MachineIdentity>,
}

impl AuthStore {
    /// Opens a store, bootstrapping its backing storage.
    ///
    /// Creates the parent directory if missing (idempotent) and, when the
    /// allow-list file does not exist, writes header comments plus the
    /// master fingerprint as the sole initial entry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] if the directory or file cannot
    /// be created.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        Self::with_identity(config, Arc::new(HostIdentity))
    }

    /// Opens a store with a custom machine identity source.
    pub fn with_identity(
        config: StoreConfig,
        identity: Arc<dyn MachineIdentity>,
    ) -> StoreResult<Self> {
        if let Some(dir) = config.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let store = Self { config, identity };
        if !store.config.path.exists() {
            store.create_allow_list()?;
        }
        Ok(store)
    }

    /// Path of the persisted allow-list file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// The configured master fingerprint, if any.
    #[must_use]
    pub fn master(&self) -> Option<&Fingerprint> {
        self.config.master.as_ref()
    }

    /// Returns true if the current machine's fingerprint is on the
    /// allow-list.
    ///
    /// Never fails: an unreadable allow-list reads as empty, so faults
    /// resolve to "not authorized".
    #[must_use]
    pub fn is_authorized(&self) -> bool {
        let current = self.identity.current();
        self.load().contains(&current)
    }

    /// Returns true if the current machine is the master.
    #[must_use]
    pub fn is_master(&self) -> bool {
        match &self.config.master {
            Some(master) => self.identity.current() == *master,
            None => false,
        }
    }

    /// Adds a fingerprint to the allow-list. Master only.
    ///
    /// Appends a single line; adding an already-present fingerprint is a
    /// successful no-op that leaves the file untouched.
    ///
    /// # Errors
    ///
    /// [`StoreError::PermissionDenied`] unless the caller is master,
    /// [`StoreError::InvalidFingerprint`] for malformed input,
    /// [`StoreError::Persistence`] if the append fails.
    pub fn add(&self, hwid: &str) -> StoreResult<()> {
        if !self.is_master() {
            return Err(StoreError::PermissionDenied);
        }
        let fp = Fingerprint::parse(hwid)?;
        if self.load().contains(&fp) {
            debug!(%fp, "fingerprint already authorized");
            return Ok(());
        }
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.config.path)?;
        writeln!(file, "{fp}")?;
        info!(%fp, "fingerprint added to allow-list");
        Ok(())
    }

    /// Removes a fingerprint from the allow-list. Master only.
    ///
    /// Rewrites the whole file: header comments plus the remaining entries
    /// in their post-removal order.
    ///
    /// # Errors
    ///
    /// [`StoreError::ProtectedEntry`] if the target is the master
    /// fingerprint (checked first, whoever the caller is),
    /// [`StoreError::PermissionDenied`] unless the caller is master,
    /// [`StoreError::NotFound`] if the target is absent,
    /// [`StoreError::Persistence`] if the rewrite fails.
    pub fn remove(&self, hwid: &str) -> StoreResult<()> {
        let fp = Fingerprint::parse(hwid)?;
        if self.config.master.as_ref() == Some(&fp) {
            return Err(StoreError::ProtectedEntry);
        }
        if !self.is_master() {
            return Err(StoreError::PermissionDenied);
        }
        let mut entries = self.load();
        let Some(pos) = entries.iter().position(|e| *e == fp) else {
            return Err(StoreError::NotFound(fp.to_string()));
        };
        entries.remove(pos);
        self.rewrite(&entries)?;
        info!(%fp, "fingerprint removed from allow-list");
        Ok(())
    }

    /// Lists the allow-list entries in file order. Master only.
    ///
    /// # Errors
    ///
    /// [`StoreError::PermissionDenied`] unless the caller is master.
    pub fn list(&self) -> StoreResult<Vec<Fingerprint>> {
        if !self.is_master() {
            return Err(StoreError::PermissionDenied);
        }
        Ok(self.load())
    }

    /// Loads the persisted entries in file order.
    ///
    /// Blank lines and comment lines are skipped; entries are normalized to
    /// uppercase. A missing or unreadable file yields the empty set (logged,
    /// never fatal) so queries default to deny.
    fn load(&self) -> Vec<Fingerprint> {
        let contents = match fs::read_to_string(&self.config.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                warn!(
                    path = %self.config.path.display(),
                    %err,
                    "failed to read allow-list, treating as empty"
                );
                return Vec::new();
            }
        };

        let mut entries = Vec::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(COMMENT) {
                continue;
            }
            match Fingerprint::parse(line) {
                Ok(fp) => entries.push(fp),
                Err(err) => warn!(%err, "skipping malformed allow-list entry"),
            }
        }
        entries
    }

    fn create_allow_list(&self) -> StoreResult<()> {
        let mut file = fs::File::create(&self.config.path)?;
        write!(file, "{}", self.header())?;
        if let Some(master) = &self.config.master {
            writeln!(file, "{master}")?;
        }
        info!(path = %self.config.path.display(), "created allow-list");
        Ok(())
    }

    fn rewrite(&self, entries: &[Fingerprint]) -> StoreResult<()> {
        let mut out = self.header();
        for entry in entries {
            out.push_str(entry.as_str());
            out.push('\n');
        }
        fs::write(&self.config.path, out)?;
        Ok(())
    }

    fn header(&self) -> String {
        let host = DeviceInfo::collect().hostname;
        let master = self
            .config
            .master
            .as_ref()
            .map_or_else(|| "unset".to_string(), ToString::to_string);
        format!("# Authorized Hardware IDs\n# Generated on: {host}\n# Master HWID: {master}\n")
    }
}

/// Convenience gate for embedding at the top of a protected program.
///
/// Opens the store (default configuration when `None`) and reports whether
/// the current machine is authorized. Any failure to open the store counts
/// as not authorized. Acting on the verdict is the caller's job; this
/// never terminates the process.
#[must_use]
pub fn access_granted(config: Option<StoreConfig>) -> bool {
    match AuthStore::open(config.unwrap_or_default()) {
        Ok(store) => store.is_authorized(),
        Err(err) => {
            warn!(%err, "could not open authorization store, denying access");
            false
        }
    }
}
