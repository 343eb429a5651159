//! Store configuration.

use hwgate_fingerprint::Fingerprint;
use std::path::PathBuf;

/// File name of the persisted allow-list.
const ALLOW_LIST_FILE: &str = "authorized_hwids.txt";

/// Directory name under the platform data directory.
const STORE_DIR: &str = "hwgate";

/// Configuration for an authorization store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// The master fingerprint. `None` denies every mutation.
    pub master: Option<Fingerprint>,
    /// Path of the persisted allow-list file.
    pub path: PathBuf,
}

impl StoreConfig {
    /// Creates a configuration with the default allow-list path.
    #[must_use]
    pub fn new(master: Option<Fingerprint>) -> Self {
        Self {
            master,
            path: default_store_path(),
        }
    }

    /// Overrides the allow-list path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Default allow-list location:
/// `<platform data dir>/hwgate/authorized_hwids.txt`, or the current
/// directory when the platform reports no data directory.
#[must_use]
pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(STORE_DIR)
        .join(ALLOW_LIST_FILE)
}
