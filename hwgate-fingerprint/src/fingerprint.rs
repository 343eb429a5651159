//! The `Fingerprint` type and its derivation.
//!
//! A fingerprint is the first 16 bytes of the SHA-256 digest of a
//! pipe-joined, order-dependent list of hardware identifiers, rendered as
//! 32 uppercase hexadecimal characters.

use crate::device::DeviceInfo;
use crate::probe::PlatformFamily;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

/// Length of a fingerprint string in characters.
pub const FINGERPRINT_LEN: usize = 32;

/// Error returned when a string is not a well-formed fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid fingerprint {0:?}: expected 32 hex characters")]
pub struct InvalidFingerprint(pub String);

/// A stable identifier for a machine, derived from hardware identifiers.
///
/// Always 32 uppercase hexadecimal characters. Two fingerprints compare
/// equal exactly when their canonical string forms match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Derives the fingerprint of the current machine.
    ///
    /// Collects hardware identifiers for the detected platform family and
    /// hashes them. When every probe comes up empty the fingerprint is
    /// recomputed from basic host facts, so the call always succeeds:
    /// fidelity degrades, the caller still gets a comparable value.
    #[must_use]
    pub fn current() -> Self {
        let family = PlatformFamily::detect();
        let components = family.collect();
        if components.is_empty() {
            warn!(platform = %family, "no hardware identity sources available, using degraded fingerprint");
            let info = DeviceInfo::collect();
            return Self::from_components(&info.fallback_components());
        }
        Self::from_components(&components)
    }

    /// Derives a fingerprint from an ordered list of raw identifier strings.
    ///
    /// Empty components are skipped; the rest are joined with `|` in the
    /// given order and hashed. Same components in the same order always
    /// produce the same fingerprint.
    #[must_use]
    pub fn from_components<S: AsRef<str>>(components: &[S]) -> Self {
        let combined = components
            .iter()
            .map(AsRef::as_ref)
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join("|");

        let mut hasher = Sha256::new();
        hasher.update(combined.as_bytes());
        let hash = hasher.finalize();

        Self(hex::encode_upper(&hash[..FINGERPRINT_LEN / 2]))
    }

    /// Parses a fingerprint string, normalizing it to canonical uppercase.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidFingerprint`] unless the trimmed input is exactly
    /// 32 ASCII hex characters.
    pub fn parse(s: &str) -> Result<Self, InvalidFingerprint> {
        let s = s.trim();
        if s.len() == FINGERPRINT_LEN && s.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(Self(s.to_ascii_uppercase()))
        } else {
            Err(InvalidFingerprint(s.to_string()))
        }
    }

    /// Returns the fingerprint as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Fingerprint {
    type Err = InvalidFingerprint;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
