//! Hardware fingerprint derivation for hwgate.
//!
//! Produces a stable, opaque identifier for the running machine by hashing
//! platform-specific hardware identifiers. The authorization store compares
//! this identifier against its allow-list to decide whether the current
//! machine may run protected code.
//!
//! # Design Principles
//!
//! - **Total**: derivation never fails. A probe that cannot produce data is
//!   skipped; if every probe comes up empty, a degraded fingerprint is
//!   computed from basic host facts instead.
//! - **Deterministic**: the same sources in the same order always hash to
//!   the same fingerprint on an unchanged machine.
//! - **Comparative identity**: fingerprints identify a machine well enough
//!   for allow-list membership. They are not tamper-proof and make no
//!   cryptographic claim beyond the stability of the underlying hash.

mod device;
mod fingerprint;
mod identity;
mod probe;

pub use device::DeviceInfo;
pub use fingerprint::{Fingerprint, InvalidFingerprint, FINGERPRINT_LEN};
pub use identity::{HostIdentity, MachineIdentity};
pub use probe::PlatformFamily;
