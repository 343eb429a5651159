//! Allow-list authorization gated by hardware fingerprint.
//!
//! This crate persists an ordered set of authorized machine fingerprints as
//! a line-delimited text file and answers one question for protected code:
//! is the current machine on the list? A single configured master
//! fingerprint holds the exclusive privilege to edit the list.
//!
//! # Design Principles
//!
//! - **Default deny**: queries never fail outward. An unreadable or missing
//!   allow-list reads as empty, so faults resolve to "not authorized".
//! - **Master-gated mutation**: `add`, `remove`, and `list` require the
//!   caller's derived fingerprint to equal the configured master. An unset
//!   master denies every mutation.
//! - **Explicit outcomes**: permission and validation failures are distinct
//!   error kinds, so callers can tell "denied" from "not found" from
//!   "already satisfied".
//! - **No process control**: the library reports verdicts; terminating on a
//!   denial is the caller's decision.
//!
//! # Allow-list format
//!
//! Lines starting with `#` are comments; every other non-blank line is a
//! fingerprint entry, case-insensitive but canonically uppercase.

mod config;
mod error;
mod store;

pub use config::{default_store_path, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use store::{access_granted, AuthStore};
