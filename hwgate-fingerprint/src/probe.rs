//! Platform-specific hardware identity probes.
//!
//! The platform family is detected once and selects a fixed, ordered list
//! of sources. Each probe is independently fallible and returns
//! `Option<String>`; a probe that fails contributes nothing to the
//! fingerprint.

use std::fmt;
use std::fs;
use std::process::Command;
use tracing::debug;

/// The platform family of the running host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformFamily {
    /// Windows, probed through `wmic`.
    Windows,
    /// Linux, probed through `/etc/machine-id`, `/proc/cpuinfo`, and DMI.
    Linux,
    /// macOS, probed through `ioreg`.
    MacOs,
    /// Any platform without dedicated probes; uses generic host facts.
    Other,
}

impl PlatformFamily {
    /// Detects the family of the running host.
    #[must_use]
    pub fn detect() -> Self {
        match std::env::consts::OS {
            "windows" => Self::Windows,
            "linux" => Self::Linux,
            "macos" => Self::MacOs,
            _ => Self::Other,
        }
    }

    /// Collects the ordered hardware identifiers for this family.
    ///
    /// Sources that fail or return nothing are skipped with a debug
    /// diagnostic. The per-family source order is fixed; it is part of the
    /// fingerprint contract.
    #[must_use]
    pub fn collect(&self) -> Vec<String> {
        let mut ids = Vec::new();
        match self {
            Self::Windows => {
                push_source(&mut ids, "wmic cpu ProcessorId", wmic_value("cpu", "ProcessorId"));
                push_source(
                    &mut ids,
                    "wmic baseboard SerialNumber",
                    wmic_value("baseboard", "SerialNumber"),
                );
                push_source(&mut ids, "wmic bios SerialNumber", wmic_value("bios", "SerialNumber"));
            }
            Self::Linux => {
                push_source(&mut ids, "machine-id", linux_machine_id());
                push_source(&mut ids, "cpuinfo processor", linux_cpu_descriptor());
                push_source(&mut ids, "dmi product_uuid", linux_product_uuid());
            }
            Self::MacOs => {
                push_source(&mut ids, "IOPlatformUUID", ioreg_value("IOPlatformUUID"));
                push_source(
                    &mut ids,
                    "IOPlatformSerialNumber",
                    ioreg_value("IOPlatformSerialNumber"),
                );
            }
            Self::Other => {
                push_source(&mut ids, "hostname", crate::device::try_hostname());
                push_source(&mut ids, "arch", Some(std::env::consts::ARCH.to_string()));
                push_source(&mut ids, "processor", crate::device::try_processor());
            }
        }
        ids
    }
}

impl fmt::Display for PlatformFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Windows => "windows",
            Self::Linux => "linux",
            Self::MacOs => "macos",
            Self::Other => "other",
        };
        write!(f, "{name}")
    }
}

fn push_source(ids: &mut Vec<String>, source: &str, value: Option<String>) {
    match value {
        Some(v) if !v.trim().is_empty() => ids.push(v.trim().to_string()),
        _ => debug!(source, "identity source unavailable"),
    }
}

/// Runs `wmic <class> get <key> /value` and extracts the value.
fn wmic_value(class: &str, key: &str) -> Option<String> {
    Command::new("wmic")
        .args([class, "get", key, "/value"])
        .output()
        .ok()
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .and_then(|out| parse_wmic_value(&out))
}

/// Extracts the value from `Key=Value` output of `wmic ... /value`.
fn parse_wmic_value(output: &str) -> Option<String> {
    output
        .lines()
        .find_map(|line| line.trim().split_once('='))
        .map(|(_, value)| value.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn linux_machine_id() -> Option<String> {
    fs::read_to_string("/etc/machine-id")
        .or_else(|_| fs::read_to_string("/var/lib/dbus/machine-id"))
        .ok()
        .map(|s| s.trim().to_string())
}

fn linux_cpu_descriptor() -> Option<String> {
    fs::read_to_string("/proc/cpuinfo")
        .ok()
        .and_then(|c| parse_cpuinfo_processor(&c))
}

/// First `processor : N` line of `/proc/cpuinfo`.
fn parse_cpuinfo_processor(cpuinfo: &str) -> Option<String> {
    cpuinfo
        .lines()
        .find(|l| l.starts_with("processor") && l.contains(':'))
        .and_then(|l| l.split(':').nth(1))
        .map(|v| v.trim().to_string())
}

fn linux_product_uuid() -> Option<String> {
    fs::read_to_string("/sys/class/dmi/id/product_uuid")
        .ok()
        .map(|s| s.trim().to_string())
}

/// Queries `ioreg -rd1 -c IOPlatformExpertDevice` for a quoted property.
fn ioreg_value(key: &str) -> Option<String> {
    Command::new("ioreg")
        .args(["-rd1", "-c", "IOPlatformExpertDevice"])
        .output()
        .ok()
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .and_then(|out| parse_ioreg_value(&out, key))
}

/// Extracts a property value from `ioreg` output, e.g.
/// `"IOPlatformUUID" = "564D-..."`.
fn parse_ioreg_value(output: &str, key: &str) -> Option<String> {
    output
        .lines()
        .find(|l| l.contains(key))
        .and_then(|l| l.split('"').nth(3))
        .map(String::from)
}
