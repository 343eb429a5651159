//! Basic host facts backing the degraded fallback fingerprint.

use serde::{Deserialize, Serialize};
use std::env;

/// Basic facts about the current host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Operating system name.
    pub os_name: String,
    /// CPU architecture.
    pub arch: String,
    /// Hostname.
    pub hostname: String,
    /// Processor description.
    pub processor: String,
}

impl DeviceInfo {
    /// Collects facts about the current host.
    ///
    /// Never fails; fields that cannot be determined read `"unknown"`.
    #[must_use]
    pub fn collect() -> Self {
        Self {
            os_name: env::consts::OS.to_string(),
            arch: env::consts::ARCH.to_string(),
            hostname: try_hostname().unwrap_or_else(|| "unknown".to_string()),
            processor: try_processor().unwrap_or_else(|| "unknown".to_string()),
        }
    }

    /// Components of the degraded fallback fingerprint, in hash order.
    #[must_use]
    pub fn fallback_components(&self) -> Vec<String> {
        vec![
            self.hostname.clone(),
            self.arch.clone(),
            self.processor.clone(),
        ]
    }
}

/// Gets the machine hostname.
pub(crate) fn try_hostname() -> Option<String> {
    hostname::get().ok().and_then(|h| h.into_string().ok())
}

/// Best-effort processor description, from whatever the OS reports.
pub(crate) fn try_processor() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/proc/cpuinfo").ok().and_then(|c| {
            c.lines()
                .find(|l| l.starts_with("model name"))
                .and_then(|l| l.split(':').nth(1))
                .map(|v| v.trim().to_string())
        })
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("sysctl")
            .args(["-n", "machdep.cpu.brand_string"])
            .output()
            .ok()
            .and_then(|o| String::from_utf8(o.stdout).ok())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    #[cfg(target_os = "windows")]
    {
        std::env::var("PROCESSOR_IDENTIFIER").ok()
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        None
    }
}
