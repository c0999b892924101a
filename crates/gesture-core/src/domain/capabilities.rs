//! Platform capability snapshot.
//!
//! [`PlatformCapabilities`] records, once per process, which input-synthesis
//! mechanisms are usable:
//!
//! | Field                  | Meaning                                              |
//! |------------------------|------------------------------------------------------|
//! | `os_family`            | Which OS the process runs on                         |
//! | `gui_available`        | An interactive display/session is attached           |
//! | `native_api_available` | The platform's direct input API loaded successfully  |
//!
//! The snapshot is produced by the capability probe in `gesture-input` and is
//! never mutated afterwards.  The facade reads it on every call, which is why
//! it is a small `Copy` value.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The operating system family the process is running on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OsFamily {
    Windows,
    Linux,
    MacOS,
    Other,
}

impl OsFamily {
    /// Classifies an OS identifier string such as `"Windows 11"`, `"linux"`
    /// or `"Mac OS X"`.
    ///
    /// Matching is case-insensitive and substring based, so vendor suffixes
    /// and version numbers are ignored.
    pub fn from_os_name(name: &str) -> Self {
        let name = name.to_ascii_lowercase();
        if name.contains("windows") {
            OsFamily::Windows
        } else if name.contains("linux") {
            OsFamily::Linux
        } else if name.contains("mac") || name.contains("darwin") {
            OsFamily::MacOS
        } else {
            OsFamily::Other
        }
    }

    /// Returns the family of the OS this binary was compiled for.
    pub fn current() -> Self {
        Self::from_os_name(std::env::consts::OS)
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OsFamily::Windows => "Windows",
            OsFamily::Linux => "Linux",
            OsFamily::MacOS => "macOS",
            OsFamily::Other => "other",
        };
        f.write_str(name)
    }
}

/// Immutable snapshot of the input mechanisms available to this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformCapabilities {
    pub os_family: OsFamily,
    pub gui_available: bool,
    pub native_api_available: bool,
}

impl fmt::Display for PlatformCapabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "os={} gui={} native={}",
            self.os_family, self.gui_available, self.native_api_available
        )
    }
}
