//! Per-OS behavior: alias table and post-install advisory.

use std::fmt;
use std::path::Path;

use super::arch::{ArchAlias, LINUX_ARCH_TABLE, MACOS_ARCH_TABLE};
use crate::installer::{Error, Result};

/// Operating system families the installer supports.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum OsFamily {
    Linux,
    MacOs,
}

impl OsFamily {
    /// Maps a `std::env::consts::OS` style name to a family.
    pub fn from_os_name(name: &str) -> Result<Self> {
        match name {
            "linux" => Ok(OsFamily::Linux),
            "macos" => Ok(OsFamily::MacOs),
            other => Err(Error::UnsupportedOs(other.to_string())),
        }
    }

    /// Family of the OS this binary was compiled for.
    pub fn current() -> Result<Self> {
        Self::from_os_name(std::env::consts::OS)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OsFamily::Linux => "linux",
            OsFamily::MacOs => "macos",
        }
    }

    /// Profile carrying this family's install behavior.
    pub fn profile(self) -> OsProfile {
        OsProfile::for_family(self)
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything that differs between the Linux and macOS install flows.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OsProfile {
    family: OsFamily,
    arch_table: &'static [ArchAlias],
}

impl OsProfile {
    pub fn for_family(family: OsFamily) -> Self {
        let arch_table = match family {
            OsFamily::Linux => LINUX_ARCH_TABLE,
            OsFamily::MacOs => MACOS_ARCH_TABLE,
        };
        Self { family, arch_table }
    }

    pub fn family(&self) -> OsFamily {
        self.family
    }

    pub fn arch_table(&self) -> &'static [ArchAlias] {
        self.arch_table
    }

    /// Advisory printed once after a successful install, if the OS needs one.
    ///
    /// macOS blocks the first run of an unsigned download until the
    /// quarantine attribute is cleared.
    pub fn post_install_advisory(&self, installed: &Path) -> Option<String> {
        match self.family {
            OsFamily::Linux => None,
            OsFamily::MacOs => Some(format!(
                "macOS may block the first run of this unsigned binary (Gatekeeper quarantine).\n\
                 If it does, clear the quarantine attribute with:\n\
                 \n    {}",
                quarantine_command(installed)
            )),
        }
    }
}

/// Exact command that removes the quarantine attribute from `installed`.
pub fn quarantine_command(installed: &Path) -> String {
    let path = installed.display().to_string();
    if path.contains(char::is_whitespace) {
        format!("xattr -d com.apple.quarantine '{path}'")
    } else {
        format!("xattr -d com.apple.quarantine {path}")
    }
}
