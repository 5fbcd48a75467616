//! CPU architecture types and the platform tag.

use std::fmt;

use super::OsFamily;

/// Normalized CPU architecture of the running machine.
///
/// # Platform Support
///
/// - ✅ Linux: X86_64, AArch64
/// - ✅ macOS: X86_64, AArch64 (Apple Silicon)
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Arch {
    /// x86_64 / AMD64 (64-bit)
    X86_64,
    /// AArch64 / ARM64 (64-bit) - Apple Silicon, modern ARM servers
    AArch64,
}

impl Arch {
    /// Canonical lowercase name used in platform tags.
    pub fn as_str(self) -> &'static str {
        match self {
            Arch::X86_64 => "x86_64",
            Arch::AArch64 => "aarch64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of an architecture alias table.
pub type ArchAlias = (&'static str, Arch);

/// Aliases reported by `uname -m` on Linux.
pub const LINUX_ARCH_TABLE: &[ArchAlias] = &[
    ("x86_64", Arch::X86_64),
    ("amd64", Arch::X86_64),
    ("aarch64", Arch::AArch64),
    ("arm64", Arch::AArch64),
];

/// Aliases reported by `uname -m` on macOS.
pub const MACOS_ARCH_TABLE: &[ArchAlias] = &[
    ("x86_64", Arch::X86_64),
    ("arm64", Arch::AArch64),
    ("aarch64", Arch::AArch64),
];

/// OS family plus normalized architecture.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct PlatformTag {
    pub os: OsFamily,
    pub arch: Arch,
}

impl PlatformTag {
    pub fn new(os: OsFamily, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Rust target triple for this platform, used in diagnostics.
    pub fn target_triple(&self) -> &'static str {
        match (self.os, self.arch) {
            (OsFamily::Linux, Arch::X86_64) => "x86_64-unknown-linux-gnu",
            (OsFamily::Linux, Arch::AArch64) => "aarch64-unknown-linux-gnu",
            (OsFamily::MacOs, Arch::X86_64) => "x86_64-apple-darwin",
            (OsFamily::MacOs, Arch::AArch64) => "aarch64-apple-darwin",
        }
    }
}

impl fmt::Display for PlatformTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}
