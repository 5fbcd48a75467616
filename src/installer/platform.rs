//! Platform resolution: raw machine architecture + OS family to a [`PlatformTag`].

use super::settings::{OsFamily, PlatformTag};
use super::{Error, Result};

/// Maps the raw architecture string to a platform tag for `os`.
///
/// Lookup is an exact, case-sensitive match against the OS profile's alias
/// table. No side effects.
pub fn resolve(raw_arch: &str, os: OsFamily) -> Result<PlatformTag> {
    os.profile()
        .arch_table()
        .iter()
        .find(|(alias, _)| *alias == raw_arch)
        .map(|(_, arch)| PlatformTag::new(os, *arch))
        .ok_or_else(|| Error::UnsupportedArchitecture {
            raw: raw_arch.to_string(),
            os: os.to_string(),
        })
}

/// Raw architecture string reported by the kernel (`uname -m`).
#[cfg(unix)]
pub fn host_machine() -> Result<String> {
    let uts = nix::sys::utsname::uname()
        .map_err(|e| Error::GenericError(format!("uname failed: {e}")))?;
    let machine = uts.machine().to_string_lossy().into_owned();
    log::debug!("uname machine: {machine}");
    Ok(machine)
}

#[cfg(not(unix))]
pub fn host_machine() -> Result<String> {
    Ok(std::env::consts::ARCH.to_string())
}
