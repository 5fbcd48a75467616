//! Install configuration: platform tables, OS profiles and the install request.

mod arch;
mod profile;
mod request;

pub use arch::{Arch, ArchAlias, LINUX_ARCH_TABLE, MACOS_ARCH_TABLE, PlatformTag};
pub use profile::{OsFamily, OsProfile, quarantine_command};
pub use request::{
    DEFAULT_APP_NAME, DEFAULT_TARGET_DIR, InstallRequest, InstallRequestBuilder, UNKNOWN_VERSION,
};
