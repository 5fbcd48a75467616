//! Local installer bootstrap for the SSBT backup tool.
//!
//! This library provides the installer pipeline that:
//! - Resolves the machine's platform tag (linux/macOS, x86_64/aarch64)
//! - Finds the pre-built `ssbt-tool` binary next to the installer
//! - Places it into `/usr/local/bin` with mode 0755, elevating only the copy
//! - Verifies it on `PATH` and reports the result
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod error;
pub mod installer;

// Re-export commonly used types
pub use error::{CliError, InstallerError, Result};
