//! Pipeline stages and the final install outcome.

use std::fmt;
use std::path::PathBuf;

use super::interrupt::INTERRUPTED_EXIT_CODE;

/// Failure classification shared by the reporter and the exit-code mapping.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Architecture or OS family has no mapping
    UnsupportedArchitecture,
    /// Artifact missing next to the installer
    BinaryNotFound,
    /// Elevation refused or unavailable
    PrivilegeDenied,
    /// Placement failed after a mutation attempt
    InstallFailed,
    /// Stopped by Ctrl-C or SIGTERM
    Interrupted,
    /// Unexpected failure outside the classified kinds
    Internal,
}

impl ErrorKind {
    /// Process exit status for this failure. Never zero.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::UnsupportedArchitecture => 2,
            ErrorKind::BinaryNotFound => 3,
            ErrorKind::PrivilegeDenied => 4,
            ErrorKind::InstallFailed => 5,
            ErrorKind::Interrupted => INTERRUPTED_EXIT_CODE,
            ErrorKind::Internal => 1,
        }
    }

    /// Corrective hint printed under the failure line.
    pub fn hint(self) -> &'static str {
        match self {
            ErrorKind::UnsupportedArchitecture => {
                "supply a build for a supported architecture (x86_64 or aarch64 on linux/macOS)"
            }
            ErrorKind::BinaryNotFound => {
                "place the ssbt-tool binary next to this installer and run it again"
            }
            ErrorKind::PrivilegeDenied => {
                "re-run with elevated privileges (e.g. sudo) or choose a writable target directory"
            }
            ErrorKind::InstallFailed => {
                "check free disk space and that the target directory exists, then retry"
            }
            ErrorKind::Interrupted => "run the installer again to finish the installation",
            ErrorKind::Internal => "re-run with RUST_LOG=debug for details",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::UnsupportedArchitecture => "UnsupportedArchitecture",
            ErrorKind::BinaryNotFound => "BinaryNotFound",
            ErrorKind::PrivilegeDenied => "PrivilegeDenied",
            ErrorKind::InstallFailed => "InstallFailed",
            ErrorKind::Interrupted => "Interrupted",
            ErrorKind::Internal => "Internal",
        };
        f.write_str(name)
    }
}

/// Installer state machine.
///
/// `Succeeded` and `Failed` are terminal; both precede workspace release.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stage {
    /// Request built, nothing resolved yet
    Start,
    /// Mapping the raw architecture onto a platform tag
    ResolvingPlatform,
    /// Looking for the artifact next to the installer
    LocatingArtifact,
    /// Probing the target directory for write access
    ResolvingPrivilege,
    /// Staging and placing the binary
    Installing,
    /// Looking the installed binary up on the search path
    Verifying,
    /// Binary placed and reported
    Succeeded,
    /// Stopped with the given failure kind
    Failed(ErrorKind),
}

impl Stage {
    /// Whether no further transition can happen.
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Succeeded | Stage::Failed(_))
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Start => f.write_str("start"),
            Stage::ResolvingPlatform => f.write_str("resolving platform"),
            Stage::LocatingArtifact => f.write_str("locating artifact"),
            Stage::ResolvingPrivilege => f.write_str("resolving privilege"),
            Stage::Installing => f.write_str("installing"),
            Stage::Verifying => f.write_str("verifying"),
            Stage::Succeeded => f.write_str("succeeded"),
            Stage::Failed(kind) => write!(f, "failed ({kind})"),
        }
    }
}

/// Result of one installer run, consumed by the reporter and exit-code mapping.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InstallOutcome {
    /// Whether the binary now exists at the target path
    pub success: bool,
    /// Final path of the placed binary, present on success
    pub installed_path: Option<PathBuf>,
    /// Failure classification, present on failure
    pub error: Option<ErrorKind>,
    /// Human-readable cause, present when `error` is
    pub message: Option<String>,
}

impl InstallOutcome {
    /// Outcome of a run that placed the binary at `installed_path`.
    pub fn succeeded(installed_path: PathBuf) -> Self {
        Self {
            success: true,
            installed_path: Some(installed_path),
            error: None,
            message: None,
        }
    }

    /// Outcome of a run that stopped with `error`.
    pub fn failed(error: &super::Error) -> Self {
        Self {
            success: false,
            installed_path: None,
            error: Some(error.kind()),
            message: Some(error.to_string()),
        }
    }

    /// Exit status for the process: 0 on success, the kind's code otherwise.
    pub fn exit_code(&self) -> i32 {
        match self.error {
            Some(kind) => kind.exit_code(),
            None if self.success => 0,
            None => ErrorKind::Internal.exit_code(),
        }
    }
}
