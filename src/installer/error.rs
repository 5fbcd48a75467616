//! Error types for installer operations.
//!
//! Every failure the pipeline can produce maps onto an [`ErrorKind`], which the
//! reporter uses for hint text and the CLI uses for the process exit code.

use std::path::{Path, PathBuf};
use thiserror::Error;

use super::outcome::ErrorKind;

/// Result type alias for installer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the installer pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// The machine architecture has no entry in the OS profile's table
    #[error("unsupported architecture '{raw}' on {os}")]
    UnsupportedArchitecture {
        /// Raw string reported by the operating system
        raw: String,
        /// OS family the lookup ran against
        os: String,
    },

    /// The operating system is neither linux nor macOS
    #[error("unsupported operating system '{0}'")]
    UnsupportedOs(String),

    /// The artifact is not next to the installer
    #[error("binary '{name}' not found in {}", .directory.display())]
    BinaryNotFound {
        /// Expected file name
        name: String,
        /// Directory that was searched
        directory: PathBuf,
    },

    /// Elevation was refused or no elevation mechanism exists
    #[error("privilege elevation denied: {reason}")]
    PrivilegeDenied {
        /// What the elevation provider reported
        reason: String,
    },

    /// Copy, permission change, verification or rename failed
    #[error("failed to install {}: {reason}", .target.display())]
    InstallFailed {
        /// Final path that was being written
        target: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// Ctrl-C or SIGTERM stopped the run at a safe point
    #[error("installation interrupted")]
    Interrupted,

    /// Filesystem operation failed with context
    #[error("{context} {}: {source}", .path.display())]
    Fs {
        /// What was being done
        context: &'static str,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// IO error without path context
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Anything else
    #[error("{0}")]
    GenericError(String),
}

impl Error {
    /// Classifies this error for reporting and exit-code mapping.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnsupportedArchitecture { .. } | Error::UnsupportedOs(_) => {
                ErrorKind::UnsupportedArchitecture
            }
            Error::BinaryNotFound { .. } => ErrorKind::BinaryNotFound,
            Error::PrivilegeDenied { .. } => ErrorKind::PrivilegeDenied,
            Error::InstallFailed { .. } => ErrorKind::InstallFailed,
            Error::Interrupted => ErrorKind::Interrupted,
            Error::Fs { .. } | Error::IoError(_) | Error::GenericError(_) => ErrorKind::Internal,
        }
    }

    /// Wraps any error raised during placement as [`Error::InstallFailed`].
    pub fn into_install_failure(self, target: &Path) -> Error {
        match self {
            Error::InstallFailed { .. } | Error::PrivilegeDenied { .. } | Error::Interrupted => {
                self
            }
            other => Error::InstallFailed {
                target: target.to_path_buf(),
                reason: other.to_string(),
            },
        }
    }
}

/// Adds path context to IO results.
pub trait ErrorExt<T> {
    /// Converts an IO error into [`Error::Fs`] naming the operation and path.
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

/// Returns early with [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::installer::Error::GenericError(format!($($arg)*)))
    };
}
