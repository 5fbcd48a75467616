//! Top-level error types for the installer binary.
//!
//! Library failures live in [`crate::installer::Error`]; this module wraps
//! them together with argument and IO errors for the CLI layer.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, InstallerError>;

/// Main error type for the CLI
#[derive(Error, Debug)]
pub enum InstallerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Installer pipeline errors
    #[error("Installer error: {0}")]
    Installer(#[from] crate::installer::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl InstallerError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            InstallerError::Cli(CliError::InvalidArguments { .. }) => 64,
            InstallerError::Installer(e) => e.kind().exit_code(),
            _ => 1,
        }
    }
}
