//! Command line argument parsing and validation.
//!
//! Every input has an `SSBT_`-prefixed environment override; the hidden
//! `place` subcommand is the entry point used under elevation.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::installer::OutputManager;
use crate::installer::settings::{DEFAULT_APP_NAME, DEFAULT_TARGET_DIR};

/// Installer bootstrap for the SSBT backup tool
#[derive(Parser, Debug)]
#[command(
    name = "ssbt-install",
    version,
    about = "Installs the ssbt-tool binary shipped next to this installer",
    long_about = "Installs the ssbt-tool binary shipped next to this installer into /usr/local/bin.

Checks that this machine's architecture is supported, copies the binary with mode 0755
(asking for elevated privileges only if the target directory is not writable), and
verifies the result is reachable on PATH.

Usage:
  ssbt-install
  SSBT_VERSION=1.4.0 ssbt-install

Exit code 0 = ssbt-tool guaranteed to exist at the target path."
)]
pub struct Args {
    /// Version label shown in the summary (default: unknown)
    #[arg(long, env = "SSBT_VERSION", value_name = "LABEL")]
    pub version_label: Option<String>,

    /// Directory the binary is installed into
    #[arg(
        long,
        env = "SSBT_INSTALL_DIR",
        value_name = "DIR",
        default_value = DEFAULT_TARGET_DIR,
        hide = true
    )]
    pub target_dir: PathBuf,

    /// Directory holding the binary to install (default: this installer's directory)
    #[arg(long, env = "SSBT_SOURCE_DIR", value_name = "DIR", hide = true)]
    pub source_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Place a staged binary into a directory (run under elevation)
    #[command(hide = true)]
    Place {
        /// Staged binary to copy
        #[arg(long, value_name = "PATH")]
        source: PathBuf,

        /// Directory to place it in
        #[arg(long = "target-dir", value_name = "DIR")]
        target_dir: PathBuf,

        /// File name inside the target directory
        #[arg(long, default_value = DEFAULT_APP_NAME)]
        app_name: String,

        /// Expected hex SHA-256 of the placed file
        #[arg(long)]
        sha256: String,
    },
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.target_dir.as_os_str().is_empty() {
            return Err("Target directory cannot be empty".to_string());
        }

        if let Some(Command::Place {
            app_name, sha256, ..
        }) = &self.command
        {
            if app_name.is_empty() || app_name.contains(std::path::is_separator) {
                return Err(format!("Invalid application name: {app_name:?}"));
            }
            if sha256.len() != 64 || !sha256.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(format!("Invalid SHA-256 digest: {sha256}"));
            }
        }

        Ok(())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(_args: &Args) -> Self {
        let output = OutputManager::new(
            true,  // Always verbose
            false, // Never quiet
        );

        Self { output }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &OutputManager {
        &self.output
    }

    /// Print warning message
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.output.warn(message)
    }
}
