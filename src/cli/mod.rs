//! Command line interface for the SSBT installer.
//!
//! Parses arguments, dispatches to the install pipeline or the elevated
//! `place` entry point, and maps the result to an exit code.

mod args;
pub mod commands;

pub use args::{Args, Command, RuntimeConfig};

use crate::error::{CliError, Result};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    match &args.command {
        Some(Command::Place {
            source,
            target_dir,
            app_name,
            sha256,
        }) => Ok(commands::place(
            source.clone(),
            target_dir.clone(),
            app_name.clone(),
            sha256.clone(),
        )
        .await),
        None => {
            let runtime_config = RuntimeConfig::from(&args);
            commands::install(&args, &runtime_config).await
        }
    }
}
