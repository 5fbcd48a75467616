//! The default command: run the installer pipeline inside a scoped workspace.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use super::Shutdown;
use crate::cli::{Args, RuntimeConfig};
use crate::error::Result;
use crate::installer::report::report_failure;
use crate::installer::{
    ErrorExt, HostInfo, INTERRUPTED_EXIT_CODE, InstallOutcome, InstallRequest, Installer,
    Interrupt, ScopedWorkspace, SudoElevation, run_interruptible,
};

/// Runs the install and returns the process exit code.
///
/// Signal listeners are installed before the workspace exists. On Ctrl-C or
/// SIGTERM the pipeline is told to stop and awaited, then the workspace is
/// released and the run exits with status 130.
pub async fn install(args: &Args, runtime_config: &RuntimeConfig) -> Result<i32> {
    let mut shutdown = Shutdown::install().context("installing signal handlers")?;

    let workspace = match ScopedWorkspace::acquire() {
        Ok(workspace) => workspace,
        Err(e) => {
            let outcome = InstallOutcome::from(e);
            report_failure(runtime_config.output(), &outcome)
                .context("writing failure report")?;
            return Ok(outcome.exit_code());
        }
    };

    let interrupt = Interrupt::new();
    let (code, signal) = run_interruptible(
        run_pipeline(args, runtime_config, &workspace, interrupt.clone()),
        &interrupt,
        shutdown.recv(),
    )
    .await;

    let code = match signal {
        Some(signal) => {
            runtime_config
                .warn(&format!("Interrupted by {signal}; installation stopped"))
                .context("writing interrupt notice")?;
            INTERRUPTED_EXIT_CODE
        }
        None => code?,
    };

    if let Err(e) = workspace.release() {
        runtime_config
            .warn(&format!("Failed to remove temporary workspace: {e}"))
            .context("writing workspace warning")?;
    }

    Ok(code)
}

async fn run_pipeline(
    args: &Args,
    runtime_config: &RuntimeConfig,
    workspace: &ScopedWorkspace,
    interrupt: Interrupt,
) -> Result<i32> {
    let prepared = build_request(args).and_then(|request| Ok((request, HostInfo::detect()?)));
    let (request, host) = match prepared {
        Ok(prepared) => prepared,
        Err(e) => {
            let outcome = InstallOutcome::from(e);
            report_failure(runtime_config.output(), &outcome)
                .context("writing failure report")?;
            return Ok(outcome.exit_code());
        }
    };

    let program = self_executable()?;
    let installer = Installer::new(
        runtime_config.output().clone(),
        Arc::new(SudoElevation),
        program,
    )
    .with_interrupt(interrupt);

    let outcome = installer.run(&request, &host, workspace).await;
    Ok(outcome.exit_code())
}

/// Captures environment, arguments and working directory into a request.
fn build_request(args: &Args) -> crate::installer::Result<InstallRequest> {
    let working_directory = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));

    let source_directory = match &args.source_dir {
        Some(dir) => dir.clone(),
        None => self_executable()?
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| working_directory.clone()),
    };

    InstallRequest::builder()
        .version_label(args.version_label.clone())
        .source_directory(source_directory)
        .target_directory(&args.target_dir)
        .search_path(std::env::var_os("PATH"))
        .working_directory(working_directory)
        .build()
}

/// This installer's own executable with symlinks resolved.
fn self_executable() -> crate::installer::Result<PathBuf> {
    let exe = std::env::current_exe().fs_context("locating", "current executable")?;
    std::fs::canonicalize(&exe).fs_context("resolving", &exe)
}
