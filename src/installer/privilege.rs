//! Privilege resolution and the elevation seam.
//!
//! The resolver only decides *how* the copy runs. The copy itself is done
//! either in-process ([`ExecutionMode::Direct`]) or by re-invoking this
//! installer's `place` subcommand through an [`ElevationProvider`].

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use super::placement::PlacementJob;
use super::{Error, Result};

/// Exit status the `place` subcommand uses for a placement failure.
///
/// Any other non-zero status from the elevation provider counts as denial.
pub const PLACE_FAILURE_EXIT_CODE: i32 = 74;

/// How the install step runs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExecutionMode {
    /// Current process can write the target directory
    Direct,
    /// Copy must go through an elevated sub-process
    Elevated,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Direct => f.write_str("direct"),
            ExecutionMode::Elevated => f.write_str("elevated"),
        }
    }
}

/// Result of a write-access probe.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Access {
    Writable,
    Denied,
    /// Directory does not exist (or is not a directory)
    Missing,
}

/// Answers "can this process write into `dir`" without writing anything.
pub trait AccessProbe: Send + Sync {
    fn check_writable(&self, dir: &Path) -> Access;
}

/// Probe backed by `access(2)` with `W_OK`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemAccess;

impl AccessProbe for SystemAccess {
    #[cfg(unix)]
    fn check_writable(&self, dir: &Path) -> Access {
        use nix::errno::Errno;
        use nix::unistd::{AccessFlags, access};

        if !dir.is_dir() {
            return Access::Missing;
        }
        match access(dir, AccessFlags::W_OK | AccessFlags::X_OK) {
            Ok(()) => Access::Writable,
            Err(Errno::ENOENT) | Err(Errno::ENOTDIR) => Access::Missing,
            Err(e) => {
                log::debug!("access({}, W_OK) failed: {e}", dir.display());
                Access::Denied
            }
        }
    }

    #[cfg(not(unix))]
    fn check_writable(&self, dir: &Path) -> Access {
        match std::fs::metadata(dir) {
            Ok(meta) if meta.is_dir() && !meta.permissions().readonly() => Access::Writable,
            Ok(meta) if meta.is_dir() => Access::Denied,
            _ => Access::Missing,
        }
    }
}

/// Decides the execution mode for `target_dir` using the system probe.
pub fn ensure_writable(target_dir: &Path) -> ExecutionMode {
    ensure_writable_with(&SystemAccess, target_dir)
}

/// Decides the execution mode for `target_dir` using `probe`.
///
/// A missing directory yields `Direct`: elevation cannot create it, and the
/// installer reports the missing directory as an install failure.
pub fn ensure_writable_with(probe: &dyn AccessProbe, target_dir: &Path) -> ExecutionMode {
    match probe.check_writable(target_dir) {
        Access::Writable => ExecutionMode::Direct,
        Access::Missing => {
            log::warn!("target directory {} does not exist", target_dir.display());
            ExecutionMode::Direct
        }
        Access::Denied => {
            #[cfg(unix)]
            log::info!(
                "{} is not writable by {}; elevation required",
                target_dir.display(),
                users::get_current_username()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| users::get_current_uid().to_string())
            );
            ExecutionMode::Elevated
        }
    }
}

/// A fully-specified command to run with elevated privileges.
#[derive(Clone, Debug)]
pub struct ElevatedCommand {
    /// Program to run (this installer's own executable)
    pub program: PathBuf,
    /// Arguments after the program
    pub args: Vec<OsString>,
    /// Structured form of what the command does
    pub job: PlacementJob,
}

impl ElevatedCommand {
    /// `<program> place ...` for `job`.
    pub fn place(program: PathBuf, job: PlacementJob) -> Self {
        let args = job.to_args();
        Self { program, args, job }
    }
}

/// What the elevation provider reports back.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ElevationStatus {
    /// Command ran elevated and succeeded
    Completed,
    /// User or policy refused elevation
    Denied(String),
    /// No elevation mechanism on this machine
    Unavailable(String),
    /// Elevation granted but the command itself failed
    Failed(String),
}

/// Capability to run one command with elevated privileges.
///
/// Blocking: returns once the command exits, which includes any
/// interactive password prompt.
pub trait ElevationProvider: Send + Sync {
    fn run_elevated(&self, command: &ElevatedCommand) -> Result<ElevationStatus>;
}

/// Elevation through `sudo`.
#[derive(Clone, Debug, Default)]
pub struct SudoElevation;

impl ElevationProvider for SudoElevation {
    fn run_elevated(&self, command: &ElevatedCommand) -> Result<ElevationStatus> {
        let sudo = match which::which("sudo") {
            Ok(path) => path,
            Err(e) => {
                log::debug!("sudo not found in PATH: {e}");
                return Ok(ElevationStatus::Unavailable(
                    "sudo is not installed or not in PATH".to_string(),
                ));
            }
        };

        log::info!(
            "running elevated: {} {} {:?}",
            sudo.display(),
            command.program.display(),
            command.args
        );

        let status = std::process::Command::new(&sudo)
            .arg(&command.program)
            .args(&command.args)
            .status()
            .map_err(|e| Error::PrivilegeDenied {
                reason: format!("failed to launch {}: {e}", sudo.display()),
            })?;

        Ok(match status.code() {
            Some(0) => ElevationStatus::Completed,
            Some(PLACE_FAILURE_EXIT_CODE) => ElevationStatus::Failed(format!(
                "elevated placement exited with status {PLACE_FAILURE_EXIT_CODE}"
            )),
            Some(code) => ElevationStatus::Denied(format!("sudo exited with status {code}")),
            None => ElevationStatus::Denied("sudo was terminated by a signal".to_string()),
        })
    }
}
