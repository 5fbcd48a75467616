//! Atomic placement of the executable into the target directory.
//!
//! The binary is written to a hidden temporary file inside the target
//! directory, made executable, re-hashed, and only then renamed over the
//! final path. Any failure before the rename drops the temporary file, so a
//! half-written executable never appears at `target_dir/app_name`.
//! An [`Interrupt`] is checked between copy chunks and before the rename.

use std::ffi::OsString;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::checksum::file_sha256;
use super::interrupt::Interrupt;
use super::privilege::{ElevatedCommand, ElevationProvider, ElevationStatus, ExecutionMode};
use super::{Error, ErrorExt, Result};

/// Permission bits of the installed executable (rwxr-xr-x).
pub const INSTALL_MODE: u32 = 0o755;

const COPY_CHUNK: usize = 64 * 1024;

/// One placement: copy `source` to `target_dir/app_name` if it hashes to `sha256`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PlacementJob {
    /// Snapshot to copy from
    pub source: PathBuf,
    pub target_dir: PathBuf,
    pub app_name: String,
    /// Expected hex SHA-256 of the placed file
    pub sha256: String,
}

impl PlacementJob {
    pub fn target_path(&self) -> PathBuf {
        self.target_dir.join(&self.app_name)
    }

    /// Arguments for the `place` subcommand that performs this job.
    pub fn to_args(&self) -> Vec<OsString> {
        vec![
            "place".into(),
            "--source".into(),
            self.source.clone().into_os_string(),
            "--target-dir".into(),
            self.target_dir.clone().into_os_string(),
            "--app-name".into(),
            self.app_name.clone().into(),
            "--sha256".into(),
            self.sha256.clone().into(),
        ]
    }
}

/// Performs `job` in the current process. Blocking.
///
/// Overwrites an existing file at the final path.
pub fn place(job: &PlacementJob) -> Result<PathBuf> {
    place_interruptible(job, &Interrupt::new())
}

/// Like [`place`], but stops with [`Error::Interrupted`] once `interrupt`
/// is triggered. The staging file is removed before returning.
pub fn place_interruptible(job: &PlacementJob, interrupt: &Interrupt) -> Result<PathBuf> {
    let final_path = job.target_path();
    place_inner(job, &final_path, interrupt).map_err(|e| e.into_install_failure(&final_path))
}

fn place_inner(job: &PlacementJob, final_path: &Path, interrupt: &Interrupt) -> Result<PathBuf> {
    interrupt.check()?;

    if !job.target_dir.is_dir() {
        return Err(Error::InstallFailed {
            target: final_path.to_path_buf(),
            reason: format!("target directory {} does not exist", job.target_dir.display()),
        });
    }

    let mut source =
        std::fs::File::open(&job.source).fs_context("opening source binary", &job.source)?;

    let mut staged = tempfile::Builder::new()
        .prefix(&format!(".{}.", job.app_name))
        .suffix(".partial")
        .tempfile_in(&job.target_dir)
        .fs_context("creating staging file in", &job.target_dir)?;
    log::debug!("staging into {}", staged.path().display());

    let mut buffer = vec![0u8; COPY_CHUNK];
    loop {
        interrupt.check()?;
        let read = source
            .read(&mut buffer)
            .fs_context("reading source binary", &job.source)?;
        if read == 0 {
            break;
        }
        staged
            .as_file_mut()
            .write_all(&buffer[..read])
            .fs_context("copying binary into", staged.path())?;
    }
    staged
        .as_file_mut()
        .flush()
        .fs_context("flushing", staged.path())?;
    staged
        .as_file()
        .sync_all()
        .fs_context("syncing", staged.path())?;

    set_executable(staged.path())?;

    let digest = file_sha256(staged.path())?;
    if digest != job.sha256 {
        return Err(Error::InstallFailed {
            target: final_path.to_path_buf(),
            reason: format!(
                "checksum mismatch after copy (expected {}, got {digest})",
                job.sha256
            ),
        });
    }

    interrupt.check()?;
    staged.persist(final_path).map_err(|e| Error::InstallFailed {
        target: final_path.to_path_buf(),
        reason: format!("atomic rename failed: {}", e.error),
    })?;

    log::info!("✓ placed {} ({digest})", final_path.display());
    Ok(final_path.to_path_buf())
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(INSTALL_MODE))
        .fs_context("setting permissions on", path)
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// Runs placements in the mode chosen by the privilege resolver.
#[derive(Clone)]
pub struct Placer {
    elevation: Arc<dyn ElevationProvider>,
    /// Executable re-invoked for elevated placement
    program: PathBuf,
    interrupt: Interrupt,
}

impl std::fmt::Debug for Placer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Placer")
            .field("elevation", &"<ElevationProvider>")
            .field("program", &self.program)
            .field("interrupt", &self.interrupt)
            .finish()
    }
}

impl Placer {
    pub fn new(elevation: Arc<dyn ElevationProvider>, program: PathBuf) -> Self {
        Self {
            elevation,
            program,
            interrupt: Interrupt::new(),
        }
    }

    /// Shares `interrupt` with direct placements and elevated status handling.
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Copies `source_file` to `target_dir/app_name` with mode 0755.
    ///
    /// `Direct` copies in-process; `Elevated` hands the same job to the
    /// elevation provider and keeps everything else unprivileged.
    pub async fn install(
        &self,
        source_file: &Path,
        target_dir: &Path,
        app_name: &str,
        mode: ExecutionMode,
    ) -> Result<PathBuf> {
        let final_path = target_dir.join(app_name);

        let hash_source = source_file.to_path_buf();
        let sha256 = tokio::task::spawn_blocking(move || file_sha256(&hash_source))
            .await
            .map_err(|e| Error::GenericError(format!("hashing task panicked: {e}")))?
            .map_err(|e| e.into_install_failure(&final_path))?;

        let job = PlacementJob {
            source: source_file.to_path_buf(),
            target_dir: target_dir.to_path_buf(),
            app_name: app_name.to_string(),
            sha256,
        };

        match mode {
            ExecutionMode::Direct => {
                let interrupt = self.interrupt.clone();
                tokio::task::spawn_blocking(move || place_interruptible(&job, &interrupt))
                    .await
                    .map_err(|e| Error::GenericError(format!("placement task panicked: {e}")))?
            }
            ExecutionMode::Elevated => self.install_elevated(job, final_path).await,
        }
    }

    async fn install_elevated(&self, job: PlacementJob, final_path: PathBuf) -> Result<PathBuf> {
        let provider = Arc::clone(&self.elevation);
        let command = ElevatedCommand::place(self.program.clone(), job);

        let status = tokio::task::spawn_blocking(move || provider.run_elevated(&command))
            .await
            .map_err(|e| Error::GenericError(format!("elevation task panicked: {e}")))??;

        match status {
            ElevationStatus::Completed => {
                if final_path.is_file() {
                    Ok(final_path)
                } else {
                    Err(Error::InstallFailed {
                        target: final_path,
                        reason: "elevated placement reported success but no file was written"
                            .to_string(),
                    })
                }
            }
            _ if self.interrupt.is_triggered() => Err(Error::Interrupted),
            ElevationStatus::Denied(reason) | ElevationStatus::Unavailable(reason) => {
                Err(Error::PrivilegeDenied { reason })
            }
            ElevationStatus::Failed(reason) => Err(Error::InstallFailed {
                target: final_path,
                reason,
            }),
        }
    }
}
