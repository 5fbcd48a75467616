//! Scoped temporary workspace for a single installer run.
//!
//! The workspace is created before platform resolution and removed when the
//! run ends: explicitly through [`ScopedWorkspace::release`] on the normal
//! paths, or by `Drop` when the run unwinds or is cancelled.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::{Error, ErrorExt, Result};

/// Prefix of the workspace directory name.
pub const WORKSPACE_PREFIX: &str = "ssbt-install-";

/// Exclusively-owned temporary directory. Only this type deletes it.
#[derive(Debug)]
pub struct ScopedWorkspace {
    dir: TempDir,
}

impl ScopedWorkspace {
    /// Creates a uniquely-named directory under the system temp directory.
    pub fn acquire() -> Result<Self> {
        Self::acquire_in(std::env::temp_dir())
    }

    /// Creates a uniquely-named directory under `parent`.
    pub fn acquire_in(parent: impl AsRef<Path>) -> Result<Self> {
        let parent = parent.as_ref();
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(parent)
            .fs_context("creating workspace in", parent)?;
        log::debug!("workspace acquired at {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Copies the artifact into the workspace so placement reads a stable snapshot.
    ///
    /// Fails if `source` is missing or not a regular file.
    pub async fn stage_artifact(&self, source: &Path, app_name: &str) -> Result<PathBuf> {
        if !tokio::fs::metadata(source)
            .await
            .fs_context("reading metadata of", source)?
            .is_file()
        {
            return Err(Error::GenericError(format!(
                "{} is not a file",
                source.display()
            )));
        }

        let staged = self.dir.path().join(app_name);
        tokio::fs::copy(source, &staged)
            .await
            .fs_context("staging artifact into", &staged)?;
        log::debug!("staged {} -> {}", source.display(), staged.display());
        Ok(staged)
    }

    /// Removes the workspace recursively.
    pub fn release(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => {
                log::debug!("workspace released: {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).fs_context("removing workspace", &path),
        }
    }
}
