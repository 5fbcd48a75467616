//! Artifact location next to the installer.

use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

use super::{Error, ErrorExt, Result};

/// Directory containing the running installer, fully normalized.
///
/// Relative components are resolved against `cwd` and symlinks are
/// followed, so invoking the installer through a link still finds the
/// artifact next to the real file. Accepts either the executable path or
/// its directory.
pub fn invocation_directory(invocation_path: &Path, cwd: &Path) -> Result<PathBuf> {
    let absolute = invocation_path
        .absolutize_from(cwd)
        .fs_context("absolutizing invocation path", invocation_path)?;
    let resolved = std::fs::canonicalize(&absolute).fs_context("resolving", &absolute)?;

    if resolved.is_dir() {
        return Ok(resolved);
    }
    resolved.parent().map(Path::to_path_buf).ok_or_else(|| {
        Error::GenericError(format!("{} has no parent directory", resolved.display()))
    })
}

/// Confirms a regular file named `app_name` sits in the invocation directory.
///
/// Returns the normalized path of that file. A missing directory is reported
/// the same way as a missing file.
pub fn locate(invocation_path: &Path, app_name: &str, cwd: &Path) -> Result<PathBuf> {
    let not_found = |directory: PathBuf| Error::BinaryNotFound {
        name: app_name.to_string(),
        directory,
    };

    let directory = match invocation_directory(invocation_path, cwd) {
        Ok(dir) => dir,
        Err(Error::Fs { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            return Err(not_found(invocation_path.to_path_buf()));
        }
        Err(e) => return Err(e),
    };

    let candidate = directory.join(app_name);
    match std::fs::metadata(&candidate) {
        Ok(meta) if meta.is_file() => {
            log::debug!("found artifact {} ({} bytes)", candidate.display(), meta.len());
            Ok(candidate)
        }
        Ok(_) => {
            log::warn!("{} exists but is not a regular file", candidate.display());
            Err(not_found(directory))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(not_found(directory)),
        Err(e) => Err(e).fs_context("reading metadata of", &candidate),
    }
}
