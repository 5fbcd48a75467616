//! Post-install verification and result reporting.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use super::outcome::InstallOutcome;
use super::output::OutputManager;
use super::settings::OsProfile;

/// Result of looking the installed binary up on the search path.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Verification {
    /// First match on the search path
    Found(PathBuf),
    /// Non-fatal: the install succeeded but lookup did not confirm it
    Warning(String),
}

/// Looks `app_name` up on `search_path` the way a shell would.
///
/// A hit that resolves to a different file than `installed` is still
/// `Found`; the reporter warns about shadowing separately.
pub fn verify_on_search_path(
    app_name: &str,
    search_path: Option<&OsString>,
    cwd: &Path,
) -> Verification {
    match which::which_in(app_name, search_path, cwd) {
        Ok(path) => Verification::Found(path),
        Err(e) => Verification::Warning(format!(
            "{app_name} was installed but is not reachable via PATH ({e}); \
             add its directory to PATH"
        )),
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Prints the summary for an [`InstallOutcome`].
#[derive(Debug)]
pub struct Reporter<'a> {
    output: &'a OutputManager,
    profile: OsProfile,
    search_path: Option<OsString>,
    cwd: PathBuf,
}

impl<'a> Reporter<'a> {
    pub fn new(
        output: &'a OutputManager,
        profile: OsProfile,
        search_path: Option<OsString>,
        cwd: PathBuf,
    ) -> Self {
        Self {
            output,
            profile,
            search_path,
            cwd,
        }
    }

    /// Prints success (with search-path verification) or failure (with a hint).
    ///
    /// The success line and the macOS advisory always name the file this run
    /// wrote; the search-path result only drives the shadowing warning.
    ///
    /// Returns the verification result on success, `None` on failure.
    pub fn report(
        &self,
        outcome: &InstallOutcome,
        app_name: &str,
        version_label: &str,
    ) -> io::Result<Option<Verification>> {
        if !outcome.success {
            report_failure(self.output, outcome)?;
            return Ok(None);
        }

        let installed = outcome
            .installed_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(app_name));

        let verification = verify_on_search_path(app_name, self.search_path.as_ref(), &self.cwd);
        match &verification {
            Verification::Found(path) if same_file(path, &installed) => {
                self.output
                    .verbose(&format!("Resolved on PATH: {}", path.display()))?;
            }
            Verification::Found(path) => {
                log::warn!("{} shadows {}", path.display(), installed.display());
                self.output.warn(&format!(
                    "{} on PATH resolves to {}, which shadows {}",
                    app_name,
                    path.display(),
                    installed.display()
                ))?;
            }
            Verification::Warning(message) => {
                log::warn!("{message}");
                self.output.warn(message)?;
            }
        }

        self.output
            .success(&format!("{app_name} installed at {}", installed.display()))?;
        self.output.indent(&format!("Version: {version_label}"))?;

        if let Some(advisory) = self.profile.post_install_advisory(&installed) {
            self.output.section("macOS quarantine")?;
            for line in advisory.lines() {
                self.output.indent(line)?;
            }
        }

        Ok(Some(verification))
    }
}

/// Prints the failure kind, its cause and a corrective hint.
pub fn report_failure(output: &OutputManager, outcome: &InstallOutcome) -> io::Result<()> {
    let Some(kind) = outcome.error else {
        return output.error("installation failed");
    };
    match &outcome.message {
        Some(message) => output.error(&format!("{kind}: {message}"))?,
        None => output.error(&kind.to_string())?,
    }
    output.indent(&format!("hint: {}", kind.hint()))
}
