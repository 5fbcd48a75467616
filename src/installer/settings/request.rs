//! The immutable install request and its builder.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Name of the executable this installer places.
pub const DEFAULT_APP_NAME: &str = "ssbt-tool";

/// Where the executable goes unless overridden.
pub const DEFAULT_TARGET_DIR: &str = "/usr/local/bin";

/// Version label used when none is supplied.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Everything the pipeline needs from the process environment, captured once.
///
/// Constructed via [`InstallRequestBuilder`] at startup; later stages never
/// read environment variables or the working directory themselves.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InstallRequest {
    application_name: String,
    version_label: String,
    source_directory: PathBuf,
    target_directory: PathBuf,
    /// Snapshot of `PATH` used for post-install verification.
    search_path: Option<OsString>,
    /// Working directory snapshot, for absolutizing relative paths.
    working_directory: PathBuf,
}

impl InstallRequest {
    pub fn builder() -> InstallRequestBuilder {
        InstallRequestBuilder::default()
    }

    pub fn application_name(&self) -> &str {
        &self.application_name
    }

    pub fn version_label(&self) -> &str {
        &self.version_label
    }

    pub fn source_directory(&self) -> &Path {
        &self.source_directory
    }

    pub fn target_directory(&self) -> &Path {
        &self.target_directory
    }

    pub fn search_path(&self) -> Option<&OsString> {
        self.search_path.as_ref()
    }

    pub fn working_directory(&self) -> &Path {
        &self.working_directory
    }

    /// Final location of the executable inside the target directory.
    pub fn target_path(&self) -> PathBuf {
        self.target_directory.join(&self.application_name)
    }
}

/// Builder for [`InstallRequest`].
///
/// # Examples
///
/// ```no_run
/// use ssbt_installer::installer::InstallRequest;
///
/// # fn example() -> ssbt_installer::installer::Result<()> {
/// let request = InstallRequest::builder()
///     .source_directory("/opt/ssbt")
///     .version_label(Some("1.2.0".to_string()))
///     .build()?;
/// assert_eq!(request.target_path().to_str(), Some("/usr/local/bin/ssbt-tool"));
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct InstallRequestBuilder {
    application_name: Option<String>,
    version_label: Option<String>,
    source_directory: Option<PathBuf>,
    target_directory: Option<PathBuf>,
    search_path: Option<OsString>,
    working_directory: Option<PathBuf>,
}

impl InstallRequestBuilder {
    /// Default: [`DEFAULT_APP_NAME`]
    pub fn application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = Some(name.into());
        self
    }

    /// Empty or missing labels become [`UNKNOWN_VERSION`].
    pub fn version_label(mut self, label: Option<String>) -> Self {
        self.version_label = label.filter(|l| !l.trim().is_empty());
        self
    }

    /// # Required
    ///
    /// This field is required for building.
    pub fn source_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.source_directory = Some(path.as_ref().to_path_buf());
        self
    }

    /// Default: [`DEFAULT_TARGET_DIR`]
    pub fn target_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.target_directory = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn search_path(mut self, path: Option<OsString>) -> Self {
        self.search_path = path;
        self
    }

    /// Default: `/`
    pub fn working_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.working_directory = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn build(self) -> crate::installer::Result<InstallRequest> {
        let source_directory = self.source_directory.ok_or_else(|| {
            crate::installer::Error::GenericError("source_directory is required".into())
        })?;
        let application_name = self
            .application_name
            .unwrap_or_else(|| DEFAULT_APP_NAME.to_string());
        if application_name.is_empty() || application_name.contains(std::path::is_separator) {
            crate::bail!("invalid application name: {application_name:?}");
        }

        Ok(InstallRequest {
            application_name,
            version_label: self
                .version_label
                .unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
            source_directory,
            target_directory: self
                .target_directory
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TARGET_DIR)),
            search_path: self.search_path,
            working_directory: self.working_directory.unwrap_or_else(|| PathBuf::from("/")),
        })
    }
}
