//! Main installer orchestration.
//!
//! Drives the run through its stages:
//!
//! 1. Resolve the platform tag from the host architecture and OS family
//! 2. Locate the artifact next to the installer
//! 3. Decide direct vs. elevated execution
//! 4. Stage a snapshot in the workspace and place it atomically
//! 5. Verify on the search path and report
//!
//! Any failure short-circuits to `Failed(kind)`. Nothing under the target
//! directory is touched before step 4. A triggered [`Interrupt`] is honored at
//! every stage boundary and inside placement.

use std::path::PathBuf;
use std::sync::Arc;

use super::interrupt::Interrupt;
use super::outcome::{InstallOutcome, Stage};
use super::output::OutputManager;
use super::placement::Placer;
use super::privilege::{AccessProbe, ElevationProvider, SystemAccess, ensure_writable_with};
use super::report::Reporter;
use super::settings::{InstallRequest, OsFamily, PlatformTag};
use super::workspace::ScopedWorkspace;
use super::{Error, Result, locator, platform};

/// Facts about the running machine, detected once at startup.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HostInfo {
    /// Architecture string as reported by the OS
    pub raw_arch: String,
    pub os: OsFamily,
}

impl HostInfo {
    pub fn new(raw_arch: impl Into<String>, os: OsFamily) -> Self {
        Self {
            raw_arch: raw_arch.into(),
            os,
        }
    }

    /// Reads `uname -m` and the compile-time OS family.
    pub fn detect() -> Result<Self> {
        Ok(Self {
            raw_arch: platform::host_machine()?,
            os: OsFamily::current()?,
        })
    }
}

/// Installer pipeline.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use ssbt_installer::installer::{
///     HostInfo, InstallRequest, Installer, OutputManager, ScopedWorkspace, SudoElevation,
/// };
///
/// # async fn example() -> ssbt_installer::installer::Result<()> {
/// let request = InstallRequest::builder().source_directory("/opt/ssbt").build()?;
/// let installer = Installer::new(
///     OutputManager::new(true, false),
///     Arc::new(SudoElevation),
///     std::env::current_exe()?,
/// );
/// let workspace = ScopedWorkspace::acquire()?;
/// let outcome = installer.run(&request, &HostInfo::detect()?, &workspace).await;
/// workspace.release()?;
/// std::process::exit(outcome.exit_code());
/// # }
/// ```
pub struct Installer {
    output: OutputManager,
    placer: Placer,
    access: Arc<dyn AccessProbe>,
    interrupt: Interrupt,
}

impl std::fmt::Debug for Installer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Installer")
            .field("output", &self.output)
            .field("placer", &self.placer)
            .field("access", &"<AccessProbe>")
            .field("interrupt", &self.interrupt)
            .finish()
    }
}

impl Installer {
    /// Creates an installer that elevates through `elevation`, re-invoking `program`.
    pub fn new(
        output: OutputManager,
        elevation: Arc<dyn ElevationProvider>,
        program: PathBuf,
    ) -> Self {
        Self {
            output,
            placer: Placer::new(elevation, program),
            access: Arc::new(SystemAccess),
            interrupt: Interrupt::new(),
        }
    }

    /// Stops the run at the next safe point once `interrupt` is triggered.
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.placer = self.placer.with_interrupt(interrupt.clone());
        self.interrupt = interrupt;
        self
    }

    /// Replaces the write-access probe used by the privilege resolver.
    pub fn with_access_probe(mut self, probe: Arc<dyn AccessProbe>) -> Self {
        self.access = probe;
        self
    }

    pub fn output(&self) -> &OutputManager {
        &self.output
    }

    /// Runs the pipeline to a terminal stage and reports the result.
    ///
    /// Never panics on pipeline failure; the failure is carried in the
    /// returned outcome. The caller releases `workspace`.
    pub async fn run(
        &self,
        request: &InstallRequest,
        host: &HostInfo,
        workspace: &ScopedWorkspace,
    ) -> InstallOutcome {
        let mut stage = Stage::Start;

        let outcome = match self.execute(request, host, workspace, &mut stage).await {
            Ok(installed) => {
                advance(&mut stage, Stage::Verifying);
                InstallOutcome::succeeded(installed)
            }
            Err(e) => {
                log::debug!("{stage} failed: {e}");
                advance(&mut stage, Stage::Failed(e.kind()));
                InstallOutcome::failed(&e)
            }
        };

        let reporter = Reporter::new(
            &self.output,
            host.os.profile(),
            request.search_path().cloned(),
            request.working_directory().to_path_buf(),
        );
        if let Err(e) = reporter.report(&outcome, request.application_name(), request.version_label())
        {
            log::warn!("failed to write report: {e}");
        }

        if outcome.success {
            advance(&mut stage, Stage::Succeeded);
        }
        debug_assert!(stage.is_terminal());
        outcome
    }

    async fn execute(
        &self,
        request: &InstallRequest,
        host: &HostInfo,
        workspace: &ScopedWorkspace,
        stage: &mut Stage,
    ) -> Result<PathBuf> {
        let app_name = request.application_name();
        let target_dir = request.target_directory();

        self.output.section(&format!("Installing {app_name}"))?;

        self.enter(stage, Stage::ResolvingPlatform)?;
        let tag: PlatformTag = platform::resolve(&host.raw_arch, host.os)?;
        log::info!("platform {tag} ({})", tag.target_triple());
        self.output.progress(&format!("Platform: {tag}"))?;

        self.enter(stage, Stage::LocatingArtifact)?;
        let source =
            locator::locate(request.source_directory(), app_name, request.working_directory())?;
        let source_dir = source.parent().unwrap_or(request.source_directory());
        self.output
            .progress(&format!("Source directory: {}", source_dir.display()))?;
        self.output
            .progress(&format!("Target directory: {}", target_dir.display()))?;

        self.enter(stage, Stage::ResolvingPrivilege)?;
        let mode = ensure_writable_with(self.access.as_ref(), target_dir);
        log::info!("execution mode: {mode}");
        self.output.verbose(&format!("Execution mode: {mode}"))?;

        self.enter(stage, Stage::Installing)?;
        let staged = workspace
            .stage_artifact(&source, app_name)
            .await
            .map_err(|e| e.into_install_failure(&request.target_path()))?;
        self.interrupt.check()?;
        self.output.progress(&format!("Copying to {}", request.target_path().display()))?;
        let installed = self
            .placer
            .install(&staged, target_dir, app_name, mode)
            .await?;

        Ok(installed)
    }

    fn enter(&self, stage: &mut Stage, next: Stage) -> Result<()> {
        self.interrupt.check()?;
        advance(stage, next);
        Ok(())
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    log::debug!("stage: {stage} -> {next}");
    *stage = next;
}

impl From<Error> for InstallOutcome {
    fn from(error: Error) -> Self {
        InstallOutcome::failed(&error)
    }
}
