//! Installer pipeline: platform resolution, artifact location, privilege
//! resolution, atomic placement, reporting and the scoped workspace.
//!
//! # Module Organization
//!
//! - [`settings`] - Architecture tables, OS profiles and the install request
//! - [`platform`] - Raw architecture to platform tag
//! - [`locator`] - Finds the artifact next to the installer
//! - [`privilege`] - Direct vs. elevated execution and the elevation seam
//! - [`placement`] - Atomic copy into the target directory
//! - [`report`] - Search-path verification and console summary
//! - [`output`] - Console sink shared by the pipeline and the CLI
//! - [`workspace`] - Scoped temporary directory
//! - [`interrupt`] - Cooperative stop on Ctrl-C or SIGTERM
//! - [`orchestrator`] - The [`Installer`] pipeline tying it together

mod checksum;
mod error;
pub mod interrupt;
pub mod locator;
mod orchestrator;
mod outcome;
pub mod output;
pub mod placement;
pub mod platform;
pub mod privilege;
pub mod report;
pub mod settings;
pub mod workspace;

pub use checksum::file_sha256;
pub use error::{Error, ErrorExt, Result};
pub use interrupt::{INTERRUPTED_EXIT_CODE, Interrupt, run_interruptible};
pub use orchestrator::{HostInfo, Installer};
pub use outcome::{ErrorKind, InstallOutcome, Stage};
pub use output::{CapturedOutput, OutputManager};
pub use placement::{INSTALL_MODE, PlacementJob, Placer};
pub use privilege::{
    Access, AccessProbe, ElevatedCommand, ElevationProvider, ElevationStatus, ExecutionMode,
    PLACE_FAILURE_EXIT_CODE, SudoElevation, SystemAccess, ensure_writable, ensure_writable_with,
};
pub use report::{Reporter, Verification};
pub use settings::{InstallRequest, OsFamily, OsProfile, PlatformTag};
pub use workspace::ScopedWorkspace;
