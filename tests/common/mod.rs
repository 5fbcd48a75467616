//! Shared helpers for installer integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use ssbt_installer::installer::{
    Access, AccessProbe, ElevatedCommand, ElevationProvider, ElevationStatus, Interrupt, placement,
};

pub const APP: &str = "ssbt-tool";

/// Writes a fake executable named `ssbt-tool` into `dir`.
pub fn write_artifact(dir: &Path, contents: &[u8]) -> PathBuf {
    let path = dir.join(APP);
    std::fs::write(&path, contents).expect("write artifact");
    path
}

/// Names of all entries in `dir`.
pub fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("read dir")
        .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

pub fn running_as_root() -> bool {
    users::get_current_uid() == 0
}

/// Probe that always returns the same answer.
pub struct FixedAccess(pub Access);

impl AccessProbe for FixedAccess {
    fn check_writable(&self, _dir: &Path) -> Access {
        self.0
    }
}

/// What a [`FakeElevation`] does when asked to run something.
#[derive(Clone, Debug)]
pub enum FakeResponse {
    /// Perform the placement in-process, as the elevated child would
    Grant,
    Deny,
    Unavailable,
    /// Report the child as failed without placing anything
    FailPlacement,
    /// Block until the interrupt fires (at most 10s), then place with it
    PlaceOnceInterrupted(Interrupt),
}

/// Elevation provider that records calls instead of escalating.
pub struct FakeElevation {
    response: FakeResponse,
    calls: Mutex<Vec<ElevatedCommand>>,
}

impl FakeElevation {
    pub fn new(response: FakeResponse) -> Self {
        Self {
            response,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<ElevatedCommand> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl ElevationProvider for FakeElevation {
    fn run_elevated(
        &self,
        command: &ElevatedCommand,
    ) -> ssbt_installer::installer::Result<ElevationStatus> {
        self.calls.lock().expect("calls lock").push(command.clone());
        Ok(match &self.response {
            FakeResponse::Grant => match placement::place(&command.job) {
                Ok(_) => ElevationStatus::Completed,
                Err(e) => ElevationStatus::Failed(e.to_string()),
            },
            FakeResponse::Deny => ElevationStatus::Denied("authentication failed".into()),
            FakeResponse::Unavailable => ElevationStatus::Unavailable("no sudo".into()),
            FakeResponse::FailPlacement => ElevationStatus::Failed("disk full".into()),
            FakeResponse::PlaceOnceInterrupted(interrupt) => {
                let deadline = Instant::now() + Duration::from_secs(10);
                while !interrupt.is_triggered() && Instant::now() < deadline {
                    std::thread::sleep(Duration::from_millis(5));
                }
                match placement::place_interruptible(&command.job, interrupt) {
                    Ok(_) => ElevationStatus::Completed,
                    Err(e) => ElevationStatus::Failed(e.to_string()),
                }
            }
        })
    }
}
