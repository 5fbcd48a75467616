//! Elevated placement entry point.
//!
//! Invoked as `ssbt-install place ...` through the elevation provider. Only
//! the copy runs here; all resolution already happened in the caller.

use std::path::PathBuf;

use super::Shutdown;
use crate::installer::{
    Error, INTERRUPTED_EXIT_CODE, Interrupt, PLACE_FAILURE_EXIT_CODE, PlacementJob, placement,
    run_interruptible,
};

/// Places the staged binary and returns the exit code the caller decodes.
///
/// A Ctrl-C that reaches this process stops the copy between chunks and
/// removes the staging file before exiting with status 130.
pub async fn place(source: PathBuf, target_dir: PathBuf, app_name: String, sha256: String) -> i32 {
    let job = PlacementJob {
        source,
        target_dir,
        app_name,
        sha256: sha256.to_ascii_lowercase(),
    };

    let mut shutdown = match Shutdown::install() {
        Ok(shutdown) => shutdown,
        Err(e) => {
            eprintln!("Error: installing signal handlers: {e}");
            return PLACE_FAILURE_EXIT_CODE;
        }
    };

    let interrupt = Interrupt::new();
    let worker = interrupt.clone();
    let task = tokio::task::spawn_blocking(move || placement::place_interruptible(&job, &worker));
    let (joined, _signal) = run_interruptible(task, &interrupt, shutdown.recv()).await;

    match joined {
        Ok(Ok(path)) => {
            log::info!("elevated placement wrote {}", path.display());
            0
        }
        Ok(Err(Error::Interrupted)) => INTERRUPTED_EXIT_CODE,
        Ok(Err(e)) => {
            eprintln!("Error: {e}");
            PLACE_FAILURE_EXIT_CODE
        }
        Err(e) => {
            eprintln!("Error: placement task panicked: {e}");
            PLACE_FAILURE_EXIT_CODE
        }
    }
}
