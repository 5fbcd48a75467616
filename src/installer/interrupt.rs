//! Cooperative interruption of an installer run.
//!
//! A signal never drops the pipeline mid-flight. It sets an [`Interrupt`]
//! flag, and the pipeline stops at the next stage boundary or copy chunk,
//! so blocking placement work still removes its staging file.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::{Error, Result};

/// Exit status of a run stopped by Ctrl-C or SIGTERM.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Shared stop flag. Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks every holder to stop at its next check.
    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Fails with [`Error::Interrupted`] once triggered.
    pub fn check(&self) -> Result<()> {
        if self.is_triggered() {
            Err(Error::Interrupted)
        } else {
            Ok(())
        }
    }
}

/// Drives `work` to completion, triggering `interrupt` if `shutdown` fires first.
///
/// Returns the output of `work` and the name of the signal that arrived, if
/// any. `work` is always awaited to the end.
pub async fn run_interruptible<W, S>(
    work: W,
    interrupt: &Interrupt,
    shutdown: S,
) -> (W::Output, Option<&'static str>)
where
    W: Future,
    S: Future<Output = &'static str>,
{
    tokio::pin!(work);

    let signal = tokio::select! {
        biased;
        output = &mut work => return (output, None),
        signal = shutdown => signal,
    };

    log::warn!("received {signal}, stopping at the next safe point");
    interrupt.trigger();
    (work.await, Some(signal))
}
