//! Console output for human-readable progress and results.
//!
//! Used by the pipeline for progress and reports and by the CLI for notices.

use colored::Colorize;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
enum Sink {
    Terminal,
    Buffer(Arc<Mutex<Vec<u8>>>),
}

/// Handle to text written by a captured [`OutputManager`].
#[derive(Debug, Clone)]
pub struct CapturedOutput(Arc<Mutex<Vec<u8>>>);

impl CapturedOutput {
    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        match self.0.lock() {
            Ok(buf) => String::from_utf8_lossy(&buf).into_owned(),
            Err(poisoned) => String::from_utf8_lossy(&poisoned.into_inner()).into_owned(),
        }
    }
}

/// Writes structured progress lines to the terminal (colored) or a buffer (plain).
///
/// Warnings and errors go to stderr on the terminal; everything else to stdout.
#[derive(Debug, Clone)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
    sink: Sink,
}

impl OutputManager {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            sink: Sink::Terminal,
        }
    }

    /// Output manager that records plain text instead of printing.
    pub fn captured() -> (Self, CapturedOutput) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let manager = Self {
            verbose: true,
            quiet: false,
            sink: Sink::Buffer(Arc::clone(&buffer)),
        };
        (manager, CapturedOutput(buffer))
    }

    fn emit(&self, to_stderr: bool, plain: &str, styled: String) -> io::Result<()> {
        match &self.sink {
            Sink::Terminal if to_stderr => writeln!(io::stderr().lock(), "{styled}"),
            Sink::Terminal => writeln!(io::stdout().lock(), "{styled}"),
            Sink::Buffer(buffer) => {
                let mut buf = buffer
                    .lock()
                    .map_err(|_| io::Error::other("output buffer poisoned"))?;
                writeln!(buf, "{plain}")
            }
        }
    }

    /// Detail line shown only in verbose mode.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if !self.verbose || self.quiet {
            return Ok(());
        }
        self.emit(false, message, message.dimmed().to_string())
    }

    pub fn progress(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let plain = format!("→ {message}");
        self.emit(false, &plain, format!("{} {message}", "→".cyan()))
    }

    pub fn section(&self, title: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.emit(false, &format!("== {title} =="), title.bold().underline().to_string())
    }

    pub fn indent(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let plain = format!("    {message}");
        self.emit(false, &plain, plain.clone())
    }

    pub fn success(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let plain = format!("✓ {message}");
        self.emit(false, &plain, format!("{} {}", "✓".green().bold(), message.green()))
    }

    pub fn warn(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let plain = format!("⚠ {message}");
        self.emit(true, &plain, format!("{} {}", "⚠".yellow().bold(), message.yellow()))
    }

    /// Errors are printed even in quiet mode.
    pub fn error(&self, message: &str) -> io::Result<()> {
        let plain = format!("✗ {message}");
        self.emit(true, &plain, format!("{} {}", "✗".red().bold(), message.red()))
    }
}
