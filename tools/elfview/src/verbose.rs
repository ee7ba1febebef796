//! Verbosity-gated diagnostics on stderr.
//!
//! stdout carries only rendered tables. Everything else (warnings about
//! unusual input, file sizes, table counts, decode timing) goes through the
//! macros here, gated by the level chosen with `-q` / `-v`.

use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Instant;

/// Diagnostic level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Verbosity {
    /// Errors only.
    Quiet = 0,
    /// Warnings as well.
    Normal = 1,
    /// Decode statistics and timing as well.
    Verbose = 2,
}

impl Verbosity {
    /// Level selected by the `-q` / `-v` flags. `-q` wins if both are set.
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, true) => Self::Verbose,
            (false, false) => Self::Normal,
        }
    }
}

static LEVEL: AtomicU8 = AtomicU8::new(Verbosity::Normal as u8);

/// Set the process-wide level. Called once from `main`.
pub fn init(level: Verbosity) {
    LEVEL.store(level as u8, Ordering::Relaxed);
}

/// Returns `true` if diagnostics at `level` are currently printed.
pub fn enabled(level: Verbosity) -> bool {
    LEVEL.load(Ordering::Relaxed) >= level as u8
}

/// `eprintln!` shown only with `-v`.
macro_rules! vprintln {
    ($($arg:tt)*) => {
        if $crate::verbose::enabled($crate::verbose::Verbosity::Verbose) {
            eprintln!($($arg)*);
        }
    };
}

pub(crate) use vprintln;

/// `eprintln!` for warnings, hidden by `-q`.
macro_rules! dprintln {
    ($($arg:tt)*) => {
        if $crate::verbose::enabled($crate::verbose::Verbosity::Normal) {
            eprintln!($($arg)*);
        }
    };
}

pub(crate) use dprintln;

/// Reports how long a phase took when dropped, in verbose mode.
///
/// ```ignore
/// let _t = Timer::start("decode");
/// ```
pub struct Timer {
    label: &'static str,
    start: Instant,
}

impl Timer {
    /// Start timing `label`.
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        if enabled(Verbosity::Verbose) {
            eprintln!("  {}: {:.1?}", self.label, self.start.elapsed());
        }
    }
}
