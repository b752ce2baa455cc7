//! Output verbosity for batch runs.
//!
//! The CLI sets the level once at startup from `-v` / `-q`. Library code only
//! ever logs through the `verbose!()` macro, which writes `[verbose] ...` lines
//! to stderr when the level is [`Verbosity::Verbose`].

use std::sync::atomic::{AtomicU8, Ordering};

/// How chatty the process should be
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Only errors and the final summary
    Quiet,
    /// Per-file progress
    #[default]
    Normal,
    /// Progress plus request/poll tracing
    Verbose,
}

impl Verbosity {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Verbosity::Quiet,
            2 => Verbosity::Verbose,
            _ => Verbosity::Normal,
        }
    }
}

static LEVEL: AtomicU8 = AtomicU8::new(Verbosity::Normal as u8);

pub fn set_verbosity(level: Verbosity) {
    LEVEL.store(level as u8, Ordering::SeqCst);
}

pub fn verbosity() -> Verbosity {
    Verbosity::from_u8(LEVEL.load(Ordering::SeqCst))
}

pub fn is_verbose() -> bool {
    verbosity() == Verbosity::Verbose
}

pub fn is_quiet() -> bool {
    verbosity() == Verbosity::Quiet
}

/// Log a formatted trace line to stderr when running with `-v`
#[macro_export]
macro_rules! verbose {
    ($($arg:tt)*) => {
        if $crate::verbose::is_verbose() {
            eprintln!("[verbose] {}", format!($($arg)*));
        }
    };
}
