#![deny(missing_docs)]
//! Shared logging utilities for the listing watch workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase.
//! Every message is prefixed with the poll cycle that was current when it was
//! logged, so a single cycle can be followed across the loop and engine threads.

use std::sync::atomic::{AtomicU64, Ordering};

/// Poll cycle shared by all threads; 0 means no cycle has started yet.
static CURRENT_CYCLE: AtomicU64 = AtomicU64::new(0);

/// Records the poll cycle that is now in flight.
/// Called by the scheduler loop whenever it dispatches a fetch.
pub fn set_current_cycle(cycle: u64) {
    CURRENT_CYCLE.store(cycle, Ordering::Relaxed);
}

/// Returns the poll cycle last recorded with [`set_current_cycle`].
pub fn current_cycle() -> u64 {
    CURRENT_CYCLE.load(Ordering::Relaxed)
}

/// Logs a trace-level message tagged with the current poll cycle.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        log::trace!("[cycle {}] {}", $crate::current_cycle(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message tagged with the current poll cycle.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        log::info!("[cycle {}] {}", $crate::current_cycle(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message tagged with the current poll cycle.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        log::debug!("[cycle {}] {}", $crate::current_cycle(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message tagged with the current poll cycle.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        log::warn!("[cycle {}] {}", $crate::current_cycle(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message tagged with the current poll cycle.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        log::error!("[cycle {}] {}", $crate::current_cycle(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test may have won the race to install a logger.
    let _ = TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto);
}
