//! Log lines for file reads and writes
//!
//! The Parquet, CSV, JSON and SVG writers all announce and confirm their work
//! through these helpers so the run log reads uniformly.

use std::path::Path;
use std::time::Duration;

use ::log::{info, warn};

/// Announce a read or write of `path`
pub fn log_operation_start(operation: &str, path: &Path) {
    info!("{operation} {}", path.display());
}

/// Confirm a finished read or write
///
/// # Arguments
/// * `verb` - Past-tense description, e.g. "wrote"
/// * `path` - File that was read or written
/// * `rows` - Rows (or items) handled
/// * `elapsed` - Duration, when the caller timed the operation
pub fn log_operation_complete(verb: &str, path: &Path, rows: usize, elapsed: Option<Duration>) {
    match elapsed {
        Some(duration) => info!(
            "Successfully {verb} {rows} rows at {} in {duration:.2?}",
            path.display()
        ),
        None => info!("Successfully {verb} {rows} rows at {}", path.display()),
    }
}

/// Log a warning with an optional related path
pub fn log_warning(message: &str, path: Option<&Path>) {
    match path {
        Some(path) => warn!("{message}: {}", path.display()),
        None => warn!("{message}"),
    }
}
