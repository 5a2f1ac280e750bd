//! Shared helpers: logging, progress bars, descriptive statistics and
//! environment overrides.

pub mod logging;
pub mod stats;

pub use logging::{log_operation_complete, log_operation_start, log_warning};
pub use stats::{expit, linspace, mean, sample_std_dev, sample_variance};

/// Read a typed override from the environment
///
/// Returns `None` when the variable is unset or does not parse, so callers can
/// fall back to their compiled-in default.
#[must_use]
pub fn env_override<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            log_warning(&format!("Ignoring unparsable value for {key}: {raw:?}"), None);
            None
        }
    }
}

/// Interpret common truthy/falsy spellings of an environment flag
#[must_use]
pub fn env_flag(key: &str) -> Option<bool> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            log_warning(&format!("Ignoring unrecognised flag value for {key}: {raw:?}"), None);
            None
        }
    }
}
