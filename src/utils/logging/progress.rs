//! Progress reporting for the replicate loop
//!
//! Thin wrappers around indicatif so every run shows the same bar layout.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Default style for the replicate progress bar
pub const DEFAULT_MAIN_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({per_sec}) {msg}";

/// Create the main progress bar with a standardized style
///
/// # Arguments
/// * `length` - Total length for the progress bar
/// * `description` - Optional description to display as the initial message
#[must_use]
pub fn create_main_progress_bar(length: u64, description: Option<&str>) -> ProgressBar {
    let pb = ProgressBar::new(length);
    let style = ProgressStyle::default_bar()
        .template(DEFAULT_MAIN_TEMPLATE)
        .map_or_else(|_| ProgressStyle::default_bar(), |s| s.progress_chars("#>-"));
    pb.set_style(style);

    if let Some(desc) = description {
        pb.set_message(desc.to_string());
    }

    pb
}

/// Progress bar for a replicate loop, hidden when `visible` is false
#[must_use]
pub fn replicate_progress_bar(replicates: usize, label: &str, visible: bool) -> ProgressBar {
    if visible {
        create_main_progress_bar(replicates as u64, Some(label))
    } else {
        ProgressBar::hidden()
    }
}

/// Create a spinner for operations without a known length
///
/// A hidden bar is returned when `visible` is false.
#[must_use]
pub fn create_spinner(message: Option<&str>, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} {elapsed_precise} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);

    if let Some(msg) = message {
        pb.set_message(msg.to_string());
    }

    pb.enable_steady_tick(Duration::from_millis(100));

    pb
}

/// Finish a progress bar with an optional completion message
pub fn finish_progress_bar(pb: &ProgressBar, message: Option<&str>) {
    if let Some(msg) = message {
        pb.finish_with_message(msg.to_string());
    } else {
        pb.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_bar_still_counts() {
        let pb = replicate_progress_bar(10, "test", false);
        pb.inc(3);
        assert_eq!(pb.position(), 3);
        assert!(pb.is_hidden());
        finish_progress_bar(&pb, None);
    }

    #[test]
    fn test_spinner_respects_visibility() {
        let hidden = create_spinner(Some("Generating population"), false);
        assert!(hidden.is_hidden());
        finish_progress_bar(&hidden, Some("done"));

        let shown = create_spinner(Some("Generating population"), true);
        assert_eq!(shown.message(), "Generating population");
        finish_progress_bar(&shown, None);
    }

    #[test]
    fn test_main_bar_length_and_message() {
        let pb = create_main_progress_bar(5, Some("Scenario 1"));
        assert_eq!(pb.length(), Some(5));
        assert_eq!(pb.message(), "Scenario 1");
    }
}
