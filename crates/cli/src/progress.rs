//! Progress indicators
//!
//! Provides progress bars for long-running operations. Bars draw to stderr
//! and stay hidden when it is not a terminal.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

fn bar_style(template: &str) -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓░")
}

/// Create a progress bar for determinate progress
pub fn progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(bar_style("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})"));
    pb.set_message(message.to_string());
    pb
}

/// Create a progress bar for photo processing
pub fn photo_progress(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(bar_style(
        "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} photos ({eta})",
    ));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Finish a progress bar with a success message
pub fn finish_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✓ {}", message));
}
