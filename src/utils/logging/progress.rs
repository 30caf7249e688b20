//! Progress reporting for ingestion

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// One tick per source file
pub const LOAD_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {pos}/{len} {msg}";

/// Progress bar over the sources about to be loaded
#[must_use]
pub fn load_progress(sources: usize) -> ProgressBar {
    let pb = ProgressBar::new(sources as u64);
    if let Ok(style) = ProgressStyle::default_spinner().template(LOAD_TEMPLATE) {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Mark one source as loaded
pub fn source_loaded(pb: &ProgressBar, relation: &str, rows: usize) {
    pb.inc(1);
    pb.set_message(format!("{relation}: {rows} rows"));
}

/// Close the bar, keeping `message` on screen
pub fn finish_load_progress(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(message.to_string());
}
