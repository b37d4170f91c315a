use crate::domain::model::{ProgressEvent, ProgressStatus};
use crate::domain::traits::ProgressSink;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Terminal progress bar for batch translation
pub struct BarProgress {
    bar: ProgressBar,
    failed: AtomicUsize,
}

impl BarProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        ) {
            bar.set_style(style.progress_chars("#>-"));
        }
        Self {
            bar,
            failed: AtomicUsize::new(0),
        }
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for BarProgress {
    fn report(&self, event: ProgressEvent) {
        self.bar.set_length(event.total as u64);
        self.bar.set_position(event.current as u64);
        match event.status {
            ProgressStatus::Translated => self.bar.set_message(event.table_name),
            ProgressStatus::Failed => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                self.bar.set_message(format!("{} (failed)", event.table_name));
            }
            ProgressStatus::Completed => {
                let failed = self.failed.load(Ordering::Relaxed);
                self.bar.finish_with_message(format!(
                    "{} done, {} failed",
                    event.connection_id, failed
                ));
            }
        }
    }
}
