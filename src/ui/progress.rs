use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress bar shown while mark tables load
pub struct ProgressReporter {
    bar: Option<ProgressBar>,
    enabled: bool,
}

impl ProgressReporter {
    pub fn new(enabled: bool) -> Self {
        Self { bar: None, enabled }
    }

    pub fn start_loading(&mut self, total_tables: usize) {
        if !self.enabled {
            return;
        }

        let pb = ProgressBar::new(total_tables as u64);
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} tables loaded ({eta})",
        ) {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb.set_message("Loading mark tables");
        pb.enable_steady_tick(Duration::from_millis(120));
        self.bar = Some(pb);
    }

    /// Record one loaded table; safe to call from worker threads
    pub fn advance(&self) {
        if let Some(ref pb) = self.bar {
            pb.inc(1);
        }
    }

    pub fn position(&self) -> u64 {
        self.bar.as_ref().map(ProgressBar::position).unwrap_or(0)
    }

    pub fn finish_loading(&self) {
        if let Some(ref pb) = self.bar {
            pb.finish_and_clear();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}
