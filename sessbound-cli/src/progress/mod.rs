//! Progress reporting module

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter for long session passes
pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
    quiet: bool,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new(quiet: bool) -> Self {
        Self {
            progress_bar: None,
            quiet,
        }
    }

    /// Initialize a bar counting `total` sessions
    pub fn init_sessions(&mut self, total: u64, action: &str) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} sessions {msg}")
        {
            pb.set_style(style.progress_chars("##-"));
        }
        pb.set_message(action.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        self.progress_bar = Some(pb);
    }

    /// Initialize a spinner for a pass of unknown length
    pub fn init_spinner(&mut self, action: &str) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} [{elapsed}] {msg}") {
            pb.set_style(style);
        }
        pb.set_message(action.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        self.progress_bar = Some(pb);
    }

    /// Move the bar to `done` sessions
    pub fn sessions_completed(&self, done: u64) {
        if let Some(pb) = &self.progress_bar {
            pb.set_position(done);
        }
    }

    /// Finish progress reporting
    pub fn finish(&self) {
        if let Some(pb) = &self.progress_bar {
            pb.finish_and_clear();
        }
    }

    /// Whether anything is drawn
    pub fn is_active(&self) -> bool {
        self.progress_bar.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_reporter_draws_nothing() {
        let mut reporter = ProgressReporter::new(true);
        reporter.init_sessions(10, "evaluating");
        assert!(!reporter.is_active());
        reporter.sessions_completed(5);
        reporter.finish();
    }

    #[test]
    fn test_reporter_tracks_position() {
        let mut reporter = ProgressReporter::new(false);
        reporter.init_sessions(4, "evaluating");
        reporter.sessions_completed(3);
        assert_eq!(reporter.progress_bar.as_ref().map(|pb| pb.position()), Some(3));
        reporter.finish();
    }

    #[test]
    fn test_spinner() {
        let mut reporter = ProgressReporter::new(false);
        reporter.init_spinner("inferring");
        assert!(reporter.is_active());
        reporter.finish();
    }
}
