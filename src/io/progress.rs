//! Terminal spinner for chunked layout generation

use crate::algorithm::{
    job::JobPhase,
    layout::GenerationReport,
};
use crate::io::configuration::PROGRESS_TICK_MS;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;
use std::time::Duration;

static SPINNER_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_spinner()
        .template("{spinner:.cyan} [{elapsed_precise}] {prefix} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
});

/// Short label for a job phase
pub const fn phase_label(phase: JobPhase) -> &'static str {
    match phase {
        JobPhase::ResetGrid { .. } => "resetting grid",
        JobPhase::PlaceRooms { .. } => "placing rooms",
        JobPhase::ConnectRooms => "carving corridors",
        JobPhase::Validate => "checking connectivity",
        JobPhase::Conclude => "concluding attempt",
        JobPhase::Finished => "finished",
    }
}

/// Spinner that follows a chunked generation job
pub struct GenerationProgress {
    bar: ProgressBar,
    budget: u32,
}

impl GenerationProgress {
    /// Create a spinner for a run of at most `budget` attempts
    pub fn new(budget: u32) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(SPINNER_STYLE.clone());
        bar.enable_steady_tick(Duration::from_millis(PROGRESS_TICK_MS));
        Self { bar, budget }
    }

    /// Report the attempt and phase that will run next
    pub fn update(&self, attempt: u32, phase: JobPhase) {
        self.bar
            .set_prefix(format!("attempt {}/{}", attempt + 1, self.budget));
        self.bar.set_message(phase_label(phase));
    }

    /// Stop the spinner with the run's verdict
    pub fn finish(&self, report: &GenerationReport) {
        let verdict = if report.success {
            format!(
                "✓ {} rooms, {} corridors (seed {})",
                report.rooms, report.corridors, report.final_seed
            )
        } else {
            format!("✗ no valid layout after {} attempt(s)", report.attempts)
        };
        self.bar.finish_with_message(verdict);
    }

    /// Remove the spinner without a verdict
    pub fn abandon(&self) {
        self.bar.finish_and_clear();
    }
}
