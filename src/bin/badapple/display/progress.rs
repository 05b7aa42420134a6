use std::io::{self, Write};
use std::time::{Duration, Instant};

use badapple::ProcessStats;
use indicatif::{ProgressBar, ProgressStyle};

pub struct MolSpinner {
    bar: ProgressBar,
    start: Instant,
}

impl MolSpinner {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("  {spinner:.cyan} {msg} {elapsed:>6}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(80));
        bar.set_message("Processing molecules...");
        Self {
            bar,
            start: Instant::now(),
        }
    }

    pub fn update(&mut self, stats: &ProcessStats) {
        self.bar.set_message(format!(
            "Processing molecules: {} read, {} annotated, {} written",
            stats.read, stats.annotated, stats.written
        ));
    }

    pub fn finish(self, stats: &ProcessStats) {
        self.bar.finish_and_clear();
        print_summary(stats, self.start.elapsed());
    }

    pub fn abandon(self) {
        self.bar.finish_and_clear();
    }
}

fn print_summary(stats: &ProcessStats, elapsed: Duration) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(
        stderr,
        "  \x1b[32m✓\x1b[0m {:<44} {:>5.1}s",
        "Processing complete",
        elapsed.as_secs_f64()
    );
    let lines = [
        format!("{} read, {} skipped", stats.read, stats.skipped),
        format!(
            "{} annotated, {} without scaffold match",
            stats.annotated, stats.unmatched
        ),
        format!("{} over atom/ring limits", stats.filtered),
        format!("{} malformed records", stats.errors),
        format!("{} written", stats.written),
    ];
    for line in lines {
        let _ = writeln!(stderr, "      \x1b[2m·\x1b[0m {line}");
    }
    let _ = writeln!(stderr);
}

pub enum Progress {
    Interactive(MolSpinner),
    Silent,
}

impl Progress {
    pub fn new(interactive: bool) -> Self {
        if interactive {
            Self::Interactive(MolSpinner::new())
        } else {
            Self::Silent
        }
    }

    pub fn update(&mut self, stats: &ProcessStats) {
        if let Self::Interactive(s) = self {
            s.update(stats);
        }
    }

    pub fn finish(self, stats: &ProcessStats) {
        if let Self::Interactive(s) = self {
            s.finish(stats);
        }
    }

    /// Clears the spinner without a summary, for failed runs.
    pub fn abandon(self) {
        if let Self::Interactive(s) = self {
            s.abandon();
        }
    }
}
