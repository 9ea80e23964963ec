//! Per-step timing and run counters, owned by the orchestrator and
//! reported once at the end of a run.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    EnsureTagHeader,
    WarnBitrate,
    CleanFilename,
    ExtractTitleArtist,
    DetectKey,
    Comments,
    Relocate,
    DeriveGenre,
    Playlists,
}

impl Step {
    pub fn name(self) -> &'static str {
        match self {
            Step::EnsureTagHeader => "ensure tag header",
            Step::WarnBitrate => "check bitrate",
            Step::CleanFilename => "clean file name",
            Step::ExtractTitleArtist => "title/artist",
            Step::DetectKey => "detect key",
            Step::Comments => "comments",
            Step::Relocate => "relocate",
            Step::DeriveGenre => "genre",
            Step::Playlists => "playlists",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct StepTiming {
    pub runs: u32,
    pub total: Duration,
}

/// Cumulative elapsed time per step.
#[derive(Debug, Clone, Default)]
pub struct StepTimings {
    steps: BTreeMap<Step, StepTiming>,
}

impl StepTimings {
    pub fn record(&mut self, step: Step, elapsed: Duration) {
        let entry = self.steps.entry(step).or_default();
        entry.runs += 1;
        entry.total += elapsed;
    }

    pub fn get(&self, step: Step) -> StepTiming {
        self.steps.get(&step).copied().unwrap_or_default()
    }

    pub fn total(&self) -> Duration {
        self.steps.values().map(|t| t.total).sum()
    }

    /// Plain-text table, one line per step that ran, in pipeline order.
    pub fn report(&self) -> String {
        let mut out = format!("{:<20} {:>6} {:>10}\n", "step", "runs", "seconds");
        for (step, timing) in &self.steps {
            out.push_str(&format!(
                "{:<20} {:>6} {:>10.3}\n",
                step.name(),
                timing.runs,
                timing.total.as_secs_f64()
            ));
        }
        out.push_str(&format!(
            "{:<20} {:>6} {:>10.3}",
            "total",
            "",
            self.total().as_secs_f64()
        ));
        out
    }
}

/// What happened to the files of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub failed: usize,
    pub relocated: usize,
    pub renamed: usize,
    pub headers_created: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} processed, {} failed, {} moved, {} renamed, {} new tag headers",
            self.processed, self.failed, self.relocated, self.renamed, self.headers_created
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_accumulates_runs_and_time() {
        let mut t = StepTimings::default();
        t.record(Step::DetectKey, Duration::from_millis(200));
        t.record(Step::DetectKey, Duration::from_millis(300));
        t.record(Step::Relocate, Duration::from_millis(10));

        assert_eq!(
            t.get(Step::DetectKey),
            StepTiming {
                runs: 2,
                total: Duration::from_millis(500)
            }
        );
        assert_eq!(t.get(Step::Playlists), StepTiming::default());
        assert_eq!(t.total(), Duration::from_millis(510));
    }

    #[test]
    fn report_lists_steps_in_pipeline_order() {
        let mut t = StepTimings::default();
        t.record(Step::DeriveGenre, Duration::from_millis(1));
        t.record(Step::EnsureTagHeader, Duration::from_millis(1));

        let report = t.report();
        let header = report.find("ensure tag header").unwrap();
        let genre = report.find("genre").unwrap();
        assert!(header < genre);
        assert!(report.lines().last().unwrap().starts_with("total"));
    }
}
