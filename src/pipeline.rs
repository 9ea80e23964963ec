//! Per-track pipeline orchestrator.
//!
//! Every step takes the current [`Track`] by value and returns the track
//! the next step must use. A step that renames or moves the file hands back
//! a track reopened at the new path, so a stale tag store can never be
//! carried forward.
//!
//! Recoverable problems (ambiguous names, missing key tool, a vanished
//! genre directory) are logged inside the step and the track continues.
//! Only I/O failures on the file itself end its run early.

mod metrics;
mod steps;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, error};

use crate::classify::Console;
use crate::config::Settings;
use crate::keys::KeyDetector;
use crate::library::LibraryLayout;
use crate::relocate::RelocateError;
use crate::tags::{TagError, TagId};
use crate::track::Track;

pub use metrics::{RunSummary, Step, StepTiming, StepTimings};

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error(transparent)]
    Tag(#[from] TagError),
    #[error(transparent)]
    Relocate(#[from] RelocateError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A file whose remaining steps were skipped.
#[derive(Debug, thiserror::Error)]
#[error("{step} failed for {}: {source}", .path.display())]
pub struct PipelineError {
    pub step: Step,
    pub path: PathBuf,
    pub source: StepError,
}

type StepFn<'a, R, W> = fn(&mut Pipeline<'a, R, W>, Track) -> Result<Track, StepError>;

pub struct Pipeline<'a, R, W> {
    settings: &'a Settings,
    layout: &'a LibraryLayout,
    detector: &'a dyn KeyDetector,
    console: Console<R, W>,
    timings: StepTimings,
    summary: RunSummary,
}

impl<'a, R: BufRead, W: Write> Pipeline<'a, R, W> {
    pub fn new(
        settings: &'a Settings,
        layout: &'a LibraryLayout,
        detector: &'a dyn KeyDetector,
        console: Console<R, W>,
    ) -> Self {
        Self {
            settings,
            layout,
            detector,
            console,
            timings: StepTimings::default(),
            summary: RunSummary::default(),
        }
    }

    /// Process `paths` one at a time, in order. A failing file is logged
    /// and counted; the rest still run.
    pub fn run(&mut self, paths: &[PathBuf]) {
        for path in paths {
            match self.process(path) {
                Ok(_) => self.summary.processed += 1,
                Err(e) => {
                    self.summary.failed += 1;
                    error!("{e}");
                }
            }
        }
    }

    /// Run every step on one file and return the track at its final path.
    pub fn process(&mut self, path: &Path) -> Result<Track, PipelineError> {
        let shown = path.strip_prefix(&self.layout.root).unwrap_or(path);
        self.console
            .banner(shown.display())
            .map_err(|e| PipelineError {
                step: Step::EnsureTagHeader,
                path: path.to_path_buf(),
                source: e.into(),
            })?;

        let start = Instant::now();
        let track = self.ensure_tag_header(path);
        self.timings.record(Step::EnsureTagHeader, start.elapsed());
        let mut track = track.map_err(|source| PipelineError {
            step: Step::EnsureTagHeader,
            path: path.to_path_buf(),
            source,
        })?;

        let steps: [(Step, StepFn<'a, R, W>); 7] = [
            (Step::WarnBitrate, Self::warn_bitrate),
            (Step::CleanFilename, Self::clean_filename),
            (Step::ExtractTitleArtist, Self::extract_title_artist),
            (Step::DetectKey, Self::detect_key),
            (Step::Comments, Self::set_comments),
            (Step::Relocate, Self::relocate_if_incoming),
            (Step::DeriveGenre, Self::derive_genre),
        ];
        for (step, run) in steps {
            let current = track.path().to_path_buf();
            let start = Instant::now();
            let result = run(self, track);
            self.timings.record(step, start.elapsed());
            track = result.map_err(|source| PipelineError {
                step,
                path: current,
                source,
            })?;
        }

        for id in TagId::ALL {
            let values = track.tags().values(id);
            if !values.is_empty() {
                debug!("{id}: {}", values.join(", "));
            }
        }
        Ok(track)
    }

    pub fn finish(self) -> (StepTimings, RunSummary) {
        (self.timings, self.summary)
    }

    #[cfg(test)]
    fn into_console(self) -> Console<R, W> {
        self.console
    }
}
