use std::io;
use std::time::Instant;

use clap::Parser;
use crossterm::style::Stylize;
use tracing::{debug, error, info, warn};

use crate::classify::Console;
use crate::keys::select_detector;
use crate::library::{LibraryLayout, scan_tracks};
use crate::pipeline::{Pipeline, RunSummary, Step, StepTimings};
use crate::playlists;

mod settings;
mod startup;

use startup::Args;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let (settings, config_problem) = settings::load_settings();
    startup::init_tracing(&settings.logging.level);
    if let Some(msg) = config_problem {
        warn!("{msg}");
    }

    let root = startup::resolve_root(&args, &settings)
        .map_err(|e| format!("cannot use library root: {e}"))?;
    let layout = LibraryLayout::new(&root, &settings.library);
    info!("library root {}", layout.root.display());

    let (mut timings, summary) = if args.playlists_only {
        (StepTimings::default(), RunSummary::default())
    } else {
        let detector = select_detector(&settings.keys, args.no_keys);
        let paths = scan_tracks(&layout, &settings.library);
        debug!("found {} tracks", paths.len());

        let console = Console::new(io::stdin().lock(), io::stdout());
        let mut pipeline = Pipeline::new(&settings, &layout, detector.as_ref(), console);
        pipeline.run(&paths);
        pipeline.finish()
    };

    if settings.playlists.enabled && !args.no_playlists {
        let start = Instant::now();
        let result = playlists::regenerate(&layout, &settings.library, &settings.playlists);
        timings.record(Step::Playlists, start.elapsed());
        match result {
            Ok(report) => debug!(
                "replaced {} playlists with {}",
                report.removed,
                report.written.len()
            ),
            Err(e) => error!("failed to rebuild playlists in {}: {e}", layout.playlists.display()),
        }
    }

    println!();
    if !args.playlists_only {
        println!("{}", summary.to_string().bold());
    }
    println!("{}", timings.report());
    Ok(())
}
