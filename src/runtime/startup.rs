use std::env;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;

/// Tidy, tag and sort a DJ music library.
#[derive(Debug, Parser)]
#[command(name = "curator", version)]
pub struct Args {
    /// Library root. Defaults to `library.root` from the config, then the
    /// current directory.
    pub root: Option<PathBuf>,

    /// Skip musical key detection.
    #[arg(long)]
    pub no_keys: bool,

    /// Do not rebuild the per-genre playlists.
    #[arg(long, conflicts_with = "playlists_only")]
    pub no_playlists: bool,

    /// Only rebuild the playlists; leave the tracks alone.
    #[arg(long)]
    pub playlists_only: bool,
}

/// Install the stderr subscriber. `RUST_LOG` wins over the configured level.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

/// Pick the library root and make it absolute.
pub fn resolve_root(args: &Args, settings: &Settings) -> io::Result<PathBuf> {
    let root = match args.root.clone().or_else(|| settings.library.root.clone()) {
        Some(root) => root,
        None => env::current_dir()?,
    };
    let root = root.canonicalize()?;
    if !root.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotADirectory,
            format!("{} is not a directory", root.display()),
        ));
    }
    Ok(root)
}
