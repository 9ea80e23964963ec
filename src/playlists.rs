//! Per-genre playlist generation.
//!
//! Playlists are rebuilt from scratch on every run: existing playlist files
//! are deleted and one file per catalog genre is written, listing the audio
//! files directly inside it by name.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::{LibrarySettings, PlaylistSettings};
use crate::library::{Catalog, LibraryLayout, is_audio_file};

const M3U_HEADER: &str = "#EXTM3U";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PlaylistReport {
    pub written: Vec<PathBuf>,
    pub removed: usize,
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// Delete every playlist file from the playlists directory.
fn clear_playlists(dir: &Path, ext: &str) -> io::Result<usize> {
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_file() && has_extension(&path, ext) {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }
    Ok(removed)
}

/// Audio file names directly inside `dir`, sorted.
fn genre_entries(dir: &Path, library: &LibrarySettings) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type()?.is_file() || !is_audio_file(&path, library) {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !library.include_hidden && name.starts_with('.') {
            continue;
        }
        names.push(name.to_string());
    }
    names.sort();
    Ok(names)
}

/// Playlist text for one genre. Entries are relative to the playlists
/// directory, which is a sibling of the genre directories.
pub fn render_playlist(genre: &str, files: &[String], header: bool) -> String {
    let mut out = String::new();
    if header {
        out.push_str(M3U_HEADER);
        out.push('\n');
    }
    for file in files {
        out.push_str(&format!("../{genre}/{file}\n"));
    }
    out
}

/// Rebuild every playlist from the current directory layout.
pub fn regenerate(
    layout: &LibraryLayout,
    library: &LibrarySettings,
    settings: &PlaylistSettings,
) -> io::Result<PlaylistReport> {
    let ext = settings.extension.trim().trim_start_matches('.');
    fs::create_dir_all(&layout.playlists)?;

    let removed = clear_playlists(&layout.playlists, ext)?;
    debug!("removed {removed} old playlists");

    let catalog = Catalog::read(layout)?;
    let mut written = Vec::with_capacity(catalog.genres().len());
    for genre in catalog.genres() {
        let files = genre_entries(&layout.genre_dir(genre), library)?;
        let target = layout.playlists.join(format!("{genre}.{ext}"));
        fs::write(&target, render_playlist(genre, &files, settings.header))?;
        debug!("{}: {} tracks", target.display(), files.len());
        written.push(target);
    }

    info!("wrote {} playlists to {}", written.len(), layout.playlists.display());
    Ok(PlaylistReport { written, removed })
}
