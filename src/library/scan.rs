use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::layout::LibraryLayout;

/// Whether `path` has one of the configured audio extensions.
pub fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Snapshot of every audio file under the root, sorted by path.
///
/// The playlists directory is never descended into. The list is taken up
/// front so that files moved while processing are not visited twice.
pub fn scan_tracks(layout: &LibraryLayout, settings: &LibrarySettings) -> Vec<PathBuf> {
    let mut tracks: Vec<PathBuf> = Vec::new();

    let walker = WalkDir::new(&layout.root).follow_links(settings.follow_links);

    for entry in walker
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || (e.path() != layout.playlists
                    && (settings.include_hidden || !is_hidden(e.path())))
        })
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if entry.file_type().is_file() && is_audio_file(path, settings) {
            tracks.push(path.to_path_buf());
        }
    }

    tracks.sort();
    tracks
}
