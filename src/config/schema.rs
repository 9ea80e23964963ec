use std::path::PathBuf;

use serde::Deserialize;

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/curator/config.toml` or `~/.config/curator/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `CURATOR__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub tags: TagSettings,
    pub keys: KeySettings,
    pub playlists: PlaylistSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Library root. The command-line argument wins over this; the current
    /// directory is used when neither is given.
    pub root: Option<PathBuf>,
    /// Holding directory for tracks that still need a genre.
    pub incoming_dir: String,
    /// Directory the per-genre playlists are written to.
    pub playlists_dir: String,
    /// Top-level directories starting with this are never genres.
    pub reserved_prefix: String,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            root: None,
            incoming_dir: "_New".to_string(),
            playlists_dir: "_Playlists".to_string(),
            reserved_prefix: "_".to_string(),
            extensions: vec!["mp3".into()],
            follow_links: true,
            include_hidden: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TagSettings {
    /// Files below this bitrate get an advisory log line.
    pub low_bitrate_kbps: u32,
    /// Comment to stamp on every track. `None` strips all comments.
    pub comment: Option<String>,
    /// Ask for a 1-5 rating when a track comes out of the incoming directory.
    pub prompt_rating: bool,
    /// Fill the remixer tag from a `(<Name> Remix)` title fragment.
    pub extract_remixer: bool,
}

impl Default for TagSettings {
    fn default() -> Self {
        Self {
            low_bitrate_kbps: 250,
            comment: None,
            prompt_rating: true,
            extract_remixer: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeySettings {
    pub enabled: bool,
    /// Executable name (looked up in `PATH`) or path of the key detector.
    pub detector: String,
    /// Passed to the detector as `-n <notation>`.
    pub notation: String,
}

impl Default for KeySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            detector: "keyfinder-cli".to_string(),
            notation: "openkey".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaylistSettings {
    pub enabled: bool,
    /// Playlist file extension, without dot.
    pub extension: String,
    /// Write `#EXTM3U` as the first line.
    pub header: bool,
}

impl Default for PlaylistSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            extension: "m3u".to_string(),
            header: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
