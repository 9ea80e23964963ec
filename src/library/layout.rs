use std::path::{Path, PathBuf};

use crate::config::LibrarySettings;

/// Resolved locations of the library root and its reserved directories.
#[derive(Debug, Clone)]
pub struct LibraryLayout {
    pub root: PathBuf,
    pub incoming: PathBuf,
    pub playlists: PathBuf,
    pub reserved_prefix: String,
}

impl LibraryLayout {
    pub fn new(root: impl Into<PathBuf>, settings: &LibrarySettings) -> Self {
        let root = root.into();
        Self {
            incoming: root.join(&settings.incoming_dir),
            playlists: root.join(&settings.playlists_dir),
            reserved_prefix: settings.reserved_prefix.clone(),
            root,
        }
    }

    pub fn genre_dir(&self, genre: &str) -> PathBuf {
        self.root.join(genre)
    }

    /// Whether `path` sits directly in the incoming directory.
    pub fn is_incoming(&self, path: &Path) -> bool {
        path.parent() == Some(self.incoming.as_path())
    }

    /// Name of the directory containing `path`. `None` for files lying
    /// directly in the root.
    pub fn containing_dir_name<'a>(&self, path: &'a Path) -> Option<&'a str> {
        let parent = path.parent()?;
        if parent == self.root {
            return None;
        }
        parent.file_name().and_then(|n| n.to_str())
    }

    /// Reserved directories are never genres.
    pub fn is_reserved(&self, name: &str) -> bool {
        (!self.reserved_prefix.is_empty() && name.starts_with(&self.reserved_prefix))
            || self.incoming.file_name().and_then(|n| n.to_str()) == Some(name)
            || self.playlists.file_name().and_then(|n| n.to_str()) == Some(name)
    }
}
