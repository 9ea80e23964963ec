use std::path::{Path, PathBuf};

use crate::tags::{TagError, TagStore};

/// An audio file together with the tag store read from its current path.
///
/// The path is owned by the store, so the two cannot drift apart. Renames
/// and moves consume the `Track` and hand back a new one opened at the new
/// location.
#[derive(Debug)]
pub struct Track {
    tags: TagStore,
}

impl Track {
    /// Open `path`, creating an empty tag header if the file has none.
    pub fn open(path: &Path) -> Result<Self, TagError> {
        let (tags, _) = TagStore::open_or_create(path)?;
        Ok(Self { tags })
    }

    pub fn from_store(tags: TagStore) -> Self {
        Self { tags }
    }

    pub fn path(&self) -> &Path {
        self.tags.path()
    }

    /// File name without extension.
    pub fn stem(&self) -> Option<&str> {
        self.path().file_stem().and_then(|s| s.to_str())
    }

    pub fn tags(&self) -> &TagStore {
        &self.tags
    }

    pub fn tags_mut(&mut self) -> &mut TagStore {
        &mut self.tags
    }

    /// Release the tag store and keep only the path.
    pub fn into_path(self) -> PathBuf {
        self.tags.path().to_path_buf()
    }
}
