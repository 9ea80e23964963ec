//! File relocation engine.
//!
//! Both operations consume the [`Track`] they move and return a fresh one
//! opened at the destination, so no tag store survives a path change.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::tags::TagError;
use crate::track::Track;

#[derive(Debug, thiserror::Error)]
pub enum RelocateError {
    /// The destination directory vanished after it was offered.
    #[error("destination {} does not exist", .0.display())]
    DestinationNotFound(PathBuf),
    #[error("{} already exists", .0.display())]
    DestinationOccupied(PathBuf),
    #[error("invalid file name {0:?}")]
    InvalidName(String),
    #[error("failed to move {} to {}: {source}", .from.display(), .to.display())]
    Io {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
    #[error(transparent)]
    Tag(#[from] TagError),
}

/// Move `track` into `destination`, keeping its file name.
pub fn relocate(track: Track, destination: &Path) -> Result<Track, RelocateError> {
    if !destination.is_dir() {
        return Err(RelocateError::DestinationNotFound(destination.to_path_buf()));
    }
    let Some(name) = track.path().file_name().map(OsString::from) else {
        return Err(RelocateError::InvalidName(track.path().display().to_string()));
    };
    let to = destination.join(name);
    if to == track.path() {
        return Ok(track);
    }
    if to.exists() {
        return Err(RelocateError::DestinationOccupied(to));
    }

    let from = track.into_path();
    move_file(&from, &to)?;
    Ok(Track::open(&to)?)
}

/// Rename `track` to `new_stem` inside its directory, keeping the extension.
pub fn rename_in_place(track: Track, new_stem: &str) -> Result<Track, RelocateError> {
    let new_stem = new_stem.trim();
    if new_stem.is_empty() || new_stem.contains(['/', '\\']) || new_stem.starts_with('.') {
        return Err(RelocateError::InvalidName(new_stem.to_string()));
    }

    let mut file_name = OsString::from(new_stem);
    if let Some(ext) = track.path().extension() {
        file_name.push(".");
        file_name.push(ext);
    }
    let to = track.path().with_file_name(file_name);
    if to == track.path() {
        return Ok(track);
    }
    if to.exists() {
        return Err(RelocateError::DestinationOccupied(to));
    }

    let from = track.into_path();
    move_file(&from, &to)?;
    Ok(Track::open(&to)?)
}

fn move_file(from: &Path, to: &Path) -> Result<(), RelocateError> {
    let io_err = |source| RelocateError::Io {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!("{} is on another device, copying", to.display());
            fs::copy(from, to).map_err(io_err)?;
            fs::remove_file(from).map_err(io_err)
        }
        Err(e) => Err(io_err(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::TagId;
    use tempfile::tempdir;

    fn track_at(path: &Path) -> Track {
        fs::write(path, b"not a real mp3").unwrap();
        Track::open(path).unwrap()
    }

    #[test]
    fn relocate_moves_file_and_reopens_tags_at_new_path() {
        let dir = tempdir().unwrap();
        let incoming = dir.path().join("_New");
        let house = dir.path().join("House");
        fs::create_dir_all(&incoming).unwrap();
        fs::create_dir_all(&house).unwrap();

        let mut track = track_at(&incoming.join("a.mp3"));
        track.tags_mut().write(TagId::Title, &["Song"]).unwrap();

        let moved = relocate(track, &house).unwrap();
        assert_eq!(moved.path(), house.join("a.mp3"));
        assert!(!incoming.join("a.mp3").exists());
        assert_eq!(moved.tags().get(TagId::Title).as_deref(), Some("Song"));
    }

    #[test]
    fn relocate_reports_vanished_destination_and_leaves_file() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("a.mp3");
        let track = track_at(&src);

        let err = relocate(track, &dir.path().join("Gone")).unwrap_err();
        assert!(matches!(err, RelocateError::DestinationNotFound(_)));
        assert!(src.exists());
    }

    #[test]
    fn relocate_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("House");
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("a.mp3"), b"existing").unwrap();

        let track = track_at(&dir.path().join("a.mp3"));
        let err = relocate(track, &dest).unwrap_err();
        assert!(matches!(err, RelocateError::DestinationOccupied(_)));
        assert_eq!(fs::read(dest.join("a.mp3")).unwrap(), b"existing");
    }

    #[test]
    fn rename_keeps_extension_and_reopens() {
        let dir = tempdir().unwrap();
        let mut track = track_at(&dir.path().join("Artist - Song (Original Mix).MP3"));
        track.tags_mut().write(TagId::Key, &["8m"]).unwrap();

        let renamed = rename_in_place(track, "Artist - Song").unwrap();
        assert_eq!(renamed.path(), dir.path().join("Artist - Song.MP3"));
        assert_eq!(renamed.stem(), Some("Artist - Song"));
        assert_eq!(renamed.tags().get(TagId::Key).as_deref(), Some("8m"));
        assert!(!dir.path().join("Artist - Song (Original Mix).MP3").exists());
    }

    #[test]
    fn rename_rejects_bad_names() {
        let dir = tempdir().unwrap();
        let track = track_at(&dir.path().join("a.mp3"));
        assert!(matches!(
            rename_in_place(track, "  "),
            Err(RelocateError::InvalidName(_))
        ));

        let track = track_at(&dir.path().join("b.mp3"));
        assert!(matches!(
            rename_in_place(track, "x/y"),
            Err(RelocateError::InvalidName(_))
        ));
    }

    #[test]
    fn rename_to_same_stem_is_a_no_op() {
        let dir = tempdir().unwrap();
        let track = track_at(&dir.path().join("a.mp3"));
        let same = rename_in_place(track, "a").unwrap();
        assert_eq!(same.path(), dir.path().join("a.mp3"));
    }
}
