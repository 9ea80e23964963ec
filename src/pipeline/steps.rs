use std::io::{BufRead, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::classify::{RatingChoice, prompt_genre, prompt_rating};
use crate::filename::{
    extract_remixer, split_title_artist, strip_noise_qualifiers, suggest_rename_from_tags,
};
use crate::keys::is_valid_key;
use crate::library::Catalog;
use crate::relocate::{RelocateError, relocate, rename_in_place};
use crate::tags::{TagError, TagId, TagStore};
use crate::track::Track;

use super::{Pipeline, StepError};

impl<R: BufRead, W: Write> Pipeline<'_, R, W> {
    pub(super) fn ensure_tag_header(&mut self, path: &Path) -> Result<Track, StepError> {
        match TagStore::open(path) {
            Ok(store) => Ok(Track::from_store(store)),
            Err(TagError::MissingTagHeader(_)) => {
                info!("no tag header, creating an empty one");
                let store = TagStore::create(path)?;
                self.summary.headers_created += 1;
                Ok(Track::from_store(store))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub(super) fn warn_bitrate(&mut self, track: Track) -> Result<Track, StepError> {
        let threshold = self.settings.tags.low_bitrate_kbps;
        match track.tags().bitrate_kbps() {
            Ok(Some(kbps)) if kbps < threshold => {
                info!("low bitrate: {kbps} kbps (below {threshold})");
            }
            Ok(Some(kbps)) => debug!("bitrate {kbps} kbps"),
            Ok(None) => debug!("no bitrate reported"),
            Err(e) => warn!("{e}"),
        }
        Ok(track)
    }

    pub(super) fn clean_filename(&mut self, track: Track) -> Result<Track, StepError> {
        let Some(stem) = track.stem() else {
            return Ok(track);
        };
        let cleaned = strip_noise_qualifiers(stem);
        if !cleaned.changed() || cleaned.stem == stem {
            return Ok(track);
        }
        if cleaned.stem.is_empty() {
            warn!("cleaning {stem:?} would leave an empty name, keeping it");
            return Ok(track);
        }

        if let Some(removed) = cleaned.removed.as_deref().filter(|r| !r.is_empty()) {
            info!("dropping {removed} from the file name");
        }
        self.rename(track, &cleaned.stem)
    }

    pub(super) fn extract_title_artist(&mut self, mut track: Track) -> Result<Track, StepError> {
        let Some(stem) = track.stem().map(str::to_string) else {
            return Ok(track);
        };

        match split_title_artist(&stem) {
            Ok((artist, title)) => {
                let extract = self.settings.tags.extract_remixer;
                let tags = track.tags_mut();
                tags.write(TagId::Title, &[&title])?;
                tags.write(TagId::Artist, &[&artist])?;
                tags.write(TagId::OriginalArtist, &[&artist])?;
                if extract && tags.get(TagId::Remixer).is_none() {
                    if let Some(remixer) = extract_remixer(&title) {
                        tags.write(TagId::Remixer, &[remixer])?;
                    }
                }
                Ok(track)
            }
            Err(e) => {
                warn!("cannot extract title and artist from file name: {e}");
                let artist = track.tags().get(TagId::Artist);
                let title = track.tags().get(TagId::Title);
                let (Some(artist), Some(title)) = (artist, title) else {
                    return Ok(track);
                };

                let suggestion = suggest_rename_from_tags(&artist, &title);
                if suggestion == stem {
                    return Ok(track);
                }
                if self
                    .console
                    .confirm(&format!("Rename to \"{suggestion}\" from its tags?"))?
                {
                    self.rename(track, &suggestion)
                } else {
                    Ok(track)
                }
            }
        }
    }

    pub(super) fn detect_key(&mut self, mut track: Track) -> Result<Track, StepError> {
        if let Some(key) = track.tags().get(TagId::Key) {
            if is_valid_key(&key) {
                debug!("keeping key {key}");
                return Ok(track);
            }
            debug!("re-detecting malformed key {key:?}");
        }

        match self.detector.detect_key(track.path()) {
            Ok(key) => {
                if !is_valid_key(&key) {
                    debug!("detector answered {key:?}, storing it as is");
                }
                track.tags_mut().write(TagId::Key, &[key])?;
            }
            Err(e) => warn!("skipping key detection: {e}"),
        }
        Ok(track)
    }

    pub(super) fn set_comments(&mut self, mut track: Track) -> Result<Track, StepError> {
        match &self.settings.tags.comment {
            Some(text) => track.tags_mut().write(TagId::Comment, &[text])?,
            None => track.tags_mut().clear(TagId::Comment)?,
        }
        Ok(track)
    }

    pub(super) fn relocate_if_incoming(&mut self, mut track: Track) -> Result<Track, StepError> {
        if !self.layout.is_incoming(track.path()) {
            return Ok(track);
        }

        loop {
            let catalog = Catalog::read(self.layout)?;
            if catalog.is_empty() {
                warn!("no genre directories under {}", self.layout.root.display());
                break;
            }
            let Some(genre) = prompt_genre(&mut self.console, &catalog)? else {
                info!("no genre chosen, leaving the file where it is");
                break;
            };

            let destination = self.layout.genre_dir(&genre);
            let origin = track.path().to_path_buf();
            self.console.say(format!("Moving file to {genre}"))?;
            match relocate(track, &destination) {
                Ok(moved) => {
                    self.summary.relocated += 1;
                    self.console.success(format!("Moved to {}", moved.path().display()))?;
                    track = moved;
                    break;
                }
                Err(
                    e @ (RelocateError::DestinationNotFound(_)
                    | RelocateError::DestinationOccupied(_)),
                ) => {
                    warn!("{e}, pick another genre");
                    track = Track::open(&origin)?;
                }
                Err(e) => return Err(e.into()),
            }
        }

        if self.settings.tags.prompt_rating {
            track = self.rate(track)?;
        }
        Ok(track)
    }

    pub(super) fn derive_genre(&mut self, mut track: Track) -> Result<Track, StepError> {
        let Some(genre) = self.layout.containing_dir_name(track.path()).map(str::to_string) else {
            warn!("cannot derive a genre for a file in the library root");
            return Ok(track);
        };
        if self.layout.is_incoming(track.path()) {
            info!("still in {genre}, using it as the genre");
        }
        track.tags_mut().write(TagId::Genre, &[genre])?;
        Ok(track)
    }

    fn rate(&mut self, mut track: Track) -> Result<Track, StepError> {
        match prompt_rating(&mut self.console, track.tags().rating())? {
            Some(RatingChoice::Set(value)) => track.tags_mut().set_rating(Some(value))?,
            Some(RatingChoice::Clear) => track.tags_mut().set_rating(None)?,
            None => {}
        }
        Ok(track)
    }

    /// Rename in place; a clash with an existing file or an unusable name
    /// leaves the track where it was.
    fn rename(&mut self, track: Track, stem: &str) -> Result<Track, StepError> {
        let origin = track.path().to_path_buf();
        match rename_in_place(track, stem) {
            Ok(renamed) => {
                self.summary.renamed += 1;
                self.console.say(format!("Renamed to {stem}"))?;
                Ok(renamed)
            }
            Err(e @ (RelocateError::DestinationOccupied(_) | RelocateError::InvalidName(_))) => {
                warn!("not renaming: {e}");
                Ok(Track::open(&origin)?)
            }
            Err(e) => Err(e.into()),
        }
    }
}
