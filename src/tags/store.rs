use std::path::{Path, PathBuf};

use id3::frame::{Comment, Content, Frame, Popularimeter};
use id3::{ErrorKind, Tag, TagLike, Version};
use lofty::prelude::*;

use super::id::TagId;

#[derive(Debug, thiserror::Error)]
pub enum TagError {
    /// The file carries no ID3v2 header yet.
    #[error("no tag header in {}", .0.display())]
    MissingTagHeader(PathBuf),
    #[error("failed to read tags from {}: {source}", .path.display())]
    Read { path: PathBuf, source: id3::Error },
    #[error("failed to write tags to {}: {source}", .path.display())]
    Write { path: PathBuf, source: id3::Error },
    #[error("failed to read audio properties of {}: {source}", .path.display())]
    Properties {
        path: PathBuf,
        source: lofty::error::LoftyError,
    },
    #[error("invalid {tag} value {value:?}")]
    InvalidValue { tag: TagId, value: String },
}

/// The ID3v2 tag of one file, bound to the path it was read from.
///
/// A store is never re-pointed at another path: after a rename or move the
/// caller opens a new one.
#[derive(Debug)]
pub struct TagStore {
    path: PathBuf,
    tag: Tag,
}

impl TagStore {
    /// Read the tag of `path`. Fails with [`TagError::MissingTagHeader`]
    /// when the file has no tag at all.
    pub fn open(path: &Path) -> Result<Self, TagError> {
        match Tag::read_from_path(path) {
            Ok(tag) => Ok(Self {
                path: path.to_path_buf(),
                tag,
            }),
            Err(e) if matches!(e.kind, ErrorKind::NoTag) => {
                Err(TagError::MissingTagHeader(path.to_path_buf()))
            }
            Err(source) => Err(TagError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Write an empty tag to `path` and return a store for it.
    pub fn create(path: &Path) -> Result<Self, TagError> {
        let store = Self {
            path: path.to_path_buf(),
            tag: Tag::new(),
        };
        store.persist()?;
        Ok(store)
    }

    /// Open the tag of `path`, creating an empty one first if it has none.
    /// The flag reports whether a header had to be created.
    pub fn open_or_create(path: &Path) -> Result<(Self, bool), TagError> {
        match Self::open(path) {
            Ok(store) => Ok((store, false)),
            Err(TagError::MissingTagHeader(_)) => Ok((Self::create(path)?, true)),
            Err(e) => Err(e),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// First stored value for `id`.
    pub fn get(&self, id: TagId) -> Option<String> {
        self.values(id).into_iter().next()
    }

    /// All stored values for `id`, empty strings dropped.
    pub fn values(&self, id: TagId) -> Vec<String> {
        match id {
            TagId::Comment => self
                .tag
                .comments()
                .map(|c| c.text.clone())
                .filter(|t| !t.is_empty())
                .collect(),
            TagId::Rating => self.rating().map(|r| vec![r.to_string()]).unwrap_or_default(),
            _ => self
                .tag
                .get(id.frame_id())
                .and_then(|f| f.content().text())
                .map(|text| {
                    text.split('\0')
                        .filter(|v| !v.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    /// Replace every value of `id` with `values` and save the file.
    ///
    /// Writing the values that are already stored is a no-op and does not
    /// touch the file.
    pub fn write<S: AsRef<str>>(&mut self, id: TagId, values: &[S]) -> Result<(), TagError> {
        let values: Vec<String> = values
            .iter()
            .map(|v| v.as_ref().to_string())
            .filter(|v| !v.is_empty())
            .collect();
        if self.values(id) == values {
            return Ok(());
        }

        match id {
            TagId::Rating => {
                let rating = match values.as_slice() {
                    [] => None,
                    [single] => Some(single.trim().parse::<u8>().map_err(|_| {
                        TagError::InvalidValue {
                            tag: id,
                            value: single.clone(),
                        }
                    })?),
                    _ => {
                        return Err(TagError::InvalidValue {
                            tag: id,
                            value: values.join(", "),
                        });
                    }
                };
                self.tag.remove(id.frame_id());
                if let Some(rating) = rating {
                    self.tag.add_frame(popularimeter_frame(rating));
                }
            }
            TagId::Comment => {
                self.tag.remove(id.frame_id());
                // COMM frames are unique per (language, description).
                for (i, text) in values.iter().enumerate() {
                    let description = if i == 0 { String::new() } else { i.to_string() };
                    self.tag.add_frame(Frame::with_content(
                        id.frame_id(),
                        Content::Comment(Comment {
                            lang: "eng".to_string(),
                            description,
                            text: text.clone(),
                        }),
                    ));
                }
            }
            _ => {
                self.tag.remove(id.frame_id());
                if !values.is_empty() {
                    self.tag.set_text(id.frame_id(), values.join("\0"));
                }
            }
        }

        self.persist()
    }

    /// Remove every value of `id` and save the file.
    pub fn clear(&mut self, id: TagId) -> Result<(), TagError> {
        if self.tag.get(id.frame_id()).is_none() {
            return Ok(());
        }
        self.tag.remove(id.frame_id());
        self.persist()
    }

    /// Popularity-meter rating (0-255), if present.
    pub fn rating(&self) -> Option<u8> {
        self.tag
            .get(TagId::Rating.frame_id())
            .and_then(|f| match f.content() {
                Content::Popularimeter(p) => Some(p.rating),
                _ => None,
            })
    }

    /// Set or clear the popularity-meter rating.
    pub fn set_rating(&mut self, rating: Option<u8>) -> Result<(), TagError> {
        match rating {
            Some(r) => self.write(TagId::Rating, &[r.to_string()]),
            None => self.clear(TagId::Rating),
        }
    }

    /// Average audio bitrate in kbps, when the container reports one.
    pub fn bitrate_kbps(&self) -> Result<Option<u32>, TagError> {
        let tagged = lofty::read_from_path(&self.path).map_err(|source| TagError::Properties {
            path: self.path.clone(),
            source,
        })?;
        Ok(tagged.properties().audio_bitrate())
    }

    fn persist(&self) -> Result<(), TagError> {
        self.tag
            .write_to_path(&self.path, Version::Id3v24)
            .map_err(|source| TagError::Write {
                path: self.path.clone(),
                source,
            })
    }
}

fn popularimeter_frame(rating: u8) -> Frame {
    Frame::with_content(
        TagId::Rating.frame_id(),
        Content::Popularimeter(Popularimeter {
            user: String::new(),
            rating,
            counter: 0,
        }),
    )
}
