use std::fs;
use std::io;

use super::layout::LibraryLayout;

/// First-level genre directories of the library, sorted by name.
///
/// Read fresh whenever it is needed; nothing is cached between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    genres: Vec<String>,
}

impl Catalog {
    pub fn read(layout: &LibraryLayout) -> io::Result<Self> {
        let mut genres = Vec::new();
        for entry in fs::read_dir(&layout.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if name.starts_with('.') || layout.is_reserved(&name) {
                continue;
            }
            genres.push(name);
        }
        genres.sort();
        Ok(Self { genres })
    }

    #[cfg(test)]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            genres: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }

    /// First genre, in catalog order, whose name starts with `prefix`.
    ///
    /// Ties are not disambiguated: with `House` and `Hardcore` in the
    /// catalog, `H` picks whichever comes first.
    pub fn match_prefix(&self, prefix: &str) -> Option<&str> {
        if prefix.is_empty() {
            return None;
        }
        self.genres
            .iter()
            .find(|g| g.starts_with(prefix))
            .map(String::as_str)
    }
}
