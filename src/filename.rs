//! Filename heuristics.
//!
//! Pure functions over a file stem (the name without extension): splitting
//! `Artist - Title`, stripping edit/mix qualifiers, and the reverse
//! direction used to suggest a canonical name from existing tags.

use std::sync::OnceLock;

use regex::Regex;

/// Separator between artist and title in a canonical stem.
pub const ARTIST_TITLE_SEPARATOR: &str = " - ";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilenameError {
    #[error("expected exactly one \" - \" separator, found {separators}")]
    AmbiguousFilename { separators: usize },
}

/// Result of [`strip_noise_qualifiers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cleaned {
    pub stem: String,
    /// The fragments that were dropped, space-joined, if any.
    pub removed: Option<String>,
}

impl Cleaned {
    pub fn changed(&self) -> bool {
        self.removed.is_some()
    }
}

/// Split `Artist - Title` into `(artist, title)`.
///
/// Only a stem with exactly one separator is accepted; anything else is
/// ambiguous and nothing is guessed.
pub fn split_title_artist(stem: &str) -> Result<(String, String), FilenameError> {
    let parts: Vec<&str> = stem.split(ARTIST_TITLE_SEPARATOR).collect();
    match parts.as_slice() {
        [artist, title] => Ok((artist.to_string(), title.to_string())),
        _ => Err(FilenameError::AmbiguousFilename {
            separators: parts.len() - 1,
        }),
    }
}

/// Canonical stem built from tags already present on the file.
pub fn suggest_rename_from_tags(artist: &str, title: &str) -> String {
    format!("{}{ARTIST_TITLE_SEPARATOR}{}", artist.trim(), title.trim())
}

fn fragment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\s*(?:\(([^()\[\]]*)\)|\[([^()\[\]]*)\])").expect("valid fragment regex")
    })
}

fn noise_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:original|dirty|clean|extended|radio\s+edit)\b")
            .expect("valid noise regex")
    })
}

fn remixer_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)[(\[]\s*([^()\[\]]+?)\s+remix\s*[)\]]").expect("valid remixer regex")
    })
}

fn is_preserved(fragment: &str) -> bool {
    let lower = fragment.to_lowercase();
    lower.contains("remix") || lower.contains("bootleg")
}

/// One pass over the innermost bracketed fragments.
fn strip_once(stem: &str, removed: &mut Vec<String>) -> String {
    let mut out = String::with_capacity(stem.len());
    let mut last = 0;
    for caps in fragment_re().captures_iter(stem) {
        let Some(whole) = caps.get(0) else { continue };
        let inner = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .unwrap_or_default();
        if noise_re().is_match(inner) && !is_preserved(inner) {
            out.push_str(&stem[last..whole.start()]);
            removed.push(whole.as_str().trim().to_string());
            last = whole.end();
        }
    }
    out.push_str(&stem[last..]);
    out.trim().to_string()
}

/// Remove `(Original Mix)`, `[Dirty]`, `(Radio Edit)` and similar fragments.
///
/// A fragment that also names a remix or bootleg is kept. Removal repeats
/// until nothing changes, so `strip(strip(x)) == strip(x)`.
pub fn strip_noise_qualifiers(stem: &str) -> Cleaned {
    let mut removed = Vec::new();
    let mut current = stem.trim().to_string();
    loop {
        let next = strip_once(&current, &mut removed);
        if next == current {
            break;
        }
        current = next;
    }

    Cleaned {
        removed: if removed.is_empty() && current == stem {
            None
        } else {
            Some(removed.join(" "))
        },
        stem: current,
    }
}

/// Remixer named in a `(<Name> Remix)` fragment of a title.
pub fn extract_remixer(title: &str) -> Option<String> {
    remixer_re()
        .captures(title)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
}
