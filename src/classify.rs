//! Interactive classification of incoming tracks.
//!
//! Genre and rating are asked for over a line-based [`Console`]. Invalid
//! answers re-prompt; end of input is taken as the skip answer so a closed
//! stdin cannot spin a prompt forever.

mod console;

use std::io::{self, BufRead, Write};

use crate::library::Catalog;

pub use console::Console;

/// Popularity-meter values for ratings 1 to 5.
pub const RATING_SCALE: [u8; 5] = [1, 64, 128, 196, 255];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifyError {
    #[error("{0:?} is not a rating, type 0-5")]
    InvalidRating(String),
    #[error("there's no directory for genre {0:?}")]
    InvalidGenreInput(String),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RatingChoice {
    /// Remove any stored rating.
    Clear,
    /// Store this popularity-meter value.
    Set(u8),
}

/// Map one answer of the rating prompt.
pub fn parse_rating(input: &str) -> Result<RatingChoice, ClassifyError> {
    let trimmed = input.trim();
    match trimmed.parse::<usize>() {
        Ok(0) if trimmed == "0" => Ok(RatingChoice::Clear),
        Ok(n @ 1..=5) if trimmed.len() == 1 => Ok(RatingChoice::Set(RATING_SCALE[n - 1])),
        _ => Err(ClassifyError::InvalidRating(input.to_string())),
    }
}

/// Map one non-empty answer of the genre prompt to a catalog entry.
pub fn parse_genre<'c>(catalog: &'c Catalog, input: &str) -> Result<&'c str, ClassifyError> {
    catalog
        .match_prefix(input.trim())
        .ok_or_else(|| ClassifyError::InvalidGenreInput(input.trim().to_string()))
}

/// Ask which genre directory a new track belongs in.
///
/// Returns `None` when the operator leaves the answer empty (keep the track
/// where it is) or input ends.
pub fn prompt_genre<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    catalog: &Catalog,
) -> io::Result<Option<String>> {
    console.say(format!(
        "New file! Which genre should it be moved to? [{}]",
        catalog.genres().join(", ")
    ))?;
    loop {
        let Some(answer) = console.ask("Genre (empty to leave it): ")? else {
            return Ok(None);
        };
        if answer.trim().is_empty() {
            return Ok(None);
        }
        match parse_genre(catalog, &answer) {
            Ok(genre) => return Ok(Some(genre.to_string())),
            Err(e) => console.problem(e)?,
        }
    }
}

/// Ask for a 0-5 rating. `None` only when input ends.
pub fn prompt_rating<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    current: Option<u8>,
) -> io::Result<Option<RatingChoice>> {
    let current = current.map_or_else(|| "none".to_string(), |r| r.to_string());
    loop {
        let Some(answer) = console.ask(&format!("Rating 1-5, 0 to clear (now {current}): "))?
        else {
            return Ok(None);
        };
        match parse_rating(&answer) {
            Ok(choice) => return Ok(Some(choice)),
            Err(e) => console.problem(e)?,
        }
    }
}
