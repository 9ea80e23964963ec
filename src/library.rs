//! Library layout on disk.
//!
//! The library root holds one directory per genre plus two reserved
//! directories: the incoming holding area and the playlists output.

mod catalog;
mod layout;
mod scan;

pub use catalog::Catalog;
pub use layout::LibraryLayout;
pub use scan::{is_audio_file, scan_tracks};
