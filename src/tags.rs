//! Tag store adapter.
//!
//! Wraps a file's ID3v2 tag behind a closed identifier vocabulary. Every
//! mutation is written straight back to disk; audio properties (bitrate)
//! are read separately through `lofty`.

mod id;
mod store;

pub use id::TagId;
pub use store::{TagError, TagStore};
