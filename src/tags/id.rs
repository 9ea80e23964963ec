use std::fmt;

/// The tag fields the curator reads and writes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TagId {
    Title,
    Artist,
    OriginalArtist,
    Genre,
    Key,
    /// Popularity meter, 0-255.
    Rating,
    Comment,
    Remixer,
    RecordingDate,
}

impl TagId {
    pub const ALL: [TagId; 9] = [
        TagId::Title,
        TagId::Artist,
        TagId::OriginalArtist,
        TagId::Genre,
        TagId::Key,
        TagId::Rating,
        TagId::Comment,
        TagId::Remixer,
        TagId::RecordingDate,
    ];

    /// ID3v2.4 frame identifier backing this field.
    pub fn frame_id(self) -> &'static str {
        match self {
            TagId::Title => "TIT2",
            TagId::Artist => "TPE1",
            TagId::OriginalArtist => "TOPE",
            TagId::Genre => "TCON",
            TagId::Key => "TKEY",
            TagId::Rating => "POPM",
            TagId::Comment => "COMM",
            TagId::Remixer => "TPE4",
            TagId::RecordingDate => "TDRC",
        }
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TagId::Title => "title",
            TagId::Artist => "artist",
            TagId::OriginalArtist => "original artist",
            TagId::Genre => "genre",
            TagId::Key => "key",
            TagId::Rating => "rating",
            TagId::Comment => "comment",
            TagId::Remixer => "remixer",
            TagId::RecordingDate => "recording date",
        };
        f.write_str(name)
    }
}
