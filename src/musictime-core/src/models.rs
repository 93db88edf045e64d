use serde::{Deserialize, Serialize};

/// A library-scoped track identifier.
///
/// Identifiers are assigned by the scanner when the collection is built and
/// are stable for the lifetime of a loaded collection, not across rescans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
pub struct TrackId(pub u64);

impl TrackId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl From<u64> for TrackId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Track metadata as loaded from the library. Immutable once loaded.
///
/// `title` and `artist` always carry a value (the scanner substitutes
/// "Unknown …" placeholders); the remaining tag fields are optional because
/// many files simply do not carry them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub file_path: String,
    pub title: String,
    pub artist: String,
    pub album_artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    /// Duration in seconds when known.
    pub duration_seconds: Option<u32>,
    /// Track number within album when known.
    pub track_number: Option<u32>,
}

impl Track {
    /// The artist to group/browse the track under: the album artist when
    /// tagged, the track artist otherwise.
    pub fn display_artist(&self) -> &str {
        self.album_artist.as_deref().unwrap_or(&self.artist)
    }

    /// True when `candidate` names either the track artist or the album
    /// artist, compared exactly.
    pub fn matches_artist(&self, candidate: &str) -> bool {
        self.artist == candidate || self.album_artist.as_deref() == Some(candidate)
    }
}
