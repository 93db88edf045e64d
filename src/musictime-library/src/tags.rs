use crate::scan::ScanResult;
use lofty::{Accessor, AudioFile, ItemKey, Probe, TaggedFileExt};
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct ParsedTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album_artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub duration_seconds: Option<u32>,
    pub track_number: Option<u32>,
}

pub fn parse_tags(path: &Path) -> ScanResult<ParsedTags> {
    let tagged = match Probe::open(path).and_then(|p| p.read()) {
        Ok(tagged) => tagged,
        // Unreadable tags are not a scan failure; the caller falls back to
        // path-derived metadata.
        Err(_) => return Ok(ParsedTags::default()),
    };

    let tag = tagged.primary_tag().or_else(|| tagged.first_tag());
    let properties = tagged.properties();

    let title = tag.and_then(|t| t.get_string(&ItemKey::TrackTitle).map(|s| s.to_string()));
    let artist = tag.and_then(|t| t.artist().map(|s| s.to_string()));
    let album_artist = tag.and_then(|t| t.get_string(&ItemKey::AlbumArtist).map(|s| s.to_string()));
    let album = tag.and_then(|t| t.album().map(|s| s.to_string()));
    let genre = tag.and_then(|t| t.genre().map(|s| s.to_string()));
    let year = tag.and_then(|t| t.year()).map(|y| y as i32);
    let duration_seconds = Some(properties.duration().as_secs() as u32);
    let track_number = tag.and_then(|t| t.track()).map(|n| n as u32);

    Ok(ParsedTags {
        title,
        artist,
        album_artist,
        album,
        genre,
        year,
        duration_seconds,
        track_number,
    })
}
