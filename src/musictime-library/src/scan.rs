//! Filesystem walk that builds the track collection.

use crate::tags::parse_tags;
use musictime_core::{Track, TrackId};
use path_clean::PathClean;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("media root {path} is not a directory")]
    MissingRoot { path: PathBuf },
    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
}

pub type ScanResult<T> = Result<T, ScanError>;

/// Walk every root and build the collection, assigning sequential ids.
///
/// A missing or unreadable root fails the whole scan; a single file with
/// unreadable tags does not (path-derived metadata fills in). The result is
/// sorted by title then path, and ids follow that order.
pub fn scan_roots(roots: &[PathBuf]) -> ScanResult<Vec<Track>> {
    let mut tracks = Vec::new();
    for root in roots {
        let root = root
            .canonicalize()
            .ok()
            .filter(|r| r.is_dir())
            .ok_or_else(|| ScanError::MissingRoot { path: root.clone() })?;
        for entry in WalkDir::new(&root).follow_links(false) {
            let entry = entry.map_err(|source| ScanError::Walk {
                path: root.clone(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if let Some(ext) = path.extension().and_then(|s| s.to_str()) {
                if is_supported_extension(ext) {
                    if let Some(track) = parse_track(path, &root)? {
                        tracks.push(track);
                    }
                }
            }
        }
    }
    tracks.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.file_path.cmp(&b.file_path)));
    for (index, track) in tracks.iter_mut().enumerate() {
        track.id = TrackId::new(index as u64 + 1);
    }
    tracing::info!(tracks = tracks.len(), roots = roots.len(), "library scan complete");
    Ok(tracks)
}

fn is_supported_extension(ext: &str) -> bool {
    matches!(
        ext.to_ascii_lowercase().as_str(),
        "mp3" | "m4a" | "flac" | "wav" | "ogg"
    )
}

fn canonicalize_within_root(path: &Path, root: &Path) -> Option<PathBuf> {
    let Ok(canon) = path.canonicalize() else {
        return None;
    };
    let cleaned = canon.clean();
    if cleaned.starts_with(root) {
        Some(cleaned)
    } else {
        None
    }
}

/// `root` must already be canonical.
fn parse_track(path: &Path, root: &Path) -> ScanResult<Option<Track>> {
    let Some(canonical) = canonicalize_within_root(path, root) else {
        return Ok(None);
    };

    // Infer artist/album from the directory layout: root/Artist/Album/file.
    let relative = match canonical.strip_prefix(root) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => canonical.clone(),
    };
    let mut components = relative.components().collect::<Vec<_>>();
    let _ = components.pop(); // drop file name
    let (inferred_artist, inferred_album) = if components.len() >= 2 {
        let album_component = components
            .pop()
            .and_then(|c| c.as_os_str().to_str())
            .unwrap_or("Unknown Album");
        let artist_component = components
            .pop()
            .and_then(|c| c.as_os_str().to_str())
            .unwrap_or("Unknown Artist");
        (
            artist_component.to_string(),
            Some(album_component.to_string()),
        )
    } else if components.len() == 1 {
        let artist_component = components
            .pop()
            .and_then(|c| c.as_os_str().to_str())
            .unwrap_or("Unknown Artist");
        (artist_component.to_string(), None)
    } else {
        ("Unknown Artist".into(), None)
    };

    let file_stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Unknown");

    let tags = parse_tags(path)?;
    let track = Track {
        // Reassigned after the full collection is sorted.
        id: TrackId::new(0),
        file_path: canonical.to_string_lossy().to_string(),
        title: tags.title.unwrap_or_else(|| file_stem.to_string()),
        artist: tags.artist.unwrap_or(inferred_artist),
        album_artist: tags.album_artist,
        album: tags.album.or(inferred_album),
        genre: tags.genre,
        year: tags.year,
        duration_seconds: tags.duration_seconds,
        track_number: tags.track_number,
    };
    Ok(Some(track))
}
