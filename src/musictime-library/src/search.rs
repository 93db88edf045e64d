//! Focused and unfocused search over a loaded track collection.

use musictime_core::{contains_case_insensitive, SearchFocus, Track};
use rand::{seq::SliceRandom, thread_rng};

/// Search `tracks` for `query`, honoring the focus hints when present.
///
/// The focused branches match exactly and are tried in strict precedence
/// order: genre, artist without album, artist + album, title + album +
/// artist. A focused branch that matches nothing is indistinguishable from
/// "no focus was given" and falls through to the unfocused stage, which
/// matches `query` as a case-insensitive substring of title or genre and,
/// failing that, returns the whole collection freshly shuffled.
pub fn search_tracks(tracks: &[Track], query: &str, focus: &SearchFocus) -> Vec<Track> {
    if let Some(focused) = focused_matches(tracks, focus) {
        if !focused.is_empty() {
            return focused;
        }
        tracing::debug!("focused search matched nothing, falling back to unfocused");
    }

    if !query.trim().is_empty() {
        let matches: Vec<Track> = tracks
            .iter()
            .filter(|track| {
                contains_case_insensitive(Some(&track.title), Some(query))
                    || contains_case_insensitive(track.genre.as_deref(), Some(query))
            })
            .cloned()
            .collect();
        if !matches.is_empty() {
            return matches;
        }
    }

    let mut shuffled = tracks.to_vec();
    shuffled.shuffle(&mut thread_rng());
    shuffled
}

/// Evaluate the first recognized focus branch, or `None` when the focus does
/// not name one (including the default, unfocused case).
fn focused_matches(tracks: &[Track], focus: &SearchFocus) -> Option<Vec<Track>> {
    if let Some(genre) = focus.genre.as_deref() {
        tracing::debug!(genre, "focused genre search");
        return Some(
            tracks
                .iter()
                .filter(|track| track.genre.as_deref() == Some(genre))
                .cloned()
                .collect(),
        );
    }

    let artist = focus.artist.as_deref()?;
    match (focus.album.as_deref(), focus.title.as_deref()) {
        (None, _) => {
            tracing::debug!(artist, "focused artist search");
            Some(
                tracks
                    .iter()
                    .filter(|track| track.matches_artist(artist))
                    .cloned()
                    .collect(),
            )
        }
        (Some(album), None) => {
            tracing::debug!(artist, album, "focused album search");
            Some(
                tracks
                    .iter()
                    .filter(|track| {
                        track.matches_artist(artist) && track.album.as_deref() == Some(album)
                    })
                    .cloned()
                    .collect(),
            )
        }
        (Some(album), Some(title)) => {
            tracing::debug!(artist, album, title, "focused title search");
            Some(
                tracks
                    .iter()
                    .filter(|track| {
                        track.matches_artist(artist)
                            && track.album.as_deref() == Some(album)
                            && track.title == title
                    })
                    .cloned()
                    .collect(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use musictime_core::TrackId;

    fn track(id: u64, title: &str, artist: &str, album: Option<&str>, genre: Option<&str>) -> Track {
        Track {
            id: TrackId::new(id),
            file_path: format!("/music/{title}.mp3"),
            title: title.into(),
            artist: artist.into(),
            album_artist: None,
            album: album.map(Into::into),
            genre: genre.map(Into::into),
            year: None,
            duration_seconds: None,
            track_number: None,
        }
    }

    fn collection() -> Vec<Track> {
        vec![
            track(1, "Thunder Road", "Bruce", Some("Born to Run"), Some("Rock")),
            track(2, "Jungleland", "Bruce", Some("Born to Run"), Some("Rock")),
            track(3, "So What", "Miles", Some("Kind of Blue"), Some("jazz")),
            track(4, "Untitled", "Unknown", None, None),
        ]
    }

    #[test]
    fn genre_focus_matches_exactly_regardless_of_query() {
        let tracks = collection();
        let result = search_tracks(&tracks, "whatever", &SearchFocus::genre("Rock"));
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|t| t.genre.as_deref() == Some("Rock")));
    }

    #[test]
    fn genre_focus_is_case_sensitive() {
        let tracks = collection();
        // "Jazz" != "jazz" exactly, so the focused branch is empty and the
        // non-blank query takes over as a substring search.
        let result = search_tracks(&tracks, "so what", &SearchFocus::genre("Jazz"));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "So What");
    }

    #[test]
    fn genre_focus_takes_precedence_over_artist() {
        let tracks = collection();
        let focus = SearchFocus {
            genre: Some("Rock".into()),
            artist: Some("Miles".into()),
            ..SearchFocus::default()
        };
        let result = search_tracks(&tracks, "", &focus);
        assert!(result.iter().all(|t| t.genre.as_deref() == Some("Rock")));
    }

    #[test]
    fn artist_focus_matches_album_artist_too() {
        let mut tracks = collection();
        tracks[3].album_artist = Some("Bruce".into());
        let result = search_tracks(&tracks, "", &SearchFocus::artist("Bruce"));
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn artist_and_album_focus_requires_both() {
        let tracks = collection();
        let focus = SearchFocus {
            artist: Some("Bruce".into()),
            album: Some("Born to Run".into()),
            ..SearchFocus::default()
        };
        let result = search_tracks(&tracks, "", &focus);
        assert_eq!(result.len(), 2);

        let focus = SearchFocus {
            artist: Some("Bruce".into()),
            album: Some("Kind of Blue".into()),
            ..SearchFocus::default()
        };
        // No Bruce track on that album: falls through to the unfocused stage,
        // which shuffles the full collection on a blank query.
        let result = search_tracks(&tracks, "", &focus);
        assert_eq!(result.len(), tracks.len());
    }

    #[test]
    fn title_album_artist_focus_matches_all_three() {
        let tracks = collection();
        let focus = SearchFocus {
            artist: Some("Bruce".into()),
            album: Some("Born to Run".into()),
            title: Some("Jungleland".into()),
            ..SearchFocus::default()
        };
        let result = search_tracks(&tracks, "", &focus);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, TrackId::new(2));
    }

    #[test]
    fn unfocused_query_is_case_insensitive_over_title_and_genre() {
        let tracks = collection();
        let result = search_tracks(&tracks, "ROCK", &SearchFocus::default());
        // "Rock" genre twice; "Thunder Road" matches on genre, not title.
        assert_eq!(result.len(), 2);

        let result = search_tracks(&tracks, "jungle", &SearchFocus::default());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "Jungleland");
    }

    #[test]
    fn blank_query_without_focus_returns_everything() {
        let tracks = collection();
        let result = search_tracks(&tracks, "  ", &SearchFocus::default());
        assert_eq!(result.len(), tracks.len());
        for t in &tracks {
            assert!(result.contains(t));
        }
    }

    #[test]
    fn no_hit_query_returns_the_full_collection_shuffled() {
        let tracks = collection();
        let result = search_tracks(&tracks, "zebra xylophone", &SearchFocus::default());
        assert_eq!(result.len(), tracks.len());

        // Shuffle order is fresh per call; with 4! orderings, 32 attempts
        // virtually never all collide.
        let mut saw_different_order = false;
        for _ in 0..32 {
            let again = search_tracks(&tracks, "zebra xylophone", &SearchFocus::default());
            if again != result {
                saw_different_order = true;
                break;
            }
        }
        assert!(saw_different_order);
    }

    #[test]
    fn empty_collection_searches_to_empty() {
        assert!(search_tracks(&[], "anything", &SearchFocus::default()).is_empty());
        assert!(search_tracks(&[], "", &SearchFocus::genre("Rock")).is_empty());
    }

    #[test]
    fn album_only_focus_is_not_recognized() {
        let tracks = collection();
        let focus = SearchFocus {
            album: Some("Born to Run".into()),
            ..SearchFocus::default()
        };
        // Unfocused stage takes over and the query matches a title.
        let result = search_tracks(&tracks, "so what", &focus);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "So What");
    }
}
