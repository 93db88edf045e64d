use crate::models::Track;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Deferred work handed to [`MusicSource::when_ready`]. Receives `true` when
/// the source finished loading successfully, `false` on a load failure, and
/// is invoked exactly once either way.
pub type ReadyCallback = Box<dyn FnOnce(bool) + Send>;

/// Optional focus hints narrowing a search to an exact-match scope.
///
/// The recognized combinations, in precedence order, are: genre alone,
/// artist without album, artist + album, and title + album + artist. Any
/// other combination is treated as an unfocused search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFocus {
    pub genre: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub title: Option<String>,
}

impl SearchFocus {
    pub fn genre(genre: impl Into<String>) -> Self {
        Self {
            genre: Some(genre.into()),
            ..Self::default()
        }
    }

    pub fn artist(artist: impl Into<String>) -> Self {
        Self {
            artist: Some(artist.into()),
            ..Self::default()
        }
    }

    pub fn is_unfocused(&self) -> bool {
        self.genre.is_none() && self.artist.is_none() && self.album.is_none() && self.title.is_none()
    }
}

/// A lazily-loaded collection of tracks.
///
/// Implementations gate consumers behind a readiness state: `load` drives
/// exactly one terminal transition (success or failure) per attempt, and
/// `when_ready` either runs the callback immediately (returning `true`) or
/// parks it until that transition happens (returning `false`). Load failures
/// are signaled through the callback argument, never as an error from `load`
/// itself.
#[async_trait]
pub trait MusicSource: Send + Sync {
    /// Populate the collection. Idempotent once a terminal state is reached.
    async fn load(&self);

    /// Run `callback` once the source reaches a terminal state.
    ///
    /// Returns `true` when the callback ran synchronously within this call
    /// (the source was already loaded or failed), `false` when it was parked;
    /// a `false` return means the caller must treat its own response as
    /// detached and let the callback complete it later.
    fn when_ready(&self, callback: ReadyCallback) -> bool;

    /// Search the loaded collection. Always succeeds; no matches is an empty
    /// result, never an error. See [`SearchFocus`] for the focused branches.
    fn search(&self, query: &str, focus: &SearchFocus) -> Vec<Track>;

    /// Snapshot of the loaded collection (empty until loaded).
    fn tracks(&self) -> Vec<Track>;
}
