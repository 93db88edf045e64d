pub mod browse;
pub mod ready;
pub mod scan;
pub mod search;
mod tags;

use async_trait::async_trait;
use browse::{BrowseItem, BrowseTree, BROWSABLE_ROOT, EMPTY_ROOT};
use musictime_core::{MusicSource, ReadyCallback, SearchFocus, Track};
use ready::{ReadyGate, SourceState};
use scan::scan_roots;
use search::search_tracks;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// The single concrete [`MusicSource`]: a filesystem-backed track collection
/// behind a readiness gate.
///
/// Callers get an explicit handle; nothing here is process-global. `load`
/// drives exactly one terminal transition, after which `search`, `tracks`
/// and the browse entry points answer from an in-memory snapshot.
#[derive(Clone)]
pub struct LocalLibrary {
    roots: Vec<PathBuf>,
    gate: Arc<ReadyGate>,
    collection: Arc<RwLock<Vec<Track>>>,
    tree: Arc<RwLock<BrowseTree>>,
}

impl LocalLibrary {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            gate: Arc::new(ReadyGate::new()),
            collection: Arc::new(RwLock::new(Vec::new())),
            tree: Arc::new(RwLock::new(BrowseTree::default())),
        }
    }

    pub fn state(&self) -> SourceState {
        self.gate.state()
    }

    /// Root node id handed to a browsing client: known clients may browse the
    /// full tree, unknown ones get the empty root (they may still search when
    /// the tree allows it).
    pub fn root(&self, client_allowed: bool) -> &'static str {
        if client_allowed {
            BROWSABLE_ROOT
        } else {
            EMPTY_ROOT
        }
    }

    pub fn searchable_by_unknown_caller(&self) -> bool {
        self.tree
            .read()
            .expect("tree poisoned")
            .searchable_by_unknown_caller
    }

    /// Answer a browse request for the children of `parent_id`.
    ///
    /// When the source has reached a terminal state the response is produced
    /// synchronously and `true` is returned. Before that the request parks on
    /// the readiness gate and `false` is returned: the caller must treat its
    /// response as detached, `respond` will complete it after load. The
    /// response is `None` when the load failed or the parent id is unknown.
    pub fn children(
        &self,
        parent_id: &str,
        respond: impl FnOnce(Option<Vec<BrowseItem>>) + Send + 'static,
    ) -> bool {
        let tree = Arc::clone(&self.tree);
        let parent_id = parent_id.to_string();
        self.gate.when_ready(Box::new(move |success| {
            if !success {
                respond(None);
                return;
            }
            let tree = tree.read().expect("tree poisoned");
            respond(tree.children(&parent_id).map(|children| children.to_vec()));
        }))
    }
}

#[async_trait]
impl MusicSource for LocalLibrary {
    async fn load(&self) {
        if !self.gate.try_begin() {
            tracing::warn!(state = ?self.gate.state(), "load requested more than once");
            return;
        }

        let roots = self.roots.clone();
        let scanned = tokio::task::spawn_blocking(move || scan_roots(&roots)).await;
        match scanned {
            Ok(Ok(tracks)) => {
                *self.tree.write().expect("tree poisoned") = BrowseTree::new(&tracks);
                *self.collection.write().expect("collection poisoned") = tracks;
                self.gate.set_state(SourceState::Initialized);
            }
            Ok(Err(err)) => {
                tracing::error!(error = %err, "library scan failed");
                self.gate.set_state(SourceState::Error);
            }
            Err(err) => {
                tracing::error!(error = %err, "library scan task panicked or was cancelled");
                self.gate.set_state(SourceState::Error);
            }
        }
    }

    fn when_ready(&self, callback: ReadyCallback) -> bool {
        self.gate.when_ready(callback)
    }

    fn search(&self, query: &str, focus: &SearchFocus) -> Vec<Track> {
        let collection = self.collection.read().expect("collection poisoned");
        search_tracks(&collection, query, focus)
    }

    fn tracks(&self) -> Vec<Track> {
        self.collection.read().expect("collection poisoned").clone()
    }
}
