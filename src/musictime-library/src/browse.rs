//! Browsable index over the loaded collection.
//!
//! Media-browser clients navigate by node id: the root exposes the
//! "Recommended" and "Albums" categories, the albums category lists one node
//! per album, and each album node lists its tracks in running order.

use musictime_core::Track;
use std::collections::HashMap;

pub const BROWSABLE_ROOT: &str = "/";
pub const EMPTY_ROOT: &str = "@empty@";
pub const RECOMMENDED_ROOT: &str = "__RECOMMENDED__";
pub const ALBUMS_ROOT: &str = "__ALBUMS__";

const UNKNOWN_ALBUM: &str = "Unknown Album";

/// A child of a browse node: a browsable category or a playable track.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowseItem {
    Category { id: String, title: String },
    Track(Track),
}

impl BrowseItem {
    pub fn is_browsable(&self) -> bool {
        matches!(self, BrowseItem::Category { .. })
    }
}

pub fn album_id_for(artist: &str, album: &str) -> String {
    format!("__ALBUM__{}::{}", artist, album)
}

#[derive(Debug, Clone)]
pub struct BrowseTree {
    children: HashMap<String, Vec<BrowseItem>>,
    pub searchable_by_unknown_caller: bool,
}

impl Default for BrowseTree {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl BrowseTree {
    pub fn new(tracks: &[Track]) -> Self {
        let mut children: HashMap<String, Vec<BrowseItem>> = HashMap::new();

        children.insert(
            BROWSABLE_ROOT.to_string(),
            vec![
                BrowseItem::Category {
                    id: RECOMMENDED_ROOT.to_string(),
                    title: "Recommended".to_string(),
                },
                BrowseItem::Category {
                    id: ALBUMS_ROOT.to_string(),
                    title: "Albums".to_string(),
                },
            ],
        );

        // Group by (browse artist, album); tracks without an album share a
        // placeholder album per artist.
        let mut album_nodes: Vec<(String, String, String)> = Vec::new();
        for track in tracks {
            let artist = track.display_artist().to_string();
            let album = track
                .album
                .clone()
                .unwrap_or_else(|| UNKNOWN_ALBUM.to_string());
            let id = album_id_for(&artist, &album);
            let node = children.entry(id.clone()).or_insert_with(|| {
                album_nodes.push((id.clone(), album.clone(), artist.clone()));
                Vec::new()
            });
            node.push(BrowseItem::Track(track.clone()));
        }

        for items in children.values_mut() {
            items.sort_by(|a, b| match (a, b) {
                (BrowseItem::Track(a), BrowseItem::Track(b)) => a
                    .track_number
                    .unwrap_or(u32::MAX)
                    .cmp(&b.track_number.unwrap_or(u32::MAX))
                    .then_with(|| a.title.cmp(&b.title)),
                _ => std::cmp::Ordering::Equal,
            });
        }

        album_nodes.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.2.cmp(&b.2)));
        let recommended = album_nodes
            .iter()
            .filter_map(|(id, _, _)| match children.get(id).and_then(|c| c.first()) {
                Some(BrowseItem::Track(track)) => Some(BrowseItem::Track(track.clone())),
                _ => None,
            })
            .collect();
        let albums = album_nodes
            .into_iter()
            .map(|(id, album, _)| BrowseItem::Category { id, title: album })
            .collect();
        children.insert(ALBUMS_ROOT.to_string(), albums);
        children.insert(RECOMMENDED_ROOT.to_string(), recommended);
        children.insert(EMPTY_ROOT.to_string(), Vec::new());

        Self {
            children,
            searchable_by_unknown_caller: true,
        }
    }

    pub fn children(&self, parent_id: &str) -> Option<&[BrowseItem]> {
        self.children.get(parent_id).map(Vec::as_slice)
    }
}
