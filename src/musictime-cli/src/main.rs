use anyhow::Result;
use clap::{Parser, Subcommand};
use musictime_core::{init_logging, AppDirs, Config, MusicSource, SearchFocus};
use musictime_library::browse::{BrowseItem, BROWSABLE_ROOT};
use musictime_library::ready::SourceState;
use musictime_library::LocalLibrary;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(name = "musictime", version, about = "Local music library")]
struct Cli {
    /// Additional media root (repeatable; combined with configured roots)
    #[arg(long, global = true)]
    root: Vec<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Scan the media roots and report what was found
    Scan,
    /// Search the library, optionally focused on exact attributes
    Search(SearchCommand),
    /// List the children of a browse node
    Browse {
        /// Browse node id (defaults to the root)
        parent: Option<String>,
    },
}

#[derive(Debug, Parser, Clone)]
struct SearchCommand {
    /// Free-text query (substring of title or genre)
    query: Option<String>,
    /// Exact genre focus
    #[arg(long)]
    genre: Option<String>,
    /// Exact artist focus (track artist or album artist)
    #[arg(long)]
    artist: Option<String>,
    /// Exact album focus (requires --artist)
    #[arg(long)]
    album: Option<String>,
    /// Exact title focus (requires --artist and --album)
    #[arg(long)]
    title: Option<String>,
}

#[derive(Debug, Error)]
enum SearchArgsError {
    #[error("--album focus requires --artist")]
    AlbumWithoutArtist,
    #[error("--title focus requires --artist and --album")]
    TitleWithoutAlbum,
}

impl SearchCommand {
    fn focus(&self) -> Result<SearchFocus, SearchArgsError> {
        if self.album.is_some() && self.artist.is_none() {
            return Err(SearchArgsError::AlbumWithoutArtist);
        }
        if self.title.is_some() && (self.artist.is_none() || self.album.is_none()) {
            return Err(SearchArgsError::TitleWithoutAlbum);
        }
        Ok(SearchFocus {
            genre: self.genre.clone(),
            artist: self.artist.clone(),
            album: self.album.clone(),
            title: self.title.clone(),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let dirs = AppDirs::discover()?;
    let config = Config::load_or_default(&dirs)?;
    let _logging = init_logging(&config.logging, &dirs)?;

    let mut roots: Vec<PathBuf> = config.media_roots.iter().map(PathBuf::from).collect();
    roots.extend(cli.root.iter().cloned());
    if roots.is_empty() {
        anyhow::bail!(
            "no media roots configured; set media_roots in {} or pass --root",
            Config::config_path(&dirs).display()
        );
    }

    let library = LocalLibrary::new(roots);
    library.load().await;
    if library.state() == SourceState::Error {
        anyhow::bail!("library failed to load; see the log for details");
    }

    match cli.command {
        Command::Scan => {
            let tracks = library.tracks();
            tracing::info!(tracks = tracks.len(), "scan finished");
            println!("{} tracks", tracks.len());
            for track in tracks {
                println!(
                    "  [{}] {} - {}{}",
                    track.id,
                    track.artist,
                    track.title,
                    track
                        .album
                        .as_deref()
                        .map(|a| format!(" ({a})"))
                        .unwrap_or_default()
                );
            }
        }
        Command::Search(search) => {
            let focus = search.focus()?;
            let query = search.query.as_deref().unwrap_or_default();
            let results = library.search(query, &focus);
            if results.is_empty() {
                println!("No matches.");
            }
            for track in results {
                println!(
                    "  [{}] {} - {}{}",
                    track.id,
                    track.artist,
                    track.title,
                    track
                        .genre
                        .as_deref()
                        .map(|g| format!(" [{g}]"))
                        .unwrap_or_default()
                );
            }
        }
        Command::Browse { parent } => {
            let parent = parent.unwrap_or_else(|| BROWSABLE_ROOT.to_string());
            let (tx, rx) = std::sync::mpsc::channel();
            library.children(&parent, move |children| {
                let _ = tx.send(children);
            });
            match rx.recv()? {
                None => println!("Unknown browse node: {parent}"),
                Some(children) => {
                    for item in children {
                        match item {
                            BrowseItem::Category { id, title } => println!("  {title}  <{id}>"),
                            BrowseItem::Track(track) => {
                                println!("  {} - {}", track.artist, track.title)
                            }
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search_cmd(
        genre: Option<&str>,
        artist: Option<&str>,
        album: Option<&str>,
        title: Option<&str>,
    ) -> SearchCommand {
        SearchCommand {
            query: None,
            genre: genre.map(Into::into),
            artist: artist.map(Into::into),
            album: album.map(Into::into),
            title: title.map(Into::into),
        }
    }

    #[test]
    fn album_focus_requires_artist() {
        let err = search_cmd(None, None, Some("Born to Run"), None)
            .focus()
            .unwrap_err();
        assert!(matches!(err, SearchArgsError::AlbumWithoutArtist));
    }

    #[test]
    fn title_focus_requires_artist_and_album() {
        let err = search_cmd(None, Some("Bruce"), None, Some("Jungleland"))
            .focus()
            .unwrap_err();
        assert!(matches!(err, SearchArgsError::TitleWithoutAlbum));
    }

    #[test]
    fn bare_query_builds_an_unfocused_search() {
        let focus = search_cmd(None, None, None, None).focus().unwrap();
        assert!(focus.is_unfocused());
    }
}
