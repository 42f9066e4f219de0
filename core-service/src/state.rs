//! Immutable library snapshot published after every command.

use crate::selection::SelectionTracker;
use core_library::{LibraryStatistics, SearchResultItem, Track};
use std::sync::Arc;

/// One published state of the library engine.
///
/// Snapshots are never mutated. A transition builds a new value that shares
/// the collections it did not touch with its predecessor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LibraryState {
    /// Full library in insertion order
    pub tracks: Arc<Vec<Track>>,
    /// Favorite tracks (membership by path)
    pub favorites: Arc<Vec<Track>>,
    /// Ranked hits of the last completed search, empty without a query
    pub search_results: Arc<Vec<SearchResultItem>>,
    /// Active query; empty means no search is active
    pub search_query: String,
    /// True only while the library is being loaded or refreshed
    pub is_loading: bool,
    pub selection: SelectionTracker,
    pub statistics: LibraryStatistics,
}

impl LibraryState {
    pub fn has_active_search(&self) -> bool {
        !self.search_query.is_empty()
    }

    /// Tracks the presentation layer should list: the search hits while a
    /// query is active, the whole library otherwise.
    pub fn display_tracks(&self) -> Vec<&Track> {
        if self.has_active_search() {
            self.search_results.iter().map(|item| &item.track).collect()
        } else {
            self.tracks.iter().collect()
        }
    }

    pub fn search_result_tracks(&self) -> Vec<&Track> {
        self.search_results.iter().map(|item| &item.track).collect()
    }

    pub fn is_selecting(&self) -> bool {
        self.selection.is_selecting()
    }

    pub fn selected_tracks(&self) -> &[Track] {
        self.selection.tracks()
    }

    pub fn is_favorite(&self, path: &str) -> bool {
        self.favorites.iter().any(|t| t.path == path)
    }

    pub fn track(&self, path: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.path == path)
    }

    /// Field, score and matched text that put `path` into the current results.
    pub fn search_hint(&self, path: &str) -> Option<&SearchResultItem> {
        self.search_results.iter().find(|item| item.track.path == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_library::{search, SearchOptions};

    fn library() -> Vec<Track> {
        vec![
            Track::new("/1.mp3", "Bohemian Rhapsody", "Queen", "A Night at the Opera"),
            Track::new("/2.mp3", "Bad Guy", "Billie Eilish", "WWAFAWDWG"),
            Track::new("/3.mp3", "Radio Ga Ga", "Queen", "The Works"),
        ]
    }

    #[test]
    fn test_empty_state() {
        let state = LibraryState::default();
        assert!(state.tracks.is_empty());
        assert!(!state.is_loading);
        assert!(!state.is_selecting());
        assert!(!state.has_active_search());
        assert!(state.display_tracks().is_empty());
    }

    #[test]
    fn test_display_tracks_follows_query() {
        let tracks = library();
        let results = search(&tracks, "queen", &SearchOptions::default());

        let mut state = LibraryState {
            tracks: Arc::new(tracks),
            ..LibraryState::default()
        };
        assert_eq!(state.display_tracks().len(), 3);

        state.search_query = "queen".to_string();
        state.search_results = Arc::new(results);
        let shown: Vec<&str> = state
            .display_tracks()
            .iter()
            .map(|t| t.path.as_str())
            .collect();
        assert_eq!(shown, vec!["/1.mp3", "/3.mp3"]);
        assert_eq!(state.search_result_tracks().len(), 2);
    }

    #[test]
    fn test_lookups() {
        let tracks = library();
        let favorites = vec![tracks[1].clone()];
        let results = search(&tracks, "bad guy", &SearchOptions::default());
        let state = LibraryState {
            tracks: Arc::new(tracks),
            favorites: Arc::new(favorites),
            search_query: "bad guy".to_string(),
            search_results: Arc::new(results),
            ..LibraryState::default()
        };

        assert!(state.is_favorite("/2.mp3"));
        assert!(!state.is_favorite("/1.mp3"));
        assert_eq!(state.track("/3.mp3").map(|t| t.title.as_str()), Some("Radio Ga Ga"));
        assert!(state.track("/9.mp3").is_none());

        let hint = state.search_hint("/2.mp3").unwrap();
        assert_eq!(hint.score, 1.0);
        assert_eq!(hint.matched_text, "Bad Guy");
        assert!(state.search_hint("/1.mp3").is_none());
    }
}
