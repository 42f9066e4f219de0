//! Pure state transitions.
//!
//! [`reduce`] maps the current snapshot and an [`Action`] (a command with
//! the result of its I/O already embedded) to the next snapshot. It performs
//! no I/O, never suspends, and gives the same output for the same input.

use crate::state::LibraryState;
use core_library::{LibraryStatistics, SearchResultItem, Track};
use std::collections::HashSet;
use std::sync::Arc;

/// A command together with its completed outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A load or refresh began
    LoadStarted,
    LibraryLoaded {
        tracks: Arc<Vec<Track>>,
        favorites: Arc<Vec<Track>>,
    },
    /// Any command whose I/O failed
    OperationFailed,
    TrackSaved(Track),
    TrackRemoved { path: String },
    LibraryCleared,
    FavoriteSet { path: String, favorite: bool },
    SearchCompleted {
        query: String,
        results: Vec<SearchResultItem>,
    },
    SearchCleared,
    SelectionStarted(Track),
    SelectionToggled(Track),
    AllSelected,
    AllDeselected,
    SelectionFinished,
}

/// Compute the snapshot that follows `state` once `action` has happened.
pub fn reduce(state: &LibraryState, action: Action) -> LibraryState {
    match action {
        Action::LoadStarted => LibraryState {
            is_loading: true,
            ..state.clone()
        },

        Action::LibraryLoaded { tracks, favorites } => {
            // Favorites whose track disappeared from storage are pruned here
            let known: HashSet<&str> = tracks.iter().map(|t| t.path.as_str()).collect();
            let favorites = if favorites.iter().all(|t| known.contains(t.path.as_str())) {
                favorites
            } else {
                Arc::new(
                    favorites
                        .iter()
                        .filter(|t| known.contains(t.path.as_str()))
                        .cloned()
                        .collect(),
                )
            };
            with_library(state, tracks, favorites, false)
        }

        Action::OperationFailed => LibraryState {
            is_loading: false,
            ..state.clone()
        },

        Action::TrackSaved(track) => {
            let mut tracks = state.tracks.as_ref().clone();
            match tracks.iter_mut().find(|t| t.path == track.path) {
                // Replacing keeps the original insertion time, like the store
                Some(existing) => {
                    let added_at = existing.added_at;
                    *existing = track.clone();
                    existing.added_at = added_at;
                }
                None => tracks.push(track.clone()),
            }

            let favorites = if state.is_favorite(&track.path) {
                Arc::new(
                    state
                        .favorites
                        .iter()
                        .map(|t| if t.path == track.path { track.clone() } else { t.clone() })
                        .collect(),
                )
            } else {
                Arc::clone(&state.favorites)
            };

            with_library(state, Arc::new(tracks), favorites, state.is_loading)
        }

        Action::TrackRemoved { path } => {
            let tracks = Arc::new(without_path(&state.tracks, &path));
            let favorites = if state.is_favorite(&path) {
                Arc::new(without_path(&state.favorites, &path))
            } else {
                Arc::clone(&state.favorites)
            };
            let search_results = if state.search_hint(&path).is_some() {
                Arc::new(
                    state
                        .search_results
                        .iter()
                        .filter(|item| item.track.path != path)
                        .cloned()
                        .collect(),
                )
            } else {
                Arc::clone(&state.search_results)
            };

            LibraryState {
                search_results,
                selection: state.selection.without(&path),
                ..with_library(state, tracks, favorites, state.is_loading)
            }
        }

        Action::LibraryCleared => LibraryState {
            tracks: Arc::default(),
            favorites: Arc::default(),
            search_results: Arc::default(),
            selection: state.selection.deselect_all(),
            statistics: LibraryStatistics::default(),
            ..state.clone()
        },

        Action::FavoriteSet { path, favorite } => {
            let favorites = match (favorite, state.is_favorite(&path)) {
                (true, false) => match state.track(&path) {
                    Some(track) => {
                        let mut favorites = state.favorites.as_ref().clone();
                        favorites.push(track.clone());
                        Arc::new(favorites)
                    }
                    None => Arc::clone(&state.favorites),
                },
                (false, true) => Arc::new(without_path(&state.favorites, &path)),
                _ => Arc::clone(&state.favorites),
            };
            with_library(state, Arc::clone(&state.tracks), favorites, state.is_loading)
        }

        Action::SearchCompleted { query, results } => LibraryState {
            search_query: query,
            search_results: Arc::new(results),
            ..state.clone()
        },

        Action::SearchCleared => LibraryState {
            search_query: String::new(),
            search_results: Arc::default(),
            ..state.clone()
        },

        Action::SelectionStarted(track) => LibraryState {
            selection: state.selection.start(track),
            ..state.clone()
        },

        Action::SelectionToggled(track) => LibraryState {
            selection: state.selection.toggle(track),
            ..state.clone()
        },

        Action::AllSelected => LibraryState {
            selection: state.selection.select_all(state.display_tracks()),
            ..state.clone()
        },

        Action::AllDeselected | Action::SelectionFinished => LibraryState {
            selection: state.selection.deselect_all(),
            ..state.clone()
        },
    }
}

fn with_library(
    state: &LibraryState,
    tracks: Arc<Vec<Track>>,
    favorites: Arc<Vec<Track>>,
    is_loading: bool,
) -> LibraryState {
    LibraryState {
        statistics: LibraryStatistics::compute(&tracks, &favorites),
        tracks,
        favorites,
        is_loading,
        ..state.clone()
    }
}

fn without_path(tracks: &[Track], path: &str) -> Vec<Track> {
    tracks.iter().filter(|t| t.path != path).cloned().collect()
}
