//! Multi-select session tracking.
//!
//! A [`SelectionTracker`] is either idle (nothing selected) or selecting (at
//! least one track selected). There is no separate flag: dropping the last
//! selected track returns the tracker to idle. Every operation returns a new
//! tracker and leaves the receiver untouched.

use core_library::Track;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Idle,
    Selecting,
}

/// Set of selected tracks, membership by path, kept in selection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionTracker {
    selected: Arc<Vec<Track>>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_tracks(tracks: Vec<Track>) -> Self {
        Self {
            selected: Arc::new(tracks),
        }
    }

    /// Begin a session with `track`.
    ///
    /// While already selecting, the track joins the current set instead.
    pub fn start(&self, track: Track) -> Self {
        if self.contains(&track.path) {
            return self.clone();
        }
        let mut selected = self.selected.as_ref().clone();
        selected.push(track);
        Self::from_tracks(selected)
    }

    /// Add `track` if absent, remove it if present.
    ///
    /// Valid for any track, including ones outside the current view.
    pub fn toggle(&self, track: Track) -> Self {
        if self.contains(&track.path) {
            self.without(&track.path)
        } else {
            self.start(track)
        }
    }

    /// Replace the set with every track of `display`.
    pub fn select_all<'a, I>(&self, display: I) -> Self
    where
        I: IntoIterator<Item = &'a Track>,
    {
        let mut selected: Vec<Track> = Vec::new();
        for track in display {
            if !selected.iter().any(|t| t.path == track.path) {
                selected.push(track.clone());
            }
        }
        Self::from_tracks(selected)
    }

    pub fn deselect_all(&self) -> Self {
        Self::new()
    }

    /// Drop `path` from the set, if selected.
    pub fn without(&self, path: &str) -> Self {
        if !self.contains(path) {
            return self.clone();
        }
        Self::from_tracks(
            self.selected
                .iter()
                .filter(|t| t.path != path)
                .cloned()
                .collect(),
        )
    }

    pub fn contains(&self, path: &str) -> bool {
        self.selected.iter().any(|t| t.path == path)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn is_selecting(&self) -> bool {
        !self.is_empty()
    }

    pub fn mode(&self) -> SelectionMode {
        if self.is_selecting() {
            SelectionMode::Selecting
        } else {
            SelectionMode::Idle
        }
    }
}
