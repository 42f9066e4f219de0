//! Commands accepted by the library engine and what they report back.

use core_library::{ErrorKind, Track};
use serde::{Deserialize, Serialize};

/// Every request the presentation layer can make of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command")]
pub enum LibraryCommand {
    /// Load the library from storage for the first time.
    InitializeLibrary,
    /// Drop cached reads and load the library again.
    RefreshLibrary,
    /// Insert or replace a track (by path).
    SaveTrack(Track),
    RemoveTrack { path: String },
    ClearLibrary,
    /// Flip the favorite flag of a track.
    ToggleFavorite { path: String },
    Search { query: String },
    ClearSearch,
    StartSelection(Track),
    ToggleSelection(Track),
    /// Select every track currently displayed.
    SelectAll,
    DeselectAll,
    /// End the selection session; the selected tracks come back in the outcome.
    FinishSelection,
}

impl LibraryCommand {
    /// Operation label used in logs and failure events.
    pub fn name(&self) -> &'static str {
        match self {
            LibraryCommand::InitializeLibrary => "initialize_library",
            LibraryCommand::RefreshLibrary => "refresh_library",
            LibraryCommand::SaveTrack(_) => "save_track",
            LibraryCommand::RemoveTrack { .. } => "remove_track",
            LibraryCommand::ClearLibrary => "clear_library",
            LibraryCommand::ToggleFavorite { .. } => "toggle_favorite",
            LibraryCommand::Search { .. } => "search",
            LibraryCommand::ClearSearch => "clear_search",
            LibraryCommand::StartSelection(_) => "start_selection",
            LibraryCommand::ToggleSelection(_) => "toggle_selection",
            LibraryCommand::SelectAll => "select_all",
            LibraryCommand::DeselectAll => "deselect_all",
            LibraryCommand::FinishSelection => "finish_selection",
        }
    }
}

/// Result of processing one command.
///
/// Failures are values, not errors: the matching `LibraryOperationFailed`
/// event has already been published when a caller sees `Failed`.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Applied,
    /// Tracks that were selected when the session ended
    SelectionFinished(Vec<Track>),
    /// Summary of a bulk import
    Imported { saved: usize, failed: usize },
    Failed {
        kind: ErrorKind,
        /// User-facing message
        message: String,
    },
}

impl CommandOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, CommandOutcome::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_names_are_unique() {
        let track = Track::new("/a.mp3", "A", "", "");
        let commands = vec![
            LibraryCommand::InitializeLibrary,
            LibraryCommand::RefreshLibrary,
            LibraryCommand::SaveTrack(track.clone()),
            LibraryCommand::RemoveTrack { path: "/a.mp3".into() },
            LibraryCommand::ClearLibrary,
            LibraryCommand::ToggleFavorite { path: "/a.mp3".into() },
            LibraryCommand::Search { query: "a".into() },
            LibraryCommand::ClearSearch,
            LibraryCommand::StartSelection(track.clone()),
            LibraryCommand::ToggleSelection(track),
            LibraryCommand::SelectAll,
            LibraryCommand::DeselectAll,
            LibraryCommand::FinishSelection,
        ];

        let names: std::collections::HashSet<&str> = commands.iter().map(|c| c.name()).collect();
        assert_eq!(names.len(), commands.len());
    }

    #[test]
    fn test_command_serialization() {
        let json = serde_json::to_value(LibraryCommand::ToggleFavorite {
            path: "/a.mp3".into(),
        })
        .unwrap();
        assert_eq!(json["command"], "ToggleFavorite");
        assert_eq!(json["path"], "/a.mp3");
    }

    #[test]
    fn test_outcome_failure() {
        let failed = CommandOutcome::Failed {
            kind: ErrorKind::NotFound,
            message: ErrorKind::NotFound.user_message().to_string(),
        };
        assert!(failed.is_failure());
        assert!(!CommandOutcome::Applied.is_failure());
    }
}
