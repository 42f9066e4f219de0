//! Domain models for the music library
//!
//! This module contains the track record and the statistics derived from a
//! collection of them.

use bridge_traits::scanner::ScannedTrack;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::path::Path;

/// Artist used when the tag is missing
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Album used when the tag is missing
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

// =============================================================================
// Domain Models
// =============================================================================

/// Music track identified by its storage path.
///
/// Two tracks are equal iff their paths are equal; metadata differences are
/// ignored so a re-scanned file replaces the old record instead of
/// duplicating it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Storage path, the stable identity of the record
    pub path: String,
    /// Track title
    pub title: String,
    /// Track artist
    pub artist: String,
    /// Album name
    pub album: String,
    /// Embedded cover art
    pub cover_art: Option<Bytes>,
    /// Duration in milliseconds
    pub duration_ms: Option<i64>,
    /// Track position on album
    pub track_number: Option<i32>,
    /// When the track entered the library (Unix epoch milliseconds)
    pub added_at: i64,
}

impl Track {
    /// Create a normalized track record.
    ///
    /// Empty titles fall back to the file stem of `path`, empty artist and
    /// album fall back to [`UNKNOWN_ARTIST`] and [`UNKNOWN_ALBUM`].
    pub fn new(
        path: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        album: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            artist: artist.into(),
            album: album.into(),
            cover_art: None,
            duration_ms: None,
            track_number: None,
            added_at: chrono::Utc::now().timestamp_millis(),
        }
        .normalized()
    }

    /// Apply the metadata fallbacks of [`Track::new`] to a record built some
    /// other way, for example deserialized from a host command.
    pub fn normalized(mut self) -> Self {
        self.title = normalize(self.title).unwrap_or_else(|| title_from_path(&self.path));
        self.artist = normalize(self.artist).unwrap_or_else(|| UNKNOWN_ARTIST.to_string());
        self.album = normalize(self.album).unwrap_or_else(|| UNKNOWN_ALBUM.to_string());
        self
    }

    pub fn with_cover_art(mut self, cover_art: impl Into<Bytes>) -> Self {
        self.cover_art = Some(cover_art.into());
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: i64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_track_number(mut self, track_number: i32) -> Self {
        self.track_number = Some(track_number);
        self
    }

    pub fn with_added_at(mut self, added_at: i64) -> Self {
        self.added_at = added_at;
        self
    }

    /// Validate track data
    pub fn validate(&self) -> Result<(), String> {
        if self.path.trim().is_empty() {
            return Err("Track path cannot be empty".to_string());
        }

        if self.title.trim().is_empty() {
            return Err("Track title cannot be empty".to_string());
        }

        if let Some(duration) = self.duration_ms {
            if duration < 0 {
                return Err("Track duration cannot be negative".to_string());
            }
        }

        Ok(())
    }

    /// Title, artist and album joined by single spaces.
    pub fn combined_text(&self) -> String {
        format!("{} {} {}", self.title, self.artist, self.album)
    }
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Track {}

impl Hash for Track {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl From<ScannedTrack> for Track {
    fn from(scanned: ScannedTrack) -> Self {
        let mut track = Track::new(scanned.path, scanned.title, scanned.artist, scanned.album);
        track.cover_art = scanned.cover_art;
        track.duration_ms = scanned.duration_ms;
        track.track_number = scanned.track_number;
        track
    }
}

fn normalize(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}

/// Derive a display title from a storage path ("/music/Song.mp3" -> "Song").
pub fn title_from_path(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::trim)
        .filter(|stem| !stem.is_empty())
        .unwrap_or(path)
        .to_string()
}

// =============================================================================
// Statistics
// =============================================================================

/// Counts derived from the library contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryStatistics {
    pub total_tracks: usize,
    pub total_favorites: usize,
    /// Distinct album names (exact match)
    pub album_count: usize,
    /// Distinct artist names (exact match)
    pub artist_count: usize,
}

impl LibraryStatistics {
    pub fn compute(tracks: &[Track], favorites: &[Track]) -> Self {
        let albums: HashSet<&str> = tracks.iter().map(|t| t.album.as_str()).collect();
        let artists: HashSet<&str> = tracks.iter().map(|t| t.artist.as_str()).collect();

        Self {
            total_tracks: tracks.len(),
            total_favorites: favorites.len(),
            album_count: albums.len(),
            artist_count: artists.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_defaults() {
        let track = Track::new("/music/Queen - Bohemian Rhapsody.flac", "", "  ", "");

        assert_eq!(track.title, "Queen - Bohemian Rhapsody");
        assert_eq!(track.artist, UNKNOWN_ARTIST);
        assert_eq!(track.album, UNKNOWN_ALBUM);
        assert!(track.cover_art.is_none());
    }

    #[test]
    fn test_track_trims_metadata() {
        let track = Track::new("/music/a.mp3", " Bad Guy ", "Billie Eilish ", " WWAFAWDWG");

        assert_eq!(track.title, "Bad Guy");
        assert_eq!(track.artist, "Billie Eilish");
        assert_eq!(track.album, "WWAFAWDWG");
    }

    #[test]
    fn test_normalized_fills_blank_fields() {
        let raw = Track {
            path: "/music/Song.mp3".to_string(),
            title: " ".to_string(),
            artist: String::new(),
            album: " Live ".to_string(),
            cover_art: None,
            duration_ms: None,
            track_number: None,
            added_at: 0,
        };

        let track = raw.normalized();
        assert_eq!(track.title, "Song");
        assert_eq!(track.artist, UNKNOWN_ARTIST);
        assert_eq!(track.album, "Live");
        assert!(track.validate().is_ok());
    }

    #[test]
    fn test_title_from_path_without_extension() {
        assert_eq!(title_from_path("/music/untitled"), "untitled");
        assert_eq!(title_from_path("C:/Music/Song.mp3"), "Song");
        assert_eq!(title_from_path("/"), "/");
    }

    #[test]
    fn test_equality_by_path() {
        let a = Track::new("/music/a.mp3", "First", "X", "Y");
        let b = Track::new("/music/a.mp3", "Renamed", "Z", "W").with_track_number(3);
        let c = Track::new("/music/c.mp3", "First", "X", "Y");

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<Track> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_validate() {
        let track = Track::new("/music/a.mp3", "Song", "", "");
        assert!(track.validate().is_ok());

        let no_path = Track::new("  ", "Song", "", "");
        assert!(no_path.validate().is_err());

        let negative = Track::new("/music/a.mp3", "Song", "", "").with_duration_ms(-5);
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_from_scanned_track() {
        let scanned = ScannedTrack {
            path: "/music/b.ogg".to_string(),
            title: String::new(),
            artist: "Queen".to_string(),
            album: String::new(),
            cover_art: Some(Bytes::from_static(b"\x89PNG")),
            duration_ms: Some(354_000),
            track_number: Some(11),
        };

        let track = Track::from(scanned);
        assert_eq!(track.title, "b");
        assert_eq!(track.artist, "Queen");
        assert_eq!(track.album, UNKNOWN_ALBUM);
        assert_eq!(track.duration_ms, Some(354_000));
        assert_eq!(track.track_number, Some(11));
        assert_eq!(track.cover_art.as_deref(), Some(&b"\x89PNG"[..]));
    }

    #[test]
    fn test_statistics() {
        let tracks = vec![
            Track::new("/1.mp3", "One", "Queen", "A Night at the Opera"),
            Track::new("/2.mp3", "Two", "Queen", "News of the World"),
            Track::new("/3.mp3", "Three", "Billie Eilish", ""),
        ];
        let favorites = vec![tracks[0].clone()];

        let stats = LibraryStatistics::compute(&tracks, &favorites);
        assert_eq!(stats.total_tracks, 3);
        assert_eq!(stats.total_favorites, 1);
        assert_eq!(stats.album_count, 3);
        assert_eq!(stats.artist_count, 2);

        assert_eq!(LibraryStatistics::compute(&[], &[]), LibraryStatistics::default());
    }
}
