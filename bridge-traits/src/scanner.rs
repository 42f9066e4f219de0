//! Media Import Abstraction
//!
//! The library engine does not scan directories or parse audio tags itself.
//! Hosts provide a [`MediaScanner`] that does both and hands back plain
//! metadata records, which the engine then persists one at a time.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;

/// Metadata extracted from a single audio file.
///
/// Fields are raw tag values; empty strings are allowed and are normalized
/// by the library when the record becomes a track.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedTrack {
    /// Storage path of the file (becomes the track identity)
    pub path: String,
    /// Title tag
    pub title: String,
    /// Artist tag
    pub artist: String,
    /// Album tag
    pub album: String,
    /// Embedded cover art
    pub cover_art: Option<Bytes>,
    /// Duration in milliseconds
    pub duration_ms: Option<i64>,
    /// Track position on album
    pub track_number: Option<i32>,
}

impl ScannedTrack {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = artist.into();
        self
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = album.into();
        self
    }
}

/// Import collaborator contract.
///
/// # Errors
///
/// Implementations should return [`BridgeError::Io`](crate::BridgeError::Io)
/// when a path cannot be read so the engine can classify the failure as a
/// file access problem.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::scanner::{MediaScanner, ScannedTrack};
///
/// async fn import(scanner: &dyn MediaScanner, dir: PathBuf) {
///     let records = scanner.scan(&[dir]).await?;
///     println!("found {} tracks", records.len());
/// }
/// ```
#[async_trait::async_trait]
pub trait MediaScanner: Send + Sync {
    /// Scan the given files or directories and return one record per audio file.
    async fn scan(&self, paths: &[PathBuf]) -> Result<Vec<ScannedTrack>>;
}
