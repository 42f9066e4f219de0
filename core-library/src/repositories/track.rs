//! Track store trait and SQLite implementation

use crate::error::{LibraryError, Result};
use crate::models::Track;
use async_trait::async_trait;
use bytes::Bytes;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{debug, instrument};

/// Persistent record store the engine requires.
///
/// Implementations are the single source of truth; the engine layers its
/// own read cache on top.
#[async_trait]
pub trait TrackStore: Send + Sync {
    /// Insert or replace a track by path.
    ///
    /// Replacing keeps the stored favorite flag and insertion time.
    ///
    /// # Errors
    /// Returns error if:
    /// - Track validation fails
    /// - Database error occurs
    async fn save_track(&self, track: &Track) -> Result<()>;

    /// All tracks in insertion order
    async fn get_all_tracks(&self) -> Result<Vec<Track>>;

    /// Tracks flagged as favorite, in insertion order
    async fn get_favorite_tracks(&self) -> Result<Vec<Track>>;

    /// Set or clear the favorite flag
    ///
    /// # Errors
    /// Returns `LibraryError::NotFound` if no track has this path.
    async fn set_favorite(&self, path: &str, favorite: bool) -> Result<()>;

    /// Delete a track by path
    ///
    /// # Errors
    /// Returns `LibraryError::NotFound` if no track has this path.
    async fn delete_track(&self, path: &str) -> Result<()>;

    /// Remove every track
    async fn clear_all(&self) -> Result<()>;

    async fn exists(&self, path: &str) -> Result<bool>;

    /// Count total tracks
    async fn count(&self) -> Result<i64>;
}

/// SQLite implementation of TrackStore
pub struct SqliteTrackStore {
    pool: SqlitePool,
}

impl SqliteTrackStore {
    /// Create a new SQLite track store
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrackStore for SqliteTrackStore {
    #[instrument(skip(self, track), fields(path = %track.path))]
    async fn save_track(&self, track: &Track) -> Result<()> {
        track
            .validate()
            .map_err(|msg| LibraryError::invalid_input("track", msg))?;

        sqlx::query(
            r#"
            INSERT INTO tracks (
                path, title, artist, album, cover_art,
                duration_ms, track_number, is_favorite, added_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, 0, ?)
            ON CONFLICT(path) DO UPDATE SET
                title = excluded.title,
                artist = excluded.artist,
                album = excluded.album,
                cover_art = excluded.cover_art,
                duration_ms = excluded.duration_ms,
                track_number = excluded.track_number
            "#,
        )
        .bind(&track.path)
        .bind(&track.title)
        .bind(&track.artist)
        .bind(&track.album)
        .bind(track.cover_art.as_deref())
        .bind(track.duration_ms)
        .bind(track.track_number)
        .bind(track.added_at)
        .execute(&self.pool)
        .await?;

        debug!("Track saved");
        Ok(())
    }

    async fn get_all_tracks(&self) -> Result<Vec<Track>> {
        let rows = sqlx::query("SELECT * FROM tracks ORDER BY rowid ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_track).collect()
    }

    async fn get_favorite_tracks(&self) -> Result<Vec<Track>> {
        let rows = sqlx::query("SELECT * FROM tracks WHERE is_favorite = 1 ORDER BY rowid ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_track).collect()
    }

    #[instrument(skip(self))]
    async fn set_favorite(&self, path: &str, favorite: bool) -> Result<()> {
        let result = sqlx::query("UPDATE tracks SET is_favorite = ? WHERE path = ?")
            .bind(favorite)
            .bind(path)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(LibraryError::track_not_found(path));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_track(&self, path: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM tracks WHERE path = ?")
            .bind(path)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(LibraryError::track_not_found(path));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear_all(&self) -> Result<()> {
        let result = sqlx::query("DELETE FROM tracks").execute(&self.pool).await?;
        debug!(deleted = result.rows_affected(), "Library cleared");
        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        let found: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM tracks WHERE path = ?")
            .bind(path)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }

    async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tracks")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}

/// Map a `tracks` row onto the domain model.
pub(crate) fn row_to_track(row: &SqliteRow) -> Result<Track> {
    let cover_art: Option<Vec<u8>> = row.try_get("cover_art")?;

    Ok(Track {
        path: row.try_get("path")?,
        title: row.try_get("title")?,
        artist: row.try_get("artist")?,
        album: row.try_get("album")?,
        cover_art: cover_art.map(Bytes::from),
        duration_ms: row.try_get("duration_ms")?,
        track_number: row.try_get("track_number")?,
        added_at: row.try_get("added_at")?,
    })
}
