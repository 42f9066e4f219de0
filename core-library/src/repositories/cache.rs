//! Read cache in front of a [`TrackStore`].
//!
//! Reads are served from an in-memory snapshot while it is younger than the
//! freshness window. Every successful write drops both snapshots, so the
//! next read after a write always goes to the store. Failed writes leave the
//! cache untouched.
//!
//! The cache is mutated through `&mut self` only; the engine owns it and
//! serializes every call, so no interior locking is needed.

use crate::error::Result;
use crate::models::Track;
use crate::repositories::TrackStore;
use bridge_traits::time::Clock;
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Default freshness window for cached reads.
pub const DEFAULT_FRESHNESS_WINDOW: Duration = Duration::from_secs(5 * 60);

struct LibrarySnapshot {
    tracks: Arc<Vec<Track>>,
    by_path: HashMap<String, usize>,
    taken_at: DateTime<Utc>,
}

struct FavoritesSnapshot {
    tracks: Arc<Vec<Track>>,
    taken_at: DateTime<Utc>,
}

/// Caching repository wrapping the persistent store.
pub struct CachedTrackRepository {
    store: Arc<dyn TrackStore>,
    clock: Arc<dyn Clock>,
    freshness: TimeDelta,
    library: Option<LibrarySnapshot>,
    favorites: Option<FavoritesSnapshot>,
}

impl CachedTrackRepository {
    pub fn new(store: Arc<dyn TrackStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_freshness(store, clock, DEFAULT_FRESHNESS_WINDOW)
    }

    pub fn with_freshness(
        store: Arc<dyn TrackStore>,
        clock: Arc<dyn Clock>,
        freshness: Duration,
    ) -> Self {
        Self {
            store,
            clock,
            freshness: TimeDelta::from_std(freshness).unwrap_or(TimeDelta::MAX),
            library: None,
            favorites: None,
        }
    }

    fn is_fresh(&self, taken_at: DateTime<Utc>) -> bool {
        let age = self.clock.now() - taken_at;
        age >= TimeDelta::zero() && age < self.freshness
    }

    fn library_is_fresh(&self) -> bool {
        self.library
            .as_ref()
            .is_some_and(|snapshot| self.is_fresh(snapshot.taken_at))
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Full library, from cache when fresh.
    ///
    /// Store failures propagate unchanged and leave any stale snapshot in place.
    pub async fn get_all_tracks(&mut self) -> Result<Arc<Vec<Track>>> {
        if self.library_is_fresh() {
            if let Some(snapshot) = &self.library {
                debug!(tracks = snapshot.tracks.len(), "Serving library from cache");
                return Ok(Arc::clone(&snapshot.tracks));
            }
        }

        let tracks = Arc::new(self.store.get_all_tracks().await?);
        let by_path = tracks
            .iter()
            .enumerate()
            .map(|(index, track)| (track.path.clone(), index))
            .collect();

        debug!(tracks = tracks.len(), "Library cache repopulated");
        self.library = Some(LibrarySnapshot {
            tracks: Arc::clone(&tracks),
            by_path,
            taken_at: self.clock.now(),
        });

        Ok(tracks)
    }

    /// Favorite tracks, from cache only while the library cache is also fresh.
    pub async fn get_favorites(&mut self) -> Result<Arc<Vec<Track>>> {
        if self.library_is_fresh() {
            if let Some(snapshot) = &self.favorites {
                if self.is_fresh(snapshot.taken_at) {
                    return Ok(Arc::clone(&snapshot.tracks));
                }
            }
        } else if self.favorites.take().is_some() {
            debug!("Discarding favorites cache with a stale library cache");
        }

        let tracks = Arc::new(self.store.get_favorite_tracks().await?);
        self.favorites = Some(FavoritesSnapshot {
            tracks: Arc::clone(&tracks),
            taken_at: self.clock.now(),
        });

        Ok(tracks)
    }

    /// Look up a single track through the path index.
    pub async fn get_track(&mut self, path: &str) -> Result<Option<Track>> {
        let tracks = self.get_all_tracks().await?;
        let index = self
            .library
            .as_ref()
            .and_then(|snapshot| snapshot.by_path.get(path).copied());

        Ok(index.and_then(|i| tracks.get(i).cloned()))
    }

    pub async fn exists(&mut self, path: &str) -> Result<bool> {
        if !self.library_is_fresh() {
            self.get_all_tracks().await?;
        }

        Ok(self
            .library
            .as_ref()
            .is_some_and(|snapshot| snapshot.by_path.contains_key(path)))
    }

    pub async fn count(&mut self) -> Result<usize> {
        Ok(self.get_all_tracks().await?.len())
    }

    pub async fn favorite_count(&mut self) -> Result<usize> {
        Ok(self.get_favorites().await?.len())
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    #[instrument(skip(self, track), fields(path = %track.path))]
    pub async fn save(&mut self, track: &Track) -> Result<()> {
        self.store
            .save_track(track)
            .await
            .inspect_err(|e| warn!(error = %e, "Save failed, cache kept"))?;
        self.invalidate();
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn update_favorite(&mut self, path: &str, favorite: bool) -> Result<()> {
        self.store
            .set_favorite(path, favorite)
            .await
            .inspect_err(|e| warn!(error = %e, "Favorite update failed, cache kept"))?;
        self.invalidate();
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete(&mut self, path: &str) -> Result<()> {
        self.store
            .delete_track(path)
            .await
            .inspect_err(|e| warn!(error = %e, "Delete failed, cache kept"))?;
        self.invalidate();
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn clear_all(&mut self) -> Result<()> {
        self.store
            .clear_all()
            .await
            .inspect_err(|e| warn!(error = %e, "Clear failed, cache kept"))?;
        self.invalidate();
        Ok(())
    }

    /// Drop both snapshots so the next read hits the store.
    pub fn invalidate(&mut self) {
        self.library = None;
        self.favorites = None;
    }

    pub fn is_cached(&self) -> bool {
        self.library_is_fresh()
    }
}
