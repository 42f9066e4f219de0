//! # Library Management Module
//!
//! Owns the track library: the persistent store contract, its SQLite
//! adapter, the time-bounded read cache in front of it, and the relevance
//! search over track records.
//!
//! ## Overview
//!
//! This module manages:
//! - SQLite database schema and migrations
//! - The `TrackStore` repository contract and its SQLite implementation
//! - `CachedTrackRepository`, a read cache invalidated on every write
//! - Weighted multi-field relevance search with fuzzy fallback

pub mod db;
pub mod error;
pub mod models;
pub mod repositories;
pub mod search;

pub use error::{ErrorKind, LibraryError, Result};
pub use models::{LibraryStatistics, Track};
pub use repositories::{
    CachedTrackRepository, SqliteTrackStore, TrackStore, DEFAULT_FRESHNESS_WINDOW,
};
pub use search::{search, SearchField, SearchOptions, SearchResultItem, DEFAULT_MIN_RELEVANCE};
