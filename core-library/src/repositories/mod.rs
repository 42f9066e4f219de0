//! # Repository Layer
//!
//! Data access for the track library.
//!
//! ## Architecture
//!
//! - [`TrackStore`] is the contract the engine needs from persistent storage
//! - [`SqliteTrackStore`] implements it with sqlx over a SQLite pool
//! - [`CachedTrackRepository`] fronts any store with a time-bounded read
//!   cache that is dropped on every successful write
//! - All operations return `Result<T>` for error handling

pub mod cache;
pub mod track;

pub use cache::{CachedTrackRepository, DEFAULT_FRESHNESS_WINDOW};
pub use track::{SqliteTrackStore, TrackStore};
