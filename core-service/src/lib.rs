//! Library engine façade and bootstrap helpers.
//!
//! This crate composes the repository cache and relevance search from
//! `core-library` with the configuration and event bus from `core-runtime`
//! into a single-writer [`LibraryEngine`]. Hosts either construct the engine
//! over their own [`TrackStore`](core_library::TrackStore) or call
//! [`bootstrap`] to get one backed by SQLite.

pub mod bootstrap;
pub mod commands;
pub mod engine;
pub mod error;
pub mod reducer;
pub mod selection;
pub mod state;

pub use bootstrap::bootstrap;
pub use commands::{CommandOutcome, LibraryCommand};
pub use engine::LibraryEngine;
pub use error::{CoreError, Result};
pub use reducer::{reduce, Action};
pub use selection::{SelectionMode, SelectionTracker};
pub use state::LibraryState;

pub use core_library::{ErrorKind, LibraryStatistics, SearchField, SearchResultItem, Track};
pub use core_runtime::config::CoreConfig;
pub use core_runtime::events::{EventSeverity, LibraryEvent};
