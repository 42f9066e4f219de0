//! # Core Configuration Module
//!
//! Configuration for the library engine.
//!
//! ## Overview
//!
//! A builder assembles a [`CoreConfig`] holding the storage location, cache
//! and search tuning, and the host capabilities the engine is handed. Values
//! are validated when the builder finishes so a misconfigured engine never
//! starts.
//!
//! ## Required Settings
//!
//! - A storage location: `database_path()` or `in_memory_database()`
//!
//! ## Optional Capabilities
//!
//! - `Clock` - Time source for cache freshness (default: `SystemClock`)
//! - `MediaScanner` - Import collaborator; without it imports are rejected
//!
//! ## Usage
//!
//! ```no_run
//! use core_runtime::config::CoreConfig;
//! use std::time::Duration;
//!
//! let config = CoreConfig::builder()
//!     .database_path("/path/to/library.db")
//!     .cache_freshness(Duration::from_secs(120))
//!     .max_search_results(50)
//!     .build()
//!     .expect("valid configuration");
//! ```
//!
//! ## Error Handling
//!
//! ```should_panic
//! use core_runtime::config::CoreConfig;
//!
//! // No storage location configured
//! let config = CoreConfig::builder()
//!     .build()
//!     .expect("Should fail - missing database location");
//! ```

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use bridge_traits::{Clock, MediaScanner, SystemClock};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Freshness window applied to cached library reads.
pub use core_library::DEFAULT_FRESHNESS_WINDOW as DEFAULT_CACHE_FRESHNESS;

/// Minimum weighted score a search result must reach.
pub use core_library::DEFAULT_MIN_RELEVANCE;

/// Where the track store keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// SQLite database file
    File(PathBuf),
    /// Private in-memory database, discarded with the engine
    InMemory,
}

/// Core configuration for the library engine.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    pub database: DatabaseLocation,

    /// Maximum age of a cached read before storage is consulted again
    pub cache_freshness: Duration,

    /// Search results scoring below this are dropped
    pub min_relevance: f64,

    /// Keep only the top N search results (`None` = unlimited)
    pub max_search_results: Option<usize>,

    /// Enable approximate matching in search
    pub fuzzy_matching: bool,

    /// Per-subscriber event buffer
    pub event_buffer_size: usize,

    pub clock: Arc<dyn Clock>,

    /// Import collaborator (optional)
    pub media_scanner: Option<Arc<dyn MediaScanner>>,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("database", &self.database)
            .field("cache_freshness", &self.cache_freshness)
            .field("min_relevance", &self.min_relevance)
            .field("max_search_results", &self.max_search_results)
            .field("fuzzy_matching", &self.fuzzy_matching)
            .field("event_buffer_size", &self.event_buffer_size)
            .field("clock", &"Clock { ... }")
            .field(
                "media_scanner",
                &self.media_scanner.as_ref().map(|_| "MediaScanner { ... }"),
            )
            .finish()
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Database path is not empty
    /// - Cache freshness window is non-zero
    /// - Minimum relevance lies in `[0.0, 1.0]`
    /// - Result limit and event buffer are non-zero
    pub fn validate(&self) -> Result<()> {
        if let DatabaseLocation::File(path) = &self.database {
            if path.as_os_str().is_empty() {
                return Err(Error::Config("Database path cannot be empty".to_string()));
            }
        }

        if self.cache_freshness.is_zero() {
            return Err(Error::Config(
                "Cache freshness must be greater than zero. \
                 Omit .cache_freshness() to use the 5 minute default."
                    .to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.min_relevance) {
            return Err(Error::Config(format!(
                "Minimum relevance must be between 0.0 and 1.0, got {}",
                self.min_relevance
            )));
        }

        if self.max_search_results == Some(0) {
            return Err(Error::Config(
                "Search result limit must be greater than zero. \
                 Omit .max_search_results() for unlimited results."
                    .to_string(),
            ));
        }

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Returns the import collaborator or an actionable error.
    pub fn require_media_scanner(&self) -> Result<Arc<dyn MediaScanner>> {
        self.media_scanner
            .clone()
            .ok_or_else(media_scanner_missing_error)
    }
}

pub fn media_scanner_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "MediaScanner".to_string(),
        message: "A MediaScanner implementation is required to import files. \
                  Inject one with CoreConfig::builder().media_scanner(...)."
            .to_string(),
    }
}

/// Builder for constructing a [`CoreConfig`].
#[derive(Default)]
pub struct CoreConfigBuilder {
    database: Option<DatabaseLocation>,
    cache_freshness: Option<Duration>,
    min_relevance: Option<f64>,
    max_search_results: Option<usize>,
    fuzzy_matching: Option<bool>,
    event_buffer_size: Option<usize>,
    clock: Option<Arc<dyn Clock>>,
    media_scanner: Option<Arc<dyn MediaScanner>>,
}

impl CoreConfigBuilder {
    /// Sets the path to the SQLite database file.
    ///
    /// The file is created on first use if it does not exist.
    pub fn database_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.database = Some(DatabaseLocation::File(path.into()));
        self
    }

    /// Keeps the library in memory only (tests, previews).
    pub fn in_memory_database(mut self) -> Self {
        self.database = Some(DatabaseLocation::InMemory);
        self
    }

    pub fn cache_freshness(mut self, window: Duration) -> Self {
        self.cache_freshness = Some(window);
        self
    }

    pub fn min_relevance(mut self, min_relevance: f64) -> Self {
        self.min_relevance = Some(min_relevance);
        self
    }

    pub fn max_search_results(mut self, limit: usize) -> Self {
        self.max_search_results = Some(limit);
        self
    }

    pub fn fuzzy_matching(mut self, enabled: bool) -> Self {
        self.fuzzy_matching = Some(enabled);
        self
    }

    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Overrides the time source (tests inject a `ManualClock`).
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn media_scanner(mut self, scanner: Arc<dyn MediaScanner>) -> Self {
        self.media_scanner = Some(scanner);
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if no storage location was set or a value
    /// fails validation.
    pub fn build(self) -> Result<CoreConfig> {
        let database = self.database.ok_or_else(|| {
            Error::Config(
                "Database location is required. Use .database_path() or .in_memory_database()."
                    .to_string(),
            )
        })?;

        let config = CoreConfig {
            database,
            cache_freshness: self.cache_freshness.unwrap_or(DEFAULT_CACHE_FRESHNESS),
            min_relevance: self.min_relevance.unwrap_or(DEFAULT_MIN_RELEVANCE),
            max_search_results: self.max_search_results,
            fuzzy_matching: self.fuzzy_matching.unwrap_or(true),
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            media_scanner: self.media_scanner,
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::{ManualClock, ScannedTrack};
    use std::path::PathBuf;

    struct NoopScanner;

    #[async_trait]
    impl MediaScanner for NoopScanner {
        async fn scan(&self, _paths: &[PathBuf]) -> bridge_traits::error::Result<Vec<ScannedTrack>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_builder_requires_database_location() {
        let result = CoreConfig::builder().build();

        match result {
            Err(Error::Config(msg)) => assert!(msg.contains(".database_path()")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_defaults() {
        let config = CoreConfig::builder()
            .database_path("/tmp/library.db")
            .build()
            .unwrap();

        assert_eq!(
            config.database,
            DatabaseLocation::File(PathBuf::from("/tmp/library.db"))
        );
        assert_eq!(config.cache_freshness, Duration::from_secs(300));
        assert_eq!(config.min_relevance, 0.1);
        assert_eq!(config.max_search_results, None);
        assert!(config.fuzzy_matching);
        assert_eq!(config.event_buffer_size, DEFAULT_EVENT_BUFFER_SIZE);
        assert!(config.media_scanner.is_none());
    }

    #[test]
    fn test_custom_values() {
        let clock = Arc::new(ManualClock::default());
        let config = CoreConfig::builder()
            .in_memory_database()
            .cache_freshness(Duration::from_secs(30))
            .min_relevance(0.25)
            .max_search_results(20)
            .fuzzy_matching(false)
            .event_buffer_size(8)
            .clock(clock)
            .media_scanner(Arc::new(NoopScanner))
            .build()
            .unwrap();

        assert_eq!(config.database, DatabaseLocation::InMemory);
        assert_eq!(config.cache_freshness, Duration::from_secs(30));
        assert_eq!(config.min_relevance, 0.25);
        assert_eq!(config.max_search_results, Some(20));
        assert!(!config.fuzzy_matching);
        assert_eq!(config.event_buffer_size, 8);
        assert!(config.require_media_scanner().is_ok());
    }

    #[test]
    fn test_rejects_empty_database_path() {
        let result = CoreConfig::builder().database_path("").build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_zero_freshness() {
        let result = CoreConfig::builder()
            .in_memory_database()
            .cache_freshness(Duration::ZERO)
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_out_of_range_relevance() {
        for value in [-0.1, 1.5, f64::NAN] {
            let result = CoreConfig::builder()
                .in_memory_database()
                .min_relevance(value)
                .build();
            assert!(matches!(result, Err(Error::Config(_))), "accepted {}", value);
        }

        let edge = CoreConfig::builder()
            .in_memory_database()
            .min_relevance(1.0)
            .build();
        assert!(edge.is_ok());
    }

    #[test]
    fn test_rejects_zero_limits() {
        let no_results = CoreConfig::builder()
            .in_memory_database()
            .max_search_results(0)
            .build();
        assert!(matches!(no_results, Err(Error::Config(_))));

        let no_buffer = CoreConfig::builder()
            .in_memory_database()
            .event_buffer_size(0)
            .build();
        assert!(matches!(no_buffer, Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_scanner_is_capability_error() {
        let config = CoreConfig::builder().in_memory_database().build().unwrap();

        match config.require_media_scanner() {
            Err(Error::CapabilityMissing { capability, .. }) => {
                assert_eq!(capability, "MediaScanner")
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("scanner should be missing"),
        }
    }

    #[test]
    fn test_debug_hides_capabilities() {
        let config = CoreConfig::builder()
            .in_memory_database()
            .media_scanner(Arc::new(NoopScanner))
            .build()
            .unwrap();

        let debug = format!("{:?}", config);
        assert!(debug.contains("MediaScanner { ... }"));
        assert!(debug.contains("InMemory"));
    }
}
