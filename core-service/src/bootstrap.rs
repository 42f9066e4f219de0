//! Wiring a ready engine from a [`CoreConfig`].

use crate::commands::{CommandOutcome, LibraryCommand};
use crate::engine::LibraryEngine;
use crate::error::{CoreError, Result};
use core_library::db::{create_pool, DatabaseConfig};
use core_library::SqliteTrackStore;
use core_runtime::config::{CoreConfig, DatabaseLocation};
use std::sync::Arc;
use tracing::info;

/// Open the configured database, build the SQLite store and return an
/// engine whose library has already been loaded.
///
/// # Errors
///
/// Returns an error if the pool or its migrations fail, or if the initial
/// load fails.
pub async fn bootstrap(config: CoreConfig) -> Result<LibraryEngine> {
    let database = match &config.database {
        DatabaseLocation::File(path) => DatabaseConfig::new(path.clone()),
        DatabaseLocation::InMemory => DatabaseConfig::in_memory(),
    };

    let pool = create_pool(database).await?;
    let engine = LibraryEngine::new(Arc::new(SqliteTrackStore::new(pool)), &config);

    if let CommandOutcome::Failed { message, .. } =
        engine.dispatch(LibraryCommand::InitializeLibrary).await
    {
        return Err(CoreError::InitializationFailed(message));
    }

    info!(
        tracks = engine.statistics().total_tracks,
        "Library engine ready"
    );
    Ok(engine)
}
