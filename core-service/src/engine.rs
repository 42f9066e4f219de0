//! # Library Engine
//!
//! The only stateful component of the library core. It owns the cached
//! repository, processes commands one at a time in arrival order, and
//! publishes a new [`LibraryState`] snapshot plus exactly one
//! [`LibraryEvent`] per command.
//!
//! ## Command pipeline
//!
//! 1. Perform the command's I/O against the repository (or the search engine)
//! 2. Embed the outcome in an [`Action`] and run the pure [`reduce`]
//! 3. Replace the published state
//! 4. Emit the event describing the outcome
//!
//! Errors never leave [`LibraryEngine::dispatch`]. A failed command leaves the
//! state as it was and emits `LibraryOperationFailed` instead.
//!
//! ## Subscribing
//!
//! ```ignore
//! let mut states = engine.subscribe_state();   // latest snapshot replayed
//! let mut events = engine.subscribe_events();  // future events only
//!
//! engine.dispatch(LibraryCommand::InitializeLibrary).await;
//! states.changed().await?;
//! let snapshot = states.borrow().clone();
//! ```

use crate::commands::{CommandOutcome, LibraryCommand};
use crate::error::{CoreError, Result};
use crate::reducer::{reduce, Action};
use crate::state::LibraryState;
use bridge_traits::{Clock, MediaScanner, ScannedTrack};
use core_library::{
    search, CachedTrackRepository, LibraryError, LibraryStatistics, SearchOptions,
    SearchResultItem, Track, TrackStore,
};
use core_runtime::config::{media_scanner_missing_error, CoreConfig};
use core_runtime::events::{EventBus, EventStream, LibraryEvent, Receiver};
use core_runtime::logging::strip_path;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, instrument, warn};

/// What a successful command produces.
struct Step {
    state: LibraryState,
    event: LibraryEvent,
    outcome: CommandOutcome,
}

impl Step {
    fn applied(state: LibraryState, event: LibraryEvent) -> Self {
        Self {
            state,
            event,
            outcome: CommandOutcome::Applied,
        }
    }
}

/// Single-writer library engine.
///
/// Share it behind an `Arc`; every method takes `&self`.
pub struct LibraryEngine {
    repository: Mutex<CachedTrackRepository>,
    state: watch::Sender<Arc<LibraryState>>,
    events: EventBus,
    scanner: Option<Arc<dyn MediaScanner>>,
    clock: Arc<dyn Clock>,
    search_options: SearchOptions,
}

impl LibraryEngine {
    /// Create an engine over `store` with an empty initial state.
    pub fn new(store: Arc<dyn TrackStore>, config: &CoreConfig) -> Self {
        let repository = CachedTrackRepository::with_freshness(
            store,
            Arc::clone(&config.clock),
            config.cache_freshness,
        );

        let mut search_options = SearchOptions::default()
            .with_min_relevance(config.min_relevance)
            .with_fuzzy(config.fuzzy_matching);
        if let Some(limit) = config.max_search_results {
            search_options = search_options.with_limit(limit);
        }

        let (state, _) = watch::channel(Arc::new(LibraryState::default()));

        Self {
            repository: Mutex::new(repository),
            state,
            events: EventBus::new(config.event_buffer_size),
            scanner: config.media_scanner.clone(),
            clock: Arc::clone(&config.clock),
            search_options,
        }
    }

    // ------------------------------------------------------------------
    // Published interface
    // ------------------------------------------------------------------

    /// Last published snapshot.
    pub fn state(&self) -> Arc<LibraryState> {
        Arc::clone(&self.state.borrow())
    }

    /// State stream; a new receiver sees the latest snapshot immediately.
    pub fn subscribe_state(&self) -> watch::Receiver<Arc<LibraryState>> {
        self.state.subscribe()
    }

    /// Event stream; past events are not replayed.
    pub fn subscribe_events(&self) -> Receiver<LibraryEvent> {
        self.events.subscribe()
    }

    pub fn event_stream(&self) -> EventStream {
        EventStream::new(self.events.subscribe())
    }

    pub fn tracks(&self) -> Arc<Vec<Track>> {
        Arc::clone(&self.state().tracks)
    }

    pub fn favorites(&self) -> Arc<Vec<Track>> {
        Arc::clone(&self.state().favorites)
    }

    pub fn statistics(&self) -> LibraryStatistics {
        self.state().statistics
    }

    pub fn is_favorite(&self, path: &str) -> bool {
        self.state().is_favorite(path)
    }

    pub fn search_hint(&self, path: &str) -> Option<SearchResultItem> {
        self.state().search_hint(path).cloned()
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Process one command to completion.
    ///
    /// Commands queue on the repository lock, so a command starts only
    /// after the previous one has published its state and event.
    #[instrument(skip(self, command), fields(command = command.name()))]
    pub async fn dispatch(&self, command: LibraryCommand) -> CommandOutcome {
        let mut repository = self.repository.lock().await;
        let operation = command.name();

        match self.execute(&mut repository, command).await {
            Ok(step) => {
                self.publish(step.state);
                self.emit(step.event);
                step.outcome
            }
            Err(error) => self.fail(operation, error),
        }
    }

    /// Scan `paths` with the configured [`MediaScanner`] and save every
    /// record it returns, one `SaveTrack` command each.
    #[instrument(skip(self, paths), fields(paths = paths.len()))]
    pub async fn import(&self, paths: Vec<PathBuf>) -> CommandOutcome {
        let scanned = match self.scan(&paths).await {
            Ok(scanned) => scanned,
            Err(error) => {
                let _repository = self.repository.lock().await;
                return self.fail("import", error);
            }
        };

        let mut saved = 0;
        let mut failed = 0;
        for record in scanned {
            let outcome = self
                .dispatch(LibraryCommand::SaveTrack(Track::from(record)))
                .await;
            if outcome.is_failure() {
                failed += 1;
            } else {
                saved += 1;
            }
        }

        info!(saved, failed, "Import finished");
        CommandOutcome::Imported { saved, failed }
    }

    async fn scan(&self, paths: &[PathBuf]) -> Result<Vec<ScannedTrack>> {
        if paths.is_empty() {
            let error = LibraryError::invalid_input("paths", "Select at least one file to import");
            return Err(error.into());
        }

        let scanner = self.scanner.as_ref().ok_or_else(media_scanner_missing_error)?;
        let scanned = scanner.scan(paths).await.map_err(LibraryError::from)?;

        debug!(records = scanned.len(), "Scan complete");
        Ok(scanned)
    }

    async fn execute(
        &self,
        repository: &mut CachedTrackRepository,
        command: LibraryCommand,
    ) -> Result<Step> {
        let current = self.state();

        match command {
            LibraryCommand::InitializeLibrary => self.load(repository).await,

            LibraryCommand::RefreshLibrary => {
                repository.invalidate();
                self.load(repository).await
            }

            LibraryCommand::SaveTrack(track) => {
                // The store keeps the first timestamp of a path on resave
                let track = track
                    .normalized()
                    .with_added_at(self.clock.now().timestamp_millis());
                track
                    .validate()
                    .map_err(|msg| LibraryError::invalid_input("track", msg))?;
                repository.save(&track).await?;

                debug!(file = %strip_path(&track.path), "Track saved");
                let event = LibraryEvent::TrackSaved {
                    path: track.path.clone(),
                    title: track.title.clone(),
                };
                let state = self.rerun_search(reduce(&current, Action::TrackSaved(track)));
                Ok(Step::applied(state, event))
            }

            LibraryCommand::RemoveTrack { path } => {
                repository.delete(&path).await?;

                debug!(file = %strip_path(&path), "Track removed");
                let state = reduce(&current, Action::TrackRemoved { path: path.clone() });
                Ok(Step::applied(state, LibraryEvent::TrackRemoved { path }))
            }

            LibraryCommand::ClearLibrary => {
                repository.clear_all().await?;

                info!("Library cleared");
                let state = reduce(&current, Action::LibraryCleared);
                Ok(Step::applied(state, LibraryEvent::LibraryCleared))
            }

            LibraryCommand::ToggleFavorite { path } => {
                let stored = repository.get_favorites().await?;
                let favorite = !stored.iter().any(|t| t.path == path);
                repository.update_favorite(&path, favorite).await?;

                let state = reduce(
                    &current,
                    Action::FavoriteSet {
                        path: path.clone(),
                        favorite,
                    },
                );
                let event = LibraryEvent::FavoriteToggled {
                    path,
                    is_favorite: favorite,
                };
                Ok(Step::applied(state, event))
            }

            LibraryCommand::Search { query } => {
                let query = query.trim();
                if query.is_empty() {
                    return Ok(self.clear_search(&current));
                }

                let corpus = repository.get_all_tracks().await?;
                let results = search(&corpus, query, &self.search_options);

                debug!(query, results = results.len(), "Search completed");
                let event = LibraryEvent::SearchResultsUpdated {
                    query: query.to_string(),
                    result_count: results.len(),
                };
                let state = reduce(
                    &current,
                    Action::SearchCompleted {
                        query: query.to_string(),
                        results,
                    },
                );
                Ok(Step::applied(state, event))
            }

            LibraryCommand::ClearSearch => Ok(self.clear_search(&current)),

            LibraryCommand::StartSelection(track) => {
                Ok(selection_step(&current, Action::SelectionStarted(track)))
            }

            LibraryCommand::ToggleSelection(track) => {
                Ok(selection_step(&current, Action::SelectionToggled(track)))
            }

            LibraryCommand::SelectAll => Ok(selection_step(&current, Action::AllSelected)),

            LibraryCommand::DeselectAll => Ok(selection_step(&current, Action::AllDeselected)),

            LibraryCommand::FinishSelection => {
                let selected = current.selected_tracks().to_vec();
                let mut step = selection_step(&current, Action::SelectionFinished);
                step.outcome = CommandOutcome::SelectionFinished(selected);
                Ok(step)
            }
        }
    }

    async fn load(&self, repository: &mut CachedTrackRepository) -> Result<Step> {
        self.publish(reduce(&self.state(), Action::LoadStarted));

        let tracks = repository.get_all_tracks().await?;
        let favorites = repository.get_favorites().await?;

        let state = self.rerun_search(reduce(
            &self.state(),
            Action::LibraryLoaded { tracks, favorites },
        ));

        info!(
            tracks = state.tracks.len(),
            favorites = state.favorites.len(),
            "Library loaded"
        );
        let event = LibraryEvent::LibraryLoaded {
            track_count: state.tracks.len(),
            favorite_count: state.favorites.len(),
        };
        Ok(Step::applied(state, event))
    }

    /// Bring the results of an active query in line with a changed library.
    fn rerun_search(&self, state: LibraryState) -> LibraryState {
        if !state.has_active_search() {
            return state;
        }

        let results = search(&state.tracks, &state.search_query, &self.search_options);
        let query = state.search_query.clone();
        reduce(&state, Action::SearchCompleted { query, results })
    }

    fn clear_search(&self, current: &LibraryState) -> Step {
        let event = LibraryEvent::SearchResultsUpdated {
            query: String::new(),
            result_count: 0,
        };
        Step::applied(reduce(current, Action::SearchCleared), event)
    }

    fn fail(&self, operation: &str, error: CoreError) -> CommandOutcome {
        let kind = error.kind();
        warn!(operation, kind = kind.as_str(), error = %error, "Library command failed");

        let current = self.state();
        if current.is_loading {
            self.publish(reduce(&current, Action::OperationFailed));
        }

        let message = kind.user_message().to_string();
        self.emit(LibraryEvent::LibraryOperationFailed {
            operation: operation.to_string(),
            error_kind: kind.as_str().to_string(),
            message: message.clone(),
            cause: error.to_string(),
        });

        CommandOutcome::Failed { kind, message }
    }

    fn publish(&self, state: LibraryState) {
        self.state.send_replace(Arc::new(state));
    }

    fn emit(&self, event: LibraryEvent) {
        debug!(event = event.description(), "Emitting library event");
        // No subscribers is not an error for the engine
        self.events.emit(event).ok();
    }
}

fn selection_step(current: &LibraryState, action: Action) -> Step {
    let state = reduce(current, action);
    let event = LibraryEvent::SelectionChanged {
        selected_count: state.selection.len(),
        is_selecting: state.is_selecting(),
    };
    Step::applied(state, event)
}
