//! # Event Bus System
//!
//! Broadcasts library domain events to any number of subscribers over
//! `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! - **[`LibraryEvent`]**: one closed enum describing every outcome the engine reports
//! - **[`EventBus`]**: broadcast channel the engine publishes on
//! - **[`EventStream`]**: receiver wrapper with optional filtering
//!
//! Events are fire-and-forget. A subscriber only sees events emitted after it
//! subscribed, and every subscriber sees every event in emission order.
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{EventBus, LibraryEvent};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let bus = EventBus::new(100);
//! let mut subscriber = bus.subscribe();
//!
//! bus.emit(LibraryEvent::LibraryCleared).ok();
//!
//! let event = subscriber.recv().await.unwrap();
//! assert_eq!(event, LibraryEvent::LibraryCleared);
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: the subscriber fell behind and missed `n` events.
//!   It can keep receiving newer events.
//! - **`RecvError::Closed`**: every sender was dropped; treat it as shutdown.
//!
//! `emit` fails only when nobody is subscribed, which publishers ignore with `.ok()`.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
///
/// Subscribers that can't keep up will receive `RecvError::Lagged`.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Library Events
// ============================================================================

/// Outcome of a single library command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum LibraryEvent {
    /// The library was read from storage (initial load or refresh).
    LibraryLoaded {
        track_count: usize,
        favorite_count: usize,
    },
    /// A track was inserted or replaced.
    TrackSaved {
        /// Storage path of the track.
        path: String,
        title: String,
    },
    /// A track was deleted.
    TrackRemoved { path: String },
    /// Every track was deleted.
    LibraryCleared,
    /// A track's favorite flag changed.
    FavoriteToggled { path: String, is_favorite: bool },
    /// A search ran or was cleared (an empty query means cleared).
    SearchResultsUpdated { query: String, result_count: usize },
    /// The multi-select set changed.
    SelectionChanged {
        selected_count: usize,
        is_selecting: bool,
    },
    /// A command failed. State was left unchanged.
    LibraryOperationFailed {
        /// Command that failed (e.g., "toggle_favorite").
        operation: String,
        /// Error classification label (e.g., "not_found").
        error_kind: String,
        /// Message suitable for showing to the user.
        message: String,
        /// Underlying error, for logs.
        cause: String,
    },
}

impl LibraryEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            LibraryEvent::LibraryLoaded { .. } => "Library loaded",
            LibraryEvent::TrackSaved { .. } => "Track saved to library",
            LibraryEvent::TrackRemoved { .. } => "Track removed from library",
            LibraryEvent::LibraryCleared => "Library cleared",
            LibraryEvent::FavoriteToggled { .. } => "Favorite status changed",
            LibraryEvent::SearchResultsUpdated { .. } => "Search results updated",
            LibraryEvent::SelectionChanged { .. } => "Selection changed",
            LibraryEvent::LibraryOperationFailed { .. } => "Library operation failed",
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            LibraryEvent::LibraryOperationFailed { .. } => EventSeverity::Error,
            LibraryEvent::LibraryLoaded { .. } | LibraryEvent::LibraryCleared => {
                EventSeverity::Info
            }
            _ => EventSeverity::Debug,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, LibraryEvent::LibraryOperationFailed { .. })
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    /// Debug-level events (verbose)
    Debug,
    /// Informational events
    Info,
    /// Warning events
    Warning,
    /// Error events
    Error,
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central broadcast channel for library events.
///
/// Cloning the bus yields another handle to the same channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<LibraryEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of events to buffer per subscriber.
    ///   When a subscriber falls behind by more than this amount, it will
    ///   receive a `RecvError::Lagged` error.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero; `CoreConfig` rejects that value upfront.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error if there are no active subscribers.
    pub fn emit(&self, event: LibraryEvent) -> Result<usize, SendError<LibraryEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<LibraryEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&LibraryEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with optional filtering.
///
/// ```rust
/// use core_runtime::events::{EventBus, EventStream, LibraryEvent};
///
/// let bus = EventBus::new(100);
/// let failures = EventStream::new(bus.subscribe()).filter(LibraryEvent::is_failure);
/// ```
pub struct EventStream {
    receiver: Receiver<LibraryEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<LibraryEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` will be returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&LibraryEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &LibraryEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next event that passes the filter.
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n` events.
    /// Returns `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<LibraryEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without waiting.
    ///
    /// Returns `None` if no matching event is currently available.
    pub fn try_recv(&mut self) -> Option<Result<LibraryEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn saved(path: &str) -> LibraryEvent {
        LibraryEvent::TrackSaved {
            path: path.to_string(),
            title: "Test Track".to_string(),
        }
    }

    fn failure() -> LibraryEvent {
        LibraryEvent::LibraryOperationFailed {
            operation: "toggle_favorite".to_string(),
            error_kind: "not_found".to_string(),
            message: "That track is no longer in your library.".to_string(),
            cause: "Not found: track with id /missing.mp3".to_string(),
        }
    }

    #[tokio::test]
    async fn test_event_bus_subscription() {
        let bus = EventBus::new(10);
        assert_eq!(bus.subscriber_count(), 0);

        let _sub1 = bus.subscribe();
        let _sub2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[tokio::test]
    async fn test_event_emission_no_subscribers() {
        let bus = EventBus::new(10);
        assert!(bus.emit(LibraryEvent::LibraryCleared).is_err());
    }

    #[tokio::test]
    async fn test_multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut sub1 = bus.subscribe();
        let mut sub2 = bus.subscribe();

        let event = saved("/music/a.mp3");
        assert_eq!(bus.emit(event.clone()).unwrap(), 2);

        assert_eq!(sub1.recv().await.unwrap(), event);
        assert_eq!(sub2.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_events_arrive_in_emission_order() {
        let bus = EventBus::new(10);
        let mut sub = bus.subscribe();

        bus.emit(saved("/1.mp3")).ok();
        bus.emit(saved("/2.mp3")).ok();
        bus.emit(LibraryEvent::LibraryCleared).ok();

        assert_eq!(sub.recv().await.unwrap(), saved("/1.mp3"));
        assert_eq!(sub.recv().await.unwrap(), saved("/2.mp3"));
        assert_eq!(sub.recv().await.unwrap(), LibraryEvent::LibraryCleared);
    }

    #[tokio::test]
    async fn test_late_subscriber_misses_past_events() {
        let bus = EventBus::new(10);
        let _early = bus.subscribe();
        bus.emit(LibraryEvent::LibraryCleared).ok();

        let mut late = EventStream::new(bus.subscribe());
        assert!(late.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_event_stream_with_filter() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe()).filter(LibraryEvent::is_failure);

        bus.emit(saved("/a.mp3")).ok();
        bus.emit(failure()).ok();

        assert_eq!(stream.recv().await.unwrap(), failure());
        assert!(stream.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_lagged_subscriber() {
        let bus = EventBus::new(2);
        let mut sub = bus.subscribe();

        for i in 0..5 {
            bus.emit(saved(&format!("/{}.mp3", i))).ok();
        }

        let result = sub.recv().await;
        assert!(matches!(result, Err(RecvError::Lagged(_))));
    }

    #[test]
    fn test_event_severity() {
        assert_eq!(failure().severity(), EventSeverity::Error);
        assert_eq!(
            LibraryEvent::LibraryLoaded {
                track_count: 3,
                favorite_count: 1
            }
            .severity(),
            EventSeverity::Info
        );
        assert_eq!(LibraryEvent::LibraryCleared.severity(), EventSeverity::Info);
        assert_eq!(saved("/a.mp3").severity(), EventSeverity::Debug);
        assert!(EventSeverity::Error > EventSeverity::Info);
    }

    #[test]
    fn test_event_description() {
        assert_eq!(
            LibraryEvent::FavoriteToggled {
                path: "/a.mp3".to_string(),
                is_favorite: true
            }
            .description(),
            "Favorite status changed"
        );
        assert_eq!(failure().description(), "Library operation failed");
    }

    #[test]
    fn test_event_serialization_is_tagged() {
        let json = serde_json::to_value(LibraryEvent::SearchResultsUpdated {
            query: "queen".to_string(),
            result_count: 2,
        })
        .unwrap();

        assert_eq!(json["event"], "SearchResultsUpdated");
        assert_eq!(json["query"], "queen");
        assert_eq!(json["result_count"], 2);

        let back: LibraryEvent = serde_json::from_value(json).unwrap();
        assert!(matches!(back, LibraryEvent::SearchResultsUpdated { result_count: 2, .. }));
    }

    #[tokio::test]
    async fn test_concurrent_publishers() {
        let bus = EventBus::new(100);
        let mut sub = bus.subscribe();

        let bus1 = bus.clone();
        let bus2 = bus.clone();

        let handle1 = tokio::spawn(async move {
            for i in 0..10 {
                bus1.emit(saved(&format!("/a/{}.mp3", i))).ok();
            }
        });
        let handle2 = tokio::spawn(async move {
            for i in 0..10 {
                bus2.emit(saved(&format!("/b/{}.mp3", i))).ok();
            }
        });

        handle1.await.unwrap();
        handle2.await.unwrap();

        let mut received = 0;
        while let Ok(event) = sub.try_recv() {
            assert!(matches!(event, LibraryEvent::TrackSaved { .. }));
            received += 1;
        }
        assert_eq!(received, 20);
    }
}
