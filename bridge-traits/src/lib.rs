//! # Host Bridge Traits
//!
//! Capability contracts the library engine consumes from its host.
//!
//! ## Overview
//!
//! The engine never touches the file system, the wall clock or the host
//! logging pipeline directly. Each of those is expressed here as a trait the
//! host implements and injects at bootstrap.
//!
//! ## Traits
//!
//! ### Import
//! - [`MediaScanner`](scanner::MediaScanner) - Turns file-system paths into
//!   [`ScannedTrack`](scanner::ScannedTrack) records with tags already extracted
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Host
//! implementations should convert platform errors into it and keep the
//! offending path in the message, since the engine surfaces that text to the
//! user as-is.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so a single implementation can be
//! shared between the engine and background tasks.

pub mod error;
pub mod scanner;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use scanner::{MediaScanner, ScannedTrack};
pub use time::{Clock, ConsoleLogger, LogEntry, LogLevel, LoggerSink, ManualClock, SystemClock};
