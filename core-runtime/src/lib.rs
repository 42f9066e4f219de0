//! # Core Runtime Module
//!
//! Runtime infrastructure shared by the library crates:
//! - Logging and tracing setup
//! - Engine configuration
//! - Library event bus
//!
//! ## Overview
//!
//! Nothing here knows about tracks or storage. The crate fixes the logging
//! conventions, the validated configuration, and the broadcast channel that
//! the engine publishes its events on.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{CoreConfig, CoreConfigBuilder, DatabaseLocation};
pub use error::{Error, Result};
pub use events::{EventBus, EventSeverity, EventStream, LibraryEvent};
