//! Workspace placeholder crate.
//!
//! Host applications depend on `tunes-workspace` to pull in the library
//! engine without wiring each workspace crate individually. Everything lives
//! in [`core_service`], re-exported here.

pub use core_service::*;
