//! Board-agnostic logic for the Simplicity Weather watchface
//!
//! This crate contains everything that does not depend on a concrete panel,
//! transport or runtime:
//!
//! - Clock rendering (date/time text into fixed-capacity buffers)
//! - Weather sync engine (mirror of the companion's key/value state)
//! - Lifecycle controller (load, tick/message dispatch, unload)
//! - Region layout constants for the 144x168 face
//! - Collaborator traits for the display toolkit and companion transport
//!
//! The host event loop is expected to be single-threaded and cooperative:
//! exactly one handler runs at a time, to completion. That dispatch model is
//! the whole concurrency discipline; nothing in here locks.

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod layout;
pub mod sync;
pub mod traits;
pub mod watchface;

pub use clock::{ClockStyle, ClockText, Month, WallTime};
pub use sync::{Applied, SyncError, WeatherSync};
pub use watchface::{FaceError, Phase, Watchface, PLACEHOLDER_CITY, PLACEHOLDER_TEMPERATURE};
