//! Embassy tasks
//!
//! One task per peripheral concern; the watchface handlers themselves run in
//! the `main` event loop, one at a time.

pub mod companion_rx;
pub mod companion_tx;
pub mod tick;
