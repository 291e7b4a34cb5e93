//! Collaborator seams
//!
//! The watchface core drives two external black boxes: a display toolkit
//! that composites text regions onto the panel, and a transport that carries
//! datagrams to and from the companion device. These traits are the whole
//! interface the core needs from either.

pub mod link;
pub mod surface;

pub use link::{CompanionLink, LinkError};
pub use surface::{RegionHandle, RegionSurface, SurfaceError};
