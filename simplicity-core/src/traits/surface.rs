//! Display toolkit seam.

use crate::layout::{Color, Rect, TextStyle};

/// Errors the display toolkit can report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SurfaceError {
    /// No free region slots
    OutOfRegions,
    /// Handle does not name a live region
    InvalidRegion,
    /// Text exceeds what the region can hold
    TextTooLong,
    /// Hardware or communication failure
    Panel,
}

/// Opaque handle to a created region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegionHandle(pub u8);

/// Trait for the display toolkit
///
/// A region is an independently positioned, styled area that renders a
/// string. The surface copies text on `set_text`; callers keep ownership of
/// their buffers and push again whenever the content changes.
pub trait RegionSurface {
    /// Register a region with the given bounds
    fn create_region(&mut self, bounds: Rect) -> Result<RegionHandle, SurfaceError>;

    /// Set color, background, font and alignment of a region
    fn set_style(&mut self, region: RegionHandle, style: &TextStyle) -> Result<(), SurfaceError>;

    /// Replace the text a region renders
    fn set_text(&mut self, region: RegionHandle, text: &str) -> Result<(), SurfaceError>;

    /// Flood-fill a region with a solid color (decorative separators)
    fn fill(&mut self, region: RegionHandle, color: Color) -> Result<(), SurfaceError>;

    /// Destroy a region; its handle must not be used again
    fn destroy_region(&mut self, region: RegionHandle) -> Result<(), SurfaceError>;
}
