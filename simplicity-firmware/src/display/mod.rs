//! Panel-side implementation of the display toolkit
//!
//! [`PanelSurface`] composites the face's text regions onto any
//! embedded-graphics draw target. The core describes regions in abstract
//! face terms (bounds, color, font token, alignment); this module maps them
//! to concrete mono fonts and `BinaryColor` drawing.
//!
//! The panel is 1-bit with a black face background, so `Color::Black` and
//! `Color::Clear` both resolve to unlit pixels.

pub mod ls013b7dh03;

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10, FONT_9X18};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment as TextAlignment, Baseline, Text, TextStyleBuilder};

use simplicity_core::layout::{Alignment, Color, FontToken, Rect, TextStyle};
use simplicity_core::traits::surface::{RegionHandle, RegionSurface, SurfaceError};

/// Maximum number of live regions
const MAX_REGIONS: usize = 8;

/// Style a region starts with before the face configures it
const DEFAULT_STYLE: TextStyle = TextStyle {
    color: Color::White,
    background: Color::Clear,
    font: FontToken::SmallLabel,
    align: Alignment::Left,
};

#[derive(Debug, Clone, Copy)]
struct Region {
    bounds: Rect,
    style: TextStyle,
}

/// Region compositor over an embedded-graphics panel
pub struct PanelSurface<D> {
    panel: D,
    regions: [Option<Region>; MAX_REGIONS],
}

impl<D> PanelSurface<D>
where
    D: DrawTarget<Color = BinaryColor>,
{
    pub fn new(panel: D) -> Self {
        Self {
            panel,
            regions: [None; MAX_REGIONS],
        }
    }

    /// Access the underlying panel (for flushing after each event)
    pub fn panel_mut(&mut self) -> &mut D {
        &mut self.panel
    }

    fn region(&self, handle: RegionHandle) -> Result<Region, SurfaceError> {
        self.regions
            .get(handle.0 as usize)
            .copied()
            .flatten()
            .ok_or(SurfaceError::InvalidRegion)
    }

    fn paint(&mut self, bounds: Rect, color: BinaryColor) -> Result<(), SurfaceError> {
        Rectangle::new(
            Point::new(bounds.x as i32, bounds.y as i32),
            Size::new(bounds.width as u32, bounds.height as u32),
        )
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(&mut self.panel)
        .map_err(|_| SurfaceError::Panel)
    }
}

// The face's type ramp, approximated with the panel's mono fonts. The time
// numerals are nowhere near 49px, but FONT_10X20 is the largest face
// embedded-graphics ships without custom font data.
fn font(token: FontToken) -> &'static MonoFont<'static> {
    match token {
        FontToken::CondensedLarge => &FONT_9X18,
        FontToken::BoldNumerals => &FONT_10X20,
        FontToken::SmallLabel => &FONT_6X10,
    }
}

fn pixel(color: Color) -> BinaryColor {
    match color {
        Color::White => BinaryColor::On,
        Color::Black | Color::Clear => BinaryColor::Off,
    }
}

impl<D> RegionSurface for PanelSurface<D>
where
    D: DrawTarget<Color = BinaryColor>,
{
    fn create_region(&mut self, bounds: Rect) -> Result<RegionHandle, SurfaceError> {
        let slot = self
            .regions
            .iter()
            .position(|r| r.is_none())
            .ok_or(SurfaceError::OutOfRegions)?;
        self.regions[slot] = Some(Region {
            bounds,
            style: DEFAULT_STYLE,
        });
        Ok(RegionHandle(slot as u8))
    }

    fn set_style(&mut self, region: RegionHandle, style: &TextStyle) -> Result<(), SurfaceError> {
        match self.regions.get_mut(region.0 as usize) {
            Some(Some(slot)) => {
                slot.style = *style;
                Ok(())
            }
            _ => Err(SurfaceError::InvalidRegion),
        }
    }

    fn set_text(&mut self, region: RegionHandle, text: &str) -> Result<(), SurfaceError> {
        let Region { bounds, style } = self.region(region)?;

        // Erase the previous text, then draw anchored per alignment
        self.paint(bounds, pixel(style.background))?;

        let (x, align) = match style.align {
            Alignment::Left => (bounds.x as i32, TextAlignment::Left),
            Alignment::Right => ((bounds.x + bounds.width) as i32, TextAlignment::Right),
        };
        let character_style = MonoTextStyle::new(font(style.font), pixel(style.color));
        let text_style = TextStyleBuilder::new()
            .alignment(align)
            .baseline(Baseline::Top)
            .build();

        Text::with_text_style(text, Point::new(x, bounds.y as i32), character_style, text_style)
            .draw(&mut self.panel)
            .map_err(|_| SurfaceError::Panel)?;
        Ok(())
    }

    fn fill(&mut self, region: RegionHandle, color: Color) -> Result<(), SurfaceError> {
        let Region { bounds, .. } = self.region(region)?;
        self.paint(bounds, pixel(color))
    }

    fn destroy_region(&mut self, region: RegionHandle) -> Result<(), SurfaceError> {
        let Region { bounds, style } = self.region(region)?;
        // Leave nothing stale on screen
        self.paint(bounds, pixel(style.background))?;
        self.regions[region.0 as usize] = None;
        Ok(())
    }
}
