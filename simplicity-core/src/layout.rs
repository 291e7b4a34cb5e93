//! Region layout for the 144x168 face.
//!
//! Five regions: date and time stacked over the lower half, a separator line
//! between them, temperature and city right-aligned along the top edge.
//! Positions are in face pixels; the display toolkit owns how they map onto
//! actual hardware. The weather rows never intrude on the clock area.

/// Face dimensions in pixels
pub const FACE_WIDTH: u16 = 144;
pub const FACE_HEIGHT: u16 = 168;

/// A rectangle in face coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Region colors
///
/// `Clear` means "do not paint a background"; the face behind shows through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    White,
    Black,
    Clear,
}

/// Abstract font selection
///
/// The toolkit maps these to whatever faces it ships; the core only states
/// intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FontToken {
    /// Condensed face for the date line
    CondensedLarge,
    /// Heavy numerals for the time
    BoldNumerals,
    /// Small face for the weather labels
    SmallLabel,
}

/// Horizontal text alignment within a region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Alignment {
    Left,
    Right,
}

/// Text styling for a region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextStyle {
    pub color: Color,
    pub background: Color,
    pub font: FontToken,
    pub align: Alignment,
}

/// Bounds and style of one region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegionLayout {
    pub bounds: Rect,
    pub style: TextStyle,
}

const WHITE_ON_CLEAR_LARGE: TextStyle = TextStyle {
    color: Color::White,
    background: Color::Clear,
    font: FontToken::CondensedLarge,
    align: Alignment::Left,
};

const WHITE_ON_CLEAR_SMALL_RIGHT: TextStyle = TextStyle {
    color: Color::White,
    background: Color::Clear,
    font: FontToken::SmallLabel,
    align: Alignment::Right,
};

/// Date line, middle of the face
pub const DATE_REGION: RegionLayout = RegionLayout {
    bounds: Rect::new(8, 68, FACE_WIDTH - 8, FACE_HEIGHT - 68),
    style: WHITE_ON_CLEAR_LARGE,
};

/// Time digits, lower half
pub const TIME_REGION: RegionLayout = RegionLayout {
    bounds: Rect::new(7, 92, FACE_WIDTH - 7, FACE_HEIGHT - 92),
    style: TextStyle {
        font: FontToken::BoldNumerals,
        ..WHITE_ON_CLEAR_LARGE
    },
};

/// Decorative separator between date and time, filled white
///
/// Overshoots the right edge by 3px; the toolkit clips at the face bounds.
pub const SEPARATOR_REGION: RegionLayout = RegionLayout {
    bounds: Rect::new(8, 97, 139, 2),
    style: WHITE_ON_CLEAR_LARGE,
};

/// Temperature readout, top right corner
pub const TEMPERATURE_REGION: RegionLayout = RegionLayout {
    bounds: Rect::new(103, 0, 40, 18),
    style: WHITE_ON_CLEAR_SMALL_RIGHT,
};

/// City name, right-aligned under the temperature
pub const CITY_REGION: RegionLayout = RegionLayout {
    bounds: Rect::new(1, 18, 142, 18),
    style: WHITE_ON_CLEAR_SMALL_RIGHT,
};
