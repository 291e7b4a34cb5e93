//! LS013B7DH03 Sharp memory LCD driver
//!
//! 144x168 1-bit memory-in-pixel panel over SPI, written one 18-byte line at
//! a time. The panel latches whole lines, so the driver keeps a framebuffer
//! with per-line dirty tracking and only sends lines that changed.
//!
//! Quirks worth knowing:
//! - chip select is active HIGH, unlike almost every other SPI device
//! - the panel shifts bits LSB-first; command and address bytes are
//!   bit-reversed before transmission, and the framebuffer stores pixel
//!   bytes in wire order (leftmost pixel in the least significant bit)
//! - the VCOM polarity bit must keep toggling to DC-balance the liquid
//!   crystal, so flush the panel periodically even when nothing changed

use embassy_rp::gpio::Output;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::Pixel;
use embedded_hal_async::spi::SpiBus;

/// Panel dimensions
pub const WIDTH: usize = 144;
pub const HEIGHT: usize = 168;

/// Bytes per line (1 bit per pixel)
const LINE_BYTES: usize = WIDTH / 8;

// Mode bits, before bit reversal
const MODE_UPDATE: u8 = 0x01;
const MODE_VCOM: u8 = 0x02;
const MODE_CLEAR: u8 = 0x04;

/// LS013B7DH03 driver
pub struct Ls013b7dh03<SPI> {
    spi: SPI,
    cs: Output<'static>,
    /// Frame buffer in wire order; bit 1 = white, 0 = black
    buffer: [[u8; LINE_BYTES]; HEIGHT],
    dirty: [bool; HEIGHT],
    vcom: bool,
}

impl<SPI> Ls013b7dh03<SPI>
where
    SPI: SpiBus,
{
    /// Create a new driver with an all-black framebuffer
    pub fn new(spi: SPI, cs: Output<'static>) -> Self {
        Self {
            spi,
            cs,
            buffer: [[0; LINE_BYTES]; HEIGHT],
            dirty: [true; HEIGHT],
            vcom: false,
        }
    }

    /// Clear the panel
    ///
    /// The hardware clear drives every pixel white; the framebuffer is
    /// reset to all black and marked dirty so the next flush paints the
    /// face background.
    pub async fn clear(&mut self) -> Result<(), SPI::Error> {
        self.buffer = [[0; LINE_BYTES]; HEIGHT];
        self.dirty = [true; HEIGHT];

        self.cs.set_high();
        let result = self
            .spi
            .write(&[(MODE_CLEAR | self.vcom_bit()).reverse_bits(), 0x00])
            .await;
        self.cs.set_low();
        self.vcom = !self.vcom;
        result
    }

    /// Send every dirty line to the panel and toggle VCOM
    ///
    /// With no dirty lines this degenerates to the bare VCOM maintenance
    /// command, so it is safe to call on every event.
    pub async fn flush(&mut self) -> Result<(), SPI::Error> {
        let vcom = self.vcom_bit();
        self.vcom = !self.vcom;

        self.cs.set_high();
        let result = if self.dirty.iter().any(|&line| line) {
            self.write_lines(vcom).await
        } else {
            self.spi.write(&[vcom.reverse_bits(), 0x00]).await
        };
        self.cs.set_low();

        if result.is_ok() {
            self.dirty = [false; HEIGHT];
        }
        result
    }

    async fn write_lines(&mut self, vcom: u8) -> Result<(), SPI::Error> {
        self.spi.write(&[(MODE_UPDATE | vcom).reverse_bits()]).await?;

        for line in 0..HEIGHT {
            if !self.dirty[line] {
                continue;
            }
            // Line address is 1-based and shifted out LSB-first
            let mut packet = [0u8; 1 + LINE_BYTES + 1];
            packet[0] = (line as u8 + 1).reverse_bits();
            packet[1..1 + LINE_BYTES].copy_from_slice(&self.buffer[line]);
            self.spi.write(&packet).await?;
        }

        // Transfer trailer
        self.spi.write(&[0x00]).await
    }

    fn vcom_bit(&self) -> u8 {
        if self.vcom {
            MODE_VCOM
        } else {
            0
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, lit: bool) {
        let byte = &mut self.buffer[y][x / 8];
        let mask = 1 << (x % 8);
        let before = *byte;
        if lit {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
        if *byte != before {
            self.dirty[y] = true;
        }
    }
}

impl<SPI> OriginDimensions for Ls013b7dh03<SPI> {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl<SPI> DrawTarget for Ls013b7dh03<SPI>
where
    SPI: SpiBus,
{
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if (0..WIDTH as i32).contains(&point.x) && (0..HEIGHT as i32).contains(&point.y) {
                self.set_pixel(point.x as usize, point.y as usize, color.is_on());
            }
        }
        Ok(())
    }
}
