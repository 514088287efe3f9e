//! Monochrome framebuffer
//!
//! The canvas is drawn in landscape (250x122). The panel itself scans in
//! portrait (122x250), so `panel_buffer` rotates the image 90 degrees
//! counter-clockwise while packing it.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

/// Canvas width in pixels (landscape)
pub const WIDTH: usize = 250;

/// Canvas height in pixels (landscape)
pub const HEIGHT: usize = 122;

/// Bytes per canvas row
const STRIDE: usize = WIDTH.div_ceil(8);

/// Bytes per panel row (portrait, 122 pixels rounded up)
const PANEL_STRIDE: usize = HEIGHT.div_ceil(8);

/// Size of a packed panel buffer
pub const PANEL_BUFFER_LEN: usize = PANEL_STRIDE * WIDTH;

/// Packed 1bpp buffer in panel order (set bit = white)
pub type PanelBuffer = [u8; PANEL_BUFFER_LEN];

/// Landscape framebuffer, 1 bit per pixel (set bit = black ink)
#[derive(Clone)]
pub struct Canvas {
    pixels: [u8; STRIDE * HEIGHT],
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create a blank (white) canvas
    pub const fn new() -> Self {
        Self {
            pixels: [0; STRIDE * HEIGHT],
        }
    }

    /// Blank the canvas
    pub fn clear_white(&mut self) {
        self.pixels.fill(0);
    }

    /// Check whether the pixel at (x, y) is black
    ///
    /// Out-of-bounds coordinates read as white.
    pub fn is_black(&self, x: usize, y: usize) -> bool {
        if x >= WIDTH || y >= HEIGHT {
            return false;
        }
        self.pixels[y * STRIDE + x / 8] & (0x80 >> (x % 8)) != 0
    }

    fn set(&mut self, x: usize, y: usize, black: bool) {
        let idx = y * STRIDE + x / 8;
        let mask = 0x80 >> (x % 8);
        if black {
            self.pixels[idx] |= mask;
        } else {
            self.pixels[idx] &= !mask;
        }
    }

    /// Number of black pixels (used by tests and frame diagnostics)
    pub fn ink_count(&self) -> usize {
        self.pixels.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Convert the canvas into the panel's native buffer layout
    pub fn panel_buffer(&self) -> PanelBuffer {
        let mut buffer = [0xFF; PANEL_BUFFER_LEN];

        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                if self.is_black(x, y) {
                    // Rotate CCW: landscape (x, y) -> portrait (y, WIDTH-1-x)
                    let px = y;
                    let py = WIDTH - 1 - x;
                    buffer[py * PANEL_STRIDE + px / 8] &= !(0x80 >> (px % 8));
                }
            }
        }

        buffer
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for Canvas {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as usize, point.y as usize);
            if x < WIDTH && y < HEIGHT {
                self.set(x, y, color.is_on());
            }
        }
        Ok(())
    }
}
