/*
 *  display/traits.rs
 *
 *  hmi-panel - front panel model and bar visualizer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Drawing capability consumed by the renderer
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::pixelcolor::Rgb565;

use crate::display::error::DisplayError;

/// Minimal drawing surface - every display backend must implement this trait
///
/// The renderer never touches hardware directly; it issues these primitives
/// in a fixed order. Coordinates are panel pixels with the origin top-left.
/// A backend that records calls instead of drawing them is a valid
/// implementation and is what the tests use.
pub trait GraphicsDisplay {
    /// Set a single pixel
    fn draw_pixel(&mut self, x: u16, y: u16, color: Rgb565) -> Result<(), DisplayError>;

    /// Fill a `w` x `h` rectangle with its top-left corner at (`x`, `y`)
    fn draw_rect(&mut self, x: u16, y: u16, w: u16, h: u16, color: Rgb565) -> Result<(), DisplayError>;

    /// Blit a packed 1-bit bitmap
    ///
    /// `bytes` holds rows of `width` pixels, most significant bit first, each
    /// row padded to a whole byte. The height follows from the byte count.
    /// Set bits are drawn in the backend's foreground color, clear bits are
    /// left untouched.
    fn draw_bitmap(&mut self, x: u16, y: u16, width: u16, bytes: &[u8]) -> Result<(), DisplayError>;

    /// Fill the whole panel with one color
    fn fill_color(&mut self, color: Rgb565) -> Result<(), DisplayError>;

    /// Fill the whole panel with black
    fn fill_black(&mut self) -> Result<(), DisplayError> {
        self.fill_color(Rgb565::new(0, 0, 0))
    }

    fn display_width(&self) -> u16;

    fn display_height(&self) -> u16;

    /// Draw `text` with its top-left corner at (`x`, `y`)
    fn draw_text(
        &mut self,
        x: u16,
        y: u16,
        font: &MonoFont<'_>,
        text: &str,
        color: Rgb565,
    ) -> Result<(), DisplayError>;
}

/// Byte length of one packed bitmap row
#[inline]
pub const fn bitmap_stride(width: u16) -> usize {
    (width as usize).div_ceil(8)
}
