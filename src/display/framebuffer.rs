/*
 *  display/framebuffer.rs
 *
 *  hmi-panel - front panel model and bar visualizer
 *  (c) 2020-26 Stuart Hunter
 *
 *  In-memory RGB565 panel backed by embedded-graphics primitives
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

use core::convert::Infallible;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use log::debug;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::constants::BITMAP_FG_COLOR;
use crate::display::error::DisplayError;
use crate::display::traits::{bitmap_stride, GraphicsDisplay};

#[inline]
fn never<T>(r: Result<T, Infallible>) -> T {
    match r {
        Ok(v) => v,
        Err(e) => match e {},
    }
}

/// A runtime-sized RGB565 framebuffer that implements the panel capability.
///
/// Out-of-range drawing is clipped, the same as a panel controller would.
#[derive(Debug, Clone)]
pub struct FrameBufferDisplay {
    buf: Vec<Rgb565>,
    w: usize,
    h: usize,
    bitmap_color: Rgb565,
}

impl FrameBufferDisplay {
    pub fn new(width: u16, height: u16) -> Self {
        let (w, h) = (width as usize, height as usize);
        Self {
            buf: vec![Rgb565::BLACK; w * h],
            w,
            h,
            bitmap_color: BITMAP_FG_COLOR,
        }
    }

    /// Color used for set bits of packed bitmaps
    pub fn set_bitmap_color(&mut self, color: Rgb565) {
        self.bitmap_color = color;
    }

    /// Pixel at (x, y), `None` when outside the panel
    pub fn pixel(&self, x: u16, y: u16) -> Option<Rgb565> {
        self.idx(Point::new(x as i32, y as i32)).map(|i| self.buf[i])
    }

    /// Number of pixels currently set to `color`
    pub fn count_pixels(&self, color: Rgb565) -> usize {
        self.buf.iter().filter(|&&p| p == color).count()
    }

    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 {
            let (x, y) = (p.x as usize, p.y as usize);
            if x < self.w && y < self.h {
                return Some(y * self.w + x);
            }
        }
        None
    }

    /// Write the frame as a binary PPM (P6), expanding RGB565 to 8 bits per channel
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> Result<(), DisplayError> {
        write!(out, "P6\n{} {}\n255\n", self.w, self.h)?;
        let mut row = Vec::with_capacity(self.w * 3);
        for line in self.buf.chunks(self.w.max(1)) {
            row.clear();
            for c in line {
                row.push((c.r() << 3) | (c.r() >> 2));
                row.push((c.g() << 2) | (c.g() >> 4));
                row.push((c.b() << 3) | (c.b() >> 2));
            }
            out.write_all(&row)?;
        }
        Ok(())
    }

    /// Save the frame to a PPM file (for visual debugging)
    pub fn save_ppm<P: AsRef<Path>>(&self, path: P) -> Result<(), DisplayError> {
        let path = path.as_ref();
        let mut out = BufWriter::new(File::create(path)?);
        self.write_ppm(&mut out)?;
        out.flush()?;
        debug!("Frame snapshot written to {}", path.display());
        Ok(())
    }
}

impl OriginDimensions for FrameBufferDisplay {
    fn size(&self) -> Size {
        Size::new(self.w as u32, self.h as u32)
    }
}

impl DrawTarget for FrameBufferDisplay {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            if let Some(i) = self.idx(p) {
                self.buf[i] = c;
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        // fast path for the solid rectangles the renderer issues
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };
        let (x0, x1) = (area.top_left.x as usize, bottom_right.x as usize);
        for y in area.top_left.y as usize..=bottom_right.y as usize {
            let base = y * self.w;
            self.buf[base + x0..=base + x1].fill(color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.buf.fill(color);
        Ok(())
    }
}

impl GraphicsDisplay for FrameBufferDisplay {
    fn draw_pixel(&mut self, x: u16, y: u16, color: Rgb565) -> Result<(), DisplayError> {
        never(Pixel(Point::new(x as i32, y as i32), color).draw(self));
        Ok(())
    }

    fn draw_rect(&mut self, x: u16, y: u16, w: u16, h: u16, color: Rgb565) -> Result<(), DisplayError> {
        never(
            Rectangle::new(Point::new(x as i32, y as i32), Size::new(w as u32, h as u32))
                .into_styled(PrimitiveStyle::with_fill(color))
                .draw(self),
        );
        Ok(())
    }

    fn draw_bitmap(&mut self, x: u16, y: u16, width: u16, bytes: &[u8]) -> Result<(), DisplayError> {
        let stride = bitmap_stride(width);
        if width == 0 || bytes.len() % stride != 0 {
            return Err(DisplayError::InvalidBitmap { width, len: bytes.len() });
        }
        let color = self.bitmap_color;
        let origin = Point::new(x as i32, y as i32);
        let pixels = bytes.chunks(stride).enumerate().flat_map(|(row, line)| {
            (0..width as usize).filter_map(move |col| {
                let set = line[col / 8] & (0x80 >> (col % 8)) != 0;
                set.then(|| Pixel(origin + Point::new(col as i32, row as i32), color))
            })
        });
        never(self.draw_iter(pixels));
        Ok(())
    }

    fn fill_color(&mut self, color: Rgb565) -> Result<(), DisplayError> {
        never(DrawTarget::clear(self, color));
        Ok(())
    }

    fn display_width(&self) -> u16 {
        self.w as u16
    }

    fn display_height(&self) -> u16 {
        self.h as u16
    }

    fn draw_text(
        &mut self,
        x: u16,
        y: u16,
        font: &MonoFont<'_>,
        text: &str,
        color: Rgb565,
    ) -> Result<(), DisplayError> {
        let style = MonoTextStyle::new(font, color);
        never(Text::with_baseline(text, Point::new(x as i32, y as i32), style, Baseline::Top).draw(self));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::mono_font::ascii::FONT_5X8;

    #[test]
    fn test_new_is_black() {
        let fb = FrameBufferDisplay::new(32, 16);
        assert_eq!(fb.display_width(), 32);
        assert_eq!(fb.display_height(), 16);
        assert_eq!(fb.count_pixels(Rgb565::BLACK), 32 * 16);
    }

    #[test]
    fn test_draw_rect_and_clip() {
        let mut fb = FrameBufferDisplay::new(32, 16);
        fb.draw_rect(2, 3, 4, 5, Rgb565::RED).unwrap();
        assert_eq!(fb.count_pixels(Rgb565::RED), 20);
        assert_eq!(fb.pixel(2, 3), Some(Rgb565::RED));
        assert_eq!(fb.pixel(5, 7), Some(Rgb565::RED));
        assert_eq!(fb.pixel(6, 7), Some(Rgb565::BLACK));

        // hangs off the right/bottom edge
        fb.draw_rect(30, 14, 10, 10, Rgb565::GREEN).unwrap();
        assert_eq!(fb.count_pixels(Rgb565::GREEN), 4);

        // zero size draws nothing
        fb.draw_rect(0, 0, 0, 4, Rgb565::BLUE).unwrap();
        assert_eq!(fb.count_pixels(Rgb565::BLUE), 0);
    }

    #[test]
    fn test_draw_pixel_and_fill() {
        let mut fb = FrameBufferDisplay::new(8, 8);
        fb.draw_pixel(7, 7, Rgb565::WHITE).unwrap();
        fb.draw_pixel(8, 8, Rgb565::WHITE).unwrap();
        assert_eq!(fb.count_pixels(Rgb565::WHITE), 1);

        fb.fill_color(Rgb565::BLUE).unwrap();
        assert_eq!(fb.count_pixels(Rgb565::BLUE), 64);
        fb.fill_black().unwrap();
        assert_eq!(fb.count_pixels(Rgb565::BLACK), 64);
    }

    #[test]
    fn test_draw_bitmap_msb_first() {
        let mut fb = FrameBufferDisplay::new(16, 4);
        fb.set_bitmap_color(Rgb565::RED);
        // 10 px wide, 2 bytes per row, 2 rows
        let bytes = [0b1000_0000, 0b0100_0000, 0b0000_0001, 0b0000_0000];
        fb.draw_bitmap(1, 1, 10, &bytes).unwrap();

        assert_eq!(fb.count_pixels(Rgb565::RED), 3);
        assert_eq!(fb.pixel(1, 1), Some(Rgb565::RED));
        assert_eq!(fb.pixel(1 + 9, 1), Some(Rgb565::RED));
        assert_eq!(fb.pixel(1 + 7, 2), Some(Rgb565::RED));
    }

    #[test]
    fn test_draw_bitmap_rejects_ragged_length() {
        let mut fb = FrameBufferDisplay::new(16, 4);
        assert!(matches!(
            fb.draw_bitmap(0, 0, 10, &[0xFF; 3]),
            Err(DisplayError::InvalidBitmap { width: 10, len: 3 })
        ));
        assert!(fb.draw_bitmap(0, 0, 0, &[]).is_err());
    }

    #[test]
    fn test_draw_text_sets_pixels() {
        let mut fb = FrameBufferDisplay::new(64, 16);
        fb.draw_text(0, 0, &FONT_5X8, "1.500", Rgb565::WHITE).unwrap();
        let lit = fb.count_pixels(Rgb565::WHITE);
        assert!(lit > 0);
        // nothing drawn below the glyph cell
        for x in 0..64 {
            assert_eq!(fb.pixel(x, 12), Some(Rgb565::BLACK));
        }
    }

    #[test]
    fn test_write_ppm_header_and_size() {
        let mut fb = FrameBufferDisplay::new(4, 2);
        fb.fill_color(Rgb565::WHITE).unwrap();
        let mut out = Vec::new();
        fb.write_ppm(&mut out).unwrap();

        let header = b"P6\n4 2\n255\n";
        assert_eq!(&out[..header.len()], header);
        assert_eq!(out.len(), header.len() + 4 * 2 * 3);
        assert!(out[header.len()..].iter().all(|&b| b == 255));
    }
}
