/*
 *  display/drivers/mock.rs
 *
 *  hmi-panel - front panel model and bar visualizer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Recording display for testing without hardware
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
use crate::display::traits::GraphicsDisplay;

/// One primitive issued against the display
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Pixel { x: u16, y: u16, color: Rgb565 },
    Rect { x: u16, y: u16, w: u16, h: u16, color: Rgb565 },
    Bitmap { x: u16, y: u16, width: u16, bytes: Vec<u8> },
    Fill { color: Rgb565 },
    Text { x: u16, y: u16, font_height: u32, text: String, color: Rgb565 },
}

/// Display double that records every call in order
///
/// Nothing is rasterised. Tests inspect the call list to verify what the
/// renderer issued and in which order. Failures can be injected to exercise
/// error paths.
#[derive(Debug, Clone)]
pub struct RecordingDisplay {
    width: u16,
    height: u16,
    calls: Vec<DrawCall>,

    /// Fail the n-th rect draw (0-based, counted from creation)
    pub fail_rect_at: Option<usize>,
    rects_seen: usize,
}

impl RecordingDisplay {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            calls: Vec::new(),
            fail_rect_at: None,
            rects_seen: 0,
        }
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Drain the recorded calls (useful between frames)
    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn rects(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls.iter().filter(|c| matches!(c, DrawCall::Rect { .. }))
    }

    pub fn bitmaps(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls.iter().filter(|c| matches!(c, DrawCall::Bitmap { .. }))
    }

    /// Text strings in draw order
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl GraphicsDisplay for RecordingDisplay {
    fn draw_pixel(&mut self, x: u16, y: u16, color: Rgb565) -> Result<(), DisplayError> {
        self.calls.push(DrawCall::Pixel { x, y, color });
        Ok(())
    }

    fn draw_rect(&mut self, x: u16, y: u16, w: u16, h: u16, color: Rgb565) -> Result<(), DisplayError> {
        let n = self.rects_seen;
        self.rects_seen += 1;
        if self.fail_rect_at == Some(n) {
            return Err(DisplayError::DrawingError(format!("Simulated rect failure at #{}", n)));
        }
        self.calls.push(DrawCall::Rect { x, y, w, h, color });
        Ok(())
    }

    fn draw_bitmap(&mut self, x: u16, y: u16, width: u16, bytes: &[u8]) -> Result<(), DisplayError> {
        self.calls.push(DrawCall::Bitmap { x, y, width, bytes: bytes.to_vec() });
        Ok(())
    }

    fn fill_color(&mut self, color: Rgb565) -> Result<(), DisplayError> {
        self.calls.push(DrawCall::Fill { color });
        Ok(())
    }

    fn display_width(&self) -> u16 {
        self.width
    }

    fn display_height(&self) -> u16 {
        self.height
    }

    fn draw_text(
        &mut self,
        x: u16,
        y: u16,
        font: &MonoFont<'_>,
        text: &str,
        color: Rgb565,
    ) -> Result<(), DisplayError> {
        self.calls.push(DrawCall::Text {
            x,
            y,
            font_height: font.character_size.height,
            text: text.to_string(),
            color,
        });
        Ok(())
    }
}
