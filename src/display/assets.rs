/*
 *  display/assets.rs
 *
 *  hmi-panel - front panel model and bar visualizer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Packed 1-bit glyphs for the control pane
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
//! Button and label art, rasterised at compile time.
//!
//! Pressed buttons are drawn a little smaller than released ones, so each
//! variant carries its own width and byte count.

use crate::display::traits::bitmap_stride;

/// A packed 1-bit bitmap: MSB first, rows padded to a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u16,
    pub bytes: &'static [u8],
}

impl Bitmap {
    pub const fn height(&self) -> u16 {
        (self.bytes.len() / bitmap_stride(self.width)) as u16
    }

    pub const fn bytes_count(&self) -> usize {
        self.bytes.len()
    }
}

const BTN_WIDTH: u16 = 60;
const BTN_HEIGHT: u16 = 32;
const BTN_PRESSED_WIDTH: u16 = 56;
const BTN_PRESSED_HEIGHT: u16 = 30;

const BTN_BYTES_COUNT: usize = bitmap_stride(BTN_WIDTH) * BTN_HEIGHT as usize;
const BTN_PRESSED_BYTES_COUNT: usize = bitmap_stride(BTN_PRESSED_WIDTH) * BTN_PRESSED_HEIGHT as usize;

const LABEL_HEIGHT: usize = 10;

static BTN_LEFT_BYTES: [u8; BTN_BYTES_COUNT] = button(BTN_WIDTH, BTN_HEIGHT, false, true);
static BTN_LEFT_PRESSED_BYTES: [u8; BTN_PRESSED_BYTES_COUNT] =
    button(BTN_PRESSED_WIDTH, BTN_PRESSED_HEIGHT, true, true);
static BTN_RIGHT_BYTES: [u8; BTN_BYTES_COUNT] = button(BTN_WIDTH, BTN_HEIGHT, false, false);
static BTN_RIGHT_PRESSED_BYTES: [u8; BTN_PRESSED_BYTES_COUNT] =
    button(BTN_PRESSED_WIDTH, BTN_PRESSED_HEIGHT, true, false);

static LABEL_GAIN_BYTES: [u8; 4 * LABEL_HEIGHT] = label(b"GAIN");
static LABEL_SOURCE_BYTES: [u8; 6 * LABEL_HEIGHT] = label(b"SOURCE");
static LABEL_EFFECT_BYTES: [u8; 6 * LABEL_HEIGHT] = label(b"EFFECT");

pub static BTN_LEFT: Bitmap = Bitmap { width: BTN_WIDTH, bytes: &BTN_LEFT_BYTES };
pub static BTN_LEFT_PRESSED: Bitmap = Bitmap { width: BTN_PRESSED_WIDTH, bytes: &BTN_LEFT_PRESSED_BYTES };
pub static BTN_RIGHT: Bitmap = Bitmap { width: BTN_WIDTH, bytes: &BTN_RIGHT_BYTES };
pub static BTN_RIGHT_PRESSED: Bitmap = Bitmap { width: BTN_PRESSED_WIDTH, bytes: &BTN_RIGHT_PRESSED_BYTES };

pub static LABEL_GAIN: Bitmap = Bitmap { width: 4 * 8, bytes: &LABEL_GAIN_BYTES };
pub static LABEL_SOURCE: Bitmap = Bitmap { width: 6 * 8, bytes: &LABEL_SOURCE_BYTES };
pub static LABEL_EFFECT: Bitmap = Bitmap { width: 6 * 8, bytes: &LABEL_EFFECT_BYTES };

#[inline]
const fn set_px(buf: &mut [u8], stride: usize, x: usize, y: usize) {
    buf[y * stride + x / 8] |= 0x80 >> (x % 8);
}

#[inline]
const fn clear_px(buf: &mut [u8], stride: usize, x: usize, y: usize) {
    buf[y * stride + x / 8] &= !(0x80 >> (x % 8));
}

/// Framed button with an arrow. Pressed buttons are filled with the arrow
/// knocked out.
const fn button<const N: usize>(width: u16, height: u16, pressed: bool, points_left: bool) -> [u8; N] {
    let mut buf = [0u8; N];
    let (w, h) = (width as usize, height as usize);
    let stride = bitmap_stride(width);

    let mut y = 0;
    while y < h {
        let mut x = 0;
        while x < w {
            let edge = x == 0 || y == 0 || x == w - 1 || y == h - 1;
            if edge || pressed {
                set_px(&mut buf, stride, x, y);
            }
            x += 1;
        }
        y += 1;
    }
    // rounded corners
    clear_px(&mut buf, stride, 0, 0);
    clear_px(&mut buf, stride, w - 1, 0);
    clear_px(&mut buf, stride, 0, h - 1);
    clear_px(&mut buf, stride, w - 1, h - 1);

    let half = h / 4;
    let (cx, cy) = (w / 2, h / 2);
    let mut dy = 0;
    while dy <= half {
        let mut i = dy;
        while i <= half {
            let x = if points_left { cx - half + i } else { cx + half - i };
            if pressed {
                clear_px(&mut buf, stride, x, cy - dy);
                clear_px(&mut buf, stride, x, cy + dy);
            } else {
                set_px(&mut buf, stride, x, cy - dy);
                set_px(&mut buf, stride, x, cy + dy);
            }
            i += 1;
        }
        dy += 1;
    }
    buf
}

/// 3x5 capitals, one row per entry, leftmost column in bit 2.
const fn glyph(c: u8) -> [u8; 5] {
    match c {
        b'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        b'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        b'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        b'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        b'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        b'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        b'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        b'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        b'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        b'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        b'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        b'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        _ => [0; 5],
    }
}

/// Text label at 2x scale. Each character fills one byte column: a blank
/// pixel, six glyph pixels, a blank pixel.
const fn label<const N: usize>(text: &[u8]) -> [u8; N] {
    let mut buf = [0u8; N];
    let stride = text.len();
    let mut ci = 0;
    while ci < text.len() {
        let rows = glyph(text[ci]);
        let mut y = 0;
        while y < LABEL_HEIGHT {
            let bits = rows[y / 2];
            let mut col = 0;
            while col < 3 {
                if bits & (0b100 >> col) != 0 {
                    set_px(&mut buf, stride, ci * 8 + 1 + 2 * col, y);
                    set_px(&mut buf, stride, ci * 8 + 2 + 2 * col, y);
                }
                col += 1;
            }
            y += 1;
        }
        ci += 1;
    }
    buf
}
