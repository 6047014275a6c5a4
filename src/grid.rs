/*
 *  grid.rs
 *
 *  hmi-panel - front panel model and bar visualizer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Fixed-size column grid backing the bar-graph visualizer
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

use embedded_graphics::pixelcolor::Rgb888;

/// Number of visualizer columns (bars).
pub const LED_MATRIX_COLUMNS: usize = 19;
/// Number of visualizer rows.
pub const LED_MATRIX_ROWS: usize = 21;
/// Total cells in the grid.
pub const LED_MATRIX_PIXELS_COUNT: usize = LED_MATRIX_COLUMNS * LED_MATRIX_ROWS;

/// Background color every pixel returns to on `clear()`.
pub const GRID_BACKGROUND: Rgb888 = Rgb888::new(0, 0, 0);

/// Capability bits carried by a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridFlags(u8);

impl GridFlags {
    /// Pixels carry full color rather than on/off.
    pub const HAS_COLOR: GridFlags = GridFlags(1 << 0);

    pub const fn empty() -> Self {
        GridFlags(0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: GridFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: GridFlags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: GridFlags) {
        self.0 &= !other.0;
    }
}

/// Per-column fill heights plus a parallel row-major pixel buffer.
///
/// The grid is array backed and `Copy`, so a full replacement is a single
/// bounded memcpy. A column height is the number of rows considered filled
/// for that bar, in `0..=rows`; it is a bar-graph value, not a pixel offset.
///
/// Coordinate accessors treat an out-of-range index as a programming error:
/// debug builds assert with a descriptive message, release builds fall back
/// to the slice bounds check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnGrid {
    pixels: [Rgb888; LED_MATRIX_PIXELS_COUNT],
    column_heights: [u8; LED_MATRIX_COLUMNS],
    columns: u16,
    rows: u16,
    pixel_count: u16,
    flags: GridFlags,
}

impl Default for ColumnGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnGrid {
    /// A cleared grid with full color capability.
    pub fn new() -> Self {
        let mut flags = GridFlags::empty();
        flags.insert(GridFlags::HAS_COLOR);
        Self {
            pixels: [GRID_BACKGROUND; LED_MATRIX_PIXELS_COUNT],
            column_heights: [0; LED_MATRIX_COLUMNS],
            columns: LED_MATRIX_COLUMNS as u16,
            rows: LED_MATRIX_ROWS as u16,
            pixel_count: LED_MATRIX_PIXELS_COUNT as u16,
            flags,
        }
    }

    /// Reset every pixel to the background and every column to height 0.
    pub fn clear(&mut self) {
        self.pixels.fill(GRID_BACKGROUND);
        self.column_heights.fill(0);
    }

    pub fn columns(&self) -> u16 {
        self.columns
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn pixel_count(&self) -> u16 {
        self.pixel_count
    }

    pub fn flags(&self) -> GridFlags {
        self.flags
    }

    pub fn has_color(&self) -> bool {
        self.flags.contains(GridFlags::HAS_COLOR)
    }

    #[inline]
    fn pixel_index(&self, x: u16, y: u16) -> usize {
        debug_assert!(x < self.columns, "pixel x {} out of range (columns {})", x, self.columns);
        debug_assert!(y < self.rows, "pixel y {} out of range (rows {})", y, self.rows);
        y as usize * self.columns as usize + x as usize
    }

    /// Mutable handle to the pixel at column `x`, row `y`.
    pub fn pixel_at(&mut self, x: u16, y: u16) -> &mut Rgb888 {
        let idx = self.pixel_index(x, y);
        &mut self.pixels[idx]
    }

    pub fn pixel(&self, x: u16, y: u16) -> Rgb888 {
        self.pixels[self.pixel_index(x, y)]
    }

    /// Row-major view of all pixels.
    pub fn pixels(&self) -> &[Rgb888] {
        &self.pixels
    }

    /// Mutable handle to the height counter of column `x`.
    ///
    /// Writers through this handle own the `<= rows` invariant; use
    /// [`ColumnGrid::set_column_height`] when the value is not already known
    /// to be in range.
    pub fn column_height_at(&mut self, x: u16) -> &mut u8 {
        debug_assert!(x < self.columns, "column {} out of range (columns {})", x, self.columns);
        &mut self.column_heights[x as usize]
    }

    pub fn column_height(&self, x: u16) -> u8 {
        debug_assert!(x < self.columns, "column {} out of range (columns {})", x, self.columns);
        self.column_heights[x as usize]
    }

    /// Set column `x` to `height`, clamped to the row count.
    pub fn set_column_height(&mut self, x: u16, height: u8) {
        let rows = self.rows;
        *self.column_height_at(x) = (height as u16).min(rows) as u8;
    }

    pub fn column_heights(&self) -> &[u8] {
        &self.column_heights
    }
}
