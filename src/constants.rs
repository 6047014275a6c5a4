//! Layout constants for the front panel and the bar visualizer.
//!
//! The panel is 320x240. The control pane sits at the top of the frame
//! buffer (the panel is mounted rotated, so it reads as the bottom), the
//! visualizer fills the rest.

use embedded_graphics::mono_font::{ascii::FONT_5X8, MonoFont};
use embedded_graphics::pixelcolor::Rgb565;

/// The total width of the panel in pixels.
pub const DISPL_TOTAL_WIDTH: u16 = 320;
/// The total height of the panel in pixels.
pub const DISPL_TOTAL_HEIGHT: u16 = 240;

// Control pane
pub const PANE_BOTTOM_HEIGHT: u16 = 60;

pub const READOUT_BG_X: u16 = 68;
pub const READOUT_BG_Y: u16 = 39;
pub const READOUT_BG_WIDTH: u16 = 184;
pub const READOUT_BG_HEIGHT: u16 = 16;

pub const BTN_LEFT_X: u16 = 4;
pub const BTN_RIGHT_X: u16 = 256;
pub const BTN_Y: u16 = 4;

/// Top-left of the selected option label bitmap.
pub const LABEL_X: u16 = 68;
pub const LABEL_Y: u16 = 6;

/// Top-left of the gain readout text.
pub const GAIN_TEXT_X: u16 = 140;
pub const GAIN_TEXT_Y: u16 = 41;
/// Visible characters of the gain readout; longer output is truncated.
pub const GAIN_TEXT_CAPACITY: usize = 31;
/// Font used for the numeric readout.
pub const GAIN_FONT: &MonoFont<'static> = &FONT_5X8;

// Visualizer grid
pub const VIS_BARS_COUNT: u16 = 19;
pub const VIS_ROWS_COUNT: u16 = 21;

pub const VIS_BLOCK_WIDTH: u16 = 12;
pub const VIS_BLOCK_HEIGHT: u16 = 6;
pub const VIS_BAR_HGAP: u16 = 4;
pub const VIS_BAR_VGAP: u16 = 2;

/// Grid box width: leading gap plus one block and trailing gap per bar.
pub const VIS_DISPLAY_WIDTH: u16 = VIS_BAR_HGAP + VIS_BARS_COUNT * (VIS_BLOCK_WIDTH + VIS_BAR_HGAP);
/// Grid box height: leading gap plus one block and trailing gap per row.
pub const VIS_DISPLAY_HEIGHT: u16 = VIS_BAR_VGAP + VIS_ROWS_COUNT * (VIS_BLOCK_HEIGHT + VIS_BAR_VGAP);

pub const VIS_BASE_X: u16 = 0;
pub const VIS_BASE_Y: u16 = PANE_BOTTOM_HEIGHT;
pub const VIS_DISPLAY_BASE_WIDTH: u16 = DISPL_TOTAL_WIDTH;
pub const VIS_DISPLAY_BASE_HEIGHT: u16 = DISPL_TOTAL_HEIGHT - PANE_BOTTOM_HEIGHT;

/// Height of the background strip drawn above the grid box.
pub const VIS_V_OFFSET: u16 = 4;
pub const VIS_X: u16 = (DISPL_TOTAL_WIDTH - VIS_DISPLAY_WIDTH) / 2;
pub const VIS_Y: u16 = VIS_BASE_Y + VIS_V_OFFSET + 2;

// Colors (RGB565)
pub const VIS_PANE_BOTTOM_BG_COLOR: Rgb565 = Rgb565::new(4, 8, 4);
pub const VIS_PANE_BOTTOM_TEXT_BG_COLOR: Rgb565 = Rgb565::new(1, 2, 1);
pub const VIS_DISPLAY_BASE_COLOR: Rgb565 = Rgb565::new(6, 12, 6);
pub const VIS_DISPLAY_BG_COLOR: Rgb565 = Rgb565::new(0, 0, 0);
pub const VIS_BLOCK_ON_COLOR: Rgb565 = Rgb565::new(31, 40, 0);
pub const VIS_BLOCK_OFF_COLOR: Rgb565 = Rgb565::new(3, 6, 2);
pub const GAIN_TEXT_COLOR: Rgb565 = Rgb565::new(31, 63, 31);
/// Foreground for set bits of packed glyph bitmaps.
pub const BITMAP_FG_COLOR: Rgb565 = Rgb565::new(31, 63, 31);

// the grid must fit below the pane
const _: () = assert!(VIS_Y + VIS_DISPLAY_HEIGHT <= DISPL_TOTAL_HEIGHT);
const _: () = assert!(VIS_DISPLAY_WIDTH <= DISPL_TOTAL_WIDTH);
