/*
 *  render.rs
 *
 *  hmi-panel - front panel model and bar visualizer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Model to draw-primitive rendering and the periodic tick
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

use arrayvec::ArrayString;
use log::trace;
use std::fmt::{self, Write};

use crate::constants::*;
use crate::display::assets::{self, Bitmap};
use crate::display::error::DisplayError;
use crate::display::traits::GraphicsDisplay;
use crate::error::{ModelError, RenderError};
use crate::grid::{ColumnGrid, LED_MATRIX_COLUMNS, LED_MATRIX_ROWS};
use crate::model::{AcquireTimeout, ModelGuard, ModelSnapshot, ModelStore, OptionSelect};

// grid storage and visualizer layout must agree
const _: () = assert!(LED_MATRIX_COLUMNS == VIS_BARS_COUNT as usize);
const _: () = assert!(LED_MATRIX_ROWS == VIS_ROWS_COUNT as usize);

/// Text buffer for the gain readout
pub type GainText = ArrayString<GAIN_TEXT_CAPACITY>;

/// What the option area shows for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OptionView {
    Gain(f32),
    Source,
    Effect,
}

impl From<&ModelSnapshot> for OptionView {
    fn from(snap: &ModelSnapshot) -> Self {
        match snap.option_selected {
            OptionSelect::Gain => OptionView::Gain(snap.gain),
            OptionSelect::Source => OptionView::Source,
            OptionSelect::Effect => OptionView::Effect,
        }
    }
}

/// Drops whatever does not fit instead of failing the whole write.
struct Truncating<'a, const N: usize>(&'a mut ArrayString<N>);

impl<const N: usize> Write for Truncating<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.try_push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Gain with exactly three fractional digits, truncated to the readout width.
pub fn format_gain(gain: f32) -> GainText {
    let mut text = GainText::new();
    let _ = write!(Truncating(&mut text), "{:.3}", gain);
    text
}

/// A cell is lit iff its column height does not exceed the row index.
#[inline]
pub fn cell_is_on(height: u8, row: u16) -> bool {
    height as u16 <= row
}

/// Top-left corner of the block for `column`, `row`.
#[inline]
pub fn cell_origin(column: u16, row: u16) -> (u16, u16) {
    (
        VIS_X + VIS_BAR_HGAP + column * (VIS_BLOCK_WIDTH + VIS_BAR_HGAP),
        VIS_Y + VIS_BAR_VGAP + row * (VIS_BLOCK_HEIGHT + VIS_BAR_VGAP),
    )
}

fn draw_glyph<D: GraphicsDisplay + ?Sized>(display: &mut D, x: u16, y: u16, bitmap: &Bitmap) -> Result<(), DisplayError> {
    display.draw_bitmap(x, y, bitmap.width, bitmap.bytes)
}

fn draw_control_pane<D: GraphicsDisplay + ?Sized>(display: &mut D, snap: &ModelSnapshot) -> Result<(), DisplayError> {
    display.draw_rect(0, 0, DISPL_TOTAL_WIDTH, PANE_BOTTOM_HEIGHT, VIS_PANE_BOTTOM_BG_COLOR)?;
    display.draw_rect(READOUT_BG_X, READOUT_BG_Y, READOUT_BG_WIDTH, READOUT_BG_HEIGHT, VIS_PANE_BOTTOM_TEXT_BG_COLOR)?;

    let left = if snap.left_button_pressed { &assets::BTN_LEFT_PRESSED } else { &assets::BTN_LEFT };
    draw_glyph(display, BTN_LEFT_X, BTN_Y, left)?;

    let right = if snap.right_button_pressed { &assets::BTN_RIGHT_PRESSED } else { &assets::BTN_RIGHT };
    draw_glyph(display, BTN_RIGHT_X, BTN_Y, right)?;

    match OptionView::from(snap) {
        OptionView::Gain(gain) => {
            let text = format_gain(gain);
            display.draw_text(GAIN_TEXT_X, GAIN_TEXT_Y, GAIN_FONT, &text, GAIN_TEXT_COLOR)?;
            draw_glyph(display, LABEL_X, LABEL_Y, &assets::LABEL_GAIN)
        }
        OptionView::Source => draw_glyph(display, LABEL_X, LABEL_Y, &assets::LABEL_SOURCE),
        OptionView::Effect => draw_glyph(display, LABEL_X, LABEL_Y, &assets::LABEL_EFFECT),
    }
}

fn draw_visualizer<D: GraphicsDisplay + ?Sized>(display: &mut D, grid: &ColumnGrid) -> Result<(), DisplayError> {
    // base + strip above the grid + grid box
    display.draw_rect(VIS_BASE_X, VIS_BASE_Y, VIS_DISPLAY_BASE_WIDTH, VIS_DISPLAY_BASE_HEIGHT, VIS_DISPLAY_BASE_COLOR)?;
    display.draw_rect(VIS_X, VIS_Y - VIS_V_OFFSET, VIS_DISPLAY_WIDTH, VIS_V_OFFSET, VIS_DISPLAY_BG_COLOR)?;
    display.draw_rect(VIS_X, VIS_Y, VIS_DISPLAY_WIDTH, VIS_DISPLAY_HEIGHT, VIS_DISPLAY_BG_COLOR)?;

    assert_eq!(grid.columns(), VIS_BARS_COUNT, "grid columns do not match visualizer bar count");
    assert_eq!(grid.rows(), VIS_ROWS_COUNT, "grid rows do not match visualizer row count");

    for row in 0..VIS_ROWS_COUNT {
        for bar in 0..VIS_BARS_COUNT {
            let color = if cell_is_on(grid.column_height(bar), row) {
                VIS_BLOCK_ON_COLOR
            } else {
                VIS_BLOCK_OFF_COLOR
            };
            let (x, y) = cell_origin(bar, row);
            display.draw_rect(x, y, VIS_BLOCK_WIDTH, VIS_BLOCK_HEIGHT, color)?;
        }
    }
    Ok(())
}

/// Issue one frame for the model held by `guard`.
pub fn draw_model<D: GraphicsDisplay + ?Sized>(guard: &ModelGuard<'_>, display: &mut D) -> Result<(), DisplayError> {
    let snap = guard.snapshot();
    draw_control_pane(display, &snap)?;
    draw_visualizer(display, guard.grid())
}

/// Render the current model.
///
/// Waits for the model without limit; the guard is released on return,
/// including when a display primitive fails part way through the frame.
pub fn draw<D: GraphicsDisplay + ?Sized>(store: &ModelStore, display: &mut D) -> Result<(), RenderError> {
    let guard = store.acquire(AcquireTimeout::Forever)?;
    draw_model(&guard, display)?;
    guard.release();
    trace!("Frame drawn");
    Ok(())
}

/// Periodic update hook. Takes the lock and changes nothing yet; bar decay
/// will run here under the same lock.
pub fn tick(store: &ModelStore) -> Result<(), ModelError> {
    let guard = store.acquire(AcquireTimeout::Forever)?;
    guard.release();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::drivers::mock::{DrawCall, RecordingDisplay};

    fn store() -> ModelStore {
        let store = ModelStore::new();
        store.init().unwrap();
        store
    }

    fn cell_colors(display: &RecordingDisplay) -> Vec<(u16, u16, embedded_graphics::pixelcolor::Rgb565)> {
        display
            .rects()
            .filter_map(|c| match *c {
                DrawCall::Rect { x, y, w, h, color } if w == VIS_BLOCK_WIDTH && h == VIS_BLOCK_HEIGHT => {
                    Some((x, y, color))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_format_gain() {
        assert_eq!(format_gain(1.5).as_str(), "1.500");
        assert_eq!(format_gain(1.0).as_str(), "1.000");
        assert_eq!(format_gain(-0.25).as_str(), "-0.250");
        assert_eq!(format_gain(0.0004).as_str(), "0.000");
        assert_eq!(format_gain(f32::NAN).as_str(), "NaN");
        assert_eq!(format_gain(f32::INFINITY).as_str(), "inf");
    }

    #[test]
    fn test_format_gain_truncates() {
        let text = format_gain(1.0e30);
        assert_eq!(text.len(), GAIN_TEXT_CAPACITY);
        assert!(text.starts_with("1000000"));
        assert!(!text.contains('.'));
    }

    #[test]
    fn test_cell_predicate_boundary() {
        // rows = 21, height = 5: rows 0-4 off, rows 5-20 on
        let on: Vec<bool> = (0..VIS_ROWS_COUNT).map(|r| cell_is_on(5, r)).collect();
        assert!(on[..5].iter().all(|&b| !b));
        assert!(on[5..].iter().all(|&b| b));
        assert_eq!(on.iter().filter(|&&b| b).count(), 16);
    }

    #[test]
    fn test_off_cells_match_height_for_every_height() {
        for h in 0..=VIS_ROWS_COUNT {
            let off = (0..VIS_ROWS_COUNT).filter(|&r| !cell_is_on(h as u8, r)).count();
            assert_eq!(off, h as usize, "height {}", h);
            // off cells are the top rows, on cells follow
            assert!((0..h).all(|r| !cell_is_on(h as u8, r)));
            assert!((h..VIS_ROWS_COUNT).all(|r| cell_is_on(h as u8, r)));
        }

        // same through a full frame: per column, h off rects
        let store = store();
        let mut grid = ColumnGrid::new();
        for c in 0..VIS_BARS_COUNT {
            grid.set_column_height(c, (c + 2).min(VIS_ROWS_COUNT) as u8);
        }
        store
            .acquire(AcquireTimeout::Forever)
            .unwrap()
            .set_led_matrix_values(Some(&grid));
        let mut display = RecordingDisplay::new(DISPL_TOTAL_WIDTH, DISPL_TOTAL_HEIGHT);
        draw(&store, &mut display).unwrap();
        let cells = cell_colors(&display);

        for c in 0..VIS_BARS_COUNT {
            let (x, _) = cell_origin(c, 0);
            let off = cells
                .iter()
                .filter(|&&(cx, _, color)| cx == x && color == VIS_BLOCK_OFF_COLOR)
                .count();
            assert_eq!(off, grid.column_height(c) as usize, "column {}", c);
        }
    }

    #[test]
    fn test_cell_origin() {
        assert_eq!(cell_origin(0, 0), (VIS_X + VIS_BAR_HGAP, VIS_Y + VIS_BAR_VGAP));
        let (x, y) = cell_origin(VIS_BARS_COUNT - 1, VIS_ROWS_COUNT - 1);
        assert!(x + VIS_BLOCK_WIDTH <= VIS_X + VIS_DISPLAY_WIDTH);
        assert!(y + VIS_BLOCK_HEIGHT <= VIS_Y + VIS_DISPLAY_HEIGHT);
    }

    #[test]
    fn test_draw_order() {
        let store = store();
        let mut display = RecordingDisplay::new(DISPL_TOTAL_WIDTH, DISPL_TOTAL_HEIGHT);
        draw(&store, &mut display).unwrap();

        let calls = display.calls();
        assert_eq!(
            calls[0],
            DrawCall::Rect { x: 0, y: 0, w: DISPL_TOTAL_WIDTH, h: PANE_BOTTOM_HEIGHT, color: VIS_PANE_BOTTOM_BG_COLOR }
        );
        assert_eq!(
            calls[1],
            DrawCall::Rect {
                x: READOUT_BG_X,
                y: READOUT_BG_Y,
                w: READOUT_BG_WIDTH,
                h: READOUT_BG_HEIGHT,
                color: VIS_PANE_BOTTOM_TEXT_BG_COLOR
            }
        );
        assert!(matches!(calls[2], DrawCall::Bitmap { x: BTN_LEFT_X, .. }));
        assert!(matches!(calls[3], DrawCall::Bitmap { x: BTN_RIGHT_X, .. }));
        assert!(matches!(calls[4], DrawCall::Text { x: GAIN_TEXT_X, y: GAIN_TEXT_Y, .. }));
        assert!(matches!(calls[5], DrawCall::Bitmap { x: LABEL_X, y: LABEL_Y, .. }));
        assert!(matches!(calls[6], DrawCall::Rect { x: VIS_BASE_X, y: VIS_BASE_Y, .. }));
        assert!(matches!(calls[7], DrawCall::Rect { h: VIS_V_OFFSET, .. }));
        assert!(matches!(calls[8], DrawCall::Rect { w: VIS_DISPLAY_WIDTH, h: VIS_DISPLAY_HEIGHT, .. }));
        assert_eq!(calls.len(), 9 + (VIS_BARS_COUNT * VIS_ROWS_COUNT) as usize);
    }

    #[test]
    fn test_grid_cells_follow_heights() {
        let store = store();
        let mut grid = ColumnGrid::new();
        grid.set_column_height(0, 5);
        grid.set_column_height(1, VIS_ROWS_COUNT as u8);
        store.acquire(AcquireTimeout::Forever).unwrap().set_led_matrix_values(Some(&grid));

        let mut display = RecordingDisplay::new(DISPL_TOTAL_WIDTH, DISPL_TOTAL_HEIGHT);
        draw(&store, &mut display).unwrap();
        let cells = cell_colors(&display);
        assert_eq!(cells.len(), (VIS_BARS_COUNT * VIS_ROWS_COUNT) as usize);

        let column = |c: u16| -> Vec<_> {
            let (cx, _) = cell_origin(c, 0);
            cells.iter().filter(|(x, _, _)| *x == cx).map(|(_, _, color)| *color).collect()
        };

        let col0 = column(0);
        assert_eq!(col0.iter().filter(|&&c| c == VIS_BLOCK_OFF_COLOR).count(), 5);
        assert_eq!(col0.iter().filter(|&&c| c == VIS_BLOCK_ON_COLOR).count(), 16);
        assert!(col0[..5].iter().all(|&c| c == VIS_BLOCK_OFF_COLOR));

        // full height: no row index reaches it
        assert!(column(1).iter().all(|&c| c == VIS_BLOCK_OFF_COLOR));
        // zero height: every row lit
        assert!(column(2).iter().all(|&c| c == VIS_BLOCK_ON_COLOR));
    }

    #[test]
    fn test_cells_are_row_major() {
        let store = store();
        let mut display = RecordingDisplay::new(DISPL_TOTAL_WIDTH, DISPL_TOTAL_HEIGHT);
        draw(&store, &mut display).unwrap();
        let cells = cell_colors(&display);
        assert_eq!((cells[0].0, cells[0].1), cell_origin(0, 0));
        assert_eq!((cells[1].0, cells[1].1), cell_origin(1, 0));
        let n = VIS_BARS_COUNT as usize;
        assert_eq!((cells[n].0, cells[n].1), cell_origin(0, 1));
    }

    #[test]
    fn test_button_variants() {
        let store = store();
        let mut display = RecordingDisplay::new(DISPL_TOTAL_WIDTH, DISPL_TOTAL_HEIGHT);

        draw(&store, &mut display).unwrap();
        let released: Vec<_> = display.take_calls().into_iter().filter(|c| matches!(c, DrawCall::Bitmap { .. })).collect();
        assert_eq!(
            released[0],
            DrawCall::Bitmap { x: BTN_LEFT_X, y: BTN_Y, width: assets::BTN_LEFT.width, bytes: assets::BTN_LEFT.bytes.to_vec() }
        );

        {
            let mut guard = store.acquire(AcquireTimeout::Forever).unwrap();
            guard.set_left_button_clicked(true);
            guard.set_right_button_clicked(true);
        }
        draw(&store, &mut display).unwrap();
        let pressed: Vec<_> = display.bitmaps().cloned().collect();
        assert_eq!(
            pressed[0],
            DrawCall::Bitmap {
                x: BTN_LEFT_X,
                y: BTN_Y,
                width: assets::BTN_LEFT_PRESSED.width,
                bytes: assets::BTN_LEFT_PRESSED.bytes.to_vec()
            }
        );
        assert_eq!(
            pressed[1],
            DrawCall::Bitmap {
                x: BTN_RIGHT_X,
                y: BTN_Y,
                width: assets::BTN_RIGHT_PRESSED.width,
                bytes: assets::BTN_RIGHT_PRESSED.bytes.to_vec()
            }
        );
    }

    #[test]
    fn test_gain_readout() {
        let store = store();
        store.acquire(AcquireTimeout::Forever).unwrap().set_gain(1.5);
        let mut display = RecordingDisplay::new(DISPL_TOTAL_WIDTH, DISPL_TOTAL_HEIGHT);
        draw(&store, &mut display).unwrap();

        assert_eq!(display.texts(), vec!["1.500"]);
        let label = display.bitmaps().nth(2).cloned().unwrap();
        assert_eq!(
            label,
            DrawCall::Bitmap { x: LABEL_X, y: LABEL_Y, width: assets::LABEL_GAIN.width, bytes: assets::LABEL_GAIN.bytes.to_vec() }
        );
    }

    #[test]
    fn test_source_and_effect_have_no_readout() {
        for (option, bitmap) in [(OptionSelect::Source, &assets::LABEL_SOURCE), (OptionSelect::Effect, &assets::LABEL_EFFECT)] {
            let store = store();
            store.acquire(AcquireTimeout::Forever).unwrap().set_option_selected(option);
            let mut display = RecordingDisplay::new(DISPL_TOTAL_WIDTH, DISPL_TOTAL_HEIGHT);
            draw(&store, &mut display).unwrap();

            assert!(display.texts().is_empty());
            let bitmaps: Vec<_> = display.bitmaps().cloned().collect();
            assert_eq!(bitmaps.len(), 3);
            assert_eq!(
                bitmaps[2],
                DrawCall::Bitmap { x: LABEL_X, y: LABEL_Y, width: bitmap.width, bytes: bitmap.bytes.to_vec() }
            );
        }
    }

    #[test]
    fn test_draw_before_init_fails() {
        let store = ModelStore::new();
        let mut display = RecordingDisplay::new(DISPL_TOTAL_WIDTH, DISPL_TOTAL_HEIGHT);
        let err = draw(&store, &mut display).unwrap_err();
        assert!(err.is_lock_unavailable());
        assert!(display.calls().is_empty());
        assert_eq!(tick(&store), Err(ModelError::NotInitialized));
    }

    #[test]
    fn test_display_failure_releases_guard() {
        let store = store();
        let mut display = RecordingDisplay::new(DISPL_TOTAL_WIDTH, DISPL_TOTAL_HEIGHT);
        display.fail_rect_at = Some(20);

        let err = draw(&store, &mut display).unwrap_err();
        assert!(matches!(err, RenderError::Display(_)));
        assert!(store.acquire(AcquireTimeout::IMMEDIATE).is_ok());
    }

    #[test]
    fn test_tick_leaves_model_untouched() {
        let store = store();
        store.acquire(AcquireTimeout::Forever).unwrap().set_gain(3.0);
        tick(&store).unwrap();
        let guard = store.acquire(AcquireTimeout::IMMEDIATE).unwrap();
        assert_eq!(guard.gain(), 3.0);
        assert_eq!(guard.option_selected(), OptionSelect::Gain);
    }
}
