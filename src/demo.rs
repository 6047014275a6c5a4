/*
 *  demo.rs
 *
 *  hmi-panel - front panel model and bar visualizer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Synthetic input and level producer for running without hardware
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
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::ModelError;
use crate::grid::ColumnGrid;
use crate::model::{AcquireTimeout, ModelStore, OptionSelect};

/// Steps between option changes.
const OPTION_PERIOD: u64 = 60;
/// Steps per button press cycle; a button reads pressed for the first two.
const PRESS_PERIOD: u64 = 20;

/// Plays the part of the input and level contexts.
///
/// Each step builds the next grid and button/option/gain state off-lock,
/// then writes it in one short critical section.
pub struct DemoProducer {
    rng: StdRng,
    grid: ColumnGrid,
    option: OptionSelect,
    step: u64,
    timeout: AcquireTimeout,
}

impl DemoProducer {
    pub fn new(timeout: AcquireTimeout) -> Self {
        Self::with_rng(StdRng::from_os_rng(), timeout)
    }

    /// Deterministic producer for tests
    pub fn seeded(seed: u64, timeout: AcquireTimeout) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), timeout)
    }

    fn with_rng(rng: StdRng, timeout: AcquireTimeout) -> Self {
        Self {
            rng,
            grid: ColumnGrid::new(),
            option: OptionSelect::Gain,
            step: 0,
            timeout,
        }
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    /// Random walk of every column, colored by row.
    fn advance_grid(&mut self) {
        let rows = self.grid.rows();
        for x in 0..self.grid.columns() {
            let h = self.grid.column_height(x) as i16 + self.rng.random_range(-2..=2);
            self.grid.set_column_height(x, h.clamp(0, rows as i16) as u8);
            for y in 0..rows {
                let level = (y as u32 * 255 / rows as u32) as u8;
                *self.grid.pixel_at(x, y) = Rgb888::new(255 - level, level, 32);
            }
        }
    }

    /// Produce one update and publish it to the store.
    pub fn step(&mut self, store: &ModelStore) -> Result<(), ModelError> {
        self.step += 1;
        self.advance_grid();

        let phase = self.step % PRESS_PERIOD;
        let left = phase < 2;
        let right = (PRESS_PERIOD / 2..PRESS_PERIOD / 2 + 2).contains(&phase);
        if self.step % OPTION_PERIOD == 0 {
            self.option = self.option.next();
            debug!("Demo option -> {}", self.option.name());
        }
        let gain = 1.0 + 0.5 * (self.step as f32 / 30.0).sin();

        let mut guard = store.acquire(self.timeout)?;
        guard.set_led_matrix_values(Some(&self.grid));
        guard.set_left_button_clicked(left);
        guard.set_right_button_clicked(right);
        guard.set_option_selected(self.option);
        guard.set_gain(gain);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::LED_MATRIX_ROWS;

    #[test]
    fn test_step_publishes_state() {
        let store = ModelStore::new();
        store.init().unwrap();
        let mut demo = DemoProducer::seeded(7, AcquireTimeout::IMMEDIATE);

        demo.step(&store).unwrap();
        let guard = store.acquire(AcquireTimeout::IMMEDIATE).unwrap();
        assert_eq!(*guard.grid(), demo.grid);
        assert!(guard.left_button_pressed());
        assert!(!guard.right_button_pressed());
        assert_eq!(guard.option_selected(), OptionSelect::Gain);
        assert!((guard.gain() - (1.0 + 0.5 * (1.0f32 / 30.0).sin())).abs() < 1e-6);
    }

    #[test]
    fn test_heights_stay_in_range() {
        let store = ModelStore::new();
        store.init().unwrap();
        let mut demo = DemoProducer::seeded(42, AcquireTimeout::IMMEDIATE);
        for _ in 0..200 {
            demo.step(&store).unwrap();
            let guard = store.acquire(AcquireTimeout::IMMEDIATE).unwrap();
            assert!(guard.grid().column_heights().iter().all(|&h| h as usize <= LED_MATRIX_ROWS));
        }
        assert_eq!(demo.steps(), 200);
    }

    #[test]
    fn test_option_cycles() {
        let store = ModelStore::new();
        store.init().unwrap();
        let mut demo = DemoProducer::seeded(1, AcquireTimeout::IMMEDIATE);
        for _ in 0..OPTION_PERIOD {
            demo.step(&store).unwrap();
        }
        let guard = store.acquire(AcquireTimeout::IMMEDIATE).unwrap();
        assert_eq!(guard.option_selected(), OptionSelect::Source);
    }

    #[test]
    fn test_step_fails_without_store() {
        let store = ModelStore::new();
        let mut demo = DemoProducer::seeded(1, AcquireTimeout::IMMEDIATE);
        assert_eq!(demo.step(&store), Err(ModelError::NotInitialized));
    }
}
