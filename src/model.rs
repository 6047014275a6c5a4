/*
 *  model.rs
 *
 *  hmi-panel - front panel model and bar visualizer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Shared UI model and its scoped access guard
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

use log::{info, trace, warn};
use parking_lot::{Mutex, MutexGuard};
use std::sync::OnceLock;
use std::time::Duration;

use crate::error::ModelError;
use crate::grid::ColumnGrid;

/// Option currently selected with the front buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptionSelect {
    #[default]
    Gain,
    Source,
    Effect,
}

impl OptionSelect {
    /// Next option in front-panel order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            OptionSelect::Gain => OptionSelect::Source,
            OptionSelect::Source => OptionSelect::Effect,
            OptionSelect::Effect => OptionSelect::Gain,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OptionSelect::Gain => "gain",
            OptionSelect::Source => "source",
            OptionSelect::Effect => "effect",
        }
    }
}

/// How long `acquire` may block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireTimeout {
    /// Block until the lock is free.
    Forever,
    /// Give up after the duration; `Duration::ZERO` never blocks.
    After(Duration),
}

impl AcquireTimeout {
    pub const IMMEDIATE: AcquireTimeout = AcquireTimeout::After(Duration::ZERO);

    pub fn from_millis(ms: u64) -> Self {
        AcquireTimeout::After(Duration::from_millis(ms))
    }
}

/// The shared UI state. Only reachable through a [`ModelGuard`].
#[derive(Debug, Clone)]
struct Model {
    led_matrix: ColumnGrid,
    left_clicked: bool,
    right_clicked: bool,
    gain: f32,
    option_selected: OptionSelect,
}

impl Default for Model {
    fn default() -> Self {
        let mut led_matrix = ColumnGrid::new();
        led_matrix.clear();
        Self {
            led_matrix,
            left_clicked: false,
            right_clicked: false,
            gain: 1.0,
            option_selected: OptionSelect::Gain,
        }
    }
}

/// Copy of the scalar model fields, taken under the guard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelSnapshot {
    pub left_button_pressed: bool,
    pub right_button_pressed: bool,
    pub option_selected: OptionSelect,
    pub gain: f32,
}

/// Owner of the model and of the single lock serializing access to it.
///
/// The store is built empty; [`ModelStore::init`] creates the model once at
/// start-up. Share it between execution contexts with an `Arc`.
///
/// The lock is not re-entrant: acquiring twice from the same context without
/// dropping the first guard deadlocks.
#[derive(Debug, Default)]
pub struct ModelStore {
    model: OnceLock<Mutex<Model>>,
}

impl ModelStore {
    /// An uninitialized store; every `acquire` fails until `init`.
    pub fn new() -> Self {
        Self { model: OnceLock::new() }
    }

    /// Create the lock and the default model. Must run exactly once.
    pub fn init(&self) -> Result<(), ModelError> {
        self.model
            .set(Mutex::new(Model::default()))
            .map_err(|_| {
                warn!("Model init called twice, keeping existing model");
                ModelError::AlreadyInitialized
            })?;
        info!("Model just created!");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.model.get().is_some()
    }

    /// Obtain exclusive access to the model.
    ///
    /// Fails with [`ModelError::NotInitialized`] before `init` and with
    /// [`ModelError::Timeout`] when the lock stays held for the whole wait.
    /// The lock is released when the returned guard is dropped.
    pub fn acquire(&self, timeout: AcquireTimeout) -> Result<ModelGuard<'_>, ModelError> {
        let Some(mutex) = self.model.get() else {
            warn!("Failed acquiring model interface. Reason: not initialized");
            return Err(ModelError::NotInitialized);
        };

        let inner = match timeout {
            AcquireTimeout::Forever => Some(mutex.lock()),
            AcquireTimeout::After(wait) if wait.is_zero() => mutex.try_lock(),
            AcquireTimeout::After(wait) => mutex.try_lock_for(wait),
        };

        match inner {
            Some(inner) => {
                trace!("Model acquired");
                Ok(ModelGuard { inner })
            }
            None => {
                let waited = match timeout {
                    AcquireTimeout::After(wait) => wait,
                    AcquireTimeout::Forever => Duration::MAX,
                };
                warn!("Failed acquiring model interface. Reason: lock held for {:?}", waited);
                Err(ModelError::Timeout(waited))
            }
        }
    }
}

/// Scoped exclusive access to the model.
///
/// This is the model's whole operation surface: setters for the producers and
/// read accessors for the renderer. Dropping the guard releases the lock, so
/// early returns and `?` paths cannot leak it.
pub struct ModelGuard<'a> {
    inner: MutexGuard<'a, Model>,
}

impl ModelGuard<'_> {
    /// Replace the whole grid with a copy of `grid`. `None` leaves it untouched.
    pub fn set_led_matrix_values(&mut self, grid: Option<&ColumnGrid>) {
        if let Some(grid) = grid {
            self.inner.led_matrix = *grid;
        }
    }

    pub fn set_left_button_clicked(&mut self, clicked: bool) {
        self.inner.left_clicked = clicked;
    }

    pub fn set_right_button_clicked(&mut self, clicked: bool) {
        self.inner.right_clicked = clicked;
    }

    /// Reserved for a middle button; the current hardware has none.
    pub fn set_middle_button_clicked(&mut self, _clicked: bool) {}

    pub fn set_option_selected(&mut self, option: OptionSelect) {
        self.inner.option_selected = option;
    }

    /// Store the gain as given. No clamping; NaN and infinities pass through.
    pub fn set_gain(&mut self, gain: f32) {
        self.inner.gain = gain;
    }

    pub fn grid(&self) -> &ColumnGrid {
        &self.inner.led_matrix
    }

    pub fn left_button_pressed(&self) -> bool {
        self.inner.left_clicked
    }

    pub fn right_button_pressed(&self) -> bool {
        self.inner.right_clicked
    }

    pub fn option_selected(&self) -> OptionSelect {
        self.inner.option_selected
    }

    pub fn gain(&self) -> f32 {
        self.inner.gain
    }

    pub fn snapshot(&self) -> ModelSnapshot {
        ModelSnapshot {
            left_button_pressed: self.inner.left_clicked,
            right_button_pressed: self.inner.right_clicked,
            option_selected: self.inner.option_selected,
            gain: self.inner.gain,
        }
    }

    /// Release the lock now rather than at end of scope.
    pub fn release(self) {}
}

impl Drop for ModelGuard<'_> {
    fn drop(&mut self) {
        trace!("Model released");
    }
}
