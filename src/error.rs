/*
 *  error.rs
 *
 *  hmi-panel - front panel model and bar visualizer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Error types for model access and rendering
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

use std::time::Duration;
use thiserror::Error;

use crate::display::error::DisplayError;

/// Failure to reach the shared model.
///
/// Both lock failures are recoverable: periodic callers skip the cycle and
/// try again on the next one.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ModelError {
    /// `acquire` was called before `init`
    #[error("model not initialized")]
    NotInitialized,

    /// `init` was called a second time
    #[error("model already initialized")]
    AlreadyInitialized,

    /// Another context held the lock for the whole wait
    #[error("model lock not acquired within {0:?}")]
    Timeout(Duration),
}

/// Error raised by a render pass.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("model unavailable: {0}")]
    Model(#[from] ModelError),

    #[error("display error: {0}")]
    Display(#[from] DisplayError),
}

impl RenderError {
    /// Lock contention or start-up ordering, as opposed to a display fault.
    pub fn is_lock_unavailable(&self) -> bool {
        matches!(self, RenderError::Model(_))
    }
}
