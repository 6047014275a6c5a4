/*
 *  display/error.rs
 *
 *  hmi-panel - front panel model and bar visualizer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Error type for display capability operations
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

use thiserror::Error;

/// Unified error type for all display operations
#[derive(Debug, Error)]
pub enum DisplayError {
    /// Packed bitmap length is not a whole number of rows for its width
    #[error("invalid bitmap: width {width}, {len} bytes")]
    InvalidBitmap { width: u16, len: usize },

    /// Drawing operation failed
    #[error("drawing error: {0}")]
    DrawingError(String),

    /// Snapshot export failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
