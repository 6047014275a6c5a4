/*
 *  display/mod.rs
 *
 *  hmi-panel - front panel model and bar visualizer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display capability, backends and panel assets
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

// Core trait definitions
pub mod traits;
pub mod error;

// Backends
pub mod framebuffer;
pub mod drivers;

// Static glyph art
pub mod assets;

// Re-exports for convenience
pub use traits::GraphicsDisplay;
pub use error::DisplayError;
pub use framebuffer::FrameBufferDisplay;
pub use drivers::{DrawCall, RecordingDisplay};
pub use assets::Bitmap;
