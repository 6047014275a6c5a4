/*
 *  lib.rs
 *
 *  hmi-panel - front panel model and bar visualizer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Shared UI model, its access guard and the panel renderer
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
//! Front panel model for a button + bar-graph device.
//!
//! One [`ModelStore`] is created at start-up and shared by `Arc` between the
//! input, level and rendering contexts. Every read and write goes through a
//! [`ModelGuard`] obtained from [`ModelStore::acquire`]; [`render::draw`]
//! turns the guarded state into primitives on a [`GraphicsDisplay`].

pub mod config;
pub mod constants;
pub mod demo;
pub mod display;
pub mod error;
pub mod grid;
pub mod model;
pub mod pacer;
pub mod render;
pub mod scheduler;

pub use display::{FrameBufferDisplay, GraphicsDisplay, RecordingDisplay};
pub use error::{ModelError, RenderError};
pub use grid::ColumnGrid;
pub use model::{AcquireTimeout, ModelGuard, ModelSnapshot, ModelStore, OptionSelect};
pub use render::{draw, tick};
pub use scheduler::{DisplayLoop, LoopStats};
