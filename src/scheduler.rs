/*
 *  scheduler.rs
 *
 *  hmi-panel - front panel model and bar visualizer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Periodic tick/draw loop for the rendering context
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

use log::{error, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::display::traits::GraphicsDisplay;
use crate::model::ModelStore;
use crate::pacer::Pacer;
use crate::render::{draw, tick};

/// Counters kept by the display loop
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoopStats {
    pub frames_drawn: u64,
    pub frames_skipped: u64,
    pub ticks_skipped: u64,
}

/// Drives `tick` then `draw` once per frame.
///
/// A frame that cannot reach the model or whose display calls fail is
/// logged and skipped; the next frame is the retry.
pub struct DisplayLoop {
    store: Arc<ModelStore>,
    pacer: Pacer,
    frame_limit: Option<u64>,
    stop: Arc<AtomicBool>,
    stats: LoopStats,
}

impl DisplayLoop {
    pub fn new(store: Arc<ModelStore>, target_fps: u32) -> Self {
        Self {
            store,
            pacer: Pacer::new(target_fps),
            frame_limit: None,
            stop: Arc::new(AtomicBool::new(false)),
            stats: LoopStats::default(),
        }
    }

    /// Stop after `frames` attempted frames; 0 means no limit.
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = (frames > 0).then_some(frames);
        self
    }

    /// Flag that ends `run` at the next frame boundary when set.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    /// One tick plus one frame, no pacing.
    pub fn step<D: GraphicsDisplay + ?Sized>(&mut self, display: &mut D) {
        if let Err(e) = tick(&self.store) {
            warn!("Tick skipped: {}", e);
            self.stats.ticks_skipped += 1;
        }

        match draw(&self.store, display) {
            Ok(()) => self.stats.frames_drawn += 1,
            Err(e) if e.is_lock_unavailable() => {
                warn!("Frame skipped: {}", e);
                self.stats.frames_skipped += 1;
            }
            Err(e) => {
                error!("Failed to render frame: {}", e);
                self.stats.frames_skipped += 1;
            }
        }
    }

    fn done(&self) -> bool {
        if self.stop.load(Ordering::Relaxed) {
            return true;
        }
        match self.frame_limit {
            Some(limit) => self.stats.frames_drawn + self.stats.frames_skipped >= limit,
            None => false,
        }
    }

    /// Run paced frames until stopped or the frame limit is reached.
    pub fn run<D: GraphicsDisplay + ?Sized>(&mut self, display: &mut D) -> LoopStats {
        info!("Display loop started ({:?} per frame)", self.pacer.frame());
        while !self.done() {
            self.pacer.wait();
            self.step(display);
        }
        info!(
            "Display loop finished: {} drawn, {} skipped",
            self.stats.frames_drawn, self.stats.frames_skipped
        );
        self.stats
    }
}
