/*
 *  pacer.rs
 *
 *  hmi-panel - front panel model and bar visualizer
 *	(c) 2020-26 Stuart Hunter
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */
use std::time::{Duration, Instant};

/// Fixed-rate frame clock for the render loop.
#[derive(Debug)]
pub struct Pacer {
    next_deadline: Instant,
    frame: Duration,
}

#[inline]
fn frame_for(fps: u32) -> Duration {
    Duration::from_micros((1_000_000u32 / fps.max(1)) as u64)
}

impl Pacer {
    pub fn new(target_fps: u32) -> Self {
        Self { next_deadline: Instant::now(), frame: frame_for(target_fps) }
    }

    pub fn frame(&self) -> Duration {
        self.frame
    }

    /// Sleep until the next frame is due, then schedule the one after.
    ///
    /// Deadlines advance by whole frames so the rate does not drift; after a
    /// stall longer than a frame the schedule restarts from now instead of
    /// bursting to catch up.
    pub fn wait(&mut self) {
        let now = Instant::now();
        if self.next_deadline > now {
            std::thread::sleep(self.next_deadline - now);
            self.next_deadline += self.frame;
        } else if now - self.next_deadline > self.frame {
            self.next_deadline = now + self.frame;
        } else {
            self.next_deadline += self.frame;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_duration() {
        assert_eq!(Pacer::new(50).frame(), Duration::from_millis(20));
        // zero fps is treated as 1
        assert_eq!(Pacer::new(0).frame(), Duration::from_secs(1));
        assert_eq!(Pacer::new(100).frame(), Duration::from_millis(10));
    }

    #[test]
    fn test_wait_paces_frames() {
        let mut pacer = Pacer::new(100);
        let start = Instant::now();
        for _ in 0..4 {
            pacer.wait();
        }
        // first wait is immediate, three more frames of 10ms follow
        assert!(start.elapsed() >= Duration::from_millis(25));
    }
}
