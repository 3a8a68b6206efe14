use std::collections::VecDeque;

use guardian_core::geometry::random_direction;
use guardian_core::{Bounds, Vec2};
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StuckConfig {
    /// Number of recent positions kept.
    pub window: usize,
    /// Oldest-to-newest displacement below which a full window counts as stuck.
    pub threshold: f32,
    /// Escape fires once the stuck counter exceeds this.
    pub trigger: u32,
    pub escape_distance: f32,
}

impl Default for StuckConfig {
    fn default() -> Self {
        Self {
            window: 30,
            threshold: 8.0,
            trigger: 10,
            escape_distance: 200.0,
        }
    }
}

/// Sliding-window displacement check.
#[derive(Debug, Clone)]
pub struct StuckDetector {
    config: StuckConfig,
    recent: VecDeque<Vec2>,
    counter: u32,
}

impl StuckDetector {
    pub fn new(config: StuckConfig) -> Self {
        Self {
            recent: VecDeque::with_capacity(config.window + 1),
            config,
            counter: 0,
        }
    }

    pub fn config(&self) -> &StuckConfig {
        &self.config
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Record this tick's position. Returns `true` when an escape is due; the counter is reset
    /// in that case so the next escape needs another full run of stuck ticks.
    pub fn record(&mut self, position: Vec2) -> bool {
        self.recent.push_back(position);
        while self.recent.len() > self.config.window {
            self.recent.pop_front();
        }

        if self.config.window > 0 && self.recent.len() >= self.config.window {
            let oldest = self.recent.front().copied().unwrap_or(position);
            if oldest.distance(position) < self.config.threshold {
                self.counter += 1;
            } else {
                self.counter = 0;
            }
        }

        if self.counter > self.config.trigger {
            self.counter = 0;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.recent.clear();
        self.counter = 0;
    }
}

/// Point `distance` away from `from` along a uniformly random bearing, clamped to `bounds`.
pub fn escape_point<R: Rng + ?Sized>(
    rng: &mut R,
    from: Vec2,
    distance: f32,
    bounds: Bounds,
) -> Vec2 {
    bounds.clamp(from + random_direction(rng) * distance)
}
