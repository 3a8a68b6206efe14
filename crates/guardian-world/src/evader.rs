//! The human-controlled thief.
//!
//! Input arrives already resolved into a velocity and a stealth trigger; the evader applies it
//! against the map, ticks its stealth timers and moves resources between the base, its own
//! inventory and the hideout.

use guardian_core::Vec2;
use guardian_nav::GameMap;

use crate::{BaseCamp, Hideout};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EvaderConfig {
    pub speed: f32,
    pub radius: f32,
    pub capacity: u32,
    /// Stealth length in ticks.
    pub stealth_duration: u32,
    /// Ticks after stealth ends before it can be activated again.
    pub stealth_cooldown: u32,
}

impl Default for EvaderConfig {
    fn default() -> Self {
        Self {
            speed: 5.0,
            radius: 15.0,
            capacity: 3,
            stealth_duration: 180,
            stealth_cooldown: 300,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EvaderInput {
    /// Intended displacement for this tick; each axis is clamped to the evader's speed.
    pub velocity: Vec2,
    pub activate_stealth: bool,
}

impl EvaderInput {
    pub fn idle() -> Self {
        Self::default()
    }

    /// Full-speed move along `direction` (normalised here).
    pub fn toward(direction: Vec2, speed: f32) -> Self {
        Self {
            velocity: direction.normalize_or_zero() * speed,
            activate_stealth: false,
        }
    }

    pub fn with_stealth(mut self) -> Self {
        self.activate_stealth = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Evader {
    config: EvaderConfig,
    spawn: Vec2,
    position: Vec2,
    carrying: u32,
    stealth_timer: u32,
    stealth_cooldown: u32,
    secured_total: u32,
}

impl Evader {
    pub fn new(config: EvaderConfig, spawn: Vec2) -> Self {
        Self {
            config,
            spawn,
            position: spawn,
            carrying: 0,
            stealth_timer: 0,
            stealth_cooldown: 0,
            secured_total: 0,
        }
    }

    pub fn config(&self) -> &EvaderConfig {
        &self.config
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn radius(&self) -> f32 {
        self.config.radius
    }

    pub fn carrying(&self) -> u32 {
        self.carrying
    }

    pub fn has_room(&self) -> bool {
        self.carrying < self.config.capacity
    }

    /// Total ever secured at the hideout by this evader.
    pub fn secured_total(&self) -> u32 {
        self.secured_total
    }

    pub fn is_stealthed(&self) -> bool {
        self.stealth_timer > 0
    }

    pub fn is_visible(&self) -> bool {
        !self.is_stealthed()
    }

    pub fn stealth_ready(&self) -> bool {
        !self.is_stealthed() && self.stealth_cooldown == 0
    }

    pub fn stealth_remaining(&self) -> u32 {
        self.stealth_timer
    }

    pub fn stealth_cooldown(&self) -> u32 {
        self.stealth_cooldown
    }

    /// Apply one tick of input. A move whose destination overlaps an obstacle is dropped.
    pub fn apply(&mut self, input: EvaderInput, map: &GameMap) {
        if input.activate_stealth && self.stealth_ready() {
            self.stealth_timer = self.config.stealth_duration;
            tracing::debug!(ticks = self.stealth_timer, "stealth activated");
        }

        let speed = self.config.speed;
        let v = input.velocity;
        if v.is_finite() {
            let v = Vec2::new(v.x.clamp(-speed, speed), v.y.clamp(-speed, speed));
            let next = self.position + v;
            if !map.is_blocked(next, self.config.radius) {
                self.position = map.bounds().clamp(next);
            }
        }

        if self.stealth_timer > 0 {
            self.stealth_timer -= 1;
            if self.stealth_timer == 0 {
                self.stealth_cooldown = self.config.stealth_cooldown;
            }
        } else if self.stealth_cooldown > 0 {
            self.stealth_cooldown -= 1;
        }
    }

    /// Take up to `max` resources from the base, bounded by free capacity and by what the base
    /// actually holds. Returns the number taken.
    pub fn steal_from(&mut self, base: &BaseCamp, max: u32) -> u32 {
        let room = self.config.capacity.saturating_sub(self.carrying);
        if room == 0 || max == 0 {
            return 0;
        }
        let taken = base.take(room.min(max));
        self.carrying += taken;
        taken
    }

    /// Drop everything carried into the hideout. Returns the number secured.
    pub fn secure_at(&mut self, hideout: &Hideout) -> u32 {
        if self.carrying == 0 {
            return 0;
        }
        let count = std::mem::take(&mut self.carrying);
        hideout.secure(count);
        self.secured_total += count;
        count
    }

    /// Move without collision checks (clamped to the world); for scripted scenarios.
    pub fn place(&mut self, position: Vec2, map: &GameMap) {
        self.position = map.bounds().clamp(position);
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.config, self.spawn);
    }
}
