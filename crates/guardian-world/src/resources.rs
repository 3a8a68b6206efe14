//! The pool of collectible resources.
//!
//! Every mutation goes through one mutex, so collection is exactly-once: of two concurrent
//! attempts on the same resource, only the one that removes it from the active set succeeds.

use core::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use guardian_core::{geometry, Vec2};
use guardian_nav::GameMap;
use rand::Rng;

const SPAWN_ATTEMPTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ResourceId(pub u64);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "resource_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resource {
    pub id: ResourceId,
    pub position: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PoolConfig {
    pub initial: u32,
    pub max_on_map: u32,
    /// Spawn probability per eligible tick.
    pub spawn_rate: f64,
    /// Ticks that must pass since the last spawn before another is attempted.
    pub spawn_interval: u32,
    /// Minimum distance of a spawn from the world edge.
    pub spawn_margin: f32,
    pub resource_radius: f32,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial: 10,
            max_on_map: 10,
            spawn_rate: 0.008,
            spawn_interval: 60,
            spawn_margin: 50.0,
            resource_radius: 8.0,
        }
    }
}

#[derive(Debug, Default)]
struct PoolInner {
    active: Vec<Resource>,
    next_id: u64,
    spawn_timer: u32,
    spawned_total: u32,
    collected_total: u32,
}

impl PoolInner {
    fn insert(&mut self, position: Vec2) -> Resource {
        let resource = Resource {
            id: ResourceId(self.next_id),
            position,
        };
        self.next_id += 1;
        self.spawned_total += 1;
        self.active.push(resource);
        resource
    }

    fn take(&mut self, index: usize) -> Resource {
        self.collected_total += 1;
        self.active.remove(index)
    }
}

#[derive(Debug)]
pub struct ResourcePool {
    config: PoolConfig,
    inner: Mutex<PoolInner>,
}

impl ResourcePool {
    pub fn new(config: PoolConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(PoolInner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PoolInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Spawn the initial resources; returns how many found a free spot.
    pub fn seed<R: Rng + ?Sized>(&self, map: &GameMap, rng: &mut R) -> usize {
        let spawned = (0..self.config.initial)
            .filter(|_| self.spawn(map, rng).is_some())
            .count();
        tracing::debug!(spawned, requested = self.config.initial, "resource pool seeded");
        spawned
    }

    /// Per-tick spawn attempt: once the timer exceeds the interval and the map is below its cap,
    /// spawn with probability `spawn_rate`.
    pub fn update<R: Rng + ?Sized>(&self, map: &GameMap, rng: &mut R) -> Option<Resource> {
        let mut inner = self.lock();
        inner.spawn_timer += 1;
        if inner.spawn_timer <= self.config.spawn_interval
            || inner.active.len() >= self.config.max_on_map as usize
            || rng.gen::<f64>() >= self.config.spawn_rate
        {
            return None;
        }
        let position = self.free_spot(map, rng)?;
        inner.spawn_timer = 0;
        let resource = inner.insert(position);
        tracing::debug!(id = %resource.id, x = position.x, y = position.y, "resource spawned");
        Some(resource)
    }

    /// Place one resource at a random free spot, if one is found within a few attempts.
    pub fn spawn<R: Rng + ?Sized>(&self, map: &GameMap, rng: &mut R) -> Option<Resource> {
        let position = self.free_spot(map, rng)?;
        Some(self.lock().insert(position))
    }

    /// Place a resource at an explicit position.
    pub fn insert(&self, position: Vec2) -> Resource {
        self.lock().insert(position)
    }

    fn free_spot<R: Rng + ?Sized>(&self, map: &GameMap, rng: &mut R) -> Option<Vec2> {
        (0..SPAWN_ATTEMPTS)
            .map(|_| geometry::random_position(rng, map.bounds(), self.config.spawn_margin))
            .map(|p| Vec2::new(p.x.round(), p.y.round()))
            .find(|&p| !map.is_blocked(p, self.config.resource_radius))
    }

    /// Remove the resource with `id`. `false` when it is already gone.
    pub fn collect(&self, id: ResourceId) -> bool {
        let mut inner = self.lock();
        match inner.active.iter().position(|r| r.id == id) {
            Some(index) => {
                inner.take(index);
                true
            }
            None => false,
        }
    }

    /// Find and remove the first resource strictly within `radius` of `position` in one step.
    pub fn collect_near(&self, position: Vec2, radius: f32) -> Option<Resource> {
        let mut inner = self.lock();
        let index = inner
            .active
            .iter()
            .position(|r| r.position.distance(position) < radius)?;
        Some(inner.take(index))
    }

    /// Undo a collection whose unit could not be carried. The resource keeps its id; a resource
    /// that is already active is left alone.
    pub fn restore(&self, resource: Resource) {
        let mut inner = self.lock();
        if inner.active.iter().any(|r| r.id == resource.id) {
            return;
        }
        inner.collected_total = inner.collected_total.saturating_sub(1);
        inner.active.push(resource);
    }

    pub fn resource_near(&self, position: Vec2, radius: f32) -> Option<Resource> {
        self.lock()
            .active
            .iter()
            .find(|r| r.position.distance(position) < radius)
            .copied()
    }

    pub fn in_area(&self, center: Vec2, radius: f32) -> Vec<Resource> {
        self.lock()
            .active
            .iter()
            .filter(|r| r.position.distance(center) < radius)
            .copied()
            .collect()
    }

    pub fn nearest(&self, position: Vec2) -> Option<Resource> {
        self.lock()
            .active
            .iter()
            .min_by(|a, b| {
                a.position
                    .distance(position)
                    .total_cmp(&b.position.distance(position))
            })
            .copied()
    }

    pub fn active(&self) -> Vec<Resource> {
        self.lock().active.clone()
    }

    pub fn positions(&self) -> Vec<Vec2> {
        self.lock().active.iter().map(|r| r.position).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().active.is_empty()
    }

    /// Every resource ever placed, seeding included.
    pub fn spawned_total(&self) -> u32 {
        self.lock().spawned_total
    }

    pub fn collected_total(&self) -> u32 {
        self.lock().collected_total
    }

    pub fn reset(&self) {
        *self.lock() = PoolInner::default();
    }
}
