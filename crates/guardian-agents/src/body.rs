//! Role-independent agent state and movement.

use guardian_core::geometry::distance;
use guardian_core::{AgentId, MovementKind, Role, Vec2};
use guardian_nav::{escape_point, Maneuver, SteeringState, StuckConfig, StuckDetector};

use crate::MoveContext;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AgentParams {
    pub speed: f32,
    pub radius: f32,
    pub vision_radius: f32,
    pub communication_radius: f32,
    pub energy_max: f32,
    /// Energy regained per tick.
    pub energy_regen: f32,
    /// Inventory capacity; `0` for roles that never carry.
    pub capacity: u32,
}

impl Default for AgentParams {
    fn default() -> Self {
        Self {
            speed: 1.5,
            radius: 12.0,
            vision_radius: 90.0,
            communication_radius: 300.0,
            energy_max: 100.0,
            energy_regen: 0.5,
            capacity: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AgentBody {
    id: AgentId,
    role: Role,
    params: AgentParams,
    home: Vec2,
    position: Vec2,
    target: Option<Vec2>,
    movement: MovementKind,
    carrying: u32,
    energy: f32,
    active: bool,
    pinned: bool,
    steering: SteeringState,
    stuck: StuckDetector,
}

impl AgentBody {
    pub fn new(
        id: AgentId,
        role: Role,
        position: Vec2,
        params: AgentParams,
        stuck: StuckConfig,
    ) -> Self {
        Self {
            id,
            role,
            params,
            home: position,
            position,
            target: None,
            movement: MovementKind::Patrol,
            carrying: 0,
            energy: params.energy_max,
            active: true,
            pinned: false,
            steering: SteeringState::default(),
            stuck: StuckDetector::new(stuck),
        }
    }

    /// Keep the body at its spawn point; it never moves or patrols.
    pub fn pinned(mut self) -> Self {
        self.pinned = true;
        self
    }

    pub fn id(&self) -> &AgentId {
        &self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn params(&self) -> &AgentParams {
        &self.params
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn home(&self) -> Vec2 {
        self.home
    }

    pub fn target(&self) -> Option<Vec2> {
        self.target
    }

    pub fn movement(&self) -> MovementKind {
        self.movement
    }

    pub fn carrying(&self) -> u32 {
        self.carrying
    }

    pub fn is_full(&self) -> bool {
        self.carrying >= self.params.capacity
    }

    pub fn energy(&self) -> f32 {
        self.energy
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn stuck_counter(&self) -> u32 {
        self.stuck.counter()
    }

    /// Record a destination. `kind` is bookkeeping only; steering ignores it.
    pub fn set_target(&mut self, target: Vec2, kind: MovementKind) {
        if !target.is_finite() {
            return;
        }
        if self.target != Some(target) {
            self.steering.clear();
        }
        self.target = Some(target);
        self.movement = kind;
    }

    pub fn clear_target(&mut self) {
        self.target = None;
        self.steering.clear();
    }

    pub fn distance_to(&self, p: Vec2) -> f32 {
        distance(self.position, p)
    }

    pub fn can_see(&self, p: Vec2) -> bool {
        self.distance_to(p) <= self.params.vision_radius
    }

    pub fn can_communicate(&self, p: Vec2) -> bool {
        self.distance_to(p) <= self.params.communication_radius
    }

    pub fn consume_energy(&mut self, amount: f32) {
        self.energy = (self.energy - amount).max(0.0);
    }

    pub fn restore_energy(&mut self, amount: f32) {
        self.energy = (self.energy + amount).min(self.params.energy_max);
    }

    /// Add one unit to the inventory. `false` when already at capacity.
    pub fn pick_up(&mut self) -> bool {
        if self.is_full() {
            return false;
        }
        self.carrying += 1;
        true
    }

    /// Empty the inventory, returning what was carried.
    pub fn unload(&mut self) -> u32 {
        std::mem::take(&mut self.carrying)
    }

    /// One movement tick: stuck check, then a steering step toward the target (or a fresh patrol
    /// target when there is none), then energy regeneration.
    pub fn update(&mut self, ctx: &mut MoveContext<'_>) -> Option<Maneuver> {
        if !self.active {
            return None;
        }
        if self.pinned {
            self.position = self.home;
            self.target = None;
            self.restore_energy(self.params.energy_regen);
            return None;
        }

        if self.stuck.record(self.position) {
            let escape = escape_point(
                &mut *ctx.rng,
                self.position,
                self.stuck.config().escape_distance,
                ctx.map.bounds(),
            );
            tracing::debug!(agent = %self.id, x = escape.x, y = escape.y, "stuck, escaping");
            self.set_target(escape, MovementKind::Patrol);
        }

        let maneuver = match self.target {
            Some(target) => {
                let step = ctx.steering.step(
                    &mut self.steering,
                    ctx.map,
                    self.position,
                    target,
                    self.params.speed,
                    self.params.radius,
                );
                self.position = step.position;
                if step.arrived() {
                    self.target = None;
                }
                Some(step.maneuver)
            }
            None => {
                self.patrol(ctx);
                None
            }
        };

        self.restore_energy(self.params.energy_regen);
        maneuver
    }

    /// Pick a random reachable patrol point when idle or close to the current one.
    pub fn patrol(&mut self, ctx: &mut MoveContext<'_>) {
        let due = match self.target {
            None => true,
            Some(t) => self.distance_to(t) < ctx.rules.patrol_repick_distance,
        };
        if due {
            let point = ctx.map.random_free_position(
                &mut *ctx.rng,
                ctx.steering.buffer(self.params.radius),
                ctx.rules.patrol_margin,
            );
            self.set_target(point, MovementKind::Patrol);
        }
    }

    /// Move the body without steering. Used by scripted scenarios.
    pub fn place(&mut self, position: Vec2) {
        self.position = position;
        self.steering.clear();
    }

    pub fn reset(&mut self) {
        self.position = self.home;
        self.target = None;
        self.movement = MovementKind::Patrol;
        self.carrying = 0;
        self.energy = self.params.energy_max;
        self.active = true;
        self.steering.clear();
        self.stuck.reset();
    }
}
