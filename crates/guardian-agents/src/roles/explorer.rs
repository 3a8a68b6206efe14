use std::collections::BTreeSet;

use guardian_core::{Bounds, MessageBody, MovementKind, Role, Vec2};
use rand::Rng;

use crate::context::priority;
use crate::{AgentBody, Observation, ObservationReport, ThinkContext};

/// Map quarter an explorer surveys before it starts roaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Quadrant {
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NorthWest,
        Quadrant::NorthEast,
        Quadrant::SouthWest,
        Quadrant::SouthEast,
    ];

    pub fn center(self, bounds: Bounds) -> Vec2 {
        let (qx, qy) = (bounds.width * 0.25, bounds.height * 0.25);
        match self {
            Quadrant::NorthWest => Vec2::new(qx, qy),
            Quadrant::NorthEast => Vec2::new(3.0 * qx, qy),
            Quadrant::SouthWest => Vec2::new(qx, 3.0 * qy),
            Quadrant::SouthEast => Vec2::new(3.0 * qx, 3.0 * qy),
        }
    }
}

/// | from | event | to |
/// |---|---|---|
/// | any | `scan_zone` command | `Scanning` |
/// | `SelectingZone` | unvisited quadrant left | `Surveying` |
/// | `SelectingZone` | all quadrants visited | `Roaming` |
/// | `Surveying` / `Scanning` | target reached | `SelectingZone` |
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "state", rename_all = "snake_case"))]
pub enum ExplorerState {
    #[default]
    SelectingZone,
    Surveying {
        quadrant: Quadrant,
    },
    Scanning {
        center: Vec2,
    },
    Roaming,
}

#[derive(Debug, Clone, Default)]
pub struct ExplorerBrain {
    state: ExplorerState,
    visited: BTreeSet<Quadrant>,
    sighting_cooldown: u32,
    reported: BTreeSet<(u32, u32)>,
}

impl ExplorerBrain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ExplorerState {
        self.state
    }

    pub fn visited(&self) -> usize {
        self.visited.len()
    }

    pub fn sighting_cooldown(&self) -> u32 {
        self.sighting_cooldown
    }

    pub fn think(&mut self, body: &mut AgentBody, ctx: &mut ThinkContext<'_>) {
        self.sighting_cooldown = self.sighting_cooldown.saturating_sub(1);
        let bounds = ctx.map.bounds();
        let radius = body.params().radius;

        for message in ctx.inbox(body.id()) {
            if let MessageBody::ScanZone { center } = message.body {
                let spot = ctx.map.nearest_free_position(bounds.clamp(center), radius);
                body.set_target(spot, MovementKind::Patrol);
                self.state = ExplorerState::Scanning { center: spot };
                tracing::debug!(agent = %body.id(), x = spot.x, y = spot.y, "scan zone");
            }
        }

        match self.state {
            ExplorerState::SelectingZone => self.select_zone(body, ctx),
            ExplorerState::Surveying { quadrant } => {
                if body.target().is_none() {
                    self.visited.insert(quadrant);
                    self.state = ExplorerState::SelectingZone;
                }
            }
            ExplorerState::Scanning { .. } => {
                if body.target().is_none() {
                    self.state = ExplorerState::SelectingZone;
                }
            }
            ExplorerState::Roaming => {
                if body.target().is_none() {
                    let point = ctx.map.random_free_position(
                        &mut *ctx.rng,
                        radius,
                        ctx.rules.roam_margin,
                    );
                    body.set_target(point, MovementKind::Patrol);
                }
            }
        }

        if ctx.rng.gen_bool(ctx.rules.exploration_report_chance.clamp(0.0, 1.0)) {
            if let Some(coordinator) = ctx.roster.coordinator() {
                let body_msg = MessageBody::ExplorationUpdate {
                    explorer: body.id().clone(),
                    position: body.position(),
                    explored_zones: self.visited.len() as u32,
                };
                ctx.send_to(body.id(), coordinator, body_msg, priority::ROUTINE);
            }
        }
    }

    fn select_zone(&mut self, body: &mut AgentBody, ctx: &mut ThinkContext<'_>) {
        let next = Quadrant::ALL
            .into_iter()
            .find(|q| !self.visited.contains(q));
        match next {
            Some(quadrant) => {
                let center = quadrant.center(ctx.map.bounds());
                let spot = ctx.map.nearest_free_position(center, body.params().radius);
                body.set_target(spot, MovementKind::Patrol);
                self.state = ExplorerState::Surveying { quadrant };
            }
            None => {
                tracing::debug!(agent = %body.id(), "all quadrants surveyed, roaming");
                self.state = ExplorerState::Roaming;
            }
        }
    }

    /// Report newly seen resources and, cooldown permitting, the evader.
    pub fn observe(
        &mut self,
        body: &mut AgentBody,
        ctx: &mut ThinkContext<'_>,
        observation: &Observation<'_>,
    ) -> ObservationReport {
        let mut report = ObservationReport::default();
        let me = body.id().clone();
        let collector = ctx.roster.primary(Role::Collector).cloned();

        for resource in observation.resources {
            let position = resource.position;
            if !body.can_see(position) {
                continue;
            }
            if !self.reported.insert((position.x.to_bits(), position.y.to_bits())) {
                continue;
            }
            ctx.blackboard.add_resource_location(position);
            if let Some(collector) = &collector {
                let found = MessageBody::ResourceFound {
                    position,
                    explorer: me.clone(),
                };
                ctx.send_to(&me, collector, found, priority::ROUTINE);
            }
            let discovered = MessageBody::ResourceDiscovered {
                position,
                explorer: me.clone(),
            };
            ctx.broadcast(&me, discovered, priority::ROUTINE);
            body.consume_energy(ctx.rules.energy.report);
            report.resources_reported += 1;
        }

        let thief = observation.evader_position;
        if observation.evader_visible && self.sighting_cooldown == 0 && body.can_see(thief) {
            ctx.blackboard.update_thief_position(thief, &me);
            let sighted = MessageBody::ThiefSighted {
                position: thief,
                observer: me.clone(),
                seen_at: ctx.tick.elapsed_seconds,
            };
            if let Some(coordinator) = ctx.roster.coordinator() {
                ctx.send_to(&me, coordinator, sighted.clone(), priority::SIGHTING);
            }
            ctx.broadcast(&me, sighted, priority::SIGHTING);
            body.consume_energy(ctx.rules.energy.report);
            self.sighting_cooldown = ctx.rules.sighting_cooldown;
            report.sighted = true;
            tracing::debug!(agent = %me, x = thief.x, y = thief.y, "thief sighted");
        }

        report
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
