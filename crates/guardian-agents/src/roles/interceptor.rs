use guardian_core::{keys, AlertKind, MessageBody, MovementKind, Severity, Vec2};
use rand::Rng;

use crate::context::priority;
use crate::{AgentBody, ThinkContext};

/// | from | event | to |
/// |---|---|---|
/// | any | fresh sighting on the blackboard | `Pursuing` |
/// | `Pursuing` | within catching distance | `Capturing` |
/// | any | sighting gone stale, last-known position set | `Searching` |
/// | `Searching` | last-known position reached | `Patrolling` |
/// | any | `intercept_command` | `Pursuing` |
/// | any | `defend_base` | `Patrolling` (heading for base) |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum InterceptorState {
    #[default]
    Patrolling,
    Pursuing,
    Searching,
    Capturing,
}

#[derive(Debug, Clone, Default)]
pub struct InterceptorBrain {
    state: InterceptorState,
    last_known: Option<Vec2>,
    catch_announced: bool,
}

impl InterceptorBrain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> InterceptorState {
        self.state
    }

    pub fn last_known(&self) -> Option<Vec2> {
        self.last_known
    }

    pub fn think(&mut self, body: &mut AgentBody, ctx: &mut ThinkContext<'_>) {
        for message in ctx.inbox(body.id()) {
            match message.body {
                MessageBody::ThiefSighted { position, .. } => self.last_known = Some(position),
                MessageBody::InterceptCommand { target } => {
                    self.last_known = Some(target);
                    body.set_target(target, MovementKind::Pursue);
                    self.state = InterceptorState::Pursuing;
                }
                MessageBody::DefendBase { base } => {
                    body.set_target(base, MovementKind::ReturnHome);
                    self.state = InterceptorState::Patrolling;
                }
                _ => {}
            }
        }

        let now = ctx.tick.elapsed_seconds;
        let fresh = ctx
            .blackboard
            .read(keys::THIEF_LAST_SEEN)
            .filter(|seen| now - seen.seen_at <= ctx.rules.sighting_freshness);

        if let Some(seen) = fresh {
            self.pursue(body, ctx, seen.position);
            return;
        }

        if let Some(last) = self.last_known {
            if body.distance_to(last) < ctx.rules.pursuit_give_up {
                tracing::debug!(agent = %body.id(), "trail lost, back to patrol");
                self.last_known = None;
                self.state = InterceptorState::Patrolling;
                body.clear_target();
            } else {
                self.state = InterceptorState::Searching;
                if body.target() != Some(last) {
                    body.set_target(last, MovementKind::Pursue);
                }
                return;
            }
        }

        self.state = InterceptorState::Patrolling;
        self.catch_announced = false;
        let due = match body.target() {
            None => true,
            Some(t) => body.distance_to(t) < ctx.rules.patrol_repick_distance,
        };
        if due {
            let point = self.ring_point(body, ctx);
            body.set_target(point, MovementKind::Patrol);
        }
    }

    fn pursue(&mut self, body: &mut AgentBody, ctx: &mut ThinkContext<'_>, thief: Vec2) {
        self.last_known = Some(thief);
        body.set_target(thief, MovementKind::Pursue);
        body.consume_energy(ctx.rules.energy.pursue);

        if body.distance_to(thief) < ctx.rules.catching_distance {
            self.state = InterceptorState::Capturing;
            if !self.catch_announced {
                self.catch_announced = true;
                let me = body.id().clone();
                ctx.blackboard.post_alert(
                    AlertKind::ThiefCaught {
                        interceptor: me.clone(),
                    },
                    Severity::Critical,
                );
                let caught = MessageBody::ThiefCaught {
                    interceptor: me.clone(),
                    position: thief,
                };
                ctx.broadcast(&me, caught, priority::ALARM);
                tracing::info!(agent = %me, "thief within reach");
            }
        } else {
            self.state = InterceptorState::Pursuing;
        }
    }

    /// Random free point on the defence ring around the base.
    fn ring_point(&self, body: &AgentBody, ctx: &mut ThinkContext<'_>) -> Vec2 {
        let angle = ctx.rng.gen_range(0.0..core::f32::consts::TAU);
        let raw = ctx.base.position() + Vec2::from_angle(angle) * ctx.rules.defence_ring_radius;
        let bounds = ctx.map.bounds();
        ctx.map.nearest_free_position(bounds.clamp(raw), body.params().radius)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
