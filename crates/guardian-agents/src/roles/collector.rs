use guardian_core::geometry::distance;
use guardian_core::{MessageBody, MovementKind, Vec2};

use crate::context::priority;
use crate::{AgentBody, ThinkContext};

/// | from | event | to |
/// |---|---|---|
/// | any | `base_breached` | `Returning` |
/// | `Idle` / `Seeking` | `resource_found` / `collect_resource` | `Seeking` |
/// | `Idle` | resource in own vision | `Seeking` |
/// | `Idle` | carrying, nothing in sight | `Returning` |
/// | `Seeking` | pickup, inventory full | `Returning` |
/// | `Seeking` | arrives already full (resource left in the pool) | `Returning` |
/// | `Seeking` | pickup with room left, or miss | `Idle` |
/// | `Returning` | inside base (delivers if carrying) | `Idle` |
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "state", rename_all = "snake_case"))]
pub enum CollectorState {
    #[default]
    Idle,
    Seeking {
        target: Vec2,
    },
    Returning,
}

#[derive(Debug, Clone, Default)]
pub struct CollectorBrain {
    state: CollectorState,
    delivered: u32,
}

impl CollectorBrain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CollectorState {
        self.state
    }

    /// Units this collector has handed over to the base.
    pub fn delivered(&self) -> u32 {
        self.delivered
    }

    pub fn think(&mut self, body: &mut AgentBody, ctx: &mut ThinkContext<'_>) {
        for message in ctx.inbox(body.id()) {
            match message.body {
                MessageBody::BaseBreached { .. } => self.return_to_base(body, ctx),
                MessageBody::ResourceFound { position, .. }
                | MessageBody::CollectResource { position } => {
                    if self.state != CollectorState::Returning && !body.is_full() {
                        self.seek(body, position);
                    }
                }
                _ => {}
            }
        }

        let radius = body.params().radius;
        if ctx.base.contains(body.position(), radius) {
            if body.carrying() > 0 {
                self.deliver(body, ctx);
            }
            if self.state == CollectorState::Returning {
                body.clear_target();
                self.state = CollectorState::Idle;
            }
        }

        match self.state {
            CollectorState::Idle => {
                if body.is_full() {
                    self.return_to_base(body, ctx);
                    return;
                }
                let here = body.position();
                let nearest = ctx
                    .pool
                    .in_area(here, body.params().vision_radius)
                    .into_iter()
                    .min_by(|a, b| {
                        distance(here, a.position).total_cmp(&distance(here, b.position))
                    });
                match nearest {
                    Some(resource) => self.seek(body, resource.position),
                    None if body.carrying() > 0 => self.return_to_base(body, ctx),
                    None => {}
                }
            }
            CollectorState::Seeking { target } => {
                if body.distance_to(target) < ctx.rules.pickup_radius {
                    self.try_collect(body, ctx, target);
                } else if body.target().is_none() {
                    body.set_target(target, MovementKind::Collect);
                }
            }
            CollectorState::Returning => {
                if body.target().is_none() {
                    body.set_target(ctx.base.position(), MovementKind::ReturnHome);
                }
            }
        }
    }

    fn seek(&mut self, body: &mut AgentBody, position: Vec2) {
        body.set_target(position, MovementKind::Collect);
        self.state = CollectorState::Seeking { target: position };
    }

    fn return_to_base(&mut self, body: &mut AgentBody, ctx: &ThinkContext<'_>) {
        body.set_target(ctx.base.position(), MovementKind::ReturnHome);
        self.state = CollectorState::Returning;
    }

    fn try_collect(&mut self, body: &mut AgentBody, ctx: &mut ThinkContext<'_>, target: Vec2) {
        if body.is_full() {
            self.return_to_base(body, ctx);
            return;
        }
        ctx.blackboard.remove_resource_location(target);
        let Some(resource) = ctx.pool.collect_near(body.position(), ctx.rules.pickup_radius) else {
            tracing::debug!(agent = %body.id(), "resource already gone");
            body.clear_target();
            self.state = CollectorState::Idle;
            return;
        };
        if !body.pick_up() {
            ctx.pool.restore(resource);
            self.return_to_base(body, ctx);
            return;
        }
        ctx.blackboard.remove_resource_location(resource.position);
        body.consume_energy(ctx.rules.energy.collect);
        let collected = MessageBody::ResourceCollected {
            collector: body.id().clone(),
            carrying: body.carrying(),
        };
        ctx.broadcast(body.id(), collected, priority::ROUTINE);
        tracing::debug!(
            agent = %body.id(),
            resource = %resource.id,
            carrying = body.carrying(),
            "collected"
        );

        if body.is_full() {
            self.return_to_base(body, ctx);
        } else {
            body.clear_target();
            self.state = CollectorState::Idle;
        }
    }

    fn deliver(&mut self, body: &mut AgentBody, ctx: &mut ThinkContext<'_>) {
        let count = body.unload();
        let total_at_base = ctx.base.deliver(count);
        self.delivered += count;
        body.consume_energy(ctx.rules.energy.deliver);
        let delivered = MessageBody::ResourcesDelivered {
            collector: body.id().clone(),
            count,
            total_at_base,
        };
        ctx.broadcast(body.id(), delivered, priority::ROUTINE);
        tracing::debug!(agent = %body.id(), count, total_at_base, "delivered");
        if self.state == CollectorState::Returning {
            body.clear_target();
        }
        self.state = CollectorState::Idle;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
