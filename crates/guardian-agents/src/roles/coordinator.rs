use guardian_core::{keys, AgentId, AlertKind, BaseStatus, Blackboard, MessageBody, Role, Vec2};

use crate::context::priority;
use crate::{AgentBody, Roster, ThinkContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ThreatLevel {
    #[default]
    Low,
    High,
}

/// What the coordinator knows about its team.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TeamStatus {
    pub members: Vec<(AgentId, Role)>,
    pub threat: ThreatLevel,
    pub thief_position: Option<Vec2>,
    pub resources_at_base: u32,
    pub base_status: BaseStatus,
    pub decisions: u64,
}

/// Pinned strategist. Its only state is the threat flag and the decision clock; everything else
/// it reads from the blackboard each think.
#[derive(Debug, Clone, Default)]
pub struct CoordinatorBrain {
    team: Roster,
    threat: ThreatLevel,
    thinks: u64,
    decisions: u64,
}

impl CoordinatorBrain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: AgentId, role: Role) {
        tracing::debug!(agent = %id, %role, "registered with coordinator");
        self.team.add(id, role);
    }

    pub fn threat(&self) -> ThreatLevel {
        self.threat
    }

    pub fn decisions(&self) -> u64 {
        self.decisions
    }

    pub fn team_status(&self, blackboard: &Blackboard) -> TeamStatus {
        let knowledge = blackboard.snapshot_knowledge();
        TeamStatus {
            members: self.team.iter().map(|(id, role)| (id.clone(), role)).collect(),
            threat: self.threat,
            thief_position: knowledge.thief_position,
            resources_at_base: knowledge.resources_at_base,
            base_status: knowledge.base_status,
            decisions: self.decisions,
        }
    }

    pub fn think(&mut self, body: &mut AgentBody, ctx: &mut ThinkContext<'_>) {
        self.thinks += 1;

        for alert in ctx.blackboard.drain_alerts(true) {
            match alert.kind {
                AlertKind::ThiefSighting { .. } => self.raise_threat(body),
                AlertKind::BaseBreached { .. } => {
                    ctx.blackboard.post(keys::BASE_STATUS, BaseStatus::Breached);
                }
                AlertKind::ThiefCaught { .. } => {}
            }
        }

        for message in ctx.inbox(body.id()) {
            match message.body {
                MessageBody::ResourcesDelivered { total_at_base, .. } => {
                    ctx.blackboard.post(keys::RESOURCES_AT_BASE, total_at_base);
                }
                MessageBody::BaseBreached { .. } => {
                    ctx.blackboard.post(keys::BASE_STATUS, BaseStatus::Breached);
                }
                MessageBody::ThiefSighted { .. } => self.raise_threat(body),
                _ => {}
            }
        }

        let period = ctx.rules.coordinator_period.max(1);
        if self.thinks % period == 0 {
            self.decide(body, ctx);
        }
    }

    fn raise_threat(&mut self, body: &AgentBody) {
        if self.threat != ThreatLevel::High {
            tracing::debug!(agent = %body.id(), "threat level high");
        }
        self.threat = ThreatLevel::High;
    }

    fn decide(&mut self, body: &mut AgentBody, ctx: &mut ThinkContext<'_>) {
        self.decisions += 1;
        let me = body.id().clone();

        if let Some(thief) = ctx.blackboard.read(keys::THIEF_POSITION) {
            for interceptor in ctx.roster.of_role(Role::Interceptor) {
                let command = MessageBody::InterceptCommand { target: thief };
                ctx.send_to(&me, interceptor, command, priority::COMMAND + 2);
                body.consume_energy(ctx.rules.energy.command);
            }
        }

        if ctx.base.stored() < ctx.rules.low_water_mark {
            let known = ctx
                .blackboard
                .read(keys::RESOURCE_LOCATIONS)
                .unwrap_or_default();
            let assignments = ctx
                .roster
                .of_role(Role::Collector)
                .take(ctx.rules.commanded_collectors)
                .zip(known);
            for (collector, position) in assignments {
                let command = MessageBody::CollectResource { position };
                ctx.send_to(&me, collector, command, priority::COMMAND);
                body.consume_energy(ctx.rules.energy.command);
            }
        }

        if ctx.blackboard.read(keys::BASE_STATUS) == Some(BaseStatus::Breached) {
            let defend = MessageBody::DefendBase {
                base: ctx.base.position(),
            };
            ctx.broadcast(&me, defend, priority::ALARM);
        }
        tracing::debug!(
            agent = %me,
            decision = self.decisions,
            threat = ?self.threat,
            "coordinator decision"
        );
    }

    pub fn reset(&mut self) {
        self.threat = ThreatLevel::Low;
        self.thinks = 0;
        self.decisions = 0;
    }
}
