use guardian_core::{AgentId, MovementKind, Role, Vec2};
use guardian_nav::Maneuver;

use crate::roles::{
    CollectorBrain, CollectorState, CoordinatorBrain, ExplorerBrain, ExplorerState,
    InterceptorBrain, InterceptorState, ThreatLevel,
};
use crate::{AgentBody, MoveContext, Observation, ObservationReport, ThinkContext};

/// Role-specific decision state. Closed: the orchestrator knows every variant.
#[derive(Debug, Clone)]
pub enum Brain {
    Explorer(ExplorerBrain),
    Collector(CollectorBrain),
    Interceptor(InterceptorBrain),
    Coordinator(CoordinatorBrain),
}

impl Brain {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Explorer => Brain::Explorer(ExplorerBrain::new()),
            Role::Collector => Brain::Collector(CollectorBrain::new()),
            Role::Interceptor => Brain::Interceptor(InterceptorBrain::new()),
            Role::Coordinator => Brain::Coordinator(CoordinatorBrain::new()),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Brain::Explorer(_) => Role::Explorer,
            Brain::Collector(_) => Role::Collector,
            Brain::Interceptor(_) => Role::Interceptor,
            Brain::Coordinator(_) => Role::Coordinator,
        }
    }

    /// Short state name for HUDs and logs.
    pub fn state_label(&self) -> &'static str {
        match self {
            Brain::Explorer(brain) => match brain.state() {
                ExplorerState::SelectingZone => "selecting_zone",
                ExplorerState::Surveying { .. } => "surveying",
                ExplorerState::Scanning { .. } => "scanning",
                ExplorerState::Roaming => "roaming",
            },
            Brain::Collector(brain) => match brain.state() {
                CollectorState::Idle => "idle",
                CollectorState::Seeking { .. } => "seeking",
                CollectorState::Returning => "returning",
            },
            Brain::Interceptor(brain) => match brain.state() {
                InterceptorState::Patrolling => "patrolling",
                InterceptorState::Pursuing => "pursuing",
                InterceptorState::Searching => "searching",
                InterceptorState::Capturing => "capturing",
            },
            Brain::Coordinator(brain) => match brain.threat() {
                ThreatLevel::Low => "threat_low",
                ThreatLevel::High => "threat_high",
            },
        }
    }

    fn reset(&mut self) {
        match self {
            Brain::Explorer(brain) => brain.reset(),
            Brain::Collector(brain) => brain.reset(),
            Brain::Interceptor(brain) => brain.reset(),
            Brain::Coordinator(brain) => brain.reset(),
        }
    }
}

/// Read-only view of one agent for renderers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AgentView {
    pub id: AgentId,
    pub role: Role,
    pub position: Vec2,
    pub target: Option<Vec2>,
    pub movement: MovementKind,
    pub energy: f32,
    pub carrying: u32,
    pub state: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct Agent {
    body: AgentBody,
    brain: Brain,
}

impl Agent {
    /// Pairs a body with the brain for its role. Coordinators are pinned to their spawn point.
    pub fn new(body: AgentBody) -> Self {
        let brain = Brain::for_role(body.role());
        let body = match body.role() {
            Role::Coordinator => body.pinned(),
            _ => body,
        };
        Self { body, brain }
    }

    pub fn id(&self) -> &AgentId {
        self.body.id()
    }

    pub fn role(&self) -> Role {
        self.body.role()
    }

    pub fn position(&self) -> Vec2 {
        self.body.position()
    }

    pub fn body(&self) -> &AgentBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut AgentBody {
        &mut self.body
    }

    pub fn brain(&self) -> &Brain {
        &self.brain
    }

    pub fn coordinator(&self) -> Option<&CoordinatorBrain> {
        match &self.brain {
            Brain::Coordinator(brain) => Some(brain),
            _ => None,
        }
    }

    pub fn coordinator_mut(&mut self) -> Option<&mut CoordinatorBrain> {
        match &mut self.brain {
            Brain::Coordinator(brain) => Some(brain),
            _ => None,
        }
    }

    pub fn update(&mut self, ctx: &mut MoveContext<'_>) -> Option<Maneuver> {
        self.body.update(ctx)
    }

    pub fn think(&mut self, ctx: &mut ThinkContext<'_>) {
        if !self.body.is_active() {
            return;
        }
        let body = &mut self.body;
        match &mut self.brain {
            Brain::Explorer(brain) => brain.think(body, ctx),
            Brain::Collector(brain) => brain.think(body, ctx),
            Brain::Interceptor(brain) => brain.think(body, ctx),
            Brain::Coordinator(brain) => brain.think(body, ctx),
        }
    }

    /// Vision checks. Only explorers report what they see.
    pub fn observe(
        &mut self,
        ctx: &mut ThinkContext<'_>,
        observation: &Observation<'_>,
    ) -> ObservationReport {
        if !self.body.is_active() {
            return ObservationReport::default();
        }
        match &mut self.brain {
            Brain::Explorer(brain) => brain.observe(&mut self.body, ctx, observation),
            _ => ObservationReport::default(),
        }
    }

    /// Back to the spawn point with an empty inventory, full energy and a fresh brain. Coordinator
    /// registrations survive.
    pub fn reset(&mut self) {
        self.body.reset();
        self.brain.reset();
    }

    pub fn view(&self) -> AgentView {
        AgentView {
            id: self.body.id().clone(),
            role: self.body.role(),
            position: self.body.position(),
            target: self.body.target(),
            movement: self.body.movement(),
            energy: self.body.energy(),
            carrying: self.body.carrying(),
            state: self.brain.state_label(),
            active: self.body.is_active(),
        }
    }
}
