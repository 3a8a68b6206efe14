//! Autonomous defenders: a shared body (movement, energy, inventory, stuck escape) driven by one
//! of four role brains.
//!
//! Per tick the orchestrator calls [`Agent::update`] on every agent, then [`Agent::think`] on
//! every agent, then [`Agent::observe`] for the vision checks. Brains talk to each other only
//! through the blackboard.

#![forbid(unsafe_code)]

pub mod agent;
pub mod body;
pub mod context;
pub mod roles;
pub mod roster;
pub mod rules;

pub use agent::{Agent, AgentView, Brain};
pub use body::{AgentBody, AgentParams};
pub use context::{MoveContext, Observation, ObservationReport, ThinkContext};
pub use roles::{
    CollectorBrain, CollectorState, CoordinatorBrain, ExplorerBrain, ExplorerState,
    InterceptorBrain, InterceptorState, Quadrant, TeamStatus, ThreatLevel,
};
pub use roster::Roster;
pub use rules::{BehaviorRules, EnergyCosts};
