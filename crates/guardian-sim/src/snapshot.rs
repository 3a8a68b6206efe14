//! Read-only views for renderers and HUDs.

use guardian_agents::{AgentView, TeamStatus};
use guardian_core::geometry::Rect;
use guardian_core::{Bounds, Vec2};
use guardian_world::Zone;
use serde::Serialize;

use crate::{Outcome, ResourceLedger};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseView {
    pub zone: Zone,
    pub stored: u32,
    pub breaches: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HideoutView {
    pub zone: Zone,
    pub secured: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaderView {
    pub position: Vec2,
    pub radius: f32,
    pub carrying: u32,
    pub stealthed: bool,
    pub stealth_cooldown: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub elapsed_seconds: f64,
    pub outcome: Outcome,
    pub paused: bool,
    pub bounds: Bounds,
    pub base: BaseView,
    pub hideout: HideoutView,
    pub evader: EvaderView,
    pub agents: Vec<AgentView>,
    pub resources: Vec<Vec2>,
    pub obstacles: Vec<Rect>,
    pub explored_fraction: f32,
    pub team: Option<TeamStatus>,
    pub ledger: ResourceLedger,
}
