//! Session orchestration for the guardian simulation.
//!
//! [`Simulation`] owns the map, blackboard, zones, resource pool, evader and agents and advances
//! them one tick at a time. [`SimConfig`] describes a session; [`Autopilot`] drives the evader
//! when no human is at the controls.

#![forbid(unsafe_code)]

pub mod autopilot;
pub mod config;
pub mod ledger;
pub mod outcome;
pub mod simulation;
pub mod snapshot;

pub use autopilot::{Autopilot, AutopilotConfig};
pub use config::{
    AgentConfig, ConfigError, Difficulty, SessionRules, SimConfig, TeamConfig, WorldConfig,
};
pub use ledger::ResourceLedger;
pub use outcome::{capturing_interceptor, evaluate, EvaderVictory, Outcome, WinCheck};
pub use simulation::{Simulation, TickReport};
pub use snapshot::{BaseView, EvaderView, HideoutView, Snapshot};
