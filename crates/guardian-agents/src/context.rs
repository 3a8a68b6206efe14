use guardian_core::{AgentId, Blackboard, Message, MessageBody, Recipient, TickContext, Vec2};
use guardian_nav::{GameMap, SteeringConfig};
use guardian_world::{BaseCamp, Resource, ResourcePool};
use rand::RngCore;

use crate::{BehaviorRules, Roster};

/// Message priorities used by the brains (1 = routine, 10 = most urgent).
pub mod priority {
    pub const ROUTINE: u8 = 1;
    pub const COMMAND: u8 = 5;
    pub const SIGHTING: u8 = 8;
    pub const ALARM: u8 = 9;
}

/// Everything the movement step needs.
pub struct MoveContext<'a> {
    pub map: &'a GameMap,
    pub steering: &'a SteeringConfig,
    pub rules: &'a BehaviorRules,
    pub rng: &'a mut dyn RngCore,
}

/// Everything a brain may read or write while thinking.
pub struct ThinkContext<'a> {
    pub tick: TickContext,
    pub blackboard: &'a Blackboard,
    pub map: &'a GameMap,
    pub base: &'a BaseCamp,
    pub pool: &'a ResourcePool,
    pub roster: &'a Roster,
    pub rules: &'a BehaviorRules,
    pub rng: &'a mut dyn RngCore,
}

impl ThinkContext<'_> {
    /// Unread messages for `me`, marked read as a side effect.
    pub fn inbox(&self, me: &AgentId) -> Vec<Message> {
        self.blackboard.fetch(me, true)
    }

    pub fn send_to(&self, from: &AgentId, to: &AgentId, body: MessageBody, priority: u8) {
        self.post(from, Recipient::Agent(to.clone()), body, priority);
    }

    pub fn broadcast(&self, from: &AgentId, body: MessageBody, priority: u8) {
        self.post(from, Recipient::Broadcast, body, priority);
    }

    fn post(&self, from: &AgentId, to: Recipient, body: MessageBody, priority: u8) {
        let kind = body.kind();
        match Message::new(from.clone(), to, body, priority) {
            Ok(message) => {
                self.blackboard.send(message);
            }
            Err(err) => tracing::warn!(agent = %from, %kind, error = %err, "message dropped"),
        }
    }
}

/// What the orchestrator lets agents see after thinking.
#[derive(Debug, Clone, Copy)]
pub struct Observation<'a> {
    pub evader_position: Vec2,
    /// `false` while the evader is stealthed.
    pub evader_visible: bool,
    pub resources: &'a [Resource],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObservationReport {
    pub sighted: bool,
    pub resources_reported: usize,
}
