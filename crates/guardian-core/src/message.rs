//! Inter-agent messages.
//!
//! Payloads are a closed set of variants, checked once when the message is built. Readers match
//! on [`MessageBody`] and never have to probe for optional fields.

use core::fmt;
use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AgentId, Vec2};

pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 10;
pub const DEFAULT_PRIORITY: u8 = 1;

#[derive(Debug, Error, PartialEq)]
pub enum MessageError {
    #[error("priority {0} outside 1..=10")]
    PriorityOutOfRange(u8),
    #[error("non-finite position in {kind} payload")]
    NonFinitePosition { kind: MessageKind },
    #[error("{kind} payload carries an empty count")]
    EmptyCount { kind: MessageKind },
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Recipient {
    Agent(AgentId),
    Broadcast,
}

impl Recipient {
    /// True when a message with this addressing is deliverable to `agent`.
    pub fn includes(&self, agent: &AgentId) -> bool {
        match self {
            Recipient::Agent(id) => id == agent,
            Recipient::Broadcast => true,
        }
    }

    pub fn is_broadcast(&self) -> bool {
        matches!(self, Recipient::Broadcast)
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recipient::Agent(id) => write!(f, "{id}"),
            Recipient::Broadcast => f.write_str("all"),
        }
    }
}

/// Type tag of a message, derived from its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MessageKind {
    ResourceFound,
    ResourceDiscovered,
    ResourceCollected,
    ResourcesDelivered,
    ThiefSighted,
    ThiefCaught,
    BaseBreached,
    InterceptCommand,
    CollectResource,
    DefendBase,
    ScanZone,
    ExplorationUpdate,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::ResourceFound => "resource_found",
            MessageKind::ResourceDiscovered => "resource_discovered",
            MessageKind::ResourceCollected => "resource_collected",
            MessageKind::ResourcesDelivered => "resources_delivered",
            MessageKind::ThiefSighted => "thief_sighted",
            MessageKind::ThiefCaught => "thief_caught",
            MessageKind::BaseBreached => "base_breached",
            MessageKind::InterceptCommand => "intercept_command",
            MessageKind::CollectResource => "collect_resource",
            MessageKind::DefendBase => "defend_base",
            MessageKind::ScanZone => "scan_zone",
            MessageKind::ExplorationUpdate => "exploration_update",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum MessageBody {
    /// Explorer -> primary collector.
    ResourceFound { position: Vec2, explorer: AgentId },
    /// Explorer -> everyone.
    ResourceDiscovered { position: Vec2, explorer: AgentId },
    ResourceCollected { collector: AgentId, carrying: u32 },
    ResourcesDelivered {
        collector: AgentId,
        count: u32,
        total_at_base: u32,
    },
    ThiefSighted {
        position: Vec2,
        observer: AgentId,
        seen_at: f64,
    },
    ThiefCaught { interceptor: AgentId, position: Vec2 },
    BaseBreached { stolen: u32 },
    InterceptCommand { target: Vec2 },
    CollectResource { position: Vec2 },
    DefendBase { base: Vec2 },
    ScanZone { center: Vec2 },
    ExplorationUpdate {
        explorer: AgentId,
        position: Vec2,
        explored_zones: u32,
    },
}

impl MessageBody {
    pub fn kind(&self) -> MessageKind {
        match self {
            MessageBody::ResourceFound { .. } => MessageKind::ResourceFound,
            MessageBody::ResourceDiscovered { .. } => MessageKind::ResourceDiscovered,
            MessageBody::ResourceCollected { .. } => MessageKind::ResourceCollected,
            MessageBody::ResourcesDelivered { .. } => MessageKind::ResourcesDelivered,
            MessageBody::ThiefSighted { .. } => MessageKind::ThiefSighted,
            MessageBody::ThiefCaught { .. } => MessageKind::ThiefCaught,
            MessageBody::BaseBreached { .. } => MessageKind::BaseBreached,
            MessageBody::InterceptCommand { .. } => MessageKind::InterceptCommand,
            MessageBody::CollectResource { .. } => MessageKind::CollectResource,
            MessageBody::DefendBase { .. } => MessageKind::DefendBase,
            MessageBody::ScanZone { .. } => MessageKind::ScanZone,
            MessageBody::ExplorationUpdate { .. } => MessageKind::ExplorationUpdate,
        }
    }

    /// The position carried by the payload, if any.
    pub fn position(&self) -> Option<Vec2> {
        match self {
            MessageBody::ResourceFound { position, .. }
            | MessageBody::ResourceDiscovered { position, .. }
            | MessageBody::ThiefSighted { position, .. }
            | MessageBody::ThiefCaught { position, .. }
            | MessageBody::CollectResource { position }
            | MessageBody::ExplorationUpdate { position, .. } => Some(*position),
            MessageBody::InterceptCommand { target } => Some(*target),
            MessageBody::DefendBase { base } => Some(*base),
            MessageBody::ScanZone { center } => Some(*center),
            MessageBody::ResourceCollected { .. }
            | MessageBody::ResourcesDelivered { .. }
            | MessageBody::BaseBreached { .. } => None,
        }
    }

    fn validate(&self) -> Result<(), MessageError> {
        let kind = self.kind();
        if let Some(p) = self.position() {
            if !p.is_finite() {
                return Err(MessageError::NonFinitePosition { kind });
            }
        }
        match self {
            MessageBody::ResourcesDelivered { count: 0, .. }
            | MessageBody::BaseBreached { stolen: 0 } => Err(MessageError::EmptyCount { kind }),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Message {
    /// Assigned by the blackboard on send; `0` until then.
    pub id: u64,
    pub sender: AgentId,
    pub recipient: Recipient,
    pub body: MessageBody,
    pub priority: u8,
    /// Simulation seconds at send time.
    pub sent_at: f64,
    read_by: BTreeSet<AgentId>,
}

impl Message {
    pub fn new(
        sender: AgentId,
        recipient: Recipient,
        body: MessageBody,
        priority: u8,
    ) -> Result<Self, MessageError> {
        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&priority) {
            return Err(MessageError::PriorityOutOfRange(priority));
        }
        body.validate()?;
        Ok(Self {
            id: 0,
            sender,
            recipient,
            body,
            priority,
            sent_at: 0.0,
            read_by: BTreeSet::new(),
        })
    }

    pub fn direct(
        sender: AgentId,
        recipient: AgentId,
        body: MessageBody,
    ) -> Result<Self, MessageError> {
        Self::new(sender, Recipient::Agent(recipient), body, DEFAULT_PRIORITY)
    }

    pub fn broadcast(sender: AgentId, body: MessageBody) -> Result<Self, MessageError> {
        Self::new(sender, Recipient::Broadcast, body, DEFAULT_PRIORITY)
    }

    pub fn kind(&self) -> MessageKind {
        self.body.kind()
    }

    pub fn is_read_by(&self, agent: &AgentId) -> bool {
        self.read_by.contains(agent)
    }

    /// Read by at least one recipient.
    pub fn is_read(&self) -> bool {
        !self.read_by.is_empty()
    }

    pub fn readers(&self) -> impl Iterator<Item = &AgentId> {
        self.read_by.iter()
    }

    pub(crate) fn mark_read(&mut self, agent: &AgentId) {
        if !self.read_by.contains(agent) {
            self.read_by.insert(agent.clone());
        }
    }

    /// One-line description for message logs.
    pub fn summary(&self) -> String {
        let from = self.sender.short_label();
        let to = match &self.recipient {
            Recipient::Agent(id) => id.short_label(),
            Recipient::Broadcast => "TEAM".to_string(),
        };
        let at = |p: &Vec2| format!("({}, {})", p.x as i32, p.y as i32);
        match &self.body {
            MessageBody::ThiefSighted { position, .. } => {
                format!("{from} -> {to}: THIEF SPOTTED at {}", at(position))
            }
            MessageBody::ResourceDiscovered { position, .. }
            | MessageBody::ResourceFound { position, .. } => {
                format!("{from} -> {to}: RESOURCE FOUND at {}", at(position))
            }
            MessageBody::CollectResource { position } => {
                format!("{from} -> {to}: COLLECT from {}", at(position))
            }
            MessageBody::InterceptCommand { target } => {
                format!("{from} -> {to}: INTERCEPT THIEF at {}", at(target))
            }
            MessageBody::ResourcesDelivered { count, .. } => {
                format!("{from}: DELIVERED {count} resources")
            }
            MessageBody::ThiefCaught { .. } => format!("{from} -> {to}: THIEF CAUGHT"),
            MessageBody::BaseBreached { stolen } => {
                format!("{from} -> {to}: BASE BREACHED ({stolen} stolen)")
            }
            _ => format!("{from} -> {to}: {}", self.kind()),
        }
    }
}
