//! Shared primitives for the guardian pursuit/evasion simulation: geometry, identities, messages,
//! alerts and the blackboard every agent coordinates through.

#![forbid(unsafe_code)]

pub mod agent;
pub mod alert;
pub mod blackboard;
pub mod geometry;
pub mod math;
pub mod message;
pub mod tick;

pub use agent::{AgentId, MovementKind, Role};
pub use alert::{Alert, AlertKind, Severity};
pub use blackboard::{
    keys, BaseStatus, BbKey, Blackboard, KnowledgeSnapshot, KnowledgeTxn, Sighting,
};
pub use geometry::Rect;
pub use math::{Bounds, Vec2};
pub use message::{Message, MessageBody, MessageError, MessageKind, Recipient};
pub use tick::TickContext;
