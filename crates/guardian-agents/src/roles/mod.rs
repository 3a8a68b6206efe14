//! Per-role decision logic.
//!
//! Each brain is an explicit state machine. Transitions happen only inside `think` (and `observe`
//! for the explorer); movement is left to the shared [`crate::AgentBody`].

mod collector;
mod coordinator;
mod explorer;
mod interceptor;

pub use collector::{CollectorBrain, CollectorState};
pub use coordinator::{CoordinatorBrain, TeamStatus, ThreatLevel};
pub use explorer::{ExplorerBrain, ExplorerState, Quadrant};
pub use interceptor::{InterceptorBrain, InterceptorState};
