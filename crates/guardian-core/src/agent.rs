use core::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable identifier for an agent.
///
/// Ids are created once per session and never reused; clones are cheap.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AgentId(Arc<str>);

impl AgentId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// Conventional id for the `index`-th agent of a role, e.g. `agent_collector_0`.
    pub fn for_role(role: Role, index: usize) -> Self {
        match role {
            Role::Coordinator => Self::new("agent_coordinator"),
            _ => Self::new(format!("agent_{}_{index}", role.as_str())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display form without the `agent_` prefix, upper-cased (e.g. `COLLECTOR_0`).
    pub fn short_label(&self) -> String {
        self.0
            .strip_prefix("agent_")
            .unwrap_or(&self.0)
            .to_ascii_uppercase()
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AgentId {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Role {
    Explorer,
    Collector,
    Interceptor,
    Coordinator,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Explorer,
        Role::Collector,
        Role::Interceptor,
        Role::Coordinator,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Explorer => "explorer",
            Role::Collector => "collector",
            Role::Interceptor => "interceptor",
            Role::Coordinator => "coordinator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an agent is heading to its target. Bookkeeping only; steering ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MovementKind {
    #[default]
    Patrol,
    Pursue,
    ReturnHome,
    Collect,
}

impl MovementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MovementKind::Patrol => "patrol",
            MovementKind::Pursue => "pursue",
            MovementKind::ReturnHome => "return_home",
            MovementKind::Collect => "collect",
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
