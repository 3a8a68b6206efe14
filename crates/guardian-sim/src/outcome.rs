use core::fmt;

use guardian_agents::Agent;
use guardian_core::geometry::distance;
use guardian_core::{AgentId, Role, Vec2};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaderVictory {
    /// The base ran out of resources.
    BaseEmptied,
    /// The hideout reached the win threshold.
    HideoutFilled,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Outcome {
    #[default]
    Running,
    EvaderWon { reason: EvaderVictory },
    DefendersWon { interceptor: AgentId },
}

impl Outcome {
    pub fn is_over(&self) -> bool {
        !matches!(self, Outcome::Running)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Running => f.write_str("running"),
            Outcome::EvaderWon {
                reason: EvaderVictory::BaseEmptied,
            } => f.write_str("evader wins: base emptied"),
            Outcome::EvaderWon {
                reason: EvaderVictory::HideoutFilled,
            } => f.write_str("evader wins: hideout filled"),
            Outcome::DefendersWon { interceptor } => {
                write!(f, "defenders win: {} caught the thief", interceptor.short_label())
            }
        }
    }
}

/// Inputs to one end-of-tick evaluation.
#[derive(Debug, Clone, Copy)]
pub struct WinCheck<'a> {
    pub base_stored: u32,
    pub hideout_secured: u32,
    pub win_threshold: u32,
    pub capture: Option<&'a AgentId>,
}

/// Checked in a fixed order; the first satisfied condition decides the session.
pub fn evaluate(check: WinCheck<'_>) -> Outcome {
    if check.base_stored == 0 {
        return Outcome::EvaderWon {
            reason: EvaderVictory::BaseEmptied,
        };
    }
    if check.hideout_secured >= check.win_threshold {
        return Outcome::EvaderWon {
            reason: EvaderVictory::HideoutFilled,
        };
    }
    match check.capture {
        Some(interceptor) => Outcome::DefendersWon {
            interceptor: interceptor.clone(),
        },
        None => Outcome::Running,
    }
}

/// First active interceptor whose capture circle overlaps the evader. Stealth does not protect.
pub fn capturing_interceptor<'a>(
    agents: &'a [Agent],
    evader: Vec2,
    evader_radius: f32,
    catching_distance: f32,
) -> Option<&'a AgentId> {
    agents
        .iter()
        .filter(|a| a.role() == Role::Interceptor && a.body().is_active())
        .find(|a| {
            let reach = a.body().params().radius + evader_radius + catching_distance;
            distance(a.position(), evader) < reach
        })
        .map(Agent::id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_emptied_beats_capture() {
        let id = AgentId::new("agent_interceptor_0");
        let outcome = evaluate(WinCheck {
            base_stored: 0,
            hideout_secured: 10,
            win_threshold: 10,
            capture: Some(&id),
        });
        assert_eq!(
            outcome,
            Outcome::EvaderWon {
                reason: EvaderVictory::BaseEmptied
            }
        );
    }

    #[test]
    fn hideout_beats_capture() {
        let id = AgentId::new("agent_interceptor_0");
        let outcome = evaluate(WinCheck {
            base_stored: 3,
            hideout_secured: 10,
            win_threshold: 10,
            capture: Some(&id),
        });
        assert!(matches!(outcome, Outcome::EvaderWon { .. }));
        assert_eq!(outcome.to_string(), "evader wins: hideout filled");
    }

    #[test]
    fn capture_alone_wins_for_defenders() {
        let id = AgentId::new("agent_interceptor_0");
        let outcome = evaluate(WinCheck {
            base_stored: 3,
            hideout_secured: 2,
            win_threshold: 10,
            capture: Some(&id),
        });
        assert_eq!(outcome, Outcome::DefendersWon { interceptor: id });
        assert!(outcome.is_over());
    }
}
