//! Scripted evader: raid the base until full, run to the hideout, repeat.

use guardian_core::geometry::distance;
use guardian_core::{Role, Vec2};
use guardian_nav::SteeringState;
use guardian_world::EvaderInput;
use serde::{Deserialize, Serialize};

use crate::Simulation;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutopilotConfig {
    /// Stealth is triggered when an interceptor or explorer comes this close.
    pub stealth_trigger_distance: f32,
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            stealth_trigger_distance: 120.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leg {
    Raid,
    Escape,
}

#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    config: AutopilotConfig,
    steering: SteeringState,
}

impl Autopilot {
    pub fn new(config: AutopilotConfig) -> Self {
        Self {
            config,
            steering: SteeringState::default(),
        }
    }

    /// Input for the next tick, steering with the defenders' own obstacle search.
    pub fn plan(&mut self, sim: &Simulation) -> EvaderInput {
        let evader = sim.evader();
        let position = evader.position();
        let leg = if !evader.has_room() || (evader.carrying() > 0 && sim.base().stored() == 0) {
            Leg::Escape
        } else {
            Leg::Raid
        };
        let goal = match leg {
            Leg::Raid => sim.base().position(),
            Leg::Escape => sim.hideout().position(),
        };

        let velocity = if distance(position, goal) < f32::EPSILON {
            self.steering.clear();
            Vec2::default()
        } else {
            let step = sim.config().steering.step(
                &mut self.steering,
                sim.map(),
                position,
                goal,
                evader.config().speed,
                evader.radius(),
            );
            step.position - position
        };

        let threatened = sim
            .agents()
            .iter()
            .filter(|a| matches!(a.role(), Role::Interceptor | Role::Explorer))
            .any(|a| distance(a.position(), position) < self.config.stealth_trigger_distance);

        EvaderInput {
            velocity,
            activate_stealth: threatened && evader.stealth_ready(),
        }
    }
}
