//! Incremental obstacle-aware steering.
//!
//! Each call converts a target into one step of at most `speed`. When the straight step would
//! bring the mover within `radius + clearance` of an obstacle, a priority-ordered candidate
//! search picks the first free step: straight, then angular deviations at full speed, then
//! strafes at reduced speed, then retreats, and finally holding position.
//!
//! Once a deviation has been taken, [`SteeringState`] remembers its turn direction. On later ticks
//! that side is tried first at each angle, so an agent slides along a face instead of flipping
//! sides every tick when the target sits directly behind an obstacle. The tiers never mix: every
//! full-speed deviation is tried before any strafe. The memory is dropped as soon as a straight
//! step is free again.

use guardian_core::geometry::{angle_to, move_towards};
use guardian_core::Vec2;

use crate::GameMap;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SteeringConfig {
    /// Extra gap on top of the collision radius that a step may not cut into.
    pub clearance: f32,
    /// A target closer than `speed + arrival_slack` is snapped onto.
    pub arrival_slack: f32,
    /// Full-speed deviations from the target bearing, tried `+d` then `-d` unless a side is
    /// committed.
    pub deviation_degrees: Vec<f32>,
    pub strafe_degrees: Vec<f32>,
    pub strafe_speed_factor: f32,
    /// Backward steps along the reverse bearing, as fractions of speed.
    pub retreat_factors: Vec<f32>,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            clearance: 20.0,
            arrival_slack: 5.0,
            deviation_degrees: vec![15.0, 30.0, 45.0, 60.0, 75.0, 90.0],
            strafe_degrees: vec![120.0, 135.0, 150.0],
            strafe_speed_factor: 0.6,
            retreat_factors: vec![0.6, 0.4, 0.2],
        }
    }
}

/// Rotation sense of a positive angular offset (screen coordinates, +y down).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Turn {
    Clockwise,
    CounterClockwise,
}

impl Turn {
    fn sign(self) -> f32 {
        match self {
            Turn::Clockwise => 1.0,
            Turn::CounterClockwise => -1.0,
        }
    }

    fn of(degrees: f32) -> Self {
        if degrees >= 0.0 {
            Turn::Clockwise
        } else {
            Turn::CounterClockwise
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Maneuver {
    /// Snapped onto the target.
    Arrived,
    Straight,
    Deviate { degrees: f32 },
    Strafe { degrees: f32 },
    Retreat { factor: f32 },
    Hold,
}

impl Maneuver {
    fn turn(self) -> Option<Turn> {
        match self {
            Maneuver::Deviate { degrees } | Maneuver::Strafe { degrees } => Some(Turn::of(degrees)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub position: Vec2,
    pub maneuver: Maneuver,
}

impl Step {
    pub fn arrived(&self) -> bool {
        self.maneuver == Maneuver::Arrived
    }
}

/// Per-mover avoidance memory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SteeringState {
    committed: Option<Turn>,
}

impl SteeringState {
    pub fn committed(&self) -> Option<Turn> {
        self.committed
    }

    pub fn clear(&mut self) {
        self.committed = None;
    }
}

impl SteeringConfig {
    pub fn buffer(&self, radius: f32) -> f32 {
        radius + self.clearance
    }

    /// Whether a mover at `from` may step onto `candidate`.
    ///
    /// A candidate outside the buffer is always free. A mover already inside the buffer (after a
    /// snap onto a target near an obstacle) may also take any step that strictly increases its
    /// clearance without touching an obstacle.
    pub fn is_free(&self, map: &GameMap, from: Vec2, candidate: Vec2, radius: f32) -> bool {
        let buffer = self.buffer(radius);
        if !map.is_blocked(candidate, buffer) {
            return true;
        }
        map.is_blocked(from, buffer)
            && !map.is_blocked(candidate, radius)
            && map.clearance(candidate) > map.clearance(from)
    }

    /// One steering step from `from` toward `target`.
    pub fn step(
        &self,
        state: &mut SteeringState,
        map: &GameMap,
        from: Vec2,
        target: Vec2,
        speed: f32,
        radius: f32,
    ) -> Step {
        let bounds = map.bounds();
        if from.distance(target) <= speed + self.arrival_slack {
            state.clear();
            return Step {
                position: bounds.clamp(target),
                maneuver: Maneuver::Arrived,
            };
        }

        let straight = bounds.clamp(move_towards(from, target, speed));
        if self.is_free(map, from, straight, radius) {
            state.clear();
            return Step {
                position: straight,
                maneuver: Maneuver::Straight,
            };
        }

        let step = self.avoid(state.committed, map, from, target, speed, radius);
        if let Some(turn) = step.maneuver.turn() {
            state.committed = Some(turn);
        }
        step
    }

    /// Priority-ordered candidate search; returns the first free candidate or holds position.
    pub fn avoid(
        &self,
        committed: Option<Turn>,
        map: &GameMap,
        from: Vec2,
        target: Vec2,
        speed: f32,
        radius: f32,
    ) -> Step {
        let bounds = map.bounds();
        let bearing = angle_to(from, target);
        self.candidates(committed)
            .into_iter()
            .find_map(|(maneuver, offset_degrees, factor)| {
                let dir = Vec2::from_angle(bearing + offset_degrees.to_radians());
                let position = bounds.clamp(from + dir * (speed * factor));
                self.is_free(map, from, position, radius).then_some(Step {
                    position,
                    maneuver,
                })
            })
            .unwrap_or(Step {
                position: from,
                maneuver: Maneuver::Hold,
            })
    }

    /// `(maneuver, offset in degrees, speed factor)` in the order they are tried.
    pub fn candidates(&self, committed: Option<Turn>) -> Vec<(Maneuver, f32, f32)> {
        let deviate = |d: f32| (Maneuver::Deviate { degrees: d }, d, 1.0);
        let strafe = |d: f32| (Maneuver::Strafe { degrees: d }, d, self.strafe_speed_factor);

        let mut out = Vec::with_capacity(
            1 + 2 * (self.deviation_degrees.len() + self.strafe_degrees.len())
                + self.retreat_factors.len(),
        );
        out.push((Maneuver::Straight, 0.0, 1.0));

        let first = committed.map_or(1.0, Turn::sign);
        for &d in &self.deviation_degrees {
            out.push(deviate(first * d));
            out.push(deviate(-first * d));
        }
        for &d in &self.strafe_degrees {
            out.push(strafe(first * d));
            out.push(strafe(-first * d));
        }

        out.extend(
            self.retreat_factors
                .iter()
                .map(|&f| (Maneuver::Retreat { factor: f }, 180.0, f)),
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncommitted_order_alternates_sides() {
        let cfg = SteeringConfig::default();
        let offsets: Vec<f32> = cfg.candidates(None).iter().map(|c| c.1).collect();
        assert_eq!(
            &offsets[..7],
            &[0.0, 15.0, -15.0, 30.0, -30.0, 45.0, -45.0]
        );
        assert_eq!(&offsets[13..19], &[120.0, -120.0, 135.0, -135.0, 150.0, -150.0]);
        assert_eq!(&offsets[19..], &[180.0, 180.0, 180.0]);
    }

    #[test]
    fn committed_side_leads_each_angle_without_mixing_tiers() {
        let cfg = SteeringConfig::default();
        let candidates = cfg.candidates(Some(Turn::CounterClockwise));
        let offsets: Vec<f32> = candidates.iter().map(|c| c.1).collect();
        assert_eq!(
            &offsets[1..13],
            &[-15.0, 15.0, -30.0, 30.0, -45.0, 45.0, -60.0, 60.0, -75.0, 75.0, -90.0, 90.0]
        );
        assert_eq!(&offsets[13..19], &[-120.0, 120.0, -135.0, 135.0, -150.0, 150.0]);
        assert!(candidates[1..13]
            .iter()
            .all(|c| matches!(c.0, Maneuver::Deviate { .. }) && c.2 == 1.0));
    }
}
