//! Spatial world and local reactive steering: obstacles, free-position queries, explored-area
//! bookkeeping, the priority-ordered avoidance search and stuck escape.

#![forbid(unsafe_code)]

pub mod map;
pub mod obstacle;
pub mod steering;
pub mod stuck;

pub use map::{GameMap, MapLayout};
pub use obstacle::Obstacle;
pub use steering::{Maneuver, SteeringConfig, SteeringState, Step, Turn};
pub use stuck::{escape_point, StuckConfig, StuckDetector};
