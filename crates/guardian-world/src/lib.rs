//! World entities shared by the defenders and the evader.

#![forbid(unsafe_code)]

pub mod evader;
pub mod resources;
pub mod zones;

pub use evader::{Evader, EvaderConfig, EvaderInput};
pub use resources::{PoolConfig, Resource, ResourceId, ResourcePool};
pub use zones::{BaseCamp, Hideout, Zone};
