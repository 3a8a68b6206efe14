//! Session configuration, loaded from YAML.
//!
//! Every section carries `#[serde(default)]`, so a config file only needs the keys it changes.

use std::path::Path;

use guardian_agents::{AgentParams, BehaviorRules};
use guardian_core::{Bounds, Role, Vec2};
use guardian_nav::{MapLayout, SteeringConfig, StuckConfig};
use guardian_world::{EvaderConfig, PoolConfig, Zone};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config: {field} {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// Multiplier on every defender's speed.
    pub fn speed_multiplier(self) -> f32 {
        match self {
            Difficulty::Easy => 0.8,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.3,
        }
    }

    /// Multiplier on the resource spawn probability.
    pub fn spawn_rate_multiplier(self) -> f64 {
        match self {
            Difficulty::Easy => 1.5,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 0.7,
        }
    }

    /// Team sizes for the preset; the coordinator is always added on top.
    pub fn team(self) -> TeamConfig {
        let (explorers, collectors, interceptors) = match self {
            Difficulty::Easy => (1, 0, 1),
            Difficulty::Normal => (1, 1, 1),
            Difficulty::Hard => (2, 1, 2),
        };
        TeamConfig {
            explorers,
            collectors,
            interceptors,
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" | "medium" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            other => Err(invalid("difficulty", format!("unknown level `{other}`"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    pub wall_thickness: f32,
    pub obstacle_count: usize,
    pub obstacle_min_size: f32,
    pub obstacle_max_size: f32,
    pub placement_margin: f32,
    pub base: Zone,
    pub hideout: Zone,
    /// Half extent of the obstacle-free square around the base.
    pub base_clearance: f32,
    pub hideout_clearance: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            wall_thickness: 20.0,
            obstacle_count: 30,
            obstacle_min_size: 20.0,
            obstacle_max_size: 60.0,
            placement_margin: 50.0,
            base: Zone::new(Vec2::new(600.0, 400.0), 40.0),
            hideout: Zone::new(Vec2::new(100.0, 100.0), 30.0),
            base_clearance: 150.0,
            hideout_clearance: 50.0,
        }
    }
}

impl WorldConfig {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }

    pub fn layout(&self) -> MapLayout {
        MapLayout {
            wall_thickness: self.wall_thickness,
            obstacle_count: self.obstacle_count,
            obstacle_min_size: self.obstacle_min_size,
            obstacle_max_size: self.obstacle_max_size,
            placement_margin: self.placement_margin,
            safe_zones: vec![
                MapLayout::safe_zone(self.base.center, self.base_clearance),
                MapLayout::safe_zone(self.hideout.center, self.hideout_clearance),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamConfig {
    pub explorers: usize,
    pub collectors: usize,
    pub interceptors: usize,
}

impl Default for TeamConfig {
    fn default() -> Self {
        Difficulty::Normal.team()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub speed: f32,
    pub radius: f32,
    pub vision_radius: f32,
    pub collector_vision_radius: f32,
    pub communication_radius: f32,
    pub interceptor_speed_factor: f32,
    pub energy_max: f32,
    pub energy_regen: f32,
    pub collector_capacity: u32,
    /// Distance from the base at which explorers and collectors spawn.
    pub spawn_ring_radius: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            speed: 1.5,
            radius: 12.0,
            vision_radius: 90.0,
            collector_vision_radius: 150.0,
            communication_radius: 300.0,
            interceptor_speed_factor: 1.1,
            energy_max: 100.0,
            energy_regen: 0.5,
            collector_capacity: 5,
            spawn_ring_radius: 150.0,
        }
    }
}

impl AgentConfig {
    pub fn params_for(&self, role: Role, speed_multiplier: f32) -> AgentParams {
        let mut params = AgentParams {
            speed: self.speed * speed_multiplier,
            radius: self.radius,
            vision_radius: self.vision_radius,
            communication_radius: self.communication_radius,
            energy_max: self.energy_max,
            energy_regen: self.energy_regen,
            capacity: 0,
        };
        match role {
            Role::Collector => {
                params.vision_radius = self.collector_vision_radius;
                params.capacity = self.collector_capacity;
            }
            Role::Interceptor => params.speed *= self.interceptor_speed_factor,
            Role::Explorer | Role::Coordinator => {}
        }
        params
    }
}

/// Session-level rules that are not per-role behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionRules {
    pub base_initial: u32,
    /// Secured count at which the evader wins.
    pub win_threshold: u32,
    pub message_max_age_seconds: f64,
    pub age_out_period_ticks: u64,
    pub history_limit: usize,
    /// Session event lines kept for the HUD.
    pub event_log_limit: usize,
}

impl Default for SessionRules {
    fn default() -> Self {
        Self {
            base_initial: 10,
            win_threshold: 10,
            message_max_age_seconds: 300.0,
            age_out_period_ticks: 300,
            history_limit: 50,
            event_log_limit: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub seed: u64,
    pub tick_rate: u32,
    pub difficulty: Difficulty,
    pub world: WorldConfig,
    pub team: TeamConfig,
    pub agents: AgentConfig,
    pub steering: SteeringConfig,
    pub stuck: StuckConfig,
    pub evader: EvaderConfig,
    pub resources: PoolConfig,
    pub behavior: BehaviorRules,
    pub session: SessionRules,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            tick_rate: 60,
            difficulty: Difficulty::Normal,
            world: WorldConfig::default(),
            team: TeamConfig::default(),
            agents: AgentConfig::default(),
            steering: SteeringConfig::default(),
            stuck: StuckConfig::default(),
            evader: EvaderConfig::default(),
            resources: PoolConfig::default(),
            behavior: BehaviorRules::default(),
            session: SessionRules::default(),
        }
    }
}

impl SimConfig {
    /// Load and validate a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Switch to a difficulty preset: team sizes are replaced, and the speed and spawn-rate
    /// multipliers are applied when the session is built.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self.team = difficulty.team();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Pool settings with the difficulty's spawn multiplier folded in.
    pub fn effective_pool(&self) -> PoolConfig {
        let mut pool = self.resources;
        pool.spawn_rate =
            (pool.spawn_rate * self.difficulty.spawn_rate_multiplier()).clamp(0.0, 1.0);
        pool
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let world = &self.world;
        if !(world.width > 0.0 && world.height > 0.0) {
            return Err(invalid("world", "width and height must be positive"));
        }
        if world.obstacle_min_size > world.obstacle_max_size || world.obstacle_min_size < 0.0 {
            return Err(invalid("world.obstacle_min_size", "must be in 0..=obstacle_max_size"));
        }
        let bounds = world.bounds();
        for (field, zone) in [("world.base", world.base), ("world.hideout", world.hideout)] {
            if !bounds.contains(zone.center) || !(zone.radius > 0.0) {
                return Err(invalid(field, "must lie inside the world with a positive radius"));
            }
        }
        if self.tick_rate == 0 {
            return Err(invalid("tick_rate", "must be at least 1"));
        }
        if !(self.agents.speed >= 0.0 && self.agents.radius > 0.0) {
            return Err(invalid("agents", "speed must be >= 0 and radius > 0"));
        }
        if self.team.collectors > 0 && self.agents.collector_capacity == 0 {
            return Err(invalid("agents.collector_capacity", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.resources.spawn_rate) {
            return Err(invalid("resources.spawn_rate", "must be a probability"));
        }
        if !(0.0..=1.0).contains(&self.behavior.exploration_report_chance) {
            return Err(invalid("behavior.exploration_report_chance", "must be a probability"));
        }
        if self.behavior.coordinator_period == 0 {
            return Err(invalid("behavior.coordinator_period", "must be at least 1"));
        }
        if self.session.win_threshold == 0 {
            return Err(invalid("session.win_threshold", "must be at least 1"));
        }
        if self.evader.capacity == 0 {
            return Err(invalid("evader.capacity", "must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_gives_defaults() {
        let config = SimConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let yaml = "seed: 42\nevader:\n  speed: 7.0\nsession:\n  win_threshold: 4\n";
        let config = SimConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.evader.speed, 7.0);
        assert_eq!(config.evader.capacity, 3);
        assert_eq!(config.session.win_threshold, 4);
        assert_eq!(config.session.base_initial, 10);
    }

    #[test]
    fn defaults_round_trip_through_yaml() {
        let yaml = SimConfig::default().to_yaml().unwrap();
        assert_eq!(SimConfig::from_yaml_str(&yaml).unwrap(), SimConfig::default());
    }

    #[test]
    fn rejects_invalid_values() {
        let err = SimConfig::from_yaml_str("tick_rate: 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "tick_rate", .. }));
        let err = SimConfig::from_yaml_str("resources:\n  spawn_rate: 2.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        assert!(matches!(
            SimConfig::from_yaml_str("seed: [1, 2]"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn difficulty_presets() {
        let hard = SimConfig::default().with_difficulty(Difficulty::Hard);
        assert_eq!(hard.team.interceptors, 2);
        assert!((hard.effective_pool().spawn_rate - 0.0056).abs() < 1e-9);
        assert_eq!("medium".parse::<Difficulty>().unwrap(), Difficulty::Normal);
        assert!("brutal".parse::<Difficulty>().is_err());
    }

    #[test]
    fn role_params() {
        let agents = AgentConfig::default();
        let collector = agents.params_for(Role::Collector, 1.0);
        assert_eq!(collector.capacity, 5);
        assert_eq!(collector.vision_radius, 150.0);
        let interceptor = agents.params_for(Role::Interceptor, 1.3);
        assert!((interceptor.speed - 1.5 * 1.3 * 1.1).abs() < 1e-5);
    }
}
