/// Energy spent by explicit role actions. Energy is tracked for observers only; no behaviour
/// reads it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnergyCosts {
    pub report: f32,
    pub collect: f32,
    pub deliver: f32,
    pub pursue: f32,
    pub command: f32,
}

impl Default for EnergyCosts {
    fn default() -> Self {
        Self {
            report: 1.0,
            collect: 2.0,
            deliver: 1.0,
            pursue: 0.5,
            command: 0.5,
        }
    }
}

/// Tunables read by the role brains.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BehaviorRules {
    /// Interceptor declares capture when its last sighting is closer than this.
    pub catching_distance: f32,
    /// Ticks an explorer waits before it may report the evader again.
    pub sighting_cooldown: u32,
    /// Coordinator issues commands every this many of its own thinks.
    pub coordinator_period: u64,
    /// Base stock below which the coordinator orders collection.
    pub low_water_mark: u32,
    /// Seconds a sighting counts as "currently visible".
    pub sighting_freshness: f64,
    /// Interceptor abandons a stale last-known position within this distance.
    pub pursuit_give_up: f32,
    pub defence_ring_radius: f32,
    /// A collector attempts pickup closer than this to its target resource.
    pub pickup_radius: f32,
    /// Edge margin for random patrol targets.
    pub patrol_margin: f32,
    /// Patrol target is replaced when the mover comes this close to it.
    pub patrol_repick_distance: f32,
    /// Edge margin for explorer roaming targets.
    pub roam_margin: f32,
    /// Per-think chance an explorer sends an exploration update.
    pub exploration_report_chance: f64,
    /// Collectors that may receive a collect command per coordinator decision.
    pub commanded_collectors: usize,
    /// Half size of the square an explorer marks explored around itself.
    pub exploration_radius: f32,
    pub energy: EnergyCosts,
}

impl Default for BehaviorRules {
    fn default() -> Self {
        Self {
            catching_distance: 15.0,
            sighting_cooldown: 60,
            coordinator_period: 30,
            low_water_mark: 5,
            sighting_freshness: 1.5,
            pursuit_give_up: 20.0,
            defence_ring_radius: 100.0,
            pickup_radius: 30.0,
            patrol_margin: 30.0,
            patrol_repick_distance: 10.0,
            roam_margin: 50.0,
            exploration_report_chance: 0.05,
            commanded_collectors: 2,
            exploration_radius: 50.0,
            energy: EnergyCosts::default(),
        }
    }
}
