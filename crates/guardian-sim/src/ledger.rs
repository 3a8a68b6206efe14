use serde::Serialize;

/// Where every resource of a session currently is.
///
/// Units enter the session either in the base's starting stock or as pool spawns (initial seeding
/// included) and are never destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResourceLedger {
    pub base_initial: u32,
    pub spawned: u32,
    pub on_map: u32,
    pub base_stored: u32,
    pub carried_by_defenders: u32,
    pub carried_by_evader: u32,
    pub hideout_secured: u32,
}

impl ResourceLedger {
    pub fn total_in(&self) -> u32 {
        self.base_initial + self.spawned
    }

    pub fn total_accounted(&self) -> u32 {
        self.on_map
            + self.base_stored
            + self.carried_by_defenders
            + self.carried_by_evader
            + self.hideout_secured
    }

    pub fn is_balanced(&self) -> bool {
        self.total_in() == self.total_accounted()
    }
}
