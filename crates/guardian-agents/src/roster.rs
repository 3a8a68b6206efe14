use guardian_core::{AgentId, Role};

/// Ids of every agent in the session, grouped by role in spawn order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    entries: Vec<(AgentId, Role)>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: AgentId, role: Role) {
        if !self.entries.iter().any(|(known, _)| *known == id) {
            self.entries.push((id, role));
        }
    }

    pub fn of_role(&self, role: Role) -> impl Iterator<Item = &AgentId> + '_ {
        self.entries
            .iter()
            .filter(move |(_, r)| *r == role)
            .map(|(id, _)| id)
    }

    /// First agent of `role` (e.g. the collector explorers report to).
    pub fn primary(&self, role: Role) -> Option<&AgentId> {
        self.of_role(role).next()
    }

    pub fn coordinator(&self) -> Option<&AgentId> {
        self.primary(Role::Coordinator)
    }

    pub fn role_of(&self, id: &AgentId) -> Option<Role> {
        self.entries
            .iter()
            .find(|(known, _)| known == id)
            .map(|(_, role)| *role)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AgentId, Role)> + '_ {
        self.entries.iter().map(|(id, role)| (id, *role))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
