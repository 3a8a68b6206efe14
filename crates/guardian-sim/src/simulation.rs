//! The tick orchestrator.
//!
//! One [`Simulation::step`] runs, in order: evader input, resource spawning, every agent's
//! movement, every agent's think, explorer vision, evader theft and drop-off, win evaluation and
//! the republish of authoritative counts to the blackboard. Agents therefore always decide on
//! this tick's positions and last tick's published knowledge.

use std::collections::VecDeque;

use guardian_agents::{
    Agent, AgentBody, CoordinatorBrain, MoveContext, Observation, Roster, ThinkContext,
};
use guardian_core::tick::stream_rng;
use guardian_core::{
    keys, AgentId, AlertKind, Blackboard, MessageBody, Role, Severity, TickContext, Vec2,
};
use guardian_nav::GameMap;
use guardian_world::{BaseCamp, Evader, EvaderInput, Hideout, Resource, ResourcePool};
use rand::rngs::StdRng;

use crate::outcome::{capturing_interceptor, evaluate, WinCheck};
use crate::snapshot::{BaseView, EvaderView, HideoutView, Snapshot};
use crate::{Autopilot, ConfigError, Outcome, ResourceLedger, SimConfig};

const MAP_STREAM: u64 = 1;
const POOL_STREAM: u64 = 2;
const AGENT_STREAM: u64 = 3;

const BREACH_PRIORITY: u8 = 9;

/// What happened during one [`Simulation::step`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    /// `false` when the session was paused or already decided.
    pub advanced: bool,
    pub stolen: u32,
    pub secured: u32,
    pub sightings: usize,
    pub resources_reported: usize,
    pub spawned: Option<Resource>,
    pub outcome: Outcome,
}

pub struct Simulation {
    config: SimConfig,
    map: GameMap,
    blackboard: Blackboard,
    base: BaseCamp,
    hideout: Hideout,
    pool: ResourcePool,
    evader: Evader,
    agents: Vec<Agent>,
    roster: Roster,
    pool_rng: StdRng,
    agent_rng: StdRng,
    tick: u64,
    outcome: Outcome,
    paused: bool,
    events: VecDeque<String>,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::assemble(config))
    }

    fn assemble(config: SimConfig) -> Self {
        let seed = config.seed;
        let map = GameMap::generate(
            config.world.bounds(),
            &config.world.layout(),
            &mut stream_rng(seed, MAP_STREAM),
        );

        let mut pool_rng = stream_rng(seed, POOL_STREAM);
        let pool = ResourcePool::new(config.effective_pool());
        pool.seed(&map, &mut pool_rng);

        let base = BaseCamp::new(config.world.base, config.session.base_initial);
        let hideout = Hideout::new(config.world.hideout);
        let evader = Evader::new(config.evader, config.world.hideout.center);
        let blackboard = Blackboard::with_history_limit(config.session.history_limit);
        blackboard.post(keys::RESOURCES_AT_BASE, base.stored());

        let (agents, roster) = spawn_team(&config, &map);
        tracing::info!(
            seed,
            agents = agents.len(),
            obstacles = map.obstacles().len(),
            resources = pool.len(),
            "session ready"
        );

        Self {
            map,
            blackboard,
            base,
            hideout,
            pool,
            evader,
            agents,
            roster,
            pool_rng,
            agent_rng: stream_rng(seed, AGENT_STREAM),
            tick: 0,
            outcome: Outcome::Running,
            paused: false,
            events: VecDeque::new(),
            config,
        }
    }

    /// Rebuild the session from its configuration; the same seed reproduces the same session.
    pub fn reset(&mut self) {
        tracing::info!(seed = self.config.seed, "session reset");
        *self = Self::assemble(self.config.clone());
    }

    pub fn reset_with_seed(&mut self, seed: u64) {
        self.config.seed = seed;
        self.reset();
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn map(&self) -> &GameMap {
        &self.map
    }

    pub fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }

    pub fn base(&self) -> &BaseCamp {
        &self.base
    }

    pub fn hideout(&self) -> &Hideout {
        &self.hideout
    }

    pub fn pool(&self) -> &ResourcePool {
        &self.pool
    }

    pub fn evader(&self) -> &Evader {
        &self.evader
    }

    /// Teleport the evader (clamped to the world). For scripted scenarios.
    pub fn place_evader(&mut self, position: Vec2) {
        self.evader.place(position, &self.map);
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    pub fn agent(&self, id: &AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id() == id)
    }

    pub fn agent_mut(&mut self, id: &AgentId) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| a.id() == id)
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn coordinator(&self) -> Option<&CoordinatorBrain> {
        self.agents.iter().find_map(Agent::coordinator)
    }

    /// Ticks completed so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.tick as f64 / f64::from(self.config.tick_rate.max(1))
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Advance one tick with the given evader input. No-op once paused or decided.
    pub fn step(&mut self, input: EvaderInput) -> TickReport {
        let mut report = TickReport {
            tick: self.tick,
            outcome: self.outcome.clone(),
            ..TickReport::default()
        };
        if self.paused || self.outcome.is_over() {
            return report;
        }
        report.advanced = true;

        let tick = TickContext::new(self.tick, self.config.tick_rate, self.config.seed);
        self.blackboard.post(keys::ELAPSED_TIME, tick.elapsed_seconds);

        self.evader.apply(input, &self.map);
        report.spawned = self.pool.update(&self.map, &mut self.pool_rng);

        let mut moves = MoveContext {
            map: &self.map,
            steering: &self.config.steering,
            rules: &self.config.behavior,
            rng: &mut self.agent_rng,
        };
        for agent in &mut self.agents {
            agent.update(&mut moves);
        }

        let mut ctx = ThinkContext {
            tick,
            blackboard: &self.blackboard,
            map: &self.map,
            base: &self.base,
            pool: &self.pool,
            roster: &self.roster,
            rules: &self.config.behavior,
            rng: &mut self.agent_rng,
        };
        for agent in &mut self.agents {
            agent.think(&mut ctx);
        }

        let resources = self.pool.active();
        let observation = Observation {
            evader_position: self.evader.position(),
            evader_visible: self.evader.is_visible(),
            resources: &resources,
        };
        for agent in &mut self.agents {
            let seen = agent.observe(&mut ctx, &observation);
            report.sightings += usize::from(seen.sighted);
            report.resources_reported += seen.resources_reported;
        }

        let explored_radius = self.config.behavior.exploration_radius;
        for agent in &self.agents {
            if agent.role() == Role::Explorer && agent.body().is_active() {
                self.map.mark_explored(agent.position(), explored_radius);
            }
        }

        self.resolve_evader(&mut report);
        self.check_outcome();
        self.republish();

        let period = self.config.session.age_out_period_ticks;
        if self.tick > 0 && tick.every(period) {
            let removed = self
                .blackboard
                .age_out_messages(self.config.session.message_max_age_seconds);
            if removed > 0 {
                tracing::debug!(removed, "aged out messages");
            }
        }

        self.tick += 1;
        report.outcome = self.outcome.clone();
        report
    }

    /// One tick with the evader driven by `pilot`.
    pub fn step_autopilot(&mut self, pilot: &mut Autopilot) -> TickReport {
        let input = pilot.plan(self);
        self.step(input)
    }

    /// Run up to `max_ticks` autopilot ticks or until the session is decided.
    pub fn run(&mut self, pilot: &mut Autopilot, max_ticks: u64) -> Outcome {
        for _ in 0..max_ticks {
            let report = self.step_autopilot(pilot);
            if !report.advanced || report.outcome.is_over() {
                break;
            }
        }
        self.outcome.clone()
    }

    fn resolve_evader(&mut self, report: &mut TickReport) {
        let position = self.evader.position();
        let radius = self.evader.radius();

        if self.base.contains(position, radius) && self.evader.has_room() {
            let stolen = self.evader.steal_from(&self.base, 1);
            if stolen > 0 {
                report.stolen = stolen;
                self.blackboard
                    .post_alert(AlertKind::BaseBreached { stolen }, Severity::Critical);
                let sender = AgentId::new("orchestrator");
                if let Err(err) = self.blackboard.broadcast(
                    sender,
                    MessageBody::BaseBreached { stolen },
                    BREACH_PRIORITY,
                ) {
                    tracing::warn!(error = %err, "breach broadcast rejected");
                }
                tracing::debug!(stolen, left = self.base.stored(), "base breached");
                self.push_event(format!("Thief stole {stolen} resource(s)"));
            }
        }

        if self.hideout.contains(position, radius) {
            let secured = self.evader.secure_at(&self.hideout);
            if secured > 0 {
                report.secured = secured;
                tracing::debug!(secured, total = self.hideout.secured(), "resources secured");
                self.push_event(format!("Secured {secured} resource(s)"));
            }
        }
    }

    fn check_outcome(&mut self) {
        let capture = capturing_interceptor(
            &self.agents,
            self.evader.position(),
            self.evader.radius(),
            self.config.behavior.catching_distance,
        );
        let outcome = evaluate(WinCheck {
            base_stored: self.base.stored(),
            hideout_secured: self.hideout.secured(),
            win_threshold: self.config.session.win_threshold,
            capture,
        });
        if outcome.is_over() {
            tracing::info!(tick = self.tick, %outcome, "session decided");
            self.push_event(outcome.to_string());
            self.outcome = outcome;
        }
    }

    fn republish(&self) {
        let at_base = self.base.stored();
        let locations = self.pool.positions();
        let collected = self.pool.collected_total();
        self.blackboard.post_many(|txn| {
            txn.post(keys::RESOURCES_AT_BASE, at_base);
            txn.post(keys::RESOURCE_LOCATIONS, locations);
            txn.post(keys::RESOURCES_COLLECTED_TOTAL, collected);
        });
    }

    fn push_event(&mut self, line: String) {
        self.events.push_back(line);
        while self.events.len() > self.config.session.event_log_limit {
            self.events.pop_front();
        }
    }

    /// The most recent session events, oldest first.
    pub fn events(&self, limit: usize) -> Vec<String> {
        let skip = self.events.len().saturating_sub(limit);
        self.events.iter().skip(skip).cloned().collect()
    }

    /// One line per recent message, oldest first.
    pub fn comms_log(&self, limit: usize) -> Vec<String> {
        self.blackboard
            .history(limit)
            .iter()
            .map(|m| m.summary())
            .collect()
    }

    pub fn ledger(&self) -> ResourceLedger {
        ResourceLedger {
            base_initial: self.config.session.base_initial,
            spawned: self.pool.spawned_total(),
            on_map: self.pool.len() as u32,
            base_stored: self.base.stored(),
            carried_by_defenders: self.agents.iter().map(|a| a.body().carrying()).sum(),
            carried_by_evader: self.evader.carrying(),
            hideout_secured: self.hideout.secured(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick,
            elapsed_seconds: self.elapsed_seconds(),
            outcome: self.outcome.clone(),
            paused: self.paused,
            bounds: self.map.bounds(),
            base: BaseView {
                zone: self.base.zone(),
                stored: self.base.stored(),
                breaches: self.base.breaches(),
            },
            hideout: HideoutView {
                zone: self.hideout.zone(),
                secured: self.hideout.secured(),
            },
            evader: EvaderView {
                position: self.evader.position(),
                radius: self.evader.radius(),
                carrying: self.evader.carrying(),
                stealthed: self.evader.is_stealthed(),
                stealth_cooldown: self.evader.stealth_cooldown(),
            },
            agents: self.agents.iter().map(Agent::view).collect(),
            resources: self.pool.positions(),
            obstacles: self.map.obstacles().iter().map(|o| *o.rect()).collect(),
            explored_fraction: self.map.explored_fraction(),
            team: self
                .coordinator()
                .map(|brain| brain.team_status(&self.blackboard)),
            ledger: self.ledger(),
        }
    }
}

/// Coordinator and interceptors start at the base; explorers and collectors are spread evenly on
/// a ring around it.
fn spawn_team(config: &SimConfig, map: &GameMap) -> (Vec<Agent>, Roster) {
    let team = config.team;
    let speed = config.difficulty.speed_multiplier();
    let base = config.world.base.center;
    let buffer = config.steering.buffer(config.agents.radius);
    let ring_count = (team.explorers + team.collectors).max(1);

    let plan = std::iter::once((Role::Coordinator, 0))
        .chain((0..team.explorers).map(|i| (Role::Explorer, i)))
        .chain((0..team.collectors).map(|i| (Role::Collector, i)))
        .chain((0..team.interceptors).map(|i| (Role::Interceptor, i)));

    let mut agents = Vec::new();
    let mut roster = Roster::new();
    let mut ring_slot = 0usize;
    for (role, index) in plan {
        let position = match role {
            Role::Coordinator | Role::Interceptor => base,
            Role::Explorer | Role::Collector => {
                let angle = ring_slot as f32 * core::f32::consts::TAU / ring_count as f32;
                ring_slot += 1;
                let raw = base + Vec2::from_angle(angle) * config.agents.spawn_ring_radius;
                map.nearest_free_position(map.bounds().clamp(raw), buffer)
            }
        };
        let id = AgentId::for_role(role, index);
        let body = AgentBody::new(
            id.clone(),
            role,
            position,
            config.agents.params_for(role, speed),
            config.stuck,
        );
        roster.add(id, role);
        agents.push(Agent::new(body));
    }

    for agent in &mut agents {
        if let Some(coordinator) = agent.coordinator_mut() {
            for (id, role) in roster.iter() {
                if role != Role::Coordinator {
                    coordinator.register(id.clone(), role);
                }
            }
        }
    }

    (agents, roster)
}
