use guardian_agents::Agent;
use guardian_core::{keys, AgentId, BaseStatus, MessageKind, Role, Vec2};
use guardian_sim::{
    Autopilot, AutopilotConfig, Difficulty, EvaderVictory, Outcome, SimConfig, Simulation,
};
use guardian_world::EvaderInput;
use proptest::prelude::*;

fn sim(config: SimConfig) -> Simulation {
    Simulation::new(config).unwrap()
}

fn set_active(sim: &mut Simulation, role: Role, active: bool) {
    for agent in sim.agents_mut() {
        if agent.role() == role {
            agent.body_mut().set_active(active);
        }
    }
}

fn first(sim: &Simulation, role: Role) -> AgentId {
    sim.roster().primary(role).unwrap().clone()
}

fn open_world() -> SimConfig {
    let mut config = SimConfig::default();
    config.world.obstacle_count = 0;
    config
}

#[test]
fn team_spawns_around_base() {
    let sim = sim(SimConfig::default());
    let base = sim.base().position();
    assert_eq!(sim.agents().len(), 4);
    let coordinator = sim.agent(&first(&sim, Role::Coordinator)).unwrap();
    assert_eq!(coordinator.position(), base);
    let status = sim.coordinator().unwrap().team_status(sim.blackboard());
    assert_eq!(status.members.len(), 3);

    let explorer = sim.agent(&first(&sim, Role::Explorer)).unwrap();
    let collector = sim.agent(&first(&sim, Role::Collector)).unwrap();
    assert!((explorer.position().distance(base) - 150.0).abs() < 60.0);
    assert!((collector.position().distance(base) - 150.0).abs() < 60.0);
    assert_eq!(sim.pool().spawned_total() as usize, sim.pool().len());
    assert_eq!(sim.evader().position(), sim.hideout().position());
}

#[test]
fn evader_win_takes_precedence_over_capture() {
    let mut config = open_world();
    config.session.base_initial = 1;
    let mut sim = sim(config);
    let base = sim.base().position();
    let interceptor = first(&sim, Role::Interceptor);
    sim.place_evader(base);
    sim.agent_mut(&interceptor)
        .unwrap()
        .body_mut()
        .place(base + Vec2::new(5.0, 0.0));

    let report = sim.step(EvaderInput::idle());

    assert_eq!(report.stolen, 1);
    assert_eq!(sim.base().stored(), 0);
    assert!(guardian_sim::capturing_interceptor(
        sim.agents(),
        sim.evader().position(),
        sim.evader().radius(),
        sim.config().behavior.catching_distance,
    )
    .is_some());
    assert_eq!(
        *sim.outcome(),
        Outcome::EvaderWon {
            reason: EvaderVictory::BaseEmptied
        }
    );
}

#[test]
fn capture_ends_session_and_gates_updates() {
    let mut sim = sim(open_world());
    let interceptor = first(&sim, Role::Interceptor);
    let spot = Vec2::new(900.0, 200.0);
    sim.place_evader(spot);
    sim.agent_mut(&interceptor)
        .unwrap()
        .body_mut()
        .place(spot + Vec2::new(20.0, 0.0));

    let report = sim.step(EvaderInput::idle());
    assert!(report.advanced);
    assert_eq!(
        report.outcome,
        Outcome::DefendersWon {
            interceptor: interceptor.clone()
        }
    );
    assert_eq!(sim.tick(), 1);

    let frozen = sim.snapshot();
    let gated = sim.step(EvaderInput::toward(Vec2::new(1.0, 0.0), 5.0));
    assert!(!gated.advanced);
    assert_eq!(sim.tick(), 1);
    assert_eq!(sim.snapshot(), frozen);
}

#[test]
fn stealth_does_not_prevent_capture() {
    let mut sim = sim(open_world());
    let interceptor = first(&sim, Role::Interceptor);
    let spot = Vec2::new(900.0, 600.0);
    sim.place_evader(spot);
    sim.agent_mut(&interceptor)
        .unwrap()
        .body_mut()
        .place(spot + Vec2::new(0.0, 25.0));

    sim.step(EvaderInput::idle().with_stealth());

    assert!(sim.evader().is_stealthed());
    assert!(matches!(sim.outcome(), Outcome::DefendersWon { .. }));
}

#[test]
fn hideout_threshold_wins_for_evader() {
    let mut config = open_world();
    config.session.win_threshold = 3;
    let mut sim = sim(config);
    set_active(&mut sim, Role::Interceptor, false);

    sim.place_evader(sim.base().position());
    for _ in 0..3 {
        sim.step(EvaderInput::idle());
    }
    assert_eq!(sim.evader().carrying(), 3);
    sim.place_evader(sim.hideout().position());
    let report = sim.step(EvaderInput::idle());

    assert_eq!(report.secured, 3);
    assert_eq!(
        report.outcome,
        Outcome::EvaderWon {
            reason: EvaderVictory::HideoutFilled
        }
    );
}

#[test]
fn steal_secure_deliver_scenario() {
    let mut sim = sim(open_world());
    set_active(&mut sim, Role::Interceptor, false);
    set_active(&mut sim, Role::Collector, false);
    let collector = first(&sim, Role::Collector);
    let pool_before = sim.pool().len();

    sim.place_evader(sim.base().position());
    for _ in 0..3 {
        sim.step(EvaderInput::idle());
    }
    assert_eq!(sim.base().stored(), 7);
    assert_eq!(sim.evader().carrying(), 3);

    sim.place_evader(sim.hideout().position());
    sim.step(EvaderInput::idle());
    assert_eq!(sim.hideout().secured(), 3);
    assert_eq!(sim.evader().carrying(), 0);

    for resource in sim.pool().active().into_iter().take(2) {
        assert!(sim.pool().collect(resource.id));
        let agent = sim.agent_mut(&collector).unwrap();
        assert!(agent.body_mut().pick_up());
    }
    assert!(sim.ledger().is_balanced());

    let base = sim.base().position();
    let agent = sim.agent_mut(&collector).unwrap();
    agent.body_mut().place(base);
    agent.body_mut().set_active(true);
    sim.step(EvaderInput::idle());

    assert_eq!(sim.base().stored(), 9);
    assert_eq!(sim.hideout().secured(), 3);
    assert_eq!(sim.pool().len(), pool_before - 2);
    assert_eq!(sim.agent(&collector).map(|a| a.body().carrying()), Some(0));
    assert!(sim.ledger().is_balanced());
    assert_eq!(*sim.outcome(), Outcome::Running);
}

#[test]
fn breach_is_broadcast_and_promoted() {
    let mut sim = sim(open_world());
    set_active(&mut sim, Role::Interceptor, false);
    sim.place_evader(sim.base().position());

    sim.step(EvaderInput::idle());
    assert_eq!(sim.blackboard().pending_alerts(), 1);
    let collector = first(&sim, Role::Collector);
    let inbox = sim.blackboard().fetch(&collector, false);
    assert!(inbox.iter().any(|m| m.kind() == MessageKind::BaseBreached));

    sim.step(EvaderInput::idle());
    assert_eq!(
        sim.blackboard().read(keys::BASE_STATUS),
        Some(BaseStatus::Breached)
    );
    assert!(sim.events(5).iter().any(|e| e.contains("stole")));
}

#[test]
fn knowledge_is_republished_each_tick() {
    let mut sim = sim(SimConfig::default());
    sim.step(EvaderInput::idle());
    let board = sim.blackboard();
    assert_eq!(board.read(keys::RESOURCES_AT_BASE), Some(sim.base().stored()));
    assert_eq!(
        board.read(keys::RESOURCE_LOCATIONS),
        Some(sim.pool().positions())
    );
    assert_eq!(board.read(keys::ELAPSED_TIME), Some(0.0));
    sim.step(EvaderInput::idle());
    assert_eq!(sim.blackboard().now(), 1.0 / 60.0);
}

#[test]
fn pause_stops_the_clock() {
    let mut sim = sim(SimConfig::default());
    sim.pause();
    assert!(!sim.step(EvaderInput::idle()).advanced);
    assert_eq!(sim.tick(), 0);
    assert!(!sim.toggle_pause());
    assert!(sim.step(EvaderInput::idle()).advanced);
    assert_eq!(sim.tick(), 1);
}

#[test]
fn same_seed_same_session() {
    let config = SimConfig::default().with_seed(99);
    let mut a = sim(config.clone());
    let mut b = sim(config);
    let mut pilot_a = Autopilot::default();
    let mut pilot_b = Autopilot::default();
    for _ in 0..300 {
        a.step_autopilot(&mut pilot_a);
        b.step_autopilot(&mut pilot_b);
    }
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn reset_restores_initial_state() {
    let mut sim = sim(SimConfig::default().with_seed(5));
    let initial = sim.snapshot();
    let mut pilot = Autopilot::default();
    sim.run(&mut pilot, 400);
    assert_ne!(sim.snapshot(), initial);

    sim.reset();

    assert_eq!(sim.snapshot(), initial);
    assert_eq!(sim.blackboard().pending_messages(), 0);
    assert!(sim.comms_log(10).is_empty());
    assert_eq!(sim.blackboard().read(keys::THIEF_POSITION), None);
}

#[test]
fn autopilot_raids_an_undefended_base() {
    let mut sim = sim(open_world());
    set_active(&mut sim, Role::Interceptor, false);
    let mut pilot = Autopilot::new(AutopilotConfig::default());

    let outcome = sim.run(&mut pilot, 3000);

    assert!(matches!(outcome, Outcome::EvaderWon { .. }), "{outcome:?}");
    assert!(sim.base().stolen() >= 3);
    assert!(sim.ledger().is_balanced());
}

#[test]
fn snapshot_serializes_for_renderers() {
    let mut sim = sim(SimConfig::default());
    let mut pilot = Autopilot::default();
    for _ in 0..30 {
        sim.step_autopilot(&mut pilot);
    }
    let json = serde_json::to_value(sim.snapshot()).unwrap();
    assert_eq!(json["agents"].as_array().map(Vec::len), Some(4));
    assert_eq!(json["outcome"]["state"], "running");
    assert_eq!(json["tick"], 30);
}

#[test]
fn difficulty_changes_team_and_speed() {
    let hard = sim(SimConfig::default().with_difficulty(Difficulty::Hard));
    assert_eq!(hard.agents().len(), 6);
    let interceptor = hard
        .agents()
        .iter()
        .find(|a| a.role() == Role::Interceptor)
        .map(Agent::body)
        .unwrap();
    assert!((interceptor.params().speed - 1.5 * 1.3 * 1.1).abs() < 1e-5);

    let easy = sim(SimConfig::default().with_difficulty(Difficulty::Easy));
    assert!(easy.roster().primary(Role::Collector).is_none());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn resources_are_conserved(seed in any::<u64>(), hard in any::<bool>()) {
        let difficulty = if hard { Difficulty::Hard } else { Difficulty::Normal };
        let mut sim = sim(SimConfig::default().with_seed(seed).with_difficulty(difficulty));
        let mut pilot = Autopilot::default();
        for _ in 0..500 {
            let report = sim.step_autopilot(&mut pilot);
            let ledger = sim.ledger();
            prop_assert!(ledger.is_balanced(), "tick {}: {:?}", report.tick, ledger);
            if !report.advanced {
                break;
            }
        }
    }
}
