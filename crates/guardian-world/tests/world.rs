use std::sync::{Arc, Barrier};

use guardian_core::{Bounds, Vec2};
use guardian_nav::{GameMap, Obstacle};
use guardian_world::{
    BaseCamp, Evader, EvaderConfig, EvaderInput, Hideout, PoolConfig, ResourcePool, Zone,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn open_map() -> GameMap {
    GameMap::from_obstacles(Bounds::default(), Vec::new())
}

fn base() -> BaseCamp {
    BaseCamp::new(Zone::new(Vec2::new(600.0, 400.0), 40.0), 10)
}

#[test]
fn collection_is_exactly_once_across_threads() {
    for _ in 0..50 {
        let pool = Arc::new(ResourcePool::new(PoolConfig::default()));
        let id = pool.insert(Vec2::new(100.0, 100.0)).id;
        let barrier = Arc::new(Barrier::new(2));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let pool = Arc::clone(&pool);
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    pool.collect(id)
                })
            })
            .collect();
        let wins: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(wins.iter().filter(|w| **w).count(), 1);
        assert!(pool.is_empty());
        assert_eq!(pool.collected_total(), 1);
    }
}

#[test]
fn collect_near_removes_only_in_range_resources() {
    let pool = ResourcePool::new(PoolConfig::default());
    pool.insert(Vec2::new(100.0, 100.0));
    pool.insert(Vec2::new(300.0, 300.0));

    assert!(pool.collect_near(Vec2::new(200.0, 200.0), 30.0).is_none());
    let got = pool.collect_near(Vec2::new(110.0, 100.0), 30.0).unwrap();
    assert_eq!(got.position, Vec2::new(100.0, 100.0));
    assert!(pool.collect_near(Vec2::new(110.0, 100.0), 30.0).is_none());
    assert_eq!(pool.len(), 1);
}

#[test]
fn restored_resource_returns_with_its_id() {
    let pool = ResourcePool::new(PoolConfig::default());
    let placed = pool.insert(Vec2::new(100.0, 100.0));
    let taken = pool.collect_near(Vec2::new(100.0, 100.0), 30.0).unwrap();

    pool.restore(taken);
    pool.restore(taken);

    assert_eq!(pool.len(), 1);
    assert_eq!(pool.collected_total(), 0);
    assert_eq!(pool.spawned_total(), 1);
    assert!(pool.collect(placed.id));
}

#[test]
fn queries_see_only_active_resources() {
    let pool = ResourcePool::new(PoolConfig::default());
    let a = pool.insert(Vec2::new(100.0, 100.0));
    pool.insert(Vec2::new(140.0, 100.0));
    pool.insert(Vec2::new(500.0, 500.0));

    assert_eq!(pool.in_area(Vec2::new(120.0, 100.0), 50.0).len(), 2);
    assert_eq!(pool.nearest(Vec2::new(90.0, 100.0)).map(|r| r.id), Some(a.id));
    assert!(pool.resource_near(Vec2::new(100.0, 110.0), 20.0).is_some());

    assert!(pool.collect(a.id));
    assert!(!pool.collect(a.id));
    assert_eq!(pool.positions().len(), 2);
    assert_eq!(pool.spawned_total(), 3);
}

#[test]
fn seeding_places_resources_on_free_ground() {
    let map = GameMap::from_obstacles(
        Bounds::default(),
        vec![Obstacle::new(200.0, 200.0, 400.0, 300.0)],
    );
    let pool = ResourcePool::new(PoolConfig::default());
    let mut rng = StdRng::seed_from_u64(5);
    let placed = pool.seed(&map, &mut rng);
    assert!(placed > 0);
    for r in pool.active() {
        assert!(!map.is_blocked(r.position, 8.0));
    }
}

#[test]
fn spawning_waits_for_the_interval_and_respects_the_cap() {
    let map = open_map();
    let pool = ResourcePool::new(PoolConfig {
        spawn_rate: 1.0,
        max_on_map: 2,
        ..PoolConfig::default()
    });
    let mut rng = StdRng::seed_from_u64(9);

    for _ in 0..60 {
        assert!(pool.update(&map, &mut rng).is_none());
    }
    assert!(pool.update(&map, &mut rng).is_some());
    for _ in 0..61 {
        pool.update(&map, &mut rng);
    }
    assert_eq!(pool.len(), 2);
    for _ in 0..200 {
        assert!(pool.update(&map, &mut rng).is_none());
    }
}

#[test]
fn evader_moves_unless_blocked_and_clamps_speed() {
    let map = GameMap::from_obstacles(
        Bounds::default(),
        vec![Obstacle::new(130.0, 80.0, 20.0, 40.0)],
    );
    let mut evader = Evader::new(EvaderConfig::default(), Vec2::new(100.0, 100.0));

    evader.apply(
        EvaderInput {
            velocity: Vec2::new(0.0, 50.0),
            activate_stealth: false,
        },
        &map,
    );
    assert_eq!(evader.position(), Vec2::new(100.0, 105.0));

    // Moving right would overlap the obstacle (radius 15, gap 13 after the step).
    let mut blocked = Evader::new(EvaderConfig::default(), Vec2::new(112.0, 100.0));
    blocked.apply(EvaderInput::toward(Vec2::new(1.0, 0.0), 5.0), &map);
    assert_eq!(blocked.position(), Vec2::new(112.0, 100.0));
}

#[test]
fn stealth_runs_its_duration_then_cools_down() {
    let map = open_map();
    let cfg = EvaderConfig {
        stealth_duration: 3,
        stealth_cooldown: 2,
        ..EvaderConfig::default()
    };
    let mut evader = Evader::new(cfg, Vec2::new(500.0, 500.0));

    evader.apply(EvaderInput::idle().with_stealth(), &map);
    assert!(evader.is_stealthed());
    assert!(!evader.is_visible());
    evader.apply(EvaderInput::idle(), &map);
    evader.apply(EvaderInput::idle(), &map);
    assert!(evader.is_visible());
    assert_eq!(evader.stealth_cooldown(), 2);

    evader.apply(EvaderInput::idle().with_stealth(), &map);
    assert!(evader.is_visible());
    evader.apply(EvaderInput::idle(), &map);
    assert!(evader.stealth_ready());
}

#[test]
fn theft_is_bounded_by_capacity_and_stock() {
    let base = BaseCamp::new(Zone::new(Vec2::new(600.0, 400.0), 40.0), 2);
    let hideout = Hideout::new(Zone::new(Vec2::new(100.0, 100.0), 30.0));
    let mut evader = Evader::new(EvaderConfig::default(), Vec2::new(600.0, 400.0));

    assert_eq!(evader.steal_from(&base, 5), 2);
    assert_eq!(evader.carrying(), 2);
    assert_eq!(evader.steal_from(&base, 1), 0);

    assert_eq!(evader.secure_at(&hideout), 2);
    assert_eq!(hideout.secured(), 2);
    assert_eq!(evader.carrying(), 0);
    assert_eq!(evader.secure_at(&hideout), 0);
}

#[test]
fn steal_and_deliver_scenario_conserves_resources() {
    let base = base();
    let hideout = Hideout::new(Zone::new(Vec2::new(100.0, 100.0), 30.0));
    let pool = ResourcePool::new(PoolConfig::default());
    let mut evader = Evader::new(EvaderConfig::default(), Vec2::new(600.0, 400.0));
    for i in 0..4 {
        pool.insert(Vec2::new(200.0 + 50.0 * i as f32, 650.0));
    }
    let total = |carried: u32, evader: &Evader| {
        pool.len() as u32 + base.stored() + carried + evader.carrying() + hideout.secured()
    };
    let expected = base.initial() + pool.spawned_total();

    for _ in 0..3 {
        evader.steal_from(&base, 1);
    }
    assert_eq!((base.stored(), evader.carrying()), (7, 3));
    assert_eq!(total(0, &evader), expected);

    evader.secure_at(&hideout);
    assert_eq!((hideout.secured(), evader.carrying()), (3, 0));

    let mut carried = 0;
    for r in pool.active().into_iter().take(2) {
        if pool.collect(r.id) {
            carried += 1;
        }
    }
    assert_eq!(total(carried, &evader), expected);
    base.deliver(carried);
    carried = 0;

    assert_eq!(base.stored(), 9);
    assert_eq!(hideout.secured(), 3);
    assert_eq!(pool.len(), 2);
    assert_eq!(total(carried, &evader), expected);
}

#[test]
fn zones_reset_to_their_initial_counts() {
    let base = base();
    let hideout = Hideout::new(Zone::new(Vec2::new(100.0, 100.0), 30.0));
    base.take(4);
    base.deliver(1);
    hideout.secure(4);
    base.reset();
    hideout.reset();
    assert_eq!(base.stored(), 10);
    assert_eq!(base.breaches(), 0);
    assert_eq!(hideout.secured(), 0);
    assert!(base.contains(Vec2::new(650.0, 400.0), 15.0));
    assert!(!base.contains(Vec2::new(660.0, 400.0), 15.0));
}

proptest! {
    #[test]
    fn theft_and_securing_conserve_units(
        ops in proptest::collection::vec((any::<bool>(), 1u32..4), 1..60),
    ) {
        let base = base();
        let hideout = Hideout::new(Zone::new(Vec2::new(100.0, 100.0), 30.0));
        let config = EvaderConfig::default();
        let mut evader = Evader::new(config, Vec2::new(100.0, 100.0));
        for (steal, max) in ops {
            if steal {
                evader.steal_from(&base, max);
            } else {
                evader.secure_at(&hideout);
            }
            prop_assert_eq!(base.stored() + evader.carrying() + hideout.secured(), 10);
            prop_assert!(evader.carrying() <= config.capacity);
            prop_assert_eq!(base.stolen(), evader.carrying() + hideout.secured());
        }
    }
}
