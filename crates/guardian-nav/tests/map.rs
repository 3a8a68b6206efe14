use guardian_core::{Bounds, Vec2};
use guardian_nav::{GameMap, MapLayout, Obstacle};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn layout_with_zones() -> MapLayout {
    MapLayout {
        safe_zones: vec![
            MapLayout::safe_zone(Vec2::new(600.0, 400.0), 150.0),
            MapLayout::safe_zone(Vec2::new(100.0, 100.0), 50.0),
        ],
        ..MapLayout::default()
    }
}

#[test]
fn generated_map_has_walls_and_respects_safe_zones() {
    let layout = layout_with_zones();
    let mut rng = StdRng::seed_from_u64(42);
    let map = GameMap::generate(Bounds::default(), &layout, &mut rng);

    assert_eq!(map.obstacles().len(), 4 + layout.obstacle_count);
    for obstacle in &map.obstacles()[4..] {
        let rect = obstacle.rect();
        assert!(rect.width >= 20.0 && rect.width <= 60.0);
        assert!(rect.origin.x >= 50.0 && rect.max().x <= 1150.0);
        for zone in &layout.safe_zones {
            assert!(!zone.overlaps(rect), "{rect:?} overlaps {zone:?}");
        }
    }
    assert!(!map.is_blocked(Vec2::new(600.0, 400.0), 40.0));
    assert!(map.is_blocked(Vec2::new(5.0, 400.0), 1.0));
}

#[test]
fn generation_is_reproducible_for_a_seed() {
    let layout = layout_with_zones();
    let a = GameMap::generate(Bounds::default(), &layout, &mut StdRng::seed_from_u64(7));
    let b = GameMap::generate(Bounds::default(), &layout, &mut StdRng::seed_from_u64(7));
    assert_eq!(a.obstacles(), b.obstacles());
}

#[test]
fn nearest_free_position_spirals_out_of_an_obstacle() {
    let map = GameMap::from_obstacles(
        Bounds::default(),
        vec![Obstacle::new(100.0, 100.0, 20.0, 20.0)],
    );
    let inside = Vec2::new(110.0, 110.0);
    assert!(map.is_blocked(inside, 5.0));

    let free = map.nearest_free_position(inside, 5.0);
    assert!(!map.is_blocked(free, 5.0));
    assert!(free.distance(inside) < 50.0);

    let open = Vec2::new(500.0, 500.0);
    assert_eq!(map.nearest_free_position(open, 5.0), open);
}

#[test]
fn random_free_position_avoids_obstacles() {
    let mut rng = StdRng::seed_from_u64(3);
    let map = GameMap::generate(Bounds::default(), &layout_with_zones(), &mut rng);
    for _ in 0..100 {
        let p = map.random_free_position(&mut rng, 32.0, 30.0);
        assert!(Bounds::default().contains(p));
        assert!(!map.is_blocked(p, 32.0));
    }
}

#[test]
fn exploration_marks_cells_around_a_point() {
    let mut map = GameMap::from_obstacles(Bounds::default(), Vec::new());
    assert!(!map.is_explored(Vec2::new(300.0, 300.0)));

    map.mark_explored(Vec2::new(300.0, 300.0), 50.0);
    assert!(map.is_explored(Vec2::new(300.0, 300.0)));
    assert!(map.is_explored(Vec2::new(345.0, 255.0)));
    assert!(!map.is_explored(Vec2::new(400.0, 300.0)));
    assert_eq!(map.explored_cells(), 11 * 11);
    assert!(map.explored_fraction() > 0.0);

    map.clear_explored();
    assert_eq!(map.explored_cells(), 0);
}

#[test]
fn obstacles_block_line_of_sight() {
    let map = GameMap::from_obstacles(
        Bounds::default(),
        vec![Obstacle::new(200.0, 180.0, 20.0, 40.0)],
    );
    let from = Vec2::new(150.0, 200.0);
    assert!(!map.has_line_of_sight(from, Vec2::new(260.0, 200.0), 200.0));
    assert!(map.has_line_of_sight(from, Vec2::new(150.0, 300.0), 200.0));
    assert!(!map.has_line_of_sight(from, Vec2::new(150.0, 500.0), 200.0));
}
