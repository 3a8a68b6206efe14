//! Obstacle layout and spatial queries over it.

use std::collections::BTreeSet;

use guardian_core::geometry::{self, uniform};
use guardian_core::{Bounds, Rect, Vec2};
use rand::Rng;

use crate::Obstacle;

/// Side length of one explored-area cell.
pub const EXPLORED_CELL: f32 = 10.0;

const PLACEMENT_ATTEMPTS: usize = 200;
const FREE_POSITION_ATTEMPTS: usize = 32;
const SPIRAL_STEP: usize = 5;
const SPIRAL_RANGE: usize = 50;

/// Parameters for [`GameMap::generate`].
#[derive(Debug, Clone, PartialEq)]
pub struct MapLayout {
    /// Thickness of the four boundary walls; `0` disables them.
    pub wall_thickness: f32,
    pub obstacle_count: usize,
    pub obstacle_min_size: f32,
    pub obstacle_max_size: f32,
    /// Minimum gap between a scattered obstacle and the world edge.
    pub placement_margin: f32,
    /// Regions no scattered obstacle may overlap.
    pub safe_zones: Vec<Rect>,
}

impl Default for MapLayout {
    fn default() -> Self {
        Self {
            wall_thickness: 20.0,
            obstacle_count: 30,
            obstacle_min_size: 20.0,
            obstacle_max_size: 60.0,
            placement_margin: 50.0,
            safe_zones: Vec::new(),
        }
    }
}

impl MapLayout {
    /// Square safe zone of the given half extent around `center`.
    pub fn safe_zone(center: Vec2, half_extent: f32) -> Rect {
        Rect::new(
            center.x - half_extent,
            center.y - half_extent,
            half_extent * 2.0,
            half_extent * 2.0,
        )
    }
}

#[derive(Debug, Clone)]
pub struct GameMap {
    bounds: Bounds,
    obstacles: Vec<Obstacle>,
    explored: BTreeSet<(i32, i32)>,
}

impl GameMap {
    pub fn from_obstacles(bounds: Bounds, obstacles: Vec<Obstacle>) -> Self {
        Self {
            bounds,
            obstacles,
            explored: BTreeSet::new(),
        }
    }

    /// Boundary walls plus `layout.obstacle_count` scattered rectangles kept clear of the safe
    /// zones. An obstacle that cannot be placed after a bounded number of attempts is skipped.
    pub fn generate<R: Rng + ?Sized>(bounds: Bounds, layout: &MapLayout, rng: &mut R) -> Self {
        let mut obstacles = Vec::with_capacity(layout.obstacle_count + 4);
        let (w, h) = (bounds.width, bounds.height);
        let t = layout.wall_thickness;
        if t > 0.0 {
            obstacles.push(Obstacle::new(0.0, 0.0, w, t));
            obstacles.push(Obstacle::new(0.0, h - t, w, t));
            obstacles.push(Obstacle::new(0.0, 0.0, t, h));
            obstacles.push(Obstacle::new(w - t, 0.0, t, h));
        }

        let lo = layout.obstacle_min_size.min(layout.obstacle_max_size);
        let hi = layout.obstacle_min_size.max(layout.obstacle_max_size);
        let margin = layout.placement_margin;
        let mut skipped = 0usize;
        for _ in 0..layout.obstacle_count {
            let width = rng.gen_range(lo..=hi).round();
            let height = rng.gen_range(lo..=hi).round();
            let placed = (0..PLACEMENT_ATTEMPTS).find_map(|_| {
                let x = uniform(rng, margin, w - width - margin).round();
                let y = uniform(rng, margin, h - height - margin).round();
                let rect = Rect::new(x, y, width, height);
                let clear = !layout.safe_zones.iter().any(|zone| zone.overlaps(&rect));
                clear.then_some(Obstacle::from(rect))
            });
            match placed {
                Some(obstacle) => obstacles.push(obstacle),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            tracing::warn!(skipped, "could not place every obstacle outside the safe zones");
        }
        tracing::debug!(obstacles = obstacles.len(), "map generated");

        Self::from_obstacles(bounds, obstacles)
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// True when a circle of `radius` at `pos` overlaps any obstacle.
    pub fn is_blocked(&self, pos: Vec2, radius: f32) -> bool {
        self.obstacles.iter().any(|o| o.contains_circle(pos, radius))
    }

    /// Distance from `pos` to the nearest obstacle (infinite on an empty map).
    pub fn clearance(&self, pos: Vec2) -> f32 {
        self.obstacles
            .iter()
            .map(|o| o.distance_to(pos))
            .fold(f32::INFINITY, f32::min)
    }

    /// `pos` itself when free, otherwise the first free point of an outward spiral (rings 5 units
    /// apart, 8 bearings each). Falls back to the clamped input when the spiral finds nothing.
    pub fn nearest_free_position(&self, pos: Vec2, radius: f32) -> Vec2 {
        if !self.is_blocked(pos, radius) {
            return pos;
        }
        for offset in (1..SPIRAL_RANGE).step_by(SPIRAL_STEP) {
            for bearing in (0..360).step_by(45) {
                let dir = Vec2::from_angle((bearing as f32).to_radians());
                let candidate = self.bounds.clamp(pos + dir * offset as f32);
                if !self.is_blocked(candidate, radius) {
                    return candidate;
                }
            }
        }
        self.bounds.clamp(pos)
    }

    /// Uniform free point at least `margin` from the world edge.
    pub fn random_free_position<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        radius: f32,
        margin: f32,
    ) -> Vec2 {
        let mut last = self.bounds.center();
        for _ in 0..FREE_POSITION_ATTEMPTS {
            last = geometry::random_position(rng, self.bounds, margin);
            if !self.is_blocked(last, radius) {
                return last;
            }
        }
        self.nearest_free_position(last, radius)
    }

    /// Line of sight within `range` that no obstacle interrupts.
    pub fn has_line_of_sight(&self, from: Vec2, to: Vec2, range: f32) -> bool {
        geometry::line_of_sight(from, to, self.obstacles.iter().map(Obstacle::rect), range)
    }

    /// Mark every cell of the square of half-size `radius` around `pos` as explored.
    pub fn mark_explored(&mut self, pos: Vec2, radius: f32) {
        let reach = radius.max(0.0) as i32;
        let step = EXPLORED_CELL as usize;
        for dx in (-reach..=reach).step_by(step) {
            for dy in (-reach..=reach).step_by(step) {
                let p = Vec2::new(pos.x + dx as f32, pos.y + dy as f32);
                if self.bounds.contains(p) {
                    self.explored.insert(cell_of(p));
                }
            }
        }
    }

    pub fn is_explored(&self, pos: Vec2) -> bool {
        self.explored.contains(&cell_of(pos))
    }

    pub fn explored_cells(&self) -> usize {
        self.explored.len()
    }

    /// Fraction of the world's cells marked explored, in `[0, 1]`.
    pub fn explored_fraction(&self) -> f32 {
        let cols = (self.bounds.width / EXPLORED_CELL).ceil().max(1.0);
        let rows = (self.bounds.height / EXPLORED_CELL).ceil().max(1.0);
        (self.explored.len() as f32 / (cols * rows)).min(1.0)
    }

    pub fn clear_explored(&mut self) {
        self.explored.clear();
    }
}

fn cell_of(p: Vec2) -> (i32, i32) {
    (
        (p.x / EXPLORED_CELL).floor() as i32,
        (p.y / EXPLORED_CELL).floor() as i32,
    )
}
