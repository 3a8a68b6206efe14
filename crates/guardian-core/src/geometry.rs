//! Pure geometry helpers shared by the world, the agents and the evader.
//!
//! Nothing in here holds state; callers clamp to [`Bounds`] themselves when they mutate a
//! position.

use rand::Rng;

use crate::{Bounds, Vec2};

/// Axis-aligned rectangle given by its top-left origin and size.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub origin: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            width,
            height,
        }
    }

    pub fn min(&self) -> Vec2 {
        self.origin
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.origin.x + self.width, self.origin.y + self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.origin.x + self.width * 0.5,
            self.origin.y + self.height * 0.5,
        )
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains_point(&self, p: Vec2) -> bool {
        let max = self.max();
        p.x >= self.origin.x && p.x < max.x && p.y >= self.origin.y && p.y < max.y
    }

    /// Closest point on (or in) the rectangle to `p`.
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        let max = self.max();
        Vec2::new(
            p.x.clamp(self.origin.x, max.x.max(self.origin.x)),
            p.y.clamp(self.origin.y, max.y.max(self.origin.y)),
        )
    }

    pub fn distance_to(&self, p: Vec2) -> f32 {
        p.distance(self.closest_point(p))
    }

    /// True when a circle strictly overlaps the rectangle.
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        self.distance_to(center) < radius
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        rect_overlap(self, other)
    }
}

pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Unit direction from `from` to `to`; zero when the points coincide.
pub fn direction(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// One straight step of length `speed` from `from` toward `to` (may overshoot).
pub fn move_towards(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    from + direction(from, to) * speed
}

/// Bearing in radians from `from` to `to`.
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    (to - from).angle()
}

pub fn is_in_range(a: Vec2, b: Vec2, range: f32) -> bool {
    a.distance(b) <= range
}

pub fn circle_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    a.distance(b) < radius_a + radius_b
}

pub fn rect_overlap(a: &Rect, b: &Rect) -> bool {
    let (a_max, b_max) = (a.max(), b.max());
    a.origin.x < b_max.x && a_max.x > b.origin.x && a.origin.y < b_max.y && a_max.y > b.origin.y
}

/// Uniform point in `[margin, extent - margin]` on both axes.
///
/// Degenerates to the centre line when the margin swallows the extent.
pub fn random_position<R: Rng + ?Sized>(rng: &mut R, bounds: Bounds, margin: f32) -> Vec2 {
    let x = uniform(rng, margin, bounds.width - margin);
    let y = uniform(rng, margin, bounds.height - margin);
    Vec2::new(x, y)
}

/// Uniform unit direction.
pub fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    Vec2::from_angle(rng.gen_range(0.0..core::f32::consts::TAU))
}

/// Conservative segment/rectangle test: overlap of the segment's bounding box with the rectangle.
pub fn segment_touches_rect(a: Vec2, b: Vec2, rect: &Rect) -> bool {
    let max = rect.max();
    if a.x.max(b.x) < rect.origin.x || a.x.min(b.x) > max.x {
        return false;
    }
    if a.y.max(b.y) < rect.origin.y || a.y.min(b.y) > max.y {
        return false;
    }
    true
}

/// Range-limited sight line that is blocked by any rectangle touching the segment.
pub fn line_of_sight<'a>(
    from: Vec2,
    to: Vec2,
    blockers: impl IntoIterator<Item = &'a Rect>,
    range: f32,
) -> bool {
    if from.distance(to) > range {
        return false;
    }
    !blockers
        .into_iter()
        .any(|rect| segment_touches_rect(from, to, rect))
}

/// Uniform sample in `[lo, hi)`; the midpoint when the range is empty.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        (lo + hi) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closest_point_clamps_into_rect() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert_eq!(r.closest_point(Vec2::new(0.0, 15.0)), Vec2::new(10.0, 15.0));
        assert_eq!(r.closest_point(Vec2::new(15.0, 15.0)), Vec2::new(15.0, 15.0));
        assert_eq!(r.closest_point(Vec2::new(50.0, 50.0)), Vec2::new(30.0, 30.0));
    }

    #[test]
    fn uniform_degenerates_to_midpoint() {
        let mut rng = rand::rngs::mock::StepRng::new(0, 1);
        assert_eq!(uniform(&mut rng, 10.0, 10.0), 10.0);
        assert_eq!(uniform(&mut rng, 12.0, 8.0), 10.0);
    }
}
