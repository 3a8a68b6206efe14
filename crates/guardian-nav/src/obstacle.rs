use guardian_core::{Rect, Vec2};

/// Axis-aligned rectangular obstacle. Immutable once placed.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Obstacle {
    rect: Rect,
}

impl Obstacle {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            rect: Rect::new(x, y, width, height),
        }
    }

    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        self.rect.contains_point(p)
    }

    /// True when a circle of `radius` at `center` overlaps the obstacle.
    pub fn contains_circle(&self, center: Vec2, radius: f32) -> bool {
        self.rect.overlaps_circle(center, radius)
    }

    pub fn distance_to(&self, p: Vec2) -> f32 {
        self.rect.distance_to(p)
    }
}

impl From<Rect> for Obstacle {
    fn from(rect: Rect) -> Self {
        Self { rect }
    }
}
