//! Circular zones with resource counters.
//!
//! Counters are atomics so delivery and theft never need a lock; every update is a single
//! read-modify-write.

use std::sync::atomic::{AtomicU32, Ordering};

use guardian_core::geometry::circle_overlap;
use guardian_core::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Zone {
    pub center: Vec2,
    pub radius: f32,
}

impl Zone {
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// True when a body of `radius` at `position` overlaps the zone.
    pub fn overlaps(&self, position: Vec2, radius: f32) -> bool {
        circle_overlap(self.center, self.radius, position, radius)
    }
}

/// The defenders' store. Resources leave only by theft and arrive only by delivery.
#[derive(Debug)]
pub struct BaseCamp {
    zone: Zone,
    initial: u32,
    stored: AtomicU32,
    stolen: AtomicU32,
    delivered: AtomicU32,
    breaches: AtomicU32,
}

impl BaseCamp {
    pub fn new(zone: Zone, initial: u32) -> Self {
        Self {
            zone,
            initial,
            stored: AtomicU32::new(initial),
            stolen: AtomicU32::new(0),
            delivered: AtomicU32::new(0),
            breaches: AtomicU32::new(0),
        }
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    pub fn position(&self) -> Vec2 {
        self.zone.center
    }

    pub fn contains(&self, position: Vec2, radius: f32) -> bool {
        self.zone.overlaps(position, radius)
    }

    pub fn initial(&self) -> u32 {
        self.initial
    }

    pub fn stored(&self) -> u32 {
        self.stored.load(Ordering::SeqCst)
    }

    pub fn stolen(&self) -> u32 {
        self.stolen.load(Ordering::SeqCst)
    }

    pub fn delivered(&self) -> u32 {
        self.delivered.load(Ordering::SeqCst)
    }

    pub fn breaches(&self) -> u32 {
        self.breaches.load(Ordering::SeqCst)
    }

    /// Deposit delivered resources; returns the new total.
    pub fn deliver(&self, count: u32) -> u32 {
        self.delivered.fetch_add(count, Ordering::SeqCst);
        self.stored.fetch_add(count, Ordering::SeqCst) + count
    }

    /// Remove up to `max` resources; returns how many were actually taken. A non-empty take
    /// counts as one breach.
    pub fn take(&self, max: u32) -> u32 {
        let mut taken = 0;
        let _ = self
            .stored
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |stored| {
                taken = stored.min(max);
                (taken > 0).then(|| stored - taken)
            });
        if taken > 0 {
            self.stolen.fetch_add(taken, Ordering::SeqCst);
            self.breaches.fetch_add(1, Ordering::SeqCst);
        }
        taken
    }

    pub fn reset(&self) {
        self.stored.store(self.initial, Ordering::SeqCst);
        self.stolen.store(0, Ordering::SeqCst);
        self.delivered.store(0, Ordering::SeqCst);
        self.breaches.store(0, Ordering::SeqCst);
    }
}

/// The evader's drop-off. The secured count never decreases within a session.
#[derive(Debug)]
pub struct Hideout {
    zone: Zone,
    secured: AtomicU32,
}

impl Hideout {
    pub fn new(zone: Zone) -> Self {
        Self {
            zone,
            secured: AtomicU32::new(0),
        }
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    pub fn position(&self) -> Vec2 {
        self.zone.center
    }

    pub fn contains(&self, position: Vec2, radius: f32) -> bool {
        self.zone.overlaps(position, radius)
    }

    pub fn secured(&self) -> u32 {
        self.secured.load(Ordering::SeqCst)
    }

    /// Returns the new secured total.
    pub fn secure(&self, count: u32) -> u32 {
        self.secured.fetch_add(count, Ordering::SeqCst) + count
    }

    pub fn reset(&self) {
        self.secured.store(0, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_is_bounded_by_stock() {
        let base = BaseCamp::new(Zone::new(Vec2::new(600.0, 400.0), 40.0), 2);
        assert_eq!(base.take(3), 2);
        assert_eq!(base.stored(), 0);
        assert_eq!(base.take(1), 0);
        assert_eq!(base.breaches(), 1);
        assert_eq!(base.stolen(), 2);
    }
}
