#![forbid(unsafe_code)]

//! Candidate slot enumeration for the expanding ring search.
//!
//! Ring `r` (1-based) sits at radius `r * min_separation` and carries
//! `min(r * slots_per_ring, max_slots_per_ring)` evenly spaced slots. Slots are
//! visited in increasing angle starting at 0°, ring by ring, outward.

use crate::config::LayoutConfig;
use crate::geometry::Point;

/// One candidate position produced by [`RingSlots`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingSlot {
    /// Ring index, starting at 1.
    pub ring: u32,
    /// Slot index within the ring, starting at 0 (angle 0°).
    pub slot: u32,
    /// Angle in degrees, counter-clockwise from +x.
    pub angle_degrees: f64,
    /// World position of the slot centre.
    pub position: Point,
}

/// Unbounded iterator over ring slots in search order.
///
/// Callers bound the walk themselves (the engine uses `take(budget)`).
#[derive(Debug, Clone)]
pub struct RingSlots {
    ring: u32,
    slot: u32,
    slots_in_ring: u32,
    ring_radius: f64,
    min_separation: f64,
    config: LayoutConfig,
}

impl RingSlots {
    #[must_use]
    pub fn new(config: &LayoutConfig) -> Self {
        let min_separation = config.min_separation();
        Self {
            ring: 1,
            slot: 0,
            slots_in_ring: config.slots_in_ring(1),
            ring_radius: min_separation,
            min_separation,
            config: *config,
        }
    }
}

impl Iterator for RingSlots {
    type Item = RingSlot;

    fn next(&mut self) -> Option<Self::Item> {
        if self.ring == u32::MAX {
            return None;
        }
        let angle_degrees = f64::from(self.slot) * 360.0 / f64::from(self.slots_in_ring);
        let out = RingSlot {
            ring: self.ring,
            slot: self.slot,
            angle_degrees,
            position: Point::from_polar_degrees(self.ring_radius, angle_degrees),
        };

        self.slot += 1;
        if self.slot >= self.slots_in_ring {
            self.ring += 1;
            self.slot = 0;
            self.slots_in_ring = self.config.slots_in_ring(self.ring);
            self.ring_radius = f64::from(self.ring) * self.min_separation;
        }
        Some(out)
    }
}

/// A candidate is free iff it keeps at least `min_separation` from every
/// already placed point.
#[inline]
pub fn is_free(candidate: Point, placed: &[Point], min_separation: f64) -> bool {
    placed
        .iter()
        .all(|other| candidate.distance(*other) >= min_separation)
}
