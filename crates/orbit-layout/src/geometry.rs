#![forbid(unsafe_code)]

//! Plane geometry in world units.

use serde::{Deserialize, Serialize};

/// A point on the unbounded layout plane.
///
/// The origin is arbitrary; only relative distances carry meaning.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The plane origin.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point at `radius` from the origin, `degrees` counter-clockwise from +x.
    #[inline]
    pub fn from_polar_degrees(radius: f64, degrees: f64) -> Self {
        let radians = degrees.to_radians();
        Self {
            x: radians.cos() * radius,
            y: radians.sin() * radius,
        }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Distance to the origin.
    #[inline]
    pub fn magnitude(self) -> f64 {
        self.distance(Self::ORIGIN)
    }

    /// Whether both coordinates are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}
