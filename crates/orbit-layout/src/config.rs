#![forbid(unsafe_code)]

//! Sizing and search-budget configuration for the ring layout.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default bubble radius in world units.
pub const DEFAULT_BUBBLE_RADIUS: f64 = 80.0;
/// Default gap kept between neighbouring bubbles.
pub const DEFAULT_PADDING: f64 = 10.0;
/// Default per-member probe budget before the fallback placement kicks in.
pub const DEFAULT_MAX_RING_PROBE_ATTEMPTS: u32 = 360;

/// Layout configuration.
///
/// Every field has a default, so a partial JSON object deserializes into a
/// usable config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Radius of one rendered bubble (world units).
    pub bubble_radius: f64,
    /// Extra spacing between two bubble edges (world units).
    pub padding: f64,
    /// Candidate slots probed for one member, summed over all rings.
    pub max_ring_probe_attempts: u32,
    /// Slot count growth per ring: ring `r` has `r * slots_per_ring` slots.
    pub slots_per_ring: u32,
    /// Upper bound on slots in any single ring.
    pub max_slots_per_ring: u32,
    /// Radius of the innermost fallback circle.
    pub fallback_base_radius: f64,
    /// Radial step between fallback circles.
    pub fallback_ring_step: f64,
    /// Number of fallback circles members are spread across.
    pub fallback_ring_count: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            bubble_radius: DEFAULT_BUBBLE_RADIUS,
            padding: DEFAULT_PADDING,
            max_ring_probe_attempts: DEFAULT_MAX_RING_PROBE_ATTEMPTS,
            slots_per_ring: 8,
            max_slots_per_ring: 360,
            fallback_base_radius: 300.0,
            fallback_ring_step: 100.0,
            fallback_ring_count: 5,
        }
    }
}

/// Rejected layout configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutConfigError {
    #[error("bubble_radius must be finite and > 0 (got {0})")]
    BubbleRadius(f64),
    #[error("padding must be finite and >= 0 (got {0})")]
    Padding(f64),
    #[error("max_ring_probe_attempts must be >= 1")]
    ProbeBudget,
    #[error("slots_per_ring and max_slots_per_ring must be >= 1")]
    SlotCount,
    #[error("fallback geometry must be finite and fallback_ring_count >= 1")]
    Fallback,
}

impl LayoutConfig {
    /// Minimum centre-to-centre distance between two placements.
    #[inline]
    pub fn min_separation(&self) -> f64 {
        2.0 * self.bubble_radius + self.padding
    }

    /// Number of candidate slots on ring `ring` (1-based).
    #[inline]
    pub fn slots_in_ring(&self, ring: u32) -> u32 {
        ring.saturating_mul(self.slots_per_ring).min(self.max_slots_per_ring)
    }

    /// Check that the configuration can drive a layout.
    pub fn validate(&self) -> Result<(), LayoutConfigError> {
        if !self.bubble_radius.is_finite() || self.bubble_radius <= 0.0 {
            return Err(LayoutConfigError::BubbleRadius(self.bubble_radius));
        }
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(LayoutConfigError::Padding(self.padding));
        }
        if self.max_ring_probe_attempts == 0 {
            return Err(LayoutConfigError::ProbeBudget);
        }
        if self.slots_per_ring == 0 || self.max_slots_per_ring == 0 {
            return Err(LayoutConfigError::SlotCount);
        }
        if !self.fallback_base_radius.is_finite()
            || !self.fallback_ring_step.is_finite()
            || self.fallback_ring_count == 0
        {
            return Err(LayoutConfigError::Fallback);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{LayoutConfig, LayoutConfigError};

    #[test]
    fn default_separation_is_170() {
        let config = LayoutConfig::default();
        assert_eq!(config.min_separation(), 170.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn ring_slot_count_saturates() {
        let config = LayoutConfig::default();
        assert_eq!(config.slots_in_ring(1), 8);
        assert_eq!(config.slots_in_ring(3), 24);
        assert_eq!(config.slots_in_ring(45), 360);
        assert_eq!(config.slots_in_ring(400), 360);
        assert_eq!(config.slots_in_ring(u32::MAX), 360);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: LayoutConfig =
            serde_json::from_str(r#"{ "bubble_radius": 40.0 }"#).expect("valid config json");
        assert_eq!(config.bubble_radius, 40.0);
        assert_eq!(config.padding, 10.0);
        assert_eq!(config.max_ring_probe_attempts, 360);
    }

    #[test]
    fn validate_rejects_degenerate_values() {
        let bad = LayoutConfig {
            bubble_radius: 0.0,
            ..LayoutConfig::default()
        };
        assert_eq!(bad.validate(), Err(LayoutConfigError::BubbleRadius(0.0)));

        let bad = LayoutConfig {
            padding: f64::NAN,
            ..LayoutConfig::default()
        };
        assert!(matches!(bad.validate(), Err(LayoutConfigError::Padding(_))));

        let bad = LayoutConfig {
            max_ring_probe_attempts: 0,
            ..LayoutConfig::default()
        };
        assert_eq!(bad.validate(), Err(LayoutConfigError::ProbeBudget));

        let bad = LayoutConfig {
            fallback_ring_count: 0,
            ..LayoutConfig::default()
        };
        assert_eq!(bad.validate(), Err(LayoutConfigError::Fallback));
    }
}
