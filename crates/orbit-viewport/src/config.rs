#![forbid(unsafe_code)]

//! Zoom bounds, input sensitivities, and render timing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Viewport configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Lowest reachable zoom factor (default: 0.3).
    pub zoom_min: f64,
    /// Highest reachable zoom factor (default: 2.0).
    pub zoom_max: f64,
    /// Zoom at startup and after [`reset_view`](crate::ViewportController::reset_view).
    pub initial_zoom: f64,
    /// Zoom change per wheel `delta_y` unit, sign inverted (default: 0.001).
    pub wheel_sensitivity: f64,
    /// Zoom change per pixel of inter-touch distance change (default: 0.01).
    pub pinch_sensitivity: f64,
    /// Mouse button that starts a pan (DOM numbering, default: 0).
    pub primary_button: u8,
    /// Easing duration applied to discrete pan/zoom updates while not dragging.
    pub transition_ms: u32,
    /// Per-index delay of the bubble enter animation.
    pub enter_stagger_ms: u32,
    /// Rendered bubble diameter in world units (default: 160).
    pub item_size: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            zoom_min: 0.3,
            zoom_max: 2.0,
            initial_zoom: 1.0,
            wheel_sensitivity: 0.001,
            pinch_sensitivity: 0.01,
            primary_button: 0,
            transition_ms: 100,
            enter_stagger_ms: 50,
            item_size: 160.0,
        }
    }
}

/// Rejected viewport configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewportConfigError {
    #[error("zoom bounds must satisfy 0 < zoom_min <= zoom_max (got {min}..{max})")]
    ZoomBounds { min: f64, max: f64 },
    #[error("initial_zoom {0} lies outside the zoom bounds")]
    InitialZoom(f64),
    #[error("{name} must be finite and >= 0 (got {value})")]
    Sensitivity { name: &'static str, value: f64 },
    #[error("item_size must be finite and > 0 (got {0})")]
    ItemSize(f64),
}

impl ViewportConfig {
    pub fn validate(&self) -> Result<(), ViewportConfigError> {
        let (min, max) = (self.zoom_min, self.zoom_max);
        if !min.is_finite() || !max.is_finite() || min <= 0.0 || min > max {
            return Err(ViewportConfigError::ZoomBounds { min, max });
        }
        if !(min..=max).contains(&self.initial_zoom) {
            return Err(ViewportConfigError::InitialZoom(self.initial_zoom));
        }
        for (name, value) in [
            ("wheel_sensitivity", self.wheel_sensitivity),
            ("pinch_sensitivity", self.pinch_sensitivity),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ViewportConfigError::Sensitivity { name, value });
            }
        }
        if !self.item_size.is_finite() || self.item_size <= 0.0 {
            return Err(ViewportConfigError::ItemSize(self.item_size));
        }
        Ok(())
    }

    /// Ordered zoom bounds. Total over unvalidated configs: inverted bounds
    /// are swapped and a NaN bound is dropped in favor of the other one.
    #[must_use]
    pub fn zoom_bounds(&self) -> (f64, f64) {
        let (a, b) = (self.zoom_min, self.zoom_max);
        (a.min(b), a.max(b))
    }

    /// Clamp `zoom` into the zoom bounds; NaN input yields the lower bound.
    ///
    /// Never panics, even when [`validate`](Self::validate) would reject the
    /// config.
    #[must_use]
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        let (lo, hi) = self.zoom_bounds();
        if zoom.is_nan() {
            return if lo.is_nan() { 1.0 } else { lo };
        }
        zoom.max(lo).min(hi)
    }
}
