#![forbid(unsafe_code)]

//! Stateful owner of the viewport snapshot.
//!
//! [`ViewportController`] wraps [`reduce`] with the bookkeeping a host needs:
//! it keeps the single view-state instance, forwards selections to a
//! [`SelectionSink`], and counts what happened for diagnostics.

use orbit_layout::MemberId;
use tracing::{debug, trace, warn};

use crate::config::ViewportConfig;
use crate::input::ViewportInput;
use crate::reducer::{ResetReason, ViewState, ViewportEffect, ViewportSnapshot, reduce};
use crate::session::Session;

/// Receives the identifier of a clicked or tapped item.
pub trait SelectionSink {
    fn on_select(&mut self, item: &MemberId);
}

impl<F: FnMut(&MemberId)> SelectionSink for F {
    fn on_select(&mut self, item: &MemberId) {
        self(item)
    }
}

// Unvalidated configs are accepted; zoom clamping tolerates bad bounds.
fn warn_if_invalid(config: &ViewportConfig) {
    if let Err(error) = config.validate() {
        warn!(%error, "viewport config failed validation");
    }
}

/// Sink that drops selections.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSelection;

impl SelectionSink for DiscardSelection {
    fn on_select(&mut self, _item: &MemberId) {}
}

/// Event counters since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerStats {
    pub events: u64,
    pub selections: u64,
    pub resets: u64,
    pub malformed: u64,
    pub ignored: u64,
}

/// Viewport state owner and input dispatcher.
#[derive(Debug, Clone)]
pub struct ViewportController {
    config: ViewportConfig,
    snapshot: ViewportSnapshot,
    stats: ControllerStats,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

impl ViewportController {
    #[must_use]
    pub fn new(config: ViewportConfig) -> Self {
        warn_if_invalid(&config);
        Self {
            snapshot: ViewportSnapshot::new(&config),
            config,
            stats: ControllerStats::default(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Swap the config; current zoom is re-clamped into the new bounds.
    pub fn set_config(&mut self, config: ViewportConfig) {
        warn_if_invalid(&config);
        self.config = config;
        self.snapshot.view.zoom = config.clamp_zoom(self.snapshot.view.zoom);
    }

    #[must_use]
    pub const fn snapshot(&self) -> &ViewportSnapshot {
        &self.snapshot
    }

    #[must_use]
    pub const fn view(&self) -> ViewState {
        self.snapshot.view
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.snapshot.session
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.snapshot.session.is_dragging()
    }

    #[must_use]
    pub const fn stats(&self) -> ControllerStats {
        self.stats
    }

    /// Back to the initial pan/zoom; ends any session.
    pub fn reset_view(&mut self) {
        debug!("viewport reset");
        self.snapshot = ViewportSnapshot::new(&self.config);
    }

    /// Replace the view state (e.g. restoring a saved camera); zoom is clamped.
    pub fn set_view(&mut self, view: ViewState) {
        self.snapshot.view = ViewState {
            zoom: self.config.clamp_zoom(view.zoom),
            ..view
        };
    }

    /// Apply one input, discarding selections.
    pub fn dispatch(&mut self, input: &ViewportInput) -> ViewportEffect {
        self.dispatch_with(input, &mut DiscardSelection)
    }

    /// Apply one input; a resulting selection is handed to `sink`.
    pub fn dispatch_with(
        &mut self,
        input: &ViewportInput,
        sink: &mut impl SelectionSink,
    ) -> ViewportEffect {
        let before = self.snapshot.session.kind();
        let reduction = reduce(std::mem::take(&mut self.snapshot), input, &self.config);
        self.snapshot = reduction.snapshot;
        let effect = reduction.effect;
        let after = self.snapshot.session.kind();

        self.stats.events += 1;
        trace!(
            input = input.name(),
            ?before,
            ?after,
            ?effect,
            pan_x = self.snapshot.view.pan_x,
            pan_y = self.snapshot.view.pan_y,
            zoom = self.snapshot.view.zoom,
            "viewport.transition"
        );

        match &effect {
            ViewportEffect::PanStarted | ViewportEffect::PinchStarted => {
                debug!(?after, "session started");
            }
            ViewportEffect::PanEnded => debug!(?before, "session ended"),
            ViewportEffect::Selected { item } => {
                self.stats.selections += 1;
                debug!(item = %item, "item selected");
                sink.on_select(item);
            }
            ViewportEffect::Reset { reason } => {
                self.stats.resets += 1;
                if *reason == ResetReason::MalformedGesture {
                    self.stats.malformed += 1;
                    warn!(input = input.name(), ?before, "malformed gesture; session reset");
                } else {
                    debug!(?reason, ?before, "session reset");
                }
            }
            ViewportEffect::Ignored { .. } => self.stats.ignored += 1,
            _ => {}
        }
        effect
    }
}

#[cfg(test)]
mod tests {
    use super::{ControllerStats, ViewportController};
    use crate::config::ViewportConfig;
    use crate::input::{PointerButton, Surface, TouchPoint, ViewportInput};
    use crate::reducer::ViewState;
    use orbit_layout::MemberId;

    #[test]
    fn selection_reaches_closure_sink() {
        let mut controller = ViewportController::default();
        let mut picked = Vec::new();
        let mut sink = |id: &MemberId| picked.push(id.clone());
        let surface = Surface::Item(MemberId::new("m7"));
        controller.dispatch_with(
            &ViewportInput::PointerDown {
                button: PointerButton::Primary,
                x: 5.0,
                y: 5.0,
                surface: surface.clone(),
            },
            &mut sink,
        );
        controller.dispatch_with(
            &ViewportInput::PointerUp {
                x: 5.0,
                y: 5.0,
                surface,
            },
            &mut sink,
        );
        assert_eq!(picked, vec![MemberId::new("m7")]);
        assert_eq!(controller.stats().selections, 1);
    }

    #[test]
    fn stats_count_resets_and_ignored() {
        let mut controller = ViewportController::default();
        controller.dispatch(&ViewportInput::GlobalPointerUp);
        controller.dispatch(&ViewportInput::TouchStart {
            touches: vec![TouchPoint::new(1, 0.0, 0.0), TouchPoint::new(2, 5.0, 0.0)],
            surface: Surface::Background,
        });
        controller.dispatch(&ViewportInput::TouchMove { touches: vec![] });
        assert_eq!(
            controller.stats(),
            ControllerStats {
                events: 3,
                selections: 0,
                resets: 1,
                malformed: 1,
                ignored: 1,
            }
        );
    }

    #[test]
    fn set_config_reclamps_zoom() {
        let mut controller = ViewportController::default();
        controller.set_view(ViewState {
            pan_x: 3.0,
            pan_y: 4.0,
            zoom: 1.8,
        });
        controller.set_config(ViewportConfig {
            zoom_max: 1.5,
            ..ViewportConfig::default()
        });
        assert_eq!(controller.view().zoom, 1.5);
        assert_eq!(controller.view().pan_x, 3.0);
    }

    #[test]
    fn inverted_zoom_bounds_do_not_panic() {
        let mut controller = ViewportController::default();
        controller.set_config(ViewportConfig {
            zoom_min: 2.0,
            zoom_max: 1.0,
            ..ViewportConfig::default()
        });
        controller.dispatch(&ViewportInput::Wheel { delta_y: -5000.0 });
        assert_eq!(controller.view().zoom, 2.0);
        controller.dispatch(&ViewportInput::Wheel { delta_y: 5000.0 });
        assert_eq!(controller.view().zoom, 1.0);

        let fresh = ViewportController::new(ViewportConfig {
            zoom_min: f64::NAN,
            initial_zoom: 5.0,
            ..ViewportConfig::default()
        });
        assert_eq!(fresh.view().zoom, 2.0);
    }

    #[test]
    fn reset_view_restores_initial_zoom_and_idle() {
        let mut controller = ViewportController::new(ViewportConfig {
            initial_zoom: 0.8,
            ..ViewportConfig::default()
        });
        controller.dispatch(&ViewportInput::Wheel { delta_y: -300.0 });
        controller.dispatch(&ViewportInput::PointerDown {
            button: PointerButton::Primary,
            x: 0.0,
            y: 0.0,
            surface: Surface::Background,
        });
        controller.reset_view();
        assert_eq!(controller.view().zoom, 0.8);
        assert!(controller.session().is_idle());
    }
}
