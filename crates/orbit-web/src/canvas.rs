#![forbid(unsafe_code)]

//! Host-driven canvas program.
//!
//! [`CanvasProgram`] wires the pieces together for a single canvas: the
//! roster feeds a [`LayoutMemo`], host events feed a [`ViewportController`],
//! and [`CanvasProgram::frame`] projects one through the other. The host owns
//! the event loop; nothing here blocks, spawns, or reads a clock except to
//! time layout passes for diagnostics.
//!
//! # Selection
//!
//! A click or tap that the viewport reports as a selection is resolved back to
//! the full [`MemberRecord`] and queued until the host calls
//! [`CanvasProgram::drain_selections`].

use orbit_layout::{Layout, LayoutMemo, LayoutReport, MemberId, MemoStats};
use orbit_viewport::{
    RenderFrame, ViewState, ViewportController, ViewportEffect, ViewportInput, ViewportSize,
    project,
};
use tracing::{debug, warn};
use web_time::Instant;

use crate::config::{ConfigError, OrbitConfig};
use crate::input_parser::{InputParseError, parse_encoded_input_with_frame};
use crate::roster::{MemberRecord, Roster};

/// One canvas: roster, layout, view, and pending selections.
#[derive(Debug, Clone)]
pub struct CanvasProgram {
    config: OrbitConfig,
    roster: Roster,
    memo: LayoutMemo,
    controller: ViewportController,
    size: ViewportSize,
    selections: Vec<MemberRecord>,
}

impl Default for CanvasProgram {
    fn default() -> Self {
        Self::new(OrbitConfig::default())
    }
}

impl CanvasProgram {
    /// Create an empty canvas. `config` is assumed validated.
    #[must_use]
    pub fn new(config: OrbitConfig) -> Self {
        Self {
            config,
            roster: Roster::default(),
            memo: LayoutMemo::new(config.layout),
            controller: ViewportController::new(config.viewport),
            size: ViewportSize::default(),
            selections: Vec::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &OrbitConfig {
        &self.config
    }

    /// Validate and apply a new config; the layout is recomputed if the
    /// layout section changed.
    pub fn set_config(&mut self, config: OrbitConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.memo.set_config(config.layout);
        self.controller.set_config(config.viewport);
        self.relayout();
        Ok(())
    }

    /// Replace the member list.
    ///
    /// The layout is recomputed only when the ordered id sequence differs from
    /// the previous roster.
    pub fn set_roster(&mut self, roster: Roster) -> &LayoutReport {
        self.roster = roster;
        self.relayout();
        self.memo.current().report()
    }

    fn relayout(&mut self) {
        let start = Instant::now();
        let misses = self.memo.stats().misses;
        self.memo.layout(self.roster.members());
        if self.memo.stats().misses != misses {
            let layout = self.memo.current();
            debug!(
                members = layout.len(),
                fallback = layout.report().fallback_count(),
                elapsed_us = start.elapsed().as_micros() as u64,
                "canvas layout recomputed"
            );
        }
    }

    #[must_use]
    pub const fn roster(&self) -> &Roster {
        &self.roster
    }

    #[must_use]
    pub const fn layout(&self) -> &Layout {
        self.memo.current()
    }

    #[must_use]
    pub const fn memo_stats(&self) -> MemoStats {
        self.memo.stats()
    }

    #[must_use]
    pub const fn controller(&self) -> &ViewportController {
        &self.controller
    }

    #[must_use]
    pub const fn view(&self) -> ViewState {
        self.controller.view()
    }

    #[must_use]
    pub const fn size(&self) -> ViewportSize {
        self.size
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.size = ViewportSize::new(width.max(0.0), height.max(0.0));
    }

    pub fn reset_view(&mut self) {
        self.controller.reset_view();
    }

    /// Feed one input to the viewport.
    pub fn push_input(&mut self, input: &ViewportInput) -> ViewportEffect {
        let roster = &self.roster;
        let selections = &mut self.selections;
        let mut sink = |id: &MemberId| match roster.get(id.as_str()) {
            Some(record) => selections.push(record.clone()),
            None => warn!(item = %id, "selected item is not in the roster"),
        };
        self.controller.dispatch_with(input, &mut sink)
    }

    /// Parse and feed one JSON host event, hit-testing against the current
    /// frame when the event names no target.
    ///
    /// Returns `Ok(None)` for events with no viewport meaning.
    pub fn push_encoded_input(
        &mut self,
        json: &str,
    ) -> Result<Option<ViewportEffect>, InputParseError> {
        let frame = self.frame();
        let Some(input) = parse_encoded_input_with_frame(json, &frame)? else {
            return Ok(None);
        };
        Ok(Some(self.push_input(&input)))
    }

    /// Project the current layout through the current view.
    #[must_use]
    pub fn frame(&self) -> RenderFrame {
        project(
            self.roster.members(),
            self.memo.current(),
            self.controller.view(),
            self.size,
            &self.config.viewport,
            self.controller.is_dragging(),
        )
    }

    /// Selections queued since the last drain, oldest first.
    pub fn drain_selections(&mut self) -> Vec<MemberRecord> {
        std::mem::take(&mut self.selections)
    }

    /// Overlay text shown over the plane.
    #[must_use]
    pub fn status_line(&self) -> String {
        format!("{} members floating", self.roster.len())
    }
}
