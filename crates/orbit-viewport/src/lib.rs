#![forbid(unsafe_code)]

//! Pan, zoom, and gesture handling for the Orbit canvas.
//!
//! # Role in Orbit
//! `orbit-viewport` owns the single view state of a canvas: the pan offset,
//! the zoom factor, and whichever pointer or touch session is in progress.
//! Host events arrive as [`ViewportInput`] values; [`reduce`] turns them into
//! a new [`ViewportSnapshot`] plus a [`ViewportEffect`]. Placements coming from
//! `orbit-layout` are never modified here, only projected through the view by
//! [`project`].
//!
//! # Primary responsibilities
//! - **[`reduce`]**: pure gesture reducer (mouse pan, wheel zoom, touch pan,
//!   incremental pinch, item press/selection, release-anywhere).
//! - **[`ViewportController`]**: owns the snapshot, counts events, forwards
//!   selections to a [`SelectionSink`].
//! - **[`project`]**: screen-space frame with item rectangles, plane
//!   transform, and hit testing.

pub mod config;
pub mod controller;
pub mod input;
pub mod reducer;
pub mod render;
pub mod session;

pub use config::{ViewportConfig, ViewportConfigError};
pub use controller::{ControllerStats, DiscardSelection, SelectionSink, ViewportController};
pub use input::{PointerButton, ScreenPoint, Surface, TouchPoint, ViewportInput, touch_distance};
pub use reducer::{
    IgnoredReason, Reduction, ResetReason, ViewState, ViewportEffect, ViewportSnapshot, reduce,
};
pub use render::{
    Easing, PlaneTransform, RenderFrame, RenderItem, Transition, ViewportSize, project,
    screen_to_world, world_to_screen,
};
pub use session::{PressSource, Session, SessionKind};
