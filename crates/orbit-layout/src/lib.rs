#![forbid(unsafe_code)]

//! Collision-avoiding placement of circular items on an unbounded plane.
//!
//! # Role in Orbit
//! `orbit-layout` is the pure half of the canvas: it maps an ordered member
//! list to world-space centres so that no two bubbles overlap. It knows
//! nothing about pan, zoom, or input; `orbit-viewport` consumes its
//! [`Layout`] as opaque per-member coordinates.
//!
//! # Primary responsibilities
//! - **[`layout`]**: deterministic ring search with a bounded probe budget.
//! - **[`LayoutReport`]**: fallback and duplicate accounting per pass.
//! - **[`LayoutMemo`]**: recompute only when the ordered id list changes.

pub mod config;
pub mod engine;
pub mod geometry;
pub mod member;
pub mod memo;
pub mod ring;

pub use config::{LayoutConfig, LayoutConfigError};
pub use engine::{Layout, LayoutReport, Placement, PlacementOrigin, fallback_position, layout};
pub use geometry::Point;
pub use member::{Member, MemberId};
pub use memo::{LayoutMemo, MemoStats};
pub use ring::{RingSlot, RingSlots, is_free};
