#![forbid(unsafe_code)]

//! Normalized viewport input events.
//!
//! The host (DOM event handlers, a test, or a replayed trace) converts raw
//! pointer, wheel, and touch events into [`ViewportInput`] values. Positions
//! are viewport-local screen pixels. Touch events carry the full list of
//! touches still on the surface, like DOM `TouchEvent.touches`.

use orbit_layout::MemberId;
use serde::{Deserialize, Serialize};

/// A position in viewport-local screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Mouse button, DOM `MouseEvent.button` numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
    Other(u8),
}

impl PointerButton {
    #[must_use]
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::Primary => 0,
            Self::Middle => 1,
            Self::Secondary => 2,
            Self::Other(n) => n,
        }
    }

    #[must_use]
    pub const fn from_u8(n: u8) -> Self {
        match n {
            0 => Self::Primary,
            1 => Self::Middle,
            2 => Self::Secondary,
            other => Self::Other(other),
        }
    }
}

impl From<u8> for PointerButton {
    fn from(value: u8) -> Self {
        Self::from_u8(value)
    }
}

impl From<PointerButton> for u8 {
    fn from(value: PointerButton) -> Self {
        value.to_u8()
    }
}

/// What an event landed on.
///
/// Pans start only from the background; presses on an item are kept apart so
/// that a click reaches selection instead of pan-start logic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    #[default]
    Background,
    Item(MemberId),
}

/// One active touch contact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub id: u32,
    pub x: f64,
    pub y: f64,
}

impl TouchPoint {
    #[inline]
    pub const fn new(id: u32, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    #[inline]
    pub const fn position(self) -> ScreenPoint {
        ScreenPoint::new(self.x, self.y)
    }
}

/// Distance between the first two touches, if there are at least two.
#[must_use]
pub fn touch_distance(touches: &[TouchPoint]) -> Option<f64> {
    match touches {
        [a, b, ..] => Some(a.position().distance(b.position())),
        _ => None,
    }
}

/// Normalized viewport input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewportInput {
    PointerDown {
        button: PointerButton,
        x: f64,
        y: f64,
        #[serde(default)]
        surface: Surface,
    },
    PointerMove {
        x: f64,
        y: f64,
    },
    /// Release over the rendering surface.
    PointerUp {
        x: f64,
        y: f64,
        #[serde(default)]
        surface: Surface,
    },
    /// Release reported by a window-level listener, possibly outside the surface.
    GlobalPointerUp,
    Wheel {
        delta_y: f64,
    },
    TouchStart {
        touches: Vec<TouchPoint>,
        #[serde(default)]
        surface: Surface,
    },
    TouchMove {
        touches: Vec<TouchPoint>,
    },
    /// `touches` lists contacts still down after the release.
    TouchEnd {
        #[serde(default)]
        touches: Vec<TouchPoint>,
    },
    /// Blur, `touchcancel`, or lost pointer capture.
    Cancel,
}

impl ViewportInput {
    /// Short stable name used in logs and traces.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PointerDown { .. } => "pointer_down",
            Self::PointerMove { .. } => "pointer_move",
            Self::PointerUp { .. } => "pointer_up",
            Self::GlobalPointerUp => "global_pointer_up",
            Self::Wheel { .. } => "wheel",
            Self::TouchStart { .. } => "touch_start",
            Self::TouchMove { .. } => "touch_move",
            Self::TouchEnd { .. } => "touch_end",
            Self::Cancel => "cancel",
        }
    }
}
