#![forbid(unsafe_code)]

//! Interaction session: one pointer/touch contact from press to release.

use orbit_layout::MemberId;
use serde::{Deserialize, Serialize};

use crate::input::ScreenPoint;

/// Where an item press came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum PressSource {
    Mouse,
    Touch { touch_id: u32 },
}

/// Active interaction session.
///
/// Each variant carries only the data its gesture needs, so a pinch baseline
/// cannot exist without a pinch and a pan anchor cannot outlive its pan.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Session {
    /// No pointer or touch engaged.
    #[default]
    Idle,
    /// Primary button held after a press on the background.
    ///
    /// `anchor` is `press_position - pan_at_press`; pan follows
    /// `pointer - anchor`.
    MousePan { anchor: ScreenPoint },
    /// One finger down after a touch on the background.
    TouchPan { touch_id: u32, anchor: ScreenPoint },
    /// Two or more fingers down; `baseline` is the inter-touch distance of the
    /// previous sample.
    Pinch { baseline: f64 },
    /// Press on an item; becomes a selection on release.
    ItemPress { item: MemberId, source: PressSource },
}

/// Payload-free session discriminant for logs and stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Idle,
    MousePan,
    TouchPan,
    Pinch,
    ItemPress,
}

impl Session {
    #[must_use]
    pub const fn kind(&self) -> SessionKind {
        match self {
            Self::Idle => SessionKind::Idle,
            Self::MousePan { .. } => SessionKind::MousePan,
            Self::TouchPan { .. } => SessionKind::TouchPan,
            Self::Pinch { .. } => SessionKind::Pinch,
            Self::ItemPress { .. } => SessionKind::ItemPress,
        }
    }

    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// True while the plane follows a finger or the mouse one-to-one.
    ///
    /// Render easing is suppressed in this state.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self, Self::MousePan { .. } | Self::TouchPan { .. })
    }

    /// True for sessions owned by touch input.
    #[must_use]
    pub const fn is_touch(&self) -> bool {
        matches!(
            self,
            Self::TouchPan { .. }
                | Self::Pinch { .. }
                | Self::ItemPress {
                    source: PressSource::Touch { .. },
                    ..
                }
        )
    }
}
