#![forbid(unsafe_code)]

//! Pure `(snapshot, input) -> snapshot` reducer for the viewport.
//!
//! # State Machine
//!
//! ```text
//!            pointer_down(bg)            touch_start(1, bg)
//!   Idle ───────────────────▶ MousePan    Idle ─────────────▶ TouchPan
//!    ▲  ◀── pointer_up / global_up ──┘     │   touch_start(≥2) / touch_move(≥2)
//!    │                                     ▼
//!    │ ◀──────────── touch_end ────────── Pinch
//!    │
//!    └─ pointer_down(item) / touch_start(1, item) ─▶ ItemPress ─ release ─▶ Idle (+ Selected)
//! ```
//!
//! # Invariants
//!
//! 1. `view.zoom` stays in `[zoom_min, zoom_max]` after every reduction.
//! 2. While in `MousePan { anchor }`, a move to `p` sets pan to `p - anchor`,
//!    so the world point under the cursor at press time stays under it.
//! 3. Pinch zoom is incremental: each sample adds
//!    `(distance - baseline) * pinch_sensitivity` and rebases `baseline`.
//! 4. A release of any kind, including a window-level one, leaves the session
//!    `Idle`.
//! 5. Wheel input changes zoom only; it never starts or ends a session.
//!
//! # Failure Modes
//!
//! - A touch sample with fewer contacts than the session needs (pinch with one
//!   finger, pan whose finger vanished) resets to `Idle` with
//!   [`ResetReason::MalformedGesture`].
//! - Non-finite coordinates or deltas are ignored without state change.
//! - After a touch tap selects an item, the next mouse press on that item is
//!   the browser's emulated click and is ignored. Any input other than a
//!   pointer move disarms this.
//! - Inverted or NaN zoom bounds in an unvalidated config never panic; see
//!   [`ViewportConfig::clamp_zoom`].

use orbit_layout::MemberId;
use serde::{Deserialize, Serialize};

use crate::config::ViewportConfig;
use crate::input::{PointerButton, ScreenPoint, Surface, TouchPoint, ViewportInput, touch_distance};
use crate::session::{PressSource, Session};

/// Pan offset and zoom factor applied to the whole plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            pan_x: 0.0,
            pan_y: 0.0,
            zoom: 1.0,
        }
    }
}

impl ViewState {
    #[must_use]
    pub const fn pan(&self) -> ScreenPoint {
        ScreenPoint::new(self.pan_x, self.pan_y)
    }
}

/// View state plus the active session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportSnapshot {
    pub view: ViewState,
    pub session: Session,
    /// Item selected by the last touch tap. The browser follows a tap with
    /// emulated mouse events; a press on this item is swallowed once.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub touch_tap: Option<MemberId>,
}

impl ViewportSnapshot {
    /// Idle snapshot at the origin with the configured initial zoom.
    #[must_use]
    pub fn new(config: &ViewportConfig) -> Self {
        Self {
            view: ViewState {
                zoom: config.clamp_zoom(config.initial_zoom),
                ..ViewState::default()
            },
            session: Session::Idle,
            touch_tap: None,
        }
    }
}

/// Why a session returned to `Idle` without a normal end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetReason {
    /// Item press released away from the pressed item.
    Released,
    /// Window-level release ended a session.
    GlobalRelease,
    /// Blur, `touchcancel`, or lost capture.
    Cancelled,
    /// Touch data did not match the active session.
    MalformedGesture,
}

/// Why an input was dropped without changing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoredReason {
    ButtonNotAllowed,
    SessionInProgress,
    NoActiveSession,
    NonFiniteInput,
    /// Mouse press emulated by the browser after a touch tap.
    EmulatedMouse,
}

/// Observable outcome of one reduction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum ViewportEffect {
    /// Accepted, nothing visible changed (hover move, zero wheel delta).
    None,
    PanStarted,
    Panned,
    PanEnded,
    PinchStarted,
    Zoomed { from: f64, to: f64 },
    ItemPressed { item: MemberId },
    Selected { item: MemberId },
    Reset { reason: ResetReason },
    Ignored { reason: IgnoredReason },
}

impl ViewportEffect {
    #[must_use]
    pub fn selected(&self) -> Option<&MemberId> {
        match self {
            Self::Selected { item } => Some(item),
            _ => None,
        }
    }
}

/// Result of [`reduce`].
#[derive(Debug, Clone, PartialEq)]
pub struct Reduction {
    pub snapshot: ViewportSnapshot,
    pub effect: ViewportEffect,
}

impl Reduction {
    fn new(snapshot: ViewportSnapshot, effect: ViewportEffect) -> Self {
        Self { snapshot, effect }
    }

    fn ignored(snapshot: ViewportSnapshot, reason: IgnoredReason) -> Self {
        Self::new(snapshot, ViewportEffect::Ignored { reason })
    }

    fn reset(mut snapshot: ViewportSnapshot, reason: ResetReason) -> Self {
        snapshot.session = Session::Idle;
        Self::new(snapshot, ViewportEffect::Reset { reason })
    }
}

fn anchor_for(position: ScreenPoint, view: &ViewState) -> ScreenPoint {
    ScreenPoint::new(position.x - view.pan_x, position.y - view.pan_y)
}

fn pan_to(view: &mut ViewState, position: ScreenPoint, anchor: ScreenPoint) {
    view.pan_x = position.x - anchor.x;
    view.pan_y = position.y - anchor.y;
}

fn touches_finite(touches: &[TouchPoint]) -> bool {
    touches.iter().all(|t| t.position().is_finite())
}

fn zoom_by(view: &mut ViewState, delta: f64, config: &ViewportConfig) -> ViewportEffect {
    let from = view.zoom;
    let to = config.clamp_zoom(from + delta);
    view.zoom = to;
    if to == from {
        ViewportEffect::None
    } else {
        ViewportEffect::Zoomed { from, to }
    }
}

fn start_pinch(mut snapshot: ViewportSnapshot, baseline: f64) -> Reduction {
    snapshot.session = Session::Pinch { baseline };
    Reduction::new(snapshot, ViewportEffect::PinchStarted)
}

/// Apply one input to a snapshot.
///
/// Pure and total: every input yields a snapshot, malformed input included.
#[must_use]
pub fn reduce(
    mut snapshot: ViewportSnapshot,
    input: &ViewportInput,
    config: &ViewportConfig,
) -> Reduction {
    if let Some(tapped) = snapshot.touch_tap.take() {
        match input {
            ViewportInput::PointerDown {
                surface: Surface::Item(item),
                ..
            } if *item == tapped => {
                return Reduction::ignored(snapshot, IgnoredReason::EmulatedMouse);
            }
            // The emulated `mousemove` precedes `mousedown`.
            ViewportInput::PointerMove { .. } => snapshot.touch_tap = Some(tapped),
            _ => {}
        }
    }
    match input {
        ViewportInput::PointerDown {
            button,
            x,
            y,
            surface,
        } => pointer_down(snapshot, *button, ScreenPoint::new(*x, *y), surface, config),
        ViewportInput::PointerMove { x, y } => pointer_move(snapshot, ScreenPoint::new(*x, *y)),
        ViewportInput::PointerUp { surface, .. } => pointer_up(snapshot, surface),
        ViewportInput::GlobalPointerUp => global_pointer_up(snapshot),
        ViewportInput::Wheel { delta_y } => wheel(snapshot, *delta_y, config),
        ViewportInput::TouchStart { touches, surface } => touch_start(snapshot, touches, surface),
        ViewportInput::TouchMove { touches } => touch_move(snapshot, touches, config),
        ViewportInput::TouchEnd { .. } => touch_end(snapshot),
        ViewportInput::Cancel => {
            if snapshot.session.is_idle() {
                Reduction::ignored(snapshot, IgnoredReason::NoActiveSession)
            } else {
                Reduction::reset(snapshot, ResetReason::Cancelled)
            }
        }
    }
}

fn pointer_down(
    mut snapshot: ViewportSnapshot,
    button: PointerButton,
    position: ScreenPoint,
    surface: &Surface,
    config: &ViewportConfig,
) -> Reduction {
    if !position.is_finite() {
        return Reduction::ignored(snapshot, IgnoredReason::NonFiniteInput);
    }
    if button.to_u8() != config.primary_button {
        return Reduction::ignored(snapshot, IgnoredReason::ButtonNotAllowed);
    }
    if snapshot.session.is_touch() {
        return Reduction::ignored(snapshot, IgnoredReason::SessionInProgress);
    }
    // An open mouse session here missed its release; this press replaces it.

    match surface {
        Surface::Background => {
            snapshot.session = Session::MousePan {
                anchor: anchor_for(position, &snapshot.view),
            };
            Reduction::new(snapshot, ViewportEffect::PanStarted)
        }
        Surface::Item(item) => {
            snapshot.session = Session::ItemPress {
                item: item.clone(),
                source: PressSource::Mouse,
            };
            Reduction::new(snapshot, ViewportEffect::ItemPressed { item: item.clone() })
        }
    }
}

fn pointer_move(mut snapshot: ViewportSnapshot, position: ScreenPoint) -> Reduction {
    match snapshot.session {
        Session::MousePan { anchor } => {
            if !position.is_finite() {
                return Reduction::ignored(snapshot, IgnoredReason::NonFiniteInput);
            }
            pan_to(&mut snapshot.view, position, anchor);
            Reduction::new(snapshot, ViewportEffect::Panned)
        }
        _ => Reduction::new(snapshot, ViewportEffect::None),
    }
}

fn pointer_up(snapshot: ViewportSnapshot, surface: &Surface) -> Reduction {
    match &snapshot.session {
        Session::Idle => Reduction::ignored(snapshot, IgnoredReason::NoActiveSession),
        Session::MousePan { .. } => {
            let mut snapshot = snapshot;
            snapshot.session = Session::Idle;
            Reduction::new(snapshot, ViewportEffect::PanEnded)
        }
        Session::ItemPress {
            item,
            source: PressSource::Mouse,
        } => {
            let released_on_item = matches!(surface, Surface::Item(over) if over == item);
            let item = item.clone();
            if released_on_item {
                let mut snapshot = snapshot;
                snapshot.session = Session::Idle;
                Reduction::new(snapshot, ViewportEffect::Selected { item })
            } else {
                Reduction::reset(snapshot, ResetReason::Released)
            }
        }
        // Compatibility mouse events fired during a touch gesture.
        _ => Reduction::ignored(snapshot, IgnoredReason::SessionInProgress),
    }
}

fn global_pointer_up(snapshot: ViewportSnapshot) -> Reduction {
    match snapshot.session {
        Session::Idle => Reduction::ignored(snapshot, IgnoredReason::NoActiveSession),
        Session::MousePan { .. } => {
            let mut snapshot = snapshot;
            snapshot.session = Session::Idle;
            Reduction::new(snapshot, ViewportEffect::PanEnded)
        }
        _ => Reduction::reset(snapshot, ResetReason::GlobalRelease),
    }
}

fn wheel(mut snapshot: ViewportSnapshot, delta_y: f64, config: &ViewportConfig) -> Reduction {
    if !delta_y.is_finite() {
        return Reduction::ignored(snapshot, IgnoredReason::NonFiniteInput);
    }
    let effect = zoom_by(&mut snapshot.view, -delta_y * config.wheel_sensitivity, config);
    Reduction::new(snapshot, effect)
}

fn touch_start(
    mut snapshot: ViewportSnapshot,
    touches: &[TouchPoint],
    surface: &Surface,
) -> Reduction {
    if !touches_finite(touches) {
        return Reduction::ignored(snapshot, IgnoredReason::NonFiniteInput);
    }
    if let Some(baseline) = touch_distance(touches) {
        return start_pinch(snapshot, baseline);
    }
    let [touch] = touches else {
        return Reduction::reset(snapshot, ResetReason::MalformedGesture);
    };

    match surface {
        Surface::Background => {
            snapshot.session = Session::TouchPan {
                touch_id: touch.id,
                anchor: anchor_for(touch.position(), &snapshot.view),
            };
            Reduction::new(snapshot, ViewportEffect::PanStarted)
        }
        Surface::Item(item) => {
            snapshot.session = Session::ItemPress {
                item: item.clone(),
                source: PressSource::Touch { touch_id: touch.id },
            };
            Reduction::new(snapshot, ViewportEffect::ItemPressed { item: item.clone() })
        }
    }
}

fn touch_move(
    mut snapshot: ViewportSnapshot,
    touches: &[TouchPoint],
    config: &ViewportConfig,
) -> Reduction {
    if !touches_finite(touches) {
        return Reduction::ignored(snapshot, IgnoredReason::NonFiniteInput);
    }
    let distance = touch_distance(touches);

    match snapshot.session {
        Session::Pinch { baseline } => match distance {
            Some(current) => {
                let effect = zoom_by(
                    &mut snapshot.view,
                    (current - baseline) * config.pinch_sensitivity,
                    config,
                );
                snapshot.session = Session::Pinch { baseline: current };
                Reduction::new(snapshot, effect)
            }
            None => Reduction::reset(snapshot, ResetReason::MalformedGesture),
        },
        Session::TouchPan { touch_id, anchor } => {
            if let Some(baseline) = distance {
                return start_pinch(snapshot, baseline);
            }
            match touches.iter().find(|t| t.id == touch_id) {
                Some(touch) => {
                    pan_to(&mut snapshot.view, touch.position(), anchor);
                    Reduction::new(snapshot, ViewportEffect::Panned)
                }
                None => Reduction::reset(snapshot, ResetReason::MalformedGesture),
            }
        }
        Session::ItemPress {
            source: PressSource::Touch { .. },
            ..
        }
        | Session::Idle => match distance {
            Some(baseline) => start_pinch(snapshot, baseline),
            None if snapshot.session.is_idle() => {
                Reduction::ignored(snapshot, IgnoredReason::NoActiveSession)
            }
            None => Reduction::new(snapshot, ViewportEffect::None),
        },
        _ => Reduction::ignored(snapshot, IgnoredReason::SessionInProgress),
    }
}

fn touch_end(snapshot: ViewportSnapshot) -> Reduction {
    match &snapshot.session {
        Session::Idle => Reduction::ignored(snapshot, IgnoredReason::NoActiveSession),
        Session::TouchPan { .. } => {
            let mut snapshot = snapshot;
            snapshot.session = Session::Idle;
            Reduction::new(snapshot, ViewportEffect::PanEnded)
        }
        Session::ItemPress {
            item,
            source: PressSource::Touch { .. },
        } => {
            let item = item.clone();
            let mut snapshot = snapshot;
            snapshot.session = Session::Idle;
            snapshot.touch_tap = Some(item.clone());
            Reduction::new(snapshot, ViewportEffect::Selected { item })
        }
        Session::Pinch { .. } => Reduction::reset(snapshot, ResetReason::Released),
        _ => Reduction::ignored(snapshot, IgnoredReason::SessionInProgress),
    }
}
