#![forbid(unsafe_code)]

//! JSON host events to [`ViewportInput`].
//!
//! The JS side forwards DOM events as small JSON objects so that the same
//! strings can be pushed live, written to a trace, and replayed later:
//!
//! ```json
//! {"kind":"mouse","phase":"down","button":0,"x":120,"y":80,"target":{"item":"u1"}}
//! {"kind":"mouse","phase":"up","x":10,"y":10,"scope":"window"}
//! {"kind":"wheel","dy":-120}
//! {"kind":"touch","phase":"move","touches":[{"id":0,"x":1,"y":2},{"id":1,"x":90,"y":2}]}
//! {"kind":"focus","focused":false}
//! ```
//!
//! `target` is optional on presses and releases. When it is absent and a
//! [`RenderFrame`] is supplied, the surface is resolved by hit-testing the
//! event position; without a frame it defaults to the background.

use orbit_viewport::{PointerButton, RenderFrame, Surface, TouchPoint, ViewportInput};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputParseError {
    #[error("JSON parse error: {0}")]
    Json(String),
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("unknown phase: {0}")]
    UnknownPhase(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Scope {
    Surface,
    Window,
}

#[derive(Debug, Deserialize)]
struct RawInput {
    kind: String,
    #[serde(default)]
    phase: Option<String>,
    #[serde(default)]
    button: Option<u8>,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    dy: Option<f64>,
    #[serde(default)]
    touches: Option<Vec<TouchPoint>>,
    #[serde(default)]
    target: Option<Surface>,
    #[serde(default)]
    scope: Option<Scope>,
    #[serde(default)]
    focused: Option<bool>,
}

/// Parse one encoded host event; the target defaults to the background.
///
/// Returns `Ok(None)` for kinds with no viewport meaning (keys, focus gained,
/// unknown kinds).
pub fn parse_encoded_input(json: &str) -> Result<Option<ViewportInput>, InputParseError> {
    parse(json, None)
}

/// Like [`parse_encoded_input`], resolving missing targets against `frame`.
pub fn parse_encoded_input_with_frame(
    json: &str,
    frame: &RenderFrame,
) -> Result<Option<ViewportInput>, InputParseError> {
    parse(json, Some(frame))
}

fn parse(json: &str, frame: Option<&RenderFrame>) -> Result<Option<ViewportInput>, InputParseError> {
    let raw: RawInput =
        serde_json::from_str(json).map_err(|e| InputParseError::Json(e.to_string()))?;

    match raw.kind.as_str() {
        "mouse" => parse_mouse_event(raw, frame).map(Some),
        "wheel" => {
            let delta_y = raw.dy.ok_or(InputParseError::MissingField("dy"))?;
            Ok(Some(ViewportInput::Wheel { delta_y }))
        }
        "touch" => parse_touch_event(raw, frame).map(Some),
        "focus" => Ok(match raw.focused {
            Some(false) => Some(ViewportInput::Cancel),
            _ => None,
        }),
        _ => Ok(None),
    }
}

fn position(raw: &RawInput) -> Result<(f64, f64), InputParseError> {
    let x = raw.x.ok_or(InputParseError::MissingField("x"))?;
    let y = raw.y.ok_or(InputParseError::MissingField("y"))?;
    Ok((x, y))
}

fn resolve_target(
    target: Option<Surface>,
    x: f64,
    y: f64,
    frame: Option<&RenderFrame>,
) -> Surface {
    match (target, frame) {
        (Some(surface), _) => surface,
        (None, Some(frame)) => frame.hit_test(x, y),
        (None, None) => Surface::Background,
    }
}

fn parse_mouse_event(
    raw: RawInput,
    frame: Option<&RenderFrame>,
) -> Result<ViewportInput, InputParseError> {
    let phase = raw.phase.as_deref().unwrap_or("down");
    match phase {
        "down" => {
            let (x, y) = position(&raw)?;
            Ok(ViewportInput::PointerDown {
                button: PointerButton::from_u8(raw.button.unwrap_or(0)),
                x,
                y,
                surface: resolve_target(raw.target, x, y, frame),
            })
        }
        "move" => {
            let (x, y) = position(&raw)?;
            Ok(ViewportInput::PointerMove { x, y })
        }
        "up" => {
            if matches!(raw.scope, Some(Scope::Window)) {
                return Ok(ViewportInput::GlobalPointerUp);
            }
            let (x, y) = position(&raw)?;
            Ok(ViewportInput::PointerUp {
                x,
                y,
                surface: resolve_target(raw.target, x, y, frame),
            })
        }
        "leave" | "cancel" | "lost_capture" => Ok(ViewportInput::Cancel),
        other => Err(InputParseError::UnknownPhase(other.to_string())),
    }
}

fn parse_touch_event(
    raw: RawInput,
    frame: Option<&RenderFrame>,
) -> Result<ViewportInput, InputParseError> {
    let phase = raw.phase.as_deref().unwrap_or("start");
    if phase == "cancel" {
        return Ok(ViewportInput::Cancel);
    }
    if !matches!(phase, "start" | "move" | "end") {
        return Err(InputParseError::UnknownPhase(phase.to_string()));
    }
    let touches = raw.touches.unwrap_or_default();
    Ok(match phase {
        "start" => {
            let surface = match touches.as_slice() {
                [first] => resolve_target(raw.target, first.x, first.y, frame),
                _ => raw.target.unwrap_or_default(),
            };
            ViewportInput::TouchStart { touches, surface }
        }
        "move" => ViewportInput::TouchMove { touches },
        _ => ViewportInput::TouchEnd { touches },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbit_layout::MemberId;
    use pretty_assertions::assert_eq;

    fn parse_ok(json: &str) -> Option<ViewportInput> {
        parse_encoded_input(json).expect("valid input")
    }

    #[test]
    fn mouse_down_with_explicit_item_target() {
        assert_eq!(
            parse_ok(r#"{"kind":"mouse","phase":"down","button":0,"x":5,"y":6,"target":{"item":"u1"}}"#),
            Some(ViewportInput::PointerDown {
                button: PointerButton::Primary,
                x: 5.0,
                y: 6.0,
                surface: Surface::Item(MemberId::new("u1")),
            })
        );
    }

    #[test]
    fn window_release_becomes_global_pointer_up() {
        assert_eq!(
            parse_ok(r#"{"kind":"mouse","phase":"up","scope":"window"}"#),
            Some(ViewportInput::GlobalPointerUp)
        );
    }

    #[test]
    fn wheel_and_focus_loss() {
        assert_eq!(
            parse_ok(r#"{"kind":"wheel","dy":-120}"#),
            Some(ViewportInput::Wheel { delta_y: -120.0 })
        );
        assert_eq!(
            parse_ok(r#"{"kind":"focus","focused":false}"#),
            Some(ViewportInput::Cancel)
        );
        assert_eq!(parse_ok(r#"{"kind":"focus","focused":true}"#), None);
        assert_eq!(parse_ok(r#"{"kind":"key","phase":"down"}"#), None);
    }

    #[test]
    fn touch_phases() {
        let input = parse_ok(
            r#"{"kind":"touch","phase":"move","touches":[{"id":0,"x":1,"y":2},{"id":1,"x":9,"y":2}]}"#,
        );
        assert_eq!(
            input,
            Some(ViewportInput::TouchMove {
                touches: vec![TouchPoint::new(0, 1.0, 2.0), TouchPoint::new(1, 9.0, 2.0)],
            })
        );
        assert_eq!(
            parse_ok(r#"{"kind":"touch","phase":"end"}"#),
            Some(ViewportInput::TouchEnd { touches: vec![] })
        );
        assert_eq!(
            parse_ok(r#"{"kind":"touch","phase":"cancel"}"#),
            Some(ViewportInput::Cancel)
        );
    }

    #[test]
    fn errors_name_the_problem() {
        assert_eq!(
            parse_encoded_input(r#"{"kind":"mouse","phase":"down","y":1}"#),
            Err(InputParseError::MissingField("x"))
        );
        assert_eq!(
            parse_encoded_input(r#"{"kind":"mouse","phase":"hover","x":1,"y":1}"#),
            Err(InputParseError::UnknownPhase("hover".to_string()))
        );
        assert_eq!(
            parse_encoded_input(r#"{"kind":"wheel"}"#),
            Err(InputParseError::MissingField("dy"))
        );
        assert!(matches!(
            parse_encoded_input("not json"),
            Err(InputParseError::Json(_))
        ));
    }
}
