#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for [`CanvasProgram`].
//!
//! Only compiled on `wasm32` targets.

use js_sys::{Array, Object, Reflect};
use orbit_viewport::{RenderFrame, ViewportEffect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::canvas::CanvasProgram;
use crate::config::OrbitConfig;
use crate::roster::Roster;

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn set_js(obj: &Object, key: &str, value: JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), &value);
}

fn effect_label(effect: &ViewportEffect) -> &'static str {
    match effect {
        ViewportEffect::None => "none",
        ViewportEffect::PanStarted => "pan_started",
        ViewportEffect::Panned => "panned",
        ViewportEffect::PanEnded => "pan_ended",
        ViewportEffect::PinchStarted => "pinch_started",
        ViewportEffect::Zoomed { .. } => "zoomed",
        ViewportEffect::ItemPressed { .. } => "item_pressed",
        ViewportEffect::Selected { .. } => "selected",
        ViewportEffect::Reset { .. } => "reset",
        ViewportEffect::Ignored { .. } => "ignored",
    }
}

fn frame_to_js(frame: &RenderFrame, status: &str) -> JsValue {
    let obj = Object::new();
    set_js(&obj, "transform", JsValue::from_str(&frame.transform.css_transform()));
    set_js(
        &obj,
        "transition",
        JsValue::from_str(&frame.transform.css_transition()),
    );
    set_js(&obj, "status", JsValue::from_str(status));

    let items = Array::new();
    for item in &frame.items {
        let entry = Object::new();
        set_js(&entry, "id", JsValue::from_str(item.id.as_str()));
        set_js(&entry, "left", JsValue::from_f64(item.left));
        set_js(&entry, "top", JsValue::from_f64(item.top));
        set_js(&entry, "size", JsValue::from_f64(item.size));
        set_js(
            &entry,
            "enter_delay_ms",
            JsValue::from_f64(item.enter_delay_ms as f64),
        );
        items.push(&entry.into());
    }
    set_js(&obj, "items", items.into());
    obj.into()
}

/// Orbit canvas driven from JavaScript.
///
/// The host forwards DOM events as JSON through `pushEncodedInput`, reads
/// `frame()` after each animation frame, and drains selections to open its
/// profile modal.
#[wasm_bindgen]
pub struct OrbitCanvas {
    inner: CanvasProgram,
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

#[wasm_bindgen]
impl OrbitCanvas {
    /// Create a canvas; `config_json` may be empty for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<OrbitCanvas, JsValue> {
        install_panic_hook();
        let config = if config_json.trim().is_empty() {
            OrbitConfig::default()
        } else {
            OrbitConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        Ok(Self {
            inner: CanvasProgram::new(config),
        })
    }

    /// Replace the member list from a JSON array, ordered by join time.
    /// Returns the number of members placed by the fallback path.
    #[wasm_bindgen(js_name = setRoster)]
    pub fn set_roster(&mut self, members_json: &str) -> Result<u32, JsValue> {
        let roster = Roster::from_json(members_json)
            .map_err(|e| JsValue::from_str(&e.to_string()))?
            .ordered_by_join_time();
        let report = self.inner.set_roster(roster);
        Ok(report.fallback_count() as u32)
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.inner.resize(width, height);
    }

    /// Parse a JSON-encoded host event and apply it.
    /// Returns the effect label, or `null` if the event was not a viewport event.
    #[wasm_bindgen(js_name = pushEncodedInput)]
    pub fn push_encoded_input(&mut self, json: &str) -> Result<Option<String>, JsValue> {
        match self.inner.push_encoded_input(json) {
            Ok(effect) => Ok(effect.as_ref().map(|e| effect_label(e).to_owned())),
            Err(err) => Err(JsValue::from_str(&err.to_string())),
        }
    }

    #[wasm_bindgen(js_name = isDragging)]
    pub fn is_dragging(&self) -> bool {
        self.inner.controller().is_dragging()
    }

    #[wasm_bindgen(js_name = resetView)]
    pub fn reset_view(&mut self) {
        self.inner.reset_view();
    }

    /// Current frame as `{ transform, transition, status, items: [...] }`.
    pub fn frame(&self) -> JsValue {
        frame_to_js(&self.inner.frame(), &self.inner.status_line())
    }

    /// Selected member records since the last call, as a JSON array string.
    #[wasm_bindgen(js_name = drainSelections)]
    pub fn drain_selections(&mut self) -> Result<String, JsValue> {
        let selected = self.inner.drain_selections();
        serde_json::to_string(&selected).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = statusLine)]
    pub fn status_line(&self) -> String {
        self.inner.status_line()
    }
}
