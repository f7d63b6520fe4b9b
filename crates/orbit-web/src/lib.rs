#![forbid(unsafe_code)]

//! Host-driven web adapter for the Orbit canvas.
//!
//! # Role in Orbit
//! `orbit-web` sits between a browser host and the two pure crates. It decodes
//! the member roster, turns JSON-encoded DOM events into viewport inputs,
//! owns the per-canvas state in [`CanvasProgram`], and records gesture
//! sessions for deterministic replay. On `wasm32` it also exports
//! `OrbitCanvas` through `wasm-bindgen`.
//!
//! Nothing here depends on `web-sys`; the host owns the DOM and the event loop.

pub mod canvas;
pub mod config;
pub mod input_parser;
pub mod roster;
pub mod session_record;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::OrbitCanvas;

pub use canvas::CanvasProgram;
pub use config::{ConfigError, OrbitConfig};
pub use input_parser::{InputParseError, parse_encoded_input, parse_encoded_input_with_frame};
pub use roster::{MemberRecord, Roster, RosterError};
pub use session_record::{
    ReplayError, ReplayMismatch, ReplayResult, SCHEMA_VERSION, SessionRecorder, SessionTrace,
    TraceRecord, replay, view_checksum,
};
