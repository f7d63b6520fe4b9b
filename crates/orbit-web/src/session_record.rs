#![forbid(unsafe_code)]

//! Gesture session recording and deterministic replay.
//!
//! [`SessionRecorder`] wraps a [`CanvasProgram`], records every resolved
//! [`ViewportInput`] it receives, and writes a checkpoint after each one: an
//! FNV-1a checksum of the view state chained onto the previous checkpoint.
//! [`replay`] feeds the same inputs through a fresh program and reports the
//! first checkpoint whose checksum differs.
//!
//! # Trace format
//!
//! One JSON object per line, tagged by `record`:
//!
//! - **header**: schema version, viewport size, config, roster size (first).
//! - **input**: a resolved viewport input (targets already hit-tested).
//! - **resize**: viewport size change.
//! - **checkpoint**: view checksum and chain after the preceding input.
//! - **summary**: checkpoint count and final chain (last).
//!
//! Pinch zoom is incremental, so a trace keeps every intermediate touch
//! sample; replaying only the endpoints of a gesture does not reproduce it.

use orbit_viewport::{ViewState, ViewportEffect, ViewportInput, ViewportSnapshot};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::canvas::CanvasProgram;
use crate::config::{ConfigError, OrbitConfig};
use crate::input_parser::{InputParseError, parse_encoded_input_with_frame};
use crate::roster::Roster;

/// Schema version for gesture traces.
pub const SCHEMA_VERSION: &str = "orbit-gesture-trace-v1";

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

fn fnv1a64_bytes(mut hash: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

fn fnv1a64_u64(hash: u64, v: u64) -> u64 {
    fnv1a64_bytes(hash, &v.to_le_bytes())
}

fn fnv1a64_pair(prev: u64, next: u64) -> u64 {
    let hash = fnv1a64_u64(FNV_OFFSET_BASIS, prev);
    fnv1a64_u64(hash, next)
}

/// Checksum of the view state and session kind.
///
/// Floats are hashed by bit pattern, so `0.0` and `-0.0` differ.
#[must_use]
pub fn view_checksum(snapshot: &ViewportSnapshot) -> u64 {
    let ViewState { pan_x, pan_y, zoom } = snapshot.view;
    let mut hash = FNV_OFFSET_BASIS;
    for v in [pan_x.to_bits(), pan_y.to_bits(), zoom.to_bits()] {
        hash = fnv1a64_u64(hash, v);
    }
    fnv1a64_bytes(hash, &[snapshot.session.kind() as u8])
}

/// A single record in a gesture trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum TraceRecord {
    Header {
        schema: String,
        width: f64,
        height: f64,
        config: OrbitConfig,
        members: usize,
    },
    Input {
        seq: u64,
        input: ViewportInput,
    },
    Resize {
        seq: u64,
        width: f64,
        height: f64,
    },
    Checkpoint {
        seq: u64,
        checksum: u64,
        checksum_chain: u64,
    },
    Summary {
        total_checkpoints: u64,
        final_checksum_chain: u64,
    },
}

/// A complete recorded gesture trace.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionTrace {
    pub records: Vec<TraceRecord>,
}

impl SessionTrace {
    pub fn checkpoint_count(&self) -> u64 {
        self.records
            .iter()
            .filter(|r| matches!(r, TraceRecord::Checkpoint { .. }))
            .count() as u64
    }

    pub fn final_checksum_chain(&self) -> Option<u64> {
        self.records.iter().rev().find_map(|r| match r {
            TraceRecord::Summary {
                final_checksum_chain,
                ..
            } => Some(*final_checksum_chain),
            _ => None,
        })
    }

    /// Recorded inputs in order.
    pub fn inputs(&self) -> impl Iterator<Item = &ViewportInput> {
        self.records.iter().filter_map(|r| match r {
            TraceRecord::Input { input, .. } => Some(input),
            _ => None,
        })
    }

    /// Encode as JSON lines.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&serde_json::to_string(record)?);
            out.push('\n');
        }
        Ok(out)
    }

    /// Decode JSON lines; blank lines are skipped.
    pub fn from_jsonl(text: &str) -> Result<Self, ReplayError> {
        let mut records = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let record = serde_json::from_str(line).map_err(|e| ReplayError::Decode {
                line: idx + 1,
                message: e.to_string(),
            })?;
            records.push(record);
        }
        Ok(Self { records })
    }
}

/// Records a canvas session for deterministic replay.
#[derive(Debug)]
pub struct SessionRecorder {
    program: CanvasProgram,
    records: Vec<TraceRecord>,
    checksum_chain: u64,
    seq: u64,
}

impl SessionRecorder {
    /// Start recording; the header captures the program's current size,
    /// config, and roster size.
    #[must_use]
    pub fn new(program: CanvasProgram) -> Self {
        let size = program.size();
        let records = vec![TraceRecord::Header {
            schema: SCHEMA_VERSION.to_string(),
            width: size.width,
            height: size.height,
            config: *program.config(),
            members: program.roster().len(),
        }];
        Self {
            program,
            records,
            checksum_chain: 0,
            seq: 0,
        }
    }

    /// Record and apply one input, then checkpoint.
    pub fn push_input(&mut self, input: ViewportInput) -> ViewportEffect {
        let effect = self.program.push_input(&input);
        self.records.push(TraceRecord::Input {
            seq: self.seq,
            input,
        });
        self.record_checkpoint();
        self.seq += 1;
        effect
    }

    /// Parse, resolve, record, and apply one JSON host event.
    pub fn push_encoded_input(
        &mut self,
        json: &str,
    ) -> Result<Option<ViewportEffect>, InputParseError> {
        let frame = self.program.frame();
        Ok(parse_encoded_input_with_frame(json, &frame)?.map(|input| self.push_input(input)))
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.program.resize(width, height);
        let size = self.program.size();
        self.records.push(TraceRecord::Resize {
            seq: self.seq,
            width: size.width,
            height: size.height,
        });
        self.seq += 1;
    }

    /// Finish recording and return the trace.
    pub fn finish(mut self) -> SessionTrace {
        let total_checkpoints = self
            .records
            .iter()
            .filter(|r| matches!(r, TraceRecord::Checkpoint { .. }))
            .count() as u64;
        self.records.push(TraceRecord::Summary {
            total_checkpoints,
            final_checksum_chain: self.checksum_chain,
        });
        SessionTrace {
            records: self.records,
        }
    }

    pub fn program(&self) -> &CanvasProgram {
        &self.program
    }

    pub fn program_mut(&mut self) -> &mut CanvasProgram {
        &mut self.program
    }

    fn record_checkpoint(&mut self) {
        let checksum = view_checksum(self.program.controller().snapshot());
        let chain = fnv1a64_pair(self.checksum_chain, checksum);
        self.records.push(TraceRecord::Checkpoint {
            seq: self.seq,
            checksum,
            checksum_chain: chain,
        });
        self.checksum_chain = chain;
    }
}

/// Result of replaying a gesture trace.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayResult {
    pub total_checkpoints: u64,
    pub final_checksum_chain: u64,
    pub first_mismatch: Option<ReplayMismatch>,
    /// View state after the last input.
    pub final_view: ViewState,
}

impl ReplayResult {
    /// Whether the replay produced identical checksums.
    #[must_use]
    pub fn ok(&self) -> bool {
        self.first_mismatch.is_none()
    }
}

/// First checkpoint whose checksum differed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReplayMismatch {
    pub seq: u64,
    pub expected: u64,
    pub actual: u64,
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("trace missing header record")]
    MissingHeader,
    #[error("unsupported trace schema {0:?}")]
    Schema(String),
    #[error("trace line {line}: {message}")]
    Decode { line: usize, message: String },
    #[error("trace config: {0}")]
    Config(#[from] ConfigError),
}

/// Replay `trace` through a fresh program holding `roster`.
///
/// The roster only matters for selections; recorded inputs already carry
/// their resolved targets.
pub fn replay(roster: Roster, trace: &SessionTrace) -> Result<ReplayResult, ReplayError> {
    let Some(TraceRecord::Header {
        schema,
        width,
        height,
        config,
        members,
    }) = trace.records.first()
    else {
        return Err(ReplayError::MissingHeader);
    };
    if schema != SCHEMA_VERSION {
        return Err(ReplayError::Schema(schema.clone()));
    }
    config.validate()?;
    if roster.len() != *members {
        warn!(
            recorded = *members,
            supplied = roster.len(),
            "replay roster size differs from recording"
        );
    }

    let mut program = CanvasProgram::new(*config);
    program.set_roster(roster);
    program.resize(*width, *height);

    let mut checkpoints: u64 = 0;
    let mut checksum_chain: u64 = 0;
    let mut first_mismatch = None;

    for record in &trace.records {
        match record {
            TraceRecord::Input { input, .. } => {
                program.push_input(input);
            }
            TraceRecord::Resize { width, height, .. } => program.resize(*width, *height),
            TraceRecord::Checkpoint {
                seq,
                checksum: expected,
                ..
            } => {
                let actual = view_checksum(program.controller().snapshot());
                checksum_chain = fnv1a64_pair(checksum_chain, actual);
                if actual != *expected && first_mismatch.is_none() {
                    first_mismatch = Some(ReplayMismatch {
                        seq: *seq,
                        expected: *expected,
                        actual,
                    });
                }
                checkpoints += 1;
            }
            TraceRecord::Header { .. } | TraceRecord::Summary { .. } => {}
        }
    }

    Ok(ReplayResult {
        total_checkpoints: checkpoints,
        final_checksum_chain: checksum_chain,
        first_mismatch,
        final_view: program.view(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbit_viewport::{PointerButton, Surface, TouchPoint};
    use pretty_assertions::assert_eq;

    fn recorder() -> SessionRecorder {
        let mut program = CanvasProgram::default();
        program.resize(800.0, 600.0);
        SessionRecorder::new(program)
    }

    fn pinch(d: f64) -> Vec<TouchPoint> {
        vec![TouchPoint::new(0, 0.0, 0.0), TouchPoint::new(1, d, 0.0)]
    }

    #[test]
    fn fnv1a64_pair_is_deterministic() {
        assert_eq!(fnv1a64_pair(1, 2), fnv1a64_pair(1, 2));
        assert_ne!(fnv1a64_pair(1, 2), fnv1a64_pair(2, 1));
    }

    #[test]
    fn checksum_tracks_session_kind() {
        let idle = ViewportSnapshot::default();
        let mut pinching = idle.clone();
        pinching.session = orbit_viewport::Session::Pinch { baseline: 1.0 };
        assert_ne!(view_checksum(&idle), view_checksum(&pinching));
    }

    #[test]
    fn record_then_replay_matches() {
        let mut rec = recorder();
        rec.push_input(ViewportInput::PointerDown {
            button: PointerButton::Primary,
            x: 100.0,
            y: 100.0,
            surface: Surface::Background,
        });
        rec.push_input(ViewportInput::PointerMove { x: 150.0, y: 130.0 });
        rec.push_input(ViewportInput::GlobalPointerUp);
        rec.push_input(ViewportInput::Wheel { delta_y: -200.0 });
        let trace = rec.finish();

        assert_eq!(trace.checkpoint_count(), 4);
        let result = replay(Roster::default(), &trace).expect("replay");
        assert!(result.ok());
        assert_eq!(Some(result.final_checksum_chain), trace.final_checksum_chain());
        assert_eq!(result.final_view.pan_x, 50.0);
        assert!((result.final_view.zoom - 1.2).abs() < 1e-12);
    }

    #[test]
    fn jsonl_round_trip_replays_intermediate_pinch_samples() {
        let mut rec = recorder();
        rec.push_input(ViewportInput::TouchStart {
            touches: pinch(100.0),
            surface: Surface::Background,
        });
        for d in [250.0, 150.0] {
            rec.push_input(ViewportInput::TouchMove { touches: pinch(d) });
        }
        rec.push_input(ViewportInput::TouchEnd { touches: vec![] });
        let text = rec.finish().to_jsonl().expect("encode");
        assert!(text.lines().next().is_some_and(|l| l.contains(SCHEMA_VERSION)));

        let trace = SessionTrace::from_jsonl(&text).expect("decode");
        let result = replay(Roster::default(), &trace).expect("replay");
        assert!(result.ok());
        assert!((result.final_view.zoom - 1.0).abs() < 1e-12);
    }

    #[test]
    fn tampered_input_reports_first_mismatch() {
        let mut rec = recorder();
        rec.push_input(ViewportInput::Wheel { delta_y: -100.0 });
        rec.push_input(ViewportInput::Wheel { delta_y: -100.0 });
        let mut trace = rec.finish();
        if let TraceRecord::Input { input, .. } = &mut trace.records[3] {
            *input = ViewportInput::Wheel { delta_y: 100.0 };
        }
        let result = replay(Roster::default(), &trace).expect("replay");
        assert_eq!(result.first_mismatch.map(|m| m.seq), Some(1));
    }

    #[test]
    fn missing_header_and_bad_lines_are_errors() {
        let trace = SessionTrace::default();
        assert!(matches!(
            replay(Roster::default(), &trace),
            Err(ReplayError::MissingHeader)
        ));
        let err = SessionTrace::from_jsonl("\n{\"record\":\"nope\"}\n").expect_err("bad record");
        assert!(matches!(err, ReplayError::Decode { line: 2, .. }));
    }
}
