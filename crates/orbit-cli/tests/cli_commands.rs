#![forbid(unsafe_code)]

use std::fs;
use std::path::Path;

use clap::Parser;
use orbit_cli::{Cli, CliError, run};
use orbit_web::{CanvasProgram, OrbitConfig, SessionRecorder};
use orbit_viewport::{PointerButton, Surface, ViewportInput};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn invoke(args: &[&str]) -> (Result<(), CliError>, serde_json::Value) {
    let cli = Cli::try_parse_from(std::iter::once("orbit").chain(args.iter().copied()))
        .expect("argv parses");
    let mut out = Vec::new();
    let result = run(cli, &mut out);
    let text = String::from_utf8(out).expect("utf-8 output");
    let value = if text.trim().is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_str(&text).expect("json output")
    };
    (result, value)
}

fn write(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, body).expect("write fixture");
    path.to_string_lossy().into_owned()
}

fn roster_json(n: usize) -> String {
    let rows: Vec<String> = (0..n)
        .map(|i| format!(r#"{{"id":"m{i}","x_username":"user{i}","created_at":"2024-01-01T00:00:{i:02}Z"}}"#))
        .collect();
    format!("[{}]", rows.join(","))
}

#[test]
fn layout_prints_placements_in_join_order() {
    let dir = tempdir().expect("tempdir");
    let members = write(dir.path(), "members.json", &roster_json(5));
    let (result, value) = invoke(&["layout", "--members", &members]);
    assert!(result.is_ok());

    let placements = value["placements"].as_array().expect("placements");
    assert_eq!(placements.len(), 5);
    assert_eq!(placements[0]["id"], "m0");
    assert_eq!(placements[0]["origin"]["kind"], "anchor");
    assert_eq!(placements[1]["origin"]["kind"], "ring");
    assert_eq!(value["report"]["fallback"], serde_json::json!([]));
}

#[test]
fn strict_layout_fails_with_exit_code_3_on_fallback() {
    let dir = tempdir().expect("tempdir");
    let members = write(dir.path(), "members.json", &roster_json(6));
    let config = write(
        dir.path(),
        "config.json",
        r#"{"layout":{"max_ring_probe_attempts":1}}"#,
    );
    let (result, value) = invoke(&[
        "layout", "--members", &members, "--config", &config, "--strict",
    ]);
    let err = result.expect_err("fallback must fail strict mode");
    assert_eq!(err.exit_code(), 3);
    // Output is still written before the failure.
    assert_eq!(value["placements"].as_array().map(Vec::len), Some(6));
}

#[test]
fn check_config_reports_invalid_bounds() {
    let dir = tempdir().expect("tempdir");
    let good = write(dir.path(), "good.json", r#"{"viewport":{"zoom_max":4.0}}"#);
    let (result, value) = invoke(&["check-config", &good]);
    assert!(result.is_ok());
    assert_eq!(value["config"]["viewport"]["zoom_max"], 4.0);

    let bad = write(dir.path(), "bad.json", r#"{"viewport":{"zoom_min":0}}"#);
    let (result, _) = invoke(&["check-config", &bad]);
    assert_eq!(result.expect_err("invalid").exit_code(), 2);
}

#[test]
fn missing_file_is_a_read_error() {
    let (result, _) = invoke(&["layout", "--members", "/nonexistent/orbit/members.json"]);
    assert!(matches!(result, Err(CliError::Read { .. })));
}

#[test]
fn replay_reports_final_view() {
    let mut program = CanvasProgram::new(OrbitConfig::default());
    program.resize(800.0, 600.0);
    let mut recorder = SessionRecorder::new(program);
    recorder.push_input(ViewportInput::PointerDown {
        button: PointerButton::Primary,
        x: 100.0,
        y: 100.0,
        surface: Surface::Background,
    });
    recorder.push_input(ViewportInput::PointerMove { x: 150.0, y: 130.0 });
    recorder.push_input(ViewportInput::GlobalPointerUp);
    let text = recorder.finish().to_jsonl().expect("encode");

    let dir = tempdir().expect("tempdir");
    let trace = write(dir.path(), "trace.jsonl", &text);
    let (result, value) = invoke(&["replay", "--trace", &trace]);
    assert!(result.is_ok());
    assert_eq!(value["ok"], true);
    assert_eq!(value["checkpoints"], 3);
    assert_eq!(value["final_view"]["pan_x"], 50.0);
    assert_eq!(value["final_view"]["pan_y"], 30.0);
}
