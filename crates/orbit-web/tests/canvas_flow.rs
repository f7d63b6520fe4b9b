#![forbid(unsafe_code)]

//! Roster in, JSON events in, selections and replayable traces out.

use orbit_web::{
    CanvasProgram, OrbitConfig, Roster, SessionRecorder, SessionTrace, replay,
};
use pretty_assertions::assert_eq;

const ROSTER: &str = r#"[
    {"id":"u3","x_username":"carol","created_at":"2024-02-10T09:00:00Z"},
    {"id":"u1","x_username":"alice","created_at":"2024-01-01T09:00:00Z","privacy_answer":"mixnets"},
    {"id":"u2","x_username":"bob","created_at":"2024-01-15T09:00:00Z"}
]"#;

fn program() -> CanvasProgram {
    let mut program = CanvasProgram::new(OrbitConfig::default());
    program.resize(1000.0, 800.0);
    let roster = Roster::from_json(ROSTER).expect("roster").ordered_by_join_time();
    program.set_roster(roster);
    program
}

#[test]
fn earliest_member_is_anchored_at_centre() {
    let program = program();
    let frame = program.frame();
    let ids: Vec<_> = frame.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["u1", "u2", "u3"]);
    assert_eq!(frame.items[0].left, 500.0 - 80.0);
    assert_eq!(frame.items[0].top, 400.0 - 80.0);
    assert_eq!(
        frame.items.iter().map(|i| i.enter_delay_ms).collect::<Vec<_>>(),
        vec![0, 50, 100]
    );
    assert_eq!(program.status_line(), "3 members floating");
}

#[test]
fn tap_selects_full_record_after_zoom() {
    let mut program = program();
    program
        .push_encoded_input(r#"{"kind":"wheel","dy":-500}"#)
        .expect("wheel");
    assert!((program.view().zoom - 1.5).abs() < 1e-12);

    // u1 stays at the centre regardless of zoom.
    for json in [
        r#"{"kind":"touch","phase":"start","touches":[{"id":7,"x":510,"y":395}]}"#,
        r#"{"kind":"touch","phase":"end","touches":[]}"#,
    ] {
        program.push_encoded_input(json).expect("touch");
    }
    let picked = program.drain_selections();
    assert_eq!(picked.len(), 1);
    assert_eq!(picked[0].x_username, "alice");
    assert_eq!(picked[0].privacy_answer.as_deref(), Some("mixnets"));
}

#[test]
fn recorded_jsonl_trace_replays_to_same_view() {
    let mut recorder = SessionRecorder::new(program());
    for json in [
        r#"{"kind":"mouse","phase":"down","button":0,"x":100,"y":100}"#,
        r#"{"kind":"mouse","phase":"move","x":150,"y":130}"#,
        r#"{"kind":"mouse","phase":"up","scope":"window"}"#,
        r#"{"kind":"touch","phase":"start","touches":[{"id":0,"x":0,"y":0},{"id":1,"x":100,"y":0}]}"#,
        r#"{"kind":"touch","phase":"move","touches":[{"id":0,"x":0,"y":0},{"id":1,"x":120,"y":0}]}"#,
        r#"{"kind":"touch","phase":"move","touches":[{"id":0,"x":0,"y":0},{"id":1,"x":140,"y":0}]}"#,
        r#"{"kind":"touch","phase":"end","touches":[]}"#,
        r#"{"kind":"key","phase":"down","code":"KeyA"}"#,
    ] {
        recorder.push_encoded_input(json).expect("event");
    }
    let live_view = recorder.program().view();
    let text = recorder.finish().to_jsonl().expect("encode");

    let trace = SessionTrace::from_jsonl(&text).expect("decode");
    assert_eq!(trace.checkpoint_count(), 7);
    let roster = Roster::from_json(ROSTER).expect("roster").ordered_by_join_time();
    let result = replay(roster, &trace).expect("replay");
    assert!(result.ok());
    assert_eq!(result.final_view, live_view);
    assert_eq!(live_view.pan_x, 50.0);
    assert!((live_view.zoom - 1.4).abs() < 1e-12);
}
