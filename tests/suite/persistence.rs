//! Storage behaviour across restarts.

use std::fs;

use cohort_types::{GradeRecord, Phase, ProgramState};

use crate::common::Harness;

#[test]
fn state_and_ledger_survive_restart() {
    let mut h = Harness::new();
    h.say("!level");
    h.say("!phase");
    h.say("!grade Ana_Perez | 18");

    h.restart();

    let state = h.dispatcher.program().snapshot();
    assert_eq!(state.level.get(), 2);
    assert_eq!(state.phase, Phase::Evaluation);
    assert_eq!(h.say("!summary").as_deref(), Some("📋 Registered evaluations: **1**"));
}

#[test]
fn stored_documents_have_expected_shape() {
    let mut h = Harness::new();
    h.say("!phase");
    h.say("!grade Ana_Perez | 12");

    let state: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(h.state_file()).unwrap()).unwrap();
    assert_eq!(
        state,
        serde_json::json!({
            "level": 1,
            "phase": "EVALUATION",
            "promotion": 1,
            "active": true
        })
    );

    let grades: Vec<serde_json::Value> =
        serde_json::from_str(&fs::read_to_string(h.grades_file()).unwrap()).unwrap();
    assert_eq!(grades.len(), 1);
    let entry = &grades[0];
    assert_eq!(entry["trainee"], "Ana_Perez");
    assert_eq!(entry["score"], 12);
    assert_eq!(entry["gradedBy"], crate::common::INSTRUCTOR);
    assert!(entry["timestamp"].as_i64().is_some_and(|ts| ts > 0));
}

#[test]
fn corrupt_state_starts_fresh() {
    let mut h = Harness::new();
    h.say("!level");
    fs::write(h.state_file(), "{\"level\": 9, \"phase\": \"MATERIAL\"").unwrap();
    fs::write(h.grades_file(), "not json at all").unwrap();

    h.restart();

    assert_eq!(h.dispatcher.program().snapshot(), ProgramState::default());
    assert!(h.dispatcher.program().ledger().is_empty());
}

#[test]
fn reset_clears_both_documents() {
    let mut h = Harness::new();
    h.say("!phase");
    h.say("!grade Ana_Perez | 3");
    h.say("!level");

    assert_eq!(h.say("!reset-demo").as_deref(), Some("♻️ Demo system has been reset"));

    h.restart();
    assert_eq!(h.dispatcher.program().snapshot(), ProgramState::default());
    let grades: Vec<GradeRecord> =
        serde_json::from_str(&fs::read_to_string(h.grades_file()).unwrap()).unwrap();
    assert!(grades.is_empty());
}

#[test]
fn audit_trail_records_each_event() {
    let mut h = Harness::new();
    h.dispatcher.announce_start("test");
    h.say("!phase");
    h.say("!grade Ana_Perez | 3");
    h.say("!level");
    h.say("!reset-demo");
    h.say("!status");
    h.say("!summary");
    h.say("!help");
    h.say("!grade Ana_Perez | 3");

    let messages: Vec<String> = h
        .audit_lines()
        .iter()
        .map(|line| {
            assert!(line.starts_with('['), "audit line lacks timestamp: {line}");
            line.split_once("] ").map(|(_, msg)| msg.to_string()).unwrap()
        })
        .collect();
    assert_eq!(
        messages,
        vec![
            "Bot started (test)",
            "Phase changed to EVALUATION",
            "Grade registered for Ana_Perez",
            "Advanced to level 2",
            "Demo reset executed",
            "Status requested",
            "Summary requested (0)",
            "Help requested",
            "Grade refused: The system is not in evaluation phase (current phase: MATERIAL)",
        ]
    );
    assert!(h.data_dir().join("audit.log").exists());
}

#[test]
fn storage_failure_is_reported_not_fatal() {
    let mut h = Harness::with_config("[storage]\nstate_file = \"blocker/state.json\"");
    // A plain file where the state directory should be makes every save fail.
    fs::create_dir_all(h.data_dir()).unwrap();
    fs::write(h.data_dir().join("blocker"), "").unwrap();

    let reply = h.say("!phase").unwrap();

    assert!(reply.starts_with("❌ Could not save changes"), "{reply}");
    assert_eq!(h.dispatcher.program().snapshot().phase, Phase::Material);
    let lines = h.audit_lines();
    assert!(
        lines.last().is_some_and(|l| l.contains("Command phase failed:")),
        "{lines:?}"
    );
    assert!(h.say("!status").is_some());
}
