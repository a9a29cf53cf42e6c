//! End-to-end command handling through the dispatcher.

use pretty_assertions::assert_eq;

use cohort_engine::IncomingMessage;

use crate::common::{GUILD, Harness};

#[test]
fn full_training_cycle() {
    let mut h = Harness::new();

    h.say("!phase");
    assert_eq!(
        h.say("!grade Ana_Perez | 15").as_deref(),
        Some("✅ **Grade recorded**\nAna_Perez: 15")
    );
    h.say("!grade Luis_Gomez | 7");
    assert_eq!(
        h.say("!phase").as_deref(),
        Some("🔄 Phase advanced to **CLOSED**")
    );
    assert_eq!(
        h.say("!summary").as_deref(),
        Some("📋 Registered evaluations: **2**")
    );

    h.say("!level");
    h.say("!level");
    assert_eq!(
        h.say("!level").as_deref(),
        Some("⏭️ Level updated\nLevel: 1\nPromotion: 2")
    );
    assert_eq!(
        h.say("!summary").as_deref(),
        Some("📋 Registered evaluations: **0**")
    );
}

#[test]
fn status_renders_as_plain_text() {
    let mut h = Harness::new();
    h.say("!level");
    h.say("!phase");

    assert_eq!(
        h.say("!status").as_deref(),
        Some(
            "📊 Training System Status\n\
             Current Level: 2\n\
             Phase: EVALUATION\n\
             Promotion: 1\n\
             _Use !help to list commands_"
        )
    );
}

#[test]
fn grading_outside_evaluation_leaves_ledger_unchanged() {
    let mut h = Harness::new();

    let reply = h.say("!grade Ana_Perez | 10").unwrap();

    assert!(reply.starts_with("❌ The system is not in evaluation phase"));
    assert!(h.dispatcher.program().ledger().is_empty());
    assert!(!h.grades_file().exists());
}

#[test]
fn level_cap_applies_to_current_level() {
    let mut h = Harness::new();
    h.say("!level");
    h.say("!level");
    h.say("!phase");

    assert_eq!(
        h.say("!grade Ana_Perez | 20").as_deref(),
        Some("✅ **Grade recorded**\nAna_Perez: 20")
    );
    assert_eq!(
        h.say("!grade Ana_Perez | 21").as_deref(),
        Some("❌ Score exceeds maximum allowed (20 at level 3)")
    );
}

#[test]
fn configured_caps_and_prefix() {
    let mut h = Harness::with_config(
        r#"
        [bot]
        prefix = "$"

        [grading]
        max_score = [5, 6, 7]
        "#,
    );

    assert_eq!(h.say("!phase"), None);
    h.say("$phase");
    assert_eq!(
        h.say("$grade Ana_Perez | 6").as_deref(),
        Some("❌ Score exceeds maximum allowed (5 at level 1)")
    );
}

#[test]
fn guild_filter_from_config() {
    let mut h = Harness::with_config(&format!("[bot]\nguild_id = \"{GUILD}\""));

    assert!(h.say("!help").is_some());
    assert_eq!(
        h.say_as(IncomingMessage::new("u", "!help").in_guild("elsewhere")),
        None
    );
}

#[test]
fn restricted_mutations_refuse_non_instructors() {
    let mut h = Harness::with_config("[access]\nrestrict_mutations = true");

    let student = |content: &str| IncomingMessage::new("student", content).in_guild(GUILD);
    assert_eq!(
        h.say_as(student("!level")).as_deref(),
        Some("⛔ Only instructors can use !level")
    );
    assert!(h.say_as(student("!status")).is_some());
    assert_eq!(h.dispatcher.program().snapshot().level.get(), 1);

    h.say("!level");
    assert_eq!(h.dispatcher.program().snapshot().level.get(), 2);
}

#[test]
fn help_lists_commands() {
    let mut h = Harness::new();
    let help = h.say("!HELP").unwrap();
    for name in ["!status", "!phase", "!level", "!grade", "!summary", "!reset-demo"] {
        assert!(help.contains(name), "help is missing {name}: {help}");
    }
}
