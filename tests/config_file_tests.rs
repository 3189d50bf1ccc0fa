//! Tests for settings and answers files driving a headless replay
//!
//! These tests verify:
//! - Hand-written JSON files load with the documented field names
//! - Settings round-trip through disk and change the replay timing
//! - A replay from files reaches the confirmation step

use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

use raflow::config_file::{FlowSettings, ReplayScript};
use raflow::replay::replay;
use raflow::steps::Step;
use raflow::types::{BusinessStatus, EmployeeCount, EntityType, FlowVariant};

const ANSWERS_JSON: &str = r#"{
    "variant": "date",
    "today": "2026-10-17",
    "answers": {
        "state": "Delaware",
        "employees": "2-5 employees",
        "start_date": { "year": 2026, "month": 9, "day": 30 },
        "plan_index": 2,
        "first_name": "Ada",
        "last_name": "Byron",
        "email": "ada@example.com",
        "phone": "555-0199",
        "entity_name": "Engines Inc",
        "entity_type": "Corporation",
        "card_name": "Ada Byron",
        "card_number": "5555 4444 3333 1111",
        "card_expiry": "08/30",
        "card_cvc": "321"
    }
}"#;

fn answers_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(ANSWERS_JSON.as_bytes()).expect("write");
    file
}

// =============================================================================
// File Format Tests
// =============================================================================

#[test]
fn test_answers_file_uses_display_names() {
    let file = answers_file();
    let script = ReplayScript::load_from_file(file.path()).expect("load");

    assert_eq!(script.variant, Some(FlowVariant::DateDriven));
    assert_eq!(script.answers.employees, Some(EmployeeCount::TwoToFive));
    assert_eq!(script.answers.entity_type, Some(EntityType::Corporation));
    assert_eq!(script.answers.plan_index, Some(2));
}

#[test]
fn test_malformed_answers_file_is_rejected() {
    let mut file = NamedTempFile::new().expect("temp file");
    write!(file, r#"{{"answers": {{"employees": "a few"}}}}"#).expect("write");

    let err = ReplayScript::load_from_file(file.path()).expect_err("unknown option");
    assert!(format!("{:#}", err).contains("Failed to parse answers JSON"));
}

#[test]
fn test_settings_round_trip_through_disk() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("settings.json");

    let settings = FlowSettings {
        variant: FlowVariant::DirectChoice,
        analysis_duration_ms: 500,
        ..FlowSettings::default()
    };
    settings.save_to_file(&path).expect("save");

    let loaded = FlowSettings::load_from_file(&path).expect("load");
    assert_eq!(loaded, settings);
    assert!(loaded.validate().is_ok());
}

// =============================================================================
// Replay From Files
// =============================================================================

#[test]
fn test_replay_from_files_reaches_confirmation() {
    let file = answers_file();
    let script = ReplayScript::load_from_file(file.path()).expect("load");

    let outcome = replay(&script, &FlowSettings::default()).expect("replay");

    assert!(outcome.completed);
    assert_eq!(outcome.final_step, Step::Confirmation);
    assert_eq!(outcome.form.business_status, Some(BusinessStatus::New));
    assert!(outcome.transcript.contains("Registered Agent (3 Years): $299"));
    assert!(outcome.transcript.contains("Total: $319"));
    assert!(outcome.transcript.contains("**** 1111"));
    assert!(!outcome.transcript.contains("5555 4444"));
}

#[test]
fn test_script_variant_overrides_settings() {
    let file = answers_file();
    let script = ReplayScript::load_from_file(file.path()).expect("load");
    let settings = FlowSettings {
        variant: FlowVariant::DirectChoice,
        ..FlowSettings::default()
    };

    // The script asks for the date-driven flow, so the start date is used
    let outcome = replay(&script, &settings).expect("replay");
    assert!(outcome.completed);
    assert!(outcome.transcript.contains("Start date: 2026-09-30"));
}

#[test]
fn test_replay_with_short_analysis() {
    let file = answers_file();
    let script = ReplayScript::load_from_file(file.path()).expect("load");
    let settings = FlowSettings {
        analysis_duration_ms: 100,
        tick_interval_ms: 10,
        auto_advance_delay_ms: 1,
        ..FlowSettings::default()
    };
    assert!(settings.validate().is_ok());

    let outcome = replay(&script, &settings).expect("replay");
    assert!(outcome.completed);
    assert!(outcome.transcript.contains("Progress: 100% (complete)"));
}

#[test]
fn test_replay_completes_when_duration_is_not_a_whole_number_of_ticks() {
    let file = answers_file();
    let script = ReplayScript::load_from_file(file.path()).expect("load");
    let settings = FlowSettings {
        analysis_duration_ms: 3010,
        ..FlowSettings::default()
    };
    assert!(settings.validate().is_ok());

    let outcome = replay(&script, &settings).expect("replay");
    assert!(outcome.completed);
    assert_eq!(outcome.final_step, Step::Confirmation);
    assert!(outcome.transcript.contains("* analysis complete"));
    assert!(!outcome.transcript.contains("Cannot leave analysis"));
}
