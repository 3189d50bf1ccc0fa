//! End-to-end wizard flow tests
//!
//! These tests drive a `WizardController` on a manual clock through whole
//! signups and check:
//! - Auto-advance timing on single-choice steps
//! - Business status derivation and the content fork it drives
//! - Analysis progress and completion timing
//! - Blocked navigation on incomplete steps
//! - The terminal confirmation step

use chrono::NaiveDate;
use raflow::analysis::AnalysisPhase;
use raflow::form::{Field, FormUpdate, StartDate};
use raflow::steps::{Direction, Step};
use raflow::timer::ManualClock;
use raflow::types::{BusinessStatus, EmployeeCount, EntityType, FlowVariant};
use raflow::view::UserAction;
use raflow::wizard::{NavigationError, WizardController, WizardEvent, WizardSettings};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).expect("valid date")
}

fn wizard(variant: FlowVariant) -> (WizardController, ManualClock) {
    let clock = ManualClock::new(today());
    let w = WizardController::with_clock(
        WizardSettings::default().with_variant(variant),
        Box::new(clock.clone()),
    );
    (w, clock)
}

fn text(field: Field, value: &str) -> FormUpdate {
    FormUpdate::text(field, value)
}

// =============================================================================
// Full Date-Driven Signup
// =============================================================================

#[test]
fn test_full_signup_existing_business() {
    let (mut w, clock) = wizard(FlowVariant::DateDriven);

    // Welcome
    assert_eq!(w.step(), Step::Welcome);
    assert!(w.go_next().is_err());
    w.update(FormUpdate::state("Texas")).expect("state");
    assert_eq!(w.go_next(), Ok(Step::Employees));

    // Employees: auto-advance after 200ms
    w.select_employees(EmployeeCount::JustMe).expect("employees");
    clock.advance_ms(199);
    w.poll();
    assert_eq!(w.step(), Step::Employees);
    clock.advance_ms(1);
    let events = w.poll();
    assert_eq!(w.step(), Step::BusinessAge);
    assert!(events.contains(&WizardEvent::AutoAdvanced {
        from: Step::Employees,
        to: Step::BusinessAge,
    }));

    // Business age: four months back is an existing business
    let started = NaiveDate::from_ymd_opt(2026, 6, 17).expect("date");
    w.update(FormUpdate::start_date(StartDate::from_date(started)))
        .expect("start date");
    assert_eq!(w.form().business_status, Some(BusinessStatus::Existing));
    assert_eq!(w.go_next(), Ok(Step::Analysis));

    // Analysis: blocked until the run completes
    assert_eq!(w.analysis_phase(), AnalysisPhase::Loading);
    assert!(matches!(
        w.go_next(),
        Err(NavigationError::Incomplete { step: Step::Analysis, .. })
    ));
    clock.advance_ms(2999);
    w.poll();
    assert_eq!(w.analysis_phase(), AnalysisPhase::Loading);
    clock.advance_ms(1);
    let events = w.poll();
    assert!(events.contains(&WizardEvent::AnalysisCompleted));
    assert_eq!(w.analysis().progress(), 100);
    assert_eq!(w.analysis().revealed_items(), 3);

    let view = w.view();
    assert_eq!(view.content.status(), BusinessStatus::Existing);
    assert!(view.content.warning_title().contains("Texas"));
    assert_eq!(w.go_next(), Ok(Step::Pricing));

    // Pricing: the best-value plan is preselected
    assert_eq!(w.form().plan_index, 1);
    assert!(w.view().plans[w.form().plan_index].best_value);
    assert_eq!(w.go_next(), Ok(Step::PersonalInfo));

    // Personal info: every field is required
    w.update(text(Field::FirstName, "Jane")).expect("first");
    w.update(text(Field::LastName, "Doe")).expect("last");
    assert_eq!(w.missing_fields(), vec![Field::Email, Field::Phone]);
    assert!(w.go_next().is_err());
    w.update(text(Field::Email, "jane@example.com")).expect("email");
    w.update(text(Field::Phone, "555-0100")).expect("phone");
    assert_eq!(w.go_next(), Ok(Step::EntityInfo));

    // Entity info
    assert_eq!(w.form().entity_type, EntityType::Llc);
    w.update(text(Field::EntityName, "Acme")).expect("entity");
    assert_eq!(w.go_next(), Ok(Step::Checkout));

    // Checkout
    w.update(text(Field::CardName, "Jane Doe")).expect("card name");
    w.update(text(Field::CardNumber, "4242 4242 4242 4242"))
        .expect("card number");
    w.update(text(Field::CardExpiry, "12/29")).expect("expiry");
    assert_eq!(w.missing_fields(), vec![Field::CardCvc]);
    w.update(text(Field::CardCvc, "123")).expect("cvc");
    assert_eq!(w.view().order_summary.grand_total().to_string(), "269");
    assert_eq!(w.go_next(), Ok(Step::Confirmation));

    // Confirmation is terminal
    assert_eq!(
        w.go_next(),
        Err(NavigationError::Terminal {
            step: Step::Confirmation
        })
    );
    assert_eq!(w.go_back(), Step::Confirmation);
    assert_eq!(w.view().progress_percent, 100);
    assert!(!w.view().show_back);
}

#[test]
fn test_recent_start_date_gives_new_business_content() {
    let (mut w, _) = wizard(FlowVariant::DateDriven);
    w.update(FormUpdate::state("Ohio")).expect("state");
    w.go_next().expect("welcome");
    w.select_employees(EmployeeCount::SixToTwenty).expect("employees");
    w.go_next().expect("employees");

    let started = NaiveDate::from_ymd_opt(2026, 9, 1).expect("date");
    w.update(FormUpdate::start_date(StartDate::from_date(started)))
        .expect("start date");
    assert_eq!(w.form().business_status, Some(BusinessStatus::New));
    assert_eq!(w.view().content.status(), BusinessStatus::New);
}

#[test]
fn test_partial_start_date_blocks_and_clears_status() {
    let (mut w, _) = wizard(FlowVariant::DateDriven);
    w.update(FormUpdate::state("Ohio")).expect("state");
    w.go_next().expect("welcome");
    w.select_employees(EmployeeCount::JustMe).expect("employees");
    w.go_next().expect("employees");

    let partial = StartDate {
        year: Some(2025),
        month: Some(2),
        day: None,
    };
    w.update(FormUpdate::start_date(partial)).expect("partial");
    assert_eq!(w.form().business_status, None);
    assert_eq!(w.missing_fields(), vec![Field::StartDate]);
    assert!(w.go_next().is_err());
}

#[test]
fn test_unclassifiable_start_date_blocks_business_age() {
    let (mut w, _) = wizard(FlowVariant::DateDriven);
    w.update(FormUpdate::state("Ohio")).expect("state");
    w.go_next().expect("welcome");
    w.select_employees(EmployeeCount::JustMe).expect("employees");
    w.go_next().expect("employees");

    let far_future = StartDate {
        year: Some(500_000),
        month: Some(1),
        day: Some(1),
    };
    w.update(FormUpdate::start_date(far_future)).expect("date");
    assert_eq!(w.form().business_status, None);
    assert!(!w.can_proceed());
    assert!(matches!(
        w.go_next(),
        Err(NavigationError::Incomplete { step: Step::BusinessAge, .. })
    ));
    assert_eq!(w.step(), Step::BusinessAge);
}

// =============================================================================
// Direct-Choice Variant
// =============================================================================

#[test]
fn test_direct_choice_auto_advances_into_analysis() {
    let (mut w, clock) = wizard(FlowVariant::DirectChoice);
    w.update(FormUpdate::state("Nevada")).expect("state");
    w.go_next().expect("welcome");
    w.select_employees(EmployeeCount::OverTwenty).expect("employees");
    clock.advance_ms(200);
    w.poll();
    assert_eq!(w.step(), Step::BusinessAge);

    w.select_business_status(BusinessStatus::New).expect("status");
    clock.advance_ms(200);
    let events = w.poll();
    assert_eq!(w.step(), Step::Analysis);
    assert!(events.contains(&WizardEvent::AnalysisStarted));
}

#[test]
fn test_start_date_does_not_drive_status_in_direct_choice() {
    let (mut w, _) = wizard(FlowVariant::DirectChoice);
    let started = NaiveDate::from_ymd_opt(2020, 1, 1).expect("date");
    w.update(FormUpdate::start_date(StartDate::from_date(started)))
        .expect("start date");
    assert_eq!(w.form().business_status, None);
}

// =============================================================================
// Navigation and Timers
// =============================================================================

#[test]
fn test_leaving_employees_cancels_auto_advance() {
    let (mut w, clock) = wizard(FlowVariant::DateDriven);
    w.update(FormUpdate::state("Texas")).expect("state");
    w.go_next().expect("welcome");
    w.select_employees(EmployeeCount::JustMe).expect("employees");
    assert!(w.has_pending_auto_advance());

    w.go_back();
    assert!(!w.has_pending_auto_advance());
    clock.advance_ms(500);
    w.poll();
    assert_eq!(w.step(), Step::Welcome);
}

#[test]
fn test_reselecting_replaces_pending_auto_advance() {
    let (mut w, clock) = wizard(FlowVariant::DateDriven);
    w.update(FormUpdate::state("Texas")).expect("state");
    w.go_next().expect("welcome");

    w.select_employees(EmployeeCount::JustMe).expect("first choice");
    clock.advance_ms(150);
    w.poll();
    w.select_employees(EmployeeCount::TwoToFive).expect("second choice");

    clock.advance_ms(100);
    w.poll();
    assert_eq!(w.step(), Step::Employees);
    clock.advance_ms(100);
    let events = w.poll();
    assert_eq!(w.step(), Step::BusinessAge);
    let advances = events
        .iter()
        .filter(|e| matches!(e, WizardEvent::AutoAdvanced { .. }))
        .count();
    assert_eq!(advances, 1);
    assert_eq!(w.form().employees, Some(EmployeeCount::TwoToFive));
}

#[test]
fn test_reentering_analysis_restarts_the_run() {
    let (mut w, clock) = wizard(FlowVariant::DirectChoice);
    w.update(FormUpdate::state("Texas")).expect("state");
    w.go_next().expect("welcome");
    w.select_employees(EmployeeCount::JustMe).expect("employees");
    w.go_next().expect("employees");
    w.select_business_status(BusinessStatus::Existing)
        .expect("status");
    w.go_next().expect("business age");

    clock.advance_ms(3000);
    w.poll();
    assert_eq!(w.analysis_phase(), AnalysisPhase::Complete);

    w.go_back();
    w.go_next().expect("back into analysis");
    assert_eq!(w.analysis_phase(), AnalysisPhase::Loading);
    assert_eq!(w.analysis().progress(), 0);
    assert_eq!(w.analysis().runs(), 2);
}

#[test]
fn test_back_keeps_answers_and_sets_direction() {
    let (mut w, _) = wizard(FlowVariant::DateDriven);
    w.update(FormUpdate::state("Wyoming")).expect("state");
    w.go_next().expect("welcome");
    w.go_back();

    assert_eq!(w.step(), Step::Welcome);
    assert_eq!(w.direction(), Direction::Backward);
    assert_eq!(w.form().state, "Wyoming");
}

#[test]
fn test_dispatch_reports_blocked_next_as_event() {
    let (mut w, _) = wizard(FlowVariant::DateDriven);
    w.dispatch(UserAction::Next).expect("dispatch never fails on Next");
    let events = w.poll();
    assert_eq!(
        events,
        vec![WizardEvent::NavigationBlocked(NavigationError::Incomplete {
            step: Step::Welcome,
            missing: vec![Field::State],
        })]
    );
    assert_eq!(w.step(), Step::Welcome);
}

#[test]
fn test_out_of_range_plan_is_rejected_whole() {
    let (mut w, _) = wizard(FlowVariant::DateDriven);
    let update = FormUpdate {
        state: Some("Texas".to_string()),
        plan_index: Some(7),
        ..FormUpdate::default()
    };
    assert!(w.update(update).is_err());
    assert_eq!(w.form().state, "");
    assert_eq!(w.form().plan_index, 1);
}

#[test]
fn test_reset_starts_over() {
    let (mut w, _) = wizard(FlowVariant::DateDriven);
    w.update(FormUpdate::state("Texas")).expect("state");
    w.go_next().expect("welcome");
    w.reset();

    assert_eq!(w.step(), Step::Welcome);
    assert_eq!(w.form().state, "");
    assert!(w.poll().is_empty());
}
