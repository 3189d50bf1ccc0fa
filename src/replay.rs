//! Headless replay of an answers file
//!
//! Walks the wizard from the welcome step, feeding each step the answers that
//! belong to it, and records every rendered step with a
//! [`TranscriptRenderer`]. Time runs on a [`ManualClock`] that is advanced
//! just far enough for analysis and auto-advance timers to fire.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config_file::{FlowSettings, ReplayScript};
use crate::form::{FormData, FormUpdate};
use crate::steps::Step;
use crate::timer::{Clock, ManualClock, SystemClock};
use crate::types::FlowVariant;
use crate::view::{StepRenderer, TranscriptRenderer, UserAction};
use crate::wizard::{WizardController, WizardEvent};

/// Result of a replay.
#[derive(Debug, Clone)]
pub struct ReplayOutcome {
    pub transcript: String,
    pub final_step: Step,
    pub form: FormData,
    /// Whether the run reached the confirmation step
    pub completed: bool,
}

/// The action that answers `step`, if the script has one.
pub fn action_for(step: Step, variant: FlowVariant, answers: &FormUpdate) -> Option<UserAction> {
    let update = match step {
        Step::Welcome => FormUpdate {
            state: answers.state.clone(),
            ..FormUpdate::default()
        },
        Step::Employees => return answers.employees.map(UserAction::SelectEmployees),
        Step::BusinessAge => match variant {
            FlowVariant::DateDriven => FormUpdate {
                start_date: answers.start_date,
                ..FormUpdate::default()
            },
            FlowVariant::DirectChoice => {
                return answers.business_status.map(UserAction::SelectBusinessStatus);
            }
        },
        Step::Analysis | Step::Confirmation => return None,
        Step::Pricing => FormUpdate {
            plan_index: answers.plan_index,
            ..FormUpdate::default()
        },
        Step::PersonalInfo => FormUpdate {
            first_name: answers.first_name.clone(),
            last_name: answers.last_name.clone(),
            email: answers.email.clone(),
            phone: answers.phone.clone(),
            ..FormUpdate::default()
        },
        Step::EntityInfo => FormUpdate {
            entity_name: answers.entity_name.clone(),
            entity_type: answers.entity_type,
            ..FormUpdate::default()
        },
        Step::Checkout => FormUpdate {
            card_name: answers.card_name.clone(),
            card_number: answers.card_number.clone(),
            card_expiry: answers.card_expiry.clone(),
            card_cvc: answers.card_cvc.clone(),
            ..FormUpdate::default()
        },
    };
    (!update.is_empty()).then_some(UserAction::Update(update))
}

fn describe(action: &UserAction) -> String {
    match action {
        UserAction::Update(_) => "> fill in answers".to_string(),
        UserAction::SelectEmployees(count) => format!("> select \"{}\"", count),
        UserAction::SelectBusinessStatus(status) => format!("> select \"{}\"", status.choice_label()),
        UserAction::Next => "> continue".to_string(),
        UserAction::Back => "> back".to_string(),
    }
}

fn note_events(renderer: &mut TranscriptRenderer, events: &[WizardEvent]) {
    for event in events {
        match event {
            WizardEvent::AnalysisCompleted => renderer.note("  * analysis complete"),
            WizardEvent::AutoAdvanced { to, .. } => {
                renderer.note(format!("  * auto-advanced to {}", to))
            }
            _ => {}
        }
    }
}

/// Drive a wizard through `script` and return the transcript.
pub fn replay(script: &ReplayScript, settings: &FlowSettings) -> Result<ReplayOutcome> {
    let today = script.today.unwrap_or_else(|| SystemClock::new().today());
    let clock = ManualClock::new(today);

    let mut wizard_settings = settings.wizard_settings();
    if let Some(variant) = script.variant {
        wizard_settings.variant = variant;
    }
    let variant = wizard_settings.variant;
    let analysis_wait = wizard_settings.timing.completion_delay();
    let auto_advance_delay = wizard_settings.auto_advance_delay;

    let mut wizard = WizardController::with_clock(wizard_settings, Box::new(clock.clone()));
    let mut renderer = TranscriptRenderer::new();
    info!(%variant, %today, "replaying answers");

    for _ in 0..Step::COUNT {
        let step = wizard.step();
        if step.is_terminal() {
            break;
        }

        if let Some(action) = action_for(step, variant, &script.answers) {
            renderer.note(describe(&action));
            wizard
                .dispatch(action)
                .with_context(|| format!("Answer for step {} was rejected", step))?;
        }

        if step == Step::Analysis {
            clock.advance(analysis_wait);
            let events = wizard.poll();
            note_events(&mut renderer, &events);
        }

        renderer.render(&wizard.view())?;

        if wizard.has_pending_auto_advance() {
            clock.advance(auto_advance_delay);
            let events = wizard.poll();
            note_events(&mut renderer, &events);
            if wizard.step() != step {
                continue;
            }
        }

        renderer.note(describe(&UserAction::Next));
        if let Err(e) = wizard.go_next() {
            debug!(%step, "replay stopped: {}", e);
            renderer.note(format!("! {}", e));
            break;
        }
    }

    let final_step = wizard.step();
    if final_step.is_terminal() {
        renderer.render(&wizard.view())?;
    }

    Ok(ReplayOutcome {
        transcript: renderer.into_text(),
        final_step,
        form: wizard.form().clone(),
        completed: final_step.is_terminal(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::StartDate;
    use crate::types::{BusinessStatus, EmployeeCount};
    use chrono::NaiveDate;

    fn complete_answers() -> FormUpdate {
        FormUpdate {
            state: Some("Texas".to_string()),
            employees: Some(EmployeeCount::JustMe),
            start_date: Some(StartDate::from_date(
                NaiveDate::from_ymd_opt(2026, 6, 17).expect("date"),
            )),
            business_status: Some(BusinessStatus::Existing),
            first_name: Some("Jane".to_string()),
            last_name: Some("Smith".to_string()),
            email: Some("jane@example.com".to_string()),
            phone: Some("555-0100".to_string()),
            entity_name: Some("Smith Consulting LLC".to_string()),
            card_name: Some("Jane Smith".to_string()),
            card_number: Some("4242424242424242".to_string()),
            card_expiry: Some("12/29".to_string()),
            card_cvc: Some("123".to_string()),
            ..FormUpdate::default()
        }
    }

    fn script(variant: FlowVariant, answers: FormUpdate) -> ReplayScript {
        ReplayScript {
            variant: Some(variant),
            today: NaiveDate::from_ymd_opt(2026, 10, 17),
            answers,
        }
    }

    #[test]
    fn test_action_for_employee_step_is_a_selection() {
        let answers = complete_answers();
        assert_eq!(
            action_for(Step::Employees, FlowVariant::DateDriven, &answers),
            Some(UserAction::SelectEmployees(EmployeeCount::JustMe))
        );
        assert_eq!(action_for(Step::Analysis, FlowVariant::DateDriven, &answers), None);
        assert_eq!(
            action_for(Step::Pricing, FlowVariant::DateDriven, &FormUpdate::default()),
            None
        );
    }

    #[test]
    fn test_full_replay_reaches_confirmation() {
        let outcome = replay(
            &script(FlowVariant::DateDriven, complete_answers()),
            &FlowSettings::default(),
        )
        .expect("replay");

        assert!(outcome.completed);
        assert_eq!(outcome.final_step, Step::Confirmation);
        assert_eq!(outcome.form.business_status, Some(BusinessStatus::Existing));
        assert!(outcome.transcript.contains("* auto-advanced to business-age"));
        assert!(outcome.transcript.contains("* analysis complete"));
        assert!(outcome.transcript.contains("Total: $269"));
        assert!(outcome.transcript.contains("Order placed for Smith Consulting LLC"));
    }

    #[test]
    fn test_direct_choice_replay() {
        let outcome = replay(
            &script(FlowVariant::DirectChoice, complete_answers()),
            &FlowSettings::default(),
        )
        .expect("replay");
        assert!(outcome.completed);
        assert!(outcome.transcript.contains("My business is already up and running"));
    }

    #[test]
    fn test_replay_stops_at_missing_answer() {
        let mut answers = complete_answers();
        answers.email = None;
        let outcome = replay(&script(FlowVariant::DateDriven, answers), &FlowSettings::default())
            .expect("replay");

        assert!(!outcome.completed);
        assert_eq!(outcome.final_step, Step::PersonalInfo);
        assert!(outcome.transcript.contains("! Cannot leave personal-info: missing email"));
    }

    #[test]
    fn test_rejected_answer_is_an_error() {
        let mut answers = complete_answers();
        answers.plan_index = Some(5);
        let err = replay(&script(FlowVariant::DateDriven, answers), &FlowSettings::default())
            .expect_err("bad plan");
        assert!(err.to_string().contains("pricing"));
    }
}
