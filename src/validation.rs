//! Step validation
//!
//! Pure predicates deciding whether the current step's required inputs are
//! present. Checks are presence-only: no email, phone or card format rules.

use crate::analysis::AnalysisPhase;
use crate::form::{Field, FormData};
use crate::steps::Step;
use crate::types::FlowVariant;

/// Whether the user may leave `step` going forward.
pub fn is_step_valid(
    step: Step,
    form: &FormData,
    variant: FlowVariant,
    analysis: AnalysisPhase,
) -> bool {
    // The terminal step has no validator and never proceeds
    !step.is_terminal() && missing_fields(step, form, variant, analysis).is_empty()
}

/// The requirements of `step` that are not yet met, in display order.
pub fn missing_fields(
    step: Step,
    form: &FormData,
    variant: FlowVariant,
    analysis: AnalysisPhase,
) -> Vec<Field> {
    let mut missing = Vec::new();
    match step {
        Step::Welcome => require_text(&mut missing, Field::State, &form.state),
        Step::Employees => {
            if form.employees.is_none() {
                missing.push(Field::Employees);
            }
        }
        Step::BusinessAge => match variant {
            // A date that cannot be classified blocks the step
            FlowVariant::DateDriven => {
                if form.start_date.to_date().is_none() {
                    missing.push(Field::StartDate);
                }
            }
            FlowVariant::DirectChoice => {
                if form.business_status.is_none() {
                    missing.push(Field::BusinessStatus);
                }
            }
        },
        Step::Analysis => {
            if analysis != AnalysisPhase::Complete {
                missing.push(Field::Analysis);
            }
        }
        Step::Pricing => {}
        Step::PersonalInfo => {
            require_text(&mut missing, Field::FirstName, &form.first_name);
            require_text(&mut missing, Field::LastName, &form.last_name);
            require_text(&mut missing, Field::Email, &form.email);
            require_text(&mut missing, Field::Phone, &form.phone);
        }
        // The entity type is an enum with a default, so it is always set
        Step::EntityInfo => require_text(&mut missing, Field::EntityName, &form.entity_name),
        Step::Checkout => {
            require_text(&mut missing, Field::CardName, &form.card_name);
            require_text(&mut missing, Field::CardNumber, &form.card_number);
            require_text(&mut missing, Field::CardExpiry, &form.card_expiry);
            require_text(&mut missing, Field::CardCvc, &form.card_cvc);
        }
        Step::Confirmation => {}
    }
    missing
}

fn require_text(missing: &mut Vec<Field>, field: Field, value: &str) {
    if value.trim().is_empty() {
        missing.push(field);
    }
}
