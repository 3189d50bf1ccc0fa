//! Renderer contract
//!
//! A renderer receives a [`StepView`] describing everything the current step
//! needs (inputs, derived content, whether continue is enabled) and reports
//! what the user did as [`UserAction`] values. The terminal UI and the
//! headless [`TranscriptRenderer`] both implement [`StepRenderer`].

use chrono::NaiveDate;

use crate::analysis::AnalysisPhase;
use crate::catalog::{format_money, OrderSummary, Plan};
use crate::content::AnalysisContent;
use crate::error::Result;
use crate::form::{Field, FormData, FormUpdate};
use crate::state_data::StateData;
use crate::steps::{Direction, Step};
use crate::types::{BusinessStatus, EmployeeCount, FlowVariant};

/// Input reported by a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    /// Merge edited fields into the form
    Update(FormUpdate),
    /// Single choice on the employees step (auto-advances)
    SelectEmployees(EmployeeCount),
    /// Single choice on the direct-choice business step (auto-advances)
    SelectBusinessStatus(BusinessStatus),
    /// Primary call to action
    Next,
    /// Back affordance
    Back,
}

/// Analysis progress as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisView {
    pub phase: AnalysisPhase,
    pub progress: u8,
    /// Checklist items revealed so far
    pub checklist: &'static [&'static str],
    /// Total checklist length, revealed or not
    pub total_items: usize,
}

/// Props for rendering the current step.
#[derive(Debug, Clone)]
pub struct StepView<'a> {
    pub step: Step,
    pub direction: Direction,
    pub variant: FlowVariant,
    pub form: &'a FormData,
    pub can_proceed: bool,
    pub missing: Vec<Field>,
    pub analysis: AnalysisView,
    pub content: AnalysisContent,
    pub state_data: StateData,
    pub plans: &'static [Plan],
    pub order_summary: OrderSummary,
    pub progress_percent: u8,
    pub show_back: bool,
    pub cta_label: Option<&'static str>,
    /// Calendar date the year picker counts back from
    pub today: NaiveDate,
}

impl StepView<'_> {
    pub fn title(&self) -> &'static str {
        self.step.title()
    }

    /// "Step 3 of 9"
    pub fn step_label(&self) -> String {
        format!("Step {} of {}", self.step.index() + 1, Step::COUNT)
    }

    /// Human readable list of what still blocks the call to action.
    pub fn missing_label(&self) -> Option<String> {
        if self.missing.is_empty() {
            return None;
        }
        let names: Vec<String> = self.missing.iter().map(|f| f.to_string()).collect();
        Some(format!("Missing: {}", names.join(", ")))
    }
}

/// Something that can draw a [`StepView`].
pub trait StepRenderer {
    fn render(&mut self, view: &StepView<'_>) -> Result<()>;
}

// ============================================================================
// Transcript Renderer
// ============================================================================

/// Headless renderer that records each rendered step as plain text lines.
#[derive(Debug, Default)]
pub struct TranscriptRenderer {
    lines: Vec<String>,
    frames: usize,
}

impl TranscriptRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of views rendered so far
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Append a free-form note (used for actions between frames).
    pub fn note(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn into_text(self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

impl StepRenderer for TranscriptRenderer {
    fn render(&mut self, view: &StepView<'_>) -> Result<()> {
        self.frames += 1;
        self.lines.extend(transcript_lines(view));
        Ok(())
    }
}

fn marker(selected: bool) -> &'static str {
    if selected { "[x]" } else { "[ ]" }
}

fn or_blank(value: &str) -> &str {
    if value.trim().is_empty() { "-" } else { value }
}

/// Plain text rendering of one step.
pub fn transcript_lines(view: &StepView<'_>) -> Vec<String> {
    let form = view.form;
    let mut out = vec![format!(
        "== {} ({}) {}% | {}",
        view.step_label(),
        view.step,
        view.progress_percent,
        view.title()
    )];

    match view.step {
        Step::Welcome => {
            out.push(format!("  State: {}", or_blank(&form.state)));
            out.push(format!("  {}", view.content.usage_line()));
        }
        Step::Employees => {
            for option in EmployeeCount::options() {
                out.push(format!(
                    "  {} {}",
                    marker(form.employees == Some(option)),
                    option
                ));
            }
        }
        Step::BusinessAge => match view.variant {
            FlowVariant::DateDriven => {
                out.push(format!("  Start date: {}", or_blank(&form.start_date.to_string())));
                if let Some(status) = form.business_status {
                    out.push(format!("  Business status: {}", status));
                }
            }
            FlowVariant::DirectChoice => {
                for status in [BusinessStatus::New, BusinessStatus::Existing] {
                    out.push(format!(
                        "  {} {}",
                        marker(form.business_status == Some(status)),
                        status.choice_label()
                    ));
                }
            }
        },
        Step::Analysis => {
            let analysis = &view.analysis;
            let phase = match analysis.phase {
                AnalysisPhase::Loading => "analyzing",
                AnalysisPhase::Complete => "complete",
            };
            out.push(format!("  Progress: {}% ({})", analysis.progress, phase));
            for item in analysis.checklist {
                out.push(format!("  [x] {}", item));
            }
            if analysis.phase == AnalysisPhase::Complete {
                let content = &view.content;
                out.push(format!("  {}", content.headline()));
                out.push(format!("  {}", content.intro()));
                out.push(format!("  ! {}: {}", content.warning_title(), content.warning_text()));
                for risk in content.risks() {
                    out.push(format!("  - {}", risk));
                }
                let quote = content.testimonial();
                out.push(format!("  \"{}\" ({}, {})", quote.quote, quote.name, quote.company));
            }
        }
        Step::Pricing => {
            for (i, plan) in view.plans.iter().enumerate() {
                let mut line = format!(
                    "  {} {}  {} ({}/yr)",
                    marker(form.plan_index == i),
                    plan.duration_label(),
                    format_money(plan.total_price),
                    format_money(plan.per_year_price)
                );
                if let (Some(original), Some(savings)) = (plan.original_price, plan.savings_percent()) {
                    line.push_str(&format!("  was {}, save {}%", format_money(original), savings));
                }
                if plan.best_value {
                    line.push_str("  BEST VALUE");
                }
                out.push(line);
            }
            out.push(format!("  {}", view.content.usage_line()));
        }
        Step::PersonalInfo => {
            for field in [Field::FirstName, Field::LastName, Field::Email, Field::Phone] {
                out.push(format!("  {}: {}", field, or_blank(form.text(field))));
            }
        }
        Step::EntityInfo => {
            out.push(format!("  Entity name: {}", or_blank(&form.entity_name)));
            out.push(format!("  Entity type: {}", form.entity_type));
        }
        Step::Checkout => {
            out.push(format!("  {}: {}", Field::CardName, or_blank(&form.card_name)));
            out.push(format!("  {}: {}", Field::CardNumber, mask_card(&form.card_number)));
            out.push(format!("  {}: {}", Field::CardExpiry, or_blank(&form.card_expiry)));
            out.push(format!(
                "  {}: {}",
                Field::CardCvc,
                if form.card_cvc.trim().is_empty() { "-" } else { "***" }
            ));
            out.extend(summary_lines(&view.order_summary));
        }
        Step::Confirmation => {
            out.push(format!(
                "  Order placed for {} ({}) in {}",
                or_blank(&form.entity_name),
                form.entity_type,
                view.state_data.name
            ));
            out.push(format!("  Confirmation sent to {}", or_blank(&form.email)));
            out.extend(summary_lines(&view.order_summary));
        }
    }

    let mut footer = Vec::new();
    if view.show_back {
        footer.push("< Back".to_string());
    }
    if let Some(label) = view.cta_label {
        if view.can_proceed {
            footer.push(format!("[{}]", label));
        } else {
            footer.push(format!("({}, disabled)", label));
        }
    }
    if !footer.is_empty() {
        out.push(format!("  {}", footer.join("  ")));
    }
    if let Some(missing) = view.missing_label() {
        out.push(format!("  {}", missing));
    }
    out
}

/// Order summary lines shared by checkout and confirmation.
pub fn summary_lines(summary: &OrderSummary) -> Vec<String> {
    vec![
        format!(
            "  Registered Agent ({}): {}",
            summary.plan.duration_label(),
            format_money(summary.plan.total_price)
        ),
        format!(
            "  {} state filing fee: {}",
            summary.state_name,
            format_money(summary.state_filing_fee)
        ),
        format!("  Total: {}", format_money(summary.grand_total())),
    ]
}

/// Show only the last four digits of a card number.
pub fn mask_card(number: &str) -> String {
    let digits: Vec<char> = number.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.is_empty() {
        return "-".to_string();
    }
    let tail: String = digits[digits.len().saturating_sub(4)..].iter().collect();
    format!("**** {}", tail)
}
