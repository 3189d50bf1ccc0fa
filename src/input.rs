//! Keyboard input handling
//!
//! Maps key presses on the current step to [`UserAction`]s. The only state
//! kept here is presentation state (list cursor, focused control); every
//! answer goes straight to the wizard as a form update.
//!
//! # Keys
//!
//! - `Up`/`Down`: move through a list, or between fields on form steps
//! - `Tab`/`BackTab`: next/previous control
//! - `Left`/`Right`: change the focused date part or entity type
//! - `Enter`: choose / continue
//! - `Esc`: back (quits on the confirmation step)
//! - `Ctrl+C`/`Ctrl+Q`: quit

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::form::{self, Field, FormUpdate, StartDate};
use crate::state_data::US_STATES;
use crate::steps::Step;
use crate::types::{BusinessStatus, EmployeeCount, EntityType, FlowVariant};
use crate::view::{StepView, UserAction};

/// What a key press amounts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Actions to dispatch, in order
    Actions(Vec<UserAction>),
    /// Presentation state changed; nothing to dispatch
    Handled,
    Quit,
    Ignored,
}

impl KeyOutcome {
    fn one(action: UserAction) -> Self {
        Self::Actions(vec![action])
    }
}

const BUSINESS_STATUS_OPTIONS: [BusinessStatus; 2] = [BusinessStatus::New, BusinessStatus::Existing];

/// Text inputs of a form step, in focus order.
pub fn text_fields(step: Step) -> &'static [Field] {
    match step {
        Step::PersonalInfo => &[Field::FirstName, Field::LastName, Field::Email, Field::Phone],
        Step::EntityInfo => &[Field::EntityName],
        Step::Checkout => &[
            Field::CardName,
            Field::CardNumber,
            Field::CardExpiry,
            Field::CardCvc,
        ],
        _ => &[],
    }
}

/// Number of focusable controls on a step.
pub fn focus_count(step: Step, variant: FlowVariant) -> usize {
    match step {
        Step::BusinessAge if variant == FlowVariant::DateDriven => 3,
        // Entity name plus the entity type selector
        Step::EntityInfo => 2,
        Step::PersonalInfo | Step::Checkout => text_fields(step).len(),
        _ => 1,
    }
}

/// Cursor and focus for the step on screen.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    step: Option<Step>,
    cursor: usize,
    focus: usize,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highlighted entry of the step's list.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Focused control on the step.
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Reset cursor and focus when the step on screen changes.
    pub fn sync(&mut self, view: &StepView<'_>) {
        if self.step == Some(view.step) {
            return;
        }
        self.step = Some(view.step);
        self.focus = 0;
        self.cursor = initial_cursor(view);
    }

    fn move_focus(&mut self, count: usize, forward: bool) {
        if count == 0 {
            return;
        }
        self.focus = if forward {
            (self.focus + 1) % count
        } else {
            (self.focus + count - 1) % count
        };
    }
}

fn initial_cursor(view: &StepView<'_>) -> usize {
    let form = view.form;
    match view.step {
        Step::Welcome => US_STATES.iter().position(|s| *s == form.state).unwrap_or(0),
        Step::Employees => form
            .employees
            .and_then(|e| EmployeeCount::options().iter().position(|o| *o == e))
            .unwrap_or(0),
        Step::BusinessAge => form
            .business_status
            .and_then(|s| BUSINESS_STATUS_OPTIONS.iter().position(|o| *o == s))
            .unwrap_or(0),
        Step::Pricing => form.plan_index,
        _ => 0,
    }
}

fn step_cursor(cursor: usize, len: usize, down: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if down {
        (cursor + 1).min(len - 1)
    } else {
        cursor.saturating_sub(1)
    }
}

/// Translate a key press on the current step.
pub fn handle_key(input: &mut InputState, key: KeyEvent, view: &StepView<'_>) -> KeyOutcome {
    input.sync(view);

    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
    {
        return KeyOutcome::Quit;
    }

    if key.code == KeyCode::Esc {
        return if view.step.is_terminal() {
            KeyOutcome::Quit
        } else {
            KeyOutcome::one(UserAction::Back)
        };
    }

    match view.step {
        Step::Welcome => welcome_key(input, key),
        Step::Employees => choice_key(input, key, EmployeeCount::options().len(), |i| {
            EmployeeCount::options()
                .get(i)
                .map(|e| UserAction::SelectEmployees(*e))
        }),
        Step::BusinessAge => match view.variant {
            FlowVariant::DateDriven => date_key(input, key, view),
            FlowVariant::DirectChoice => choice_key(input, key, BUSINESS_STATUS_OPTIONS.len(), |i| {
                BUSINESS_STATUS_OPTIONS
                    .get(i)
                    .map(|s| UserAction::SelectBusinessStatus(*s))
            }),
        },
        Step::Pricing => pricing_key(input, key, view),
        Step::PersonalInfo | Step::EntityInfo | Step::Checkout => form_key(input, key, view),
        Step::Analysis => match key.code {
            KeyCode::Enter => KeyOutcome::one(UserAction::Next),
            _ => KeyOutcome::Ignored,
        },
        Step::Confirmation => match key.code {
            KeyCode::Enter | KeyCode::Char('q') => KeyOutcome::Quit,
            _ => KeyOutcome::Ignored,
        },
    }
}

fn select_state(input: &mut InputState, index: usize) -> KeyOutcome {
    input.cursor = index;
    match US_STATES.get(index) {
        Some(name) => KeyOutcome::one(UserAction::Update(FormUpdate::state(*name))),
        None => KeyOutcome::Ignored,
    }
}

fn welcome_key(input: &mut InputState, key: KeyEvent) -> KeyOutcome {
    match key.code {
        KeyCode::Up | KeyCode::Down => {
            let next = step_cursor(input.cursor, US_STATES.len(), key.code == KeyCode::Down);
            select_state(input, next)
        }
        KeyCode::Char(c) if c.is_ascii_alphabetic() => {
            // Jump to the first state starting with the letter
            let letter = c.to_ascii_uppercase();
            match US_STATES.iter().position(|s| s.starts_with(letter)) {
                Some(index) => select_state(input, index),
                None => KeyOutcome::Ignored,
            }
        }
        KeyCode::Enter => {
            let mut actions = Vec::new();
            if let Some(name) = US_STATES.get(input.cursor) {
                actions.push(UserAction::Update(FormUpdate::state(*name)));
            }
            actions.push(UserAction::Next);
            KeyOutcome::Actions(actions)
        }
        _ => KeyOutcome::Ignored,
    }
}

fn choice_key(
    input: &mut InputState,
    key: KeyEvent,
    len: usize,
    choose: impl Fn(usize) -> Option<UserAction>,
) -> KeyOutcome {
    match key.code {
        KeyCode::Up | KeyCode::Down => {
            input.cursor = step_cursor(input.cursor, len, key.code == KeyCode::Down);
            KeyOutcome::Handled
        }
        KeyCode::Enter | KeyCode::Char(' ') => match choose(input.cursor) {
            Some(action) => KeyOutcome::one(action),
            None => KeyOutcome::Ignored,
        },
        _ => KeyOutcome::Ignored,
    }
}

fn date_key(input: &mut InputState, key: KeyEvent, view: &StepView<'_>) -> KeyOutcome {
    let count = focus_count(Step::BusinessAge, FlowVariant::DateDriven);
    match key.code {
        KeyCode::Tab | KeyCode::Right => {
            input.move_focus(count, true);
            KeyOutcome::Handled
        }
        KeyCode::BackTab | KeyCode::Left => {
            input.move_focus(count, false);
            KeyOutcome::Handled
        }
        KeyCode::Up | KeyCode::Down => {
            let date = adjust_date(view.form.start_date, input.focus, key.code == KeyCode::Down, view);
            KeyOutcome::one(UserAction::Update(FormUpdate::start_date(date)))
        }
        KeyCode::Enter => KeyOutcome::one(UserAction::Next),
        _ => KeyOutcome::Ignored,
    }
}

/// Step one date part. Years run newest first, so `down` goes back in time.
fn adjust_date(date: StartDate, part: usize, down: bool, view: &StepView<'_>) -> StartDate {
    match part {
        0 => {
            let years = form::year_options(view.today);
            let index = match date.year.and_then(|y| years.iter().position(|o| *o == y)) {
                Some(i) => step_cursor(i, years.len(), down),
                None => 0,
            };
            years.get(index).map_or(date, |y| date.with_year(*y))
        }
        1 => {
            let month = match date.month {
                Some(m) if down => (m % 12) + 1,
                Some(m) => if m == 1 { 12 } else { m - 1 },
                None => 1,
            };
            date.with_month(month)
        }
        _ => {
            let days = date.day_count();
            let day = match date.day {
                Some(d) if down => (d % days) + 1,
                Some(d) => if d <= 1 { days } else { d - 1 },
                None => 1,
            };
            date.with_day(day)
        }
    }
}

fn pricing_key(input: &mut InputState, key: KeyEvent, view: &StepView<'_>) -> KeyOutcome {
    match key.code {
        KeyCode::Up | KeyCode::Down => {
            input.cursor = step_cursor(input.cursor, view.plans.len(), key.code == KeyCode::Down);
            KeyOutcome::one(UserAction::Update(FormUpdate::plan_index(input.cursor)))
        }
        KeyCode::Enter => KeyOutcome::one(UserAction::Next),
        _ => KeyOutcome::Ignored,
    }
}

fn cycle_entity_type(current: EntityType, forward: bool) -> EntityType {
    let options = EntityType::options();
    let index = options.iter().position(|o| *o == current).unwrap_or(0);
    let next = if forward {
        (index + 1) % options.len()
    } else {
        (index + options.len() - 1) % options.len()
    };
    options[next]
}

fn form_key(input: &mut InputState, key: KeyEvent, view: &StepView<'_>) -> KeyOutcome {
    let count = focus_count(view.step, view.variant);
    let fields = text_fields(view.step);

    match key.code {
        KeyCode::Tab | KeyCode::Down => {
            input.move_focus(count, true);
            KeyOutcome::Handled
        }
        KeyCode::BackTab | KeyCode::Up => {
            input.move_focus(count, false);
            KeyOutcome::Handled
        }
        KeyCode::Enter => KeyOutcome::one(UserAction::Next),
        KeyCode::Left | KeyCode::Right if view.step == Step::EntityInfo && input.focus == 1 => {
            let entity_type = cycle_entity_type(view.form.entity_type, key.code == KeyCode::Right);
            KeyOutcome::one(UserAction::Update(FormUpdate {
                entity_type: Some(entity_type),
                ..FormUpdate::default()
            }))
        }
        KeyCode::Char(c) => match fields.get(input.focus) {
            Some(field) => {
                let mut value = view.form.text(*field).to_string();
                value.push(c);
                KeyOutcome::one(UserAction::Update(FormUpdate::text(*field, value)))
            }
            None => KeyOutcome::Ignored,
        },
        KeyCode::Backspace => match fields.get(input.focus) {
            Some(field) => {
                let mut value = view.form.text(*field).to_string();
                if value.pop().is_none() {
                    return KeyOutcome::Ignored;
                }
                KeyOutcome::one(UserAction::Update(FormUpdate::text(*field, value)))
            }
            None => KeyOutcome::Ignored,
        },
        _ => KeyOutcome::Ignored,
    }
}
