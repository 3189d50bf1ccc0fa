//! Wizard state machine
//!
//! [`WizardController`] is the single owner of a signup session: the current
//! step, the form, the analysis simulation and every pending timer. All
//! mutation goes through its methods, and forward moves are gated by the step
//! validator.
//!
//! # Design Principles
//!
//! - **Single Source of Truth**: the controller owns the session; renderers
//!   only see a [`StepView`] snapshot
//! - **Validated Transitions**: `go_next` never skips a step and never leaves
//!   an incomplete one; `go_back` is never blocked
//! - **Owned Timers**: every timer belongs to a step and is canceled when the
//!   step is left
//! - **Injectable Time**: time is read through [`Clock`], so tests advance a
//!   [`ManualClock`](crate::timer::ManualClock) instead of sleeping

use rust_decimal::Decimal;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::analysis::{AnalysisPhase, AnalysisSimulator, AnalysisTiming, TickOutcome};
use crate::business_status::classify_start_date;
use crate::catalog::{OrderSummary, PLANS, STATE_FILING_FEE};
use crate::content::AnalysisContent;
use crate::error::{FlowError, Result};
use crate::form::{Field, FormData, FormUpdate};
use crate::state_data::state_data;
use crate::steps::{Direction, Step};
use crate::timer::{Clock, FiredTimer, SystemClock, TimerId, TimerKind, TimerQueue};
use crate::types::{BusinessStatus, EmployeeCount, FlowVariant};
use crate::validation;
use crate::view::{AnalysisView, StepView, UserAction};

/// Delay between a single-choice answer and the automatic move forward
pub const AUTO_ADVANCE_DELAY: Duration = Duration::from_millis(200);

/// Tunables for one wizard session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardSettings {
    pub variant: FlowVariant,
    pub timing: AnalysisTiming,
    pub auto_advance_delay: Duration,
    pub state_filing_fee: Decimal,
}

impl Default for WizardSettings {
    fn default() -> Self {
        Self {
            variant: FlowVariant::default(),
            timing: AnalysisTiming::default(),
            auto_advance_delay: AUTO_ADVANCE_DELAY,
            state_filing_fee: STATE_FILING_FEE,
        }
    }
}

impl WizardSettings {
    pub fn with_variant(mut self, variant: FlowVariant) -> Self {
        self.variant = variant;
        self
    }
}

/// Why a forward move was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// The current step's requirements are not met
    #[error("Cannot leave {step}: missing {}", join_fields(.missing))]
    Incomplete { step: Step, missing: Vec<Field> },

    /// The current step has no outgoing transition
    #[error("Cannot move forward from {step} (the flow is finished)")]
    Terminal { step: Step },
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<NavigationError> for FlowError {
    fn from(err: NavigationError) -> Self {
        FlowError::Navigation(err.to_string())
    }
}

/// Something observable that happened during a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEvent {
    StepChanged {
        from: Step,
        to: Step,
        direction: Direction,
    },
    AnalysisStarted,
    AnalysisProgress(u8),
    ChecklistItemRevealed(usize),
    AnalysisCompleted,
    /// A pending auto-advance moved the wizard forward
    AutoAdvanced { from: Step, to: Step },
    /// A forward move (user or automatic) was refused
    NavigationBlocked(NavigationError),
}

/// Everything that belongs to one run through the funnel.
#[derive(Debug, Clone)]
struct WizardSession {
    step: Step,
    direction: Direction,
    form: FormData,
    analysis: AnalysisSimulator,
    timers: TimerQueue,
    auto_advance: Option<TimerId>,
    /// Step entries with the clock time they happened at
    history: Vec<(Step, Duration)>,
}

impl WizardSession {
    fn new(timing: AnalysisTiming, now: Duration) -> Self {
        let mut history = Vec::with_capacity(Step::COUNT);
        history.push((Step::Welcome, now));
        Self {
            step: Step::Welcome,
            direction: Direction::Forward,
            form: FormData::default(),
            analysis: AnalysisSimulator::new(timing),
            timers: TimerQueue::new(),
            auto_advance: None,
            history,
        }
    }
}

/// Owns a signup session and drives it.
///
/// # Example
///
/// ```
/// use raflow::form::FormUpdate;
/// use raflow::steps::Step;
/// use raflow::wizard::WizardController;
///
/// let mut wizard = WizardController::new(Default::default());
/// assert!(wizard.go_next().is_err());
///
/// wizard.update(FormUpdate::state("Texas")).unwrap();
/// assert_eq!(wizard.go_next(), Ok(Step::Employees));
/// assert_eq!(wizard.go_back(), Step::Welcome);
/// ```
pub struct WizardController {
    clock: Box<dyn Clock>,
    settings: WizardSettings,
    session: WizardSession,
    events: Vec<WizardEvent>,
    /// Deadline of the timer being processed; stands in for the clock while
    /// `poll` catches up
    firing_at: Option<Duration>,
}

impl WizardController {
    /// A session on the system clock.
    pub fn new(settings: WizardSettings) -> Self {
        Self::with_clock(settings, Box::new(SystemClock::new()))
    }

    /// A session on an explicit clock.
    pub fn with_clock(settings: WizardSettings, clock: Box<dyn Clock>) -> Self {
        let session = WizardSession::new(settings.timing, clock.now());
        info!(variant = %settings.variant, "wizard session started");
        Self {
            clock,
            settings,
            session,
            events: Vec::new(),
            firing_at: None,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn step(&self) -> Step {
        self.session.step
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.session.direction
    }

    pub fn form(&self) -> &FormData {
        &self.session.form
    }

    pub fn variant(&self) -> FlowVariant {
        self.settings.variant
    }

    pub fn settings(&self) -> &WizardSettings {
        &self.settings
    }

    pub fn analysis(&self) -> &AnalysisSimulator {
        &self.session.analysis
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.session.timers
    }

    /// Steps entered so far, with the clock time of each entry.
    pub fn history(&self) -> &[(Step, Duration)] {
        &self.session.history
    }

    /// Whether a single-choice answer is waiting to move the wizard forward.
    pub fn has_pending_auto_advance(&self) -> bool {
        self.session
            .auto_advance
            .is_some_and(|id| self.session.timers.is_scheduled(id))
    }

    /// Whether the current step's requirements are met.
    pub fn can_proceed(&self) -> bool {
        validation::is_step_valid(
            self.session.step,
            &self.session.form,
            self.settings.variant,
            self.session.analysis.phase(),
        )
    }

    /// Requirements of the current step that are not met.
    pub fn missing_fields(&self) -> Vec<Field> {
        validation::missing_fields(
            self.session.step,
            &self.session.form,
            self.settings.variant,
            self.session.analysis.phase(),
        )
    }

    fn now(&self) -> Duration {
        self.firing_at.unwrap_or_else(|| self.clock.now())
    }

    // ========================================================================
    // Form updates
    // ========================================================================

    /// Merge `update` into the form.
    ///
    /// In the date-driven variant the business status is re-derived from the
    /// start date afterwards.
    ///
    /// # Errors
    ///
    /// `FlowError::Validation` when the update carries a plan index outside
    /// the catalog; the form is left unchanged.
    pub fn update(&mut self, update: FormUpdate) -> Result<()> {
        if let Err(e) = self.session.form.apply(update) {
            warn!(step = %self.session.step, "form update rejected: {}", e);
            return Err(e);
        }

        if self.settings.variant == FlowVariant::DateDriven {
            let derived = classify_start_date(&self.session.form.start_date, self.clock.today());
            if derived != self.session.form.business_status {
                debug!(?derived, "business status derived from start date");
            }
            self.session.form.business_status = derived;
        }
        trace!(step = %self.session.step, "form updated");
        Ok(())
    }

    /// Record the employee count and, on the employees step, schedule the
    /// automatic move forward.
    pub fn select_employees(&mut self, count: EmployeeCount) -> Result<()> {
        self.update(FormUpdate {
            employees: Some(count),
            ..FormUpdate::default()
        })?;
        if self.session.step == Step::Employees {
            self.schedule_auto_advance();
        }
        Ok(())
    }

    /// Record the business status chosen directly by the user.
    ///
    /// # Errors
    ///
    /// `FlowError::Validation` in the date-driven variant, where the status
    /// is derived from the start date instead.
    pub fn select_business_status(&mut self, status: BusinessStatus) -> Result<()> {
        if self.settings.variant == FlowVariant::DateDriven {
            return Err(FlowError::validation(
                "business status is derived from the start date in this flow",
            ));
        }
        self.update(FormUpdate {
            business_status: Some(status),
            ..FormUpdate::default()
        })?;
        if self.session.step == Step::BusinessAge {
            self.schedule_auto_advance();
        }
        Ok(())
    }

    /// Replace any pending auto-advance with a fresh one.
    fn schedule_auto_advance(&mut self) {
        if let Some(id) = self.session.auto_advance.take() {
            self.session.timers.cancel(id);
        }
        let deadline = self.now() + self.settings.auto_advance_delay;
        let id = self
            .session
            .timers
            .schedule_once(TimerKind::AutoAdvance, self.session.step, deadline);
        self.session.auto_advance = Some(id);
        debug!(step = %self.session.step, ?deadline, "auto-advance scheduled");
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Move forward one step if the current step is complete.
    ///
    /// # Errors
    ///
    /// - `Terminal` on the confirmation step
    /// - `Incomplete` when the validator fails; nothing changes
    pub fn go_next(&mut self) -> std::result::Result<Step, NavigationError> {
        let step = self.session.step;
        if step.is_terminal() {
            return Err(NavigationError::Terminal { step });
        }

        let missing = self.missing_fields();
        if !missing.is_empty() {
            debug!(%step, missing = %join_fields(&missing), "forward navigation blocked");
            return Err(NavigationError::Incomplete { step, missing });
        }

        let next = step.next().ok_or(NavigationError::Terminal { step })?;
        self.transition_to(next, Direction::Forward);
        Ok(next)
    }

    /// Move back one step. Never validated; a no-op on the first step (apart
    /// from the direction) and on the terminal step.
    pub fn go_back(&mut self) -> Step {
        let step = self.session.step;
        if step.is_terminal() {
            debug!(%step, "back ignored on terminal step");
            return step;
        }

        match step.previous() {
            Some(previous) => self.transition_to(previous, Direction::Backward),
            None => self.session.direction = Direction::Backward,
        }
        self.session.step
    }

    fn transition_to(&mut self, to: Step, direction: Direction) {
        let from = self.session.step;
        let now = self.now();

        let canceled = self.session.timers.cancel_owned_by(from);
        if from == Step::Analysis {
            self.session.analysis.stop(&mut self.session.timers);
        }
        // A pending auto-advance is always owned by the step it was made on
        self.session.auto_advance = None;

        self.session.step = to;
        self.session.direction = direction;
        self.session.history.push((to, now));
        info!(%from, %to, ?direction, canceled_timers = canceled, "step changed");
        self.events.push(WizardEvent::StepChanged {
            from,
            to,
            direction,
        });

        if to == Step::Analysis {
            self.session.analysis.start(now, &mut self.session.timers);
            self.events.push(WizardEvent::AnalysisStarted);
        }
    }

    /// Discard the session and start over on the welcome step.
    pub fn reset(&mut self) {
        self.session = WizardSession::new(self.settings.timing, self.clock.now());
        self.events.clear();
        info!("wizard session reset");
    }

    // ========================================================================
    // Input and timers
    // ========================================================================

    /// Route renderer input.
    ///
    /// A refused forward move is not an error here: it is reported as a
    /// [`WizardEvent::NavigationBlocked`] on the next `poll`.
    pub fn dispatch(&mut self, action: UserAction) -> Result<()> {
        match action {
            UserAction::Update(update) => self.update(update),
            UserAction::SelectEmployees(count) => self.select_employees(count),
            UserAction::SelectBusinessStatus(status) => self.select_business_status(status),
            UserAction::Next => {
                if let Err(e) = self.go_next() {
                    self.events.push(WizardEvent::NavigationBlocked(e));
                }
                Ok(())
            }
            UserAction::Back => {
                self.go_back();
                Ok(())
            }
        }
    }

    /// Fire every timer due by now, each as of its own deadline, and return
    /// the events produced since the last poll.
    pub fn poll(&mut self) -> Vec<WizardEvent> {
        let now = self.clock.now();
        while let Some(fired) = self.session.timers.pop_due(now) {
            self.firing_at = Some(fired.deadline);
            self.fire(fired);
        }
        self.firing_at = None;
        std::mem::take(&mut self.events)
    }

    fn fire(&mut self, fired: FiredTimer) {
        if fired.owner != self.session.step {
            // Leaving a step cancels its timers, so this only guards the queue
            // against a timer scheduled for a step we are no longer on
            trace!(?fired, "timer for inactive step dropped");
            return;
        }

        match fired.kind {
            TimerKind::AnalysisTick => {
                match self
                    .session
                    .analysis
                    .on_tick(fired.deadline, &mut self.session.timers)
                {
                    TickOutcome::Progress(p) => self.events.push(WizardEvent::AnalysisProgress(p)),
                    TickOutcome::Completed => {
                        info!("analysis complete");
                        self.events.push(WizardEvent::AnalysisCompleted);
                    }
                    TickOutcome::Ignored => {}
                }
            }
            TimerKind::ChecklistReveal(index) => {
                if self.session.analysis.on_reveal(index) {
                    self.events.push(WizardEvent::ChecklistItemRevealed(index));
                }
            }
            TimerKind::AutoAdvance => {
                self.session.auto_advance = None;
                let from = self.session.step;
                match self.go_next() {
                    Ok(to) => self.events.push(WizardEvent::AutoAdvanced { from, to }),
                    Err(e) => {
                        warn!(%from, "auto-advance blocked: {}", e);
                        self.events.push(WizardEvent::NavigationBlocked(e));
                    }
                }
            }
        }
    }

    // ========================================================================
    // View
    // ========================================================================

    /// Snapshot of the current step for a renderer.
    pub fn view(&self) -> StepView<'_> {
        let form = &self.session.form;
        let step = self.session.step;
        let state = state_data(&form.state);
        let analysis = &self.session.analysis;

        StepView {
            step,
            direction: self.session.direction,
            variant: self.settings.variant,
            form,
            can_proceed: self.can_proceed(),
            missing: self.missing_fields(),
            analysis: AnalysisView {
                phase: analysis.phase(),
                progress: analysis.progress(),
                checklist: analysis.visible_checklist(),
                total_items: crate::analysis::CHECKLIST_ITEMS.len(),
            },
            content: AnalysisContent::for_status(form.business_status, state.clone()),
            order_summary: OrderSummary::new(
                state.name.clone(),
                *form.selected_plan(),
                self.settings.state_filing_fee,
            ),
            state_data: state,
            plans: &PLANS,
            progress_percent: step.progress_percent(),
            show_back: step.shows_back(),
            cta_label: step.cta_label(),
            today: self.clock.today(),
        }
    }

    /// Phase of the current analysis run.
    pub fn analysis_phase(&self) -> AnalysisPhase {
        self.session.analysis.phase()
    }
}
