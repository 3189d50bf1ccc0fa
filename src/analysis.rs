//! Simulated analysis interstitial
//!
//! Entering the analysis step runs a fixed-length "analyzing" animation: a
//! progress value eased from 0 to 100 on a repeating tick, plus a short
//! checklist revealed one item at a time on its own schedule. When the full
//! duration has elapsed the tick is canceled and the phase flips to complete.
//!
//! # Invariants
//!
//! - Progress never decreases while loading and is pinned at 100 once complete
//! - The phase goes Loading -> Complete at most once per `start`
//! - `start` cancels every timer from a previous run before scheduling new ones

use serde::Serialize;
use std::time::Duration;

use crate::steps::Step;
use crate::timer::{TimerId, TimerKind, TimerQueue};

/// Total length of the simulated analysis
pub const ANALYSIS_DURATION: Duration = Duration::from_millis(3000);

/// Interval between progress samples
pub const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Checklist revealed while the analysis runs
pub const CHECKLIST_ITEMS: [&str; 3] = [
    "Checking state filing requirements",
    "Reviewing compliance deadlines",
    "Building your personalized plan",
];

/// Loading/complete flag gating the analysis step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AnalysisPhase {
    #[default]
    Loading,
    Complete,
}

/// Duration and sampling rate of one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisTiming {
    pub duration: Duration,
    pub tick_interval: Duration,
}

impl Default for AnalysisTiming {
    fn default() -> Self {
        Self {
            duration: ANALYSIS_DURATION,
            tick_interval: TICK_INTERVAL,
        }
    }
}

impl AnalysisTiming {
    /// Time from `start` to the tick that completes the run: the duration
    /// rounded up to a whole number of ticks.
    pub fn completion_delay(&self) -> Duration {
        let tick = self.tick_interval.as_nanos();
        if tick == 0 {
            return self.duration;
        }
        let ticks = self.duration.as_nanos().div_ceil(tick).max(1);
        self.tick_interval
            .checked_mul(u32::try_from(ticks).unwrap_or(u32::MAX))
            .unwrap_or(Duration::MAX)
    }
}

/// Result of processing one progress tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still loading; progress is the new value
    Progress(u8),
    /// This tick finished the run
    Completed,
    /// Tick arrived after completion or before a start; nothing changed
    Ignored,
}

/// Cubic ease-out: `round(100 * (1 - (1 - r)^3))` with `r = elapsed / duration`
/// clamped to `[0, 1]`.
pub fn ease_out_progress(elapsed: Duration, duration: Duration) -> u8 {
    if duration.is_zero() {
        return 100;
    }
    let r = (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0);
    let eased = 1.0 - (1.0 - r).powi(3);
    (100.0 * eased).round() as u8
}

/// When checklist item `index` of `count` appears, relative to the start.
pub fn reveal_offset(index: usize, count: usize, duration: Duration) -> Duration {
    let slot = duration / (count as u32 + 1);
    slot * (index as u32 + 1)
}

/// State of the analysis animation for the current visit to the step.
#[derive(Debug, Clone, Default)]
pub struct AnalysisSimulator {
    timing: AnalysisTiming,
    phase: AnalysisPhase,
    progress: u8,
    revealed: usize,
    started_at: Option<Duration>,
    tick_timer: Option<TimerId>,
    reveal_timers: Vec<TimerId>,
    runs: usize,
    completions: usize,
}

impl AnalysisSimulator {
    pub fn new(timing: AnalysisTiming) -> Self {
        Self {
            timing,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> AnalysisPhase {
        self.phase
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn is_complete(&self) -> bool {
        self.phase == AnalysisPhase::Complete
    }

    /// Number of checklist items currently visible.
    pub fn revealed_items(&self) -> usize {
        self.revealed
    }

    /// The visible checklist labels.
    pub fn visible_checklist(&self) -> &'static [&'static str] {
        &CHECKLIST_ITEMS[..self.revealed.min(CHECKLIST_ITEMS.len())]
    }

    pub fn timing(&self) -> AnalysisTiming {
        self.timing
    }

    /// How many times `start` has run.
    pub fn runs(&self) -> usize {
        self.runs
    }

    /// How many runs reached completion.
    pub fn completions(&self) -> usize {
        self.completions
    }

    /// Whether any timer of the current run is still pending.
    pub fn has_pending_timers(&self, timers: &TimerQueue) -> bool {
        self.tick_timer.is_some_and(|id| timers.is_scheduled(id))
            || self.reveal_timers.iter().any(|id| timers.is_scheduled(*id))
    }

    /// Reset to loading at 0% and schedule the tick and reveal timers.
    pub fn start(&mut self, now: Duration, timers: &mut TimerQueue) {
        self.stop(timers);

        self.phase = AnalysisPhase::Loading;
        self.progress = 0;
        self.revealed = 0;
        self.started_at = Some(now);
        self.runs += 1;

        let interval = self.timing.tick_interval;
        self.tick_timer = Some(timers.schedule_repeating(
            TimerKind::AnalysisTick,
            Step::Analysis,
            now + interval,
            interval,
        ));

        let count = CHECKLIST_ITEMS.len();
        self.reveal_timers = (0..count)
            .map(|i| {
                timers.schedule_once(
                    TimerKind::ChecklistReveal(i),
                    Step::Analysis,
                    now + reveal_offset(i, count, self.timing.duration),
                )
            })
            .collect();

        tracing::debug!(
            run = self.runs,
            duration_ms = self.timing.duration.as_millis() as u64,
            "analysis started"
        );
    }

    /// Cancel every pending timer of this run. Phase and progress are kept.
    pub fn stop(&mut self, timers: &mut TimerQueue) {
        if let Some(id) = self.tick_timer.take() {
            timers.cancel(id);
        }
        for id in self.reveal_timers.drain(..) {
            timers.cancel(id);
        }
    }

    /// Process a tick scheduled for `at`.
    pub fn on_tick(&mut self, at: Duration, timers: &mut TimerQueue) -> TickOutcome {
        let Some(started_at) = self.started_at else {
            return TickOutcome::Ignored;
        };
        if self.is_complete() {
            return TickOutcome::Ignored;
        }

        let elapsed = at.saturating_sub(started_at);
        if elapsed >= self.timing.duration {
            if let Some(id) = self.tick_timer.take() {
                timers.cancel(id);
            }
            self.progress = 100;
            self.phase = AnalysisPhase::Complete;
            self.completions += 1;
            tracing::debug!(run = self.runs, "analysis complete");
            return TickOutcome::Completed;
        }

        let sampled = ease_out_progress(elapsed, self.timing.duration);
        self.progress = self.progress.max(sampled);
        TickOutcome::Progress(self.progress)
    }

    /// Reveal checklist item `index`; returns false if it was already shown.
    pub fn on_reveal(&mut self, index: usize) -> bool {
        let target = (index + 1).min(CHECKLIST_ITEMS.len());
        if target <= self.revealed {
            return false;
        }
        self.revealed = target;
        true
    }
}
