//! Clocks and cancelable timers
//!
//! The wizard never sleeps. Timed behaviour (analysis ticks, checklist reveals,
//! auto-advance after a choice) is a set of entries in a [`TimerQueue`], each
//! addressed by a [`TimerId`] handle and owned by the step that scheduled it.
//! The owner drains due timers with [`TimerQueue::pop_due`] against a
//! [`Clock`], so tests can drive time with [`ManualClock`] instead of waiting.

use chrono::NaiveDate;
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::steps::Step;

// ============================================================================
// Clocks
// ============================================================================

/// Source of time for the wizard.
pub trait Clock {
    /// Monotonic time elapsed since the clock's origin.
    fn now(&self) -> Duration;

    /// Calendar date used to classify business age.
    fn today(&self) -> NaiveDate;
}

/// Wall clock: monotonic time from `Instant`, calendar date from the local zone.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Hand-driven clock. Clones share the same time, so a test can keep one
/// handle and give another to the wizard.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
    today: Rc<Cell<NaiveDate>>,
}

impl ManualClock {
    /// A clock at time zero on the given calendar date.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            now: Rc::new(Cell::new(Duration::ZERO)),
            today: Rc::new(Cell::new(today)),
        }
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Shorthand for `advance(Duration::from_millis(ms))`.
    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    pub fn set_today(&self, today: NaiveDate) {
        self.today.set(today);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn today(&self) -> NaiveDate {
        self.today.get()
    }
}

// ============================================================================
// Timer Queue
// ============================================================================

/// Handle returned when a timer is scheduled; used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Repeating analysis progress sample
    AnalysisTick,
    /// Reveal of checklist item `n`
    ChecklistReveal(usize),
    /// Deferred forward navigation after a single-choice answer
    AutoAdvance,
}

/// A timer that has come due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredTimer {
    pub id: TimerId,
    pub kind: TimerKind,
    pub owner: Step,
    /// Scheduled time of this firing (not the time it was drained)
    pub deadline: Duration,
}

#[derive(Debug, Clone)]
struct Timer {
    id: TimerId,
    kind: TimerKind,
    owner: Step,
    deadline: Duration,
    interval: Option<Duration>,
}

/// Pending timers, drained in deadline order.
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    timers: Vec<Timer>,
    next_id: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a timer that fires once at `deadline`.
    pub fn schedule_once(&mut self, kind: TimerKind, owner: Step, deadline: Duration) -> TimerId {
        self.push(kind, owner, deadline, None)
    }

    /// Schedule a timer that fires at `first` and every `interval` after,
    /// until canceled. A zero interval is treated as one millisecond.
    pub fn schedule_repeating(
        &mut self,
        kind: TimerKind,
        owner: Step,
        first: Duration,
        interval: Duration,
    ) -> TimerId {
        let interval = interval.max(Duration::from_millis(1));
        self.push(kind, owner, first, Some(interval))
    }

    fn push(
        &mut self,
        kind: TimerKind,
        owner: Step,
        deadline: Duration,
        interval: Option<Duration>,
    ) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        tracing::trace!(?id, ?kind, %owner, ?deadline, "timer scheduled");
        self.timers.push(Timer {
            id,
            kind,
            owner,
            deadline,
            interval,
        });
        id
    }

    /// Cancel one timer. Returns false if it already fired or was canceled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        before != self.timers.len()
    }

    /// Cancel every timer owned by `owner`; returns how many were pending.
    pub fn cancel_owned_by(&mut self, owner: Step) -> usize {
        let before = self.timers.len();
        self.timers.retain(|t| t.owner != owner);
        before - self.timers.len()
    }

    /// Cancel every pending timer of `kind`; returns how many were pending.
    pub fn cancel_kind(&mut self, kind: TimerKind) -> usize {
        let before = self.timers.len();
        self.timers.retain(|t| t.kind != kind);
        before - self.timers.len()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Number of pending timers of `kind`.
    pub fn count_kind(&self, kind: TimerKind) -> usize {
        self.timers.iter().filter(|t| t.kind == kind).count()
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.iter().map(|t| t.deadline).min()
    }

    /// Take the earliest timer due at or before `now`.
    ///
    /// Ties fire in scheduling order. A repeating timer is rescheduled one
    /// interval after the deadline it fired for, so a late drain still sees
    /// every intermediate firing.
    pub fn pop_due(&mut self, now: Duration) -> Option<FiredTimer> {
        let pos = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline <= now)
            .min_by_key(|(_, t)| (t.deadline, t.id))
            .map(|(i, _)| i)?;

        let timer = &mut self.timers[pos];
        let fired = FiredTimer {
            id: timer.id,
            kind: timer.kind,
            owner: timer.owner,
            deadline: timer.deadline,
        };

        match timer.interval {
            Some(interval) => timer.deadline += interval,
            None => {
                self.timers.swap_remove(pos);
            }
        }

        Some(fired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 17).expect("date");
        let clock = ManualClock::new(today);
        let handle = clock.clone();
        handle.advance_ms(250);
        assert_eq!(clock.now(), ms(250));
        assert_eq!(clock.today(), today);
    }

    #[test]
    fn test_once_timer_fires_once() {
        let mut q = TimerQueue::new();
        q.schedule_once(TimerKind::AutoAdvance, Step::Employees, ms(200));

        assert!(q.pop_due(ms(199)).is_none());
        let fired = q.pop_due(ms(200)).expect("due");
        assert_eq!(fired.kind, TimerKind::AutoAdvance);
        assert_eq!(fired.deadline, ms(200));
        assert!(q.pop_due(ms(10_000)).is_none());
        assert!(q.is_empty());
    }

    #[test]
    fn test_repeating_timer_catches_up() {
        let mut q = TimerQueue::new();
        q.schedule_repeating(TimerKind::AnalysisTick, Step::Analysis, ms(50), ms(50));

        let mut deadlines = Vec::new();
        while let Some(fired) = q.pop_due(ms(175)) {
            deadlines.push(fired.deadline);
        }
        assert_eq!(deadlines, vec![ms(50), ms(100), ms(150)]);
        assert_eq!(q.next_deadline(), Some(ms(200)));
    }

    #[test]
    fn test_due_timers_fire_in_deadline_order() {
        let mut q = TimerQueue::new();
        q.schedule_once(TimerKind::ChecklistReveal(1), Step::Analysis, ms(1500));
        q.schedule_once(TimerKind::ChecklistReveal(0), Step::Analysis, ms(750));
        q.schedule_once(TimerKind::AutoAdvance, Step::Employees, ms(750));

        let kinds: Vec<TimerKind> = std::iter::from_fn(|| q.pop_due(ms(2000)))
            .map(|f| f.kind)
            .collect();
        // Equal deadlines fire in scheduling order
        assert_eq!(
            kinds,
            vec![
                TimerKind::ChecklistReveal(0),
                TimerKind::AutoAdvance,
                TimerKind::ChecklistReveal(1)
            ]
        );
    }

    #[test]
    fn test_cancel_by_handle() {
        let mut q = TimerQueue::new();
        let id = q.schedule_once(TimerKind::AutoAdvance, Step::Employees, ms(200));
        assert!(q.is_scheduled(id));
        assert!(q.cancel(id));
        assert!(!q.cancel(id));
        assert!(q.pop_due(ms(1000)).is_none());
    }

    #[test]
    fn test_cancel_owned_by_step() {
        let mut q = TimerQueue::new();
        q.schedule_repeating(TimerKind::AnalysisTick, Step::Analysis, ms(50), ms(50));
        q.schedule_once(TimerKind::ChecklistReveal(0), Step::Analysis, ms(750));
        q.schedule_once(TimerKind::AutoAdvance, Step::Employees, ms(200));

        assert_eq!(q.cancel_owned_by(Step::Analysis), 2);
        assert_eq!(q.len(), 1);
        assert_eq!(q.count_kind(TimerKind::AutoAdvance), 1);
    }

    #[test]
    fn test_zero_interval_does_not_spin() {
        let mut q = TimerQueue::new();
        q.schedule_repeating(TimerKind::AnalysisTick, Step::Analysis, ms(0), ms(0));
        let fired = std::iter::from_fn(|| q.pop_due(ms(5))).count();
        assert_eq!(fired, 6);
    }
}
