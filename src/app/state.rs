//! Application state definitions
//!
//! Terminal-only state that lives beside the wizard: the input cursor, the
//! status line and the quit flag.

use crate::input::InputState;
use crate::steps::Step;
use crate::wizard::{NavigationError, WizardEvent};

/// Main application state
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Cursor and focus for the current step
    pub input: InputState,
    /// Status message for user feedback
    pub status_message: Option<String>,
    /// Set when the user asks to leave
    pub should_quit: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the status line from wizard events.
    pub fn apply_events(&mut self, events: &[WizardEvent]) {
        for event in events {
            match event {
                WizardEvent::StepChanged { .. } => self.status_message = None,
                WizardEvent::NavigationBlocked(NavigationError::Incomplete { step, .. })
                    if *step == Step::Analysis =>
                {
                    self.status_message = Some("Hang tight, your analysis is almost done".to_string());
                }
                WizardEvent::NavigationBlocked(err) => {
                    self.status_message = Some(err.to_string());
                }
                WizardEvent::AnalysisCompleted => {
                    self.status_message = Some("Analysis complete".to_string());
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::Field;
    use crate::steps::Direction;

    #[test]
    fn test_blocked_navigation_sets_status() {
        let mut state = AppState::new();
        state.apply_events(&[WizardEvent::NavigationBlocked(NavigationError::Incomplete {
            step: Step::Checkout,
            missing: vec![Field::CardCvc],
        })]);
        assert_eq!(
            state.status_message.as_deref(),
            Some("Cannot leave checkout: missing card CVC")
        );
    }

    #[test]
    fn test_step_change_clears_status() {
        let mut state = AppState::new();
        state.status_message = Some("stale".to_string());
        state.apply_events(&[WizardEvent::StepChanged {
            from: Step::Welcome,
            to: Step::Employees,
            direction: Direction::Forward,
        }]);
        assert!(state.status_message.is_none());
    }

    #[test]
    fn test_blocked_analysis_has_friendly_status() {
        let mut state = AppState::new();
        state.apply_events(&[WizardEvent::NavigationBlocked(NavigationError::Incomplete {
            step: Step::Analysis,
            missing: vec![Field::Analysis],
        })]);
        assert!(state
            .status_message
            .as_deref()
            .is_some_and(|s| s.contains("almost done")));
    }
}
