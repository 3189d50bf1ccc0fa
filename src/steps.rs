//! Wizard steps
//!
//! The signup flow progresses through these steps linearly. Forward and
//! backward moves are only ever between adjacent steps.
//!
//! # Step Flow
//!
//! ```text
//! Welcome -> Employees -> BusinessAge -> Analysis -> Pricing
//!         -> PersonalInfo -> EntityInfo -> Checkout -> Confirmation
//! ```
//!
//! `BusinessAge` asks for a start date or a new/existing choice depending on
//! the [`FlowVariant`](crate::types::FlowVariant). `Confirmation` is terminal.

use serde::Serialize;
use std::fmt;

/// One screen of the wizard, ordered by index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(u8)]
pub enum Step {
    /// State selection and introduction
    #[default]
    Welcome = 0,
    /// Employee count, single choice with auto-advance
    Employees = 1,
    /// Start date (date-driven) or business status (direct-choice)
    BusinessAge = 2,
    /// Simulated analysis with progress animation
    Analysis = 3,
    /// Plan selection
    Pricing = 4,
    /// Name, email and phone
    PersonalInfo = 5,
    /// Entity name and type
    EntityInfo = 6,
    /// Payment details and order summary
    Checkout = 7,
    /// Order placed (terminal)
    Confirmation = 8,
}

impl Step {
    /// Total number of steps.
    pub const COUNT: usize = 9;

    /// Index of the final step.
    pub const LAST_INDEX: usize = Self::COUNT - 1;

    /// Zero-based index of this step.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Step at `index`, if in range.
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Welcome),
            1 => Some(Self::Employees),
            2 => Some(Self::BusinessAge),
            3 => Some(Self::Analysis),
            4 => Some(Self::Pricing),
            5 => Some(Self::PersonalInfo),
            6 => Some(Self::EntityInfo),
            7 => Some(Self::Checkout),
            8 => Some(Self::Confirmation),
            _ => None,
        }
    }

    /// Returns all steps in order.
    pub const fn all() -> &'static [Self] {
        &[
            Self::Welcome,
            Self::Employees,
            Self::BusinessAge,
            Self::Analysis,
            Self::Pricing,
            Self::PersonalInfo,
            Self::EntityInfo,
            Self::Checkout,
            Self::Confirmation,
        ]
    }

    /// The next step, or `None` at the terminal step.
    pub const fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// The previous step, or `None` at the first step.
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::Welcome => None,
            _ => Self::from_index(self.index() - 1),
        }
    }

    /// Returns true for the confirmation step, which has no outgoing transitions.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Confirmation)
    }

    /// Get the display title for this step.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Welcome => "Registered Agent Service",
            Self::Employees => "How many employees does your business have?",
            Self::BusinessAge => "When did you start your business?",
            Self::Analysis => "Analyzing your business",
            Self::Pricing => "Choose Your Plan",
            Self::PersonalInfo => "Tell us about yourself",
            Self::EntityInfo => "Tell us about your entity",
            Self::Checkout => "Complete your order",
            Self::Confirmation => "You're all set!",
        }
    }

    /// Progress bar fill for this step: empty on welcome, full on confirmation.
    pub fn progress_percent(self) -> u8 {
        match self {
            Self::Welcome => 0,
            Self::Confirmation => 100,
            other => ((other.index() * 100) / Self::LAST_INDEX) as u8,
        }
    }

    /// Whether the back affordance is shown.
    pub const fn shows_back(self) -> bool {
        !matches!(self, Self::Welcome | Self::Confirmation)
    }

    /// Label of the primary call to action, if the step has one.
    pub const fn cta_label(self) -> Option<&'static str> {
        match self {
            Self::Welcome => Some("Get started"),
            Self::Employees => None,
            Self::BusinessAge => Some("Continue"),
            Self::Analysis => Some("See your personalized plan"),
            Self::Pricing | Self::PersonalInfo | Self::EntityInfo => Some("Continue"),
            Self::Checkout => Some("Complete my order"),
            Self::Confirmation => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Welcome => "welcome",
            Self::Employees => "employees",
            Self::BusinessAge => "business-age",
            Self::Analysis => "analysis",
            Self::Pricing => "pricing",
            Self::PersonalInfo => "personal-info",
            Self::EntityInfo => "entity-info",
            Self::Checkout => "checkout",
            Self::Confirmation => "confirmation",
        };
        f.write_str(name)
    }
}

/// Direction of the last transition; only used to pick an animation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    /// +1 forward, -1 backward.
    pub const fn sign(self) -> i8 {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_order_is_sequential() {
        for (i, step) in Step::all().iter().enumerate() {
            assert_eq!(step.index(), i, "Step {:?} should have index {}", step, i);
            assert_eq!(Step::from_index(i), Some(*step));
        }
        assert_eq!(Step::all().len(), Step::COUNT);
        assert_eq!(Step::from_index(Step::COUNT), None);
    }

    #[test]
    fn test_default_step_is_welcome() {
        assert_eq!(Step::default(), Step::Welcome);
        assert_eq!(Step::default().index(), 0);
    }

    #[test]
    fn test_step_next_forms_chain() {
        let mut current = Step::Welcome;
        let mut count = 0;

        while let Some(next) = current.next() {
            current = next;
            count += 1;
            assert!(count < 20, "Infinite loop detected in step chain");
        }

        assert_eq!(current, Step::Confirmation);
        assert_eq!(count, Step::LAST_INDEX);
    }

    #[test]
    fn test_step_previous_forms_reverse_chain() {
        let mut current = Step::Confirmation;
        let mut count = 0;

        while let Some(prev) = current.previous() {
            current = prev;
            count += 1;
            assert!(count < 20, "Infinite loop detected in step chain");
        }

        assert_eq!(current, Step::Welcome);
        assert_eq!(count, Step::LAST_INDEX);
    }

    #[test]
    fn test_only_confirmation_is_terminal() {
        for step in Step::all() {
            assert_eq!(step.is_terminal(), *step == Step::Confirmation);
        }
    }

    #[test]
    fn test_progress_percent_increases() {
        let mut last = 0u8;
        for step in Step::all() {
            let progress = step.progress_percent();
            assert!(
                progress >= last,
                "Progress should not decrease: {:?} has {}% after {}%",
                step,
                progress,
                last
            );
            last = progress;
        }
        assert_eq!(Step::Welcome.progress_percent(), 0);
        assert_eq!(Step::Analysis.progress_percent(), 37);
        assert_eq!(Step::Confirmation.progress_percent(), 100);
    }

    #[test]
    fn test_back_affordance() {
        assert!(!Step::Welcome.shows_back());
        assert!(Step::Employees.shows_back());
        assert!(Step::Checkout.shows_back());
        assert!(!Step::Confirmation.shows_back());
    }

    #[test]
    fn test_cta_labels() {
        assert_eq!(Step::Welcome.cta_label(), Some("Get started"));
        assert_eq!(Step::Checkout.cta_label(), Some("Complete my order"));
        assert_eq!(Step::Employees.cta_label(), None);
        assert_eq!(Step::Confirmation.cta_label(), None);
    }

    #[test]
    fn test_step_display() {
        assert_eq!(Step::BusinessAge.to_string(), "business-age");
        assert_eq!(Step::PersonalInfo.to_string(), "personal-info");
    }

    #[test]
    fn test_direction_sign() {
        assert_eq!(Direction::Forward.sign(), 1);
        assert_eq!(Direction::Backward.sign(), -1);
    }
}
