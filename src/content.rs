//! Analysis step content fork
//!
//! The analysis screen reads differently for a business that is just starting
//! and one that has been running for a while. Both strategies populate the
//! same accessors, so a renderer draws either one without knowing which it got.

use crate::catalog::format_money;
use crate::state_data::StateData;
use crate::types::BusinessStatus;

/// Testimonial attached to the analysis screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Testimonial {
    pub quote: &'static str,
    pub name: &'static str,
    pub company: &'static str,
}

const NEW_BUSINESS_RISKS: [&str; 3] = [
    "Missing critical state deadlines and lawsuit notifications",
    "Default judgments against your business before you can respond",
    "Heavy fines and possible business suspension by the state",
];

const EXISTING_BUSINESS_RISKS: [&str; 3] = [
    "Service of process delivered to an outdated or home address",
    "Annual report reminders lost in a personal inbox",
    "Falling out of good standing without noticing",
];

const NEW_BUSINESS_TESTIMONIAL: Testimonial = Testimonial {
    quote: "This is my first time starting any kind of a business so I didn't know where to begin, \
            but the whole process was simple and made it easy to get me started.",
    name: "Lauren Flynn",
    company: "Girl and Bubbly Design LLC",
};

const EXISTING_BUSINESS_TESTIMONIAL: Testimonial = Testimonial {
    quote: "We had been running for years with my home address on file. Switching took five \
            minutes and I stopped worrying about missing a notice.",
    name: "Marcus Reed",
    company: "Reed Fabrication Co.",
};

/// Content strategy for the analysis step, chosen by business status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisContent {
    NewBusiness { state: StateData },
    ExistingBusiness { state: StateData },
}

impl AnalysisContent {
    /// Pick the strategy for `status`. Until the status is known the
    /// new-business content is shown.
    pub fn for_status(status: Option<BusinessStatus>, state: StateData) -> Self {
        match status {
            Some(BusinessStatus::Existing) => Self::ExistingBusiness { state },
            Some(BusinessStatus::New) | None => Self::NewBusiness { state },
        }
    }

    pub fn status(&self) -> BusinessStatus {
        match self {
            Self::NewBusiness { .. } => BusinessStatus::New,
            Self::ExistingBusiness { .. } => BusinessStatus::Existing,
        }
    }

    pub fn state(&self) -> &StateData {
        match self {
            Self::NewBusiness { state } | Self::ExistingBusiness { state } => state,
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            Self::NewBusiness { .. } => "Protect your new business from day one",
            Self::ExistingBusiness { .. } => "Keep your business in good standing",
        }
    }

    pub fn intro(&self) -> String {
        match self {
            Self::NewBusiness { state } => format!(
                "Every {} business needs a registered agent. Here's why it matters.",
                state.name
            ),
            Self::ExistingBusiness { state } => format!(
                "{} requires your registered agent details to stay current. Here's what's at stake.",
                state.name
            ),
        }
    }

    pub fn warning_title(&self) -> String {
        format!("{} state requirement", self.state().name)
    }

    pub fn warning_text(&self) -> String {
        let penalty = format_money(self.state().penalty);
        match self {
            Self::NewBusiness { .. } => format!(
                "Without a registered agent, your business risks fines up to {} and possible administrative dissolution.",
                penalty
            ),
            Self::ExistingBusiness { .. } => format!(
                "A lapsed or outdated registered agent can cost up to {} in fines and your good standing.",
                penalty
            ),
        }
    }

    pub fn risks(&self) -> &'static [&'static str] {
        match self {
            Self::NewBusiness { .. } => &NEW_BUSINESS_RISKS,
            Self::ExistingBusiness { .. } => &EXISTING_BUSINESS_RISKS,
        }
    }

    pub fn testimonial(&self) -> &'static Testimonial {
        match self {
            Self::NewBusiness { .. } => &NEW_BUSINESS_TESTIMONIAL,
            Self::ExistingBusiness { .. } => &EXISTING_BUSINESS_TESTIMONIAL,
        }
    }

    /// Social proof line shown on the pricing step.
    pub fn usage_line(&self) -> String {
        format!(
            "{}% of businesses in {} use our Registered Agent service",
            self.state().agent_usage_percent,
            self.state().name
        )
    }
}
