//! raflow library
//!
//! A step-by-step signup wizard for a Registered Agent Service funnel: state
//! selection, employee count, business age, a timed analysis, plan selection,
//! contact and entity details, checkout and confirmation.
//!
//! The [`wizard::WizardController`] owns the flow. Renderers implement
//! [`view::StepRenderer`]; the crate ships a ratatui terminal UI and a
//! headless transcript renderer used by `raflow replay`.

pub mod analysis;
pub mod app;
pub mod business_status;
pub mod catalog;
pub mod cli;
pub mod config_file;
pub mod content;
pub mod error;
pub mod form;
pub mod input;
pub mod logging;
pub mod replay;
pub mod state_data;
pub mod steps;
pub mod theme;
pub mod timer;
pub mod types;
pub mod ui;
pub mod validation;
pub mod view;
pub mod wizard;

// Re-export main types for convenience
pub use analysis::{AnalysisPhase, AnalysisSimulator, AnalysisTiming};
pub use business_status::{classify, classify_start_date};
pub use catalog::{OrderSummary, Plan, PLANS};
pub use config_file::{FlowSettings, ReplayScript};
pub use content::AnalysisContent;
pub use error::{FlowError, Result};
pub use form::{Field, FormData, FormUpdate, StartDate};
pub use state_data::{state_data, StateData};
pub use steps::{Direction, Step};
pub use timer::{Clock, ManualClock, SystemClock};
pub use types::{BusinessStatus, EmployeeCount, EntityType, FlowVariant};
pub use view::{StepRenderer, StepView, TranscriptRenderer, UserAction};
pub use wizard::{NavigationError, WizardController, WizardEvent, WizardSettings};
