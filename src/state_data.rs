//! State statistics lookup
//!
//! Region-specific display values for the persuasive copy: the fine a business
//! risks without a registered agent and how many businesses in the state use
//! the service. The figures are illustrative funnel data, not legal data.
//! Lookup is total: unknown names get the fallback record.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Name used when no state has been chosen yet
pub const PLACEHOLDER_STATE_NAME: &str = "your state";

/// Penalty shown for states missing from the table
pub const DEFAULT_PENALTY: Decimal = dec!(300);

/// Usage percentage shown for states missing from the table
pub const DEFAULT_USAGE_PERCENT: u8 = 66;

/// States offered on the welcome step
pub const US_STATES: [&str; 50] = [
    "Alabama", "Alaska", "Arizona", "Arkansas", "California", "Colorado", "Connecticut",
    "Delaware", "Florida", "Georgia", "Hawaii", "Idaho", "Illinois", "Indiana", "Iowa",
    "Kansas", "Kentucky", "Louisiana", "Maine", "Maryland", "Massachusetts", "Michigan",
    "Minnesota", "Mississippi", "Missouri", "Montana", "Nebraska", "Nevada",
    "New Hampshire", "New Jersey", "New Mexico", "New York", "North Carolina",
    "North Dakota", "Ohio", "Oklahoma", "Oregon", "Pennsylvania", "Rhode Island",
    "South Carolina", "South Dakota", "Tennessee", "Texas", "Utah", "Vermont",
    "Virginia", "Washington", "West Virginia", "Wisconsin", "Wyoming",
];

// (name, penalty, usage percent)
const STATE_TABLE: &[(&str, Decimal, u8)] = &[
    ("California", dec!(250), 71),
    ("Delaware", dec!(200), 83),
    ("Florida", dec!(400), 69),
    ("Georgia", dec!(250), 64),
    ("Illinois", dec!(300), 62),
    ("Nevada", dec!(500), 74),
    ("New York", dec!(250), 68),
    ("Texas", dec!(750), 72),
    ("Washington", dec!(400), 61),
    ("Wyoming", dec!(250), 77),
];

/// Display values for one state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateData {
    pub name: String,
    /// Fine risked without a registered agent
    pub penalty: Decimal,
    /// Share of businesses in the state using the service
    pub agent_usage_percent: u8,
}

/// Look up a state by exact name, falling back to default values on a miss.
///
/// An empty (or whitespace) name yields the placeholder record so copy can
/// always be rendered.
pub fn state_data(name: &str) -> StateData {
    let trimmed = name.trim();
    if let Some((found, penalty, usage)) = STATE_TABLE.iter().find(|(n, _, _)| *n == trimmed) {
        return StateData {
            name: (*found).to_string(),
            penalty: *penalty,
            agent_usage_percent: *usage,
        };
    }

    tracing::debug!(state = trimmed, "state not in table, using fallback values");
    StateData {
        name: display_name(trimmed).to_string(),
        penalty: DEFAULT_PENALTY,
        agent_usage_percent: DEFAULT_USAGE_PERCENT,
    }
}

/// The name to show in copy: the chosen state, or the placeholder.
pub fn display_name(name: &str) -> &str {
    if name.trim().is_empty() {
        PLACEHOLDER_STATE_NAME
    } else {
        name.trim()
    }
}

/// Whether `name` is one of the offered states.
pub fn is_known_state(name: &str) -> bool {
    US_STATES.contains(&name)
}
