//! Type-safe option sets for the signup wizard
//!
//! Every single-choice question in the flow is a closed enum rather than a free
//! string, so the renderer can only offer (and the form can only hold) values
//! the funnel knows about.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Head count offered on the employees step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
pub enum EmployeeCount {
    #[strum(serialize = "Just me")]
    #[serde(rename = "Just me")]
    JustMe,
    #[strum(serialize = "2-5 employees")]
    #[serde(rename = "2-5 employees")]
    TwoToFive,
    #[strum(serialize = "6-20 employees")]
    #[serde(rename = "6-20 employees")]
    SixToTwenty,
    #[strum(serialize = "20+ employees")]
    #[serde(rename = "20+ employees")]
    OverTwenty,
}

/// Legal entity type collected on the entity step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
pub enum EntityType {
    #[default]
    #[strum(serialize = "LLC")]
    #[serde(rename = "LLC")]
    Llc,
    Corporation,
    Nonprofit,
    Partnership,
    #[strum(serialize = "Sole Proprietorship")]
    #[serde(rename = "Sole Proprietorship")]
    SoleProprietorship,
}

/// Business age classification driving the analysis content fork
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BusinessStatus {
    /// Started within the last three months
    New,
    /// Started more than three months ago
    Existing,
}

/// Which flavour of the business-age step the wizard runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FlowVariant {
    /// User enters a start date; the status is derived from it
    #[default]
    #[strum(to_string = "date", serialize = "date-driven")]
    #[serde(rename = "date")]
    DateDriven,
    /// User picks new/existing directly
    #[strum(to_string = "status", serialize = "direct-choice")]
    #[serde(rename = "status")]
    DirectChoice,
}

impl EmployeeCount {
    /// All options in display order
    pub fn options() -> Vec<Self> {
        Self::iter().collect()
    }
}

impl EntityType {
    /// All options in display order
    pub fn options() -> Vec<Self> {
        Self::iter().collect()
    }
}

impl BusinessStatus {
    /// Label shown on the direct-choice step
    pub fn choice_label(&self) -> &'static str {
        match self {
            Self::New => "I'm starting a new business",
            Self::Existing => "My business is already up and running",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_count_labels() {
        let labels: Vec<String> = EmployeeCount::options()
            .iter()
            .map(|e| e.to_string())
            .collect();
        assert_eq!(
            labels,
            vec!["Just me", "2-5 employees", "6-20 employees", "20+ employees"]
        );
    }

    #[test]
    fn test_entity_type_default_is_llc() {
        assert_eq!(EntityType::default(), EntityType::Llc);
        assert_eq!(EntityType::default().to_string(), "LLC");
        assert_eq!(EntityType::options().len(), 5);
    }

    #[test]
    fn test_entity_type_parse() {
        let parsed: EntityType = "Sole Proprietorship".parse().expect("Should parse");
        assert_eq!(parsed, EntityType::SoleProprietorship);
    }

    #[test]
    fn test_flow_variant_parse_aliases() {
        assert_eq!("date".parse::<FlowVariant>().ok(), Some(FlowVariant::DateDriven));
        assert_eq!(
            "direct-choice".parse::<FlowVariant>().ok(),
            Some(FlowVariant::DirectChoice)
        );
        assert!("sometimes".parse::<FlowVariant>().is_err());
    }

    #[test]
    fn test_serde_uses_display_labels() {
        let json = serde_json::to_string(&EmployeeCount::TwoToFive).expect("serialize");
        assert_eq!(json, "\"2-5 employees\"");
        let status: BusinessStatus = serde_json::from_str("\"existing\"").expect("deserialize");
        assert_eq!(status, BusinessStatus::Existing);
    }
}
