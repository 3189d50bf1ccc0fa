//! Form data collected across the wizard
//!
//! `FormData` is the single record holding every answer. It only changes by
//! merging a `FormUpdate`, which carries just the fields the user touched.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use strum::Display;

use crate::catalog::{self, PLANS};
use crate::error::{FlowError, Result};
use crate::types::{BusinessStatus, EmployeeCount, EntityType};

/// Number of years offered by the start-date year picker
pub const YEAR_OPTION_COUNT: i32 = 50;

/// Month names for the date picker, January first
pub const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

// ============================================================================
// Start Date
// ============================================================================

/// A start date entered one component at a time.
///
/// The day is never allowed to exceed the length of the selected month:
/// changing the month or year clears a day that no longer fits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartDate {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl StartDate {
    /// A fully specified date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: Some(date.year()),
            month: Some(date.month()),
            day: Some(date.day()),
        }
    }

    /// All three components are present.
    pub fn is_complete(&self) -> bool {
        self.year.is_some() && self.month.is_some() && self.day.is_some()
    }

    /// Nothing has been picked yet.
    pub fn is_empty(&self) -> bool {
        self.year.is_none() && self.month.is_none() && self.day.is_none()
    }

    /// The calendar date, once complete and real.
    pub fn to_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year?, self.month?, self.day?)
    }

    /// Number of selectable days; 31 until both month and year are known.
    pub fn day_count(&self) -> u32 {
        match (self.year, self.month) {
            (Some(year), Some(month)) => days_in_month(year, month),
            _ => 31,
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self.normalized()
    }

    /// Months outside 1..=12 are ignored.
    pub fn with_month(mut self, month: u32) -> Self {
        if (1..=12).contains(&month) {
            self.month = Some(month);
        }
        self.normalized()
    }

    /// Days the current month cannot hold are ignored.
    pub fn with_day(mut self, day: u32) -> Self {
        if day >= 1 && day <= self.day_count() {
            self.day = Some(day);
        }
        self
    }

    /// Drop components that cannot be part of a real date.
    pub fn normalized(mut self) -> Self {
        if self.month.is_some_and(|m| !(1..=12).contains(&m)) {
            self.month = None;
        }
        if self.day.is_some_and(|d| d == 0 || d > self.day_count()) {
            self.day = None;
        }
        self
    }
}

impl fmt::Display for StartDate {
    /// `YYYY-MM-DD`, with blanks for missing parts and empty when nothing is set.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        let year = self.year.map(|y| y.to_string()).unwrap_or_default();
        let month = self.month.map(|m| format!("{:02}", m)).unwrap_or_default();
        let day = self.day.map(|d| format!("{:02}", d)).unwrap_or_default();
        write!(f, "{}-{}-{}", year, month, day)
    }
}

/// Days in `month` of `year`, accounting for leap years.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month >= 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

/// Years offered by the picker, newest first.
pub fn year_options(today: NaiveDate) -> Vec<i32> {
    (0..YEAR_OPTION_COUNT).map(|i| today.year() - i).collect()
}

// ============================================================================
// Fields
// ============================================================================

/// A requirement the validator can report as unmet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
pub enum Field {
    #[strum(serialize = "state")]
    State,
    #[strum(serialize = "employee count")]
    Employees,
    #[strum(serialize = "start date")]
    StartDate,
    #[strum(serialize = "business status")]
    BusinessStatus,
    #[strum(serialize = "analysis")]
    Analysis,
    #[strum(serialize = "first name")]
    FirstName,
    #[strum(serialize = "last name")]
    LastName,
    #[strum(serialize = "email")]
    Email,
    #[strum(serialize = "phone")]
    Phone,
    #[strum(serialize = "entity name")]
    EntityName,
    #[strum(serialize = "name on card")]
    CardName,
    #[strum(serialize = "card number")]
    CardNumber,
    #[strum(serialize = "card expiry")]
    CardExpiry,
    #[strum(serialize = "card CVC")]
    CardCvc,
}

// ============================================================================
// Form Data
// ============================================================================

/// Every answer collected by the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormData {
    pub state: String,
    pub employees: Option<EmployeeCount>,
    pub start_date: StartDate,
    pub business_status: Option<BusinessStatus>,
    #[serde(deserialize_with = "plan_index_in_catalog")]
    pub plan_index: usize,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub entity_name: String,
    pub entity_type: EntityType,
    pub card_name: String,
    pub card_number: String,
    pub card_expiry: String,
    pub card_cvc: String,
}

impl Default for FormData {
    fn default() -> Self {
        Self {
            state: String::new(),
            employees: None,
            start_date: StartDate::default(),
            business_status: None,
            plan_index: catalog::default_plan_index(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            entity_name: String::new(),
            entity_type: EntityType::default(),
            card_name: String::new(),
            card_number: String::new(),
            card_expiry: String::new(),
            card_cvc: String::new(),
        }
    }
}

/// A partial record; `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormUpdate {
    pub state: Option<String>,
    pub employees: Option<EmployeeCount>,
    pub start_date: Option<StartDate>,
    pub business_status: Option<BusinessStatus>,
    pub plan_index: Option<usize>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub entity_name: Option<String>,
    pub entity_type: Option<EntityType>,
    pub card_name: Option<String>,
    pub card_number: Option<String>,
    pub card_expiry: Option<String>,
    pub card_cvc: Option<String>,
}

impl FormUpdate {
    pub fn state(name: impl Into<String>) -> Self {
        Self {
            state: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn start_date(date: StartDate) -> Self {
        Self {
            start_date: Some(date),
            ..Self::default()
        }
    }

    pub fn plan_index(index: usize) -> Self {
        Self {
            plan_index: Some(index),
            ..Self::default()
        }
    }

    /// Set one free-text field by its `Field` tag; non-text fields are ignored.
    pub fn text(field: Field, value: impl Into<String>) -> Self {
        let value = Some(value.into());
        let mut update = Self::default();
        match field {
            Field::State => update.state = value,
            Field::FirstName => update.first_name = value,
            Field::LastName => update.last_name = value,
            Field::Email => update.email = value,
            Field::Phone => update.phone = value,
            Field::EntityName => update.entity_name = value,
            Field::CardName => update.card_name = value,
            Field::CardNumber => update.card_number = value,
            Field::CardExpiry => update.card_expiry = value,
            Field::CardCvc => update.card_cvc = value,
            _ => {}
        }
        update
    }

    /// True when the update carries no fields.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl FormData {
    /// Merge `update` into the record.
    ///
    /// # Errors
    ///
    /// Rejects the whole update (nothing is applied) when it carries a plan
    /// index outside the catalog.
    pub fn apply(&mut self, update: FormUpdate) -> Result<()> {
        if let Some(index) = update.plan_index {
            if index >= PLANS.len() {
                return Err(FlowError::validation(format!(
                    "plan index {} out of range (catalog has {} plans)",
                    index,
                    PLANS.len()
                )));
            }
        }

        let FormUpdate {
            state,
            employees,
            start_date,
            business_status,
            plan_index,
            first_name,
            last_name,
            email,
            phone,
            entity_name,
            entity_type,
            card_name,
            card_number,
            card_expiry,
            card_cvc,
        } = update;

        set(&mut self.state, state);
        if employees.is_some() {
            self.employees = employees;
        }
        if let Some(date) = start_date {
            self.start_date = date.normalized();
        }
        if business_status.is_some() {
            self.business_status = business_status;
        }
        set(&mut self.plan_index, plan_index);
        set(&mut self.first_name, first_name);
        set(&mut self.last_name, last_name);
        set(&mut self.email, email);
        set(&mut self.phone, phone);
        set(&mut self.entity_name, entity_name);
        set(&mut self.entity_type, entity_type);
        set(&mut self.card_name, card_name);
        set(&mut self.card_number, card_number);
        set(&mut self.card_expiry, card_expiry);
        set(&mut self.card_cvc, card_cvc);
        Ok(())
    }

    /// Current value of a free-text field; empty for non-text fields.
    pub fn text(&self, field: Field) -> &str {
        match field {
            Field::State => &self.state,
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::EntityName => &self.entity_name,
            Field::CardName => &self.card_name,
            Field::CardNumber => &self.card_number,
            Field::CardExpiry => &self.card_expiry,
            Field::CardCvc => &self.card_cvc,
            _ => "",
        }
    }

    /// The selected plan.
    ///
    /// `apply` and deserialization both reject an index outside the catalog,
    /// so the first plan is only returned for a record whose public field was
    /// set directly.
    pub fn selected_plan(&self) -> &'static catalog::Plan {
        catalog::plan(self.plan_index).unwrap_or(&PLANS[0])
    }
}

fn plan_index_in_catalog<'de, D>(deserializer: D) -> std::result::Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let index = usize::deserialize(deserializer)?;
    if index >= PLANS.len() {
        return Err(serde::de::Error::custom(format!(
            "plan index {} out of range (catalog has {} plans)",
            index,
            PLANS.len()
        )));
    }
    Ok(index)
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}
