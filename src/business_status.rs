//! Business status classification
//!
//! A business counts as new when it started on or after "today minus three
//! calendar months". Month subtraction is calendar based: when the target month
//! is shorter, the threshold clamps to its last day (May 31 -> Feb 28/29).

use chrono::{Months, NaiveDate};

use crate::form::StartDate;
use crate::types::BusinessStatus;

/// How far back a start date may be and still count as a new business
pub const NEW_BUSINESS_WINDOW_MONTHS: u32 = 3;

/// The earliest start date that still classifies as new.
pub fn new_business_threshold(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_months(Months::new(NEW_BUSINESS_WINDOW_MONTHS))
        .unwrap_or(NaiveDate::MIN)
}

/// Classify a fully specified start date. The threshold day itself is `New`.
pub fn classify(start: NaiveDate, today: NaiveDate) -> BusinessStatus {
    if start >= new_business_threshold(today) {
        BusinessStatus::New
    } else {
        BusinessStatus::Existing
    }
}

/// Classify a possibly partial start date; `None` until all parts are present
/// and form a real calendar date.
pub fn classify_start_date(start: &StartDate, today: NaiveDate) -> Option<BusinessStatus> {
    start.to_date().map(|date| classify(date, today))
}
