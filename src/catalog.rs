//! Plan catalog and order pricing
//!
//! The catalog is a fixed table. The plan total is what the model charges; the
//! state filing fee only appears in the order summary shown at checkout.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Flat state filing fee added to the checkout summary
pub const STATE_FILING_FEE: Decimal = dec!(20);

/// A purchasable registered agent plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Plan {
    /// Plan duration in years
    pub years: u8,
    /// Price charged for the whole duration
    pub total_price: Decimal,
    /// Effective price per year, as advertised
    pub per_year_price: Decimal,
    /// Undiscounted price for the same duration, when the plan is a discount
    pub original_price: Option<Decimal>,
    /// Highlighted as the recommended choice
    pub best_value: bool,
}

/// The plans offered on the pricing step, in display order
pub const PLANS: [Plan; 3] = [
    Plan {
        years: 1,
        total_price: dec!(199),
        per_year_price: dec!(199),
        original_price: None,
        best_value: false,
    },
    Plan {
        years: 2,
        total_price: dec!(249),
        per_year_price: dec!(124.50),
        original_price: Some(dec!(398)),
        best_value: true,
    },
    Plan {
        years: 3,
        total_price: dec!(299),
        per_year_price: dec!(99.67),
        original_price: Some(dec!(597)),
        best_value: false,
    },
];

impl Plan {
    /// Percentage saved against the original price, rounded to a whole percent.
    pub fn savings_percent(&self) -> Option<u8> {
        let original = self.original_price?;
        if original <= Decimal::ZERO || self.total_price >= original {
            return None;
        }
        let saved = (Decimal::ONE - self.total_price / original) * dec!(100);
        saved.round().to_u8()
    }

    /// "1 Year" / "3 Years"
    pub fn duration_label(&self) -> String {
        if self.years > 1 {
            format!("{} Years", self.years)
        } else {
            format!("{} Year", self.years)
        }
    }
}

/// Index of the plan highlighted as best value (falls back to the first plan).
pub fn default_plan_index() -> usize {
    PLANS.iter().position(|p| p.best_value).unwrap_or(0)
}

/// Look up a plan by index; `None` outside the catalog.
pub fn plan(index: usize) -> Option<&'static Plan> {
    PLANS.get(index)
}

/// Checkout summary for the selected plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub state_name: String,
    pub plan: Plan,
    pub state_filing_fee: Decimal,
}

impl OrderSummary {
    pub fn new(state_name: impl Into<String>, plan: Plan, state_filing_fee: Decimal) -> Self {
        Self {
            state_name: state_name.into(),
            plan,
            state_filing_fee,
        }
    }

    /// Plan total plus the filing fee
    pub fn grand_total(&self) -> Decimal {
        self.plan.total_price + self.state_filing_fee
    }
}

/// Format a money amount the way the funnel displays it ("$124.50", "$199").
pub fn format_money(amount: Decimal) -> String {
    if amount.fract().is_zero() {
        format!("${}", amount.trunc())
    } else {
        format!("${:.2}", amount)
    }
}
