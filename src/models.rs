// src/models.rs
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Property attributes as entered by the user. Only `price` feeds the
/// calculator; the rest is carried through to responses and reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyInput {
    pub address: String,
    pub price: Option<f64>,
    pub beds: u32,
    pub baths: f64,
    pub sqft: f64,
    pub neighborhood: String,
    pub property_type: String,
    pub zipcode: String,
}

impl Default for PropertyInput {
    fn default() -> Self {
        PropertyInput {
            address: String::new(),
            price: None,
            beds: 0,
            baths: 0.0,
            sqft: 0.0,
            neighborhood: String::new(),
            property_type: "House".to_string(),
            zipcode: String::new(),
        }
    }
}

impl PropertyInput {
    pub fn with_price(price: f64) -> Self {
        PropertyInput {
            price: Some(price),
            ..Default::default()
        }
    }
}

/// Fixed monthly dollar amounts that replace the rate-based estimate of a
/// cost line. A line is overridden only when its amount is positive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExpenseOverrides {
    pub property_tax: Option<f64>,
    pub insurance: Option<f64>,
    pub management: Option<f64>,
    pub maintenance: Option<f64>,
    pub capital_reserves: Option<f64>,
    pub vacancy: Option<f64>,
}

/// Financing and operating assumptions. Every field is a percentage except
/// the loan term, the vacancy months, and the dollar overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssumptionSet {
    pub down_payment_pct: f64,
    pub interest_rate: f64,
    #[serde(rename = "loanTerm")]
    pub loan_term_years: u32,
    pub property_tax_rate: f64,
    pub insurance_rate: f64,
    pub maintenance_rate: f64,
    pub capital_reserves_rate: f64,
    pub vacancy_rate: f64,
    pub closing_costs_pct: f64,
    pub rent_to_price_pct: f64,
    pub management_fee_pct: f64,
    pub appreciation_rate: f64,
    pub monthly_rent_override: Option<f64>,
    /// Vacant months per year; replaces `vacancy_rate` when set.
    pub vacancy_months: Option<f64>,
    pub expense_overrides: ExpenseOverrides,
}

impl Default for AssumptionSet {
    fn default() -> Self {
        AssumptionSet {
            down_payment_pct: 20.0,
            interest_rate: 5.0,
            loan_term_years: 30,
            property_tax_rate: 3.0,
            insurance_rate: 0.5,
            maintenance_rate: 1.0,
            capital_reserves_rate: 1.0,
            vacancy_rate: 5.0,
            closing_costs_pct: 3.0,
            rent_to_price_pct: 0.8,
            management_fee_pct: 8.0,
            appreciation_rate: 3.0,
            monthly_rent_override: None,
            vacancy_months: None,
            expense_overrides: ExpenseOverrides::default(),
        }
    }
}

/// A derived figure that may have no meaningful value, e.g. a payback
/// period for a property that never pays back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    Value(f64),
    NotApplicable,
}

impl Metric {
    /// Wraps `value`, mapping NaN and infinities to `NotApplicable`.
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() {
            Metric::Value(value)
        } else {
            Metric::NotApplicable
        }
    }

    pub fn ratio(numerator: f64, denominator: f64) -> Self {
        if denominator == 0.0 {
            return Metric::NotApplicable;
        }
        Metric::from_f64(numerator / denominator)
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Metric::Value(v) => Some(*v),
            Metric::NotApplicable => None,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Metric::Value(v) => write!(f, "{:.2}", v),
            Metric::NotApplicable => write!(f, "N/A"),
        }
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Metric::Value(v) => serializer.serialize_f64(*v),
            Metric::NotApplicable => serializer.serialize_str("N/A"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCosts {
    pub property_tax: f64,
    pub insurance: f64,
    pub management: f64,
    pub maintenance: f64,
    pub capital_reserves: f64,
    pub vacancy: f64,
}

impl MonthlyCosts {
    pub fn total(&self) -> f64 {
        self.property_tax
            + self.insurance
            + self.management
            + self.maintenance
            + self.capital_reserves
            + self.vacancy
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResult {
    pub monthly_rent: f64,
    pub monthly_payment: f64,
    pub monthly_cash_flow: f64,
    pub cap_rate: f64,
    pub cash_on_cash: Metric,
    pub break_even_rent: f64,
    pub rent_to_price: f64,
    #[serde(rename = "totalROI")]
    pub total_roi: Metric,
    pub payback_period: Metric,
    #[serde(skip)]
    pub breakdown: Breakdown,
}

/// Which cost lines came from `ExpenseOverrides` rather than a rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverriddenCosts {
    pub property_tax: bool,
    pub insurance: bool,
    pub management: bool,
    pub maintenance: bool,
    pub capital_reserves: bool,
    pub vacancy: bool,
}

/// Intermediate figures behind a `MetricsResult`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    pub down_payment: f64,
    pub loan_amount: f64,
    pub total_upfront_cost: f64,
    pub annual_noi: f64,
    pub principal_paid_year_one: f64,
    pub costs: MonthlyCosts,
    pub overridden: OverriddenCosts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Recommendation {
    #[serde(rename = "Strong Buy")]
    StrongBuy,
    #[serde(rename = "Buy")]
    Buy,
    #[serde(rename = "Hold")]
    Hold,
    #[serde(rename = "Don't Buy")]
    DontBuy,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            Recommendation::StrongBuy => "Strong Buy",
            Recommendation::Buy => "Buy",
            Recommendation::Hold => "Hold",
            Recommendation::DontBuy => "Don't Buy",
        };
        write!(f, "{}", label)
    }
}

/// Distance from the buy thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetGap {
    pub needed_cash_flow: f64,
    pub needed_cap_rate: f64,
    pub rent_for_cash_flow: f64,
    pub rent_for_cap_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionYear {
    pub year: u32,
    pub property_value: f64,
    pub monthly_rent: f64,
    pub equity_from_principal: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleScenario {
    pub hold_years: u32,
    pub projected_sale_price: f64,
    pub agent_fees: f64,
    pub closing_costs: f64,
    pub remaining_loan: f64,
    pub net_sale_proceeds: f64,
    pub total_cash_flow: f64,
    pub total_profit: f64,
    pub total_roi: Metric,
}
