// src/services/calculations.rs
use log::debug;

use crate::error::CalcError;
use crate::models::{
    AssumptionSet, Breakdown, Metric, MetricsResult, MonthlyCosts, OverriddenCosts,
    PropertyInput, Recommendation, TargetGap,
};
use crate::services::mortgage;

pub const MAX_LOAN_TERM_YEARS: u32 = 50;
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Buy thresholds used for the target gap.
pub const BUY_CAP_RATE: f64 = 6.0;
pub const BUY_CASH_FLOW: f64 = 300.0;

struct Tier {
    recommendation: Recommendation,
    cap_rate: f64,
    cash_on_cash: f64,
    cash_flow: f64,
}

// Checked in order; the first tier whose three floors are met wins.
const TIERS: [Tier; 3] = [
    Tier {
        recommendation: Recommendation::StrongBuy,
        cap_rate: 6.0,
        cash_on_cash: 8.0,
        cash_flow: 300.0,
    },
    Tier {
        recommendation: Recommendation::Buy,
        cap_rate: 5.0,
        cash_on_cash: 6.0,
        cash_flow: 200.0,
    },
    Tier {
        recommendation: Recommendation::Hold,
        cap_rate: 4.0,
        cash_on_cash: 4.0,
        cash_flow: 100.0,
    },
];

fn check_pct(field: &'static str, value: f64) -> Result<(), CalcError> {
    if !value.is_finite() {
        return Err(CalcError::invalid(field, "must be a finite number"));
    }
    if !(0.0..=100.0).contains(&value) {
        return Err(CalcError::invalid(field, format!("{} is outside 0-100", value)));
    }
    Ok(())
}

/// Returns the validated purchase price.
pub fn validate(input: &PropertyInput, assumptions: &AssumptionSet) -> Result<f64, CalcError> {
    let price = match input.price {
        None => return Err(CalcError::invalid("price", "is required")),
        Some(p) if !p.is_finite() => {
            return Err(CalcError::invalid("price", "must be a finite number"))
        }
        Some(p) if p <= 0.0 => {
            return Err(CalcError::invalid("price", format!("must be positive, got {}", p)))
        }
        Some(p) => p,
    };

    check_pct("downPaymentPct", assumptions.down_payment_pct)?;
    check_pct("interestRate", assumptions.interest_rate)?;
    check_pct("propertyTaxRate", assumptions.property_tax_rate)?;
    check_pct("insuranceRate", assumptions.insurance_rate)?;
    check_pct("maintenanceRate", assumptions.maintenance_rate)?;
    check_pct("capitalReservesRate", assumptions.capital_reserves_rate)?;
    check_pct("vacancyRate", assumptions.vacancy_rate)?;
    check_pct("closingCostsPct", assumptions.closing_costs_pct)?;
    check_pct("rentToPricePct", assumptions.rent_to_price_pct)?;
    check_pct("managementFeePct", assumptions.management_fee_pct)?;
    check_pct("appreciationRate", assumptions.appreciation_rate)?;

    if assumptions.loan_term_years == 0 || assumptions.loan_term_years > MAX_LOAN_TERM_YEARS {
        return Err(CalcError::invalid(
            "loanTerm",
            format!("must be between 1 and {} years", MAX_LOAN_TERM_YEARS),
        ));
    }
    if let Some(rent) = assumptions.monthly_rent_override {
        if !rent.is_finite() || rent < 0.0 {
            return Err(CalcError::invalid(
                "monthlyRentOverride",
                "must be a non-negative number",
            ));
        }
    }

    if let Some(months) = assumptions.vacancy_months {
        if !months.is_finite() || !(0.0..=MONTHS_PER_YEAR).contains(&months) {
            return Err(CalcError::invalid("vacancyMonths", "must be between 0 and 12"));
        }
    }

    let overrides = &assumptions.expense_overrides;
    for (field, amount) in [
        ("expenseOverrides.propertyTax", overrides.property_tax),
        ("expenseOverrides.insurance", overrides.insurance),
        ("expenseOverrides.management", overrides.management),
        ("expenseOverrides.maintenance", overrides.maintenance),
        ("expenseOverrides.capitalReserves", overrides.capital_reserves),
        ("expenseOverrides.vacancy", overrides.vacancy),
    ] {
        if let Some(amount) = amount {
            if !amount.is_finite() || amount < 0.0 {
                return Err(CalcError::invalid(field, "must be a non-negative number"));
            }
        }
    }

    Ok(price)
}

/// Monthly rent used by the analysis: the caller's estimate when one is
/// given, otherwise the rent-to-price heuristic.
pub fn estimate_rent(price: f64, assumptions: &AssumptionSet) -> f64 {
    match assumptions.monthly_rent_override {
        Some(rent) if rent > 0.0 => rent,
        _ => price * assumptions.rent_to_price_pct / 100.0,
    }
}

// A positive override wins over the estimate.
fn pick(estimate: f64, manual: Option<f64>) -> (f64, bool) {
    match manual {
        Some(amount) if amount > 0.0 => (amount, true),
        _ => (estimate, false),
    }
}

/// Itemised monthly operating costs, and which lines were set by hand.
pub fn monthly_costs(
    price: f64,
    monthly_rent: f64,
    assumptions: &AssumptionSet,
) -> (MonthlyCosts, OverriddenCosts) {
    let vacancy_estimate = match assumptions.vacancy_months {
        Some(months) => monthly_rent * months / MONTHS_PER_YEAR,
        None => monthly_rent * assumptions.vacancy_rate / 100.0,
    };

    let manual = &assumptions.expense_overrides;
    let (property_tax, tax_set) = pick(
        price * assumptions.property_tax_rate / 100.0 / MONTHS_PER_YEAR,
        manual.property_tax,
    );
    let (insurance, insurance_set) = pick(
        price * assumptions.insurance_rate / 100.0 / MONTHS_PER_YEAR,
        manual.insurance,
    );
    let (management, management_set) = pick(
        monthly_rent * assumptions.management_fee_pct / 100.0,
        manual.management,
    );
    let (maintenance, maintenance_set) = pick(
        monthly_rent * assumptions.maintenance_rate / 100.0,
        manual.maintenance,
    );
    let (capital_reserves, reserves_set) = pick(
        monthly_rent * assumptions.capital_reserves_rate / 100.0,
        manual.capital_reserves,
    );
    let (vacancy, vacancy_set) = pick(vacancy_estimate, manual.vacancy);

    (
        MonthlyCosts {
            property_tax,
            insurance,
            management,
            maintenance,
            capital_reserves,
            vacancy,
        },
        OverriddenCosts {
            property_tax: tax_set,
            insurance: insurance_set,
            management: management_set,
            maintenance: maintenance_set,
            capital_reserves: reserves_set,
            vacancy: vacancy_set,
        },
    )
}

/// Derives the full metric set for one property under one set of
/// assumptions. Nothing is produced when the input fails validation.
pub fn compute(
    input: &PropertyInput,
    assumptions: &AssumptionSet,
) -> Result<MetricsResult, CalcError> {
    let price = validate(input, assumptions)?;

    let down_payment = price * assumptions.down_payment_pct / 100.0;
    let loan_amount = price - down_payment;
    let monthly_payment = mortgage::monthly_payment(
        loan_amount,
        assumptions.interest_rate,
        assumptions.loan_term_years,
    );

    let monthly_rent = estimate_rent(price, assumptions);
    let (costs, overridden) = monthly_costs(price, monthly_rent, assumptions);
    let operating = costs.total();

    let monthly_cash_flow = monthly_rent - monthly_payment - operating;
    let annual_cash_flow = monthly_cash_flow * 12.0;

    let annual_noi = monthly_rent * 12.0 - operating * 12.0;
    let cap_rate = annual_noi / price * 100.0;

    let total_upfront_cost = down_payment + price * assumptions.closing_costs_pct / 100.0;
    let cash_on_cash = match Metric::ratio(annual_cash_flow, total_upfront_cost) {
        Metric::Value(v) => Metric::Value(v * 100.0),
        na => na,
    };

    let break_even_rent = monthly_payment
        + costs.property_tax
        + costs.insurance
        + costs.management
        + costs.maintenance
        + costs.capital_reserves
        + costs.vacancy;

    let rent_to_price = monthly_rent / price * 100.0;

    let appreciation = price * assumptions.appreciation_rate / 100.0;
    let total_roi = match Metric::ratio(annual_cash_flow + appreciation, total_upfront_cost) {
        Metric::Value(v) => Metric::Value(v * 100.0),
        na => na,
    };

    let payback_period = if monthly_cash_flow > 0.0 && total_upfront_cost > 0.0 {
        Metric::ratio(total_upfront_cost, annual_cash_flow)
    } else {
        Metric::NotApplicable
    };

    let principal_paid_year_one = mortgage::principal_paid(
        loan_amount,
        assumptions.interest_rate,
        assumptions.loan_term_years,
        12,
    );

    debug!(
        "Computed metrics for price {}: rent {:.2}, payment {:.2}, cash flow {:.2}",
        price, monthly_rent, monthly_payment, monthly_cash_flow
    );

    Ok(MetricsResult {
        monthly_rent,
        monthly_payment,
        monthly_cash_flow,
        cap_rate,
        cash_on_cash,
        break_even_rent,
        rent_to_price,
        total_roi,
        payback_period,
        breakdown: Breakdown {
            down_payment,
            loan_amount,
            total_upfront_cost,
            annual_noi,
            principal_paid_year_one,
            costs,
            overridden,
        },
    })
}

pub fn recommend(metrics: &MetricsResult) -> Recommendation {
    let cash_on_cash = match metrics.cash_on_cash.value() {
        Some(v) => v,
        None => return Recommendation::DontBuy,
    };
    TIERS
        .iter()
        .find(|tier| {
            metrics.cap_rate >= tier.cap_rate
                && cash_on_cash >= tier.cash_on_cash
                && metrics.monthly_cash_flow >= tier.cash_flow
        })
        .map(|tier| tier.recommendation)
        .unwrap_or(Recommendation::DontBuy)
}

pub fn target_gap(metrics: &MetricsResult, price: f64) -> TargetGap {
    TargetGap {
        needed_cash_flow: (BUY_CASH_FLOW - metrics.monthly_cash_flow).max(0.0),
        needed_cap_rate: (BUY_CAP_RATE - metrics.cap_rate).max(0.0),
        rent_for_cash_flow: metrics.break_even_rent + BUY_CASH_FLOW,
        rent_for_cap_rate: BUY_CAP_RATE / 100.0 * price / 12.0,
    }
}
