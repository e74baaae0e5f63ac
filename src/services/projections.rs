// src/services/projections.rs
use log::{debug, warn};

use crate::error::CalcError;
use crate::models::{AssumptionSet, Metric, ProjectionYear, PropertyInput, SaleScenario};
use crate::services::calculations::{compute, MAX_LOAN_TERM_YEARS};
use crate::services::mortgage;

pub const AGENT_FEE_PCT: f64 = 6.0;
pub const SELLER_CLOSING_PCT: f64 = 2.0;

const IRR_LOW: f64 = -0.99;
const IRR_HIGH: f64 = 10.0;
const IRR_TOLERANCE: f64 = 1e-10;
const IRR_MAX_ITERATIONS: usize = 200;

fn check_horizon(years: u32) -> Result<(), CalcError> {
    if years == 0 || years > MAX_LOAN_TERM_YEARS {
        return Err(CalcError::invalid(
            "years",
            format!("must be between 1 and {}", MAX_LOAN_TERM_YEARS),
        ));
    }
    Ok(())
}

fn grow(base: f64, rate_pct: f64, years: u32) -> f64 {
    base * (1.0 + rate_pct / 100.0).powi(years as i32)
}

/// Year-by-year property value, rent and principal-paydown equity.
pub fn project(
    input: &PropertyInput,
    assumptions: &AssumptionSet,
    years: u32,
    rent_growth_pct: f64,
) -> Result<Vec<ProjectionYear>, CalcError> {
    check_horizon(years)?;
    if !(rent_growth_pct > -100.0 && rent_growth_pct <= 100.0) {
        return Err(CalcError::invalid(
            "rentGrowthPct",
            "must be above -100 and at most 100",
        ));
    }
    let metrics = compute(input, assumptions)?;
    let price = input.price.unwrap_or_default();
    let loan = metrics.breakdown.loan_amount;

    let rows = (1..=years)
        .map(|year| ProjectionYear {
            year,
            property_value: grow(price, assumptions.appreciation_rate, year),
            monthly_rent: grow(metrics.monthly_rent, rent_growth_pct, year),
            equity_from_principal: mortgage::principal_paid(
                loan,
                assumptions.interest_rate,
                assumptions.loan_term_years,
                year * 12,
            ),
        })
        .collect();
    Ok(rows)
}

/// Outcome of selling after `hold_years`, net of selling costs and the
/// outstanding loan.
pub fn sale_scenario(
    input: &PropertyInput,
    assumptions: &AssumptionSet,
    hold_years: u32,
) -> Result<SaleScenario, CalcError> {
    check_horizon(hold_years)?;
    let metrics = compute(input, assumptions)?;
    let price = input.price.unwrap_or_default();

    let projected_sale_price = grow(price, assumptions.appreciation_rate, hold_years);
    let agent_fees = projected_sale_price * AGENT_FEE_PCT / 100.0;
    let closing_costs = projected_sale_price * SELLER_CLOSING_PCT / 100.0;
    let remaining_loan = mortgage::remaining_balance(
        metrics.breakdown.loan_amount,
        assumptions.interest_rate,
        assumptions.loan_term_years,
        hold_years * 12,
    );
    let net_sale_proceeds = projected_sale_price - agent_fees - closing_costs - remaining_loan;
    let total_cash_flow = metrics.monthly_cash_flow * 12.0 * hold_years as f64;
    let invested = metrics.breakdown.total_upfront_cost;
    let total_profit = net_sale_proceeds + total_cash_flow - invested;

    let total_roi = match Metric::ratio(total_profit, invested) {
        Metric::Value(v) => Metric::Value(v * 100.0),
        na => na,
    };

    debug!(
        "Sale after {} years: price {:.2}, net proceeds {:.2}, profit {:.2}",
        hold_years, projected_sale_price, net_sale_proceeds, total_profit
    );

    Ok(SaleScenario {
        hold_years,
        projected_sale_price,
        agent_fees,
        closing_costs,
        remaining_loan,
        net_sale_proceeds,
        total_cash_flow,
        total_profit,
        total_roi,
    })
}

/// Yearly flows for a hold: the upfront outlay, then annual cash flow, with
/// the net sale proceeds landing in the final year.
pub fn hold_cash_flows(total_upfront_cost: f64, annual_cash_flow: f64, sale: &SaleScenario) -> Vec<f64> {
    let mut flows = Vec::with_capacity(sale.hold_years as usize + 1);
    flows.push(-total_upfront_cost);
    flows.extend(std::iter::repeat(annual_cash_flow).take(sale.hold_years as usize));
    if let Some(last) = flows.last_mut() {
        *last += sale.net_sale_proceeds;
    }
    flows
}

pub fn npv(rate_pct: f64, flows: &[f64]) -> f64 {
    let rate = rate_pct / 100.0;
    flows
        .iter()
        .enumerate()
        .map(|(t, cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

/// Internal rate of return as a percentage, found by bisection.
pub fn irr(flows: &[f64]) -> Metric {
    let f = |rate: f64| npv(rate * 100.0, flows);

    let mut low = IRR_LOW;
    let mut high = IRR_HIGH;
    let mut f_low = f(low);
    let f_high = f(high);
    if !f_low.is_finite() || !f_high.is_finite() || f_low.signum() == f_high.signum() {
        warn!("IRR has no sign change on [{}, {}]", IRR_LOW, IRR_HIGH);
        return Metric::NotApplicable;
    }

    for _ in 0..IRR_MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        let f_mid = f(mid);
        if f_mid.abs() < IRR_TOLERANCE || (high - low) / 2.0 < IRR_TOLERANCE {
            return Metric::from_f64(mid * 100.0);
        }
        if f_mid.signum() == f_low.signum() {
            low = mid;
            f_low = f_mid;
        } else {
            high = mid;
        }
    }
    Metric::from_f64((low + high) / 2.0 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rental() -> (PropertyInput, AssumptionSet) {
        let set = AssumptionSet {
            monthly_rent_override: Some(2_600.0),
            ..AssumptionSet::default()
        };
        (PropertyInput::with_price(250_000.0), set)
    }

    #[test]
    fn flat_rent_growth_keeps_rent_constant() {
        let (input, set) = rental();
        let rows = project(&input, &set, 5, 0.0).unwrap();
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|r| r.monthly_rent == 2_600.0));
    }

    #[test]
    fn value_grows_geometrically_and_equity_accumulates() {
        let (input, set) = rental();
        let rows = project(&input, &set, 10, 2.0).unwrap();
        assert_relative_eq!(rows[0].property_value, 257_500.0, epsilon = 1e-6);
        assert_relative_eq!(rows[9].property_value, 250_000.0 * 1.03f64.powi(10), epsilon = 1e-6);
        assert!(rows.windows(2).all(|w| w[1].equity_from_principal > w[0].equity_from_principal));
    }

    #[test]
    fn projection_rejects_bad_horizon() {
        let (input, set) = rental();
        assert_eq!(project(&input, &set, 0, 2.0).unwrap_err().field(), "years");
        assert_eq!(project(&input, &set, 5, f64::NAN).unwrap_err().field(), "rentGrowthPct");
        assert_eq!(project(&input, &set, 5, 1e300).unwrap_err().field(), "rentGrowthPct");
        assert_eq!(project(&input, &set, 5, -100.0).unwrap_err().field(), "rentGrowthPct");
    }

    #[test]
    fn steepest_allowed_growth_stays_finite() {
        let (input, set) = rental();
        let rows = project(&input, &set, 50, 100.0).unwrap();
        assert!(rows.iter().all(|r| r.monthly_rent.is_finite()));
    }

    #[test]
    fn sale_nets_out_fees_and_loan() {
        let (input, set) = rental();
        let sale = sale_scenario(&input, &set, 10).unwrap();
        let gross = sale.projected_sale_price;
        assert_relative_eq!(sale.agent_fees, gross * 0.06, max_relative = 1e-12);
        assert_relative_eq!(sale.closing_costs, gross * 0.02, max_relative = 1e-12);
        assert_relative_eq!(
            sale.net_sale_proceeds,
            gross - sale.agent_fees - sale.closing_costs - sale.remaining_loan,
            max_relative = 1e-12
        );
        assert!(sale.remaining_loan > 0.0 && sale.remaining_loan < 200_000.0);
    }

    #[test]
    fn sale_after_full_term_owes_nothing() {
        let (input, set) = rental();
        let sale = sale_scenario(&input, &set, 30).unwrap();
        assert_eq!(sale.remaining_loan, 0.0);
    }

    #[test]
    fn npv_at_zero_is_sum_of_flows() {
        let flows = [-1000.0, 300.0, 400.0, 500.0];
        assert_relative_eq!(npv(0.0, &flows), 200.0, epsilon = 1e-9);
    }

    #[test]
    fn irr_of_single_period_gain() {
        let rate = irr(&[-100.0, 110.0]).value().unwrap();
        assert_relative_eq!(rate, 10.0, epsilon = 1e-6);
    }

    #[test]
    fn irr_without_sign_change_is_not_applicable() {
        assert_eq!(irr(&[100.0, 50.0]), Metric::NotApplicable);
    }

    #[test]
    fn hold_flows_put_sale_in_final_year() {
        let (input, set) = rental();
        let sale = sale_scenario(&input, &set, 3).unwrap();
        let flows = hold_cash_flows(57_500.0, 1_000.0, &sale);
        assert_eq!(flows.len(), 4);
        assert_eq!(flows[0], -57_500.0);
        assert_eq!(flows[1], 1_000.0);
        assert_relative_eq!(flows[3], 1_000.0 + sale.net_sale_proceeds);
    }
}
