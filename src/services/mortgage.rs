// src/services/mortgage.rs

fn num_payments(term_years: u32) -> u32 {
    term_years * 12
}

fn monthly_rate(annual_rate_pct: f64) -> f64 {
    annual_rate_pct / 100.0 / 12.0
}

/// Fixed-rate amortizing payment. A zero rate spreads the principal evenly.
pub fn monthly_payment(loan_amount: f64, annual_rate_pct: f64, term_years: u32) -> f64 {
    if loan_amount <= 0.0 {
        return 0.0;
    }
    let n = num_payments(term_years);
    if n == 0 {
        // Nothing to amortize over; the whole balance is due.
        return loan_amount;
    }
    let r = monthly_rate(annual_rate_pct);
    if r == 0.0 {
        return loan_amount / n as f64;
    }
    // (1 + r)^n - 1, kept accurate when r is too small to register in 1 + r.
    let accrued = (n as f64 * r.ln_1p()).exp_m1();
    if accrued == 0.0 {
        return loan_amount / n as f64;
    }
    loan_amount * r * (accrued + 1.0) / accrued
}

/// Outstanding principal after `months_paid` scheduled payments.
pub fn remaining_balance(
    loan_amount: f64,
    annual_rate_pct: f64,
    term_years: u32,
    months_paid: u32,
) -> f64 {
    if loan_amount <= 0.0 {
        return 0.0;
    }
    let payment = monthly_payment(loan_amount, annual_rate_pct, term_years);
    let r = monthly_rate(annual_rate_pct);
    let months = months_paid.min(num_payments(term_years));

    let mut balance = loan_amount;
    for _ in 0..months {
        let interest = balance * r;
        balance -= payment - interest;
        if balance <= 0.0 {
            return 0.0;
        }
    }
    if months == num_payments(term_years) {
        // Absorb rounding drift on the final payment.
        return 0.0;
    }
    balance
}

pub fn principal_paid(
    loan_amount: f64,
    annual_rate_pct: f64,
    term_years: u32,
    months_paid: u32,
) -> f64 {
    if loan_amount <= 0.0 {
        return 0.0;
    }
    loan_amount - remaining_balance(loan_amount, annual_rate_pct, term_years, months_paid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn thirty_year_payment_matches_amortization_table() {
        let payment = monthly_payment(200_000.0, 5.0, 30);
        assert_relative_eq!(payment, 1073.64, epsilon = 0.01);
    }

    #[test]
    fn zero_rate_divides_principal_evenly() {
        assert_eq!(monthly_payment(180_000.0, 0.0, 15), 1000.0);
        assert_eq!(monthly_payment(0.0, 6.0, 30), 0.0);
    }

    #[test]
    fn tiny_rate_matches_even_split() {
        let payment = monthly_payment(200_000.0, 1e-13, 30);
        assert!(payment.is_finite());
        assert_relative_eq!(payment, 200_000.0 / 360.0, max_relative = 1e-9);
        let principal = principal_paid(200_000.0, 1e-13, 30, 12);
        assert_relative_eq!(principal, 200_000.0 / 30.0, max_relative = 1e-6);
    }

    #[test]
    fn balance_reaches_zero_at_term_end() {
        assert_eq!(remaining_balance(200_000.0, 5.0, 30, 360), 0.0);
        assert_eq!(remaining_balance(200_000.0, 5.0, 30, 500), 0.0);
        let halfway = remaining_balance(200_000.0, 5.0, 30, 180);
        assert!(halfway > 0.0 && halfway < 200_000.0);
    }

    #[test]
    fn first_year_principal_is_a_fraction_of_payments() {
        let payment = monthly_payment(200_000.0, 5.0, 30);
        let principal = principal_paid(200_000.0, 5.0, 30, 12);
        assert!(principal > 0.0);
        assert!(principal < payment * 12.0);
        // Roughly $2,950 of principal in year one of a 5% 30-year loan.
        assert_relative_eq!(principal, 2950.0, epsilon = 10.0);
    }

    #[test]
    fn zero_rate_principal_is_linear() {
        assert_relative_eq!(principal_paid(180_000.0, 0.0, 15, 12), 12_000.0, epsilon = 1e-6);
    }
}
