// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use serde::Serialize;

use super::CalcError;
use super::amortization::add_months;

/// Remaining payoff horizon for a loan at a given installment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Tenure {
    Months(f64),
    /// The installment never outpaces the interest.
    Never,
}

/// Solves `n = ln(E / (E - P·r)) / ln(1 + r)` for the months needed to clear
/// `remaining` at `installment`, with `monthly_rate` as a fraction (0.01 = 1%).
pub fn project_new_tenure(remaining: f64, monthly_rate: f64, installment: f64) -> Tenure {
    let interest = remaining * monthly_rate;
    if installment <= interest {
        return Tenure::Never;
    }
    if remaining <= 0.0 {
        return Tenure::Months(0.0);
    }
    if monthly_rate == 0.0 {
        return Tenure::Months(remaining / installment);
    }
    let n = (installment / (installment - interest)).ln() / (1.0 + monthly_rate).ln();
    if n.is_finite() { Tenure::Months(n) } else { Tenure::Never }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrepaymentInput {
    pub remaining: f64,
    pub current_emi: f64,
    pub annual_rate_percent: f64,
    /// Original full tenure; only feeds the "old interest" estimate.
    pub tenure_months: u32,
    pub next_due_date: NaiveDate,
    /// Lump sum applied to principal before re-projecting.
    pub lump_sum: f64,
    /// Replacement installment; the current EMI is kept when absent.
    pub new_emi: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrepaymentOutcome {
    pub new_remaining: f64,
    pub installment: f64,
    pub new_tenure_months: f64,
    pub projected_end_date: NaiveDate,
    /// Approximation: both sides are `installment × months − principal`,
    /// the old side over the original full tenure.
    pub interest_saved: f64,
}

impl PrepaymentOutcome {
    pub fn whole_months(&self) -> u32 {
        self.new_tenure_months.floor() as u32
    }

    pub fn years(&self) -> f64 {
        self.new_tenure_months / 12.0
    }
}

fn naive_interest(principal: f64, installment: f64, months: f64) -> f64 {
    installment * months - principal
}

pub fn reproject(input: &PrepaymentInput) -> Result<PrepaymentOutcome, CalcError> {
    if input.lump_sum.is_nan() || input.lump_sum < 0.0 {
        return Err(CalcError::InvalidInput {
            param: "prepayment",
            message: "must be zero or a positive amount".into(),
        });
    }
    let installment = input.new_emi.unwrap_or(input.current_emi);
    if installment.is_nan() || installment <= 0.0 {
        return Err(CalcError::InvalidInput {
            param: "emi",
            message: "must be a positive amount".into(),
        });
    }

    let new_remaining = (input.remaining - input.lump_sum).max(0.0);
    let monthly_rate = input.annual_rate_percent / 1200.0;
    let months = match project_new_tenure(new_remaining, monthly_rate, installment) {
        Tenure::Months(m) => m,
        Tenure::Never => {
            return Err(CalcError::InstallmentTooLow {
                installment,
                interest: new_remaining * monthly_rate,
            });
        }
    };

    let old_interest = naive_interest(
        input.remaining,
        input.current_emi,
        f64::from(input.tenure_months),
    );
    let new_interest = naive_interest(new_remaining, installment, months);

    Ok(PrepaymentOutcome {
        new_remaining,
        installment,
        new_tenure_months: months,
        projected_end_date: add_months(input.next_due_date, months.ceil() as u32),
        interest_saved: old_interest - new_interest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rate_tenure_is_linear() {
        assert_eq!(project_new_tenure(1200.0, 0.0, 100.0), Tenure::Months(12.0));
    }

    #[test]
    fn installment_equal_to_interest_never_pays_off() {
        assert_eq!(project_new_tenure(10_000.0, 0.01, 100.0), Tenure::Never);
        assert_eq!(project_new_tenure(10_000.0, 0.01, 50.0), Tenure::Never);
    }

    #[test]
    fn lump_sum_larger_than_balance_clears_loan() {
        let input = PrepaymentInput {
            remaining: 5_000.0,
            current_emi: 1_000.0,
            annual_rate_percent: 12.0,
            tenure_months: 6,
            next_due_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            lump_sum: 9_000.0,
            new_emi: None,
        };
        let out = reproject(&input).unwrap();
        assert_eq!(out.new_remaining, 0.0);
        assert_eq!(out.new_tenure_months, 0.0);
        assert_eq!(out.projected_end_date, input.next_due_date);
    }
}
