// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

/// Equal monthly installment for a fresh loan.
///
/// Out-of-range inputs (non-positive principal, negative rate, zero tenure)
/// yield `0.0` rather than an error, and so does a formula that degenerates
/// to NaN. A zero rate repays the principal in straight-line installments.
pub fn compute_emi(principal: f64, annual_rate_percent: f64, tenure_months: u32) -> f64 {
    let valid = principal > 0.0 && annual_rate_percent >= 0.0 && tenure_months > 0;
    if !valid {
        return 0.0;
    }
    let n = f64::from(tenure_months);
    if annual_rate_percent == 0.0 {
        return principal / n;
    }
    let r = annual_rate_percent / 1200.0;
    let growth = (1.0 + r).powf(n);
    let emi = principal * r * growth / (growth - 1.0);
    if emi.is_nan() { 0.0 } else { emi }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InstallmentSplit {
    pub principal_portion: f64,
    pub interest_portion: f64,
}

/// Splits one installment into the interest accrued this month on
/// `remaining` and whatever is left over for principal.
///
/// Both portions are floored at zero. An installment smaller than the
/// accrued interest leaves `principal_portion == 0` and the shortfall is
/// dropped, not capitalized onto the balance.
pub fn split_installment(remaining: f64, annual_rate_percent: f64, installment: f64) -> InstallmentSplit {
    let interest = (remaining * (annual_rate_percent / 1200.0)).max(0.0);
    let principal = (installment - interest).max(0.0);
    InstallmentSplit {
        principal_portion: principal,
        interest_portion: interest,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScheduleRow {
    pub month: u32,
    pub installment: f64,
    pub principal_portion: f64,
    pub interest_portion: f64,
    pub balance: f64,
}

/// Month-by-month amortization table for a loan repaid with its computed EMI.
/// Stops early once the balance is cleared.
pub fn schedule(principal: f64, annual_rate_percent: f64, tenure_months: u32) -> Vec<ScheduleRow> {
    let emi = compute_emi(principal, annual_rate_percent, tenure_months);
    if emi == 0.0 {
        return Vec::new();
    }
    let mut balance = principal;
    let mut rows = Vec::with_capacity(tenure_months as usize);
    for month in 1..=tenure_months {
        let split = split_installment(balance, annual_rate_percent, emi);
        // rounding residue on the last row
        let principal_portion = if month == tenure_months {
            balance
        } else {
            split.principal_portion.min(balance)
        };
        balance = (balance - principal_portion).max(0.0);
        rows.push(ScheduleRow {
            month,
            installment: principal_portion + split.interest_portion,
            principal_portion,
            interest_portion: split.interest_portion,
            balance,
        });
        if balance == 0.0 {
            break;
        }
    }
    rows
}

/// Calendar-month addition that keeps the day of month and lets overflow roll
/// into the following month (Jan 31 + 1 month = Mar 3 in a non-leap year).
/// Saturates at `NaiveDate::MAX`.
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(months)))
        .and_then(|first| first.checked_add_days(Days::new(u64::from(date.day() - 1))))
        .unwrap_or(NaiveDate::MAX)
}

pub fn projected_end_date(start: NaiveDate, tenure_months: u32) -> NaiveDate {
    add_months(start, tenure_months)
}

/// Percentage of the original amount already repaid.
pub fn repayment_progress(total: Decimal, remaining: Decimal) -> Decimal {
    if total <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (total - remaining) / total * Decimal::ONE_HUNDRED
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn add_months_rolls_over_short_months() {
        assert_eq!(add_months(ymd(2025, 1, 31), 1), ymd(2025, 3, 3));
        assert_eq!(add_months(ymd(2024, 1, 31), 1), ymd(2024, 3, 2));
        assert_eq!(add_months(ymd(2025, 11, 15), 3), ymd(2026, 2, 15));
        assert_eq!(add_months(ymd(2025, 6, 1), 0), ymd(2025, 6, 1));
    }

    #[test]
    fn schedule_clears_balance_on_last_row() {
        let rows = schedule(50_000.0, 9.5, 24);
        assert_eq!(rows.len(), 24);
        assert_eq!(rows.last().unwrap().balance, 0.0);
        let paid: f64 = rows.iter().map(|r| r.principal_portion).sum();
        assert!((paid - 50_000.0).abs() < 1e-6);
    }

    #[test]
    fn schedule_empty_for_invalid_loan() {
        assert!(schedule(0.0, 10.0, 12).is_empty());
        assert!(schedule(1000.0, 10.0, 0).is_empty());
    }

    #[test]
    fn repayment_progress_handles_zero_total() {
        assert_eq!(repayment_progress(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
        assert_eq!(
            repayment_progress(Decimal::from(200), Decimal::from(50)),
            Decimal::from(75)
        );
    }
}
