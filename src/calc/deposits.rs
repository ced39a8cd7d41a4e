// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::amortization::add_months;
use super::falls_in_month;
use crate::models::FixedDeposit;

/// Deposits maturing within this many days are flagged as nearing maturity.
pub const NEARING_MATURITY_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DepositStatus {
    Active,
    #[serde(rename = "Nearing Maturity")]
    NearingMaturity,
    Matured,
}

impl DepositStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DepositStatus::Active => "Active",
            DepositStatus::NearingMaturity => "Nearing Maturity",
            DepositStatus::Matured => "Matured",
        }
    }
}

pub fn maturity_date(start: NaiveDate, tenure_months: u32) -> NaiveDate {
    add_months(start, tenure_months)
}

/// Simple interest, `P × (1 + rate/100 × months/12)`. Compounding frequency
/// and payout mode are not applied.
pub fn maturity_amount(principal: Decimal, rate_percent: Decimal, tenure_months: u32) -> Decimal {
    let years = Decimal::from(tenure_months) / Decimal::from(12);
    principal * (Decimal::ONE + rate_percent / Decimal::ONE_HUNDRED * years)
}

pub fn classify_status(maturity: NaiveDate, today: NaiveDate) -> DepositStatus {
    let days_until = (maturity - today).num_days();
    if days_until <= 0 {
        DepositStatus::Matured
    } else if days_until <= NEARING_MATURITY_DAYS {
        DepositStatus::NearingMaturity
    } else {
        DepositStatus::Active
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DepositView {
    pub maturity_date: NaiveDate,
    pub maturity_amount: Decimal,
    pub interest_earned: Decimal,
    pub status: DepositStatus,
}

pub fn evaluate(fd: &FixedDeposit, today: NaiveDate) -> DepositView {
    let maturity_date = maturity_date(fd.start_date, fd.tenure);
    let maturity_amount = maturity_amount(fd.principal_amount, fd.interest_rate, fd.tenure);
    DepositView {
        maturity_date,
        maturity_amount,
        interest_earned: maturity_amount - fd.principal_amount,
        status: classify_status(maturity_date, today),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DepositSummary {
    pub total_principal: Decimal,
    pub total_corpus: Decimal,
    /// Principal-weighted; zero when nothing is invested.
    pub average_rate: Decimal,
}

pub fn summarize(deposits: &[FixedDeposit]) -> DepositSummary {
    let mut total_principal = Decimal::ZERO;
    let mut total_corpus = Decimal::ZERO;
    let mut rate_x_principal = Decimal::ZERO;
    for fd in deposits {
        total_principal += fd.principal_amount;
        total_corpus += maturity_amount(fd.principal_amount, fd.interest_rate, fd.tenure);
        rate_x_principal += fd.interest_rate * fd.principal_amount;
    }
    let average_rate = if total_principal > Decimal::ZERO {
        rate_x_principal / total_principal
    } else {
        Decimal::ZERO
    };
    DepositSummary {
        total_principal,
        total_corpus,
        average_rate,
    }
}

/// Deposits maturing in the given calendar month, soonest first.
pub fn maturing_in_month(
    deposits: &[FixedDeposit],
    year: i32,
    month: u32,
) -> Vec<(&FixedDeposit, NaiveDate)> {
    let mut out: Vec<_> = deposits
        .iter()
        .map(|fd| (fd, maturity_date(fd.start_date, fd.tenure)))
        .filter(|(_, d)| falls_in_month(*d, year, month))
        .collect();
    out.sort_by_key(|(_, d)| *d);
    out
}
