// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure financial formulas shared by every view.
//!
//! Nothing in here touches the network, the session store or the clock:
//! callers pass `today` explicitly so results are reproducible.

pub mod amortization;
pub mod dashboard;
pub mod debts;
pub mod deposits;
pub mod goals;
pub mod prepayment;

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error(
        "Proposed EMI {installment:.2} does not cover the monthly interest of {interest:.2}; \
         increase the EMI or reduce the prepayment"
    )]
    InstallmentTooLow { installment: f64, interest: f64 },

    #[error("Invalid input '{param}': {message}")]
    InvalidInput { param: &'static str, message: String },
}

/// True when `date` lies in calendar month `month` (1-12) of `year`.
pub fn falls_in_month(date: NaiveDate, year: i32, month: u32) -> bool {
    date.year() == year && date.month() == month
}
