// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{leaf_matches, ymd};
use finpulse::calc::deposits::{maturing_in_month, summarize};
use finpulse::commands::deposits;
use finpulse::models::{CompoundingFrequency, FixedDeposit, InterestPayout};
use rust_decimal::Decimal;

fn fd(bank: &str, principal: i64, rate: Decimal, start: (i32, u32, u32), months: u32) -> FixedDeposit {
    FixedDeposit {
        id: None,
        bank_name: bank.into(),
        principal_amount: Decimal::from(principal),
        interest_rate: rate,
        start_date: ymd(start.0, start.1, start.2),
        tenure: months,
        fd_account_number: None,
        compounding_frequency: CompoundingFrequency::Quarterly,
        interest_payout: InterestPayout::Cumulative,
    }
}

#[test]
fn rows_carry_maturity_and_status() {
    let today = ymd(2025, 6, 15);
    let list = vec![
        fd("SBI", 1000, Decimal::from(10), (2024, 6, 15), 12),
        fd("HDFC", 2000, Decimal::from(7), (2025, 1, 1), 6),
        fd("ICICI", 5000, Decimal::from(6), (2025, 1, 1), 24),
    ];
    let rows = deposits::deposit_rows(&list, today);
    assert_eq!(rows[0].maturity_amount, Decimal::from(1100));
    assert_eq!(rows[0].interest_earned, Decimal::from(100));
    assert_eq!(rows[0].status, "Matured");
    assert_eq!(rows[1].maturity_date, ymd(2025, 7, 1));
    assert_eq!(rows[1].status, "Nearing Maturity");
    assert_eq!(rows[2].status, "Active");
}

#[test]
fn summary_weights_rate_by_principal() {
    let list = vec![
        fd("SBI", 1000, Decimal::from(10), (2024, 6, 15), 12),
        fd("HDFC", 3000, Decimal::from(6), (2025, 1, 1), 12),
    ];
    let s = summarize(&list);
    assert_eq!(s.total_principal, Decimal::from(4000));
    assert_eq!(s.total_corpus, Decimal::from(4280));
    assert_eq!(s.average_rate, Decimal::from(7));
    assert_eq!(summarize(&[]).average_rate, Decimal::ZERO);
}

#[test]
fn calendar_lists_month_maturities_in_order() {
    let list = vec![
        fd("A", 1000, Decimal::from(7), (2025, 1, 20), 6),
        fd("B", 1000, Decimal::from(7), (2024, 7, 2), 12),
        fd("C", 1000, Decimal::from(7), (2025, 2, 1), 6),
    ];
    let due = maturing_in_month(&list, 2025, 7);
    let banks: Vec<&str> = due.iter().map(|(f, _)| f.bank_name.as_str()).collect();
    assert_eq!(banks, vec!["B", "A"]);
    assert_eq!(due[1].1, ymd(2025, 7, 20));
}

#[test]
fn add_parses_frequency_labels() {
    let m = leaf_matches(&[
        "finpulse", "fd", "add", "--bank", "SBI", "--principal", "100000", "--rate", "7.1",
        "--start", "2025-04-01", "--tenure", "36", "--compounding", "half-yearly", "--payout",
        "periodic",
    ]);
    let d = deposits::deposit_from_args(&m).unwrap();
    assert_eq!(d.compounding_frequency, CompoundingFrequency::HalfYearly);
    assert_eq!(d.interest_payout, InterestPayout::Periodic);
    let json = serde_json::to_value(&d).unwrap();
    assert_eq!(json["compoundingFrequency"], "Half-Yearly");
    assert_eq!(json["startDate"], "2025-04-01");
    assert!(json.get("_id").is_none());
}

#[test]
fn zero_principal_is_rejected() {
    let m = leaf_matches(&[
        "finpulse", "fd", "add", "--bank", "SBI", "--principal", "0", "--rate", "7",
        "--start", "2025-04-01", "--tenure", "12",
    ]);
    assert!(deposits::deposit_from_args(&m).is_err());
}
