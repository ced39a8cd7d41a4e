// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{leaf_matches, resource_matches, ymd, FakeBackend};
use finpulse::api::Backend;
use finpulse::commands::{accounts, investments};
use finpulse::models::{BankAccount, Investment};
use rust_decimal::Decimal;

#[test]
fn account_add_normalizes_type_and_currency() {
    let m = leaf_matches(&[
        "finpulse", "account", "add", "--bank", "HDFC", "--type", "current", "--balance",
        "2500.75", "--currency", "usd",
    ]);
    let a = accounts::account_from_args(&m).unwrap();
    assert_eq!(a.account_type, "Current");
    assert_eq!(a.currency, "USD");
    assert_eq!(a.balance, Decimal::new(250075, 2));

    let bad = leaf_matches(&[
        "finpulse", "account", "add", "--bank", "HDFC", "--type", "Offshore", "--balance", "1",
    ]);
    assert!(accounts::account_from_args(&bad).is_err());
}

#[test]
fn account_edit_refetches_with_new_balance() {
    let api = FakeBackend::new();
    api.seed(&[BankAccount {
        id: None,
        bank_name: "SBI".into(),
        account_type: "Savings".into(),
        balance: Decimal::from(1_000),
        currency: "INR".into(),
    }]);
    let m = resource_matches(&["finpulse", "account", "edit", "--id", "id1", "--balance", "4200"]);
    accounts::handle(&api, &m).unwrap();
    assert_eq!(
        api.calls(),
        vec!["GET bankaccounts", "PUT bankaccounts/id1", "GET bankaccounts"]
    );
    let after: Vec<BankAccount> = api.list().unwrap();
    assert_eq!(after[0].balance, Decimal::from(4_200));
    assert_eq!(after[0].bank_name, "SBI");
}

#[test]
fn investment_add_uppercases_ticker() {
    let m = leaf_matches(&[
        "finpulse", "investment", "add", "--stock", "infy", "--quantity", "10", "--buy-price",
        "1500", "--market-price", "1650", "--purchase-date", "2024-11-05",
    ]);
    let inv = investments::investment_from_args(&m).unwrap();
    assert_eq!(inv.stock_name, "INFY");
    assert_eq!(inv.purchase_date, Some(ymd(2024, 11, 5)));
}

#[test]
fn holding_rows_carry_pl() {
    let rows = investments::holding_rows(&[Investment {
        id: Some("h1".into()),
        stock_name: "INFY".into(),
        quantity: Decimal::from(10),
        avg_buy_price: Decimal::from(1_500),
        current_market_price: Decimal::from(1_650),
        purchase_date: None,
    }]);
    assert_eq!(rows[0].id, "h1");
    assert_eq!(rows[0].invested, Decimal::from(15_000));
    assert_eq!(rows[0].current_value, Decimal::from(16_500));
    assert_eq!(rows[0].unrealized_pl, Decimal::from(1_500));
    assert_eq!(rows[0].pl_percent, Decimal::from(10));
}

#[test]
fn removing_unknown_holding_surfaces_backend_message() {
    let api = FakeBackend::new();
    let m = resource_matches(&["finpulse", "investment", "rm", "--id", "nope"]);
    let err = investments::handle(&api, &m).unwrap_err();
    assert!(format!("{:#}", err).contains("investments not found"));
}
