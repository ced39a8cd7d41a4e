// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use chrono::{TimeZone, Utc};
use common::{leaf_matches, resource_matches, FakeBackend};
use finpulse::api::Backend;
use finpulse::calc::dashboard::expense_month_summary;
use finpulse::commands::expenses::{self, ExportFormat};
use finpulse::commands::Collection;
use finpulse::error::Error;
use finpulse::models::{Expense, ExpenseSource};
use rust_decimal::Decimal;
use serde_json::Value;
use tempfile::tempdir;

fn expense(day: u32, category: &str, amount: i64, note: &str) -> Expense {
    Expense {
        id: None,
        amount: Decimal::from(amount),
        category: category.into(),
        description: note.into(),
        transaction_date: Utc.with_ymd_and_hms(2025, 8, day, 9, 0, 0).unwrap(),
        source: ExpenseSource::Manual,
    }
}

fn august() -> Vec<Expense> {
    vec![
        expense(3, "Food", 300, "Groceries"),
        expense(3, "Transport", 100, "Metro card"),
        expense(9, "Food", 500, "Dinner out"),
        expense(20, "Bills", 100, "Phone"),
    ]
}

#[test]
fn month_summary_totals() {
    let mut all = august();
    let mut july = expense(1, "Food", 999, "Last month");
    july.transaction_date = Utc.with_ymd_and_hms(2025, 7, 31, 23, 0, 0).unwrap();
    all.push(july);

    let s = expense_month_summary(&all, 2025, 8);
    assert_eq!(s.total, Decimal::from(1000));
    assert_eq!(s.highest_amount, Decimal::from(500));
    assert_eq!(s.highest_description.as_deref(), Some("Dinner out"));
    // three distinct spending days
    assert_eq!(s.average_daily.round_dp(2), Decimal::new(33333, 2));
    assert_eq!(s.top_category.as_deref(), Some("Food"));
    assert_eq!(s.top_category_share, Decimal::from(80));
    assert_eq!(s.by_category.len(), 3);
}

#[test]
fn empty_month_is_all_zero() {
    let s = expense_month_summary(&august(), 2025, 9);
    assert_eq!(s.total, Decimal::ZERO);
    assert_eq!(s.average_daily, Decimal::ZERO);
    assert_eq!(s.top_category, None);
}

#[test]
fn add_marks_manual_and_validates_category() {
    let m = leaf_matches(&[
        "finpulse", "expense", "add", "--amount", "249.50", "--category", "food", "--date",
        "2025-08-14",
    ]);
    let e = expenses::expense_from_args(&m).unwrap();
    assert_eq!(e.category, "Food");
    assert_eq!(e.source, ExpenseSource::Manual);
    assert_eq!(e.transaction_date.date_naive().to_string(), "2025-08-14");

    let bad = leaf_matches(&["finpulse", "expense", "add", "--amount", "10", "--category", "Yachts"]);
    let err = expenses::expense_from_args(&bad).unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Validation(_))));
}

#[test]
fn sync_reports_server_message_and_refetches() {
    let api = FakeBackend::new();
    api.seed(&august());
    let mut list = Collection::<Expense>::new();
    let msg = expenses::sync_expenses(&api, &mut list).unwrap();
    assert_eq!(msg, "1 new expense synced");
    assert_eq!(list.items().len(), 5);
    assert!(list.items().iter().any(|e| e.source == ExpenseSource::Automated));
    assert_eq!(api.calls(), vec!["GET google/sync-expenses", "GET expenses"]);
}

#[test]
fn sync_unauthorized_hints_reconnect() {
    let api = FakeBackend::new();
    api.fail_next(401, "Google token expired");
    let mut list = Collection::<Expense>::new();
    let err = expenses::sync_expenses(&api, &mut list).unwrap_err();
    let text = format!("{:#}", err);
    assert!(text.contains("not connected"));
    assert!(text.contains("Google token expired"));
}

#[test]
fn export_csv_writes_header_and_rows_oldest_first() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("expenses.csv");
    let mut items = august();
    items.reverse();
    let n = expenses::export_expenses(&items, ExportFormat::Csv, &out).unwrap();
    assert_eq!(n, 4);

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["date", "category", "amount", "description", "source", "id"]
    );
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 4);
    assert_eq!(&rows[0][0], "2025-08-03");
    assert_eq!(&rows[3][3], "Phone");
}

#[test]
fn export_json_through_the_command() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("expenses.json");
    let out_str = out.to_string_lossy().to_string();

    let api = FakeBackend::new();
    api.seed(&august());
    let m = resource_matches(&[
        "finpulse", "expense", "export", "--format", "json", "--out", &out_str,
    ]);
    expenses::handle(&api, &m).unwrap();

    let data = std::fs::read_to_string(&out).unwrap();
    let v: Value = serde_json::from_str(&data).unwrap();
    let arr = v.as_array().unwrap();
    assert_eq!(arr.len(), 4);
    assert_eq!(arr[2]["description"], "Dinner out");
    assert_eq!(arr[2]["amount"].as_f64(), Some(500.0));
    assert_eq!(arr[0]["source"], "Manual");
}

#[test]
fn unknown_export_format_is_rejected_before_fetching() {
    let api = FakeBackend::new();
    let m = resource_matches(&[
        "finpulse", "expense", "export", "--format", "xlsx", "--out", "ignored.xlsx",
    ]);
    let err = expenses::handle(&api, &m).unwrap_err();
    assert!(err.to_string().contains("Unknown format"));
    assert!(api.calls().is_empty());
    assert!("CSV".parse::<ExportFormat>().is_ok());
}

#[test]
fn delete_refetches() {
    let api = FakeBackend::new();
    api.seed(&august());
    let m = resource_matches(&["finpulse", "expense", "rm", "--id", "id1"]);
    expenses::handle(&api, &m).unwrap();
    let left: Vec<Expense> = api.list().unwrap();
    assert_eq!(left.len(), 3);
}

#[test]
fn backend_dates_accept_date_only_and_timestamps() {
    let raw = serde_json::json!([
        {
            "_id": "e1",
            "amount": 10,
            "category": "Food",
            "transactionDate": "2025-03-04"
        },
        {
            "_id": "e2",
            "amount": 20,
            "category": "Bills",
            "transactionDate": "2025-03-05T18:45:00.000Z",
            "source": "Automated"
        }
    ]);
    let list: Vec<Expense> = serde_json::from_value(raw).unwrap();
    assert_eq!(
        list[0].transaction_date,
        Utc.with_ymd_and_hms(2025, 3, 4, 0, 0, 0).unwrap()
    );
    assert_eq!(list[0].source, ExpenseSource::Manual);
    assert_eq!(
        list[1].transaction_date,
        Utc.with_ymd_and_hms(2025, 3, 5, 18, 45, 0).unwrap()
    );

    let back = serde_json::to_value(&list[0]).unwrap();
    assert_eq!(back["transactionDate"], "2025-03-04T00:00:00.000Z");
}

#[test]
fn date_only_expense_counts_in_its_month() {
    let api = FakeBackend::new();
    api.seed(&august());
    api.seed_raw(
        "expenses",
        serde_json::json!({
            "amount": 40,
            "category": "Food",
            "description": "Tea",
            "transactionDate": "2025-08-21"
        }),
    );
    let mut list = Collection::<Expense>::new();
    let items = list.load(&api).unwrap();
    let s = expense_month_summary(items, 2025, 8);
    assert_eq!(s.total, Decimal::from(1040));
}
