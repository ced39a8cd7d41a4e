// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::ArgMatches;
use rust_decimal::Decimal;

use super::{output_flags, Collection};
use crate::api::Backend;
use crate::calc::dashboard::{build, Collections, DashboardSummary};
use crate::models::{
    BankAccount, Debt, Expense, FixedDeposit, Investment, Loan, SavingsGoal, ServerDashboard,
};
use crate::utils::{fmt_money, maybe_print_json, pretty_table, today};

pub fn handle<B: Backend>(api: &B, m: &ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(m);
    if m.get_flag("server") {
        let server = fetch_server_summary(api)?;
        if !maybe_print_json(json_flag, jsonl_flag, &server)? {
            print_server(&server);
        }
        return Ok(());
    }
    let summary = local_summary(api, today())?;
    if !maybe_print_json(json_flag, jsonl_flag, &summary)? {
        print_local(&summary);
    }
    Ok(())
}

fn fetch<B: Backend, T: crate::api::Resource + Clone>(api: &B) -> Result<Vec<T>> {
    let mut c = Collection::<T>::new();
    let items = c
        .load(api)
        .with_context(|| format!("Failed to fetch {}", T::COLLECTION))?;
    Ok(items.to_vec())
}

/// Fetches every collection and folds them into one summary.
pub fn local_summary<B: Backend>(api: &B, today: NaiveDate) -> Result<DashboardSummary> {
    let collections = Collections {
        accounts: fetch::<B, BankAccount>(api)?,
        investments: fetch::<B, Investment>(api)?,
        deposits: fetch::<B, FixedDeposit>(api)?,
        loans: fetch::<B, Loan>(api)?,
        debts: fetch::<B, Debt>(api)?,
        expenses: fetch::<B, Expense>(api)?,
        goals: fetch::<B, SavingsGoal>(api)?,
    };
    Ok(build(&collections, today))
}

pub fn fetch_server_summary<B: Backend>(api: &B) -> Result<ServerDashboard> {
    let v = api
        .get_json("dashboard/summary")
        .context("Failed to fetch dashboard summary")?;
    Ok(serde_json::from_value(v)?)
}

fn print_breakdown(title: &str, map: &BTreeMap<String, Decimal>) {
    if map.is_empty() {
        return;
    }
    let rows: Vec<Vec<String>> = map
        .iter()
        .map(|(k, v)| vec![k.clone(), fmt_money(v)])
        .collect();
    println!("{}", pretty_table(&[title, "Amount"], rows));
}

fn print_local(s: &DashboardSummary) {
    let rows = vec![
        vec!["Net worth".to_string(), fmt_money(&s.net_worth)],
        vec!["Bank balance".into(), fmt_money(&s.total_bank_balance)],
        vec!["Investments".into(), fmt_money(&s.total_investment_value)],
        vec!["Fixed deposits".into(), fmt_money(&s.total_fd_principal)],
        vec!["Outstanding loans".into(), fmt_money(&s.total_outstanding_loans)],
        vec!["Monthly EMI outflow".into(), fmt_money(&s.total_monthly_emi_outflow)],
        vec!["Spent this month".into(), fmt_money(&s.total_monthly_expense)],
        vec!["Goals saved".into(), fmt_money(&s.total_savings_current_saved)],
        vec!["Goals target".into(), fmt_money(&s.total_savings_target_amount)],
        vec!["I owe".into(), fmt_money(&s.total_i_owe)],
        vec!["Owed to me".into(), fmt_money(&s.total_owed_to_me)],
    ];
    println!("{}", pretty_table(&["Metric", "Value"], rows));
    print_breakdown("Expense category", &s.charts.expense_category_breakdown);
    print_breakdown("Stock", &s.charts.investment_distribution);
    print_breakdown("Bank", &s.charts.bank_balance_distribution);
    print_breakdown("FD bank", &s.charts.fd_principal_distribution);
    print_breakdown("Loan type", &s.charts.loan_type_outstanding);
}

fn print_server(d: &ServerDashboard) {
    let cell = |v: &Option<Decimal>| v.as_ref().map(fmt_money).unwrap_or_else(|| "-".into());
    let s = &d.summary;
    let rows = vec![
        vec!["Net worth".to_string(), cell(&s.net_worth)],
        vec!["Bank balance".into(), cell(&s.total_bank_balance)],
        vec!["Investments".into(), cell(&s.total_investment_value)],
        vec!["Fixed deposits".into(), cell(&s.total_fd_principal)],
        vec!["Outstanding loans".into(), cell(&s.total_outstanding_loans)],
        vec!["Monthly EMI outflow".into(), cell(&s.total_monthly_emi_outflow)],
        vec!["Spent this month".into(), cell(&s.total_monthly_expense)],
        vec!["Goals saved".into(), cell(&s.total_savings_current_saved)],
        vec!["Goals target".into(), cell(&s.total_savings_target_amount)],
        vec!["I owe".into(), cell(&s.total_i_owe)],
        vec!["Owed to me".into(), cell(&s.total_owed_to_me)],
    ];
    println!("{}", pretty_table(&["Metric", "Value"], rows));
    let c = &d.charts_data;
    print_breakdown("Expense category", &c.expense_category_breakdown);
    print_breakdown("Stock", &c.investment_distribution);
    print_breakdown("Bank", &c.bank_balance_distribution);
    print_breakdown("FD bank", &c.fd_principal_distribution);
    print_breakdown("Loan type", &c.loan_type_outstanding);
}
