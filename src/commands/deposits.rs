// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::ArgMatches;
use rust_decimal::Decimal;
use serde::Serialize;

use super::{opt_arg, output_flags, req_arg, Collection};
use crate::api::Backend;
use crate::calc::deposits::{evaluate, maturing_in_month, summarize};
use crate::error::Error;
use crate::models::{CompoundingFrequency, FixedDeposit, InterestPayout};
use crate::utils::{
    fmt_money, fmt_percent, maybe_print_json, parse_date, parse_month, parse_non_negative,
    parse_positive, pretty_table, today,
};

pub fn handle<B: Backend>(api: &B, m: &ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(api, sub)?,
        Some(("add", sub)) => add(api, sub)?,
        Some(("edit", sub)) => edit(api, sub)?,
        Some(("rm", sub)) => rm(api, sub)?,
        Some(("calendar", sub)) => calendar(api, sub)?,
        _ => {}
    }
    Ok(())
}

fn parse_tenure(sub: &ArgMatches) -> Result<Option<u32>> {
    match sub.get_one::<u32>("tenure").copied() {
        Some(0) => Err(Error::validation("tenure must be at least 1 month").into()),
        t => Ok(t),
    }
}

fn parse_compounding(s: &str) -> Result<CompoundingFrequency> {
    s.parse().map_err(|e: String| Error::validation(e).into())
}

fn parse_payout(s: &str) -> Result<InterestPayout> {
    s.parse().map_err(|e: String| Error::validation(e).into())
}

pub fn deposit_from_args(sub: &ArgMatches) -> Result<FixedDeposit> {
    Ok(FixedDeposit {
        id: None,
        bank_name: req_arg(sub, "bank")?,
        principal_amount: parse_positive("principal", &req_arg(sub, "principal")?)?,
        interest_rate: parse_non_negative("rate", &req_arg(sub, "rate")?)?,
        start_date: parse_date(&req_arg(sub, "start")?)?,
        tenure: parse_tenure(sub)?.ok_or_else(|| Error::validation("--tenure is required"))?,
        fd_account_number: opt_arg(sub, "account-number"),
        compounding_frequency: opt_arg(sub, "compounding")
            .map(|s| parse_compounding(&s))
            .transpose()?
            .unwrap_or_default(),
        interest_payout: opt_arg(sub, "payout")
            .map(|s| parse_payout(&s))
            .transpose()?
            .unwrap_or_default(),
    })
}

pub fn apply_edits(mut fd: FixedDeposit, sub: &ArgMatches) -> Result<FixedDeposit> {
    if let Some(v) = opt_arg(sub, "bank") {
        fd.bank_name = v;
    }
    if let Some(v) = opt_arg(sub, "principal") {
        fd.principal_amount = parse_positive("principal", &v)?;
    }
    if let Some(v) = opt_arg(sub, "rate") {
        fd.interest_rate = parse_non_negative("rate", &v)?;
    }
    if let Some(v) = opt_arg(sub, "start") {
        fd.start_date = parse_date(&v)?;
    }
    if let Some(t) = parse_tenure(sub)? {
        fd.tenure = t;
    }
    if let Some(v) = opt_arg(sub, "account-number") {
        fd.fd_account_number = Some(v);
    }
    if let Some(v) = opt_arg(sub, "compounding") {
        fd.compounding_frequency = parse_compounding(&v)?;
    }
    if let Some(v) = opt_arg(sub, "payout") {
        fd.interest_payout = parse_payout(&v)?;
    }
    Ok(fd)
}

#[derive(Debug, Serialize)]
pub struct DepositRow {
    pub id: String,
    pub bank: String,
    pub principal: Decimal,
    pub rate: Decimal,
    pub start: NaiveDate,
    pub tenure_months: u32,
    pub maturity_date: NaiveDate,
    pub maturity_amount: Decimal,
    pub interest_earned: Decimal,
    pub status: &'static str,
}

pub fn deposit_rows(deposits: &[FixedDeposit], today: NaiveDate) -> Vec<DepositRow> {
    deposits
        .iter()
        .map(|fd| {
            let v = evaluate(fd, today);
            DepositRow {
                id: fd.id.clone().unwrap_or_default(),
                bank: fd.bank_name.clone(),
                principal: fd.principal_amount,
                rate: fd.interest_rate,
                start: fd.start_date,
                tenure_months: fd.tenure,
                maturity_date: v.maturity_date,
                maturity_amount: v.maturity_amount,
                interest_earned: v.interest_earned,
                status: v.status.label(),
            }
        })
        .collect()
}

fn list<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(sub);
    let mut deposits = Collection::<FixedDeposit>::new();
    let items = deposits
        .load(api)
        .context("Failed to fetch fixed deposits")?;
    let rows = deposit_rows(items, today());
    if maybe_print_json(json_flag, jsonl_flag, &rows)? {
        return Ok(());
    }
    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.id.clone(),
                r.bank.clone(),
                fmt_money(&r.principal),
                format!("{}%", r.rate),
                r.tenure_months.to_string(),
                r.maturity_date.to_string(),
                fmt_money(&r.maturity_amount),
                fmt_money(&r.interest_earned),
                r.status.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "Id", "Bank", "Principal", "Rate", "Months", "Matures", "Maturity value",
                "Interest", "Status"
            ],
            table,
        )
    );
    let s = summarize(items);
    println!(
        "Total principal: {}  Total corpus: {}  Average rate: {}",
        fmt_money(&s.total_principal),
        fmt_money(&s.total_corpus),
        fmt_percent(&s.average_rate)
    );
    Ok(())
}

fn add<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let fd = deposit_from_args(sub)?;
    let mut deposits = Collection::<FixedDeposit>::new();
    let created = deposits.mutate(api, |api| api.create(&fd))?;
    println!(
        "Booked FD of {} at {}% with {} for {} months",
        fmt_money(&created.principal_amount),
        created.interest_rate,
        created.bank_name,
        created.tenure
    );
    Ok(())
}

fn edit<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let id = req_arg(sub, "id")?;
    let mut deposits = Collection::<FixedDeposit>::new();
    deposits.load(api)?;
    let updated = apply_edits(deposits.find(&id)?.clone(), sub)?;
    deposits.mutate(api, |api| api.update(&id, &updated))?;
    println!("Updated FD with {}", updated.bank_name);
    Ok(())
}

fn rm<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let id = req_arg(sub, "id")?;
    let mut deposits = Collection::<FixedDeposit>::new();
    deposits.mutate(api, |api| api.delete::<FixedDeposit>(&id))?;
    println!("Removed FD {}", id);
    Ok(())
}

fn calendar<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let (year, month) = parse_month(&req_arg(sub, "month")?)?;
    let mut deposits = Collection::<FixedDeposit>::new();
    let items = deposits.load(api)?;
    let due = maturing_in_month(items, year, month);
    let rows = deposit_rows(
        &due.iter().map(|(fd, _)| (*fd).clone()).collect::<Vec<_>>(),
        today(),
    );
    let (json_flag, jsonl_flag) = output_flags(sub);
    if maybe_print_json(json_flag, jsonl_flag, &rows)? {
        return Ok(());
    }
    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.maturity_date.to_string(),
                r.bank.clone(),
                fmt_money(&r.maturity_amount),
                r.status.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Matures", "Bank", "Maturity value", "Status"], table)
    );
    Ok(())
}
