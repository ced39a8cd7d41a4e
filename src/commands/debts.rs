// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use clap::ArgMatches;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use tracing::info;

use super::{opt_arg, output_flags, req_arg, Collection};
use crate::api::Backend;
use crate::calc::debts::{group_by_counterparty, settlement_history, summarize, DebtSummary};
use crate::error::Error;
use crate::models::{Debt, DebtStatus, DebtType};
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_positive, pretty_table};

pub fn handle<B: Backend>(api: &B, m: &ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(api, sub)?,
        Some(("add", sub)) => add(api, sub)?,
        Some(("edit", sub)) => edit(api, sub)?,
        Some(("settle", sub)) => settle(api, sub)?,
        Some(("rm", sub)) => rm(api, sub)?,
        _ => {}
    }
    Ok(())
}

fn parse_type(s: &str) -> Result<DebtType> {
    s.parse().map_err(|e: String| Error::validation(e).into())
}

fn parse_status(s: &str) -> Result<DebtStatus> {
    s.parse().map_err(|e: String| Error::validation(e).into())
}

pub fn debt_from_args(sub: &ArgMatches) -> Result<Debt> {
    Ok(Debt {
        id: None,
        person_name: req_arg(sub, "person")?,
        amount: parse_positive("amount", &req_arg(sub, "amount")?)?,
        r#type: parse_type(&req_arg(sub, "type")?)?,
        description: opt_arg(sub, "description").unwrap_or_default(),
        category: opt_arg(sub, "category").unwrap_or_else(|| "Other".into()),
        transaction_date: parse_date(&req_arg(sub, "date")?)?,
        due_date: opt_arg(sub, "due").map(|s| parse_date(&s)).transpose()?,
        status: opt_arg(sub, "status")
            .map(|s| parse_status(&s))
            .transpose()?
            .unwrap_or_default(),
    })
}

pub fn apply_edits(mut debt: Debt, sub: &ArgMatches) -> Result<Debt> {
    if let Some(v) = opt_arg(sub, "person") {
        debt.person_name = v;
    }
    if let Some(v) = opt_arg(sub, "amount") {
        debt.amount = parse_positive("amount", &v)?;
    }
    if let Some(v) = opt_arg(sub, "type") {
        debt.r#type = parse_type(&v)?;
    }
    if let Some(v) = opt_arg(sub, "description") {
        debt.description = v;
    }
    if let Some(v) = opt_arg(sub, "category") {
        debt.category = v;
    }
    if let Some(v) = opt_arg(sub, "date") {
        debt.transaction_date = parse_date(&v)?;
    }
    if let Some(v) = opt_arg(sub, "due") {
        debt.due_date = Some(parse_date(&v)?);
    }
    if let Some(v) = opt_arg(sub, "status") {
        debt.status = parse_status(&v)?;
    }
    Ok(debt)
}

#[derive(Debug, Serialize)]
pub struct PersonRow {
    pub person: String,
    pub owed_to_me: Decimal,
    pub i_owe: Decimal,
    pub net_balance: Decimal,
    pub direction: &'static str,
    pub pending: usize,
}

#[derive(Debug, Serialize)]
pub struct DebtOverview<'a> {
    pub people: Vec<PersonRow>,
    pub summary: DebtSummary,
    pub settled: Vec<&'a Debt>,
}

pub fn overview(debts: &[Debt]) -> DebtOverview<'_> {
    let people = group_by_counterparty(debts)
        .into_iter()
        .map(|(person, b)| PersonRow {
            person,
            owed_to_me: b.owed_to_me,
            i_owe: b.i_owe,
            net_balance: b.net_balance,
            direction: b.direction.label(),
            pending: b.pending,
        })
        .collect();
    DebtOverview {
        people,
        summary: summarize(debts),
        settled: settlement_history(debts),
    }
}

fn list<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(sub);
    let mut debts = Collection::<Debt>::new();
    let items = debts.load(api).context("Failed to fetch debts")?;
    let view = overview(items);
    if maybe_print_json(json_flag, jsonl_flag, &view)? {
        return Ok(());
    }

    let people: Vec<Vec<String>> = view
        .people
        .iter()
        .map(|p| {
            vec![
                p.person.clone(),
                fmt_money(&p.owed_to_me),
                fmt_money(&p.i_owe),
                fmt_money(&p.net_balance.abs()),
                p.direction.to_string(),
                p.pending.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Person", "Owed to me", "I owe", "Net", "Direction", "Pending"],
            people,
        )
    );
    println!(
        "You owe: {}  Owed to you: {}  Net position: {}",
        fmt_money(&view.summary.total_i_owe),
        fmt_money(&view.summary.total_owed_to_me),
        fmt_money(&view.summary.net_position)
    );

    let pending: Vec<Vec<String>> = items
        .iter()
        .filter(|d| d.status == DebtStatus::Pending)
        .map(|d| {
            vec![
                d.id.clone().unwrap_or_default(),
                d.transaction_date.to_string(),
                d.person_name.clone(),
                d.r#type.to_string(),
                fmt_money(&d.amount),
                d.category.clone(),
                d.due_date.map(|x| x.to_string()).unwrap_or_default(),
                d.description.clone(),
            ]
        })
        .collect();
    if !pending.is_empty() {
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Person", "Type", "Amount", "Category", "Due", "Note"],
                pending,
            )
        );
    }

    if !view.settled.is_empty() {
        println!("Settlement history");
        let settled: Vec<Vec<String>> = view
            .settled
            .iter()
            .map(|d| {
                vec![
                    d.transaction_date.to_string(),
                    d.person_name.clone(),
                    d.r#type.to_string(),
                    fmt_money(&d.amount),
                    d.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Person", "Type", "Amount", "Note"], settled)
        );
    }
    Ok(())
}

fn add<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let debt = debt_from_args(sub)?;
    let mut debts = Collection::<Debt>::new();
    let created = debts.mutate(api, |api| api.create(&debt))?;
    println!(
        "Recorded {} {} ({})",
        created.r#type,
        fmt_money(&created.amount),
        created.person_name
    );
    Ok(())
}

fn edit<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let id = req_arg(sub, "id")?;
    let mut debts = Collection::<Debt>::new();
    debts.load(api)?;
    let updated = apply_edits(debts.find(&id)?.clone(), sub)?;
    debts.mutate(api, |api| api.update(&id, &updated))?;
    println!("Updated debt with {}", updated.person_name);
    Ok(())
}

fn settle<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let id = req_arg(sub, "id")?;
    let path = format!("debts/{}/settle", id);
    let mut debts = Collection::<Debt>::new();
    debts.mutate(api, |api| api.post_action(&path, &json!({})))?;
    info!(debt = %id, "debt settled");
    println!("Marked debt {} as paid", id);
    Ok(())
}

fn rm<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let id = req_arg(sub, "id")?;
    let mut debts = Collection::<Debt>::new();
    debts.mutate(api, |api| api.delete::<Debt>(&id))?;
    println!("Removed debt {}", id);
    Ok(())
}
