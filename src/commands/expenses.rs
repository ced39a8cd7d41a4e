// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use clap::ArgMatches;
use serde_json::{json, Value};
use tracing::info;

use super::{opt_arg, output_flags, req_arg, Collection};
use crate::api::Backend;
use crate::calc::dashboard::{expense_month_summary, expenses_in_month, ExpenseMonthSummary};
use crate::error::Error;
use crate::models::{Expense, ExpenseSource};
use crate::utils::{
    fmt_money, fmt_percent, maybe_print_json, parse_date, parse_month, parse_positive,
    pretty_table, today,
};

pub const CATEGORIES: [&str; 9] = [
    "Food",
    "Travel",
    "Shopping",
    "Bills",
    "Entertainment",
    "Transport",
    "Health",
    "Education",
    "Other",
];

pub fn handle<B: Backend>(api: &B, m: &ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(api, sub)?,
        Some(("add", sub)) => add(api, sub)?,
        Some(("edit", sub)) => edit(api, sub)?,
        Some(("rm", sub)) => rm(api, sub)?,
        Some(("sync", _)) => sync(api)?,
        Some(("export", sub)) => export(api, sub)?,
        _ => {}
    }
    Ok(())
}

fn parse_category(s: &str) -> Result<String> {
    CATEGORIES
        .iter()
        .find(|c| c.eq_ignore_ascii_case(s.trim()))
        .map(|c| c.to_string())
        .ok_or_else(|| {
            Error::validation(format!(
                "Unknown category '{}' (use one of: {})",
                s.trim(),
                CATEGORIES.join(", ")
            ))
            .into()
        })
}

fn start_of_day(d: NaiveDate) -> DateTime<Utc> {
    d.and_time(NaiveTime::MIN).and_utc()
}

pub fn expense_from_args(sub: &ArgMatches) -> Result<Expense> {
    let transaction_date = match opt_arg(sub, "date") {
        Some(s) => start_of_day(parse_date(&s)?),
        None => Utc::now(),
    };
    Ok(Expense {
        id: None,
        amount: parse_positive("amount", &req_arg(sub, "amount")?)?,
        category: parse_category(&req_arg(sub, "category")?)?,
        description: opt_arg(sub, "description").unwrap_or_default(),
        transaction_date,
        source: ExpenseSource::Manual,
    })
}

pub fn apply_edits(mut exp: Expense, sub: &ArgMatches) -> Result<Expense> {
    if let Some(v) = opt_arg(sub, "amount") {
        exp.amount = parse_positive("amount", &v)?;
    }
    if let Some(v) = opt_arg(sub, "category") {
        exp.category = parse_category(&v)?;
    }
    if let Some(v) = opt_arg(sub, "description") {
        exp.description = v;
    }
    if let Some(v) = opt_arg(sub, "date") {
        exp.transaction_date = start_of_day(parse_date(&v)?);
    }
    Ok(exp)
}

#[derive(serde::Serialize)]
struct MonthView<'a> {
    month: String,
    summary: ExpenseMonthSummary,
    expenses: Vec<&'a Expense>,
}

fn list<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let (year, month) = match opt_arg(sub, "month") {
        Some(s) => parse_month(&s)?,
        None => {
            let t = today();
            (t.year(), t.month())
        }
    };
    let (json_flag, jsonl_flag) = output_flags(sub);
    let mut expenses = Collection::<Expense>::new();
    let items = expenses.load(api).context("Failed to fetch expenses")?;

    let mut in_month = expenses_in_month(items, year, month);
    in_month.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));
    let view = MonthView {
        month: format!("{:04}-{:02}", year, month),
        summary: expense_month_summary(items, year, month),
        expenses: in_month,
    };
    if maybe_print_json(json_flag, jsonl_flag, &view)? {
        return Ok(());
    }

    let s = &view.summary;
    println!("Expenses for {}", view.month);
    println!(
        "  Total: {}  Highest: {}{}  Daily average: {}",
        fmt_money(&s.total),
        fmt_money(&s.highest_amount),
        s.highest_description
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(|d| format!(" ({})", d))
            .unwrap_or_default(),
        fmt_money(&s.average_daily)
    );
    if let Some(cat) = &s.top_category {
        println!(
            "  Top category: {} ({} of spending)",
            cat,
            fmt_percent(&s.top_category_share)
        );
    }
    let rows: Vec<Vec<String>> = view
        .expenses
        .iter()
        .map(|e| {
            vec![
                e.id.clone().unwrap_or_default(),
                e.transaction_date.date_naive().to_string(),
                e.category.clone(),
                fmt_money(&e.amount),
                e.description.clone(),
                e.source.label().to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Id", "Date", "Category", "Amount", "Description", "Source"],
            rows,
        )
    );
    Ok(())
}

fn add<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let exp = expense_from_args(sub)?;
    let mut expenses = Collection::<Expense>::new();
    let created = expenses.mutate(api, |api| api.create(&exp))?;
    println!(
        "Recorded {} on {} ({})",
        fmt_money(&created.amount),
        created.category,
        created.transaction_date.date_naive()
    );
    Ok(())
}

fn edit<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let id = req_arg(sub, "id")?;
    let mut expenses = Collection::<Expense>::new();
    expenses.load(api)?;
    let updated = apply_edits(expenses.find(&id)?.clone(), sub)?;
    expenses.mutate(api, |api| api.update(&id, &updated))?;
    println!("Updated expense {}", id);
    Ok(())
}

fn rm<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let id = req_arg(sub, "id")?;
    let mut expenses = Collection::<Expense>::new();
    expenses.mutate(api, |api| api.delete::<Expense>(&id))?;
    println!("Removed expense {}", id);
    Ok(())
}

/// Asks the backend to pull automated expenses and returns its status line.
pub fn sync_expenses<B: Backend>(api: &B, expenses: &mut Collection<Expense>) -> Result<String> {
    let reply = expenses
        .mutate(api, |api| api.get_json("google/sync-expenses"))
        .map_err(|e| {
            if e.is_unauthorized() {
                anyhow::Error::new(e).context("Expense source is not connected or its access expired")
            } else {
                e.into()
            }
        })?;
    Ok(reply
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("Sync complete")
        .to_string())
}

fn sync<B: Backend>(api: &B) -> Result<()> {
    let mut expenses = Collection::<Expense>::new();
    let message = sync_expenses(api, &mut expenses)?;
    info!(count = expenses.items().len(), "expenses re-fetched after sync");
    println!("{}", message);
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(Error::validation(format!(
                "Unknown format: {} (use csv|json)",
                other
            ))),
        }
    }
}

/// Writes every expense to `out`, oldest first. Returns the number written.
pub fn export_expenses(expenses: &[Expense], format: ExportFormat, out: &Path) -> Result<usize> {
    let mut sorted: Vec<&Expense> = expenses.iter().collect();
    sorted.sort_by_key(|e| e.transaction_date);
    match format {
        ExportFormat::Csv => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Failed to create {}", out.display()))?;
            wtr.write_record(["date", "category", "amount", "description", "source", "id"])?;
            for e in &sorted {
                wtr.write_record([
                    e.transaction_date.date_naive().to_string(),
                    e.category.clone(),
                    e.amount.to_string(),
                    e.description.clone(),
                    e.source.label().to_string(),
                    e.id.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        ExportFormat::Json => {
            let items: Vec<Value> = sorted
                .iter()
                .map(|e| {
                    json!({
                        "date": e.transaction_date.date_naive().to_string(),
                        "category": e.category,
                        "amount": e.amount,
                        "description": e.description,
                        "source": e.source.label(),
                        "id": e.id,
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)
                .with_context(|| format!("Failed to write {}", out.display()))?;
        }
    }
    Ok(sorted.len())
}

fn export<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let format: ExportFormat = req_arg(sub, "format")?.parse()?;
    let out = req_arg(sub, "out")?;
    let mut expenses = Collection::<Expense>::new();
    let items = expenses.load(api).context("Failed to fetch expenses")?;
    let n = export_expenses(items, format, Path::new(&out))?;
    println!("Exported {} expenses to {}", n, out);
    Ok(())
}
