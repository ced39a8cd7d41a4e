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
use serde_json::json;
use tracing::info;

use super::{opt_arg, output_flags, req_arg, Collection};
use crate::api::Backend;
use crate::calc::goals::{progress_percentage, projected_progress, required_monthly_rate, summarize};
use crate::models::{GoalStatus, SavingsGoal};
use crate::utils::{
    fmt_money, fmt_percent, maybe_print_json, parse_date, parse_non_negative, parse_positive,
    pretty_table, today,
};

pub fn handle<B: Backend>(api: &B, m: &ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(api, sub)?,
        Some(("add", sub)) => add(api, sub)?,
        Some(("edit", sub)) => edit(api, sub)?,
        Some(("add-money", sub)) => add_money(api, sub)?,
        Some(("rm", sub)) => rm(api, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn goal_from_args(sub: &ArgMatches) -> Result<SavingsGoal> {
    Ok(SavingsGoal {
        id: None,
        goal_name: req_arg(sub, "name")?,
        category: opt_arg(sub, "category").unwrap_or_else(|| "Other".into()),
        target_amount: parse_positive("target", &req_arg(sub, "target")?)?,
        current_saved: match opt_arg(sub, "saved") {
            Some(s) => parse_non_negative("saved", &s)?,
            None => Decimal::ZERO,
        },
        deadline: parse_date(&req_arg(sub, "deadline")?)?,
        status: GoalStatus::Active,
    })
}

pub fn apply_edits(mut goal: SavingsGoal, sub: &ArgMatches) -> Result<SavingsGoal> {
    if let Some(v) = opt_arg(sub, "name") {
        goal.goal_name = v;
    }
    if let Some(v) = opt_arg(sub, "category") {
        goal.category = v;
    }
    if let Some(v) = opt_arg(sub, "target") {
        goal.target_amount = parse_positive("target", &v)?;
    }
    if let Some(v) = opt_arg(sub, "saved") {
        goal.current_saved = parse_non_negative("saved", &v)?;
    }
    if let Some(v) = opt_arg(sub, "deadline") {
        goal.deadline = parse_date(&v)?;
    }
    Ok(goal)
}

#[derive(Debug, Serialize)]
pub struct GoalRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub saved: Decimal,
    pub target: Decimal,
    pub remaining: Decimal,
    pub progress: Decimal,
    pub deadline: NaiveDate,
    pub required_monthly: Decimal,
    pub status: &'static str,
}

pub fn goal_rows(goals: &[SavingsGoal], today: NaiveDate) -> Vec<GoalRow> {
    goals
        .iter()
        .map(|g| GoalRow {
            id: g.id.clone().unwrap_or_default(),
            name: g.goal_name.clone(),
            category: g.category.clone(),
            saved: g.current_saved,
            target: g.target_amount,
            remaining: g.amount_remaining(),
            progress: progress_percentage(g.current_saved, g.target_amount),
            deadline: g.deadline,
            required_monthly: match g.status {
                GoalStatus::Active => required_monthly_rate(g.amount_remaining(), g.deadline, today),
                GoalStatus::Completed => Decimal::ZERO,
            },
            status: g.status.label(),
        })
        .collect()
}

fn list<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(sub);
    let now = today();
    let mut goals = Collection::<SavingsGoal>::new();
    let items = goals.load(api).context("Failed to fetch savings goals")?;
    let rows = goal_rows(items, now);
    if maybe_print_json(json_flag, jsonl_flag, &rows)? {
        return Ok(());
    }
    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.id.clone(),
                r.name.clone(),
                r.category.clone(),
                fmt_money(&r.saved),
                fmt_money(&r.target),
                fmt_percent(&r.progress),
                r.deadline.to_string(),
                fmt_money(&r.required_monthly),
                r.status.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "Id", "Goal", "Category", "Saved", "Target", "Progress", "Deadline", "Per month",
                "Status"
            ],
            table,
        )
    );
    let s = summarize(items, now);
    println!(
        "Active goals: {} ({} completed)  Saved: {} of {} ({})  Needed per month: {}",
        s.active,
        s.completed,
        fmt_money(&s.total_saved),
        fmt_money(&s.total_target),
        fmt_percent(&progress_percentage(s.total_saved, s.total_target)),
        fmt_money(&s.total_required_monthly)
    );
    Ok(())
}

fn add<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let goal = goal_from_args(sub)?;
    let mut goals = Collection::<SavingsGoal>::new();
    let created = goals.mutate(api, |api| api.create(&goal))?;
    println!(
        "Created goal '{}' targeting {} by {}",
        created.goal_name,
        fmt_money(&created.target_amount),
        created.deadline
    );
    Ok(())
}

fn edit<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let id = req_arg(sub, "id")?;
    let mut goals = Collection::<SavingsGoal>::new();
    goals.load(api)?;
    let updated = apply_edits(goals.find(&id)?.clone(), sub)?;
    goals.mutate(api, |api| api.update(&id, &updated))?;
    println!("Updated goal '{}'", updated.goal_name);
    Ok(())
}

fn add_money<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let id = req_arg(sub, "id")?;
    let amount = parse_positive("amount", &req_arg(sub, "amount")?)?;
    let mut goals = Collection::<SavingsGoal>::new();
    goals.load(api)?;
    let goal = goals.find(&id)?.clone();
    let projected = projected_progress(goal.current_saved, goal.target_amount, amount);
    let path = format!("savinggoals/{}/add-money", id);
    goals.mutate(api, |api| api.post_action(&path, &json!({ "amount": amount })))?;
    info!(goal = %goal.goal_name, %amount, "money added to goal");
    println!(
        "Added {} to '{}'; progress now {}",
        fmt_money(&amount),
        goal.goal_name,
        fmt_percent(&projected)
    );
    Ok(())
}

fn rm<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let id = req_arg(sub, "id")?;
    let mut goals = Collection::<SavingsGoal>::new();
    goals.mutate(api, |api| api.delete::<SavingsGoal>(&id))?;
    println!("Removed goal {}", id);
    Ok(())
}
