// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use clap::ArgMatches;
use rust_decimal::Decimal;
use serde::Serialize;

use super::{opt_arg, output_flags, req_arg, Collection};
use crate::api::Backend;
use crate::calc::dashboard::investment_metrics;
use crate::models::Investment;
use crate::utils::{
    fmt_money, fmt_percent, maybe_print_json, parse_date, parse_non_negative, parse_positive,
    pretty_table,
};

pub fn handle<B: Backend>(api: &B, m: &ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(api, sub)?,
        Some(("add", sub)) => add(api, sub)?,
        Some(("edit", sub)) => edit(api, sub)?,
        Some(("rm", sub)) => rm(api, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn investment_from_args(sub: &ArgMatches) -> Result<Investment> {
    Ok(Investment {
        id: None,
        stock_name: req_arg(sub, "stock")?.to_uppercase(),
        quantity: parse_positive("quantity", &req_arg(sub, "quantity")?)?,
        avg_buy_price: parse_positive("buy-price", &req_arg(sub, "buy-price")?)?,
        current_market_price: parse_non_negative("market-price", &req_arg(sub, "market-price")?)?,
        purchase_date: opt_arg(sub, "purchase-date")
            .map(|s| parse_date(&s))
            .transpose()?,
    })
}

pub fn apply_edits(mut inv: Investment, sub: &ArgMatches) -> Result<Investment> {
    if let Some(v) = opt_arg(sub, "stock") {
        inv.stock_name = v.to_uppercase();
    }
    if let Some(v) = opt_arg(sub, "quantity") {
        inv.quantity = parse_positive("quantity", &v)?;
    }
    if let Some(v) = opt_arg(sub, "buy-price") {
        inv.avg_buy_price = parse_positive("buy-price", &v)?;
    }
    if let Some(v) = opt_arg(sub, "market-price") {
        inv.current_market_price = parse_non_negative("market-price", &v)?;
    }
    if let Some(v) = opt_arg(sub, "purchase-date") {
        inv.purchase_date = Some(parse_date(&v)?);
    }
    Ok(inv)
}

#[derive(Debug, Serialize)]
pub struct HoldingRow {
    pub id: String,
    pub stock: String,
    pub quantity: Decimal,
    pub avg_buy_price: Decimal,
    pub market_price: Decimal,
    pub invested: Decimal,
    pub current_value: Decimal,
    pub unrealized_pl: Decimal,
    pub pl_percent: Decimal,
}

pub fn holding_rows(items: &[Investment]) -> Vec<HoldingRow> {
    items
        .iter()
        .map(|i| {
            let m = investment_metrics(i);
            HoldingRow {
                id: i.id.clone().unwrap_or_default(),
                stock: i.stock_name.clone(),
                quantity: i.quantity,
                avg_buy_price: i.avg_buy_price,
                market_price: i.current_market_price,
                invested: m.invested,
                current_value: m.current_value,
                unrealized_pl: m.unrealized_pl,
                pl_percent: m.pl_percent,
            }
        })
        .collect()
}

fn list<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(sub);
    let mut investments = Collection::<Investment>::new();
    let items = investments.load(api).context("Failed to fetch investments")?;
    let rows = holding_rows(items);
    if maybe_print_json(json_flag, jsonl_flag, &rows)? {
        return Ok(());
    }
    let mut invested = Decimal::ZERO;
    let mut current = Decimal::ZERO;
    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            invested += r.invested;
            current += r.current_value;
            vec![
                r.id.clone(),
                r.stock.clone(),
                r.quantity.normalize().to_string(),
                fmt_money(&r.avg_buy_price),
                fmt_money(&r.market_price),
                fmt_money(&r.invested),
                fmt_money(&r.current_value),
                fmt_money(&r.unrealized_pl),
                fmt_percent(&r.pl_percent),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "Id", "Stock", "Qty", "Avg buy", "Market", "Invested", "Value", "P&L", "P&L %"
            ],
            table,
        )
    );
    println!(
        "Invested: {}  Current value: {}  Unrealized P&L: {}",
        fmt_money(&invested),
        fmt_money(&current),
        fmt_money(&(current - invested))
    );
    Ok(())
}

fn add<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let inv = investment_from_args(sub)?;
    let mut investments = Collection::<Investment>::new();
    let created = investments.mutate(api, |api| api.create(&inv))?;
    println!(
        "Added {} x {} at {}",
        created.quantity.normalize(),
        created.stock_name,
        fmt_money(&created.avg_buy_price)
    );
    Ok(())
}

fn edit<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let id = req_arg(sub, "id")?;
    let mut investments = Collection::<Investment>::new();
    investments.load(api)?;
    let updated = apply_edits(investments.find(&id)?.clone(), sub)?;
    investments.mutate(api, |api| api.update(&id, &updated))?;
    println!("Updated holding {}", updated.stock_name);
    Ok(())
}

fn rm<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let id = req_arg(sub, "id")?;
    let mut investments = Collection::<Investment>::new();
    investments.mutate(api, |api| api.delete::<Investment>(&id))?;
    println!("Removed holding {}", id);
    Ok(())
}
