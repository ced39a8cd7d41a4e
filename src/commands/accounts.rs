// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use clap::ArgMatches;

use super::{opt_arg, output_flags, req_arg, Collection};
use crate::api::Backend;
use crate::calc::dashboard::sum_by_label;
use crate::error::Error;
use crate::models::BankAccount;
use crate::utils::{fmt_money, maybe_print_json, parse_non_negative, pretty_table};

pub const ACCOUNT_TYPES: [&str; 4] = ["Savings", "Current", "Checking", "Other"];

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

fn parse_account_type(s: &str) -> Result<String> {
    ACCOUNT_TYPES
        .iter()
        .find(|t| t.eq_ignore_ascii_case(s.trim()))
        .map(|t| t.to_string())
        .ok_or_else(|| Error::validation(format!("Unknown account type '{}'", s.trim())).into())
}

pub fn account_from_args(sub: &ArgMatches) -> Result<BankAccount> {
    Ok(BankAccount {
        id: None,
        bank_name: req_arg(sub, "bank")?,
        account_type: parse_account_type(
            &opt_arg(sub, "type").unwrap_or_else(|| "Savings".into()),
        )?,
        balance: parse_non_negative("balance", &req_arg(sub, "balance")?)?,
        currency: opt_arg(sub, "currency")
            .unwrap_or_else(|| "INR".into())
            .to_uppercase(),
    })
}

pub fn apply_edits(mut acct: BankAccount, sub: &ArgMatches) -> Result<BankAccount> {
    if let Some(v) = opt_arg(sub, "bank") {
        acct.bank_name = v;
    }
    if let Some(v) = opt_arg(sub, "type") {
        acct.account_type = parse_account_type(&v)?;
    }
    if let Some(v) = opt_arg(sub, "balance") {
        acct.balance = parse_non_negative("balance", &v)?;
    }
    if let Some(v) = opt_arg(sub, "currency") {
        acct.currency = v.to_uppercase();
    }
    Ok(acct)
}

fn list<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(sub);
    let mut accounts = Collection::<BankAccount>::new();
    let items = accounts.load(api).context("Failed to fetch bank accounts")?;
    if maybe_print_json(json_flag, jsonl_flag, &items)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|a| {
            vec![
                a.id.clone().unwrap_or_default(),
                a.bank_name.clone(),
                a.account_type.clone(),
                fmt_money(&a.balance),
                a.currency.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Id", "Bank", "Type", "Balance", "CCY"], rows)
    );
    let by_bank = sum_by_label(items, |a| a.bank_name.clone(), |a| a.balance);
    let totals: Vec<Vec<String>> = by_bank
        .iter()
        .map(|(bank, total)| vec![bank.clone(), fmt_money(total)])
        .collect();
    println!("{}", pretty_table(&["Bank", "Total"], totals));
    Ok(())
}

fn add<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let acct = account_from_args(sub)?;
    let mut accounts = Collection::<BankAccount>::new();
    let created = accounts.mutate(api, |api| api.create(&acct))?;
    println!(
        "Added account '{}' ({}, {} {})",
        created.bank_name,
        created.account_type,
        fmt_money(&created.balance),
        created.currency
    );
    Ok(())
}

fn edit<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let id = req_arg(sub, "id")?;
    let mut accounts = Collection::<BankAccount>::new();
    accounts.load(api)?;
    let updated = apply_edits(accounts.find(&id)?.clone(), sub)?;
    accounts.mutate(api, |api| api.update(&id, &updated))?;
    println!("Updated account '{}'", updated.bank_name);
    Ok(())
}

fn rm<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let id = req_arg(sub, "id")?;
    let mut accounts = Collection::<BankAccount>::new();
    accounts.mutate(api, |api| api.delete::<BankAccount>(&id))?;
    println!("Removed account {}", id);
    Ok(())
}
