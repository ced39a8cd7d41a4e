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
use crate::calc::amortization::{
    compute_emi, projected_end_date, repayment_progress, schedule, split_installment, ScheduleRow,
};
use crate::calc::dashboard::{loan_summary, loans_due_in_month};
use crate::calc::prepayment::{reproject, PrepaymentInput, PrepaymentOutcome};
use crate::error::Error;
use crate::models::{Loan, LoanType};
use crate::utils::{
    fmt_f64, fmt_money, fmt_percent, maybe_print_json, money_from_f64, parse_date, parse_month,
    parse_non_negative, parse_positive, pretty_table, to_f64,
};

pub fn handle<B: Backend>(api: &B, m: &ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(api, sub)?,
        Some(("add", sub)) => add(api, sub)?,
        Some(("edit", sub)) => edit(api, sub)?,
        Some(("rm", sub)) => rm(api, sub)?,
        Some(("pay-emi", sub)) => pay_emi(api, sub)?,
        Some(("prepay", sub)) => prepay(api, sub)?,
        Some(("schedule", sub)) => schedule_cmd(api, sub)?,
        Some(("emi", sub)) => emi(sub)?,
        Some(("calendar", sub)) => calendar(api, sub)?,
        _ => {}
    }
    Ok(())
}

fn parse_loan_type(s: &str) -> Result<LoanType> {
    s.parse::<LoanType>().map_err(|e| Error::validation(e).into())
}

fn parse_tenure(sub: &ArgMatches) -> Result<Option<u32>> {
    match sub.get_one::<u32>("tenure").copied() {
        Some(0) => Err(Error::validation("tenure must be at least 1 month").into()),
        t => Ok(t),
    }
}

/// EMI rounded to 2 dp, the value prefilled when the user leaves it blank.
pub fn suggested_emi(amount: Decimal, rate: Decimal, tenure_months: u32) -> Result<Decimal> {
    money_from_f64(compute_emi(to_f64(amount), to_f64(rate), tenure_months))
}

/// Builds a new loan from `loan add` arguments. Nothing is sent until every
/// field validates.
pub fn loan_from_args(sub: &ArgMatches) -> Result<Loan> {
    let loan_name = req_arg(sub, "name")?;
    let loan_type = parse_loan_type(&opt_arg(sub, "type").unwrap_or_else(|| "Personal Loan".into()))?;
    let total_loan_amount = parse_positive("amount", &req_arg(sub, "amount")?)?;
    let interest_rate = parse_non_negative("rate", &req_arg(sub, "rate")?)?;
    let loan_tenure_months =
        parse_tenure(sub)?.ok_or_else(|| Error::validation("--tenure is required"))?;
    let emi_amount = match opt_arg(sub, "emi") {
        Some(s) => parse_positive("emi", &s)?,
        None => suggested_emi(total_loan_amount, interest_rate, loan_tenure_months)?,
    };
    let remaining_amount = match opt_arg(sub, "remaining") {
        Some(s) => parse_non_negative("remaining", &s)?,
        None => total_loan_amount,
    };
    let total_interest_paid = match opt_arg(sub, "interest-paid") {
        Some(s) => parse_non_negative("interest-paid", &s)?,
        None => Decimal::ZERO,
    };
    check_remaining(Loan {
        id: None,
        loan_name,
        loan_type,
        total_loan_amount,
        interest_rate,
        loan_tenure_months,
        emi_amount,
        start_date: parse_date(&req_arg(sub, "start")?)?,
        next_due_date: parse_date(&req_arg(sub, "next-due")?)?,
        remaining_amount,
        total_interest_paid,
    })
}

fn check_remaining(loan: Loan) -> Result<Loan> {
    if loan.remaining_amount > loan.total_loan_amount {
        return Err(Error::validation("remaining must not exceed the total loan amount").into());
    }
    Ok(loan)
}

/// Overlays `loan edit` arguments on a stored loan.
pub fn apply_edits(mut loan: Loan, sub: &ArgMatches) -> Result<Loan> {
    if let Some(v) = opt_arg(sub, "name") {
        loan.loan_name = v;
    }
    if let Some(v) = opt_arg(sub, "type") {
        loan.loan_type = parse_loan_type(&v)?;
    }
    if let Some(v) = opt_arg(sub, "amount") {
        loan.total_loan_amount = parse_positive("amount", &v)?;
    }
    if let Some(v) = opt_arg(sub, "rate") {
        loan.interest_rate = parse_non_negative("rate", &v)?;
    }
    if let Some(t) = parse_tenure(sub)? {
        loan.loan_tenure_months = t;
    }
    if let Some(v) = opt_arg(sub, "emi") {
        loan.emi_amount = parse_positive("emi", &v)?;
    }
    if let Some(v) = opt_arg(sub, "start") {
        loan.start_date = parse_date(&v)?;
    }
    if let Some(v) = opt_arg(sub, "next-due") {
        loan.next_due_date = parse_date(&v)?;
    }
    if let Some(v) = opt_arg(sub, "remaining") {
        loan.remaining_amount = parse_non_negative("remaining", &v)?;
    }
    if let Some(v) = opt_arg(sub, "interest-paid") {
        loan.total_interest_paid = parse_non_negative("interest-paid", &v)?;
    }
    check_remaining(loan)
}

#[derive(Debug, Serialize)]
pub struct LoanRow {
    pub id: String,
    pub name: String,
    pub loan_type: String,
    pub emi: Decimal,
    pub principal_part: Decimal,
    pub interest_part: Decimal,
    pub remaining: Decimal,
    pub progress: Decimal,
    pub next_due: String,
    pub ends: String,
}

pub fn loan_rows(loans: &[Loan]) -> Result<Vec<LoanRow>> {
    let mut rows = Vec::with_capacity(loans.len());
    for l in loans {
        let split = split_installment(
            to_f64(l.remaining_amount),
            to_f64(l.interest_rate),
            to_f64(l.emi_amount),
        );
        rows.push(LoanRow {
            id: l.id.clone().unwrap_or_default(),
            name: l.loan_name.clone(),
            loan_type: l.loan_type.label().to_string(),
            emi: l.emi_amount,
            principal_part: money_from_f64(split.principal_portion)?,
            interest_part: money_from_f64(split.interest_portion)?,
            remaining: l.remaining_amount,
            progress: repayment_progress(l.total_loan_amount, l.remaining_amount),
            next_due: l.next_due_date.to_string(),
            ends: projected_end_date(l.start_date, l.loan_tenure_months).to_string(),
        });
    }
    Ok(rows)
}

fn list<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = output_flags(sub);
    let mut loans = Collection::<Loan>::new();
    let items = loans.load(api).context("Failed to fetch loans")?;
    let rows = loan_rows(items)?;
    if maybe_print_json(json_flag, jsonl_flag, &rows)? {
        return Ok(());
    }
    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.id.clone(),
                r.name.clone(),
                r.loan_type.clone(),
                fmt_money(&r.emi),
                fmt_money(&r.principal_part),
                fmt_money(&r.interest_part),
                fmt_money(&r.remaining),
                fmt_percent(&r.progress),
                r.next_due.clone(),
                r.ends.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "Id", "Loan", "Type", "EMI", "Principal", "Interest", "Remaining", "Repaid",
                "Next due", "Ends"
            ],
            table,
        )
    );
    let s = loan_summary(items);
    println!(
        "Outstanding: {}  Monthly EMI outflow: {}  Active loans: {}  Debt-free by: {}",
        fmt_money(&s.total_outstanding),
        fmt_money(&s.monthly_emi_outflow),
        s.active,
        s.debt_free_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".into())
    );
    Ok(())
}

fn add<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let loan = loan_from_args(sub)?;
    let mut loans = Collection::<Loan>::new();
    let created = loans.mutate(api, |api| api.create(&loan))?;
    info!(loan = %created.loan_name, "loan created");
    println!(
        "Added loan '{}' ({}, EMI {})",
        created.loan_name,
        created.loan_type,
        fmt_money(&created.emi_amount)
    );
    Ok(())
}

fn edit<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let id = req_arg(sub, "id")?;
    let mut loans = Collection::<Loan>::new();
    loans.load(api)?;
    let updated = apply_edits(loans.find(&id)?.clone(), sub)?;
    loans.mutate(api, |api| api.update(&id, &updated))?;
    println!("Updated loan '{}'", updated.loan_name);
    Ok(())
}

fn rm<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let id = req_arg(sub, "id")?;
    let mut loans = Collection::<Loan>::new();
    loans.mutate(api, |api| api.delete::<Loan>(&id))?;
    println!("Removed loan {}", id);
    Ok(())
}

fn pay_emi<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let id = req_arg(sub, "id")?;
    let mut loans = Collection::<Loan>::new();
    loans.load(api)?;
    let loan = loans.find(&id)?.clone();
    let path = format!("loans/{}/pay-emi", id);
    loans.mutate(api, |api| {
        api.post_action(&path, &json!({ "amountPaid": loan.emi_amount }))
    })?;
    info!(loan = %loan.loan_name, amount = %loan.emi_amount, "EMI recorded");
    match loans.find(&id) {
        Ok(after) => println!(
            "Paid EMI of {} on '{}'. Remaining {}, next due {}",
            fmt_money(&loan.emi_amount),
            after.loan_name,
            fmt_money(&after.remaining_amount),
            after.next_due_date
        ),
        Err(_) => println!("Paid EMI of {} on '{}'", fmt_money(&loan.emi_amount), loan.loan_name),
    }
    Ok(())
}

/// Runs the prepayment projection for a stored loan.
pub fn prepayment_for(loan: &Loan, lump_sum: Decimal, new_emi: Option<Decimal>) -> Result<PrepaymentOutcome> {
    let input = PrepaymentInput {
        remaining: to_f64(loan.remaining_amount),
        current_emi: to_f64(loan.emi_amount),
        annual_rate_percent: to_f64(loan.interest_rate),
        tenure_months: loan.loan_tenure_months,
        next_due_date: loan.next_due_date,
        lump_sum: to_f64(lump_sum),
        new_emi: new_emi.map(to_f64),
    };
    reproject(&input).map_err(|e| Error::Calculation(e).into())
}

fn prepay<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let id = req_arg(sub, "id")?;
    let lump_sum = parse_non_negative("extra", &opt_arg(sub, "extra").unwrap_or_else(|| "0".into()))?;
    let new_emi = opt_arg(sub, "new-emi")
        .map(|s| parse_positive("new-emi", &s))
        .transpose()?;
    let mut loans = Collection::<Loan>::new();
    loans.load(api)?;
    let loan = loans.find(&id)?;
    let outcome = prepayment_for(loan, lump_sum, new_emi)?;

    let (json_flag, jsonl_flag) = output_flags(sub);
    if maybe_print_json(json_flag, jsonl_flag, &outcome)? {
        return Ok(());
    }
    println!("Prepayment plan for '{}'", loan.loan_name);
    println!("  New principal:     {}", fmt_f64(outcome.new_remaining));
    println!("  Installment:       {}", fmt_f64(outcome.installment));
    println!(
        "  New tenure:        {:.1} months ({} months, {:.1} years)",
        outcome.new_tenure_months,
        outcome.whole_months(),
        outcome.years()
    );
    println!("  Projected end:     {}", outcome.projected_end_date);
    println!("  Interest saved:    {}", fmt_f64(outcome.interest_saved));
    Ok(())
}

fn print_schedule(rows: &[ScheduleRow]) {
    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.month.to_string(),
                fmt_f64(r.installment),
                fmt_f64(r.principal_portion),
                fmt_f64(r.interest_portion),
                fmt_f64(r.balance),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Installment", "Principal", "Interest", "Balance"], table)
    );
}

fn schedule_cmd<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let (principal, rate, tenure) = match opt_arg(sub, "id") {
        Some(id) => {
            let mut loans = Collection::<Loan>::new();
            loans.load(api)?;
            let l = loans.find(&id)?;
            (l.total_loan_amount, l.interest_rate, l.loan_tenure_months)
        }
        None => (
            parse_positive("amount", &req_arg(sub, "amount")?)?,
            parse_non_negative("rate", &req_arg(sub, "rate")?)?,
            parse_tenure(sub)?.ok_or_else(|| Error::validation("--tenure is required"))?,
        ),
    };
    let rows = schedule(to_f64(principal), to_f64(rate), tenure);
    let (json_flag, jsonl_flag) = output_flags(sub);
    if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
        print_schedule(&rows);
    }
    Ok(())
}

fn emi(sub: &ArgMatches) -> Result<()> {
    let amount = parse_positive("amount", &req_arg(sub, "amount")?)?;
    let rate = parse_non_negative("rate", &req_arg(sub, "rate")?)?;
    let tenure = parse_tenure(sub)?.ok_or_else(|| Error::validation("--tenure is required"))?;
    let monthly = compute_emi(to_f64(amount), to_f64(rate), tenure);
    let total = monthly * f64::from(tenure);
    println!("EMI:             {}", fmt_f64(monthly));
    println!("Total payment:   {}", fmt_f64(total));
    println!("Total interest:  {}", fmt_f64(total - to_f64(amount)));
    Ok(())
}

fn calendar<B: Backend>(api: &B, sub: &ArgMatches) -> Result<()> {
    let (year, month) = parse_month(&req_arg(sub, "month")?)?;
    let mut loans = Collection::<Loan>::new();
    let items = loans.load(api)?;
    let due = loans_due_in_month(items, year, month);
    let (json_flag, jsonl_flag) = output_flags(sub);
    if maybe_print_json(json_flag, jsonl_flag, &due)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = due
        .iter()
        .map(|l| {
            vec![
                l.next_due_date.to_string(),
                l.loan_name.clone(),
                fmt_money(&l.emi_amount),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Due", "Loan", "EMI"], rows));
    Ok(())
}
