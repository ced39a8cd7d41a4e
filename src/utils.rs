// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::Error;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s.trim()))
}

/// `YYYY-MM` -> (year, month).
pub fn parse_month(s: &str) -> Result<(i32, u32)> {
    let d = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s.trim()))?;
    Ok((d.year(), d.month()))
}

/// Amounts entered by the user must be numeric and strictly positive.
pub fn parse_positive(field: &str, s: &str) -> Result<Decimal> {
    match s.trim().parse::<Decimal>() {
        Ok(d) if d > Decimal::ZERO => Ok(d),
        _ => Err(Error::validation(format!(
            "{} must be a positive number, got '{}'",
            field,
            s.trim()
        ))
        .into()),
    }
}

pub fn parse_non_negative(field: &str, s: &str) -> Result<Decimal> {
    match s.trim().parse::<Decimal>() {
        Ok(d) if d >= Decimal::ZERO => Ok(d),
        _ => Err(Error::validation(format!(
            "{} must be zero or a positive number, got '{}'",
            field,
            s.trim()
        ))
        .into()),
    }
}

pub fn to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

/// Converts a computed float back to a money amount rounded to 2 dp.
pub fn money_from_f64(v: f64) -> Result<Decimal> {
    let d = Decimal::try_from(v).with_context(|| format!("Amount '{}' is out of range", v))?;
    Ok(d.round_dp(2))
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn fmt_f64(v: f64) -> String {
    format!("{:.2}", v)
}

pub fn fmt_percent(d: &Decimal) -> String {
    format!("{:.1}%", d.round_dp(1))
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
