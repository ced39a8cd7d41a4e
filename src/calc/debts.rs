// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Debt, DebtStatus, DebtType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    TheyOweYou,
    YouOweThem,
}

impl Direction {
    pub fn of(net: Decimal) -> Self {
        if net >= Decimal::ZERO {
            Direction::TheyOweYou
        } else {
            Direction::YouOweThem
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Direction::TheyOweYou => "they owe you",
            Direction::YouOweThem => "you owe them",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CounterpartyBalance {
    pub owed_to_me: Decimal,
    pub i_owe: Decimal,
    pub net_balance: Decimal,
    pub direction: Direction,
    pub pending: usize,
}

/// Nets pending debts per person. Paid debts are ignored.
pub fn group_by_counterparty(debts: &[Debt]) -> BTreeMap<String, CounterpartyBalance> {
    let mut sums: BTreeMap<String, (Decimal, Decimal, usize)> = BTreeMap::new();
    for debt in debts.iter().filter(|d| d.status == DebtStatus::Pending) {
        let entry = sums
            .entry(debt.person_name.clone())
            .or_insert((Decimal::ZERO, Decimal::ZERO, 0));
        match debt.r#type {
            DebtType::OwedToMe => entry.0 += debt.amount,
            DebtType::IOwe => entry.1 += debt.amount,
        }
        entry.2 += 1;
    }
    sums.into_iter()
        .map(|(person, (owed_to_me, i_owe, pending))| {
            let net_balance = owed_to_me - i_owe;
            (
                person,
                CounterpartyBalance {
                    owed_to_me,
                    i_owe,
                    net_balance,
                    direction: Direction::of(net_balance),
                    pending,
                },
            )
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DebtSummary {
    pub total_i_owe: Decimal,
    pub total_owed_to_me: Decimal,
    pub net_position: Decimal,
}

pub fn summarize(debts: &[Debt]) -> DebtSummary {
    let mut out = DebtSummary::default();
    for debt in debts.iter().filter(|d| d.status == DebtStatus::Pending) {
        match debt.r#type {
            DebtType::IOwe => out.total_i_owe += debt.amount,
            DebtType::OwedToMe => out.total_owed_to_me += debt.amount,
        }
    }
    out.net_position = out.total_owed_to_me - out.total_i_owe;
    out
}

/// Settled debts in chronological order of their transaction date.
pub fn settlement_history(debts: &[Debt]) -> Vec<&Debt> {
    let mut paid: Vec<&Debt> = debts
        .iter()
        .filter(|d| d.status == DebtStatus::Paid)
        .collect();
    paid.sort_by_key(|d| d.transaction_date);
    paid
}
