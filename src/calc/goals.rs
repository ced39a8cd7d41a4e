// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{GoalStatus, SavingsGoal};

/// Average month length in days used to turn a day count into months.
pub fn average_month_days() -> Decimal {
    Decimal::new(3044, 2)
}

/// Monthly contribution needed to save `amount_remaining` by `deadline`.
///
/// A met goal needs nothing; a deadline that is today or already past needs
/// the whole remainder now.
pub fn required_monthly_rate(amount_remaining: Decimal, deadline: NaiveDate, today: NaiveDate) -> Decimal {
    let remaining = amount_remaining.max(Decimal::ZERO);
    if remaining.is_zero() {
        return Decimal::ZERO;
    }
    if deadline <= today {
        return remaining;
    }
    let days = Decimal::from((deadline - today).num_days());
    remaining / (days / average_month_days())
}

pub fn progress_percentage(saved: Decimal, target: Decimal) -> Decimal {
    if target > Decimal::ZERO {
        saved / target * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    }
}

/// Progress after adding `amount`, capped at 100%.
pub fn projected_progress(saved: Decimal, target: Decimal, amount: Decimal) -> Decimal {
    progress_percentage(saved + amount, target).min(Decimal::ONE_HUNDRED)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GoalsSummary {
    pub total_saved: Decimal,
    pub total_target: Decimal,
    /// Sum of each active goal's independent rate, not a joint plan.
    pub total_required_monthly: Decimal,
    pub active: usize,
    pub completed: usize,
}

pub fn summarize(goals: &[SavingsGoal], today: NaiveDate) -> GoalsSummary {
    let mut out = GoalsSummary::default();
    for goal in goals {
        match goal.status {
            GoalStatus::Active => {
                out.active += 1;
                out.total_saved += goal.current_saved;
                out.total_target += goal.target_amount;
                out.total_required_monthly +=
                    required_monthly_rate(goal.amount_remaining(), goal.deadline, today);
            }
            GoalStatus::Completed => out.completed += 1,
        }
    }
    out
}
