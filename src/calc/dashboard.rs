// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use super::amortization::projected_end_date;
use super::{debts, falls_in_month};
use crate::models::{BankAccount, Debt, Expense, FixedDeposit, Investment, Loan, SavingsGoal};

/// Folds `items` into label -> summed value, e.g. balance per bank.
pub fn sum_by_label<T, L, V>(items: &[T], label: L, value: V) -> BTreeMap<String, Decimal>
where
    L: Fn(&T) -> String,
    V: Fn(&T) -> Decimal,
{
    let mut out = BTreeMap::new();
    for item in items {
        *out.entry(label(item)).or_insert(Decimal::ZERO) += value(item);
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestmentMetrics {
    pub invested: Decimal,
    pub current_value: Decimal,
    pub unrealized_pl: Decimal,
    pub pl_percent: Decimal,
}

pub fn investment_metrics(inv: &Investment) -> InvestmentMetrics {
    let invested = inv.quantity * inv.avg_buy_price;
    let current_value = inv.quantity * inv.current_market_price;
    let unrealized_pl = current_value - invested;
    let pl_percent = if invested.is_zero() {
        Decimal::ZERO
    } else {
        unrealized_pl / invested * Decimal::ONE_HUNDRED
    };
    InvestmentMetrics {
        invested,
        current_value,
        unrealized_pl,
        pl_percent,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoanSummary {
    pub total_outstanding: Decimal,
    /// Only loans with something left to repay contribute.
    pub monthly_emi_outflow: Decimal,
    /// Latest projected end date across all loans.
    pub debt_free_date: Option<NaiveDate>,
    pub active: usize,
}

pub fn loan_summary(loans: &[Loan]) -> LoanSummary {
    let mut out = LoanSummary::default();
    for loan in loans {
        out.total_outstanding += loan.remaining_amount;
        if loan.is_active() {
            out.active += 1;
            out.monthly_emi_outflow += loan.emi_amount;
        }
        let end = projected_end_date(loan.start_date, loan.loan_tenure_months);
        out.debt_free_date = Some(out.debt_free_date.map_or(end, |d| d.max(end)));
    }
    out
}

/// Loans whose next installment falls in the given month, soonest first.
pub fn loans_due_in_month(loans: &[Loan], year: i32, month: u32) -> Vec<&Loan> {
    let mut out: Vec<&Loan> = loans
        .iter()
        .filter(|l| falls_in_month(l.next_due_date, year, month))
        .collect();
    out.sort_by_key(|l| l.next_due_date);
    out
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpenseMonthSummary {
    pub total: Decimal,
    pub highest_amount: Decimal,
    pub highest_description: Option<String>,
    /// Total divided by the number of distinct days with spending.
    pub average_daily: Decimal,
    pub top_category: Option<String>,
    pub top_category_share: Decimal,
    pub by_category: BTreeMap<String, Decimal>,
}

pub fn expenses_in_month(expenses: &[Expense], year: i32, month: u32) -> Vec<&Expense> {
    expenses
        .iter()
        .filter(|e| falls_in_month(e.transaction_date.date_naive(), year, month))
        .collect()
}

pub fn expense_month_summary(expenses: &[Expense], year: i32, month: u32) -> ExpenseMonthSummary {
    let mut out = ExpenseMonthSummary::default();
    let mut days = BTreeSet::new();
    for exp in expenses_in_month(expenses, year, month) {
        out.total += exp.amount;
        if exp.amount > out.highest_amount {
            out.highest_amount = exp.amount;
            out.highest_description = Some(exp.description.clone());
        }
        days.insert(exp.transaction_date.date_naive());
        *out.by_category
            .entry(exp.category.clone())
            .or_insert(Decimal::ZERO) += exp.amount;
    }
    if !days.is_empty() {
        out.average_daily = out.total / Decimal::from(days.len());
    }
    // first category wins a tie
    let mut top: Option<(&String, Decimal)> = None;
    for (cat, amt) in &out.by_category {
        if *amt > top.map_or(Decimal::ZERO, |(_, a)| a) {
            top = Some((cat, *amt));
        }
    }
    if let Some((cat, amt)) = top {
        out.top_category = Some(cat.clone());
        if out.total > Decimal::ZERO {
            out.top_category_share = amt / out.total * Decimal::ONE_HUNDRED;
        }
    }
    out
}

/// Everything the dashboard folds over, as fetched from the backend.
#[derive(Debug, Clone, Default)]
pub struct Collections {
    pub accounts: Vec<BankAccount>,
    pub investments: Vec<Investment>,
    pub deposits: Vec<FixedDeposit>,
    pub loans: Vec<Loan>,
    pub debts: Vec<Debt>,
    pub expenses: Vec<Expense>,
    pub goals: Vec<SavingsGoal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Charts {
    pub expense_category_breakdown: BTreeMap<String, Decimal>,
    pub investment_distribution: BTreeMap<String, Decimal>,
    pub bank_balance_distribution: BTreeMap<String, Decimal>,
    pub fd_principal_distribution: BTreeMap<String, Decimal>,
    pub loan_type_outstanding: BTreeMap<String, Decimal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub net_worth: Decimal,
    pub total_bank_balance: Decimal,
    pub total_investment_value: Decimal,
    pub total_fd_principal: Decimal,
    pub total_outstanding_loans: Decimal,
    pub total_monthly_expense: Decimal,
    pub total_savings_current_saved: Decimal,
    pub total_savings_target_amount: Decimal,
    pub total_i_owe: Decimal,
    pub total_owed_to_me: Decimal,
    pub total_monthly_emi_outflow: Decimal,
    pub charts: Charts,
}

/// Builds the dashboard for the month containing `today`.
pub fn build(c: &Collections, today: NaiveDate) -> DashboardSummary {
    let charts = Charts {
        expense_category_breakdown: expense_month_summary(&c.expenses, today.year(), today.month())
            .by_category,
        investment_distribution: sum_by_label(
            &c.investments,
            |i| i.stock_name.clone(),
            |i| investment_metrics(i).current_value,
        ),
        bank_balance_distribution: sum_by_label(&c.accounts, |a| a.bank_name.clone(), |a| a.balance),
        fd_principal_distribution: sum_by_label(
            &c.deposits,
            |fd| fd.bank_name.clone(),
            |fd| fd.principal_amount,
        ),
        loan_type_outstanding: sum_by_label(
            &c.loans,
            |l| l.loan_type.label().to_string(),
            |l| l.remaining_amount,
        ),
    };

    let loans = loan_summary(&c.loans);
    let debt = debts::summarize(&c.debts);
    let total_bank_balance: Decimal = c.accounts.iter().map(|a| a.balance).sum();
    let total_investment_value: Decimal = charts.investment_distribution.values().copied().sum();
    let total_fd_principal: Decimal = c.deposits.iter().map(|fd| fd.principal_amount).sum();
    let total_monthly_expense: Decimal = charts.expense_category_breakdown.values().copied().sum();

    DashboardSummary {
        net_worth: total_bank_balance + total_investment_value + total_fd_principal
            - loans.total_outstanding
            + debt.net_position,
        total_bank_balance,
        total_investment_value,
        total_fd_principal,
        total_outstanding_loans: loans.total_outstanding,
        total_monthly_expense,
        total_savings_current_saved: c.goals.iter().map(|g| g.current_saved).sum(),
        total_savings_target_amount: c.goals.iter().map(|g| g.target_amount).sum(),
        total_i_owe: debt.total_i_owe,
        total_owed_to_me: debt.total_owed_to_me,
        total_monthly_emi_outflow: loans.monthly_emi_outflow,
        charts,
    }
}
