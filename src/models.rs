// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::api::Resource;

fn parse_label<T: Copy>(all: &[T], label: fn(&T) -> &'static str, s: &str) -> Option<T> {
    let s = s.trim();
    all.iter().copied().find(|v| label(v).eq_ignore_ascii_case(s))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LoanType {
    #[serde(rename = "Home Loan")]
    Home,
    #[serde(rename = "Car Loan")]
    Car,
    #[serde(rename = "Personal Loan")]
    Personal,
    #[serde(rename = "Education Loan")]
    Education,
    Other,
}

impl LoanType {
    pub const ALL: [LoanType; 5] = [
        LoanType::Home,
        LoanType::Car,
        LoanType::Personal,
        LoanType::Education,
        LoanType::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LoanType::Home => "Home Loan",
            LoanType::Car => "Car Loan",
            LoanType::Personal => "Personal Loan",
            LoanType::Education => "Education Loan",
            LoanType::Other => "Other",
        }
    }
}

impl FromStr for LoanType {
    type Err = String;

    // "home" and "Home Loan" both name the same type
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label(&Self::ALL, Self::label, s)
            .or_else(|| parse_label(&Self::ALL, Self::label, &format!("{} Loan", s.trim())))
            .ok_or_else(|| format!("Unknown loan type '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DebtType {
    #[serde(rename = "I Owe")]
    IOwe,
    #[serde(rename = "Owed To Me")]
    OwedToMe,
}

impl DebtType {
    pub const ALL: [DebtType; 2] = [DebtType::IOwe, DebtType::OwedToMe];

    pub fn label(&self) -> &'static str {
        match self {
            DebtType::IOwe => "I Owe",
            DebtType::OwedToMe => "Owed To Me",
        }
    }
}

impl FromStr for DebtType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label(&Self::ALL, Self::label, s).ok_or_else(|| format!("Unknown debt type '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DebtStatus {
    #[default]
    Pending,
    Paid,
}

impl DebtStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DebtStatus::Pending => "Pending",
            DebtStatus::Paid => "Paid",
        }
    }
}

impl FromStr for DebtStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label(&[DebtStatus::Pending, DebtStatus::Paid], Self::label, s)
            .ok_or_else(|| format!("Unknown debt status '{}'", s))
    }
}

/// Provenance of an expense: typed in by the user or pulled from a synced source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseSource {
    #[default]
    Manual,
    Automated,
}

impl ExpenseSource {
    pub fn label(&self) -> &'static str {
        match self {
            ExpenseSource::Manual => "Manual",
            ExpenseSource::Automated => "Automated",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
}

impl GoalStatus {
    pub fn label(&self) -> &'static str {
        match self {
            GoalStatus::Active => "Active",
            GoalStatus::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompoundingFrequency {
    Monthly,
    #[default]
    Quarterly,
    #[serde(rename = "Half-Yearly")]
    HalfYearly,
    Annually,
    #[serde(rename = "At Maturity")]
    AtMaturity,
    Other,
}

impl CompoundingFrequency {
    pub const ALL: [CompoundingFrequency; 6] = [
        CompoundingFrequency::Monthly,
        CompoundingFrequency::Quarterly,
        CompoundingFrequency::HalfYearly,
        CompoundingFrequency::Annually,
        CompoundingFrequency::AtMaturity,
        CompoundingFrequency::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CompoundingFrequency::Monthly => "Monthly",
            CompoundingFrequency::Quarterly => "Quarterly",
            CompoundingFrequency::HalfYearly => "Half-Yearly",
            CompoundingFrequency::Annually => "Annually",
            CompoundingFrequency::AtMaturity => "At Maturity",
            CompoundingFrequency::Other => "Other",
        }
    }
}

impl FromStr for CompoundingFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label(&Self::ALL, Self::label, s)
            .ok_or_else(|| format!("Unknown compounding frequency '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterestPayout {
    #[default]
    Cumulative,
    Periodic,
}

impl InterestPayout {
    pub fn label(&self) -> &'static str {
        match self {
            InterestPayout::Cumulative => "Cumulative",
            InterestPayout::Periodic => "Periodic",
        }
    }
}

impl FromStr for InterestPayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label(
            &[InterestPayout::Cumulative, InterestPayout::Periodic],
            Self::label,
            s,
        )
        .ok_or_else(|| format!("Unknown interest payout '{}'", s))
    }
}

impl fmt::Display for LoanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for DebtType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Backend dates arrive either as `YYYY-MM-DD` or as full ISO-8601 timestamps.
/// Only the calendar date is kept.
pub fn parse_backend_date(raw: &str) -> Result<NaiveDate, String> {
    let head = raw.trim().get(..10).unwrap_or(raw.trim());
    NaiveDate::parse_from_str(head, "%Y-%m-%d").map_err(|e| format!("Invalid date '{}': {}", raw, e))
}

mod backend_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&d.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_backend_date(&raw).map_err(serde::de::Error::custom)
    }
}

/// Timestamps as RFC 3339, or a bare `YYYY-MM-DD` read as midnight UTC.
pub fn parse_backend_datetime(raw: &str) -> Result<DateTime<Utc>, String> {
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(_) => parse_backend_date(raw).map(|d| d.and_time(NaiveTime::MIN).and_utc()),
    }
}

mod backend_datetime {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&d.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_backend_datetime(&raw).map_err(serde::de::Error::custom)
    }
}

mod backend_date_opt {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match d {
            Some(d) => s.serialize_str(&d.format("%Y-%m-%d").to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(raw) if !raw.trim().is_empty() => super::parse_backend_date(&raw)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub bank_name: String,
    pub account_type: String,
    pub balance: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub stock_name: String,
    pub quantity: Decimal,
    pub avg_buy_price: Decimal,
    pub current_market_price: Decimal,
    #[serde(
        default,
        with = "backend_date_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub purchase_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedDeposit {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub bank_name: String,
    pub principal_amount: Decimal,
    pub interest_rate: Decimal,
    #[serde(with = "backend_date")]
    pub start_date: NaiveDate,
    /// Months.
    pub tenure: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fd_account_number: Option<String>,
    /// Stored for display only; maturity math is simple interest.
    #[serde(default)]
    pub compounding_frequency: CompoundingFrequency,
    #[serde(default)]
    pub interest_payout: InterestPayout,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub loan_name: String,
    pub loan_type: LoanType,
    pub total_loan_amount: Decimal,
    /// Annual percentage.
    pub interest_rate: Decimal,
    pub loan_tenure_months: u32,
    pub emi_amount: Decimal,
    #[serde(with = "backend_date")]
    pub start_date: NaiveDate,
    #[serde(with = "backend_date")]
    pub next_due_date: NaiveDate,
    pub remaining_amount: Decimal,
    #[serde(default)]
    pub total_interest_paid: Decimal,
}

impl Loan {
    pub fn is_active(&self) -> bool {
        self.remaining_amount > Decimal::ZERO
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Debt {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub person_name: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub r#type: DebtType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(with = "backend_date")]
    pub transaction_date: NaiveDate,
    #[serde(
        default,
        with = "backend_date_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: DebtStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub amount: Decimal,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "backend_datetime")]
    pub transaction_date: DateTime<Utc>,
    #[serde(default)]
    pub source: ExpenseSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub goal_name: String,
    #[serde(default)]
    pub category: String,
    pub target_amount: Decimal,
    #[serde(default)]
    pub current_saved: Decimal,
    #[serde(with = "backend_date")]
    pub deadline: NaiveDate,
    #[serde(default)]
    pub status: GoalStatus,
}

impl SavingsGoal {
    pub fn amount_remaining(&self) -> Decimal {
        (self.target_amount - self.current_saved).max(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Payload of the backend's own `dashboard/summary` endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerDashboard {
    #[serde(default)]
    pub summary: ServerSummary,
    #[serde(default)]
    pub charts_data: ServerCharts,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSummary {
    pub net_worth: Option<Decimal>,
    pub total_bank_balance: Option<Decimal>,
    pub total_investment_value: Option<Decimal>,
    #[serde(rename = "totalFDPrincipal")]
    pub total_fd_principal: Option<Decimal>,
    pub total_outstanding_loans: Option<Decimal>,
    pub total_monthly_expense: Option<Decimal>,
    pub total_savings_current_saved: Option<Decimal>,
    pub total_savings_target_amount: Option<Decimal>,
    pub total_i_owe: Option<Decimal>,
    pub total_owed_to_me: Option<Decimal>,
    pub total_monthly_emi_outflow: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerCharts {
    #[serde(default)]
    pub expense_category_breakdown: BTreeMap<String, Decimal>,
    #[serde(default)]
    pub investment_distribution: BTreeMap<String, Decimal>,
    #[serde(default)]
    pub bank_balance_distribution: BTreeMap<String, Decimal>,
    #[serde(default)]
    pub fd_principal_distribution: BTreeMap<String, Decimal>,
    #[serde(default)]
    pub loan_type_outstanding: BTreeMap<String, Decimal>,
}

impl Resource for BankAccount {
    const COLLECTION: &'static str = "bankaccounts";
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Resource for Investment {
    const COLLECTION: &'static str = "investments";
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Resource for FixedDeposit {
    const COLLECTION: &'static str = "fixeddeposits";
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Resource for Loan {
    const COLLECTION: &'static str = "loans";
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Resource for Debt {
    const COLLECTION: &'static str = "debts";
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Resource for Expense {
    const COLLECTION: &'static str = "expenses";
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Resource for SavingsGoal {
    const COLLECTION: &'static str = "savinggoals";
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
