// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use chrono::NaiveDate;
use clap::ArgMatches;
use finpulse::api::{Backend, Resource};
use finpulse::calc::amortization::add_months;
use finpulse::cli;
use finpulse::error::{Error, Result};
use finpulse::models::parse_backend_date;
use serde_json::{json, Value};

/// In-memory stand-in for the REST backend. Records every call and can be
/// told to reject the next request.
#[derive(Default)]
pub struct FakeBackend {
    store: RefCell<BTreeMap<String, Vec<Value>>>,
    next_id: Cell<u32>,
    calls: RefCell<Vec<String>>,
    fail_next: RefCell<Option<(u16, String)>>,
    pub dashboard: RefCell<Value>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed<T: Resource>(&self, items: &[T]) {
        for item in items {
            let v = serde_json::to_value(item).unwrap();
            self.insert(T::COLLECTION, v);
        }
    }

    /// Stores a record exactly as the backend would return it.
    pub fn seed_raw(&self, collection: &str, v: Value) {
        self.insert(collection, v);
    }

    pub fn fail_next(&self, status: u16, message: &str) {
        *self.fail_next.borrow_mut() = Some((status, message.to_string()));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn raw(&self, collection: &str) -> Vec<Value> {
        self.store
            .borrow()
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    fn insert(&self, collection: &str, mut v: Value) -> Value {
        if v.get("_id").is_none() {
            let id = self.next_id.get() + 1;
            self.next_id.set(id);
            v["_id"] = json!(format!("id{}", id));
        }
        self.store
            .borrow_mut()
            .entry(collection.to_string())
            .or_default()
            .push(v.clone());
        v
    }

    fn record(&self, call: String) -> Result<()> {
        self.calls.borrow_mut().push(call);
        match self.fail_next.borrow_mut().take() {
            Some((status, message)) => Err(Error::Backend { status, message }),
            None => Ok(()),
        }
    }

    fn with_record<R>(&self, collection: &str, id: &str, f: impl FnOnce(&mut Value) -> R) -> Result<R> {
        let mut store = self.store.borrow_mut();
        let found = store
            .get_mut(collection)
            .and_then(|items| items.iter_mut().find(|v| v["_id"] == json!(id)));
        match found {
            Some(v) => Ok(f(v)),
            None => Err(Error::Backend {
                status: 404,
                message: format!("{} not found", collection),
            }),
        }
    }
}

fn num(v: &Value) -> f64 {
    v.as_f64().unwrap_or(0.0)
}

impl Backend for FakeBackend {
    fn list<T: Resource>(&self) -> Result<Vec<T>> {
        self.record(format!("GET {}", T::COLLECTION))?;
        Ok(serde_json::from_value(Value::Array(self.raw(T::COLLECTION)))?)
    }

    fn create<T: Resource>(&self, item: &T) -> Result<T> {
        self.record(format!("POST {}", T::COLLECTION))?;
        let v = self.insert(T::COLLECTION, serde_json::to_value(item)?);
        Ok(serde_json::from_value(v)?)
    }

    fn update<T: Resource>(&self, id: &str, item: &T) -> Result<T> {
        self.record(format!("PUT {}/{}", T::COLLECTION, id))?;
        let mut new = serde_json::to_value(item)?;
        new["_id"] = json!(id);
        let stored = self.with_record(T::COLLECTION, id, |v| {
            *v = new.clone();
            new
        })?;
        Ok(serde_json::from_value(stored)?)
    }

    fn delete<T: Resource>(&self, id: &str) -> Result<()> {
        self.record(format!("DELETE {}/{}", T::COLLECTION, id))?;
        let mut store = self.store.borrow_mut();
        let items = store.entry(T::COLLECTION.to_string()).or_default();
        let before = items.len();
        items.retain(|v| v["_id"] != json!(id));
        if items.len() == before {
            return Err(Error::Backend {
                status: 404,
                message: format!("{} not found", T::COLLECTION),
            });
        }
        Ok(())
    }

    fn post_action(&self, path: &str, body: &Value) -> Result<Value> {
        self.record(format!("POST {}", path))?;
        let parts: Vec<&str> = path.split('/').collect();
        match parts.as_slice() {
            ["auth", "login"] | ["auth", "register"] => Ok(json!({
                "token": "tok-123",
                "userId": "u1",
                "name": body.get("name").and_then(Value::as_str).unwrap_or("Asha"),
                "email": body["email"],
            })),
            ["loans", id, "pay-emi"] => self.with_record("loans", id, |loan| {
                let paid = num(&body["amountPaid"]);
                let remaining = (num(&loan["remainingAmount"]) - paid).max(0.0);
                loan["remainingAmount"] = json!(remaining);
                let next = parse_backend_date(loan["nextDueDate"].as_str().unwrap()).unwrap();
                loan["nextDueDate"] = json!(add_months(next, 1).to_string());
                json!({ "message": "EMI paid" })
            }),
            ["debts", id, "settle"] => self.with_record("debts", id, |debt| {
                debt["status"] = json!("Paid");
                json!({ "message": "Debt settled" })
            }),
            ["savinggoals", id, "add-money"] => self.with_record("savinggoals", id, |goal| {
                let saved = num(&goal["currentSaved"]) + num(&body["amount"]);
                goal["currentSaved"] = json!(saved);
                if saved >= num(&goal["targetAmount"]) {
                    goal["status"] = json!("Completed");
                }
                goal.clone()
            }),
            _ => Err(Error::Backend {
                status: 404,
                message: format!("No route for {}", path),
            }),
        }
    }

    fn get_json(&self, path: &str) -> Result<Value> {
        self.record(format!("GET {}", path))?;
        match path {
            "dashboard/summary" => Ok(self.dashboard.borrow().clone()),
            "google/sync-expenses" => {
                self.insert(
                    "expenses",
                    json!({
                        "amount": 250.0,
                        "category": "Food",
                        "description": "Synced from mail",
                        "transactionDate": "2025-08-14T10:30:00.000Z",
                        "source": "Automated",
                    }),
                );
                Ok(json!({ "message": "1 new expense synced" }))
            }
            _ => Err(Error::Backend {
                status: 404,
                message: format!("No route for {}", path),
            }),
        }
    }
}

/// Parses a full command line and returns the innermost subcommand's matches.
pub fn leaf_matches(args: &[&str]) -> ArgMatches {
    let mut m = cli::build_cli().get_matches_from(args);
    while let Some((_, sub)) = m.subcommand() {
        let next = sub.clone();
        m = next;
    }
    m
}

/// Parses a full command line and returns the matches one level below the root,
/// the shape each `commands::*::handle` expects.
pub fn resource_matches(args: &[&str]) -> ArgMatches {
    let m = cli::build_cli().get_matches_from(args);
    m.subcommand().map(|(_, s)| s.clone()).unwrap()
}

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
