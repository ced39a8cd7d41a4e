// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod auth;
pub mod dashboard;
pub mod debts;
pub mod deposits;
pub mod expenses;
pub mod goals;
pub mod investments;
pub mod loans;

use anyhow::{anyhow, Result};
use tracing::info;

use crate::api::{Backend, Resource};
use crate::error::Error;

/// Lifecycle of a fetched collection.
#[derive(Debug)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Loaded(Vec<T>),
    Errored(String),
}

/// Client-side copy of one backend collection. Never authoritative: every
/// mutation is followed by a full re-fetch instead of a local patch.
#[derive(Debug)]
pub struct Collection<T> {
    state: LoadState<T>,
}

impl<T: Resource> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Resource> Collection<T> {
    pub fn new() -> Self {
        Self {
            state: LoadState::Idle,
        }
    }

    pub fn state(&self) -> &LoadState<T> {
        &self.state
    }

    pub fn items(&self) -> &[T] {
        match &self.state {
            LoadState::Loaded(items) => items,
            _ => &[],
        }
    }

    pub fn load<B: Backend>(&mut self, api: &B) -> Result<&[T], Error> {
        self.state = LoadState::Loading;
        match api.list::<T>() {
            Ok(items) => {
                self.state = LoadState::Loaded(items);
                Ok(self.items())
            }
            Err(e) => {
                self.state = LoadState::Errored(e.to_string());
                Err(e)
            }
        }
    }

    /// Runs one create/update/delete/action call, then reloads the whole
    /// collection. A failed call leaves the collection `Errored`.
    pub fn mutate<B, R, F>(&mut self, api: &B, op: F) -> Result<R, Error>
    where
        B: Backend,
        F: FnOnce(&B) -> Result<R, Error>,
    {
        self.state = LoadState::Loading;
        match op(api) {
            Ok(r) => {
                info!(collection = T::COLLECTION, "mutation applied, re-fetching");
                self.load(api)?;
                Ok(r)
            }
            Err(e) => {
                self.state = LoadState::Errored(e.to_string());
                Err(e)
            }
        }
    }

    pub fn find(&self, id: &str) -> Result<&T> {
        self.items()
            .iter()
            .find(|item| item.id() == Some(id))
            .ok_or_else(|| anyhow!("No record with id '{}' in {}", id, T::COLLECTION))
    }
}

/// Trimmed value of an optional string argument.
pub(crate) fn opt_arg(m: &clap::ArgMatches, name: &str) -> Option<String> {
    m.get_one::<String>(name)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub(crate) fn req_arg(m: &clap::ArgMatches, name: &str) -> Result<String> {
    opt_arg(m, name).ok_or_else(|| Error::validation(format!("--{} is required", name)).into())
}

pub(crate) fn output_flags(m: &clap::ArgMatches) -> (bool, bool) {
    let flag = |name: &str| m.try_get_one::<bool>(name).ok().flatten().copied().unwrap_or(false);
    (flag("json"), flag("jsonl"))
}
