// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use clap::ArgMatches;
use tracing::info;

use super::req_arg;
use crate::api::Backend;
use crate::session::{Session, SessionStore};

pub fn handle<B: Backend>(api: &B, store: &SessionStore<'_>, m: &ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("login", sub)) => {
            let session = login(api, store, &req_arg(sub, "email")?, &req_arg(sub, "password")?)?;
            println!("Signed in as {} <{}>", session.name, session.email);
        }
        Some(("register", sub)) => {
            let session = register(
                api,
                store,
                &req_arg(sub, "name")?,
                &req_arg(sub, "email")?,
                &req_arg(sub, "password")?,
            )?;
            println!("Registered and signed in as {} <{}>", session.name, session.email);
        }
        Some(("logout", _)) => {
            store.logout()?;
            info!("session cleared");
            println!("Signed out");
        }
        Some(("whoami", _)) => match store.current()? {
            Some(s) => println!("{} <{}> (user {})", s.name, s.email, s.user_id),
            None => println!("Not signed in"),
        },
        _ => {}
    }
    Ok(())
}

pub fn login<B: Backend>(
    api: &B,
    store: &SessionStore<'_>,
    email: &str,
    password: &str,
) -> Result<Session> {
    let resp = crate::api::login(api, email, password).context("Login failed")?;
    let session = Session::from(resp);
    store.login(&session)?;
    info!(user = %session.user_id, "signed in");
    Ok(session)
}

pub fn register<B: Backend>(
    api: &B,
    store: &SessionStore<'_>,
    name: &str,
    email: &str,
    password: &str,
) -> Result<Session> {
    let resp = crate::api::register(api, name, email, password).context("Registration failed")?;
    let session = Session::from(resp);
    store.login(&session)?;
    info!(user = %session.user_id, "registered");
    Ok(session)
}
