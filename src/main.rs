// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::process::ExitCode;

use anyhow::Result;

use finpulse::api::ApiClient;
use finpulse::config::Config;
use finpulse::error::Error;
use finpulse::session::SessionStore;
use finpulse::{cli, commands, db, logging};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let unauthorized = e
                .chain()
                .filter_map(|c| c.downcast_ref::<Error>())
                .any(Error::is_unauthorized);
            if unauthorized {
                eprintln!("Sign in again with `finpulse auth login`.");
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let matches = cli::build_cli().get_matches();

    let config = Config::from_env().with_api_url(matches.get_one::<String>("api-url"));
    logging::init_tracing(config.log_format);

    let conn = db::open_or_init(&config)?;
    let store = SessionStore::new(&conn);
    let api = ApiClient::new(&config, store.token()?)?;

    match matches.subcommand() {
        Some(("auth", sub)) => commands::auth::handle(&api, &store, sub)?,
        Some(("account", sub)) => commands::accounts::handle(&api, sub)?,
        Some(("investment", sub)) => commands::investments::handle(&api, sub)?,
        Some(("fd", sub)) => commands::deposits::handle(&api, sub)?,
        Some(("loan", sub)) => commands::loans::handle(&api, sub)?,
        Some(("debt", sub)) => commands::debts::handle(&api, sub)?,
        Some(("expense", sub)) => commands::expenses::handle(&api, sub)?,
        Some(("goal", sub)) => commands::goals::handle(&api, sub)?,
        Some(("dashboard", sub)) => commands::dashboard::handle(&api, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
