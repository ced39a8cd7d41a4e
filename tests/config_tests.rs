// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use finpulse::config::{Config, LogFormat, DEFAULT_API_URL};
use finpulse::{cli, db};

fn lookup(pairs: &[(&str, &str)]) -> Config {
    let env: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|k| env.get(k).cloned())
}

#[test]
fn defaults_when_unset() {
    let c = lookup(&[]);
    assert_eq!(c.api_url, DEFAULT_API_URL);
    assert_eq!(c.timeout, Duration::from_secs(15));
    assert_eq!(c.db_path, None);
    assert_eq!(c.log_format, LogFormat::Text);
}

#[test]
fn reads_every_variable() {
    let c = lookup(&[
        ("FINPULSE_API_URL", " https://pulse.example.com/api "),
        ("FINPULSE_TIMEOUT_SECS", "40"),
        ("FINPULSE_DB_PATH", "/tmp/finpulse-test.sqlite"),
        ("FINPULSE_LOG_FORMAT", "JSON"),
    ]);
    assert_eq!(c.api_url, "https://pulse.example.com/api");
    assert_eq!(c.timeout, Duration::from_secs(40));
    assert_eq!(c.db_path, Some(PathBuf::from("/tmp/finpulse-test.sqlite")));
    assert_eq!(c.log_format, LogFormat::Json);
}

#[test]
fn garbage_values_fall_back() {
    let c = lookup(&[("FINPULSE_TIMEOUT_SECS", "soon"), ("FINPULSE_API_URL", "  ")]);
    assert_eq!(c.timeout, Duration::from_secs(15));
    assert_eq!(c.api_url, DEFAULT_API_URL);
}

#[test]
fn api_url_flag_overrides_env() {
    let m = cli::build_cli().get_matches_from([
        "finpulse",
        "--api-url",
        "http://10.0.0.5:5000/api",
        "dashboard",
    ]);
    let c = lookup(&[("FINPULSE_API_URL", "http://ignored/api")])
        .with_api_url(m.get_one::<String>("api-url"));
    assert_eq!(c.api_url, "http://10.0.0.5:5000/api");
}

#[test]
fn explicit_db_path_is_used_and_initialized() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("session.sqlite");
    let mut c = Config::default();
    c.db_path = Some(path.clone());
    assert_eq!(db::db_path(&c).unwrap(), path);
    let conn = db::open_or_init(&c).unwrap();
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM session", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 0);
}

#[test]
fn cli_rejects_conflicting_output_flags() {
    let r = cli::build_cli().try_get_matches_from(["finpulse", "loan", "list", "--json", "--jsonl"]);
    assert!(r.is_err());
}

#[test]
fn cli_builds_without_conflicts() {
    cli::build_cli().debug_assert();
}
