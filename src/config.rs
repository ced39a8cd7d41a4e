// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub timeout: Duration,
    /// Overrides the platform data dir for the session database.
    pub db_path: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            db_path: None,
            log_format: LogFormat::Text,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset or unparsable values fall
    /// back to defaults.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(get: F) -> Self {
        let api_url = get("FINPULSE_API_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let timeout_secs: u64 = get("FINPULSE_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let db_path = get("FINPULSE_DB_PATH")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);
        let log_format = match get("FINPULSE_LOG_FORMAT") {
            Some(v) if v.trim().eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };
        Self {
            api_url,
            timeout: Duration::from_secs(timeout_secs),
            db_path,
            log_format,
        }
    }

    pub fn with_api_url(mut self, url: Option<&String>) -> Self {
        if let Some(u) = url {
            self.api_url = u.trim().to_string();
        }
        self
    }
}
