// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

use crate::calc::CalcError;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced to the user by a single action. None of them are fatal:
/// the command reports the message and the next invocation starts clean.
#[derive(Error, Debug)]
pub enum Error {
    /// Rejected locally before any request was sent.
    #[error("{0}")]
    Validation(String),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Backend { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response from backend: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Session store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error(transparent)]
    Calculation(#[from] CalcError),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Backend { status: 401, .. })
    }
}
