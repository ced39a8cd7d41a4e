// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::error::Result;
use crate::models::AuthResponse;

const KEYS: [&str; 4] = ["token", "userId", "name", "email"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(skip_serializing)]
    pub token: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
}

impl From<AuthResponse> for Session {
    fn from(r: AuthResponse) -> Self {
        Session {
            token: r.token,
            user_id: r.user_id,
            name: r.name,
            email: r.email,
        }
    }
}

/// The only durable client-side state. Written on login/register, wiped on
/// logout, read by whoever needs the bearer token.
pub struct SessionStore<'a> {
    conn: &'a Connection,
}

impl<'a> SessionStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn login(&self, session: &Session) -> Result<()> {
        let values = [
            session.token.as_str(),
            session.user_id.as_str(),
            session.name.as_str(),
            session.email.as_str(),
        ];
        // all four keys change together or not at all
        let tx = self.conn.unchecked_transaction()?;
        for (key, value) in KEYS.iter().zip(values) {
            tx.execute(
                "INSERT INTO session(key, value) VALUES(?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=datetime('now')",
                params![key, value],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn logout(&self) -> Result<()> {
        self.conn.execute(
            "DELETE FROM session WHERE key IN (?1, ?2, ?3, ?4)",
            params![KEYS[0], KEYS[1], KEYS[2], KEYS[3]],
        )?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let v = self
            .conn
            .query_row("SELECT value FROM session WHERE key=?1", params![key], |r| {
                r.get(0)
            })
            .optional()?;
        Ok(v)
    }

    pub fn token(&self) -> Result<Option<String>> {
        Ok(self.get("token")?.filter(|t| !t.is_empty()))
    }

    /// `None` unless a token is stored.
    pub fn current(&self) -> Result<Option<Session>> {
        let Some(token) = self.token()? else {
            return Ok(None);
        };
        Ok(Some(Session {
            token,
            user_id: self.get("userId")?.unwrap_or_default(),
            name: self.get("name")?.unwrap_or_default(),
            email: self.get("email")?.unwrap_or_default(),
        }))
    }
}
