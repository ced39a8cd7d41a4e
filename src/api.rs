// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::AuthResponse;

const UA: &str = concat!("finpulse/", env!("CARGO_PKG_VERSION"));

/// A backend-owned record type living under `/<COLLECTION>`.
pub trait Resource: Serialize + DeserializeOwned {
    const COLLECTION: &'static str;

    fn id(&self) -> Option<&str>;
}

/// Everything the views need from the backend. One request per call, no
/// retries, no caching.
pub trait Backend {
    fn list<T: Resource>(&self) -> Result<Vec<T>>;
    fn create<T: Resource>(&self, item: &T) -> Result<T>;
    fn update<T: Resource>(&self, id: &str, item: &T) -> Result<T>;
    fn delete<T: Resource>(&self, id: &str) -> Result<()>;
    /// POST to an action sub-resource such as `loans/:id/pay-emi`.
    fn post_action(&self, path: &str, body: &Value) -> Result<Value>;
    fn get_json(&self, path: &str) -> Result<Value>;
}

pub fn http_client(config: &Config) -> Result<Client> {
    let c = Client::builder()
        .timeout(config.timeout)
        .user_agent(UA)
        .build()?;
    Ok(c)
}

/// Pulls the `message` field out of an error body, or falls back to a
/// generic line naming the status.
pub fn backend_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(String::from)
        })
        .unwrap_or_else(|| format!("Request failed with status {}", status))
}

pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &Config, token: Option<String>) -> Result<Self> {
        Ok(Self {
            http: http_client(config)?,
            base_url: config.api_url.clone(),
            token,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.http.request(method, join_url(&self.base_url, path));
        // public endpoints work without a token
        match &self.token {
            Some(t) => req.bearer_auth(t),
            None => req,
        }
    }

    fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        let mut req = self.request(method.clone(), path);
        if let Some(b) = body {
            req = req.json(b);
        }
        let resp = req.send()?;
        let status = resp.status();
        debug!(%method, path, status = status.as_u16(), "backend response");
        let text = resp.text()?;
        if !status.is_success() {
            let message = backend_message(status.as_u16(), &text);
            warn!(%method, path, status = status.as_u16(), %message, "backend rejected request");
            return Err(Error::Backend {
                status: status.as_u16(),
                message,
            });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

impl Backend for ApiClient {
    fn list<T: Resource>(&self) -> Result<Vec<T>> {
        let v = self.send(Method::GET, T::COLLECTION, None)?;
        Ok(serde_json::from_value(v)?)
    }

    fn create<T: Resource>(&self, item: &T) -> Result<T> {
        let body = serde_json::to_value(item)?;
        let v = self.send(Method::POST, T::COLLECTION, Some(&body))?;
        Ok(serde_json::from_value(v)?)
    }

    fn update<T: Resource>(&self, id: &str, item: &T) -> Result<T> {
        let body = serde_json::to_value(item)?;
        let path = format!("{}/{}", T::COLLECTION, id);
        let v = self.send(Method::PUT, &path, Some(&body))?;
        Ok(serde_json::from_value(v)?)
    }

    fn delete<T: Resource>(&self, id: &str) -> Result<()> {
        let path = format!("{}/{}", T::COLLECTION, id);
        self.send(Method::DELETE, &path, None)?;
        Ok(())
    }

    fn post_action(&self, path: &str, body: &Value) -> Result<Value> {
        self.send(Method::POST, path, Some(body))
    }

    fn get_json(&self, path: &str) -> Result<Value> {
        self.send(Method::GET, path, None)
    }
}

pub fn login<B: Backend>(api: &B, email: &str, password: &str) -> Result<AuthResponse> {
    let v = api.post_action("auth/login", &json!({ "email": email, "password": password }))?;
    Ok(serde_json::from_value(v)?)
}

pub fn register<B: Backend>(api: &B, name: &str, email: &str, password: &str) -> Result<AuthResponse> {
    let v = api.post_action(
        "auth/register",
        &json!({ "name": name, "email": email, "password": password }),
    )?;
    Ok(serde_json::from_value(v)?)
}
