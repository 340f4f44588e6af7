// transport.rs
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde_json::Value;
use std::fmt;
use std::sync::RwLock;
use url::Url;

use crate::config::ClientConfig;
use crate::errors::{ClientError, ClientResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Patch => write!(f, "PATCH"),
        }
    }
}

/// A single call against the marketplace API. `path` is relative to the base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Patch,
            path: path.into(),
            body: Some(body),
        }
    }
}

/// Seam between client logic and the wire. Implementations must be shareable
/// across the worker threads that load feed sections.
pub trait Transport: Send + Sync {
    fn send(&self, req: &ApiRequest) -> ClientResult<Value>;
}

pub struct HttpTransport {
    client: Client,
    base_url: Url,
    token: RwLock<Option<String>>,
}

impl HttpTransport {
    pub fn new(cfg: &ClientConfig) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(cfg.user_agent.as_str())
            .default_headers(headers)
            .timeout(cfg.http_timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: cfg.base_url.clone(),
            token: RwLock::new(None),
        })
    }

    /// Attach (or drop) the bearer token of the signed-in user.
    pub fn set_token(&self, token: Option<String>) {
        match self.token.write() {
            Ok(mut slot) => *slot = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }

    fn current_token(&self) -> Option<String> {
        match self.token.read() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn url_for(&self, path: &str) -> ClientResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::Config(format!("bad endpoint path {path}: {e}")))
    }
}

impl Transport for HttpTransport {
    fn send(&self, req: &ApiRequest) -> ClientResult<Value> {
        let url = self.url_for(&req.path)?;
        let start = std::time::Instant::now();

        let mut builder = match req.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Patch => self.client.patch(url),
        };
        if let Some(token) = self.current_token() {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = &req.body {
            builder = builder.json(body);
        }

        let resp = builder.send()?;
        let status = resp.status();
        let text = resp.text()?;

        log::debug!(
            "{} {} -> {} in {:?}",
            req.method,
            req.path,
            status,
            start.elapsed()
        );

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                path: req.path.clone(),
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text)
            .map_err(|e| ClientError::Decode(format!("{} {}: {e}", req.method, req.path)))
    }
}
