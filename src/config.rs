// src/config.rs
use crate::errors::ClientError;
use std::time::Duration;
use url::Url;

const DEFAULT_USER_AGENT: &str = "estate-feed/0.1";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Root of the marketplace REST API. Endpoint paths are joined onto it.
    pub base_url: Url,
    /// SQLite file holding favorites, the session record and status flags.
    pub db_path: String,
    pub http_timeout: Duration,
    pub user_agent: String,
    /// First retry delay of the comments poller.
    pub poll_base: Duration,
    /// Upper bound for the comments poller delay.
    pub poll_max: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("http://127.0.0.1:8000/api/").expect("static url"),
            db_path: "estate_feed.sqlite3".to_string(),
            http_timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            poll_base: Duration::from_secs(5),
            poll_max: Duration::from_secs(60),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `ESTATE_*` environment variables.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ClientConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(raw) = lookup("ESTATE_API_BASE_URL") {
            cfg.base_url = parse_base_url(&raw)?;
        }
        if let Some(path) = lookup("ESTATE_DB_PATH") {
            cfg.db_path = path;
        }
        if let Some(ua) = lookup("ESTATE_USER_AGENT") {
            cfg.user_agent = ua;
        }
        if let Some(secs) = secs_var(&lookup, "ESTATE_HTTP_TIMEOUT_SECS")? {
            cfg.http_timeout = secs;
        }
        if let Some(secs) = secs_var(&lookup, "ESTATE_POLL_BASE_SECS")? {
            cfg.poll_base = secs;
        }
        if let Some(secs) = secs_var(&lookup, "ESTATE_POLL_MAX_SECS")? {
            cfg.poll_max = secs;
        }

        if cfg.poll_base.is_zero() {
            return Err(ClientError::Config(
                "ESTATE_POLL_BASE_SECS must be at least 1".into(),
            ));
        }
        if cfg.poll_base > cfg.poll_max {
            return Err(ClientError::Config(format!(
                "poll base {:?} exceeds poll max {:?}",
                cfg.poll_base, cfg.poll_max
            )));
        }

        Ok(cfg)
    }
}

/// Parse a base URL, forcing a trailing slash so `Url::join` keeps the path prefix.
pub fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&with_slash).map_err(|e| ClientError::Config(format!("bad base url {raw}: {e}")))
}

fn secs_var<F>(lookup: &F, name: &str) -> Result<Option<Duration>, ClientError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(v) => v
            .trim()
            .parse::<u64>()
            .map(|s| Some(Duration::from_secs(s)))
            .map_err(|_| ClientError::Config(format!("{name} must be a whole number of seconds"))),
        None => Ok(None),
    }
}
