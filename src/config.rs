//! Client configuration.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

pub const ENV_TOKEN: &str = "BOTWIRE_TOKEN";
pub const ENV_API_URL: &str = "BOTWIRE_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "BOTWIRE_TIMEOUT_SECS";
pub const ENV_PROXY: &str = "BOTWIRE_PROXY";

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Bot token issued by @BotFather.
    pub token: String,
    /// Base URL without a trailing slash.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Per-request timeout. `None` keeps the transport default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Proxy URL for every request, e.g. `http://127.0.0.1:3128`.
    #[serde(default)]
    pub proxy: Option<String>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: default_api_url(),
            timeout_secs: None,
            proxy: None,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Read `BOTWIRE_TOKEN` (required), `BOTWIRE_API_URL`,
    /// `BOTWIRE_TIMEOUT_SECS` and `BOTWIRE_PROXY`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(ENV_TOKEN)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Config(format!("{ENV_TOKEN} is not set")))?;
        let mut config = Self::new(token);

        if let Some(url) = lookup(ENV_API_URL) {
            config = config.with_api_url(url);
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let secs = secs.trim().parse().map_err(|_| {
                Error::Config(format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds, got `{secs}`"))
            })?;
            config = config.with_timeout_secs(secs);
        }
        if let Some(proxy) = lookup(ENV_PROXY).filter(|p| !p.is_empty()) {
            config = config.with_proxy(proxy);
        }
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        let config: ClientConfig = serde_json::from_str(&content)?;
        if config.token.is_empty() {
            return Err(Error::Config(format!("{}: token is empty", path.display())));
        }
        let api_url = config.api_url.clone();
        Ok(config.with_api_url(api_url))
    }
}

// Keeps the token out of logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("proxy", &self.proxy)
            .finish()
    }
}
