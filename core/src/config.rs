//! Client configuration.
//!
//! Set once at construction and read-only afterwards. Transports and codecs
//! copy what they need out of it, so one config can seed any number of
//! clients.

use std::time::Duration;

use url::Url;

use crate::error::{ApiError, Result};

pub const BASE_URL_ENV: &str = "RESOURCE_API_BASE_URL";
pub const TIMEOUT_ENV: &str = "RESOURCE_API_TIMEOUT_SECS";
pub const PRETTY_ENV: &str = "RESOURCE_API_PRETTY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Absolute http(s) URL, always ending in `/`.
    pub base_url: Url,
    /// Pretty-print outgoing JSON. Cosmetic only.
    pub pretty: bool,
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base(base_url)?,
            pretty: false,
            timeout: None,
            user_agent: default_user_agent(),
        })
    }

    /// Build from `RESOURCE_API_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base = lookup(BASE_URL_ENV)
            .ok_or_else(|| ApiError::InvalidArgument(format!("{BASE_URL_ENV} is not set")))?;
        let mut config = Self::new(&base)?;

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ApiError::InvalidArgument(format!("{TIMEOUT_ENV} must be whole seconds, got {raw:?}"))
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        if let Some(raw) = lookup(PRETTY_ENV) {
            config.pretty = matches!(raw.trim(), "1" | "true" | "yes");
        }
        Ok(config)
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

fn default_user_agent() -> String {
    format!("resource-client/{}", env!("CARGO_PKG_VERSION"))
}

fn normalize_base(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| ApiError::InvalidArgument(format!("invalid base address {raw:?}: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::InvalidArgument(format!(
            "base address must be http or https, got {:?}",
            url.scheme()
        )));
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(ApiError::InvalidArgument(format!(
            "base address {raw:?} has no host"
        )));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ApiError::InvalidArgument(format!(
            "base address {raw:?} must not carry a query or fragment"
        )));
    }

    // Without the trailing slash `Url::join` would replace the last segment.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
