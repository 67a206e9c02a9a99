//! Capabilities requested when creating a session.
//!
//! Standard capabilities are typed; vendor extensions (`goog:chromeOptions`,
//! `moz:firefoxOptions`, ...) are kept as raw JSON in [`Capabilities::extensions`] and sent as-is.

use std::{fmt, result, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::timeouts::Timeouts;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("invalid page load strategy: {0}")]
    InvalidPageLoadStrategy(String),
    #[error("invalid proxy type: {0}")]
    InvalidProxyType(String),
}

pub type Result<T, E = Error> = result::Result<T, E>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageLoadStrategy {
    None,
    Eager,
    Normal,
}

impl FromStr for PageLoadStrategy {
    type Err = Error;

    fn from_str(strategy: &str) -> Result<Self> {
        match strategy {
            "none" => Ok(Self::None),
            "eager" => Ok(Self::Eager),
            "normal" => Ok(Self::Normal),
            other => Err(Error::InvalidPageLoadStrategy(other.to_owned())),
        }
    }
}

impl fmt::Display for PageLoadStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Eager => "eager",
            Self::Normal => "normal",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyType {
    Pac,
    Direct,
    AutoDetect,
    System,
    Manual,
}

impl FromStr for ProxyType {
    type Err = Error;

    fn from_str(kind: &str) -> Result<Self> {
        match kind {
            "pac" => Ok(Self::Pac),
            "direct" => Ok(Self::Direct),
            "autodetect" => Ok(Self::AutoDetect),
            "system" => Ok(Self::System),
            "manual" => Ok(Self::Manual),
            other => Err(Error::InvalidProxyType(other.to_owned())),
        }
    }
}

impl fmt::Display for ProxyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pac => "pac",
            Self::Direct => "direct",
            Self::AutoDetect => "autodetect",
            Self::System => "system",
            Self::Manual => "manual",
        })
    }
}

/// The `proxy` capability.
///
/// Hosts are `host[:port]`. `proxy_autoconfig_url` only applies to [`ProxyType::Pac`], the
/// per-scheme hosts and `no_proxy` only to [`ProxyType::Manual`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proxy {
    pub proxy_type: ProxyType,
    #[serde(rename = "proxyAutoconfigUrl", skip_serializing_if = "Option::is_none")]
    pub proxy_autoconfig_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ftp_proxy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_proxy: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub no_proxy: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_proxy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socks_proxy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socks_version: Option<u8>,
}

impl Proxy {
    #[must_use]
    pub const fn new(proxy_type: ProxyType) -> Self {
        Self {
            proxy_type,
            proxy_autoconfig_url: None,
            ftp_proxy: None,
            http_proxy: None,
            no_proxy: Vec::new(),
            ssl_proxy: None,
            socks_proxy: None,
            socks_version: None,
        }
    }

    /// Proxy configured by the auto-config file at `url`.
    pub fn pac<U: Into<String>>(url: U) -> Self {
        Self {
            proxy_autoconfig_url: Some(url.into()),
            ..Self::new(ProxyType::Pac)
        }
    }

    /// Same proxy for HTTP and HTTPS.
    pub fn manual<H: Into<String>>(host: H) -> Self {
        let host = host.into();

        Self {
            http_proxy: Some(host.clone()),
            ssl_proxy: Some(host),
            ..Self::new(ProxyType::Manual)
        }
    }

    #[must_use]
    pub fn with_socks<H: Into<String>>(mut self, host: H, version: u8) -> Self {
        self.socks_proxy = Some(host.into());
        self.socks_version = Some(version);
        self
    }

    /// Adds a host reached without proxy.
    #[must_use]
    pub fn with_no_proxy<H: Into<String>>(mut self, host: H) -> Self {
        self.no_proxy.push(host.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept_insecure_certs: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_load_strategy: Option<PageLoadStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<Proxy>,
    #[serde(rename = "setWindowRect", skip_serializing_if = "Option::is_none")]
    pub set_window_rect: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeouts: Option<Timeouts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unhandled_prompt_behavior: Option<String>,
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl Capabilities {
    pub fn new<B: Into<String>>(browser_name: B) -> Self {
        Self {
            browser_name: Some(browser_name.into()),
            ..Self::default()
        }
    }

    /// Adds or replaces a vendor extension capability.
    #[must_use]
    pub fn with_extension<K: Into<String>>(mut self, key: K, value: Value) -> Self {
        self.extensions.insert(key.into(), value);
        self
    }

    #[must_use]
    pub const fn with_page_load_strategy(mut self, strategy: PageLoadStrategy) -> Self {
        self.page_load_strategy = Some(strategy);
        self
    }

    #[must_use]
    pub fn with_proxy(mut self, proxy: Proxy) -> Self {
        self.proxy = Some(proxy);
        self
    }

    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = Some(timeouts);
        self
    }

    #[must_use]
    pub const fn with_accept_insecure_certs(mut self, accept: bool) -> Self {
        self.accept_insecure_certs = Some(accept);
        self
    }
}
