use std::{path::PathBuf, time::Duration};

use clap::{Parser, ValueEnum};
use marotte_driver::DriverOptions;
use marotte_webdriver::{Capabilities, Locator};
use serde_json::json;

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Info,
    Debug,
    Trace,
}

impl AsRef<str> for LogLevel {
    fn as_ref(&self) -> &str {
        match self {
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

/// How `--wait-for` is matched against the page.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    Css,
    Id,
    Name,
    Tag,
    LinkText,
    PartialLinkText,
    Xpath,
}

impl Strategy {
    #[must_use]
    pub fn locator(self, value: &str) -> Locator {
        match self {
            Self::Css => Locator::css(value),
            Self::Id => Locator::id(value),
            Self::Name => Locator::name(value),
            Self::Tag => Locator::tag(value),
            Self::LinkText => Locator::link_text(value),
            Self::PartialLinkText => Locator::partial_link_text(value),
            Self::Xpath => Locator::xpath(value),
        }
    }
}

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct MarotteSettings {
    /// WebDriver server binary to launch
    #[arg(long, default_value = "chromedriver", env = "MAROTTE_DRIVER")]
    pub driver: PathBuf,

    /// Browser name requested for the session
    #[arg(long, default_value = "chrome", env = "MAROTTE_BROWSER")]
    pub browser: String,

    /// Page to open
    #[arg(long, env = "MAROTTE_URL")]
    pub url: String,

    /// Element to wait for once the page is open
    #[arg(long)]
    pub wait_for: Option<String>,

    /// Strategy used to locate the `--wait-for` element
    #[arg(value_enum, long, default_value = "css")]
    pub using: Strategy,

    /// Wait timeout, in milliseconds
    #[arg(long, default_value_t = 10_000, env = "MAROTTE_TIMEOUT_MS")]
    pub timeout_ms: u64,

    /// Wait poll interval, in milliseconds
    #[arg(long, default_value_t = 250, env = "MAROTTE_POLL_MS")]
    pub poll_ms: u64,

    /// Run the browser without window
    #[arg(long, env = "MAROTTE_HEADLESS")]
    pub headless: bool,

    /// Log level
    #[arg(value_enum, long, default_value = "info", env = "MAROTTE_LOG_LEVEL")]
    pub log_level: LogLevel,
}

impl MarotteSettings {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_ms)
    }

    /// Session capabilities; `--headless` maps to the vendor options of Chrome and Firefox.
    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        let capabilities = Capabilities::new(self.browser.as_str());

        if !self.headless {
            return capabilities;
        }

        match self.browser.as_str() {
            "chrome" | "chromium" => capabilities
                .with_extension("goog:chromeOptions", json!({"args": ["--headless=new"]})),
            "MicrosoftEdge" | "msedge" => {
                capabilities.with_extension("ms:edgeOptions", json!({"args": ["--headless=new"]}))
            },
            "firefox" => {
                capabilities.with_extension("moz:firefoxOptions", json!({"args": ["-headless"]}))
            },
            _ => capabilities,
        }
    }

    #[must_use]
    pub fn driver_options(&self) -> DriverOptions {
        DriverOptions::new(&self.driver, self.capabilities())
    }
}

pub fn parse() -> MarotteSettings {
    MarotteSettings::parse()
}
