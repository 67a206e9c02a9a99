//! Global tracing subscriber of the `marotte` binary.
//!
//! The level applies to the binary and to the `marotte_webdriver` and `marotte_driver` crates, at
//! `trace` the driver output is logged too. Other crates stay silent.

use std::result;

use thiserror::Error;
use tracing::subscriber::{SetGlobalDefaultError, set_global_default};
use tracing_subscriber::{EnvFilter, Registry, fmt::layer, layer::SubscriberExt};

#[derive(Error, Debug)]
pub enum Error {
    #[error("setup tracing failed")]
    SetGlobalDefault(#[source] SetGlobalDefaultError),
}

pub type Result<T, E = Error> = result::Result<T, E>;

fn directives(log_level: &str) -> String {
    ["marotte_cli", "marotte_webdriver", "marotte_driver"]
        .map(|target| format!("{target}={log_level}"))
        .join(",")
}

/// Installs the global subscriber, with file names and line numbers in every event.
pub fn install<L: AsRef<str>>(log_level: L) -> Result<()> {
    let env_filter = EnvFilter::new(directives(log_level.as_ref()));
    let format_layer = layer().with_file(true).with_line_number(true);

    set_global_default(Registry::default().with(env_filter).with(format_layer))
        .map_err(Error::SetGlobalDefault)
}
