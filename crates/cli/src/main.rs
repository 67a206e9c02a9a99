#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]
#![cfg_attr(coverage, feature(coverage_attribute))]

mod cli;
mod logger;
mod signal;

use color_eyre::eyre::Result;
use marotte_driver::Driver;
use marotte_webdriver::{Session, Wait, conditions};
use tracing::{info, warn};

use crate::cli::MarotteSettings;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let settings = cli::parse();
    logger::install(settings.log_level)?;

    info!("Starting {}...", settings.driver.display());
    let driver = Driver::start(settings.driver_options()).await?;
    info!(
        session = driver.session().id(),
        "Driver listening at http://{}",
        driver.address()
    );

    let outcome = tokio::select! {
        outcome = browse(driver.session(), &settings) => outcome,
        error = signal::interrupted() => {
            warn!("Interrupted, quitting...");
            Err(error.into())
        },
    };

    let status = driver.quit().await?;
    info!("Driver exited with status: {status:?}");

    outcome
}

async fn browse(session: &Session, settings: &MarotteSettings) -> Result<()> {
    info!("Navigating to {}...", settings.url);
    session.navigate(&settings.url).await?;

    if let Some(selector) = &settings.wait_for {
        let wait = Wait::new(settings.timeout(), settings.poll_interval())?;
        let locator = settings.using.locator(selector);

        info!("Waiting for {locator}...");
        let element = wait
            .until(|| conditions::element_to_be_displayed(session, &locator))
            .await?;
        info!(element = element.id(), "{locator} is displayed");
    }

    info!("Title: {}", session.title().await?);
    info!("Current URL: {}", session.current_url().await?);

    Ok(())
}
