//! Ready-made conditions for [`Wait::until`](crate::wait::Wait::until).
//!
//! Each condition performs one check and fails with an [`Error`] when the state is not reached
//! yet. The wait treats every failure as "not yet" and polls again.

use std::result;

use thiserror::Error;

use crate::{client::Client, element::Element, locator::Locator, session::Session, status::Status};

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Command(#[from] crate::Error),
    #[error("element located by {0} is not displayed")]
    NotDisplayed(String),
    #[error("remote end not ready: {}", .0.as_deref().unwrap_or("no message"))]
    NotReady(Option<String>),
}

pub type Result<T, E = Error> = result::Result<T, E>;

/// Succeeds with the first element matching `locator`.
pub async fn presence_of_element_located<'s>(
    session: &'s Session,
    locator: &Locator,
) -> Result<Element<'s>> {
    Ok(session.find_element(locator).await?)
}

/// Succeeds with the first element matching `locator`, once it is displayed.
pub async fn element_to_be_displayed<'s>(
    session: &'s Session,
    locator: &Locator,
) -> Result<Element<'s>> {
    let element = presence_of_element_located(session, locator).await?;

    if element.is_displayed().await? {
        Ok(element)
    } else {
        Err(Error::NotDisplayed(locator.to_string()))
    }
}

/// Succeeds with the status of the remote end, once it reports ready.
pub async fn remote_end_ready(client: &Client) -> Result<Status> {
    let status = client.status().await?;

    if status.is_ready() {
        Ok(status)
    } else {
        Err(Error::NotReady(status.message().map(ToOwned::to_owned)))
    }
}
