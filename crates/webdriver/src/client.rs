use tracing::{debug, instrument};

use crate::{
    capabilities::Capabilities,
    command::Endpoint,
    conditions,
    dispatcher::Dispatcher,
    error::Result,
    session::Session,
    status::Status,
    transport::{Method, Transport},
    wait::Wait,
};

/// Entry point to a remote end: probes its readiness and opens sessions on it.
#[derive(Debug, Clone)]
pub struct Client {
    dispatcher: Dispatcher,
}

impl Client {
    /// Creates a client for the remote end listening at `url`, e.g. `http://127.0.0.1:9515`.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`](crate::Error) if `url` cannot be used as a base URL.
    pub fn new(url: &str) -> Result<Self> {
        Ok(Self {
            dispatcher: Dispatcher::new(url)?,
        })
    }

    /// Creates a client sending its requests through a preconfigured HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`](crate::Error) if `url` cannot be used as a base URL.
    pub fn with_http_client(url: &str, http: reqwest::Client) -> Result<Self> {
        Ok(Self {
            dispatcher: Dispatcher::with_transport(url, Transport::with_client(http))?,
        })
    }

    #[must_use]
    pub const fn url(&self) -> &url::Url {
        self.dispatcher.base()
    }

    /// Probes `GET /status`.
    ///
    /// The reply is not classified: a status reply carries a `message` even when the remote end
    /// is ready.
    #[instrument(name = "Client::status", skip(self), fields(url = %self.url()))]
    pub async fn status(&self) -> Result<Status> {
        let url = self.dispatcher.url(Endpoint::Root, ["status"])?;
        let reply = self.dispatcher.exchange::<()>(Method::Get, url, None).await?;
        let status = Status::from_reply(&reply);
        debug!(?status, "Remote end status");

        Ok(status)
    }

    pub async fn is_ready(&self) -> Result<bool> {
        Ok(self.status().await?.is_ready())
    }

    /// Polls the status until the remote end reports ready.
    ///
    /// Probe failures and "not ready" replies both keep the polling going.
    ///
    /// # Errors
    ///
    /// Returns a wait timeout error carrying the last probe failure.
    #[instrument(name = "Client::wait_until_ready", skip(self), fields(url = %self.url()))]
    pub async fn wait_until_ready(&self, wait: &Wait) -> Result<Status> {
        Ok(wait.until(|| conditions::remote_end_ready(self)).await?)
    }

    /// Opens a new session, see [`Session::create`].
    #[instrument(name = "Client::new_session", skip_all, fields(url = %self.url()))]
    pub async fn new_session(&self, capabilities: &Capabilities) -> Result<Session> {
        Session::create(self.dispatcher.clone(), capabilities).await
    }
}
