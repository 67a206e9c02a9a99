//! A `WebDriver` session and the commands scoped to it.
//!
//! A [`Session`] is created by [`Client::new_session`](crate::Client::new_session) and owns the
//! session id the remote end assigned. Every command of the session is resolved under
//! `/session/<id>/`. A session is not meant to be driven from several tasks at once: run
//! concurrent browsing through independent sessions.

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::{
    capabilities::Capabilities,
    command::{Command, Endpoint},
    dispatcher::{self, Dispatcher},
    element::{Element, ElementHandle},
    error::{DecodeError, Error, Result},
    locator::Locator,
    rect::Rect,
    reply::Reply,
    timeouts::Timeouts,
    transport::Method,
    webdriver,
};

#[derive(Debug)]
pub struct Session {
    id: String,
    capabilities: Map<String, Value>,
    dispatcher: Dispatcher,
}

impl Session {
    #[must_use]
    pub const fn new(id: String, capabilities: Map<String, Value>, dispatcher: Dispatcher) -> Self {
        Self {
            id,
            capabilities,
            dispatcher,
        }
    }

    /// Creates a session on the remote end.
    ///
    /// The W3C body is tried first. When the remote end rejects it, the request is sent again
    /// with the legacy body. Transport failures are returned as-is.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if both requests are rejected or the reply holds no session id.
    #[instrument(name = "Session::create", skip_all, fields(url = %dispatcher.base()))]
    pub async fn create(dispatcher: Dispatcher, capabilities: &Capabilities) -> Result<Self> {
        debug!("Creating a new Session...");
        let url = dispatcher.url(Endpoint::Root, ["session"])?;
        let w3c = webdriver::NewSessionParameters::w3c(capabilities);

        let reply = match dispatcher.execute(Method::Post, url.clone(), Some(&w3c)).await {
            Ok(reply) => reply,
            Err(error @ (Error::Protocol { .. } | Error::UnexpectedStatus { .. })) => {
                debug!(%error, "Retrying with legacy capabilities");
                let legacy = webdriver::LegacyNewSessionParameters::legacy(capabilities);
                dispatcher.execute(Method::Post, url, Some(&legacy)).await?
            },
            Err(error) => return Err(error),
        };

        let (id, capabilities) = parse_new_session(reply)?;
        debug!(session = %id, "Session created!");

        Ok(Self::new(id, capabilities, dispatcher))
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Capabilities the remote end matched for this session.
    #[must_use]
    pub const fn capabilities(&self) -> &Map<String, Value> {
        &self.capabilities
    }

    /// Sends a command in the scope of this session.
    ///
    /// # Errors
    ///
    /// Returns a transport, protocol, or decode error.
    pub async fn send<C: Command + Sync>(&self, command: &C) -> Result<C::Response> {
        self.dispatcher
            .send(Endpoint::Session(&self.id), command)
            .await
    }

    /// Rebinds a handle to this session.
    #[must_use]
    pub fn element(&self, handle: ElementHandle) -> Element<'_> {
        Element::new(self, handle)
    }

    #[instrument(name = "Session::timeouts", skip(self), fields(session = %self.id))]
    pub async fn timeouts(&self) -> Result<Timeouts> {
        self.send(&webdriver::GetTimeouts::new()).await
    }

    #[instrument(name = "Session::set_timeouts", skip(self), fields(session = %self.id))]
    pub async fn set_timeouts(&self, timeouts: Timeouts) -> Result<()> {
        self.send(&webdriver::SetTimeouts::new(timeouts)).await?;

        Ok(())
    }

    #[instrument(name = "Session::navigate", skip(self), fields(session = %self.id))]
    pub async fn navigate(&self, url: &str) -> Result<()> {
        self.send(&webdriver::Navigate::new(webdriver::NavigateParameters {
            url: url.to_owned(),
        }))
        .await?;

        Ok(())
    }

    #[instrument(name = "Session::current_url", skip(self), fields(session = %self.id))]
    pub async fn current_url(&self) -> Result<String> {
        self.send(&webdriver::GetCurrentUrl::new()).await
    }

    #[instrument(name = "Session::back", skip(self), fields(session = %self.id))]
    pub async fn back(&self) -> Result<()> {
        self.send(&webdriver::Back::new()).await?;

        Ok(())
    }

    #[instrument(name = "Session::forward", skip(self), fields(session = %self.id))]
    pub async fn forward(&self) -> Result<()> {
        self.send(&webdriver::Forward::new()).await?;

        Ok(())
    }

    #[instrument(name = "Session::refresh", skip(self), fields(session = %self.id))]
    pub async fn refresh(&self) -> Result<()> {
        self.send(&webdriver::Refresh::new()).await?;

        Ok(())
    }

    #[instrument(name = "Session::title", skip(self), fields(session = %self.id))]
    pub async fn title(&self) -> Result<String> {
        self.send(&webdriver::GetTitle::new()).await
    }

    #[instrument(name = "Session::window_handle", skip(self), fields(session = %self.id))]
    pub async fn window_handle(&self) -> Result<String> {
        self.send(&webdriver::GetWindowHandle::new()).await
    }

    #[instrument(name = "Session::window_handles", skip(self), fields(session = %self.id))]
    pub async fn window_handles(&self) -> Result<Vec<String>> {
        self.send(&webdriver::GetWindowHandles::new()).await
    }

    /// Closes the current window. Closing the last window ends the session on most remote ends.
    #[instrument(name = "Session::close_window", skip(self), fields(session = %self.id))]
    pub async fn close_window(&self) -> Result<()> {
        self.send(&webdriver::CloseWindow::new()).await?;

        Ok(())
    }

    #[instrument(name = "Session::switch_to_window", skip(self), fields(session = %self.id))]
    pub async fn switch_to_window(&self, handle: &str) -> Result<()> {
        self.send(&webdriver::SwitchToWindow::new(
            webdriver::SwitchToWindowParameters {
                handle: handle.to_owned(),
            },
        ))
        .await?;

        Ok(())
    }

    #[instrument(name = "Session::switch_to_frame", skip(self), fields(session = %self.id))]
    pub async fn switch_to_frame(&self, index: u16) -> Result<()> {
        self.send(&webdriver::SwitchToFrame::new(
            webdriver::SwitchToFrameParameters { id: index },
        ))
        .await?;

        Ok(())
    }

    #[instrument(name = "Session::switch_to_parent_frame", skip(self), fields(session = %self.id))]
    pub async fn switch_to_parent_frame(&self) -> Result<()> {
        self.send(&webdriver::SwitchToParentFrame::new()).await?;

        Ok(())
    }

    #[instrument(name = "Session::window_rect", skip(self), fields(session = %self.id))]
    pub async fn window_rect(&self) -> Result<Rect> {
        self.send(&webdriver::GetWindowRect::new()).await
    }

    /// Moves and resizes the window, fields left to `None` are unchanged.
    /// Returns the rect the window actually got.
    #[instrument(name = "Session::set_window_rect", skip(self), fields(session = %self.id))]
    pub async fn set_window_rect(
        &self,
        rect: webdriver::SetWindowRectParameters,
    ) -> Result<Rect> {
        self.send(&webdriver::SetWindowRect::new(rect)).await
    }

    #[instrument(name = "Session::maximize_window", skip(self), fields(session = %self.id))]
    pub async fn maximize_window(&self) -> Result<Rect> {
        self.send(&webdriver::MaximizeWindow::new()).await
    }

    #[instrument(name = "Session::minimize_window", skip(self), fields(session = %self.id))]
    pub async fn minimize_window(&self) -> Result<Rect> {
        self.send(&webdriver::MinimizeWindow::new()).await
    }

    #[instrument(name = "Session::fullscreen_window", skip(self), fields(session = %self.id))]
    pub async fn fullscreen_window(&self) -> Result<Rect> {
        self.send(&webdriver::FullscreenWindow::new()).await
    }

    #[instrument(name = "Session::find_element", skip(self), fields(session = %self.id))]
    pub async fn find_element(&self, locator: &Locator) -> Result<Element<'_>> {
        let handle = self.send(&webdriver::FindElement::new(locator)).await?;

        Ok(self.element(handle))
    }

    /// Finds every element matching `locator`, an empty list when none matches.
    #[instrument(name = "Session::find_elements", skip(self), fields(session = %self.id))]
    pub async fn find_elements(&self, locator: &Locator) -> Result<Vec<Element<'_>>> {
        let handles = self.send(&webdriver::FindElements::new(locator)).await?;

        Ok(handles
            .into_iter()
            .map(|handle| self.element(handle))
            .collect())
    }

    #[instrument(name = "Session::active_element", skip(self), fields(session = %self.id))]
    pub async fn active_element(&self) -> Result<Element<'_>> {
        let handle = self.send(&webdriver::GetActiveElement::new()).await?;

        Ok(self.element(handle))
    }

    /// Runs a synchronous script in the current browsing context.
    ///
    /// Elements are passed in `args` as their reference object, see
    /// [`ElementHandle::to_reference`].
    #[instrument(
        name = "Session::execute_script",
        skip(self, script, args),
        fields(session = %self.id)
    )]
    pub async fn execute_script<S: Into<String> + Send>(
        &self,
        script: S,
        args: Vec<Value>,
    ) -> Result<Value> {
        self.send(&webdriver::ExecuteScript::new(
            webdriver::ExecuteScriptParameters {
                script: script.into(),
                args,
            },
        ))
        .await
    }

    /// Ends the session on the remote end.
    #[instrument(name = "Session::quit", skip(self), fields(session = %self.id))]
    pub async fn quit(self) -> Result<()> {
        debug!("Deleting session...");
        self.send(&webdriver::DeleteSession::new()).await?;
        debug!("Session deleted!");

        Ok(())
    }
}

/// Extracts the session id and the matched capabilities from a new session reply.
///
/// W3C remote ends nest both in `value`, legacy ones put `sessionId` at the top level and the
/// capabilities in `value`.
fn parse_new_session(reply: Reply) -> Result<(String, Map<String, Value>)> {
    if reply.string("value.sessionId").is_ok() {
        let response: webdriver::NewSessionResponse = dispatcher::decode(reply)?;

        return non_empty(response.session_id, response.capabilities);
    }

    if let Ok(id) = reply.string("sessionId") {
        let capabilities = reply.map("value").cloned().unwrap_or_default();

        return non_empty(id.to_owned(), capabilities);
    }

    Err(DecodeError::MissingSessionId.into())
}

fn non_empty(
    id: String,
    capabilities: Map<String, Value>,
) -> Result<(String, Map<String, Value>)> {
    if id.is_empty() {
        return Err(DecodeError::MissingSessionId.into());
    }

    Ok((id, capabilities))
}
