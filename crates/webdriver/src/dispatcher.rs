//! Module for executing [`Command`]s against a remote end.
//!
//! The dispatcher composes the [`Transport`] and the [`Reply`] decoding into the full command
//! path: resolve the endpoint URL, send, decode, classify, and extract the `value` payload.
//! Every call ends in exactly one of: a decoded payload, a protocol error (remote message kept
//! verbatim), or a transport error. Callers never look at the HTTP status themselves.

use std::any::type_name;

use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;
use url::Url;

use crate::{
    command::{Command, Endpoint},
    error::{DecodeError, Error, Result},
    reply::Reply,
    transport::{Method, Transport},
};

#[derive(Debug, Clone)]
pub struct Dispatcher {
    transport: Transport,
    base: Url,
}

impl Dispatcher {
    /// Creates a dispatcher for the remote end listening at `url`.
    ///
    /// # Errors
    ///
    /// Returns an [`Error::InvalidUrl`] if `url` cannot be used as a base URL, or a transport
    /// error if the HTTP client cannot be initialized.
    pub fn new(url: &str) -> Result<Self> {
        Self::with_transport(url, Transport::new()?)
    }

    /// Creates a dispatcher sending its requests through `transport`.
    ///
    /// # Errors
    ///
    /// Returns an [`Error::InvalidUrl`] if `url` cannot be used as a base URL.
    pub fn with_transport(url: &str, transport: Transport) -> Result<Self> {
        let base = Url::parse(url).map_err(|source| Error::InvalidUrl {
            url: url.to_owned(),
            source: Some(source),
        })?;

        if base.cannot_be_a_base() {
            return Err(Error::InvalidUrl {
                url: url.to_owned(),
                source: None,
            });
        }

        Ok(Self { transport, base })
    }

    #[must_use]
    pub const fn base(&self) -> &Url {
        &self.base
    }

    /// Resolves command path segments in the given scope. Each segment is pushed as is and
    /// percent-encoded, a `/` inside a segment does not start a new one.
    ///
    /// # Errors
    ///
    /// Returns an [`Error::InvalidUrl`] if the base URL cannot hold path segments.
    pub fn url<I>(&self, endpoint: Endpoint<'_>, path: I) -> Result<Url>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut url = self.base.clone();

        {
            let mut segments = url.path_segments_mut().map_err(|()| Error::InvalidUrl {
                url: self.base.to_string(),
                source: None,
            })?;
            segments.pop_if_empty();

            if let Endpoint::Session(session) = endpoint {
                segments.push("session").push(session);
            }

            segments.extend(path);
        }

        Ok(url)
    }

    /// Sends one request and returns the reply without classifying it.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the exchange fails.
    pub async fn exchange<B>(&self, method: Method, url: Url, body: Option<&B>) -> Result<Reply>
    where
        B: Serialize + Sync + ?Sized,
    {
        let (status, data) = self.transport.send(method, url, body).await?;

        Ok(Reply::new(status, data))
    }

    /// Sends one request and classifies the reply.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the exchange fails, or a protocol error if the remote end
    /// rejected the request.
    pub async fn execute<B>(&self, method: Method, url: Url, body: Option<&B>) -> Result<Reply>
    where
        B: Serialize + Sync + ?Sized,
    {
        classify(self.exchange(method, url, body).await?)
    }

    /// Sends a typed command and decodes its `value` payload.
    ///
    /// # Errors
    ///
    /// Returns a transport, protocol, or decode error.
    pub async fn send<C>(&self, endpoint: Endpoint<'_>, command: &C) -> Result<C::Response>
    where
        C: Command + Sync,
    {
        let segments = command.segments();
        debug!(method = %C::METHOD, path = %segments.join("/"), "Dispatch command");

        let url = self.url(endpoint, &segments)?;
        let reply = self.execute(C::METHOD, url, command.parameters()).await?;
        let response = decode(reply)?;
        debug!(?response, "Command succeeded");

        Ok(response)
    }
}

/// Classifies a reply as success or protocol error.
///
/// An error message in the payload wins over the HTTP status: a `200` carrying a message is
/// still a failure. Without message, any status other than `200` is the error signal.
///
/// # Errors
///
/// Returns [`Error::Protocol`] or [`Error::UnexpectedStatus`].
pub fn classify(reply: Reply) -> Result<Reply> {
    if let Some(failure) = reply.failure() {
        debug!(status = reply.status(), %failure, "Command rejected");
        return Err(Error::Protocol {
            status: reply.status(),
            failure,
        });
    }

    if reply.status() != 200 {
        debug!(status = reply.status(), "Unexpected status");
        return Err(Error::UnexpectedStatus {
            status: reply.status(),
        });
    }

    Ok(reply)
}

/// Decodes the `value` payload of a reply; an absent `value` decodes from `null`.
///
/// # Errors
///
/// Returns a [`DecodeError::Payload`] if the payload does not match `T`.
pub fn decode<T: DeserializeOwned>(reply: Reply) -> Result<T> {
    serde_json::from_value(reply.into_value()).map_err(|source| {
        Error::Decode(DecodeError::Payload {
            target: type_name::<T>(),
            source,
        })
    })
}

#[cfg(test)]
#[cfg_attr(coverage, coverage(off))]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use serde_json::{Value, json};
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, method, path},
    };

    use super::*;
    use crate::{
        element::{ElementHandle, W3C_ELEMENT_KEY},
        error::ErrorKind,
        webdriver,
    };

    #[test]
    fn test_url_root_and_session_scopes() {
        let dispatcher = Dispatcher::new("http://127.0.0.1:9515").unwrap();

        assert_eq!(
            dispatcher.url(Endpoint::Root, ["status"]).unwrap().as_str(),
            "http://127.0.0.1:9515/status"
        );
        assert_eq!(
            dispatcher
                .url(Endpoint::Session("abc"), ["element", "e1", "click"])
                .unwrap()
                .as_str(),
            "http://127.0.0.1:9515/session/abc/element/e1/click"
        );
        assert_eq!(
            dispatcher
                .url(Endpoint::Session("abc"), std::iter::empty::<&str>())
                .unwrap()
                .as_str(),
            "http://127.0.0.1:9515/session/abc"
        );
    }

    #[test]
    fn test_url_keeps_base_path() {
        let dispatcher = Dispatcher::new("http://localhost:4444/wd/hub/").unwrap();

        assert_eq!(
            dispatcher.url(Endpoint::Session("s"), ["url"]).unwrap().as_str(),
            "http://localhost:4444/wd/hub/session/s/url"
        );
    }

    #[test]
    fn test_url_encodes_segments() {
        let dispatcher = Dispatcher::new("http://127.0.0.1:9515").unwrap();

        assert_eq!(
            dispatcher
                .url(Endpoint::Session("a b"), ["element", "x", "css", "font size"])
                .unwrap()
                .as_str(),
            "http://127.0.0.1:9515/session/a%20b/element/x/css/font%20size"
        );
    }

    #[test]
    fn test_url_keeps_bound_values_whole() {
        let dispatcher = Dispatcher::new("http://127.0.0.1:9515").unwrap();
        let element = ElementHandle::new("", W3C_ELEMENT_KEY);

        let command = webdriver::GetElementAttribute::new(&element, "data/x");
        assert_eq!(
            dispatcher
                .url(Endpoint::Session("abc"), command.segments())
                .unwrap()
                .as_str(),
            "http://127.0.0.1:9515/session/abc/element//attribute/data%2Fx"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let error = Dispatcher::new("not a url").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Config);

        let error = Dispatcher::new("mailto:driver@example.com").unwrap_err();
        assert!(matches!(error, Error::InvalidUrl { source: None, .. }));
    }

    #[tokio::test]
    async fn test_send_decodes_value() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/session/abc/title"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": "Example"})))
            .mount(&server)
            .await;

        let dispatcher = Dispatcher::new(&server.uri()).unwrap();
        let title = dispatcher
            .send(Endpoint::Session("abc"), &webdriver::GetTitle::new())
            .await
            .expect("Should get title");

        assert_eq!(title, "Example");
    }

    #[tokio::test]
    async fn test_send_serializes_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/session/abc/url"))
            .and(body_json(json!({"url": "https://example.com"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": null})))
            .expect(1)
            .mount(&server)
            .await;

        let dispatcher = Dispatcher::new(&server.uri()).unwrap();
        dispatcher
            .send(
                Endpoint::Session("abc"),
                &webdriver::Navigate::new(webdriver::NavigateParameters {
                    url: "https://example.com".into(),
                }),
            )
            .await
            .expect("Should navigate");
    }

    #[tokio::test]
    async fn test_message_with_success_status_is_a_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"value": {"message": "no such element"}})),
            )
            .mount(&server)
            .await;

        let dispatcher = Dispatcher::new(&server.uri()).unwrap();
        let error = dispatcher
            .send(Endpoint::Session("abc"), &webdriver::GetTitle::new())
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Protocol);
        assert_eq!(
            error.failure().map(|failure| failure.message.as_str()),
            Some("no such element")
        );
    }

    #[tokio::test]
    async fn test_w3c_error_payload_is_kept_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "value": {
                    "error": "invalid session id",
                    "message": "invalid session id",
                    "stacktrace": "#0 0x55d5 <unknown>",
                }
            })))
            .mount(&server)
            .await;

        let dispatcher = Dispatcher::new(&server.uri()).unwrap();
        let error = dispatcher
            .send(Endpoint::Session("gone"), &webdriver::GetTitle::new())
            .await
            .unwrap_err();

        match error {
            Error::Protocol { status, failure } => {
                assert_eq!(status, 404);
                assert_eq!(failure.error.as_deref(), Some("invalid session id"));
                assert_eq!(failure.stacktrace.as_deref(), Some("#0 0x55d5 <unknown>"));
            },
            error => panic!("Expected Protocol, got: {error:?}"),
        }
    }

    #[tokio::test]
    async fn test_error_status_without_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let dispatcher = Dispatcher::new(&server.uri()).unwrap();
        let error = dispatcher
            .send(Endpoint::Session("abc"), &webdriver::GetTitle::new())
            .await
            .unwrap_err();

        assert!(matches!(error, Error::UnexpectedStatus { status: 500 }));
        assert_eq!(error.kind(), ErrorKind::Protocol);
    }

    #[tokio::test]
    async fn test_unexpected_payload_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": 42})))
            .mount(&server)
            .await;

        let dispatcher = Dispatcher::new(&server.uri()).unwrap();
        let error = dispatcher
            .send(Endpoint::Session("abc"), &webdriver::GetTitle::new())
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Decode);
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"value\":"))
            .mount(&server)
            .await;

        let dispatcher = Dispatcher::new(&server.uri()).unwrap();
        let error = dispatcher
            .send(Endpoint::Session("abc"), &webdriver::GetTitle::new())
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Transport);
    }

    #[test]
    fn test_decode_missing_value_as_null() {
        let reply = Reply::new(200, serde_json::Map::new());

        assert_eq!(decode::<Value>(reply).unwrap(), Value::Null);
    }
}
