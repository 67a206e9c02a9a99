//! HTTP transport of the `WebDriver` client.
//!
//! The transport issues exactly one HTTP request per call and hands back the raw status code
//! together with the decoded JSON object. It knows nothing about the protocol itself: error
//! classification and payload extraction belong to the [`dispatcher`](crate::dispatcher).
//! There are no retries at this layer.

use std::{fmt, result};

use reqwest::{Client as HttpClient, header::CONTENT_TYPE};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, trace};
use url::Url;

#[derive(Error, Debug)]
pub enum Error {
    #[error("build HTTP client failed")]
    BuildClient(#[source] reqwest::Error),
    #[error("convert request body to json failed")]
    ConvertJson(#[source] serde_json::Error),
    #[error("send {method} request to {url} failed")]
    SendRequest {
        method: Method,
        url: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("read response body from {url} failed")]
    ReadBody {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
    #[error("parse response body from {url} failed")]
    ParseBody {
        url: Url,
        #[source]
        source: serde_json::Error,
    },
    #[error("expected a JSON object from {url}, got: {found}")]
    NotAnObject { url: Url, found: &'static str },
}

pub type Result<T, E = Error> = result::Result<T, E>;

/// HTTP methods used by the `WebDriver` protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    const fn as_http(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_http().as_str())
    }
}

/// Raw outcome of one HTTP exchange: the status code and the decoded JSON object.
pub type Exchange = (u16, Map<String, Value>);

/// Sends JSON requests to a remote end.
///
/// Cloning a transport is cheap, clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct Transport {
    http: HttpClient,
}

impl Transport {
    /// Creates a transport backed by a default HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an [`Error::BuildClient`] if the HTTP client cannot be initialized.
    pub fn new() -> Result<Self> {
        HttpClient::builder()
            .build()
            .map(Self::with_client)
            .map_err(Error::BuildClient)
    }

    /// Creates a transport backed by the given HTTP client.
    #[must_use]
    pub const fn with_client(http: HttpClient) -> Self {
        Self { http }
    }

    /// Sends one request and decodes the response body.
    ///
    /// - `POST` with a body sends it as `application/json`.
    /// - `POST` without a body sends an empty payload.
    /// - `GET` and `DELETE` never send a body.
    ///
    /// A zero-length response body decodes to an empty object. Any other body must be a JSON object.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the request cannot be sent, or if the body cannot be read or decoded.
    pub async fn send<B>(&self, method: Method, url: Url, body: Option<&B>) -> Result<Exchange>
    where
        B: Serialize + Sync + ?Sized,
    {
        let mut request = self.http.request(method.as_http(), url.clone());

        if method == Method::Post {
            request = match body {
                Some(body) => {
                    let json = serde_json::to_vec(body).map_err(Error::ConvertJson)?;
                    trace!(body = %String::from_utf8_lossy(&json), "Request body");
                    request.header(CONTENT_TYPE, "application/json").body(json)
                },
                None => request.body(Vec::new()),
            };
        }

        debug!(%method, %url, "Send request");
        let response = request.send().await.map_err(|source| Error::SendRequest {
            method,
            url: url.clone(),
            source,
        })?;

        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|source| Error::ReadBody {
            url: url.clone(),
            source,
        })?;
        debug!(status, length = bytes.len(), "Got response");

        Ok((status, decode(&url, &bytes)?))
    }
}

fn decode(url: &Url, bytes: &[u8]) -> Result<Map<String, Value>> {
    if bytes.is_empty() {
        return Ok(Map::new());
    }

    let value: Value = serde_json::from_slice(bytes).map_err(|source| Error::ParseBody {
        url: url.clone(),
        source,
    })?;

    match value {
        Value::Object(object) => Ok(object),
        other => Err(Error::NotAnObject {
            url: url.clone(),
            found: json_type(&other),
        }),
    }
}

pub(crate) const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[cfg_attr(coverage, coverage(off))]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, header, method, path},
    };

    use super::*;

    fn url(server: &MockServer, path: &str) -> Url {
        Url::parse(&format!("{}{path}", server.uri())).expect("Valid mock url")
    }

    #[tokio::test]
    async fn test_post_with_body_sends_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/session/abc/url"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"url": "https://example.com"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": null})))
            .expect(1)
            .mount(&server)
            .await;

        let transport = Transport::new().unwrap();
        let (status, body) = transport
            .send(
                Method::Post,
                url(&server, "/session/abc/url"),
                Some(&json!({"url": "https://example.com"})),
            )
            .await
            .expect("Request should succeed");

        assert_eq!(status, 200);
        assert_eq!(body.get("value"), Some(&Value::Null));
    }

    #[tokio::test]
    async fn test_post_without_body_sends_empty_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/session/abc/back"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": null})))
            .mount(&server)
            .await;

        let transport = Transport::new().unwrap();
        transport
            .send::<Value>(Method::Post, url(&server, "/session/abc/back"), None)
            .await
            .expect("Request should succeed");

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].body.is_empty(), "Body should be empty");
        assert!(
            requests[0].headers.get("content-type").is_none(),
            "Empty payload should not be typed"
        );
    }

    #[tokio::test]
    async fn test_delete_never_sends_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/session/abc"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let transport = Transport::new().unwrap();
        transport
            .send(
                Method::Delete,
                url(&server, "/session/abc"),
                Some(&json!({"ignored": true})),
            )
            .await
            .expect("Request should succeed");

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].body.is_empty(), "DELETE should not carry a body");
    }

    #[tokio::test]
    async fn test_empty_body_decodes_to_empty_object() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let transport = Transport::new().unwrap();
        let (status, body) = transport
            .send::<Value>(Method::Delete, url(&server, "/session/abc"), None)
            .await
            .expect("Empty body should be tolerated");

        assert_eq!(status, 200);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_is_not_a_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"value": {}})))
            .mount(&server)
            .await;

        let transport = Transport::new().unwrap();
        let (status, _) = transport
            .send::<Value>(Method::Get, url(&server, "/status"), None)
            .await
            .expect("HTTP error status should still decode");

        assert_eq!(status, 404);
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
            .mount(&server)
            .await;

        let transport = Transport::new().unwrap();
        let error = transport
            .send::<Value>(Method::Get, url(&server, "/status"), None)
            .await
            .unwrap_err();

        assert!(
            matches!(error, Error::ParseBody { .. }),
            "Expected ParseBody, got: {error:?}"
        );
    }

    #[tokio::test]
    async fn test_non_object_body_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["a", "b"])))
            .mount(&server)
            .await;

        let transport = Transport::new().unwrap();
        let error = transport
            .send::<Value>(Method::Get, url(&server, "/status"), None)
            .await
            .unwrap_err();

        assert!(
            matches!(error, Error::NotAnObject { found: "array", .. }),
            "Expected NotAnObject, got: {error:?}"
        );
    }

    #[tokio::test]
    async fn test_connection_refused_is_a_send_error() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .and_then(|listener| listener.local_addr())
            .unwrap()
            .port();
        let url = Url::parse(&format!("http://127.0.0.1:{port}/status")).unwrap();

        let transport = Transport::new().unwrap();
        let error = transport
            .send::<Value>(Method::Get, url, None)
            .await
            .unwrap_err();

        assert!(
            matches!(error, Error::SendRequest { method: Method::Get, .. }),
            "Expected SendRequest, got: {error:?}"
        );
    }

    #[test]
    fn test_method_display() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Post.to_string(), "POST");
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }
}
