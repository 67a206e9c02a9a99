//! Error taxonomy of the `WebDriver` client.
//!
//! Every failure is returned to the caller as one [`Error`], and every [`Error`] belongs to exactly
//! one [`ErrorKind`]:
//!
//! - [`ErrorKind::Transport`]: connection refused, network failure, malformed body.
//! - [`ErrorKind::Protocol`]: the remote end rejected the command.
//! - [`ErrorKind::Decode`]: the reply does not have the expected shape.
//! - [`ErrorKind::WaitTimeout`]: a [`Wait`](crate::wait::Wait) ran out of time.
//! - [`ErrorKind::Config`]: invalid client side configuration.

use std::result;

use thiserror::Error;

use crate::{reply, reply::Failure, transport, wait};

/// The category an [`Error`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Transport,
    Protocol,
    Decode,
    WaitTimeout,
    Config,
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error(transparent)]
    Reply(#[from] reply::Error),
    #[error("decode {target} from reply payload failed")]
    Payload {
        target: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("reply carries no session id")]
    MissingSessionId,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] transport::Error),
    #[error("remote end rejected the command (HTTP {status}): {failure}")]
    Protocol { status: u16, failure: Failure },
    #[error("remote end answered with HTTP status {status}")]
    UnexpectedStatus { status: u16 },
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Wait(#[from] wait::Error),
    #[error("invalid remote end url: {url}")]
    InvalidUrl {
        url: String,
        #[source]
        source: Option<url::ParseError>,
    },
}

pub type Result<T, E = Error> = result::Result<T, E>;

impl Error {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) => ErrorKind::Transport,
            Self::Protocol { .. } | Self::UnexpectedStatus { .. } => ErrorKind::Protocol,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Wait(error) => error.kind(),
            Self::InvalidUrl { .. } => ErrorKind::Config,
        }
    }

    /// Returns the remote failure when the remote end rejected the command with an error payload.
    #[must_use]
    pub const fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Protocol { failure, .. } => Some(failure),
            _ => None,
        }
    }

    /// Whether the remote end reported an element reference that is no longer attached to the DOM.
    #[must_use]
    pub fn is_stale_element(&self) -> bool {
        self.failure()
            .and_then(|failure| failure.error.as_deref())
            .is_some_and(|error| error == "stale element reference")
    }
}

impl From<reply::Error> for Error {
    fn from(error: reply::Error) -> Self {
        Self::Decode(DecodeError::Reply(error))
    }
}

#[cfg(test)]
#[cfg_attr(coverage, coverage(off))]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn protocol(error: Option<&str>) -> Error {
        Error::Protocol {
            status: 404,
            failure: Failure {
                error: error.map(ToOwned::to_owned),
                message: "gone".into(),
                stacktrace: None,
            },
        }
    }

    #[test]
    fn test_kinds() {
        assert_eq!(protocol(None).kind(), ErrorKind::Protocol);
        assert_eq!(
            Error::UnexpectedStatus { status: 500 }.kind(),
            ErrorKind::Protocol
        );
        assert_eq!(
            Error::from(DecodeError::MissingSessionId).kind(),
            ErrorKind::Decode
        );
        assert_eq!(
            Error::from(reply::Error::PathNotFound {
                path: "value".into()
            })
            .kind(),
            ErrorKind::Decode
        );
        assert_eq!(
            Error::from(wait::Error::Timeout {
                timeout: Duration::from_secs(1),
                attempts: 1,
                last_error: None,
            })
            .kind(),
            ErrorKind::WaitTimeout
        );
        assert_eq!(
            Error::from(wait::Error::ZeroPollInterval).kind(),
            ErrorKind::Config
        );
        assert_eq!(
            Error::InvalidUrl {
                url: "nope".into(),
                source: None
            }
            .kind(),
            ErrorKind::Config
        );
    }

    #[test]
    fn test_protocol_message_is_preserved() {
        let error = protocol(Some("no such window"));

        assert_eq!(error.failure().map(|f| f.message.as_str()), Some("gone"));
        assert_eq!(
            error.to_string(),
            "remote end rejected the command (HTTP 404): no such window: gone"
        );
    }

    #[test]
    fn test_is_stale_element() {
        assert!(protocol(Some("stale element reference")).is_stale_element());
        assert!(!protocol(Some("no such element")).is_stale_element());
        assert!(!protocol(None).is_stale_element());
        assert!(!Error::UnexpectedStatus { status: 404 }.is_stale_element());
    }
}
