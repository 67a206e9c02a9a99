//! Readiness of the remote end, as reported by `GET /status`.
//!
//! Two reply dialects exist:
//!
//! - W3C: a boolean `ready` field (`{"value": {"ready": true, "message": "..."}}`).
//! - Legacy: a numeric `status` field where `0` means success.
//!
//! A reply matching neither dialect is never considered ready.

use crate::reply::Reply;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    W3c,
    Legacy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    ready: bool,
    message: Option<String>,
    dialect: Option<Dialect>,
}

impl Status {
    #[must_use]
    pub fn from_reply(reply: &Reply) -> Self {
        let message = reply
            .string("value.message")
            .or_else(|_| reply.string("message"))
            .ok()
            .map(ToOwned::to_owned);

        if let Ok(ready) = reply.bool("value.ready").or_else(|_| reply.bool("ready")) {
            return Self {
                ready,
                message,
                dialect: Some(Dialect::W3c),
            };
        }

        if let Ok(status) = reply.int("status") {
            return Self {
                ready: status == 0,
                message,
                dialect: Some(Dialect::Legacy),
            };
        }

        Self {
            ready: false,
            message,
            dialect: None,
        }
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.ready
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The dialect the reply was recognized as, `None` when unrecognized.
    #[must_use]
    pub const fn dialect(&self) -> Option<Dialect> {
        self.dialect
    }
}
