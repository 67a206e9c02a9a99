//! Module for the decoded reply envelope of a `WebDriver` command.
//!
//! Every response of the remote end is a JSON object such as
//! `{ "sessionId"?, "status"?, "value": ... }`. A [`Reply`] wraps that object with typed accessors
//! addressed by dotted paths (`"value.message"`), and with the extraction of the remote
//! [`Failure`] carried by error payloads.
//!
//! A missing path and a value of the wrong type are two distinct errors: callers rely on
//! [`Error::PathNotFound`] to tell "no such field" apart from a field they cannot use.

use std::{collections::HashMap, fmt, result};

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::transport::json_type;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("path not found in reply: '{path}'")]
    PathNotFound { path: String },
    #[error("expected {expected} at '{path}', got: {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
}

pub type Result<T, E = Error> = result::Result<T, E>;

/// Error payload returned by the remote end when it rejects a command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Failure {
    #[serde(default)]
    pub error: Option<String>,
    pub message: String,
    #[serde(default)]
    pub stacktrace: Option<String>,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            Some(error) => write!(f, "{error}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// A decoded response: the HTTP status code and the JSON object of the body.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    status: u16,
    data: Map<String, Value>,
}

impl Reply {
    #[must_use]
    pub const fn new(status: u16, data: Map<String, Value>) -> Self {
        Self { status, data }
    }

    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    #[must_use]
    pub const fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Resolves a dotted path, walking nested objects key by key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PathNotFound`] if a key is missing or an intermediate node is not an object.
    pub fn get(&self, path: &str) -> Result<&Value> {
        let not_found = || Error::PathNotFound {
            path: path.to_owned(),
        };
        let mut keys = path.split('.');
        let first = keys.next().ok_or_else(not_found)?;
        let mut node = self.data.get(first).ok_or_else(not_found)?;

        for key in keys {
            node = node
                .as_object()
                .and_then(|object| object.get(key))
                .ok_or_else(not_found)?;
        }

        Ok(node)
    }

    pub fn string(&self, path: &str) -> Result<&str> {
        let value = self.get(path)?;
        value
            .as_str()
            .ok_or_else(|| mismatch(path, "string", value))
    }

    pub fn bool(&self, path: &str) -> Result<bool> {
        let value = self.get(path)?;
        value
            .as_bool()
            .ok_or_else(|| mismatch(path, "bool", value))
    }

    pub fn float(&self, path: &str) -> Result<f64> {
        let value = self.get(path)?;
        value
            .as_f64()
            .ok_or_else(|| mismatch(path, "number", value))
    }

    pub fn int(&self, path: &str) -> Result<i64> {
        let value = self.get(path)?;
        value
            .as_i64()
            .ok_or_else(|| mismatch(path, "integer", value))
    }

    pub fn map(&self, path: &str) -> Result<&Map<String, Value>> {
        let value = self.get(path)?;
        value
            .as_object()
            .ok_or_else(|| mismatch(path, "object", value))
    }

    /// Returns the object at `path` as a map of strings; every entry must be a string.
    pub fn string_map(&self, path: &str) -> Result<HashMap<String, String>> {
        self.map(path)?
            .iter()
            .map(|(key, value)| {
                value
                    .as_str()
                    .map(|string| (key.clone(), string.to_owned()))
                    .ok_or_else(|| mismatch(&format!("{path}.{key}"), "string", value))
            })
            .collect()
    }

    /// Returns the array at `path` as a list of strings; every item must be a string.
    pub fn string_list(&self, path: &str) -> Result<Vec<String>> {
        let value = self.get(path)?;
        value
            .as_array()
            .ok_or_else(|| mismatch(path, "array", value))?
            .iter()
            .map(|item| {
                item.as_str()
                    .map(ToOwned::to_owned)
                    .ok_or_else(|| mismatch(path, "array of strings", item))
            })
            .collect()
    }

    /// Returns the remote failure carried by this reply, if any.
    ///
    /// A reply is a failure as soon as a message string is present at `value.message`, whatever
    /// the HTTP status. The legacy dialect nests its error object under `value` too, so both are
    /// read from the same place.
    #[must_use]
    pub fn failure(&self) -> Option<Failure> {
        let message = self.string("value.message").ok()?;

        Some(Failure {
            error: self.string("value.error").ok().map(ToOwned::to_owned),
            message: message.to_owned(),
            stacktrace: self.string("value.stacktrace").ok().map(ToOwned::to_owned),
        })
    }

    /// Takes the `value` payload out of the reply, `null` when absent.
    #[must_use]
    pub fn into_value(mut self) -> Value {
        self.data.remove("value").unwrap_or(Value::Null)
    }
}

fn mismatch(path: &str, expected: &'static str, value: &Value) -> Error {
    Error::TypeMismatch {
        path: path.to_owned(),
        expected,
        found: json_type(value),
    }
}

#[cfg(test)]
#[cfg_attr(coverage, coverage(off))]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use serde_json::json;

    use super::*;

    fn reply(status: u16, value: Value) -> Reply {
        match value {
            Value::Object(data) => Reply::new(status, data),
            other => panic!("Expected an object, got: {other}"),
        }
    }

    #[test]
    fn test_get_nested_path() {
        let reply = reply(200, json!({"a": {"b": {"c": 5}}}));

        assert_eq!(reply.get("a.b.c"), Ok(&json!(5)));
        assert_eq!(reply.int("a.b.c"), Ok(5));
        assert_eq!(reply.float("a.b.c"), Ok(5.0));
    }

    #[test]
    fn test_get_missing_leaf() {
        let reply = reply(200, json!({"a": {"b": {}}}));

        assert_eq!(
            reply.get("a.b.c"),
            Err(Error::PathNotFound {
                path: "a.b.c".into()
            })
        );
    }

    #[test]
    fn test_get_through_non_object() {
        let reply = reply(200, json!({"a": {"b": [1, 2, 3]}}));

        assert!(matches!(
            reply.get("a.b.c"),
            Err(Error::PathNotFound { .. })
        ));
        assert!(matches!(reply.get("a.b.0"), Err(Error::PathNotFound { .. })));
    }

    #[test]
    fn test_type_mismatch_is_distinct_from_not_found() {
        let reply = reply(200, json!({"value": {"ready": "yes"}}));

        assert_eq!(
            reply.bool("value.ready"),
            Err(Error::TypeMismatch {
                path: "value.ready".into(),
                expected: "bool",
                found: "string",
            })
        );
        assert!(matches!(
            reply.bool("value.missing"),
            Err(Error::PathNotFound { .. })
        ));
    }

    #[test]
    fn test_typed_getters() {
        let reply = reply(
            200,
            json!({
                "value": {
                    "title": "Example",
                    "ready": true,
                    "ratio": 1.5,
                    "labels": {"a": "x", "b": "y"},
                    "handles": ["h1", "h2"],
                }
            }),
        );

        assert_eq!(reply.string("value.title"), Ok("Example"));
        assert_eq!(reply.bool("value.ready"), Ok(true));
        assert_eq!(reply.float("value.ratio"), Ok(1.5));
        assert_eq!(reply.map("value").map(Map::len), Ok(5));
        assert_eq!(
            reply.string_map("value.labels").unwrap(),
            HashMap::from([("a".into(), "x".into()), ("b".into(), "y".into())])
        );
        assert_eq!(
            reply.string_list("value.handles"),
            Ok(vec!["h1".to_owned(), "h2".to_owned()])
        );
    }

    #[test]
    fn test_string_collections_reject_non_strings() {
        let reply = reply(200, json!({"value": {"labels": {"a": 1}, "handles": ["h1", 2]}}));

        assert!(matches!(
            reply.string_map("value.labels"),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(matches!(
            reply.string_list("value.handles"),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_failure_with_success_status() {
        let reply = reply(200, json!({"value": {"message": "no such element"}}));

        let failure = reply.failure().expect("Should be a failure");
        assert_eq!(failure.message, "no such element");
        assert_eq!(failure.error, None);
    }

    #[test]
    fn test_failure_w3c_payload() {
        let reply = reply(
            404,
            json!({
                "value": {
                    "error": "no such element",
                    "message": "Unable to locate element: #missing",
                    "stacktrace": "at find",
                }
            }),
        );

        let failure = reply.failure().expect("Should be a failure");
        assert_eq!(failure.error.as_deref(), Some("no such element"));
        assert_eq!(failure.message, "Unable to locate element: #missing");
        assert_eq!(failure.stacktrace.as_deref(), Some("at find"));
        assert_eq!(
            failure.to_string(),
            "no such element: Unable to locate element: #missing"
        );
    }

    #[test]
    fn test_no_failure_without_message() {
        assert!(reply(200, json!({"value": null})).failure().is_none());
        assert!(reply(500, json!({})).failure().is_none());
        assert!(reply(200, json!({"value": {"message": 42}})).failure().is_none());
    }

    #[test]
    fn test_into_value() {
        assert_eq!(reply(200, json!({"value": "title"})).into_value(), "title");
        assert_eq!(reply(200, json!({})).into_value(), Value::Null);
    }
}
