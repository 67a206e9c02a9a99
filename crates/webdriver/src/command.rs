use std::{borrow::Cow, fmt::Debug};

use serde::{Serialize, de::DeserializeOwned};

use crate::transport::Method;

/// A typed `WebDriver` command.
///
/// - [`Command::segments`] is the path relative to the scope the command is sent in, see
///   [`Endpoint`]. A segment bound from a value (an element id, an attribute name) is never
///   split, a `/` in it is percent-encoded.
/// - [`Command::Parameters`] is serialized as the JSON body, when [`Command::parameters`] is `Some`.
/// - [`Command::Response`] is decoded from the `value` field of a successful reply.
///
/// Implementations are usually derived with [`marotte_derive::WebDriverCommand`].
pub trait Command {
    type Parameters: Serialize + Sync;
    type Response: DeserializeOwned + Debug;

    const METHOD: Method;

    fn segments(&self) -> Vec<Cow<'_, str>>;
    fn parameters(&self) -> Option<&Self::Parameters>;

    /// The segments joined with `/`, as written in the route.
    fn path(&self) -> String {
        self.segments().join("/")
    }
}

/// Scope a command path is resolved in.
///
/// - `Root`: `/<path>`
/// - `Session`: `/session/<id>/<path>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    Root,
    Session(&'a str),
}
