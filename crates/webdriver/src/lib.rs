#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::missing_errors_doc, clippy::multiple_crate_versions)]
#![cfg_attr(coverage, feature(coverage_attribute))]

//! Crate for driving a browser through the [WebDriver](https://www.w3.org/TR/webdriver2/) HTTP protocol.
//!
//! The layers, from the wire up:
//!
//! - [`transport`]: one HTTP request, one JSON object back. No protocol knowledge.
//! - [`reply`]: typed, path-based access to a decoded reply, and its error payload.
//! - [`dispatcher`]: endpoint resolution, reply classification, payload decoding.
//! - [`Client`], [`Session`] and [`Element`]: the protocol commands.
//! - [`wait`] and [`conditions`]: polling until the remote end reaches a given state.
//!
//! Both W3C and legacy (JSON Wire) remote ends are supported: session creation falls back to the
//! legacy body, and element references keep the key the remote end used.

pub mod capabilities;
pub mod client;
pub mod command;
pub mod conditions;
pub mod dispatcher;
pub mod element;
pub mod error;
pub mod keys;
pub mod locator;
pub mod rect;
pub mod reply;
pub mod session;
pub mod status;
pub mod timeouts;
pub mod transport;
pub mod wait;
pub mod webdriver;

pub use capabilities::{Capabilities, PageLoadStrategy, Proxy, ProxyType};
pub use client::Client;
pub use element::{Element, ElementHandle};
pub use error::{Error, ErrorKind, Result};
pub use locator::{Locator, Using};
pub use rect::Rect;
pub use session::Session;
pub use status::Status;
pub use timeouts::Timeouts;
pub use wait::Wait;
