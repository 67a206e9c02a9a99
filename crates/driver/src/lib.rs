#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::missing_errors_doc, clippy::multiple_crate_versions)]
#![cfg_attr(coverage, feature(coverage_attribute))]

//! Crate for running a `WebDriver` server (`chromedriver`, `geckodriver`, ...) next to the client.
//!
//! A [`Driver`] spawns the server binary on a free local port through [`marotte_process`], waits for its
//! `/status` to report ready with [`marotte_webdriver::Wait`], then opens a session on it with
//! [`marotte_webdriver::Client`]. The process and the browsers it started are killed when the
//! driver is dropped.

pub mod driver;

pub use driver::*;
pub use marotte_process::Status;
