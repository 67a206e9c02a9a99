//! Module for waiting until a condition holds on the remote end.
//!
//! A [`Wait`] polls a caller supplied condition on a fixed cadence until it succeeds or until the
//! overall timeout elapses. It knows nothing about pages or elements: a condition is any closure
//! returning a future of `Result<T, E>`, where `Ok` means satisfied and any `Err` means
//! "not yet" (the error is logged and polling goes on).
//!
//! ```no_run
//! # use std::time::Duration;
//! # use marotte_webdriver::{Locator, Session, conditions, wait::Wait};
//! # async fn run(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
//! let wait = Wait::new(Duration::from_secs(10), Duration::from_millis(250))?;
//! let locator = Locator::css("#submit");
//! let button = wait
//!     .until(|| conditions::element_to_be_displayed(session, &locator))
//!     .await?;
//! button.click().await?;
//! # Ok(())
//! # }
//! ```

use std::{fmt::Display, future::Future, result, time::Duration};

use thiserror::Error;
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep_until};
use tracing::{debug, trace};

use crate::error::ErrorKind;

#[derive(Error, Debug)]
pub enum Error {
    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,
    #[error("timeout {timeout:?} is shorter than the poll interval {interval:?}")]
    TimeoutShorterThanPollInterval {
        timeout: Duration,
        interval: Duration,
    },
    #[error("condition not satisfied after {timeout:?} ({attempts} attempts)")]
    Timeout {
        timeout: Duration,
        attempts: u32,
        last_error: Option<String>,
    },
}

pub type Result<T, E = Error> = result::Result<T, E>;

impl Error {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ZeroPollInterval | Self::TimeoutShorterThanPollInterval { .. } => {
                ErrorKind::Config
            },
            Self::Timeout { .. } => ErrorKind::WaitTimeout,
        }
    }
}

/// Polling parameters: the overall timeout and the poll interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wait {
    timeout: Duration,
    interval: Duration,
}

impl Wait {
    /// Creates a new wait.
    ///
    /// # Errors
    ///
    /// - [`Error::ZeroPollInterval`] if `interval` is zero.
    /// - [`Error::TimeoutShorterThanPollInterval`] if `timeout` is shorter than `interval`.
    pub fn new(timeout: Duration, interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(Error::ZeroPollInterval);
        }

        if timeout < interval {
            return Err(Error::TimeoutShorterThanPollInterval { timeout, interval });
        }

        Ok(Self { timeout, interval })
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Polls `condition` once per interval until it returns `Ok`, or fails once the timeout elapses.
    ///
    /// The first evaluation happens one interval after the call. Evaluations never overlap: a
    /// tick that fires while the condition is still running is skipped, not queued. A tick due at
    /// the deadline is still evaluated, a tick due after it never is. The deadline keeps running
    /// during an evaluation, and an evaluation still in flight when it fires is dropped, so its
    /// late result is discarded. Both timers are released when this returns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] with the number of attempts and the last condition error.
    pub async fn until<F, Fut, T, E>(&self, mut condition: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = result::Result<T, E>>,
        E: Display,
    {
        let started = Instant::now();
        let deadline_at = started + self.timeout;
        let deadline = sleep_until(deadline_at);
        tokio::pin!(deadline);

        let mut ticker = interval_at(started + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut attempts = 0u32;
        let mut last_error = None;

        debug!(timeout = ?self.timeout, interval = ?self.interval, "Start polling condition...");

        let outcome = loop {
            tokio::select! {
                biased;
                tick = ticker.tick() => {
                    if tick > deadline_at {
                        break None;
                    }
                    attempts += 1;
                    tokio::select! {
                        biased;
                        result = condition() => match result {
                            Ok(value) => break Some(value),
                            Err(error) => {
                                trace!(attempts, %error, "Condition not satisfied yet");
                                last_error = Some(error.to_string());
                            },
                        },
                        () = &mut deadline => break None,
                    }
                },
                () = &mut deadline => break None,
            }
        };

        match outcome {
            Some(value) => {
                debug!(attempts, elapsed = ?started.elapsed(), "Condition satisfied");
                Ok(value)
            },
            None => {
                debug!(attempts, ?last_error, "Condition timed out");
                Err(Error::Timeout {
                    timeout: self.timeout,
                    attempts,
                    last_error,
                })
            },
        }
    }
}
