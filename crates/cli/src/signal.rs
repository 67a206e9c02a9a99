//! Interruption of the `marotte` binary.
//!
//! SIGINT and SIGTERM on Unix, CTRL_C on Windows. The browsing in progress is abandoned, the
//! driver is still shut down, and the run ends with [`Error::Interrupted`].

use std::io;

use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum Error {
    #[error("register interrupt signal failed")]
    Register(#[source] io::Error),
    #[error("interrupted by a signal")]
    Interrupted,
}

#[cfg(unix)]
async fn wait_for_signal() -> io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = signal(SignalKind::terminate())?;
    let mut interrupt = signal(SignalKind::interrupt())?;

    tokio::select! {
        _ = terminate.recv() => debug!("Received SIGTERM."),
        _ = interrupt.recv() => debug!("Received SIGINT."),
    };

    Ok(())
}

#[cfg(windows)]
async fn wait_for_signal() -> io::Result<()> {
    tokio::signal::ctrl_c().await?;
    debug!("Received CTRL_C.");

    Ok(())
}

/// Resolves once the process is asked to stop, always to an error.
pub async fn interrupted() -> Error {
    match wait_for_signal().await {
        Ok(()) => Error::Interrupted,
        Err(error) => Error::Register(error),
    }
}

#[cfg(test)]
#[cfg_attr(coverage, coverage(off))]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[tokio::test]
    async fn test_sigterm_interrupts() {
        use nix::{
            sys::signal::{Signal, kill},
            unistd::Pid,
        };

        let interrupted = interrupted();
        tokio::pin!(interrupted);

        // First poll registers the handlers.
        tokio::select! {
            biased;
            error = &mut interrupted => panic!("Resolved before any signal: {error:?}"),
            () = tokio::task::yield_now() => {},
        }

        kill(Pid::this(), Signal::SIGTERM).unwrap();

        assert!(matches!(interrupted.await, Error::Interrupted));
    }
}
