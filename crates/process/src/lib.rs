#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]
#![cfg_attr(coverage, feature(coverage_attribute))]

//! Crate for running a `WebDriver` server binary as a child process.
//!
//! The child leads its own process group (a job object on Windows) and is killed on drop, so a
//! driver and the browsers it launched never outlive the [`Process`] handle. When `TRACE` is
//! enabled, the child output is drained line by line into the log; otherwise it is discarded.

use std::{ffi::OsStr, io, path::Path, process::Stdio, result};

use process_wrap::tokio::{KillOnDrop, TokioChildWrapper, TokioCommandWrap};
use thiserror::Error;
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    process::Command,
};
use tracing::{Instrument, debug, trace};

#[derive(Error, Debug)]
pub enum Error {
    #[error("spawn driver {name} failed: {command:?}")]
    Spawn {
        name: String,
        command: Command,
        #[source]
        source: io::Error,
    },
    #[error("kill driver {name} (pid = {pid:?}) failed")]
    Kill {
        name: String,
        pid: Option<u32>,
        #[source]
        source: io::Error,
    },
}

pub type Result<T, E = Error> = result::Result<T, E>;

/// State of the driver process.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Status {
    Alive,
    Exited(i32),
    /// Terminated without exit code, by a signal on Unix.
    Signaled,
    Error(String),
}

impl Status {
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        matches!(self, Self::Alive)
    }
}

#[derive(Debug)]
pub struct Process {
    name: String,
    child: Box<dyn TokioChildWrapper>,
}

impl Process {
    /// Spawns `program` with `args`.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the program cannot be spawned.
    pub fn spawn<P, A, I>(program: P, args: A) -> Result<Self>
    where
        P: AsRef<OsStr>,
        A: IntoIterator<Item = I>,
        I: AsRef<OsStr>,
    {
        let program = program.as_ref();
        let name = Path::new(program)
            .file_name()
            .unwrap_or(program)
            .to_string_lossy()
            .into_owned();
        let trace_enabled = tracing::enabled!(tracing::Level::TRACE);

        let mut command = TokioCommandWrap::with_new(program, |command| {
            command
                .args(args)
                .stdin(Stdio::null())
                .stdout(pipe_or_null(trace_enabled))
                .stderr(pipe_or_null(trace_enabled));
        });

        #[cfg(windows)]
        command.wrap(process_wrap::tokio::JobObject);

        #[cfg(unix)]
        command.wrap(process_wrap::tokio::ProcessGroup::leader());

        command.wrap(KillOnDrop);

        debug!(driver = %name, command = ?command.command().as_std(), "Spawning driver...");
        let mut child = command.spawn().map_err(|source| Error::Spawn {
            name: name.clone(),
            command: command.into_command(),
            source,
        })?;
        debug!(driver = %name, pid = ?child.id(), "Driver spawned!");

        if trace_enabled {
            drain_output(&name, child.as_mut());
        }

        Ok(Self { name, child })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    pub fn status(&mut self) -> Status {
        match self.child.try_wait() {
            Ok(None) => Status::Alive,
            Ok(Some(status)) => status.code().map_or(Status::Signaled, Status::Exited),
            Err(error) => Status::Error(error.to_string()),
        }
    }

    /// Kills the process group if still alive, then reaps the process.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the kill signal cannot be delivered.
    pub async fn shutdown(&mut self) -> Result<Status> {
        if !self.status().is_alive() {
            return Ok(self.status());
        }

        debug!(driver = %self.name, pid = ?self.id(), "Killing driver...");
        Box::into_pin(self.child.kill())
            .await
            .map_err(|source| Error::Kill {
                name: self.name.clone(),
                pid: self.id(),
                source,
            })?;

        let status = match Box::into_pin(self.child.wait()).await {
            Ok(status) => status.code().map_or(Status::Signaled, Status::Exited),
            Err(error) => Status::Error(error.to_string()),
        };
        debug!(driver = %self.name, ?status, "Driver stopped");

        Ok(status)
    }
}

fn pipe_or_null(condition: bool) -> Stdio {
    if condition {
        Stdio::piped()
    } else {
        Stdio::null()
    }
}

fn drain_output(name: &str, child: &mut dyn TokioChildWrapper) {
    let pid = child.id();

    if let Some(stdout) = child.stdout().take() {
        drain_lines(name.to_owned(), pid, "stdout", stdout);
    }

    if let Some(stderr) = child.stderr().take() {
        drain_lines(name.to_owned(), pid, "stderr", stderr);
    }
}

fn drain_lines<R>(name: String, pid: Option<u32>, stream: &'static str, reader: R)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let mut lines = BufReader::new(reader).lines();

    tokio::spawn(
        async move {
            while let Ok(Some(line)) = lines.next_line().await {
                trace!(driver = %name, ?pid, "[{stream}] {line}");
            }
        }
        .in_current_span(),
    );
}

#[cfg(test)]
#[cfg_attr(coverage, coverage(off))]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    fn spawn_sleep_process() -> Process {
        #[cfg(unix)]
        let process = Process::spawn("sleep", ["5"]);
        #[cfg(windows)]
        let process = Process::spawn("timeout", ["5"]);

        process.expect("Failed to spawn process")
    }

    #[tokio::test]
    async fn test_process_exit() {
        #[cfg(unix)]
        let mut process = Process::spawn("sh", ["-c", "exit 3"]).unwrap();
        #[cfg(windows)]
        let mut process = Process::spawn("cmd", ["/C", "exit 3"]).unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(500)).await;

        assert_eq!(process.status(), Status::Exited(3));
        assert_eq!(process.shutdown().await.unwrap(), Status::Exited(3));
    }

    #[tokio::test]
    async fn test_process_shutdown() {
        let mut process = spawn_sleep_process();

        assert!(process.status().is_alive(), "Should have alive status");

        let status = process.shutdown().await.expect("Should kill");

        assert!(!status.is_alive(), "Should not be alive, got: {status:?}");
        assert!(!process.status().is_alive());
    }

    #[tokio::test]
    async fn test_process_name() {
        let process = spawn_sleep_process();

        assert!(process.id().is_some(), "Should have an id");
        #[cfg(unix)]
        assert_eq!(process.name(), "sleep");
    }

    #[tokio::test]
    async fn test_spawn_missing_program() {
        let error = Process::spawn("/nonexistent/chromedriver", ["--port=0"]).unwrap_err();

        match error {
            Error::Spawn { name, source, .. } => {
                assert_eq!(name, "chromedriver");
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            },
            error => panic!("Expected a spawn error, got: {error:?}"),
        }
    }

    #[tokio::test]
    #[traced_test]
    async fn test_process_tracing() {
        let mut process = spawn_sleep_process();

        assert!(logs_contain("Spawning driver..."));
        assert!(logs_contain("Driver spawned!"));

        process.shutdown().await.expect("Should kill");

        assert!(logs_contain("Killing driver..."));
    }
}
