use std::{
    ffi::{OsStr, OsString},
    io,
    net::{Ipv4Addr, SocketAddr, TcpListener},
    result,
    time::Duration,
};

use marotte_process::{Process, Status};
use marotte_webdriver::{Capabilities, Client, Session, wait, wait::Wait};
use thiserror::Error;
use tracing::{debug, instrument};
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Process(#[from] marotte_process::Error),
    #[error(transparent)]
    WebDriver(#[from] marotte_webdriver::Error),
    #[error(transparent)]
    Readiness(#[from] wait::Error),
    #[error("find a free local port failed")]
    FreePort(#[source] io::Error),
    #[error("get driver status failed: {0}")]
    ChildStatus(String),
}

pub type Result<T, E = Error> = result::Result<T, E>;

/// How to launch a driver and which session to open on it.
#[derive(Debug, Clone)]
pub struct DriverOptions {
    program: OsString,
    args: Vec<OsString>,
    capabilities: Capabilities,
    ready_timeout: Duration,
    ready_interval: Duration,
}

impl DriverOptions {
    pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(10);
    pub const DEFAULT_READY_INTERVAL: Duration = Duration::from_millis(250);

    pub fn new<P: AsRef<OsStr>>(program: P, capabilities: Capabilities) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            args: Vec::new(),
            capabilities,
            ready_timeout: Self::DEFAULT_READY_TIMEOUT,
            ready_interval: Self::DEFAULT_READY_INTERVAL,
        }
    }

    /// Adds an argument passed to the driver before `--port`.
    #[must_use]
    pub fn with_arg<A: AsRef<OsStr>>(mut self, arg: A) -> Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    /// Sets how long, and how often, the driver status is probed before giving up.
    #[must_use]
    pub const fn with_readiness(mut self, timeout: Duration, interval: Duration) -> Self {
        self.ready_timeout = timeout;
        self.ready_interval = interval;
        self
    }

    #[must_use]
    pub const fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }
}

/// A driver process listening on a local port, and the session opened on it.
///
/// The process is killed when the driver is dropped; [`Driver::quit`] also deletes the session
/// first.
#[derive(Debug)]
pub struct Driver {
    uuid: Uuid,
    address: SocketAddr,
    process: Process,
    client: Client,
    session: Session,
}

impl Driver {
    /// Spawns the driver on a free local port, waits until it is ready, and opens a session.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the driver cannot be spawned, does not become ready in time, or
    /// refuses the session. The process is killed in every error case.
    #[instrument(name = "Driver::start", skip(options), fields(program = ?options.program))]
    pub async fn start(options: DriverOptions) -> Result<Self> {
        debug!("Starting a new Driver instance...");
        let readiness = Wait::new(options.ready_timeout, options.ready_interval)?;
        let address = SocketAddr::from((Ipv4Addr::LOCALHOST, free_port()?));

        let port = OsString::from(format!("--port={}", address.port()));
        let process = Process::spawn(
            &options.program,
            options.args.iter().chain(std::iter::once(&port)),
        )?;

        let client = Client::new(&format!("http://{address}"))?;
        let status = client.wait_until_ready(&readiness).await?;
        debug!(message = ?status.message(), "Driver ready!");

        let session = client.new_session(&options.capabilities).await?;
        let uuid = Uuid::new_v4();
        debug!(%uuid, session = session.id(), "Driver started!");

        Ok(Self {
            uuid,
            address,
            process,
            client,
            session,
        })
    }

    #[must_use]
    pub const fn uuid(&self) -> Uuid {
        self.uuid
    }

    #[must_use]
    pub const fn address(&self) -> SocketAddr {
        self.address
    }

    #[must_use]
    pub fn pid(&self) -> Option<u32> {
        self.process.id()
    }

    #[must_use]
    pub const fn client(&self) -> &Client {
        &self.client
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    pub fn status(&mut self) -> Status {
        self.process.status()
    }

    /// Deletes the session, then stops the driver process.
    ///
    /// The process is stopped even when deleting the session fails; that failure is returned
    /// afterwards.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the session cannot be deleted or the process cannot be killed.
    #[instrument(name = "Driver::quit", skip(self), fields(uuid = %self.uuid))]
    pub async fn quit(mut self) -> Result<Status> {
        debug!("Quitting driver...");
        let deleted = self.session.quit().await;

        let status = match self.process.shutdown().await? {
            Status::Error(error) => return Err(Error::ChildStatus(error)),
            status => status,
        };
        debug!("Driver quit with status: {status:?}");

        deleted?;

        Ok(status)
    }
}

/// Asks the OS for a free port on the loopback interface.
///
/// The port is released before the driver binds it, another process may grab it in between.
fn free_port() -> Result<u16> {
    TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .and_then(|listener| listener.local_addr())
        .map(|address| address.port())
        .map_err(Error::FreePort)
}
