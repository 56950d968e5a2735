//! Starting engine processes.
//!
//! [`EngineLauncher`] is the seam between the analysis service and the
//! operating system: production code uses [`ProcessLauncher`], tests plug in
//! an in-memory engine.

use futures_util::future::BoxFuture;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader};
use tokio::process::{Child, Command};

/// Line-oriented engine output.
pub type EngineReader = Box<dyn AsyncBufRead + Send + Unpin>;
/// Engine command input.
pub type EngineWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Control over a running engine process.
///
/// Dropping a handle must also terminate the process.
pub trait ProcessHandle: Send {
    /// Waits up to `grace` for the process to exit on its own, then kills it.
    fn shutdown(&mut self, grace: Duration) -> BoxFuture<'_, ()>;

    /// Kills the process without waiting for it.
    fn kill(&mut self);
}

/// The pipes and handle of a freshly started engine.
pub struct EngineIo {
    pub reader: EngineReader,
    pub writer: EngineWriter,
    pub process: Box<dyn ProcessHandle>,
}

/// Starts a new engine process on every call.
pub trait EngineLauncher: Send + Sync {
    fn launch(&self) -> impl Future<Output = io::Result<EngineIo>> + Send;
}

/// Launches a UCI engine executable with piped stdin/stdout.
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    path: PathBuf,
}

impl ProcessLauncher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the engine executable.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EngineLauncher for ProcessLauncher {
    async fn launch(&self) -> io::Result<EngineIo> {
        let mut child = Command::new(&self.path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "engine stdin unavailable"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "engine stdout unavailable"))?;

        tracing::debug!(path = %self.path.display(), pid = ?child.id(), "engine process started");

        Ok(EngineIo {
            reader: Box::new(BufReader::new(stdout)),
            writer: Box::new(stdin),
            process: Box::new(ChildProcess { child }),
        })
    }
}

/// A spawned child process. `kill_on_drop` is set, so dropping it kills the engine.
struct ChildProcess {
    child: Child,
}

impl ProcessHandle for ChildProcess {
    fn shutdown(&mut self, grace: Duration) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            match tokio::time::timeout(grace, self.child.wait()).await {
                Ok(Ok(status)) => tracing::debug!(%status, "engine exited"),
                Ok(Err(e)) => tracing::warn!(error = %e, "failed to wait for engine"),
                Err(_) => {
                    tracing::warn!(?grace, "engine ignored quit, killing it");
                    if let Err(e) = self.child.kill().await {
                        tracing::warn!(error = %e, "failed to kill engine");
                    }
                }
            }
        })
    }

    fn kill(&mut self) {
        if let Err(e) = self.child.start_kill() {
            // Already reaped processes report InvalidInput; nothing to do.
            tracing::trace!(error = %e, "start_kill on engine failed");
        }
    }
}
