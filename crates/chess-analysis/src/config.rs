//! Engine session configuration.

use std::path::PathBuf;
use std::time::Duration;
use uci::GoOptions;

/// Default bound on process launch plus UCI handshake.
pub const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(10);
/// Default bound on a search, on top of any requested movetime.
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(60);
/// Default time an engine gets to exit after `quit` before it is killed.
pub const DEFAULT_QUIT_GRACE: Duration = Duration::from_millis(500);

/// Settings for the engine processes an [`AnalysisService`](crate::AnalysisService) starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Path to the UCI engine executable.
    pub path: PathBuf,
    /// Bound on launching the process and completing the handshake.
    pub startup_timeout: Duration,
    /// Bound on a single search, excluding the requested movetime.
    pub search_timeout: Duration,
    /// How long to wait for a voluntary exit after `quit`.
    pub quit_grace: Duration,
}

impl EngineConfig {
    /// Configuration with default timeouts for the engine at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            startup_timeout: DEFAULT_STARTUP_TIMEOUT,
            search_timeout: DEFAULT_SEARCH_TIMEOUT,
            quit_grace: DEFAULT_QUIT_GRACE,
        }
    }

    /// Upper bound on one search with the given limits.
    pub fn search_ceiling(&self, limits: &GoOptions) -> Duration {
        let movetime = limits.movetime.map(Duration::from_millis).unwrap_or_default();
        self.search_timeout.saturating_add(movetime)
    }
}
