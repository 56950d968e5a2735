//! Configuration loading for analysis-server.
//!
//! Settings come from an optional TOML file, then the environment
//! (`STOCKFISH_PATH`, `HOST`, `PORT`), then command-line flags; later
//! sources win.

use chess_analysis::params::{MAX_DEPTH, MIN_DEPTH};
use chess_analysis::EngineConfig;
use serde::Deserialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Config file read from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "analysis-server.toml";
/// Engine location used when nothing is configured and `stockfish` is not on `PATH`.
pub const FALLBACK_ENGINE_PATH: &str = "/usr/games/stockfish";
const ENGINE_BINARY: &str = "stockfish";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },
    #[error("default_depth must be between {min} and {max}, got {0}", min = MIN_DEPTH, max = MAX_DEPTH)]
    InvalidDefaultDepth(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Engine executable; resolved from `PATH` when unset.
    pub stockfish_path: Option<PathBuf>,
    pub default_depth: u32,
    pub startup_timeout_ms: u64,
    pub search_timeout_ms: u64,
    pub quit_grace_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let engine = EngineConfig::new(FALLBACK_ENGINE_PATH);
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            stockfish_path: None,
            default_depth: 15,
            startup_timeout_ms: engine.startup_timeout.as_millis() as u64,
            search_timeout_ms: engine.search_timeout.as_millis() as u64,
            quit_grace_ms: engine.quit_grace.as_millis() as u64,
        }
    }
}

impl ServerConfig {
    /// Reads `path`, or [`DEFAULT_CONFIG_FILE`] if it exists, or falls back to defaults.
    pub async fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => PathBuf::from(DEFAULT_CONFIG_FILE),
            None => {
                tracing::debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                return Ok(Self::default());
            }
        };

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Applies `STOCKFISH_PATH`, `HOST` and `PORT` as returned by `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(path) = lookup("STOCKFISH_PATH").filter(|p| !p.is_empty()) {
            self.stockfish_path = Some(PathBuf::from(path));
        }
        if let Some(host) = lookup("HOST").filter(|h| !h.is_empty()) {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidEnv { name: "PORT", value: port })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_DEPTH..=MAX_DEPTH).contains(&self.default_depth) {
            return Err(ConfigError::InvalidDefaultDepth(self.default_depth));
        }
        Ok(())
    }

    /// `host:port` to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Engine settings for the executable at `path`.
    pub fn engine_config(&self, path: PathBuf) -> EngineConfig {
        EngineConfig {
            startup_timeout: Duration::from_millis(self.startup_timeout_ms),
            search_timeout: Duration::from_millis(self.search_timeout_ms),
            quit_grace: Duration::from_millis(self.quit_grace_ms),
            ..EngineConfig::new(path)
        }
    }
}

/// Picks the engine executable: the configured path, else `stockfish`
/// found on `search_path`, else [`FALLBACK_ENGINE_PATH`].
pub fn resolve_engine_path(configured: Option<&Path>, search_path: Option<&OsStr>) -> PathBuf {
    if let Some(path) = configured {
        return path.to_path_buf();
    }
    search_path
        .and_then(|dirs| {
            std::env::split_paths(dirs)
                .map(|dir| dir.join(ENGINE_BINARY))
                .find(|candidate| candidate.is_file())
        })
        .unwrap_or_else(|| PathBuf::from(FALLBACK_ENGINE_PATH))
}
