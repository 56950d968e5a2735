//! Error types for engine sessions and analysis calls.

use crate::params::ParamsError;
use chess_core::FenError;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while talking to an engine process.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine process could not be started.
    #[error("failed to launch engine: {0}")]
    Launch(#[source] std::io::Error),
    /// Reading from or writing to the engine failed.
    #[error("engine I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The engine closed its output before answering.
    #[error("engine closed unexpectedly")]
    Closed,
    /// The engine did not answer in time.
    #[error("engine did not respond within {0:?}")]
    Timeout(Duration),
    /// The engine answered with something we cannot use.
    #[error("invalid engine response: {0}")]
    InvalidResponse(String),
}

/// Errors returned by [`AnalysisService::analyze`](crate::AnalysisService::analyze).
///
/// The first two variants are caller mistakes and are detected before any
/// engine process is started; the last two are server-side failures.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The position string is not a valid FEN.
    #[error("invalid position: {0}")]
    InvalidPosition(#[from] FenError),
    /// Search parameters are out of range.
    #[error("invalid parameters: {0}")]
    InvalidParams(#[from] ParamsError),
    /// The engine could not be started or did not finish its handshake.
    #[error("engine unavailable: {0}")]
    EngineUnavailable(#[source] EngineError),
    /// The engine started but the search failed.
    #[error("engine fault: {0}")]
    EngineFault(#[source] EngineError),
}

impl AnalysisError {
    /// True for errors caused by the request rather than the engine.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::InvalidPosition(_) | AnalysisError::InvalidParams(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_error_display() {
        let launch = EngineError::Launch(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        assert!(launch.to_string().contains("failed to launch engine"));

        assert_eq!(EngineError::Closed.to_string(), "engine closed unexpectedly");

        let timeout = EngineError::Timeout(Duration::from_millis(250));
        assert_eq!(timeout.to_string(), "engine did not respond within 250ms");

        let invalid = EngineError::InvalidResponse("bestmove zz".to_string());
        assert!(invalid.to_string().contains("bestmove zz"));
    }

    #[test]
    fn engine_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        match EngineError::from(io_error) {
            EngineError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::BrokenPipe),
            other => panic!("Expected Io variant, got {:?}", other),
        }
    }

    #[test]
    fn client_errors_are_classified() {
        let fen = AnalysisError::from(FenError::Empty);
        assert!(fen.is_client_error());
        assert!(fen.to_string().starts_with("invalid position"));

        let params = AnalysisError::from(ParamsError::Unbounded);
        assert!(params.is_client_error());

        assert!(!AnalysisError::EngineUnavailable(EngineError::Closed).is_client_error());
        assert!(!AnalysisError::EngineFault(EngineError::Closed).is_client_error());
    }
}
