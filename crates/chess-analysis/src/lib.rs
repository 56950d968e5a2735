//! Chess position analysis backed by an external UCI engine.
//!
//! Every call to [`AnalysisService::analyze`] starts its own engine
//! process, configures it, runs one bounded search, and shuts the process
//! down again, on success, on error, and when the call is cancelled.
//!
//! # Overview
//!
//! - [`AnalysisService`] - validates input and drives one engine per call
//! - [`AnalysisParams`] - depth / time / strength limits
//! - [`AnalysisResult`] - best move, White-relative score, depth reached
//! - [`EngineSession`] - a single engine process spoken to over UCI
//! - [`EngineLauncher`] - how engine processes are started
//!
//! # Example
//!
//! ```no_run
//! use chess_analysis::{AnalysisParams, AnalysisService, EngineConfig};
//!
//! # async fn run() -> Result<(), chess_analysis::AnalysisError> {
//! let service = AnalysisService::new(EngineConfig::new("/usr/games/stockfish"));
//! let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
//! let result = service.analyze(fen, &AnalysisParams::with_depth(12)).await?;
//! println!("{:?} {:?}", result.best_move, result.score);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod evaluation;
pub mod launcher;
pub mod params;
pub mod service;
pub mod session;

pub use config::EngineConfig;
pub use error::{AnalysisError, EngineError};
pub use evaluation::{white_centipawns, MATE_SCORE};
pub use launcher::{EngineIo, EngineLauncher, ProcessHandle, ProcessLauncher};
pub use params::{AnalysisParams, ParamsError};
pub use service::{AnalysisResult, AnalysisService, Phase};
pub use session::{EngineSession, SearchReport, StrengthLimit};
