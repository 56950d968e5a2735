//! The per-request analysis service.

use crate::config::EngineConfig;
use crate::error::{AnalysisError, EngineError};
use crate::evaluation::white_centipawns;
use crate::launcher::{EngineLauncher, ProcessLauncher};
use crate::params::AnalysisParams;
use crate::session::{EngineSession, SearchReport, StrengthLimit};
use chess_core::{Move, Position};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::Instrument;
use uci::GoOptions;

/// Result of analyzing one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    /// Best move in UCI notation, `None` if the position has no legal move.
    pub best_move: Option<String>,
    /// Centipawns from White's point of view; forced mates are `±MATE_SCORE`.
    pub score: Option<i32>,
    /// Deepest completed depth the engine reported (0 if it reported none).
    pub depth_used: u32,
}

/// Steps of a single [`AnalysisService::analyze`] call.
///
/// `ReleasingSession` follows every step after `AcquiringSession`, whether
/// that step succeeded or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Validating,
    AcquiringSession,
    Configuring,
    Searching,
    FallbackSearching,
    Extracting,
    ReleasingSession,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Validating => "validating",
            Phase::AcquiringSession => "acquiring-session",
            Phase::Configuring => "configuring",
            Phase::Searching => "searching",
            Phase::FallbackSearching => "fallback-searching",
            Phase::Extracting => "extracting",
            Phase::ReleasingSession => "releasing-session",
        };
        f.write_str(name)
    }
}

/// How the primary search ended, deciding what happens next.
enum PrimaryLine {
    /// The engine gave a principal variation; its first move is the answer.
    Found(String),
    /// The engine says there is nothing to play.
    Terminal,
    /// No principal variation, but the position is not terminal.
    Missing,
}

impl From<&SearchReport> for PrimaryLine {
    fn from(report: &SearchReport) -> Self {
        match report.pv.first() {
            Some(mv) => PrimaryLine::Found(mv.clone()),
            None if report.is_terminal() => PrimaryLine::Terminal,
            None => PrimaryLine::Missing,
        }
    }
}

/// Analyzes positions with a fresh engine process per call.
///
/// The service holds no per-call state, so one instance can serve any
/// number of concurrent calls; each call starts, uses, and tears down its
/// own engine.
pub struct AnalysisService<L = ProcessLauncher> {
    launcher: L,
    config: EngineConfig,
}

impl AnalysisService<ProcessLauncher> {
    /// Service that launches the executable at `config.path`.
    pub fn new(config: EngineConfig) -> Self {
        let launcher = ProcessLauncher::new(config.path.clone());
        Self { launcher, config }
    }
}

impl<L: EngineLauncher> AnalysisService<L> {
    /// Service with a custom launcher.
    pub fn with_launcher(launcher: L, config: EngineConfig) -> Self {
        Self { launcher, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Analyzes the position given as FEN.
    ///
    /// Invalid input is rejected before any engine is started. Once an
    /// engine has been started it is shut down before this returns, and it
    /// is killed if the returned future is dropped early.
    pub async fn analyze(&self, fen: &str, params: &AnalysisParams) -> Result<AnalysisResult, AnalysisError> {
        let span = tracing::info_span!("analyze", fen = %fen.trim(), depth = ?params.depth);
        self.analyze_inner(fen, params).instrument(span).await
    }

    async fn analyze_inner(&self, fen: &str, params: &AnalysisParams) -> Result<AnalysisResult, AnalysisError> {
        tracing::debug!(phase = %Phase::Validating);
        let position = Position::from_fen(fen)?;
        let limits = params.validate()?;

        tracing::debug!(phase = %Phase::AcquiringSession);
        let mut session = EngineSession::open(&self.launcher, self.config.startup_timeout)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "engine unavailable");
                AnalysisError::EngineUnavailable(e)
            })?;
        tracing::debug!(engine = session.name(), "session acquired");

        let outcome = self.drive(&mut session, &position, params, limits).await;

        tracing::debug!(phase = %Phase::ReleasingSession);
        session.release(self.config.quit_grace).await;

        match &outcome {
            Ok(result) => tracing::info!(
                best_move = ?result.best_move,
                score = ?result.score,
                depth = result.depth_used,
                "analysis complete"
            ),
            Err(e) => tracing::warn!(error = %e, "analysis failed"),
        }
        outcome
    }

    /// Configure, search, and extract on an acquired session.
    async fn drive(
        &self,
        session: &mut EngineSession,
        position: &Position,
        params: &AnalysisParams,
        limits: GoOptions,
    ) -> Result<AnalysisResult, AnalysisError> {
        if let Some(elo) = params.strength {
            tracing::debug!(phase = %Phase::Configuring, elo);
            match session.limit_strength(elo, self.config.startup_timeout).await {
                StrengthLimit::Applied { .. } => tracing::debug!(elo, "strength limit applied"),
                skipped => tracing::info!(elo, reason = %skipped, "strength limit skipped"),
            }
        }

        let ceiling = self.config.search_ceiling(&limits);

        tracing::debug!(phase = %Phase::Searching, ?limits);
        let primary = bounded_search(session, position, limits, ceiling).await?;

        let side = position.side_to_move();
        let mut score = primary.score.map(|s| white_centipawns(s, side));
        let mut depth_used = primary.depth;

        let best_move = match PrimaryLine::from(&primary) {
            PrimaryLine::Found(mv) => Some(mv),
            PrimaryLine::Terminal => {
                tracing::debug!("no legal move in position");
                None
            }
            PrimaryLine::Missing => {
                tracing::debug!(phase = %Phase::FallbackSearching, "no principal variation");
                let fallback = bounded_search(session, position, limits, ceiling).await?;
                if score.is_none() {
                    score = fallback.score.map(|s| white_centipawns(s, side));
                    depth_used = fallback.depth;
                }
                fallback.best_move.or_else(|| primary.best_move.clone())
            }
        };

        tracing::debug!(phase = %Phase::Extracting);
        let best_move = best_move
            .map(|mv| {
                Move::from_uci(&mv)
                    .map(Move::to_uci)
                    .map_err(|e| AnalysisError::EngineFault(EngineError::InvalidResponse(e.to_string())))
            })
            .transpose()?;

        Ok(AnalysisResult {
            best_move,
            score,
            depth_used: depth_used.unwrap_or(0),
        })
    }
}

async fn bounded_search(
    session: &mut EngineSession,
    position: &Position,
    limits: GoOptions,
    ceiling: Duration,
) -> Result<SearchReport, AnalysisError> {
    tokio::time::timeout(ceiling, session.search(position, limits))
        .await
        .map_err(|_| EngineError::Timeout(ceiling))
        .and_then(|searched| searched)
        .map_err(AnalysisError::EngineFault)
}
