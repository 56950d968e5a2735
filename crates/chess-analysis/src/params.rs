//! Search parameters and their bounds.

use std::time::Duration;
use thiserror::Error;
use uci::GoOptions;

/// Shallowest accepted search depth.
pub const MIN_DEPTH: u32 = 1;
/// Deepest accepted search depth.
pub const MAX_DEPTH: u32 = 30;
/// Weakest accepted strength limit.
pub const MIN_STRENGTH: u32 = 1350;
/// Strongest accepted strength limit.
pub const MAX_STRENGTH: u32 = 2850;
/// Longest accepted time budget.
pub const MAX_MOVETIME: Duration = Duration::from_secs(60);

/// Errors for out-of-range search parameters.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParamsError {
    #[error("depth must be between {min} and {max}, got {0}", min = MIN_DEPTH, max = MAX_DEPTH)]
    DepthOutOfRange(u32),
    #[error("strength must be between {min} and {max}, got {0}", min = MIN_STRENGTH, max = MAX_STRENGTH)]
    StrengthOutOfRange(u32),
    #[error("movetime must be between 1ms and {max}ms, got {0:?}", max = MAX_MOVETIME.as_millis())]
    MovetimeOutOfRange(Duration),
    #[error("a depth or a movetime is required to bound the search")]
    Unbounded,
}

/// Caller-supplied search parameters.
///
/// At least one of `depth` and `movetime` must be set so the search is
/// guaranteed to end. When both are set the engine stops at whichever
/// limit it reaches first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnalysisParams {
    /// Maximum search depth in plies.
    pub depth: Option<u32>,
    /// Target playing strength (Elo-like). Applied only if the engine supports it.
    pub strength: Option<u32>,
    /// Time budget for the search.
    pub movetime: Option<Duration>,
}

impl AnalysisParams {
    /// Depth-bounded parameters.
    pub fn with_depth(depth: u32) -> Self {
        Self {
            depth: Some(depth),
            ..Self::default()
        }
    }

    /// Sets the strength limit.
    pub fn strength(mut self, elo: u32) -> Self {
        self.strength = Some(elo);
        self
    }

    /// Sets the time budget.
    pub fn movetime(mut self, movetime: Duration) -> Self {
        self.movetime = Some(movetime);
        self
    }

    /// Checks every bound and returns the `go` limits to search with.
    pub fn validate(&self) -> Result<GoOptions, ParamsError> {
        if let Some(depth) = self.depth {
            if !(MIN_DEPTH..=MAX_DEPTH).contains(&depth) {
                return Err(ParamsError::DepthOutOfRange(depth));
            }
        }
        if let Some(elo) = self.strength {
            if !(MIN_STRENGTH..=MAX_STRENGTH).contains(&elo) {
                return Err(ParamsError::StrengthOutOfRange(elo));
            }
        }
        if let Some(movetime) = self.movetime {
            if movetime < Duration::from_millis(1) || movetime > MAX_MOVETIME {
                return Err(ParamsError::MovetimeOutOfRange(movetime));
            }
        }

        let limits = GoOptions {
            depth: self.depth,
            movetime: self.movetime.map(|t| t.as_millis() as u64),
        };
        if !limits.is_bounded() {
            return Err(ParamsError::Unbounded);
        }
        Ok(limits)
    }
}
