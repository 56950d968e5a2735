//! FEN (Forsyth-Edwards Notation) parsing and validation.

use crate::{Color, Piece, Square};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("FEN must not be empty")]
    Empty,

    #[error("invalid FEN: expected at most 6 fields, got {0}")]
    TooManyFields(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),

    #[error("{color} must have exactly one king, found {count}")]
    InvalidKingCount { color: Color, count: usize },

    #[error("pawn on back rank {rank}")]
    PawnOnBackRank { rank: u8 },
}

/// A syntactically valid chess position.
///
/// Holds the six FEN fields after validation. Only the structure needed to
/// hand the position to an engine is checked (board shape, one king per side,
/// no pawns on the back ranks); whether the position could arise in a real
/// game is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    placement: String,
    side_to_move: Color,
    castling: String,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl Position {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses and validates a FEN string.
    ///
    /// Trailing fields may be omitted; they default to `w - - 0 1`.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.is_empty() {
            return Err(FenError::Empty);
        }
        if parts.len() > 6 {
            return Err(FenError::TooManyFields(parts.len()));
        }

        let placement = parts[0];
        Self::validate_placement(placement)?;

        let side_token = parts.get(1).copied().unwrap_or("w");
        let side_to_move = Color::from_fen_token(side_token)
            .ok_or_else(|| FenError::InvalidActiveColor(side_token.to_string()))?;

        let castling = Self::parse_castling(parts.get(2).copied().unwrap_or("-"))?;

        let en_passant = Self::parse_en_passant(parts.get(3).copied().unwrap_or("-"), side_to_move)?;

        let halfmove = parts.get(4).copied().unwrap_or("0");
        let halfmove_clock = halfmove
            .parse::<u32>()
            .map_err(|_| FenError::InvalidHalfmoveClock(halfmove.to_string()))?;

        let fullmove = parts.get(5).copied().unwrap_or("1");
        // Some GUIs write 0 here; treat it as the first move.
        let fullmove_number = fullmove
            .parse::<u32>()
            .map_err(|_| FenError::InvalidFullmoveNumber(fullmove.to_string()))?
            .max(1);

        Ok(Position {
            placement: placement.to_string(),
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    /// The standard starting position.
    pub fn startpos() -> Self {
        Self {
            placement: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR".to_string(),
            side_to_move: Color::White,
            castling: "KQkq".to_string(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    fn validate_placement(placement: &str) -> Result<(), FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut kings = [0usize; 2];
        for (i, rank) in ranks.iter().enumerate() {
            let rank_number = 8 - i as u8;
            let mut squares = 0u32;
            for c in rank.chars() {
                if let Some(n) = c.to_digit(10).filter(|n| (1..=8).contains(n)) {
                    squares += n;
                } else if let Some((piece, color)) = Piece::from_fen_char(c) {
                    squares += 1;
                    match piece {
                        Piece::King => kings[color as usize] += 1,
                        Piece::Pawn if rank_number == 1 || rank_number == 8 => {
                            return Err(FenError::PawnOnBackRank { rank: rank_number });
                        }
                        _ => {}
                    }
                } else {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c, rank_number
                    )));
                }
            }
            if squares != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} has {} squares, expected 8",
                    rank_number, squares
                )));
            }
        }

        for color in [Color::White, Color::Black] {
            let count = kings[color as usize];
            if count != 1 {
                return Err(FenError::InvalidKingCount { color, count });
            }
        }

        Ok(())
    }

    /// Returns the rights in `KQkq` order; repeated letters collapse.
    fn parse_castling(castling: &str) -> Result<String, FenError> {
        if castling == "-" {
            return Ok(castling.to_string());
        }

        if let Some(c) = castling.chars().find(|c| !"KQkq".contains(*c)) {
            return Err(FenError::InvalidCastlingRights(format!(
                "invalid character '{}'",
                c
            )));
        }

        Ok("KQkq".chars().filter(|c| castling.contains(*c)).collect())
    }

    fn parse_en_passant(ep: &str, side_to_move: Color) -> Result<Option<Square>, FenError> {
        if ep == "-" {
            return Ok(None);
        }

        // The target sits behind the pawn that just double-pushed.
        let expected_rank = match side_to_move {
            Color::White => 5,
            Color::Black => 2,
        };
        Square::from_algebraic(ep)
            .filter(|sq| sq.rank() == expected_rank)
            .map(Some)
            .ok_or_else(|| FenError::InvalidEnPassantSquare(ep.to_string()))
    }

    /// Returns the side to move.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Returns the piece placement field.
    pub fn placement(&self) -> &str {
        &self.placement
    }

    /// Returns the castling field (`-` when no rights remain).
    pub fn castling(&self) -> &str {
        &self.castling
    }

    /// Returns the en passant target square.
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Returns the halfmove clock.
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// Returns the fullmove number.
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Renders the full six-field FEN.
    pub fn to_fen(&self) -> String {
        let ep = self
            .en_passant
            .map(|sq| sq.to_algebraic())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{} {} {} {} {} {}",
            self.placement,
            self.side_to_move.to_fen_char(),
            self.castling,
            ep,
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fen())
    }
}
