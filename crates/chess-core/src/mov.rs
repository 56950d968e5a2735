//! Coordinate-notation moves as exchanged with UCI engines.

use crate::{Piece, Square};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a string is not a UCI coordinate move.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid UCI move: '{0}'")]
pub struct MoveParseError(pub String);

/// A move in UCI coordinate notation (`e2e4`, `e7e8q`).
///
/// This is a purely syntactic value: it says nothing about whether the
/// move is legal in any particular position.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    promotion: Option<Piece>,
}

impl Move {
    /// Creates a move from its parts.
    pub const fn new(from: Square, to: Square, promotion: Option<Piece>) -> Self {
        Self {
            from,
            to,
            promotion,
        }
    }

    /// Parses a move from UCI notation.
    pub fn from_uci(s: &str) -> Result<Self, MoveParseError> {
        let err = || MoveParseError(s.to_string());
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(err());
        }
        let from = Square::from_algebraic(&s[0..2]).ok_or_else(err)?;
        let to = Square::from_algebraic(&s[2..4]).ok_or_else(err)?;
        if from == to {
            return Err(err());
        }
        let promotion = match s[4..].chars().next() {
            Some(c) => Some(Piece::from_promotion_char(c).ok_or_else(err)?),
            None => None,
        };
        Ok(Self::new(from, to, promotion))
    }

    /// Returns the source square.
    #[inline]
    pub const fn from(self) -> Square {
        self.from
    }

    /// Returns the destination square.
    #[inline]
    pub const fn to(self) -> Square {
        self.to
    }

    /// Returns the promotion piece, if any.
    #[inline]
    pub const fn promotion(self) -> Option<Piece> {
        self.promotion
    }

    /// Returns the UCI notation for this move.
    pub fn to_uci(self) -> String {
        match self.promotion {
            Some(p) => format!("{}{}{}", self.from, self.to, p.to_char()),
            None => format!("{}{}", self.from, self.to),
        }
    }
}

impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self.to_uci())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}
