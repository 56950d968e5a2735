//! Core types for chess.
//!
//! This crate provides the small set of chess types the analysis service
//! needs to validate requests and read engine output:
//! - [`Position`] for validated FEN positions
//! - [`Color`] and [`Piece`]
//! - [`Square`] for board coordinates
//! - [`Move`] for UCI coordinate moves

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{FenError, Position};
pub use mov::{Move, MoveParseError};
pub use piece::Piece;
pub use square::Square;
