//! Chess piece representation.

use crate::Color;

/// The six kinds of chess pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Piece {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl Piece {
    /// Parses a FEN placement character into a piece and its color.
    pub const fn from_fen_char(c: char) -> Option<(Piece, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let piece = match c.to_ascii_lowercase() {
            'p' => Piece::Pawn,
            'n' => Piece::Knight,
            'b' => Piece::Bishop,
            'r' => Piece::Rook,
            'q' => Piece::Queen,
            'k' => Piece::King,
            _ => return None,
        };
        Some((piece, color))
    }

    /// Parses the lowercase promotion suffix of a UCI move.
    pub const fn from_promotion_char(c: char) -> Option<Piece> {
        match c {
            'n' => Some(Piece::Knight),
            'b' => Some(Piece::Bishop),
            'r' => Some(Piece::Rook),
            'q' => Some(Piece::Queen),
            _ => None,
        }
    }

    /// Lowercase letter used for this piece in UCI promotion suffixes.
    pub const fn to_char(self) -> char {
        match self {
            Piece::Pawn => 'p',
            Piece::Knight => 'n',
            Piece::Bishop => 'b',
            Piece::Rook => 'r',
            Piece::Queen => 'q',
            Piece::King => 'k',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fen_chars() {
        assert_eq!(Piece::from_fen_char('K'), Some((Piece::King, Color::White)));
        assert_eq!(Piece::from_fen_char('p'), Some((Piece::Pawn, Color::Black)));
        assert_eq!(Piece::from_fen_char('x'), None);
        assert_eq!(Piece::from_fen_char('1'), None);
    }

    #[test]
    fn promotion_chars() {
        assert_eq!(Piece::from_promotion_char('q'), Some(Piece::Queen));
        assert_eq!(Piece::from_promotion_char('n'), Some(Piece::Knight));
        assert_eq!(Piece::from_promotion_char('k'), None);
        assert_eq!(Piece::from_promotion_char('p'), None);
        assert_eq!(Piece::from_promotion_char('Q'), None);
    }
}
