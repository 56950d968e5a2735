//! Normalization of engine scores to a fixed perspective.

use chess_core::Color;
use uci::Score;

/// Centipawn value reported for a forced mate, signed by the winning side.
///
/// Mate distance is not preserved: mate in 1 and mate in 12 both map to
/// this value.
pub const MATE_SCORE: i32 = 100_000;

/// Converts an engine score (relative to the side to move) into
/// centipawns from White's point of view.
///
/// `mate N` with N > 0 means the side to move mates; N <= 0 means it is
/// mated (`mate 0` is reported for an already checkmated position).
/// Centipawn scores are clamped so they can never reach the mate value.
pub fn white_centipawns(score: Score, side_to_move: Color) -> i32 {
    let relative = match score {
        Score::Cp(cp) => cp.clamp(-(MATE_SCORE - 1), MATE_SCORE - 1),
        Score::Mate(n) if n > 0 => MATE_SCORE,
        Score::Mate(_) => -MATE_SCORE,
    };
    relative * side_to_move.white_sign()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centipawns_keep_sign_for_white() {
        assert_eq!(white_centipawns(Score::Cp(35), Color::White), 35);
        assert_eq!(white_centipawns(Score::Cp(-150), Color::White), -150);
    }

    #[test]
    fn centipawns_flip_for_black() {
        assert_eq!(white_centipawns(Score::Cp(35), Color::Black), -35);
        assert_eq!(white_centipawns(Score::Cp(-150), Color::Black), 150);
        assert_eq!(white_centipawns(Score::Cp(0), Color::Black), 0);
    }

    #[test]
    fn white_mating_is_positive_sentinel() {
        // White to move mates.
        assert_eq!(white_centipawns(Score::Mate(1), Color::White), MATE_SCORE);
        assert_eq!(white_centipawns(Score::Mate(7), Color::White), MATE_SCORE);
        // Black to move is getting mated by White.
        assert_eq!(white_centipawns(Score::Mate(-2), Color::Black), MATE_SCORE);
    }

    #[test]
    fn black_mating_is_negative_sentinel() {
        assert_eq!(white_centipawns(Score::Mate(3), Color::Black), -MATE_SCORE);
        assert_eq!(white_centipawns(Score::Mate(-1), Color::White), -MATE_SCORE);
    }

    #[test]
    fn already_mated_side_to_move_loses() {
        assert_eq!(white_centipawns(Score::Mate(0), Color::White), -MATE_SCORE);
        assert_eq!(white_centipawns(Score::Mate(0), Color::Black), MATE_SCORE);
    }

    #[test]
    fn huge_centipawns_stay_below_sentinel() {
        assert_eq!(white_centipawns(Score::Cp(250_000), Color::White), MATE_SCORE - 1);
        assert_eq!(white_centipawns(Score::Cp(i32::MIN), Color::White), -(MATE_SCORE - 1));
    }
}
