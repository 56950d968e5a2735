//! UCI `info` line types.

use serde::{Deserialize, Serialize};

/// Score in centipawns or mate distance, from the side to move's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Score {
    /// Centipawn score (100 = 1 pawn advantage).
    Cp(i32),
    /// Mate in N moves (positive = side to move mates, negative or zero = side to move is mated).
    Mate(i32),
}

/// Whether a reported score is exact or only a search-window bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoreBound {
    #[default]
    Exact,
    Lower,
    Upper,
}

/// Search information from engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineInfo {
    /// Search depth in plies.
    pub depth: Option<u32>,
    /// Selective search depth.
    pub seldepth: Option<u32>,
    /// Index of the line in multi-PV mode (1 = best line).
    pub multipv: Option<u32>,
    /// Score evaluation.
    pub score: Option<Score>,
    /// Exactness of `score`.
    pub bound: ScoreBound,
    /// Nodes searched.
    pub nodes: Option<u64>,
    /// Nodes per second.
    pub nps: Option<u64>,
    /// Time spent in milliseconds.
    pub time: Option<u64>,
    /// Principal variation (best line found).
    pub pv: Vec<String>,
    /// Current move being searched.
    pub currmove: Option<String>,
    /// Hash table usage (per mille).
    pub hashfull: Option<u32>,
    /// Arbitrary string info.
    pub string: Option<String>,
}

impl EngineInfo {
    /// Create a new empty info.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if this line reports the primary line of a finished iteration:
    /// it has a depth and an exact score, and is not a secondary multi-PV line.
    pub fn is_exact_primary(&self) -> bool {
        self.depth.is_some()
            && self.score.is_some()
            && self.bound == ScoreBound::Exact
            && self.multipv.map_or(true, |n| n == 1)
    }

    /// Format as UCI info string.
    pub fn to_uci(&self) -> String {
        let mut parts = vec!["info".to_string()];

        if let Some(d) = self.depth {
            parts.push(format!("depth {}", d));
        }
        if let Some(d) = self.seldepth {
            parts.push(format!("seldepth {}", d));
        }
        if let Some(n) = self.multipv {
            parts.push(format!("multipv {}", n));
        }
        if let Some(s) = self.score {
            match s {
                Score::Cp(cp) => parts.push(format!("score cp {}", cp)),
                Score::Mate(m) => parts.push(format!("score mate {}", m)),
            }
            match self.bound {
                ScoreBound::Exact => {}
                ScoreBound::Lower => parts.push("lowerbound".to_string()),
                ScoreBound::Upper => parts.push("upperbound".to_string()),
            }
        }
        if let Some(n) = self.nodes {
            parts.push(format!("nodes {}", n));
        }
        if let Some(n) = self.nps {
            parts.push(format!("nps {}", n));
        }
        if let Some(t) = self.time {
            parts.push(format!("time {}", t));
        }
        if let Some(h) = self.hashfull {
            parts.push(format!("hashfull {}", h));
        }
        if let Some(ref m) = self.currmove {
            parts.push(format!("currmove {}", m));
        }
        if !self.pv.is_empty() {
            parts.push(format!("pv {}", self.pv.join(" ")));
        }
        if let Some(ref s) = self.string {
            parts.push(format!("string {}", s));
        }

        parts.join(" ")
    }

    /// Parse UCI info line.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.first() != Some(&"info") {
            return None;
        }

        let mut info = EngineInfo::new();
        let mut i = 1; // Skip "info"

        while i < parts.len() {
            match parts[i] {
                "depth" => {
                    i += 1;
                    info.depth = parts.get(i).and_then(|s| s.parse().ok());
                }
                "seldepth" => {
                    i += 1;
                    info.seldepth = parts.get(i).and_then(|s| s.parse().ok());
                }
                "multipv" => {
                    i += 1;
                    info.multipv = parts.get(i).and_then(|s| s.parse().ok());
                }
                "score" => {
                    let kind = parts.get(i + 1).copied();
                    let value = parts.get(i + 2).and_then(|s| s.parse().ok());
                    info.score = match (kind, value) {
                        (Some("cp"), Some(v)) => Some(Score::Cp(v)),
                        (Some("mate"), Some(v)) => Some(Score::Mate(v)),
                        _ => None,
                    };
                    i += 2;
                }
                "lowerbound" => info.bound = ScoreBound::Lower,
                "upperbound" => info.bound = ScoreBound::Upper,
                "nodes" => {
                    i += 1;
                    info.nodes = parts.get(i).and_then(|s| s.parse().ok());
                }
                "nps" => {
                    i += 1;
                    info.nps = parts.get(i).and_then(|s| s.parse().ok());
                }
                "time" => {
                    i += 1;
                    info.time = parts.get(i).and_then(|s| s.parse().ok());
                }
                "hashfull" => {
                    i += 1;
                    info.hashfull = parts.get(i).and_then(|s| s.parse().ok());
                }
                "currmove" => {
                    i += 1;
                    info.currmove = parts.get(i).map(|s| s.to_string());
                }
                "pv" => {
                    i += 1;
                    // Collect moves until another keyword or end
                    while i < parts.len() && !is_info_keyword(parts[i]) {
                        info.pv.push(parts[i].to_string());
                        i += 1;
                    }
                    continue;
                }
                "string" => {
                    // String consumes rest of line
                    info.string = Some(parts[i + 1..].join(" "));
                    break;
                }
                _ => {}
            }
            i += 1;
        }

        Some(info)
    }
}

fn is_info_keyword(s: &str) -> bool {
    matches!(
        s,
        "depth"
            | "seldepth"
            | "multipv"
            | "score"
            | "nodes"
            | "nps"
            | "time"
            | "hashfull"
            | "tbhits"
            | "currmove"
            | "currmovenumber"
            | "pv"
            | "string"
    )
}

/// Builder for constructing EngineInfo.
#[derive(Default)]
pub struct InfoBuilder {
    info: EngineInfo,
}

impl InfoBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(mut self, d: u32) -> Self {
        self.info.depth = Some(d);
        self
    }

    pub fn multipv(mut self, n: u32) -> Self {
        self.info.multipv = Some(n);
        self
    }

    pub fn score_cp(mut self, cp: i32) -> Self {
        self.info.score = Some(Score::Cp(cp));
        self
    }

    pub fn score_mate(mut self, moves: i32) -> Self {
        self.info.score = Some(Score::Mate(moves));
        self
    }

    pub fn bound(mut self, bound: ScoreBound) -> Self {
        self.info.bound = bound;
        self
    }

    pub fn nodes(mut self, n: u64) -> Self {
        self.info.nodes = Some(n);
        self
    }

    pub fn pv<S: Into<String>>(mut self, moves: impl IntoIterator<Item = S>) -> Self {
        self.info.pv = moves.into_iter().map(Into::into).collect();
        self
    }

    pub fn string(mut self, s: &str) -> Self {
        self.info.string = Some(s.to_string());
        self
    }

    pub fn build(self) -> EngineInfo {
        self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_to_uci() {
        let info = InfoBuilder::new()
            .depth(10)
            .score_cp(35)
            .nodes(50000)
            .pv(["e2e4", "e7e5"])
            .build();

        let uci = info.to_uci();
        assert_eq!(uci, "info depth 10 score cp 35 nodes 50000 pv e2e4 e7e5");
    }

    #[test]
    fn parse_info() {
        let line = "info depth 12 seldepth 18 multipv 1 score cp 30 nodes 125000 nps 500000 hashfull 3 tbhits 0 time 250 pv e2e4 e7e5 g1f3";
        let info = EngineInfo::parse(line).unwrap();

        assert_eq!(info.depth, Some(12));
        assert_eq!(info.seldepth, Some(18));
        assert_eq!(info.multipv, Some(1));
        assert_eq!(info.score, Some(Score::Cp(30)));
        assert_eq!(info.bound, ScoreBound::Exact);
        assert_eq!(info.nodes, Some(125000));
        assert_eq!(info.nps, Some(500000));
        assert_eq!(info.time, Some(250));
        assert_eq!(info.pv, vec!["e2e4", "e7e5", "g1f3"]);
        assert!(info.is_exact_primary());
    }

    #[test]
    fn parse_mate_score() {
        let info = EngineInfo::parse("info depth 20 score mate -3 pv e2e4").unwrap();
        assert_eq!(info.score, Some(Score::Mate(-3)));

        let mated = EngineInfo::parse("info depth 0 score mate 0").unwrap();
        assert_eq!(mated.score, Some(Score::Mate(0)));
        assert!(mated.pv.is_empty());
    }

    #[test]
    fn parse_bounds() {
        let lower = EngineInfo::parse("info depth 9 score cp 40 lowerbound nodes 10 pv d2d4").unwrap();
        assert_eq!(lower.bound, ScoreBound::Lower);
        assert_eq!(lower.nodes, Some(10));
        assert!(!lower.is_exact_primary());

        let upper = EngineInfo::parse("info depth 9 score cp 10 upperbound").unwrap();
        assert_eq!(upper.bound, ScoreBound::Upper);
    }

    #[test]
    fn secondary_multipv_is_not_primary() {
        let info = EngineInfo::parse("info depth 5 multipv 2 score cp 10 pv d2d4").unwrap();
        assert!(!info.is_exact_primary());
    }

    #[test]
    fn parse_string_consumes_rest() {
        let info = EngineInfo::parse("info string NNUE evaluation using nn.nnue enabled").unwrap();
        assert_eq!(
            info.string.as_deref(),
            Some("NNUE evaluation using nn.nnue enabled")
        );
        assert!(info.depth.is_none());
    }

    #[test]
    fn parse_currmove_line_has_no_score() {
        let info = EngineInfo::parse("info depth 24 currmove e2e4 currmovenumber 1").unwrap();
        assert_eq!(info.currmove.as_deref(), Some("e2e4"));
        assert!(info.score.is_none());
        assert!(info.pv.is_empty());
        assert!(!info.is_exact_primary());
    }

    #[test]
    fn rejects_non_info_lines() {
        assert!(EngineInfo::parse("bestmove e2e4").is_none());
        assert!(EngineInfo::parse("information").is_none());
        assert!(EngineInfo::parse("").is_none());
    }

    #[test]
    fn truncated_score_is_ignored() {
        let info = EngineInfo::parse("info depth 3 score cp").unwrap();
        assert_eq!(info.depth, Some(3));
        assert!(info.score.is_none());
    }
}
