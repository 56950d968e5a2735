//! Commands sent from the GUI (our side) to the engine.

use crate::UciError;

/// Commands sent from GUI to engine.
#[derive(Debug, Clone, PartialEq)]
pub enum GuiCommand {
    /// Initialize UCI mode.
    Uci,
    /// Check if engine is ready.
    IsReady,
    /// Set an engine option.
    SetOption { name: String, value: Option<String> },
    /// Tell the engine the next position belongs to a new game.
    UciNewGame,
    /// Set up position.
    Position {
        fen: Option<String>,
        moves: Vec<String>,
    },
    /// Start calculating.
    Go(GoOptions),
    /// Stop calculating.
    Stop,
    /// Quit the engine.
    Quit,
    /// Unknown command (for forward compatibility).
    Unknown(String),
}

/// Limits for the `go` command.
///
/// Only the bounded forms are modelled; an empty `GoOptions` renders as a
/// bare `go`, which most engines treat as an infinite search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GoOptions {
    /// Search to this depth.
    pub depth: Option<u32>,
    /// Search for exactly this time in milliseconds.
    pub movetime: Option<u64>,
}

impl GoOptions {
    /// Returns true if at least one limit is set.
    pub fn is_bounded(&self) -> bool {
        self.depth.is_some() || self.movetime.is_some()
    }
}

impl GuiCommand {
    /// Format the command as a single protocol line (without newline).
    pub fn to_uci(&self) -> String {
        match self {
            GuiCommand::Uci => "uci".to_string(),
            GuiCommand::IsReady => "isready".to_string(),
            GuiCommand::SetOption { name, value } => match value {
                Some(v) => format!("setoption name {} value {}", name, v),
                None => format!("setoption name {}", name),
            },
            GuiCommand::UciNewGame => "ucinewgame".to_string(),
            GuiCommand::Position { fen, moves } => {
                let mut line = match fen {
                    Some(f) => format!("position fen {}", f),
                    None => "position startpos".to_string(),
                };
                if !moves.is_empty() {
                    line.push_str(" moves ");
                    line.push_str(&moves.join(" "));
                }
                line
            }
            GuiCommand::Go(opts) => {
                let mut line = "go".to_string();
                if let Some(d) = opts.depth {
                    line.push_str(&format!(" depth {}", d));
                }
                if let Some(t) = opts.movetime {
                    line.push_str(&format!(" movetime {}", t));
                }
                line
            }
            GuiCommand::Stop => "stop".to_string(),
            GuiCommand::Quit => "quit".to_string(),
            GuiCommand::Unknown(raw) => raw.clone(),
        }
    }

    /// Parse a UCI command string.
    pub fn parse(input: &str) -> Result<Self, UciError> {
        let input = input.trim();
        let mut parts = input.split_whitespace();

        let cmd = parts.next().unwrap_or("");

        match cmd {
            "uci" => Ok(GuiCommand::Uci),
            "isready" => Ok(GuiCommand::IsReady),
            "ucinewgame" => Ok(GuiCommand::UciNewGame),
            "stop" => Ok(GuiCommand::Stop),
            "quit" => Ok(GuiCommand::Quit),
            "setoption" => Self::parse_setoption(parts),
            "position" => Self::parse_position(parts),
            "go" => Self::parse_go(parts),
            _ => Ok(GuiCommand::Unknown(input.to_string())),
        }
    }

    fn parse_setoption<'a>(mut parts: impl Iterator<Item = &'a str>) -> Result<Self, UciError> {
        if parts.next() != Some("name") {
            return Err(UciError::ParseError(
                "setoption: expected 'name'".to_string(),
            ));
        }

        // Option names may contain spaces, so collect until "value".
        let mut name = Vec::new();
        let mut value = None;
        while let Some(part) = parts.next() {
            if part == "value" {
                value = Some(parts.by_ref().collect::<Vec<_>>().join(" "));
                break;
            }
            name.push(part);
        }

        if name.is_empty() {
            return Err(UciError::ParseError(
                "setoption: missing option name".to_string(),
            ));
        }

        Ok(GuiCommand::SetOption {
            name: name.join(" "),
            value,
        })
    }

    fn parse_position<'a>(mut parts: impl Iterator<Item = &'a str>) -> Result<Self, UciError> {
        let fen = match parts.next() {
            Some("startpos") => {
                // Skip to the optional "moves" keyword.
                if let Some(tok) = parts.next() {
                    if tok != "moves" {
                        return Err(UciError::ParseError(format!(
                            "Expected 'moves' after 'startpos', got '{}'",
                            tok
                        )));
                    }
                }
                None
            }
            Some("fen") => {
                let fen_parts: Vec<&str> = parts.by_ref().take_while(|&p| p != "moves").collect();
                if fen_parts.is_empty() {
                    return Err(UciError::ParseError("Empty FEN".to_string()));
                }
                Some(fen_parts.join(" "))
            }
            Some(other) => {
                return Err(UciError::ParseError(format!(
                    "Expected 'startpos' or 'fen', got '{}'",
                    other
                )));
            }
            None => {
                return Err(UciError::ParseError(
                    "Expected 'startpos' or 'fen'".to_string(),
                ));
            }
        };

        let moves = parts.map(str::to_string).collect();
        Ok(GuiCommand::Position { fen, moves })
    }

    fn parse_go<'a>(parts: impl Iterator<Item = &'a str>) -> Result<Self, UciError> {
        let mut opts = GoOptions::default();
        let parts: Vec<&str> = parts.collect();
        let mut i = 0;

        while i < parts.len() {
            match parts[i] {
                "depth" => {
                    i += 1;
                    opts.depth = parts.get(i).and_then(|s| s.parse().ok());
                }
                "movetime" => {
                    i += 1;
                    opts.movetime = parts.get(i).and_then(|s| s.parse().ok());
                }
                _ => {}
            }
            i += 1;
        }

        Ok(GuiCommand::Go(opts))
    }
}
